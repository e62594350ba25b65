// © 2023-2024 ETH Zurich
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// any later version.
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU General Public License for more details.
// You should have received a copy of the GNU General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

#[cfg(test)]
#[path = "path_cover_tests.rs"]
mod path_cover_tests;

use jiff::SignedDuration;
use model::base_types::{Cost, DriverIdx, RideIdx};
use model::drivers::Drivers;
use model::rides::Rides;
use model::travel_time::DistanceEstimator;
use rayon::prelude::*;
use solution::DriverState;

use crate::compatibility_graph::CompatibilityGraph;
use crate::cost_model::CostModel;
use crate::error::EngineError;
use crate::min_cost_flow::{Capacity, FlowNetwork, FlowResult, NodeIdx};
use crate::open_batch::OpenBatch;

const SOURCE: NodeIdx = 0;
const HUB: NodeIdx = 1;

// SOURCE, HUB, one node per driver, (in, out) per ride in pickup order, SINK
#[derive(Clone, Copy)]
struct Layout {
    number_of_drivers: usize,
    number_of_rides: usize,
}

impl Layout {
    fn driver(&self, driver: usize) -> NodeIdx {
        2 + driver
    }

    fn ride_in(&self, ride: usize) -> NodeIdx {
        2 + self.number_of_drivers + 2 * ride
    }

    fn ride_out(&self, ride: usize) -> NodeIdx {
        3 + self.number_of_drivers + 2 * ride
    }

    fn ride_of(&self, ride_in: NodeIdx) -> usize {
        (ride_in - 2 - self.number_of_drivers) / 2
    }

    fn sink(&self) -> NodeIdx {
        2 + self.number_of_drivers + 2 * self.number_of_rides
    }

    fn number_of_nodes(&self) -> usize {
        self.sink() + 1
    }
}

/// Minimum-cost path cover of the open rides as a min-cost flow.
///
/// Node layout (topological): SOURCE, HUB, one node per driver, (in, out) per ride in pickup
/// order, SINK.
/// - Unconstrained drivers can start every chain and are pooled: SOURCE -> HUB has one unit arc
///   per idle unconstrained driver, costing the price of the k-th cheapest of them, so opening
///   the k-th pooled chain costs the price of the cheapest pooled driver not committed yet.
///   HUB -> in is free for every open ride.
/// - A constrained driver (start location or availability windows) has its own node:
///   SOURCE -> driver costs its price, driver -> in exists only for rides it can start and
///   costs the approach. Drivers that cannot start any ride get no arc at all.
/// - in -> out: capacity 1 with a negative reward that outweighs every other cost, so covering
///   more rides always wins and among maximal covers the cheapest is chosen.
/// - out -> in: for every chain edge between open rides, costing the deadhead.
/// - out -> SINK: free.
pub struct PathCover {
    network: FlowNetwork,
    layout: Layout,
    max_chains: Capacity,
    reward: Cost,
}

/// Chains of the optimal path cover together with solver figures.
pub struct CoverSolution {
    pub chains: Vec<Vec<RideIdx>>,
    pub flow: FlowResult,
    pub reward: Cost,
}

// static functions
impl PathCover {
    pub fn build(
        graph: &CompatibilityGraph,
        cost_model: &CostModel,
        rides: &Rides,
        drivers: &Drivers,
        batch: &OpenBatch,
        turnaround: SignedDuration,
        estimator: &dyn DistanceEstimator,
    ) -> Result<PathCover, EngineError> {
        let layout = Layout {
            number_of_drivers: drivers.len(),
            number_of_rides: graph.number_of_rides(),
        };
        let open_rides: Vec<RideIdx> = batch.open_rides().collect();

        let pooled: Vec<DriverIdx> = batch
            .idle_drivers()
            .filter(|&d| !drivers.get(d).is_constrained())
            .take(open_rides.len())
            .collect();
        let individual = start_arcs(
            cost_model,
            rides,
            drivers,
            batch,
            &open_rides,
            turnaround,
            estimator,
        );
        let max_chains = (pooled.len() + individual.len()).min(open_rides.len()) as Capacity;

        let max_start = cost_model.max_price_cost()? + cost_model.price_step();
        let mut max_continue: Cost = 0;
        let mut continue_costs = Vec::with_capacity(open_rides.len());
        for &ride in open_rides.iter() {
            let costs = graph
                .chain_edges(ride)
                .iter()
                .filter(|e| batch.is_open(e.to))
                .map(|e| Ok((e.to, cost_model.continue_cost(e.dead_head)?)))
                .collect::<Result<Vec<(RideIdx, Cost)>, EngineError>>()?;
            max_continue = costs.iter().map(|&(_, c)| c).fold(max_continue, Cost::max);
            continue_costs.push(costs);
        }

        let reward = reward(open_rides.len(), max_start, max_continue)?;

        let mut network = FlowNetwork::new(layout.number_of_nodes());

        for &driver in pooled.iter() {
            network.add_arc(SOURCE, HUB, 1, cost_model.price_cost(driver));
        }
        for (driver, starts) in individual.iter() {
            let node = layout.driver(driver.idx());
            network.add_arc(SOURCE, node, 1, cost_model.price_cost(*driver));
            for &(ride, cost) in starts.iter() {
                network.add_arc(node, layout.ride_in(ride.idx()), 1, cost);
            }
        }
        for (&ride, successors) in open_rides.iter().zip(continue_costs) {
            let i = ride.idx();
            if !pooled.is_empty() {
                // the approach of an unconstrained driver is free
                network.add_arc(HUB, layout.ride_in(i), 1, 0);
            }
            network.add_arc(layout.ride_in(i), layout.ride_out(i), 1, -reward);
            for (to, cost) in successors {
                network.add_arc(layout.ride_out(i), layout.ride_in(to.idx()), 1, cost);
            }
            network.add_arc(layout.ride_out(i), layout.sink(), 1, 0);
        }

        Ok(PathCover {
            network,
            layout,
            max_chains,
            reward,
        })
    }
}

// methods
impl PathCover {
    pub fn network(&self) -> &FlowNetwork {
        &self.network
    }

    pub fn source(&self) -> NodeIdx {
        SOURCE
    }

    pub fn sink(&self) -> NodeIdx {
        self.layout.sink()
    }

    pub fn max_chains(&self) -> Capacity {
        self.max_chains
    }

    pub fn solve(mut self) -> CoverSolution {
        let flow = self
            .network
            .successive_shortest_paths(SOURCE, self.sink(), self.max_chains);
        let chains = self.decompose();
        CoverSolution {
            chains,
            flow,
            reward: self.reward,
        }
    }

    // follows the flow from the HUB and from the driver nodes; every ride has one unit of
    // throughput, so the paths are disjoint
    fn decompose(&self) -> Vec<Vec<RideIdx>> {
        let sink = self.sink();
        let layout = self.layout;
        let firsts: Vec<NodeIdx> = std::iter::once(HUB)
            .chain((0..layout.number_of_drivers).map(|d| layout.driver(d)))
            .flat_map(|origin| self.network.flow_arcs_from(origin).map(|(_, first)| first))
            .collect();

        firsts
            .into_iter()
            .map(|first| {
                let mut chain = Vec::new();
                let mut node = first;
                while node != sink {
                    let ride = layout.ride_of(node);
                    chain.push(RideIdx::from(ride as u32));
                    match self.network.flow_arcs_from(layout.ride_out(ride)).next() {
                        Some((_, next)) => node = next,
                        None => break,
                    }
                }
                chain
            })
            .collect()
    }
}

// For every idle constrained driver the open rides it can start with, together with the
// approach cost. Drivers that cannot start any ride are left out.
fn start_arcs(
    cost_model: &CostModel,
    rides: &Rides,
    drivers: &Drivers,
    batch: &OpenBatch,
    open_rides: &[RideIdx],
    turnaround: SignedDuration,
    estimator: &dyn DistanceEstimator,
) -> Vec<(DriverIdx, Vec<(RideIdx, Cost)>)> {
    batch
        .idle_drivers()
        .filter(|&d| drivers.get(d).is_constrained())
        .collect::<Vec<_>>()
        .par_iter()
        .map(|&driver_idx| {
            let driver = drivers.get(driver_idx);
            let state = DriverState::initial(driver);
            let starts = open_rides
                .iter()
                .filter(|&&r| state.can_serve(rides.get(r), driver, turnaround, estimator))
                .map(|&r| {
                    let dead_head = state.dead_head_to(rides.get(r).pickup_location(), estimator);
                    (r, cost_model.approach_cost(dead_head))
                })
                .collect::<Vec<_>>();
            (driver_idx, starts)
        })
        .filter(|(_, starts)| !starts.is_empty())
        .collect()
}

// Every cover with more rides must be cheaper. A cover opens at most n chains and uses at most
// n chain edges, so rewarding each ride with more than that suffices.
fn reward(number_of_rides: usize, max_start: Cost, max_continue: Cost) -> Result<Cost, EngineError> {
    let n = number_of_rides as Cost;
    let reward = max_start
        .checked_add(max_continue)
        .and_then(|c| c.checked_mul(n))
        .and_then(|c| c.checked_add(1))
        .ok_or(EngineError::CostOverflow {
            context: "ride reward",
        })?;
    // distances in the flow network are bounded by a path of rewards
    reward
        .checked_mul(2 * n + 3)
        .ok_or(EngineError::CostOverflow {
            context: "path lengths",
        })?;
    Ok(reward)
}
