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
#[path = "pairing_tests.rs"]
mod pairing_tests;

use std::cmp::Reverse;

use itertools::Itertools;
use jiff::SignedDuration;
use model::base_types::{Cost, DriverIdx, RideIdx};
use model::drivers::Drivers;
use model::rides::Rides;
use model::travel_time::DistanceEstimator;
use rayon::prelude::*;
use solution::DriverState;

use crate::cost_model::CostModel;
use crate::error::EngineError;
use crate::min_cost_flow::{Capacity, FlowNetwork, NodeIdx};
use crate::open_batch::OpenBatch;

/// Chains paired with drivers; chains no idle driver can serve stay unpaired.
pub struct Pairing {
    pub routes: Vec<(DriverIdx, Vec<RideIdx>)>,
    pub unpaired: Vec<Vec<RideIdx>>,
}

/// Pairs chains with idle drivers by a min-cost maximum matching: as many chains as possible
/// get a driver that can serve all of their rides, and among those matchings the total start
/// cost is minimal.
///
/// Among the matched unconstrained drivers the pairing is ascending-ascending: the chain that
/// benefits most from a low price (most rides, then longest total ride duration, then earliest
/// pickup) gets the cheapest of them. The routes are returned in this order as well.
pub fn pair_chains_with_drivers(
    chains: Vec<Vec<RideIdx>>,
    rides: &Rides,
    drivers: &Drivers,
    batch: &OpenBatch,
    cost_model: &CostModel,
    turnaround: SignedDuration,
    estimator: &dyn DistanceEstimator,
) -> Result<Pairing, EngineError> {
    let chains: Vec<Vec<RideIdx>> = chains
        .into_iter()
        .filter(|chain| !chain.is_empty())
        .sorted_by_key(|chain| {
            let total_duration = chain
                .iter()
                .fold(SignedDuration::ZERO, |sum, &r| sum + rides.get(r).duration());
            (Reverse(chain.len()), Reverse(total_duration), chain[0])
        })
        .collect();
    let idle: Vec<DriverIdx> = batch.idle_drivers().collect();

    // for each chain the idle drivers that can serve it, with their start cost
    let candidates: Vec<Vec<(usize, Cost)>> = chains
        .par_iter()
        .map(|chain| {
            let first = rides.get(chain[0]);
            idle.iter()
                .enumerate()
                .filter(|(_, &d)| can_serve_chain(chain, d, rides, drivers, turnaround, estimator))
                .map(|(k, &d)| (k, cost_model.start_cost(first, d, drivers, estimator)))
                .collect::<Vec<_>>()
        })
        .collect();

    let matching = min_cost_max_matching(&candidates, idle.len())?;

    let mut routes = Vec::with_capacity(chains.len());
    let mut unpaired = Vec::new();
    for (chain, matched) in chains.into_iter().zip(matching) {
        match matched {
            Some(k) => routes.push((idle[k], chain)),
            None => unpaired.push(chain),
        }
    }

    // every unconstrained driver can serve every chain any of them can serve, and their
    // approach is free, so they can be swapped without changing the cost
    let mut pooled: Vec<DriverIdx> = routes
        .iter()
        .map(|(driver, _)| *driver)
        .filter(|&d| !drivers.get(d).is_constrained())
        .collect();
    pooled.sort();
    let mut pooled = pooled.into_iter();
    for (driver, _) in routes.iter_mut() {
        if !drivers.get(*driver).is_constrained() {
            if let Some(cheapest) = pooled.next() {
                *driver = cheapest;
            }
        }
    }

    Ok(Pairing { routes, unpaired })
}

/// Routes for the drivers that are still idle, built greedily: cheapest driver first, each one
/// takes every open ride (in pickup order) it can still reach.
pub fn fill_idle_drivers(
    rides: &Rides,
    drivers: &Drivers,
    batch: &OpenBatch,
    turnaround: SignedDuration,
    estimator: &dyn DistanceEstimator,
) -> Vec<(DriverIdx, Vec<RideIdx>)> {
    let mut batch = batch.clone();
    let mut routes = Vec::new();
    for driver_idx in drivers.idxs() {
        if !batch.is_idle(driver_idx) {
            continue;
        }
        let driver = drivers.get(driver_idx);
        let mut state = DriverState::initial(driver);
        let mut route = Vec::new();
        for ride_idx in batch.open_rides() {
            let ride = rides.get(ride_idx);
            if state.can_serve(ride, driver, turnaround, estimator) {
                state.serve(ride);
                route.push(ride_idx);
            }
        }
        if !route.is_empty() {
            batch.commit(driver_idx, &route);
            routes.push((driver_idx, route));
        }
    }
    routes
}

pub fn can_serve_chain(
    chain: &[RideIdx],
    driver: DriverIdx,
    rides: &Rides,
    drivers: &Drivers,
    turnaround: SignedDuration,
    estimator: &dyn DistanceEstimator,
) -> bool {
    let driver = drivers.get(driver);
    let mut state = DriverState::initial(driver);
    chain.iter().all(|&r| {
        let ride = rides.get(r);
        let feasible = state.can_serve(ride, driver, turnaround, estimator);
        state.serve(ride);
        feasible
    })
}

// Bipartite matching as a flow: SOURCE -> chain -> driver -> SINK, all arcs of capacity 1.
// Each matched chain earns a reward larger than any sum of start costs, so the flow matches as
// many chains as possible. Returns for each chain the position of its driver.
fn min_cost_max_matching(
    candidates: &[Vec<(usize, Cost)>],
    number_of_drivers: usize,
) -> Result<Vec<Option<usize>>, EngineError> {
    let number_of_chains = candidates.len();
    let source: NodeIdx = 0;
    let chain_node = |c: usize| 1 + c;
    let driver_node = |k: usize| 1 + number_of_chains + k;
    let sink = 1 + number_of_chains + number_of_drivers;

    let max_start = candidates
        .iter()
        .flatten()
        .map(|&(_, cost)| cost)
        .max()
        .unwrap_or(0);
    let reward = max_start
        .checked_mul(number_of_chains as Cost)
        .and_then(|c| c.checked_add(1))
        .ok_or(EngineError::CostOverflow {
            context: "pairing reward",
        })?;

    let mut network = FlowNetwork::new(sink + 1);
    for (c, drivers) in candidates.iter().enumerate() {
        if drivers.is_empty() {
            continue;
        }
        network.add_arc(source, chain_node(c), 1, -reward);
        for &(k, cost) in drivers.iter() {
            network.add_arc(chain_node(c), driver_node(k), 1, cost);
        }
    }
    for k in 0..number_of_drivers {
        network.add_arc(driver_node(k), sink, 1, 0);
    }
    network.successive_shortest_paths(source, sink, number_of_chains as Capacity);

    Ok((0..number_of_chains)
        .map(|c| {
            network
                .flow_arcs_from(chain_node(c))
                .next()
                .map(|(_, node)| node - driver_node(0))
        })
        .collect())
}
