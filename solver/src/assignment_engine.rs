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


use std::sync::Arc;
use std::time;

use model::base_types::Cost;
use model::config::Config;
use model::drivers::Drivers;
use model::rides::Rides;
use model::travel_time::DistanceEstimator;
use solution::Schedule;
use tracing::{debug, error, info};

use crate::compatibility_graph::CompatibilityGraph;
use crate::cost_model::CostModel;
use crate::error::EngineError;
use crate::open_batch::OpenBatch;
use crate::pairing::{fill_idle_drivers, pair_chains_with_drivers};
use crate::path_cover::PathCover;

/// Figures of one solve.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SolveReport {
    pub compatibility_edges: usize,
    /// cost of the optimal flows of all rounds, including the (negative) rewards of covered rides
    pub flow_cost: Cost,
    /// reward per ride of the first round
    pub reward_per_ride: Cost,
    pub augmentations: usize,
    pub rounds: usize,
    pub chains: usize,
    /// chains of the last round that no idle driver could serve
    pub unpaired_chains: usize,
    /// routes built greedily for drivers that were still idle after the last round
    pub fallback_routes: usize,
}

/// Assigns a batch of rides to a pool of drivers: builds the compatibility graph, computes a
/// cheapest maximal path cover by min-cost flow and pairs the resulting chains with drivers.
///
/// A chain that no idle driver can serve (availability windows end before its last ride) is
/// dissolved and its rides are covered again in a further round by the drivers that are still
/// idle. Rounds stop once a round pairs no chain; drivers that are still idle then take open
/// rides greedily.
///
/// An engine holds no state between batches; independent batches may use one engine each or
/// share one.
pub struct AssignmentEngine {
    config: Arc<Config>,
}

impl AssignmentEngine {
    pub fn new(config: Arc<Config>) -> AssignmentEngine {
        AssignmentEngine { config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn solve(
        &self,
        rides: Arc<Rides>,
        drivers: Arc<Drivers>,
        estimator: &dyn DistanceEstimator,
    ) -> Result<Schedule, EngineError> {
        self.solve_with_report(rides, drivers, estimator)
            .map(|(schedule, _)| schedule)
    }

    pub fn solve_with_report(
        &self,
        rides: Arc<Rides>,
        drivers: Arc<Drivers>,
        estimator: &dyn DistanceEstimator,
    ) -> Result<(Schedule, SolveReport), EngineError> {
        let turnaround = self.config.compatibility.minimal_turnaround;
        let lookahead = self.config.compatibility.lookahead;
        info!(
            "Assigning {} rides to {} drivers",
            rides.len(),
            drivers.len()
        );

        let start_time = time::Instant::now();
        let graph = CompatibilityGraph::build(&rides, turnaround, lookahead, estimator);
        let cost_model = CostModel::new(&drivers, &self.config.costs)?;
        debug!(
            edges = graph.number_of_edges(),
            "compatibility graph built in {:0.2}sec",
            start_time.elapsed().as_secs_f32()
        );

        let mut report = SolveReport {
            compatibility_edges: graph.number_of_edges(),
            flow_cost: 0,
            reward_per_ride: 0,
            augmentations: 0,
            rounds: 0,
            chains: 0,
            unpaired_chains: 0,
            fallback_routes: 0,
        };
        let mut batch = OpenBatch::new(rides.len(), drivers.len());
        let mut routes = Vec::new();

        while batch.has_work() {
            let start_time = time::Instant::now();
            let path_cover = PathCover::build(
                &graph,
                &cost_model,
                &rides,
                &drivers,
                &batch,
                turnaround,
                estimator,
            )?;
            let cover = path_cover.solve();
            if report.rounds == 0 {
                report.reward_per_ride = cover.reward;
            }
            report.rounds += 1;
            report.flow_cost += cover.flow.cost;
            report.augmentations += cover.flow.augmentations;
            report.chains += cover.chains.len();
            debug!(
                round = report.rounds,
                open_rides = batch.number_of_open_rides(),
                flow = cover.flow.flow,
                cost = cover.flow.cost,
                augmentations = cover.flow.augmentations,
                "min-cost flow computed in {:0.2}sec",
                start_time.elapsed().as_secs_f32()
            );

            let pairing = pair_chains_with_drivers(
                cover.chains,
                &rides,
                &drivers,
                &batch,
                &cost_model,
                turnaround,
                estimator,
            )?;
            for chain in pairing.unpaired.iter() {
                debug!(
                    "no idle driver can serve the chain starting with {}",
                    rides.get(chain[0]).id()
                );
            }
            report.unpaired_chains = pairing.unpaired.len();
            if pairing.routes.is_empty() {
                break;
            }
            for (driver, chain) in pairing.routes {
                batch.commit(driver, &chain);
                routes.push((driver, chain));
            }
            if report.unpaired_chains == 0 {
                break;
            }
        }

        if batch.has_work() {
            let fallback = fill_idle_drivers(&rides, &drivers, &batch, turnaround, estimator);
            report.fallback_routes = fallback.len();
            if !fallback.is_empty() {
                debug!("{} routes built for idle drivers", fallback.len());
            }
            routes.extend(fallback);
        }

        let start_time = time::Instant::now();
        let schedule = match Schedule::assemble(routes, rides, drivers, estimator) {
            Ok(schedule) => schedule,
            Err(violation) => {
                error!("engine produced an invalid schedule: {}", violation);
                panic!("engine produced an invalid schedule: {}", violation);
            }
        };
        debug!(
            "schedule assembled in {:0.2}sec",
            start_time.elapsed().as_secs_f32()
        );
        info!(
            "{} rides assigned to {} drivers in {} rounds, {} unassigned",
            schedule.number_of_assignments(),
            schedule.number_of_used_drivers(),
            report.rounds,
            schedule.number_of_unassigned()
        );

        Ok((schedule, report))
    }
}
