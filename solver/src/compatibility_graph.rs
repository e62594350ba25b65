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
#[path = "compatibility_graph_tests.rs"]
mod compatibility_graph_tests;

use std::ops::Range;

use itertools::Itertools;
use jiff::SignedDuration;
use model::base_types::RideIdx;
use model::rides::Rides;
use model::travel_time::DistanceEstimator;
use rayon::prelude::*;

/// A driver can serve `to` right after the ride the edge starts at.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChainEdge {
    pub to: RideIdx,
    pub dead_head: SignedDuration,
}

/// DAG of all ride pairs (A, B) a single driver can serve consecutively, i.e.,
/// A.pickup < B.pickup and A.dropoff + turnaround + travel(A.dropoff, B.pickup) <= B.pickup.
///
/// Only successors picked up within the lookahead window after A.dropoff + turnaround are
/// considered. SOURCE and SINK are implicit: SOURCE precedes and SINK succeeds every ride.
pub struct CompatibilityGraph {
    // for each ride, sorted by (dead_head, ride index)
    successors: Vec<Vec<ChainEdge>>,
    number_of_edges: usize,
}

// static functions
impl CompatibilityGraph {
    pub fn build(
        rides: &Rides,
        turnaround: SignedDuration,
        lookahead: SignedDuration,
        estimator: &dyn DistanceEstimator,
    ) -> CompatibilityGraph {
        let buckets = pickup_hour_buckets(rides);

        // each bucket is handled by one worker, the results are concatenated in ride order
        let successors: Vec<Vec<ChainEdge>> = buckets
            .into_par_iter()
            .map(|bucket| {
                bucket
                    .map(|i| {
                        compute_successors(
                            rides,
                            RideIdx::from(i as u32),
                            turnaround,
                            lookahead,
                            estimator,
                        )
                    })
                    .collect::<Vec<_>>()
            })
            .collect::<Vec<_>>()
            .into_iter()
            .flatten()
            .collect();

        let number_of_edges = successors.iter().map(Vec::len).sum();
        CompatibilityGraph {
            successors,
            number_of_edges,
        }
    }
}

// methods
impl CompatibilityGraph {
    pub fn number_of_rides(&self) -> usize {
        self.successors.len()
    }

    /// number of ride-to-ride edges (edges incident to SOURCE or SINK are not counted)
    pub fn number_of_edges(&self) -> usize {
        self.number_of_edges
    }

    pub fn chain_edges(&self, ride: RideIdx) -> &[ChainEdge] {
        &self.successors[ride.idx()]
    }

    #[cfg(test)]
    pub fn has_edge(&self, from: RideIdx, to: RideIdx) -> bool {
        self.chain_edges(from).iter().any(|e| e.to == to)
    }
}

// rides (given by their index range) grouped by the hour of their pickup
fn pickup_hour_buckets(rides: &Rides) -> Vec<Range<usize>> {
    let mut buckets = Vec::new();
    let mut start = 0;
    for (_, group) in &rides
        .iter()
        .group_by(|(_, r)| (r.pickup_time().date(), r.pickup_time().hour()))
    {
        let end = start + group.count();
        buckets.push(start..end);
        start = end;
    }
    buckets
}

fn compute_successors(
    rides: &Rides,
    from: RideIdx,
    turnaround: SignedDuration,
    lookahead: SignedDuration,
    estimator: &dyn DistanceEstimator,
) -> Vec<ChainEdge> {
    let ride = rides.get(from);
    let earliest = ride.dropoff_time().saturating_add(turnaround);
    let latest = earliest.saturating_add(lookahead);

    rides
        .picked_up_between(earliest, latest)
        .filter_map(|to| {
            let next = rides.get(to);
            if next.pickup_time() <= ride.pickup_time() {
                return None;
            }
            let dead_head = estimator.travel_time(ride.dropoff_location(), next.pickup_location());
            if earliest.saturating_add(dead_head) <= next.pickup_time() {
                Some(ChainEdge { to, dead_head })
            } else {
                None
            }
        })
        .sorted_by_key(|e| (e.dead_head, e.to))
        .collect()
}
