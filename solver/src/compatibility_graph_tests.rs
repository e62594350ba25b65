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

use jiff::SignedDuration;
use model::base_types::{RideId, RideIdx};
use model::config::ConfigTravel;
use model::rides::Rides;
use model::test_utilities::{
    at, brooklyn, init_airport_data, jfk, midtown, minutes, ride, times_square,
};
use model::travel_time::{DistanceEstimator, HaversineEstimator};

use crate::compatibility_graph::{ChainEdge, CompatibilityGraph};
use crate::test_utilities::{random_instance, ten_minutes};

fn idx(rides: &Rides, id: &str) -> RideIdx {
    rides.idx_of(&RideId::from(id)).unwrap()
}

#[test]
fn airport_graph_test() {
    // ARRANGE
    let d = init_airport_data();
    let estimator = HaversineEstimator::from_config(&ConfigTravel::default());
    let (r1, r2, r3) = (idx(&d.rides, "R1"), idx(&d.rides, "R2"), idx(&d.rides, "R3"));

    // ACT
    let graph = CompatibilityGraph::build(
        &d.rides,
        SignedDuration::ZERO,
        minutes(12 * 60),
        &estimator,
    );

    // ASSERT
    assert_eq!(graph.number_of_rides(), 3);
    assert_eq!(graph.number_of_edges(), 1);
    assert_eq!(
        graph.chain_edges(r1),
        &[ChainEdge {
            to: r2,
            dead_head: SignedDuration::ZERO
        }]
    );
    // Brooklyn to JFK takes more than the 35 minutes between drop-off and pickup
    assert!(!graph.has_edge(r3, r2));
    // R3 is picked up before R1 is dropped off
    assert!(!graph.has_edge(r1, r3));

    assert!(graph.chain_edges(r2).is_empty());
    assert!(graph.chain_edges(r3).is_empty());
}

#[test]
fn turnaround_and_lookahead_test() {
    let d = init_airport_data();
    let (r1, r2) = (idx(&d.rides, "R1"), idx(&d.rides, "R2"));

    let with_turnaround =
        CompatibilityGraph::build(&d.rides, minutes(30), minutes(12 * 60), &ten_minutes);
    assert!(with_turnaround.has_edge(r1, r2));

    let with_long_turnaround =
        CompatibilityGraph::build(&d.rides, minutes(31), minutes(12 * 60), &ten_minutes);
    assert!(!with_long_turnaround.has_edge(r1, r2));

    let with_short_lookahead =
        CompatibilityGraph::build(&d.rides, SignedDuration::ZERO, minutes(20), &ten_minutes);
    assert_eq!(with_short_lookahead.number_of_edges(), 0);
}

#[test]
fn successors_are_sorted_by_dead_head_and_pickup_test() {
    let rides = Rides::new(vec![
        ride("A", at(8, 0), midtown(), jfk(), 60),
        ride("B", at(9, 30), brooklyn(), times_square(), 30),
        ride("C", at(9, 45), jfk(), midtown(), 30),
        ride("D", at(9, 20), jfk(), brooklyn(), 30),
        ride("E", at(9, 20), times_square(), brooklyn(), 30),
    ])
    .unwrap();

    let graph = CompatibilityGraph::build(&rides, SignedDuration::ZERO, minutes(600), &ten_minutes);

    let successors: Vec<String> = graph
        .chain_edges(idx(&rides, "A"))
        .iter()
        .map(|e| rides.get(e.to).id().to_string())
        .collect();
    assert_eq!(successors, vec!["D", "C", "E", "B"]);
}

#[test]
fn equal_pickup_times_give_no_edge_test() {
    let rides = Rides::new(vec![
        ride("A", at(9, 0), midtown(), midtown(), 0),
        ride("B", at(9, 0), midtown(), jfk(), 30),
    ])
    .unwrap();

    let graph = CompatibilityGraph::build(&rides, SignedDuration::ZERO, minutes(600), &ten_minutes);

    assert_eq!(graph.number_of_edges(), 0);
}

#[test]
fn parallel_build_matches_pairwise_condition_test() {
    let d = random_instance(7, 120, 10, false);
    let estimator = HaversineEstimator::new(24.14);
    let turnaround = minutes(5);

    let graph = CompatibilityGraph::build(&d.rides, turnaround, minutes(24 * 60), &estimator);

    let mut expected_edges = 0;
    for (a, ride_a) in d.rides.iter() {
        for (b, ride_b) in d.rides.iter() {
            let expected = ride_a.pickup_time() < ride_b.pickup_time()
                && ride_a
                    .dropoff_time()
                    .checked_add(turnaround)
                    .unwrap()
                    .checked_add(
                        estimator.travel_time(ride_a.dropoff_location(), ride_b.pickup_location()),
                    )
                    .unwrap()
                    <= ride_b.pickup_time();
            if expected {
                expected_edges += 1;
            }
            assert_eq!(graph.has_edge(a, b), expected, "edge {} -> {}", a, b);
        }
        // edges point forward in pickup order
        assert!(graph.chain_edges(a).iter().all(|e| e.to > a));
    }
    assert_eq!(graph.number_of_edges(), expected_edges);
}
