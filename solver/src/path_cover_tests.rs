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

use std::collections::HashMap;
use std::sync::Arc;

use model::base_types::{Cost, DriverId, RideId, RideIdx};
use model::config::Config;
use model::drivers::Drivers;
use model::test_utilities::{
    at, brooklyn, driver, init_airport_data, jfk, midtown, minutes, ride, test_data,
    times_square, TestData,
};
use model::travel_time::{DistanceEstimator, HaversineEstimator};
use rs_graph::linkedlistgraph::Edge as RsEdge;
use rs_graph::mcf::network_simplex;
use rs_graph::Buildable;
use rs_graph::Builder;
use rs_graph::LinkedListGraph;

use crate::compatibility_graph::CompatibilityGraph;
use crate::cost_model::CostModel;
use crate::min_cost_flow::Capacity;
use crate::open_batch::OpenBatch;
use crate::path_cover::{CoverSolution, PathCover};
use crate::test_utilities::{random_instance, ten_minutes};

struct EdgeLabel {
    upper_bound: Capacity,
    cost: Cost,
}

fn build_path_cover(d: &TestData, estimator: &dyn DistanceEstimator) -> PathCover {
    build_path_cover_for(d, &OpenBatch::new(d.rides.len(), d.drivers.len()), estimator)
}

fn build_path_cover_for(
    d: &TestData,
    batch: &OpenBatch,
    estimator: &dyn DistanceEstimator,
) -> PathCover {
    let config = Config::default();
    let graph = CompatibilityGraph::build(
        &d.rides,
        config.compatibility.minimal_turnaround,
        config.compatibility.lookahead,
        estimator,
    );
    let cost_model = CostModel::new(&d.drivers, &config.costs).unwrap();
    PathCover::build(
        &graph,
        &cost_model,
        &d.rides,
        &d.drivers,
        batch,
        config.compatibility.minimal_turnaround,
        estimator,
    )
    .unwrap()
}

// optimum of the same network by network simplex, with a free back arc from the sink to the
// source that allows any flow value up to max_chains
fn network_simplex_cost(path_cover: &PathCover) -> Cost {
    let network = path_cover.network();
    let mut builder = LinkedListGraph::<u32>::new_builder();
    let nodes: Vec<_> = (0..network.number_of_nodes())
        .map(|_| builder.add_node())
        .collect();

    let mut edges: HashMap<RsEdge, EdgeLabel> = HashMap::new();
    for (from, to, capacity, cost) in network.arcs() {
        edges.insert(
            builder.add_edge(nodes[from], nodes[to]),
            EdgeLabel {
                upper_bound: capacity,
                cost,
            },
        );
    }
    edges.insert(
        builder.add_edge(nodes[path_cover.sink()], nodes[path_cover.source()]),
        EdgeLabel {
            upper_bound: path_cover.max_chains(),
            cost: 0,
        },
    );
    let graph = builder.into_graph();

    let (cost, _) = network_simplex(
        &graph,
        |_| 0,
        |_| 0,
        |e| edges[&e].upper_bound,
        |e| edges[&e].cost,
    )
    .unwrap();
    cost
}

fn ids(d: &TestData, chain: &[RideIdx]) -> Vec<String> {
    chain
        .iter()
        .map(|&r| d.rides.get(r).id().to_string())
        .collect()
}

fn check_chains(d: &TestData, graph: &CompatibilityGraph, solution: &CoverSolution) {
    let mut covered = vec![false; d.rides.len()];
    for chain in solution.chains.iter() {
        assert!(!chain.is_empty());
        for &ride in chain.iter() {
            assert!(!covered[ride.idx()], "{} covered twice", ride);
            covered[ride.idx()] = true;
        }
        for pair in chain.windows(2) {
            assert!(graph.has_edge(pair[0], pair[1]));
        }
    }
    assert!(solution.chains.len() <= d.drivers.len());
}

#[test]
fn airport_cover_test() {
    // ARRANGE
    let d = init_airport_data();
    let estimator = HaversineEstimator::new(24.14);
    let path_cover = build_path_cover(&d, &estimator);

    // ACT
    let solution = path_cover.solve();

    // ASSERT
    let chains: Vec<Vec<String>> = solution.chains.iter().map(|c| ids(&d, c)).collect();
    assert_eq!(chains.len(), 2);
    assert!(chains.contains(&vec!["R1".to_string(), "R2".to_string()]));
    assert!(chains.contains(&vec!["R3".to_string()]));
    assert_eq!(solution.flow.flow, 2);
    assert_eq!(solution.flow.augmentations, 2);
    // both price tiers are opened and three rides are rewarded, no deadhead between R1 and R2
    assert_eq!(solution.flow.cost, 3600 + 7200 - 3 * solution.reward);
}

#[test]
fn one_driver_takes_the_longest_chain_test() {
    let mut d = init_airport_data();
    d.drivers = Arc::new(Drivers::new(vec![driver("D1", 10.0)]).unwrap());
    let estimator = HaversineEstimator::new(24.14);

    let solution = build_path_cover(&d, &estimator).solve();

    assert_eq!(solution.chains.len(), 1);
    assert_eq!(ids(&d, &solution.chains[0]), vec!["R1", "R2"]);
}

#[test]
fn no_drivers_no_chains_test() {
    let mut d = init_airport_data();
    d.drivers = Arc::new(Drivers::new(vec![]).unwrap());
    let estimator = HaversineEstimator::new(24.14);

    let solution = build_path_cover(&d, &estimator).solve();

    assert!(solution.chains.is_empty());
    assert_eq!(solution.flow.flow, 0);
}

#[test]
fn unreachable_rides_are_not_opened_test() {
    let mut d = init_airport_data();
    // the only driver becomes available after R1 and R3 are picked up
    d.drivers = Arc::new(
        Drivers::new(vec![driver("D1", 10.0)
            .with_availability(Some(at(9, 30)), None)
            .unwrap()])
        .unwrap(),
    );
    let solution = build_path_cover(&d, &ten_minutes).solve();

    assert_eq!(solution.chains.len(), 1);
    assert_eq!(ids(&d, &solution.chains[0]), vec!["R2"]);
    let r2 = d.rides.idx_of(&RideId::from("R2")).unwrap();
    assert_eq!(solution.chains[0], vec![r2]);
}

#[test]
fn driver_that_cannot_start_any_ride_opens_no_chain_test() {
    let d = test_data(
        vec![
            ride("A", at(9, 0), times_square(), jfk(), 60),
            ride("B", at(12, 0), midtown(), brooklyn(), 40),
        ],
        vec![
            driver("X", 10.0),
            driver("Y", 20.0)
                .with_availability(None, Some(at(8, 30)))
                .unwrap(),
        ],
    );

    let path_cover = build_path_cover(&d, &ten_minutes);
    assert_eq!(path_cover.max_chains(), 1);
    let solution = path_cover.solve();

    assert_eq!(solution.chains.len(), 1);
    assert_eq!(ids(&d, &solution.chains[0]), vec!["A", "B"]);
}

#[test]
fn constrained_driver_opens_its_own_chain_test() {
    // the rides overlap, so both drivers are needed
    let d = test_data(
        vec![
            ride("R1", at(9, 0), times_square(), jfk(), 60),
            ride("R2", at(9, 10), times_square(), midtown(), 20),
        ],
        vec![
            driver("X", 10.0),
            driver("Y", 20.0).with_start_location(times_square().location()),
        ],
    );

    let solution = build_path_cover(&d, &ten_minutes).solve();

    assert_eq!(solution.chains.len(), 2);
    // Y has a free approach to both rides, X is pooled
    assert_eq!(solution.flow.cost, 3600 + 7200 - 2 * solution.reward);
}

#[test]
fn committed_rides_and_drivers_are_left_out_test() {
    let d = init_airport_data();
    let mut batch = OpenBatch::new(d.rides.len(), d.drivers.len());
    batch.commit(
        d.drivers.idx_of(&DriverId::from("D1")).unwrap(),
        &[d.rides.idx_of(&RideId::from("R1")).unwrap()],
    );
    let estimator = HaversineEstimator::new(24.14);

    let path_cover = build_path_cover_for(&d, &batch, &estimator);
    assert_eq!(path_cover.max_chains(), 1);
    let solution = path_cover.solve();

    // R3 cannot be followed by R2, so D2 covers only one of them
    assert_eq!(solution.chains.len(), 1);
    assert_eq!(solution.chains[0].len(), 1);
    assert_ne!(ids(&d, &solution.chains[0]), vec!["R1"]);
    // only the price tier of D2 is opened
    assert_eq!(solution.flow.cost, 7200 - solution.reward);
}

#[test]
fn cross_check_with_network_simplex_test() {
    let estimator = HaversineEstimator::new(24.14);
    for seed in 0..12 {
        let constrained = seed % 2 == 1;
        let d = random_instance(seed, 40, 2 + seed as usize % 7, constrained);
        let config = Config::default();
        let graph = CompatibilityGraph::build(
            &d.rides,
            config.compatibility.minimal_turnaround,
            minutes(12 * 60),
            &estimator,
        );
        let path_cover = build_path_cover(&d, &estimator);
        let expected_cost = network_simplex_cost(&path_cover);

        let solution = path_cover.solve();

        assert_eq!(solution.flow.cost, expected_cost, "seed {}", seed);
        check_chains(&d, &graph, &solution);
    }
}
