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

use crate::min_cost_flow::{FlowNetwork, FlowResult};

#[test]
fn two_disjoint_paths_test() {
    let mut network = FlowNetwork::new(4);
    network.add_arc(0, 1, 1, -5);
    network.add_arc(0, 2, 1, -3);
    network.add_arc(1, 3, 1, 0);
    network.add_arc(2, 3, 1, 0);

    let result = network.successive_shortest_paths(0, 3, 2);

    assert_eq!(
        result,
        FlowResult {
            flow: 2,
            cost: -8,
            augmentations: 2
        }
    );
}

#[test]
fn flow_limit_test() {
    let mut network = FlowNetwork::new(4);
    network.add_arc(0, 1, 1, -5);
    network.add_arc(0, 2, 1, -3);
    network.add_arc(1, 3, 1, 0);
    network.add_arc(2, 3, 1, 0);

    let result = network.successive_shortest_paths(0, 3, 1);

    assert_eq!(result.flow, 1);
    assert_eq!(result.cost, -5);
    assert_eq!(network.flow(0), 1);
    assert_eq!(network.flow(1), 0);
}

#[test]
fn stops_at_non_negative_path_test() {
    let mut network = FlowNetwork::new(3);
    network.add_arc(0, 1, 1, -2);
    network.add_arc(0, 1, 1, 3);
    network.add_arc(1, 2, 2, 0);

    let result = network.successive_shortest_paths(0, 2, 5);

    assert_eq!(result.flow, 1);
    assert_eq!(result.cost, -2);
    assert_eq!(network.flow(1), 0);
}

#[test]
fn rerouting_over_reverse_arc_test() {
    // s = 0, a = 1, b = 2, t = 3
    let mut network = FlowNetwork::new(4);
    let s_a = network.add_arc(0, 1, 1, -1);
    let a_b = network.add_arc(1, 2, 1, -3);
    let b_t = network.add_arc(2, 3, 1, -1);
    let s_b = network.add_arc(0, 2, 1, -2);
    let a_t = network.add_arc(1, 3, 1, -2);

    let result = network.successive_shortest_paths(0, 3, 2);

    // first s-a-b-t (-5), then s-b-a-t over the reverse of a-b (-1)
    assert_eq!(
        result,
        FlowResult {
            flow: 2,
            cost: -6,
            augmentations: 2
        }
    );
    assert_eq!(
        vec![
            network.flow(s_a),
            network.flow(a_b),
            network.flow(b_t),
            network.flow(s_b),
            network.flow(a_t)
        ],
        vec![1, 0, 1, 1, 1]
    );
}

#[test]
fn unreachable_sink_test() {
    let mut network = FlowNetwork::new(4);
    network.add_arc(0, 1, 1, -5);
    network.add_arc(2, 3, 1, -5);

    let result = network.successive_shortest_paths(0, 3, 1);

    assert_eq!(result.flow, 0);
    assert_eq!(result.augmentations, 0);
}

#[test]
fn arcs_and_flow_arcs_test() {
    let mut network = FlowNetwork::new(3);
    network.add_arc(0, 1, 2, -4);
    network.add_arc(1, 2, 1, 1);
    network.add_arc(0, 2, 1, 7);

    assert_eq!(network.number_of_arcs(), 3);
    assert_eq!(
        network.arcs().collect::<Vec<_>>(),
        vec![(0, 1, 2, -4), (1, 2, 1, 1), (0, 2, 1, 7)]
    );

    network.successive_shortest_paths(0, 2, 2);

    // the original capacities are reported after solving
    assert_eq!(network.arcs().next(), Some((0, 1, 2, -4)));
    assert_eq!(network.flow_arcs_from(0).collect::<Vec<_>>(), vec![(0, 1)]);
    assert_eq!(network.flow_arcs_from(1).collect::<Vec<_>>(), vec![(1, 2)]);
}
