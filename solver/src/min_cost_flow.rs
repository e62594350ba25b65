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
#[path = "min_cost_flow_tests.rs"]
mod min_cost_flow_tests;

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use model::base_types::Cost;

pub type NodeIdx = usize;
pub type ArcIdx = usize;
pub type Capacity = i64;

#[derive(Clone, Copy, Debug)]
struct ResidualArc {
    to: NodeIdx,
    capacity: Capacity, // residual capacity
    cost: Cost,
}

/// Outcome of successive shortest paths.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FlowResult {
    pub flow: Capacity,
    pub cost: Cost,
    pub augmentations: usize,
}

/// A flow network solved by successive shortest augmenting paths with vertex potentials.
///
/// Arcs are stored in pairs: arc `2k` is the k-th added arc, arc `2k + 1` its residual
/// reverse. The nodes must be numbered in a topological order of the original arcs (which is
/// used to compute the initial potentials in one pass even with negative costs).
pub struct FlowNetwork {
    arcs: Vec<ResidualArc>,
    tails: Vec<NodeIdx>,
    original_capacities: Vec<Capacity>,
    adjacency: Vec<Vec<ArcIdx>>,
}

// static functions
impl FlowNetwork {
    pub fn new(number_of_nodes: usize) -> FlowNetwork {
        FlowNetwork {
            arcs: Vec::new(),
            tails: Vec::new(),
            original_capacities: Vec::new(),
            adjacency: vec![Vec::new(); number_of_nodes],
        }
    }
}

// methods
impl FlowNetwork {
    pub fn number_of_nodes(&self) -> usize {
        self.adjacency.len()
    }

    pub fn number_of_arcs(&self) -> usize {
        self.original_capacities.len()
    }

    /// adds an arc and returns its index; `from` must come before `to` in the node order
    pub fn add_arc(&mut self, from: NodeIdx, to: NodeIdx, capacity: Capacity, cost: Cost) -> ArcIdx {
        let idx = self.arcs.len();
        self.arcs.push(ResidualArc { to, capacity, cost });
        self.arcs.push(ResidualArc {
            to: from,
            capacity: 0,
            cost: -cost,
        });
        self.tails.push(from);
        self.tails.push(to);
        self.original_capacities.push(capacity);
        self.adjacency[from].push(idx);
        self.adjacency[to].push(idx + 1);
        idx / 2
    }

    pub fn flow(&self, arc: ArcIdx) -> Capacity {
        self.arcs[2 * arc + 1].capacity
    }

    /// all added arcs as (from, to, capacity, cost) in insertion order
    pub fn arcs(&self) -> impl Iterator<Item = (NodeIdx, NodeIdx, Capacity, Cost)> + '_ {
        (0..self.number_of_arcs()).map(|a| {
            let arc = &self.arcs[2 * a];
            (self.tails[2 * a], arc.to, self.original_capacities[a], arc.cost)
        })
    }

    /// added arcs leaving the node that carry flow, in insertion order
    pub fn flow_arcs_from(&self, node: NodeIdx) -> impl Iterator<Item = (ArcIdx, NodeIdx)> + '_ {
        self.adjacency[node]
            .iter()
            .filter(|&&a| a % 2 == 0 && self.arcs[a + 1].capacity > 0)
            .map(|&a| (a / 2, self.arcs[a].to))
    }

    /// Sends up to `max_flow` units from source to sink, one unit per augmentation, as long as
    /// the cheapest augmenting path has negative cost. As the cost of a min-cost flow is convex
    /// in the flow value, the result is a cheapest flow among all flows of value at most
    /// `max_flow`.
    pub fn successive_shortest_paths(
        &mut self,
        source: NodeIdx,
        sink: NodeIdx,
        max_flow: Capacity,
    ) -> FlowResult {
        let mut potentials = self.initial_potentials(source);
        let mut result = FlowResult {
            flow: 0,
            cost: 0,
            augmentations: 0,
        };

        while result.flow < max_flow {
            let Some((path_cost, predecessors)) = self.shortest_path(source, sink, &mut potentials)
            else {
                break;
            };
            if path_cost >= 0 {
                break;
            }
            self.augment_one_unit(source, sink, &predecessors);
            result.flow += 1;
            result.cost += path_cost;
            result.augmentations += 1;
        }
        result
    }

    // shortest distances from the source in the original network, by one pass in node order
    fn initial_potentials(&self, source: NodeIdx) -> Vec<Option<Cost>> {
        let mut distances: Vec<Option<Cost>> = vec![None; self.number_of_nodes()];
        distances[source] = Some(0);
        for node in 0..self.number_of_nodes() {
            let Some(distance) = distances[node] else {
                continue;
            };
            for &a in self.adjacency[node].iter() {
                let arc = &self.arcs[a];
                if arc.capacity <= 0 {
                    continue;
                }
                let candidate = distance + arc.cost;
                if distances[arc.to].map_or(true, |d| candidate < d) {
                    distances[arc.to] = Some(candidate);
                }
            }
        }
        distances
    }

    // Dijkstra on reduced costs. Returns the real cost of the path and the predecessor arcs,
    // and updates the potentials.
    fn shortest_path(
        &self,
        source: NodeIdx,
        sink: NodeIdx,
        potentials: &mut [Option<Cost>],
    ) -> Option<(Cost, Vec<Option<ArcIdx>>)> {
        let n = self.number_of_nodes();
        let mut distances: Vec<Option<Cost>> = vec![None; n];
        let mut predecessors: Vec<Option<ArcIdx>> = vec![None; n];
        let mut done = vec![false; n];
        let mut heap = BinaryHeap::new();

        distances[source] = Some(0);
        heap.push(Reverse((0, source)));

        while let Some(Reverse((distance, node))) = heap.pop() {
            if done[node] {
                continue;
            }
            done[node] = true;
            let Some(node_potential) = potentials[node] else {
                continue;
            };
            for &a in self.adjacency[node].iter() {
                let arc = &self.arcs[a];
                if arc.capacity <= 0 || done[arc.to] {
                    continue;
                }
                let Some(to_potential) = potentials[arc.to] else {
                    continue;
                };
                let reduced_cost = arc.cost + node_potential - to_potential;
                let candidate = distance + reduced_cost;
                if distances[arc.to].map_or(true, |d| candidate < d) {
                    distances[arc.to] = Some(candidate);
                    predecessors[arc.to] = Some(a);
                    heap.push(Reverse((candidate, arc.to)));
                }
            }
        }

        let sink_distance = distances[sink]?;
        let sink_potential = potentials[sink]?;
        let source_potential = potentials[source]?;
        let path_cost = sink_distance + sink_potential - source_potential;

        // Nodes that are not reached now are never reached again (augmenting only adds reverse
        // arcs between reached nodes), so their potentials are left as they are.
        for (potential, distance) in potentials.iter_mut().zip(distances.iter()) {
            if let (Some(p), Some(d)) = (potential.as_mut(), distance) {
                *p += d;
            }
        }
        Some((path_cost, predecessors))
    }

    fn augment_one_unit(&mut self, source: NodeIdx, sink: NodeIdx, predecessors: &[Option<ArcIdx>]) {
        let mut node = sink;
        while node != source {
            let Some(a) = predecessors[node] else {
                break;
            };
            self.arcs[a].capacity -= 1;
            self.arcs[a ^ 1].capacity += 1;
            node = self.tails[a];
        }
    }
}
