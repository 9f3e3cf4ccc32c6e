use std::collections::{BinaryHeap, HashMap, HashSet};
use std::cmp::Ordering;

use crate::DeviceId;
use crate::error::{Result, TopologyError};
use crate::network::TopologyGraph;

/// Shortest cumulative cost from one start node to every reachable node.
/// Entries are kept in the order Dijkstra finalized them, which is
/// non-decreasing in distance with ties resolved by discovery order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DistanceTable {
    start: DeviceId,
    entries: Vec<(DeviceId, u32)>,
    index: HashMap<DeviceId, usize>,
}

impl DistanceTable {
    fn new(start: &str) -> Self {
        Self {
            start: start.to_string(),
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }

    fn finalize(&mut self, node: &str, distance: u32) {
        self.index.insert(node.to_string(), self.entries.len());
        self.entries.push((node.to_string(), distance));
    }

    pub fn start(&self) -> &str {
        &self.start
    }

    pub fn get(&self, node: &str) -> Option<u32> {
        self.index.get(node).map(|&i| self.entries[i].1)
    }

    pub fn contains(&self, node: &str) -> bool {
        self.index.contains_key(node)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Ranked from closest to farthest; the start node comes first.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.entries.iter().map(|(node, d)| (node.as_str(), *d))
    }

    pub fn to_map(&self) -> HashMap<DeviceId, u32> {
        self.entries.iter().cloned().collect()
    }
}

#[derive(Debug)]
struct State<'a> {
    cost: u32,
    // ordre de decouverte, departage les egalites
    seq: u64,
    node: &'a str,
}

impl Eq for State<'_> {}

impl PartialEq for State<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.cost == other.cost && self.seq == other.seq
    }
}

impl Ord for State<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering for min-heap
        other.cost.cmp(&self.cost)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for State<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

pub fn shortest_distances(graph: &TopologyGraph, start: &str) -> Result<DistanceTable> {
    if !graph.contains_node(start) {
        return Err(TopologyError::UnknownNode(start.to_string()));
    }

    let mut table = DistanceTable::new(start);
    let mut tentative: HashMap<&str, u32> = HashMap::new();
    let mut discovered: HashMap<&str, u64> = HashMap::new();
    let mut visited: HashSet<&str> = HashSet::new();
    let mut heap = BinaryHeap::new();

    tentative.insert(start, 0);
    discovered.insert(start, 0);
    heap.push(State { cost: 0, seq: 0, node: start });

    while let Some(State { cost, node, .. }) = heap.pop() {
        // Stale entry, a cheaper one was already finalized
        if !visited.insert(node) {
            continue;
        }
        table.finalize(node, cost);

        for (neighbor, link_cost) in graph.neighbors(node) {
            if visited.contains(neighbor) {
                continue;
            }

            let new_cost = cost.saturating_add(link_cost);
            let improved = tentative.get(neighbor).is_none_or(|&known| new_cost < known);

            if improved {
                tentative.insert(neighbor, new_cost);
                let next_seq = discovered.len() as u64;
                let seq = *discovered.entry(neighbor).or_insert(next_seq);
                heap.push(State { cost: new_cost, seq, node: neighbor });
            }
        }
    }

    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle() -> TopologyGraph {
        let mut graph = TopologyGraph::new();
        graph.merge_edge("A", "B", 1);
        graph.merge_edge("B", "C", 2);
        graph.merge_edge("A", "C", 5);
        graph
    }

    #[test]
    fn prefers_cheaper_two_hop_path() {
        let table = shortest_distances(&triangle(), "A").unwrap();

        assert_eq!(table.len(), 3);
        assert_eq!(table.get("A"), Some(0));
        assert_eq!(table.get("B"), Some(1));
        assert_eq!(table.get("C"), Some(3));
        assert_eq!(table.iter().collect::<Vec<_>>(), vec![("A", 0), ("B", 1), ("C", 3)]);
    }

    #[test]
    fn unknown_start_is_an_error() {
        let err = shortest_distances(&triangle(), "Z").unwrap_err();
        assert!(matches!(err, TopologyError::UnknownNode(ref n) if n == "Z"));
    }

    #[test]
    fn isolated_node_only_reaches_itself() {
        let mut graph = triangle();
        graph.add_node("D");

        let table = shortest_distances(&graph, "D").unwrap();

        assert_eq!(table.to_map(), HashMap::from([("D".to_string(), 0)]));
        assert_eq!(table.start(), "D");
    }

    #[test]
    fn unreachable_nodes_are_absent() {
        let mut graph = triangle();
        graph.merge_edge("X", "Y", 1);

        let table = shortest_distances(&graph, "A").unwrap();

        assert!(!table.contains("X"));
        assert!(!table.contains("Y"));
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn equal_distances_follow_discovery_order() {
        let mut graph = TopologyGraph::new();
        graph.merge_edge("root", "sw-09", 4);
        graph.merge_edge("root", "sw-02", 4);
        graph.merge_edge("root", "sw-05", 4);

        let table = shortest_distances(&graph, "root").unwrap();
        let order: Vec<_> = table.iter().map(|(n, _)| n).collect();

        assert_eq!(order, vec!["root", "sw-09", "sw-02", "sw-05"]);
    }

    #[test]
    fn zero_weight_links_are_traversed() {
        let mut graph = TopologyGraph::new();
        graph.merge_edge("A", "B", 0);
        graph.merge_edge("B", "C", 3);

        let table = shortest_distances(&graph, "A").unwrap();

        assert_eq!(table.get("B"), Some(0));
        assert_eq!(table.get("C"), Some(3));
    }

    #[test]
    fn large_costs_saturate() {
        let mut graph = TopologyGraph::new();
        graph.merge_edge("A", "B", u32::MAX);
        graph.merge_edge("B", "C", 10);

        let table = shortest_distances(&graph, "A").unwrap();

        assert_eq!(table.get("C"), Some(u32::MAX));
    }
}
