use std::collections::HashMap;
use serde::{Deserialize, Serialize};
use crate::DeviceId;

/// Undirected link between two switches. Looked up by the unordered pair,
/// so `{a, b}` and `{b, a}` are the same edge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphEdge {
    pub node_a: DeviceId,
    pub node_b: DeviceId,
    pub weight: u32,
}

impl GraphEdge {
    pub fn connects(&self, a: &str, b: &str) -> bool {
        (self.node_a == a && self.node_b == b) || (self.node_a == b && self.node_b == a)
    }

    pub fn other_end(&self, node: &str) -> Option<&str> {
        if self.node_a == node {
            Some(self.node_b.as_str())
        } else if self.node_b == node {
            Some(self.node_a.as_str())
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeUpdate {
    Inserted,
    Lowered { previous: u32 },
    Unchanged,
    SelfLoop,
}

/// Simple undirected weighted graph: at most one edge per node pair and no
/// self-loops. Nodes and edges keep their first-insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TopologyGraph {
    nodes: Vec<DeviceId>,
    node_index: HashMap<DeviceId, usize>,
    edges: Vec<GraphEdge>,
    edge_index: HashMap<(usize, usize), usize>,
    // node index -> indices into `edges`
    adjacency: Vec<Vec<usize>>,
}

impl TopologyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a node and returns its index. Existing nodes keep theirs.
    pub fn add_node(&mut self, id: &str) -> usize {
        if let Some(&idx) = self.node_index.get(id) {
            return idx;
        }

        let idx = self.nodes.len();
        self.nodes.push(id.to_string());
        self.node_index.insert(id.to_string(), idx);
        self.adjacency.push(Vec::new());
        idx
    }

    /// Inserts the link or, if the pair is already linked, keeps the lower
    /// of the two weights.
    pub fn merge_edge(&mut self, a: &str, b: &str, weight: u32) -> EdgeUpdate {
        if a == b {
            return EdgeUpdate::SelfLoop;
        }

        let ia = self.add_node(a);
        let ib = self.add_node(b);
        let key = (ia.min(ib), ia.max(ib));

        if let Some(&edge_idx) = self.edge_index.get(&key) {
            let edge = &mut self.edges[edge_idx];
            if weight < edge.weight {
                let previous = edge.weight;
                edge.weight = weight;
                return EdgeUpdate::Lowered { previous };
            }
            return EdgeUpdate::Unchanged;
        }

        let edge_idx = self.edges.len();
        self.edges.push(GraphEdge {
            node_a: a.to_string(),
            node_b: b.to_string(),
            weight,
        });
        self.edge_index.insert(key, edge_idx);
        self.adjacency[ia].push(edge_idx);
        self.adjacency[ib].push(edge_idx);
        EdgeUpdate::Inserted
    }

    pub fn contains_node(&self, id: &str) -> bool {
        self.node_index.contains_key(id)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn nodes(&self) -> impl Iterator<Item = &str> {
        self.nodes.iter().map(String::as_str)
    }

    pub fn edges(&self) -> &[GraphEdge] {
        &self.edges
    }

    pub fn edge(&self, a: &str, b: &str) -> Option<&GraphEdge> {
        let ia = *self.node_index.get(a)?;
        let ib = *self.node_index.get(b)?;
        let idx = self.edge_index.get(&(ia.min(ib), ia.max(ib)))?;
        self.edges.get(*idx)
    }

    /// Adjacent nodes with the link weight, in link insertion order.
    pub fn neighbors(&self, id: &str) -> Vec<(&str, u32)> {
        let Some(&idx) = self.node_index.get(id) else {
            return Vec::new();
        };

        self.adjacency[idx]
            .iter()
            .filter_map(|&edge_idx| {
                let edge = &self.edges[edge_idx];
                edge.other_end(id).map(|other| (other, edge.weight))
            })
            .collect()
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
        self.node_index.clear();
        self.edges.clear();
        self.edge_index.clear();
        self.adjacency.clear();
    }
}
