use log::{debug, info, warn};

use crate::DeviceId;
use crate::protocol::{CollectionPass, DeviceObservations, NeighborObservation, PortCostMap};
use super::{EdgeUpdate, GraphEdge, TopologyGraph};

pub const DEFAULT_PORT_COST: u32 = 1;

/// Accumulates per-device observations into one graph.
///
/// Calls must be serialized: the collector drains per-device results from a
/// channel and is the only writer. Once a pass is folded in, hand out
/// `graph()` for read-only queries.
#[derive(Debug, Clone)]
pub struct TopologyBuilder {
    graph: TopologyGraph,
    default_cost: u32,
}

impl TopologyBuilder {
    pub fn new() -> Self {
        Self::with_default_cost(DEFAULT_PORT_COST)
    }

    /// Cost used for a neighbor port that has no spanning-tree entry.
    pub fn with_default_cost(default_cost: u32) -> Self {
        Self {
            graph: TopologyGraph::new(),
            default_cost,
        }
    }

    pub fn add_device_observations(
        &mut self,
        device: &str,
        neighbors: &[NeighborObservation],
        port_costs: &PortCostMap,
    ) {
        // Un equipement qui a repondu reste interrogeable meme sans voisin
        self.graph.add_node(device);

        for neighbor in neighbors {
            if neighbor.observing_device != device {
                warn!("{}: ignoring observation reported by {}", device, neighbor.observing_device);
                continue;
            }

            let weight = port_costs
                .get(&neighbor.local_port)
                .map(|pc| pc.cost)
                .unwrap_or(self.default_cost);

            match self.graph.merge_edge(device, &neighbor.remote_device, weight) {
                EdgeUpdate::Inserted => {
                    debug!("link {} ({}) <-> {} ({}) cost {}",
                           device, neighbor.local_port, neighbor.remote_device, neighbor.remote_port, weight);
                }
                EdgeUpdate::Lowered { previous } => {
                    debug!("link {} <-> {} cost lowered {} -> {}",
                           device, neighbor.remote_device, previous, weight);
                }
                EdgeUpdate::Unchanged => {}
                EdgeUpdate::SelfLoop => {
                    debug!("{}: dropping self-referential neighbor on {}", device, neighbor.local_port);
                }
            }
        }
    }

    pub fn add(&mut self, observations: &DeviceObservations) {
        self.add_device_observations(&observations.device, &observations.neighbors, &observations.port_costs);
    }

    pub fn add_pass(&mut self, pass: &CollectionPass) {
        for observations in &pass.observations {
            self.add(observations);
        }
        info!("pass {} merged: {} devices reported, {} failed, graph has {} nodes / {} links",
              pass.id, pass.observations.len(), pass.failures.len(),
              self.graph.node_count(), self.graph.edge_count());
    }

    pub fn edges(&self) -> Vec<GraphEdge> {
        self.graph.edges().to_vec()
    }

    pub fn nodes(&self) -> Vec<DeviceId> {
        self.graph.nodes().map(str::to_string).collect()
    }

    pub fn graph(&self) -> &TopologyGraph {
        &self.graph
    }

    pub fn into_graph(self) -> TopologyGraph {
        self.graph
    }

    pub fn reset(&mut self) {
        self.graph.clear();
    }
}

impl Default for TopologyBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::PortCost;

    fn costs(device: &str, entries: &[(&str, u32)]) -> PortCostMap {
        entries
            .iter()
            .map(|(port, cost)| {
                (port.to_string(), PortCost {
                    observing_device: device.to_string(),
                    local_port: port.to_string(),
                    cost: *cost,
                })
            })
            .collect()
    }

    #[test]
    fn registers_both_endpoints_from_one_side() {
        let mut builder = TopologyBuilder::new();
        let neighbors = vec![NeighborObservation::new("sw-01", "Gi1/0/1", "sw-02", "Gi1/0/48")];

        builder.add_device_observations("sw-01", &neighbors, &PortCostMap::new());

        assert_eq!(builder.nodes(), vec!["sw-01".to_string(), "sw-02".to_string()]);
        assert_eq!(builder.edges(), vec![GraphEdge {
            node_a: "sw-01".into(),
            node_b: "sw-02".into(),
            weight: DEFAULT_PORT_COST,
        }]);
    }

    #[test]
    fn uses_port_cost_and_configured_default() {
        let mut builder = TopologyBuilder::with_default_cost(7);
        let neighbors = vec![
            NeighborObservation::new("sw-01", "Gi1/0/1", "sw-02", "Gi1/0/1"),
            NeighborObservation::new("sw-01", "Gi1/0/2", "sw-03", "Gi1/0/1"),
        ];

        builder.add_device_observations("sw-01", &neighbors, &costs("sw-01", &[("Gi1/0/1", 19)]));

        let graph = builder.graph();
        assert_eq!(graph.edge("sw-01", "sw-02").unwrap().weight, 19);
        assert_eq!(graph.edge("sw-01", "sw-03").unwrap().weight, 7);
    }

    #[test]
    fn merge_keeps_minimum_in_either_order() {
        let a_side = vec![NeighborObservation::new("A", "p1", "B", "p9")];
        let b_side = vec![NeighborObservation::new("B", "p9", "A", "p1")];
        let a_costs = costs("A", &[("p1", 19)]);
        let b_costs = costs("B", &[("p9", 4)]);

        let mut forward = TopologyBuilder::new();
        forward.add_device_observations("A", &a_side, &a_costs);
        forward.add_device_observations("B", &b_side, &b_costs);

        let mut backward = TopologyBuilder::new();
        backward.add_device_observations("B", &b_side, &b_costs);
        backward.add_device_observations("A", &a_side, &a_costs);

        assert_eq!(forward.graph().edge("A", "B").unwrap().weight, 4);
        assert_eq!(backward.graph().edge("A", "B").unwrap().weight, 4);
        assert_eq!(forward.graph().edge_count(), 1);
        assert_eq!(backward.graph().edge_count(), 1);
    }

    #[test]
    fn zero_cost_link_is_kept() {
        let mut builder = TopologyBuilder::new();
        let neighbors = vec![NeighborObservation::new("A", "Po1", "B", "Po1")];
        builder.add_device_observations("A", &neighbors, &costs("A", &[("Po1", 0)]));
        assert_eq!(builder.graph().edge("A", "B").unwrap().weight, 0);
    }

    #[test]
    fn re_adding_same_observations_is_idempotent() {
        let neighbors = vec![
            NeighborObservation::new("A", "p1", "B", "p1"),
            NeighborObservation::new("A", "p2", "C", "p1"),
        ];
        let port_costs = costs("A", &[("p1", 4), ("p2", 19)]);

        let mut once = TopologyBuilder::new();
        once.add_device_observations("A", &neighbors, &port_costs);

        let mut twice = once.clone();
        twice.add_device_observations("A", &neighbors, &port_costs);

        assert_eq!(once.graph(), twice.graph());
        assert_eq!(once.nodes(), twice.nodes());
        assert_eq!(once.edges(), twice.edges());
    }

    #[test]
    fn self_loop_never_becomes_an_edge() {
        let mut builder = TopologyBuilder::new();
        let neighbors = vec![NeighborObservation::new("A", "p1", "A", "p2")];

        builder.add_device_observations("A", &neighbors, &PortCostMap::new());

        assert!(builder.edges().is_empty());
        assert_eq!(builder.nodes(), vec!["A".to_string()]);
    }

    #[test]
    fn reporting_device_without_neighbors_is_a_node() {
        let mut builder = TopologyBuilder::new();
        builder.add_device_observations("idf-3", &[], &PortCostMap::new());
        assert!(builder.graph().contains_node("idf-3"));
    }

    #[test]
    fn reset_clears_the_union() {
        let mut builder = TopologyBuilder::new();
        let neighbors = vec![NeighborObservation::new("A", "p1", "B", "p1")];
        builder.add_device_observations("A", &neighbors, &PortCostMap::new());

        builder.reset();

        assert!(builder.nodes().is_empty());
        assert!(builder.edges().is_empty());
    }

    #[test]
    fn add_pass_merges_reported_devices_only() {
        let mut pass = CollectionPass::new();
        pass.observations.push(DeviceObservations {
            device: "A".into(),
            neighbors: vec![NeighborObservation::new("A", "p1", "B", "p1")],
            port_costs: PortCostMap::new(),
        });
        pass.failures.push(crate::protocol::CollectionFailure {
            device: "C".into(),
            reason: "timeout".into(),
        });

        let mut builder = TopologyBuilder::new();
        builder.add_pass(&pass);

        assert_eq!(builder.nodes(), vec!["A".to_string(), "B".to_string()]);
        assert!(!builder.graph().contains_node("C"));
    }
}
