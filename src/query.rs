use serde::{Deserialize, Serialize};

use crate::DeviceId;
use crate::algorithms::shortest_distances;
use crate::error::Result;
use crate::network::TopologyGraph;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NearestNeighbor {
    pub node: DeviceId,
    pub distance: u32,
}

/// Every node reachable from `start`, closest first, `start` excluded.
pub fn ranked_neighbors(graph: &TopologyGraph, start: &str) -> Result<Vec<NearestNeighbor>> {
    let table = shortest_distances(graph, start)?;

    Ok(table
        .iter()
        .filter(|(node, _)| *node != start)
        .map(|(node, distance)| NearestNeighbor {
            node: node.to_string(),
            distance,
        })
        .collect())
}

/// `Ok(None)` means `start` exists but nothing else is reachable from it.
pub fn nearest_neighbor(graph: &TopologyGraph, start: &str) -> Result<Option<NearestNeighbor>> {
    Ok(ranked_neighbors(graph, start)?.into_iter().next())
}
