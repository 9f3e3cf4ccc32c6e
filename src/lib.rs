pub mod protocol;
pub mod network;
pub mod algorithms;
pub mod config;
pub mod collector;
pub mod error;
pub mod query;
pub mod report;

pub type DeviceId = String;
pub type PortId = String;

pub use algorithms::{shortest_distances, DistanceTable};
pub use error::TopologyError;
pub use network::{GraphEdge, TopologyBuilder, TopologyGraph};
pub use protocol::{DeviceObservations, NeighborObservation, PortCost};
pub use query::{nearest_neighbor, ranked_neighbors, NearestNeighbor};
