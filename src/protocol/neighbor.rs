use serde::{Deserialize, Serialize};
use crate::{DeviceId, PortId};

/// An adjacency as seen from `observing_device`'s side only.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NeighborObservation {
    pub observing_device: DeviceId,
    pub local_port: PortId,
    pub remote_device: DeviceId,
    pub remote_port: PortId,
}

impl NeighborObservation {
    pub fn new(observing_device: &str, local_port: &str, remote_device: &str, remote_port: &str) -> Self {
        Self {
            observing_device: observing_device.to_string(),
            local_port: local_port.to_string(),
            remote_device: remote_device.to_string(),
            remote_port: remote_port.to_string(),
        }
    }

    pub fn is_self_loop(&self) -> bool {
        self.observing_device == self.remote_device
    }
}
