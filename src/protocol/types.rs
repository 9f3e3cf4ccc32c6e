use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{DeviceId, PortId};
use super::NeighborObservation;

/// Spanning-tree path cost measured outward from `observing_device`'s port.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortCost {
    pub observing_device: DeviceId,
    pub local_port: PortId,
    pub cost: u32,
}

pub type PortCostMap = HashMap<PortId, PortCost>;

/// Everything one device reported during a pass, already normalized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceObservations {
    pub device: DeviceId,
    pub neighbors: Vec<NeighborObservation>,
    pub port_costs: PortCostMap,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectionFailure {
    pub device: DeviceId,
    pub reason: String,
}

/// Result of one scan over the inventory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectionPass {
    pub id: Uuid,
    pub started_at: DateTime<Utc>,
    pub observations: Vec<DeviceObservations>,
    pub failures: Vec<CollectionFailure>,
}

impl CollectionPass {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            started_at: Utc::now(),
            observations: Vec::new(),
            failures: Vec::new(),
        }
    }

    pub fn reported_devices(&self) -> Vec<&str> {
        self.observations.iter().map(|o| o.device.as_str()).collect()
    }

    pub fn failed_devices(&self) -> Vec<&str> {
        self.failures.iter().map(|f| f.device.as_str()).collect()
    }
}

impl Default for CollectionPass {
    fn default() -> Self {
        Self::new()
    }
}
