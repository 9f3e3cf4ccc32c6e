use serde::{Deserialize, Serialize};

/// One row of `show cdp neighbors detail`, as emitted by the structured
/// command parser. Every field is optional: non-switch neighbors (phones,
/// access points) routinely leave some of them out.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NeighborRecord {
    #[serde(default)]
    pub local_interface: Option<String>,
    #[serde(default)]
    pub destination_host: Option<String>,
    #[serde(default)]
    pub port_id: Option<String>,
}

/// One row of `show spanning-tree`. `cost` arrives either as a number or as
/// the raw text column.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StpRecord {
    #[serde(default)]
    pub port: Option<String>,
    #[serde(default)]
    pub cost: Option<serde_json::Value>,
}

/// Raw command output for a single device.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeviceRecords {
    #[serde(default)]
    pub neighbors: Vec<NeighborRecord>,
    #[serde(default)]
    pub spanning_tree: Vec<StpRecord>,
}

impl NeighborRecord {
    pub fn new(local_interface: &str, destination_host: &str, port_id: &str) -> Self {
        Self {
            local_interface: Some(local_interface.to_string()),
            destination_host: Some(destination_host.to_string()),
            port_id: Some(port_id.to_string()),
        }
    }
}

impl StpRecord {
    pub fn new(port: &str, cost: u32) -> Self {
        Self {
            port: Some(port.to_string()),
            cost: Some(serde_json::Value::from(cost)),
        }
    }
}
