use log::debug;
use serde_json::Value;

use super::{DeviceObservations, DeviceRecords, NeighborObservation, NeighborRecord, PortCost, PortCostMap, StpRecord};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseSummary {
    pub dropped_neighbors: usize,
    pub dropped_costs: usize,
}

fn non_empty(field: &Option<String>) -> Option<&str> {
    field.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// Unparsable costs become 0, the source data is otherwise well-formed.
fn coerce_cost(raw: Option<&Value>) -> u32 {
    match raw {
        Some(Value::Number(n)) => n.as_u64().and_then(|c| u32::try_from(c).ok()).unwrap_or(0),
        Some(Value::String(s)) => s.trim().parse::<u32>().unwrap_or(0),
        _ => 0,
    }
}

pub fn parse_neighbor_records(device: &str, records: &[NeighborRecord]) -> (Vec<NeighborObservation>, usize) {
    let mut neighbors = Vec::with_capacity(records.len());
    let mut dropped = 0;

    for record in records {
        match (non_empty(&record.local_interface), non_empty(&record.destination_host)) {
            (Some(local_port), Some(remote_device)) => {
                let remote_port = non_empty(&record.port_id).unwrap_or_default();
                neighbors.push(NeighborObservation::new(device, local_port, remote_device, remote_port));
            }
            _ => {
                debug!("{}: dropping partial CDP entry {:?}", device, record);
                dropped += 1;
            }
        }
    }

    (neighbors, dropped)
}

pub fn parse_stp_records(device: &str, records: &[StpRecord]) -> (PortCostMap, usize) {
    let mut costs = PortCostMap::new();
    let mut dropped = 0;

    for record in records {
        let Some(port) = non_empty(&record.port) else {
            debug!("{}: dropping STP row without port {:?}", device, record);
            dropped += 1;
            continue;
        };

        // Une ligne par instance VLAN : la derniere l'emporte
        costs.insert(port.to_string(), PortCost {
            observing_device: device.to_string(),
            local_port: port.to_string(),
            cost: coerce_cost(record.cost.as_ref()),
        });
    }

    (costs, dropped)
}

pub fn parse_device(device: &str, records: &DeviceRecords) -> (DeviceObservations, ParseSummary) {
    let (neighbors, dropped_neighbors) = parse_neighbor_records(device, &records.neighbors);
    let (port_costs, dropped_costs) = parse_stp_records(device, &records.spanning_tree);

    let observations = DeviceObservations {
        device: device.to_string(),
        neighbors,
        port_costs,
    };

    (observations, ParseSummary { dropped_neighbors, dropped_costs })
}
