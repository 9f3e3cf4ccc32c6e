use thiserror::Error;

use crate::DeviceId;

#[derive(Debug, Error)]
pub enum TopologyError {
    /// A raw record was missing a required field. The parser drops these
    /// silently; executors use this variant for payloads they cannot decode.
    #[error("malformed observation from {device}: {reason}")]
    MalformedObservation { device: DeviceId, reason: String },

    #[error("unknown node: {0}")]
    UnknownNode(DeviceId),

    #[error("collection failed for {device}: {reason}")]
    DeviceCollection { device: DeviceId, reason: String },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, TopologyError>;
