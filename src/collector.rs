use async_trait::async_trait;
use log::{debug, error, info, warn};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, Semaphore};

use crate::config::{DeviceConfig, TopologyConfig};
use crate::error::{Result, TopologyError};
use crate::protocol::{parse_device, CollectionFailure, CollectionPass, DeviceObservations, DeviceRecords};

/// Retrieves raw `show cdp neighbors detail` / `show spanning-tree` output for
/// one device. Transport, credentials and retries live behind this trait.
#[async_trait]
pub trait DeviceCommandExecutor: Send + Sync {
    async fn collect(&self, device: &DeviceConfig) -> Result<DeviceRecords>;
}

/// Replays captured command output from `<records_dir>/<device>.json`.
pub struct JsonRecordExecutor {
    records_dir: PathBuf,
}

impl JsonRecordExecutor {
    pub fn new(records_dir: impl AsRef<Path>) -> Self {
        Self {
            records_dir: records_dir.as_ref().to_path_buf(),
        }
    }

    fn path_for(&self, device: &str) -> PathBuf {
        self.records_dir.join(format!("{}.json", device))
    }
}

#[async_trait]
impl DeviceCommandExecutor for JsonRecordExecutor {
    async fn collect(&self, device: &DeviceConfig) -> Result<DeviceRecords> {
        let path = self.path_for(&device.name);
        let content = tokio::fs::read_to_string(&path).await.map_err(|e| TopologyError::DeviceCollection {
            device: device.name.clone(),
            reason: format!("{}: {}", path.display(), e),
        })?;

        serde_json::from_str(&content).map_err(|e| TopologyError::MalformedObservation {
            device: device.name.clone(),
            reason: e.to_string(),
        })
    }
}

enum DeviceOutcome {
    Reported(DeviceObservations),
    Failed(CollectionFailure),
}

/// Fans collection out to one task per device. Each task hands back its own
/// immutable result over a channel; nothing is shared between them.
pub struct Collector<E> {
    executor: Arc<E>,
    max_concurrency: usize,
    timeout: Duration,
}

impl<E: DeviceCommandExecutor + 'static> Collector<E> {
    pub fn new(executor: E, max_concurrency: usize, timeout: Duration) -> Self {
        Self {
            executor: Arc::new(executor),
            max_concurrency: max_concurrency.max(1),
            timeout,
        }
    }

    pub fn from_config(executor: E, config: &TopologyConfig) -> Self {
        Self::new(executor, config.max_concurrency, config.collection_timeout())
    }

    /// Runs one pass. Failed devices are recorded and skipped, never
    /// partially merged. Observations come back in inventory order so the
    /// graph built from them is the same whatever order tasks finish in.
    pub async fn run_pass(&self, devices: &[DeviceConfig]) -> CollectionPass {
        let mut pass = CollectionPass::new();
        info!("pass {}: collecting from {} devices", pass.id, devices.len());

        let (tx, mut rx) = mpsc::channel(devices.len().max(1));
        let permits = Arc::new(Semaphore::new(self.max_concurrency));

        for (idx, device) in devices.iter().cloned().enumerate() {
            let tx = tx.clone();
            let executor = self.executor.clone();
            let permits = permits.clone();
            let timeout = self.timeout;

            tokio::spawn(async move {
                let outcome = match permits.acquire_owned().await {
                    Ok(_permit) => collect_device(executor.as_ref(), &device, timeout).await,
                    Err(e) => DeviceOutcome::Failed(CollectionFailure {
                        device: device.name.clone(),
                        reason: e.to_string(),
                    }),
                };
                let _ = tx.send((idx, outcome)).await;
            });
        }
        drop(tx);

        let mut outcomes: Vec<Option<DeviceOutcome>> = devices.iter().map(|_| None).collect();
        while let Some((idx, outcome)) = rx.recv().await {
            outcomes[idx] = Some(outcome);
        }

        for (device, outcome) in devices.iter().zip(outcomes) {
            match outcome {
                Some(DeviceOutcome::Reported(observations)) => pass.observations.push(observations),
                Some(DeviceOutcome::Failed(failure)) => {
                    warn!("{}: collection failed: {}", failure.device, failure.reason);
                    pass.failures.push(failure);
                }
                None => {
                    error!("{}: collection task aborted", device.name);
                    pass.failures.push(CollectionFailure {
                        device: device.name.clone(),
                        reason: "collection task aborted".to_string(),
                    });
                }
            }
        }

        info!("pass {}: {} reported, {} failed", pass.id, pass.observations.len(), pass.failures.len());
        pass
    }
}

async fn collect_device<E: DeviceCommandExecutor + ?Sized>(
    executor: &E,
    device: &DeviceConfig,
    timeout: Duration,
) -> DeviceOutcome {
    debug!("{}: collecting", device.name);

    let records = match tokio::time::timeout(timeout, executor.collect(device)).await {
        Ok(Ok(records)) => records,
        Ok(Err(e)) => {
            return DeviceOutcome::Failed(CollectionFailure {
                device: device.name.clone(),
                reason: e.to_string(),
            });
        }
        Err(_) => {
            return DeviceOutcome::Failed(CollectionFailure {
                device: device.name.clone(),
                reason: format!("timed out after {:?}", timeout),
            });
        }
    };

    let (observations, summary) = parse_device(&device.name, &records);
    info!("{}: {} neighbors, {} port costs ({} partial CDP entries, {} STP rows dropped)",
          device.name, observations.neighbors.len(), observations.port_costs.len(),
          summary.dropped_neighbors, summary.dropped_costs);

    DeviceOutcome::Reported(observations)
}
