use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use anyhow::{Context, Result};

use crate::DeviceId;
use crate::error::TopologyError;
use crate::network::DEFAULT_PORT_COST;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TopologyConfig {
    pub devices: Vec<DeviceConfig>,
    pub records_dir: PathBuf,
    pub report_dir: PathBuf,
    pub default_port_cost: u32,
    pub max_concurrency: usize,
    pub collection_timeout_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceConfig {
    pub name: DeviceId,
    #[serde(default)]
    pub host: Option<String>,
    /// Site code the switch belongs to, used to scope a pass.
    #[serde(default)]
    pub site: Option<String>,
}

impl Default for TopologyConfig {
    fn default() -> Self {
        Self {
            devices: vec![],
            records_dir: PathBuf::from("records"),
            report_dir: PathBuf::from("."),
            default_port_cost: DEFAULT_PORT_COST,
            max_concurrency: 16,
            collection_timeout_secs: 30,
        }
    }
}

impl DeviceConfig {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            host: None,
            site: None,
        }
    }

    pub fn with_site(mut self, site: &str) -> Self {
        self.site = Some(site.to_string());
        self
    }
}

impl TopologyConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config: TopologyConfig = serde_json::from_str(&content)
            .with_context(|| format!("parsing config {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    pub fn validate(&self) -> std::result::Result<(), TopologyError> {
        if self.max_concurrency == 0 {
            return Err(TopologyError::Config("max_concurrency must be at least 1".into()));
        }
        if self.collection_timeout_secs == 0 {
            return Err(TopologyError::Config("collection_timeout_secs must be at least 1".into()));
        }
        if let Some(dup) = self.devices.iter().enumerate().find_map(|(i, d)| {
            self.devices[..i].iter().any(|o| o.name == d.name).then_some(&d.name)
        }) {
            return Err(TopologyError::Config(format!("device {} listed twice", dup)));
        }
        Ok(())
    }

    pub fn collection_timeout(&self) -> Duration {
        Duration::from_secs(self.collection_timeout_secs)
    }

    /// Devices for one pass; `None` keeps the whole inventory.
    pub fn devices_for_site(&self, site: Option<&str>) -> Vec<&DeviceConfig> {
        match site {
            Some(code) => self.devices
                .iter()
                .filter(|d| d.site.as_deref().is_some_and(|s| s.eq_ignore_ascii_case(code)))
                .collect(),
            None => self.devices.iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_take_defaults() {
        let config: TopologyConfig = serde_json::from_str(r#"{"devices": [{"name": "sw-01"}]}"#).unwrap();

        assert_eq!(config.devices, vec![DeviceConfig::new("sw-01")]);
        assert_eq!(config.default_port_cost, 1);
        assert_eq!(config.max_concurrency, 16);
        assert_eq!(config.collection_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("topology.json");

        let mut config = TopologyConfig::default();
        config.devices.push(DeviceConfig::new("sw-01").with_site("NYC01"));
        config.default_port_cost = 4;
        config.save(&path).unwrap();

        let loaded = TopologyConfig::load(&path).unwrap();
        assert_eq!(loaded.devices, config.devices);
        assert_eq!(loaded.default_port_cost, 4);
    }

    #[test]
    fn rejects_duplicate_devices() {
        let mut config = TopologyConfig::default();
        config.devices = vec![DeviceConfig::new("sw-01"), DeviceConfig::new("sw-01")];
        assert!(matches!(config.validate(), Err(TopologyError::Config(_))));
    }

    #[test]
    fn rejects_zero_concurrency() {
        let config = TopologyConfig { max_concurrency: 0, ..Default::default() };
        assert!(config.validate().is_err());
    }

    #[test]
    fn site_filter_is_case_insensitive() {
        let config = TopologyConfig {
            devices: vec![
                DeviceConfig::new("sw-01").with_site("NYC01"),
                DeviceConfig::new("sw-02").with_site("BOS02"),
                DeviceConfig::new("sw-03"),
            ],
            ..Default::default()
        };

        let names: Vec<_> = config.devices_for_site(Some("nyc01")).iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["sw-01"]);
        assert_eq!(config.devices_for_site(None).len(), 3);
    }
}
