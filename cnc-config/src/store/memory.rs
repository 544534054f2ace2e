/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! In-memory store snapshot, optionally loaded from a YAML file.
//!
//! The expected YAML structure is:
//! ```yaml
//! topology:
//!   nodes:
//!     - id: sw1
//!       management:
//!         ip_address: 192.168.4.64
//!         username: admin
//!         protocol: netconf
//!       ports:
//!         - name: sw0p2
//! device_models:
//!   sw1:
//!     - name: ieee802-dot1q-sched
//!       revision: "2018-09-10"
//!     - name: ieee802-dot1q-sched-bridge
//!       revision: "2018-09-10"
//! configurations:
//!   req-001:
//!     feature: qbv
//!     schedule_id: shaper-a
//!     base_time_ns: 0
//!     cycle_time_ns: 1000000
//!     admin_state: enabled
//!     entries:
//!       - index: 0
//!         time_interval_ns: 500000
//!         gate_states: [0xff]
//! last_configuration: req-001
//! ```

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use tracing::info;

use super::{ConfigStore, StoreError};
use crate::device::DeviceModel;
use crate::intent::IntentMessage;
use crate::topology::Topology;

/// File layout; kept private — callers work with [`MemoryStore`].
#[derive(Debug, Default, Deserialize)]
struct StoreFile {
    #[serde(default)]
    topology: Topology,
    #[serde(default)]
    device_models: HashMap<String, DeviceModel>,
    #[serde(default)]
    configurations: HashMap<String, IntentMessage>,
    #[serde(default)]
    last_configuration: Option<String>,
}

/// Snapshot store: everything is held in memory, reads never fail with
/// `Unavailable`.
#[derive(Debug, Default)]
pub struct MemoryStore {
    topology: Topology,
    device_models: HashMap<String, DeviceModel>,
    configurations: HashMap<String, IntentMessage>,
    last_configuration: Option<String>,
}

impl MemoryStore {
    pub fn new(topology: Topology) -> Self {
        Self {
            topology,
            ..Self::default()
        }
    }

    /// Parses `path` into a full snapshot.
    ///
    /// # Errors
    /// Returns an error if the file cannot be opened or the YAML is
    /// structurally invalid.
    pub fn from_yaml_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("cannot open store file: {}", path.display()))?;

        let file: StoreFile = serde_yaml::from_str(&content)
            .with_context(|| format!("failed to parse store file: {}", path.display()))?;

        info!(
            nodes = file.topology.nodes.len(),
            device_models = file.device_models.len(),
            configurations = file.configurations.len(),
            "store snapshot loaded from {}",
            path.display()
        );

        Ok(Self {
            topology: file.topology,
            device_models: file.device_models,
            configurations: file.configurations,
            last_configuration: file.last_configuration,
        })
    }

    pub fn with_device_model(mut self, node_id: impl Into<String>, model: DeviceModel) -> Self {
        self.device_models.insert(node_id.into(), model);
        self
    }

    pub fn with_configuration(mut self, id: impl Into<String>, intent: IntentMessage) -> Self {
        let id = id.into();
        self.last_configuration = Some(id.clone());
        self.configurations.insert(id, intent);
        self
    }
}

#[async_trait]
impl ConfigStore for MemoryStore {
    async fn get_device_model(&self, node_id: &str) -> Result<DeviceModel, StoreError> {
        self.device_models
            .get(node_id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound {
                key: format!("device-models/{node_id}"),
            })
    }

    async fn get_topology(&self) -> Result<Topology, StoreError> {
        Ok(self.topology.clone())
    }

    async fn get_configuration(&self, id: &str) -> Result<IntentMessage, StoreError> {
        self.configurations
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound {
                key: format!("configurations/{id}"),
            })
    }

    async fn last_configuration_id(&self) -> Result<Option<String>, StoreError> {
        Ok(self.last_configuration.clone())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn store_tempfile(content: &str) -> NamedTempFile {
        let mut f = NamedTempFile::new().unwrap();
        f.write_all(content.as_bytes()).unwrap();
        f
    }

    const FULL_STORE: &str = r#"
topology:
  nodes:
    - id: sw1
      management:
        ip_address: 192.168.4.64
        username: admin
        protocol: netconf
      ports:
        - name: sw0p2
        - name: sw0p3
device_models:
  sw1:
    - name: ieee802-dot1q-sched
      revision: "2018-09-10"
    - name: ieee802-dot1q-sched-bridge
      revision: "2018-09-10"
configurations:
  req-001:
    feature: qbv
    schedule_id: shaper-a
    base_time_ns: 0
    cycle_time_ns: 1000000
    admin_state: enabled
    entries:
      - index: 0
        time_interval_ns: 500000
        gate_states: [255]
last_configuration: req-001
"#;

    #[tokio::test]
    async fn loads_a_full_snapshot_from_yaml() {
        let f = store_tempfile(FULL_STORE);
        let store = MemoryStore::from_yaml_file(f.path()).unwrap();

        let topo = store.get_topology().await.unwrap();
        assert_eq!(topo.nodes.len(), 1);
        assert_eq!(topo.nodes[0].ports.len(), 2);

        let model = store.get_device_model("sw1").await.unwrap();
        assert!(model.has_module("ieee802-dot1q-sched", "2018-09-10"));

        let intent = store.get_configuration("req-001").await.unwrap();
        assert_eq!(intent.feature_name(), "qbv");

        assert_eq!(
            store.last_configuration_id().await.unwrap().as_deref(),
            Some("req-001")
        );
    }

    #[tokio::test]
    async fn missing_keys_surface_as_not_found() {
        let store = MemoryStore::default();

        let err = store.get_device_model("nope").await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));

        let err = store.get_configuration("nope").await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));

        assert_eq!(store.last_configuration_id().await.unwrap(), None);
    }

    #[test]
    fn missing_file_returns_error() {
        assert!(MemoryStore::from_yaml_file(Path::new("/nonexistent/store.yaml")).is_err());
    }

    #[test]
    fn malformed_yaml_returns_error() {
        let f = store_tempfile("topology: [not: a: mapping:::");
        assert!(MemoryStore::from_yaml_file(f.path()).is_err());
    }

    #[test]
    fn empty_file_yields_an_empty_snapshot() {
        let f = store_tempfile("{}\n");
        let store = MemoryStore::from_yaml_file(f.path()).unwrap();
        assert!(store.topology.nodes.is_empty());
        assert!(store.configurations.is_empty());
    }
}
