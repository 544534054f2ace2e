/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Store layer: device models, topology and stored intent configurations.
//!
//! The engine reads everything it orchestrates over through [`ConfigStore`].
//! Production deployments bind the trait to their key-value store; this crate
//! ships [`MemoryStore`](memory::MemoryStore), a snapshot implementation that
//! loads from a YAML file and backs tests and lab setups.
//!
//! Store failures are retryable from the caller's point of view; whether one
//! is fatal depends on where it strikes — see the engine's propagation rules.

pub mod memory;

use async_trait::async_trait;
use thiserror::Error;

use crate::device::DeviceModel;
use crate::intent::IntentMessage;
use crate::topology::Topology;

// ── StoreError ────────────────────────────────────────────────────────────────

/// Registry/topology/configuration fetch failure.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    #[error("no store entry for '{key}'")]
    NotFound { key: String },

    #[error("store unavailable: {detail}")]
    Unavailable { detail: String },
}

// ── ConfigStore ───────────────────────────────────────────────────────────────

/// Read access to the device-model registry, the topology and the stored
/// intent configurations.
#[async_trait]
pub trait ConfigStore: Send + Sync {
    /// Schema snapshot of one device.
    async fn get_device_model(&self, node_id: &str) -> Result<DeviceModel, StoreError>;

    async fn get_topology(&self) -> Result<Topology, StoreError>;

    /// A stored intent configuration by request id.
    async fn get_configuration(&self, id: &str) -> Result<IntentMessage, StoreError>;

    /// Id of the most recently stored configuration, if any.  Used to
    /// re-apply the last known state at service start.
    async fn last_configuration_id(&self) -> Result<Option<String>, StoreError>;
}
