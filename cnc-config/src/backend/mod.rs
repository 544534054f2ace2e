/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Protocol backends: per-protocol plugin sets plus dispatch.
//!
//! A backend owns every plugin available for one management protocol and
//! drives the Map→Push pipeline for a single target:
//!
//! ```text
//! map_and_push ─► select_plugin (feature + device capability) ─► map ─► push
//! ```
//!
//! Selection contract: for a correctly configured registry exactly one
//! variant of a feature matches a given device — variants are expected to
//! require mutually exclusive schema revisions.  When more than one matches
//! anyway, the newest required schema revision wins, deterministically; the
//! ambiguity is logged.  Iteration order never decides.

pub mod netconf;
pub mod registry;

pub use netconf::NetconfBackend;
pub use registry::{BackendRegistry, RegistryError};

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::device::DeviceModel;
use crate::intent::IntentMessage;
use crate::plugin::{MappingError, Plugin, PluginError};
use crate::topology::DeviceTarget;

// ── DispatchError ─────────────────────────────────────────────────────────────

/// Failure of one map-and-push attempt against one target, wrapped with the
/// plugin name for diagnostics.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// No registered plugin both maps the feature and is supported by the
    /// device model.  A configuration problem — retrying cannot help.
    #[error("no plugin for feature '{feature}' is supported by the device model")]
    UnsupportedFeature { feature: String },

    #[error("plugin '{plugin}' mapping failed: {source}")]
    Mapping {
        plugin: String,
        #[source]
        source: MappingError,
    },

    #[error("plugin '{plugin}' push failed: {source}")]
    Push {
        plugin: String,
        #[source]
        source: PluginError,
    },
}

// ── ProtocolBackend ───────────────────────────────────────────────────────────

/// Plugin set and dispatch logic for one management protocol.
#[async_trait]
pub trait ProtocolBackend: Send + Sync {
    /// Protocol identifier, for logs.
    fn name(&self) -> &str;

    /// Registers a plugin.  Called during start-up wiring only; backends are
    /// immutable once shared.
    fn add_plugin(&mut self, plugin: Arc<dyn Plugin>);

    /// Feature keys with at least one registered plugin.
    fn supported_features(&self) -> Vec<String>;

    /// Applies the capability gate: feature match first, then
    /// `supported_by_device`.  See the module docs for the ambiguity rule.
    fn select_plugin(
        &self,
        msg: &IntentMessage,
        model: &DeviceModel,
    ) -> Result<Arc<dyn Plugin>, DispatchError>;

    /// Full pipeline for one target.  Mapping failure means push is never
    /// attempted.
    async fn map_and_push(
        &self,
        msg: &IntentMessage,
        model: &DeviceModel,
        target: &DeviceTarget,
    ) -> Result<(), DispatchError> {
        let plugin = self.select_plugin(msg, model)?;

        let mapped = plugin.map(msg).map_err(|source| DispatchError::Mapping {
            plugin: plugin.name().to_string(),
            source,
        })?;

        plugin
            .push(&mapped, target)
            .await
            .map_err(|source| DispatchError::Push {
                plugin: plugin.name().to_string(),
                source,
            })
    }
}
