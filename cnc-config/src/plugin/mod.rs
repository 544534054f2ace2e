/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Plugin contract.
//!
//! One plugin encapsulates *one feature, mapped for one device-schema
//! version, pushed over one protocol*.  Schema-version variants of the same
//! feature are distinct types registered under the same feature key; the
//! backend picks the variant whose required modules the target device
//! actually carries.
//!
//! ```text
//! IntentMessage ──map()──► MappedConfig ──push()──► edit-config payload ──► device
//!                 pure       opaque box              (per-plugin wire format)
//! ```
//!
//! A [`MappedConfig`] is opaque to everything except the plugin that produced
//! it — it is *not* a shared contract between plugins.  `push` downcasts and
//! treats a foreign box as a mapping error rather than panicking.

pub mod netconf;

use std::any::Any;

use async_trait::async_trait;
use thiserror::Error;

use crate::device::{DeviceModel, SchemaModule};
use crate::intent::IntentMessage;
use crate::session::TransportError;
use crate::topology::DeviceTarget;

/// Schema-specific intermediate structure produced by [`Plugin::map`].
pub type MappedConfig = Box<dyn Any + Send + Sync>;

impl std::fmt::Debug for dyn Plugin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Plugin")
            .field("name", &self.name())
            .finish()
    }
}

// ── Errors ────────────────────────────────────────────────────────────────────

/// The intent cannot be represented in the target schema.  Non-retryable —
/// a data problem, not a device problem.
#[derive(Debug, Clone, Error)]
pub enum MappingError {
    #[error("plugin '{plugin}' cannot map intent messages of feature '{feature}'")]
    UnsupportedMessage { plugin: String, feature: String },

    #[error("{field} value {value} cannot be represented in the target schema")]
    ValueOutOfRange { field: &'static str, value: u64 },

    #[error("plugin '{plugin}' received a mapped structure it did not produce")]
    ForeignMappedConfig { plugin: String },
}

/// Failure of a single map-and-push attempt, keeping the two failure layers
/// apart: mapping problems are non-retryable, transport problems are.
#[derive(Debug, Error)]
pub enum PluginError {
    #[error(transparent)]
    Mapping(#[from] MappingError),

    #[error(transparent)]
    Transport(#[from] TransportError),
}

// ── Plugin ────────────────────────────────────────────────────────────────────

/// Adapter mapping one feature onto one schema version of one protocol.
#[async_trait]
pub trait Plugin: Send + Sync {
    /// Stable identifier used in logs and error wrapping only.
    fn name(&self) -> &str;

    /// Feature dispatch key (e.g. `"qbv"`).
    fn feature_name(&self) -> &str;

    /// The exact schema modules (name **and** revision) this plugin's mapping
    /// depends on.
    fn required_modules(&self) -> &[SchemaModule];

    /// True iff every required module is installed on the device.
    ///
    /// Necessary but not sufficient: module presence proves the schema is
    /// installed, not that the firmware implements every leaf the plugin
    /// emits.
    fn supported_by_device(&self, model: &DeviceModel) -> bool {
        model.supports_all(self.required_modules())
    }

    /// True iff `msg` is the intent kind this plugin maps.
    fn supports(&self, msg: &IntentMessage) -> bool;

    /// Pure intent → wire-structure transformation.
    fn map(&self, msg: &IntentMessage) -> Result<MappedConfig, MappingError>;

    /// Serializes `mapped`, opens a session to `target`, issues the
    /// device-mutating RPC and closes the session.
    async fn push(&self, mapped: &MappedConfig, target: &DeviceTarget) -> Result<(), PluginError>;

    /// True when the plugin serializes its own markup instead of delegating
    /// to the generic wire encoder.  Diagnostic capability flag; plugins that
    /// set it are responsible for canonical (index-sorted) entry order.
    fn custom_serializer(&self) -> bool {
        false
    }

    /// Newest revision among the required modules — the deterministic
    /// tie-break key when several variants claim the same device (revisions
    /// are `YYYY-MM-DD`, so lexicographic order is chronological).
    fn newest_required_revision(&self) -> Option<&str> {
        self.required_modules()
            .iter()
            .map(|m| m.revision.as_str())
            .max()
    }
}
