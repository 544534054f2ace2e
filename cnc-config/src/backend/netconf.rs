/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! NETCONF protocol backend.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use super::{DispatchError, ProtocolBackend};
use crate::device::DeviceModel;
use crate::intent::IntentMessage;
use crate::plugin::Plugin;

/// Plugin set for the NETCONF protocol.
///
/// Plugins are held in registration order; selection never depends on it
/// (see [`select_plugin`](ProtocolBackend::select_plugin)).
#[derive(Default)]
pub struct NetconfBackend {
    plugins: Vec<Arc<dyn Plugin>>,
}

impl NetconfBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProtocolBackend for NetconfBackend {
    fn name(&self) -> &str {
        "netconf"
    }

    fn add_plugin(&mut self, plugin: Arc<dyn Plugin>) {
        debug!(
            backend = self.name(),
            plugin = plugin.name(),
            feature = plugin.feature_name(),
            "plugin registered"
        );
        self.plugins.push(plugin);
    }

    fn supported_features(&self) -> Vec<String> {
        let mut features: Vec<String> = self
            .plugins
            .iter()
            .map(|p| p.feature_name().to_string())
            .collect();
        features.sort();
        features.dedup();
        features
    }

    fn select_plugin(
        &self,
        msg: &IntentMessage,
        model: &DeviceModel,
    ) -> Result<Arc<dyn Plugin>, DispatchError> {
        let candidates: Vec<Arc<dyn Plugin>> = self
            .plugins
            .iter()
            .filter(|p| p.supports(msg))
            .filter(|p| p.supported_by_device(model))
            .cloned()
            .collect();

        match candidates.as_slice() {
            [] => Err(DispatchError::UnsupportedFeature {
                feature: msg.feature_name().to_string(),
            }),
            [only] => Ok(Arc::clone(only)),
            [first, rest @ ..] => {
                // Variants of one feature are supposed to require mutually
                // exclusive schema revisions.  A device matching several is a
                // registry misconfiguration; resolve it deterministically:
                // newest required revision wins, name breaks remaining ties.
                warn!(
                    feature = msg.feature_name(),
                    candidates = ?candidates.iter().map(|p| p.name()).collect::<Vec<_>>(),
                    "multiple plugins match; picking the newest schema revision"
                );
                let key = |p: &Arc<dyn Plugin>| {
                    (
                        p.newest_required_revision().map(str::to_owned),
                        p.name().to_owned(),
                    )
                };
                let chosen = rest
                    .iter()
                    .fold(first, |best, p| if key(p) > key(best) { p } else { best });
                Ok(Arc::clone(chosen))
            }
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
