/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Explicit protocol → backend registry.
//!
//! Built once during start-up wiring and then shared read-only (`Arc`) into
//! the engine — no process-wide mutable state, so every test can assemble
//! its own hermetic registry.

use std::collections::HashMap;
use std::sync::Arc;

use thiserror::Error;
use tracing::debug;

use super::ProtocolBackend;
use crate::topology::ManagementProtocol;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("a backend for protocol '{protocol}' is already registered")]
    AlreadyRegistered { protocol: ManagementProtocol },
}

/// One backend per management protocol.
#[derive(Default)]
pub struct BackendRegistry {
    backends: HashMap<ManagementProtocol, Arc<dyn ProtocolBackend>>,
}

impl BackendRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `backend` for `protocol`.  Exactly one backend may own a
    /// protocol; a second registration is a wiring bug, not a fallback.
    pub fn register(
        &mut self,
        protocol: ManagementProtocol,
        backend: Arc<dyn ProtocolBackend>,
    ) -> Result<(), RegistryError> {
        if self.backends.contains_key(&protocol) {
            return Err(RegistryError::AlreadyRegistered { protocol });
        }
        debug!(%protocol, backend = backend.name(), "backend registered");
        self.backends.insert(protocol, backend);
        Ok(())
    }

    pub fn get(&self, protocol: ManagementProtocol) -> Option<Arc<dyn ProtocolBackend>> {
        self.backends.get(&protocol).cloned()
    }

    /// Protocols with a registered backend, sorted by display name for
    /// deterministic logs.
    pub fn protocols(&self) -> Vec<ManagementProtocol> {
        let mut protocols: Vec<ManagementProtocol> = self.backends.keys().copied().collect();
        protocols.sort_by_key(|p| p.to_string());
        protocols
    }

    pub fn is_empty(&self) -> bool {
        self.backends.is_empty()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
