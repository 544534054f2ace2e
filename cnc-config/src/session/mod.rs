/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Management-session abstraction.
//!
//! The core never talks to a switch directly; it drives an opaque
//! [`ManagementSession`] obtained from a [`SessionOpener`].  A session exposes
//! exactly the three operations the push pipeline needs — `get-config`,
//! `edit-config`, `close` — so plugins stay testable with in-memory doubles
//! and the SSH plumbing stays swappable.
//!
//! [`ssh`] carries the shipped NETCONF-over-SSH adapter.

pub mod ssh;

use async_trait::async_trait;
use thiserror::Error;

use crate::topology::DeviceTarget;

/// Bounded wait for one RPC round-trip, in seconds.
pub const DEFAULT_RPC_TIMEOUT_SECS: u64 = 5;

// ── Datastore ─────────────────────────────────────────────────────────────────

/// NETCONF datastore addressed by an RPC.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Datastore {
    Running,
    Candidate,
}

impl Datastore {
    pub fn wire_name(self) -> &'static str {
        match self {
            Datastore::Running => "running",
            Datastore::Candidate => "candidate",
        }
    }
}

// ── TransportError ────────────────────────────────────────────────────────────

/// Session-establishment or RPC failure.
///
/// Always scoped to a single target: the engine records it in the aggregate
/// report and carries on with the remaining targets.  Retryable at the
/// caller's discretion (with backoff), unlike mapping or capability errors.
#[derive(Debug, Clone, Error)]
pub enum TransportError {
    #[error("failed to connect to {endpoint}: {detail}")]
    Connect { endpoint: String, detail: String },

    #[error("authentication rejected for user '{username}' at {endpoint}")]
    AuthRejected { endpoint: String, username: String },

    #[error("{rpc} RPC failed: {detail}")]
    Rpc { rpc: &'static str, detail: String },

    #[error("{rpc} RPC timed out after {seconds}s")]
    Timeout { rpc: &'static str, seconds: u64 },

    #[error("empty reply from device")]
    EmptyReply,

    #[error("session closed by peer")]
    Closed,
}

// ── Traits ────────────────────────────────────────────────────────────────────

/// One live management session to one device.
///
/// Implementations own their transport state; callers must `close()` when
/// done (dropping without closing is safe but leaves the teardown to the
/// peer's timeout).
#[async_trait]
pub trait ManagementSession: Send {
    /// `get-config` on `datastore`, optionally narrowed by a subtree filter.
    async fn get_config(
        &mut self,
        datastore: Datastore,
        filter: Option<&str>,
    ) -> Result<String, TransportError>;

    /// `edit-config` with merge semantics.
    async fn edit_config(
        &mut self,
        datastore: Datastore,
        payload: &str,
    ) -> Result<(), TransportError>;

    async fn close(&mut self) -> Result<(), TransportError>;
}

impl std::fmt::Debug for dyn ManagementSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ManagementSession")
    }
}

/// Connects sessions to device targets.
///
/// Injected into plugins at construction so every test can substitute its
/// own recording or failing double.
#[async_trait]
pub trait SessionOpener: Send + Sync {
    async fn open(&self, target: &DeviceTarget)
        -> Result<Box<dyn ManagementSession>, TransportError>;
}

// ── Test doubles ──────────────────────────────────────────────────────────────


// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topology::{ManagementInfo, ManagementProtocol};

    fn target(ip: &str) -> DeviceTarget {
        DeviceTarget::new(
            ManagementInfo {
                ip_address: ip.into(),
                port: 830,
                username: "admin".into(),
                protocol: ManagementProtocol::Netconf,
            },
            "secret",
            "sw0p1",
        )
    }

    #[tokio::test]
    async fn recording_opener_captures_pushes() {
        let opener = testing::RecordingOpener::new();
        let mut session = opener.open(&target("10.0.0.1")).await.unwrap();
        session
            .edit_config(Datastore::Running, "<config/>")
            .await
            .unwrap();
        session.close().await.unwrap();

        let pushes = opener.pushes();
        assert_eq!(pushes.len(), 1);
        assert_eq!(pushes[0].endpoint, "10.0.0.1:830");
        assert_eq!(pushes[0].interface, "sw0p1");
        assert_eq!(opener.open_count(), 1);
    }

    #[tokio::test]
    async fn failing_endpoint_rejects_at_connect_time() {
        let opener = testing::RecordingOpener::new().fail_endpoint("10.0.0.2:830");
        let err = opener.open(&target("10.0.0.2")).await.unwrap_err();
        assert!(matches!(err, TransportError::Connect { .. }));
        assert!(opener.pushes().is_empty());
    }
}
