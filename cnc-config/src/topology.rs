/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Network topology and management-reachability model.
//!
//! A [`Topology`] is the read-only input to one orchestration pass: an
//! ordered list of nodes, each with optional management connectivity and an
//! ordered list of switch ports.  The engine turns every `(node, port)` pair
//! of a manageable node into one [`DeviceTarget`] — a single physical push
//! destination.
//!
//! All types deserialize from the store layer; none of them are mutated by
//! the core.

use std::fmt;

use serde::Deserialize;

// ── Management protocol ───────────────────────────────────────────────────────

/// Transport protocol a node is managed over.
///
/// Used as the key into the
/// [`BackendRegistry`](crate::backend::BackendRegistry); nodes whose protocol
/// has no registered backend are skipped (and reported as skipped) during
/// fan-out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ManagementProtocol {
    Netconf,
    Gnmi,
}

impl fmt::Display for ManagementProtocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ManagementProtocol::Netconf => write!(f, "netconf"),
            ManagementProtocol::Gnmi => write!(f, "gnmi"),
        }
    }
}

// ── ManagementInfo ────────────────────────────────────────────────────────────

/// IANA-assigned default port for NETCONF-over-SSH.
fn default_management_port() -> u16 {
    830
}

/// How to reach one node's management plane.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ManagementInfo {
    pub ip_address: String,

    /// TCP port of the management endpoint.  Defaults to 830 (NETCONF/SSH).
    #[serde(default = "default_management_port")]
    pub port: u16,

    pub username: String,

    pub protocol: ManagementProtocol,
}

impl ManagementInfo {
    /// `"ip:port"` form used for connecting and for log/report keys.
    pub fn endpoint(&self) -> String {
        format!("{}:{}", self.ip_address, self.port)
    }
}

// ── Topology ──────────────────────────────────────────────────────────────────

/// One switch port.  The port name doubles as the interface name used in the
/// pushed configuration subtree.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Port {
    pub name: String,
}

/// One network node.
///
/// `management: None` models a node that is present in the topology (e.g. an
/// end station) but not configurable by this service.
#[derive(Debug, Clone, Deserialize)]
pub struct Node {
    pub id: String,

    /// Human-readable name; falls back to `id` when absent.
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub management: Option<ManagementInfo>,

    #[serde(default)]
    pub ports: Vec<Port>,
}

impl Node {
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            &self.id
        } else {
            &self.name
        }
    }
}

/// Read-only orchestration input: the ordered node list.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Topology {
    #[serde(default)]
    pub nodes: Vec<Node>,
}

// ── DeviceTarget ──────────────────────────────────────────────────────────────

/// One physical push destination: a device's management endpoint plus the
/// interface the configuration subtree is rooted at.
///
/// Built per `(node, port)` by the engine and handed to
/// [`Plugin::push`](crate::plugin::Plugin::push).
#[derive(Clone)]
pub struct DeviceTarget {
    pub management: ManagementInfo,

    /// Credential for the management session.  Kept out of `Debug` output.
    pub secret: String,

    pub interface_name: String,
}

impl DeviceTarget {
    pub fn new(
        management: ManagementInfo,
        secret: impl Into<String>,
        interface_name: impl Into<String>,
    ) -> Self {
        Self {
            management,
            secret: secret.into(),
            interface_name: interface_name.into(),
        }
    }
}

impl fmt::Debug for DeviceTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeviceTarget")
            .field("management", &self.management)
            .field("secret", &"<redacted>")
            .field("interface_name", &self.interface_name)
            .finish()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
