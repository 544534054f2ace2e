/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Protocol-neutral intent model.
//!
//! An [`IntentMessage`] describes *what* to configure without committing to
//! any schema version or management protocol — that translation is the job of
//! the plugins.  Intent messages are produced upstream (stored by the
//! northbound API, fetched from the store per request) and are immutable for
//! the duration of one orchestration pass.
//!
//! The gate-control schedule (IEEE 802.1Qbv time-aware shaping) is the
//! feature carried today; the enum leaves room for further features without
//! touching the dispatch machinery.

use serde::Deserialize;

/// Dispatch key of the gate-control-schedule feature.
pub const FEATURE_QBV: &str = "qbv";

// ── Enums ─────────────────────────────────────────────────────────────────────

/// Administrative state requested for the schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdminState {
    Enabled,
    #[default]
    Disabled,
}

/// Per-entry gate operation, as defined by the 802.1Q schedule schema.
///
/// Producers rarely set this; the wire default is `set-gate-states`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GateOperation {
    #[default]
    SetGateStates,
    SetAndHoldMac,
    SetAndReleaseMac,
}

impl GateOperation {
    /// Identity name used on the wire.
    pub fn wire_name(self) -> &'static str {
        match self {
            GateOperation::SetGateStates => "set-gate-states",
            GateOperation::SetAndHoldMac => "set-and-hold-mac",
            GateOperation::SetAndReleaseMac => "set-and-release-mac",
        }
    }
}

// ── Gate control schedule ─────────────────────────────────────────────────────

/// One row of a gate control list.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GateControlEntry {
    /// Stable sort key.  Unique within a schedule, not necessarily
    /// contiguous; preserved verbatim on the wire (never renumbered).
    pub index: u32,

    /// How long this entry's gate states stay in effect, in nanoseconds.
    pub time_interval_ns: u32,

    /// Gate-state bitmask, one bit per traffic-class gate.  Empty means
    /// "unset" — the wire field is then omitted, not zeroed.  Only the first
    /// byte is representable by the supported schema family.
    #[serde(default)]
    pub gate_states: Vec<u8>,

    #[serde(default)]
    pub operation: GateOperation,

    #[serde(default)]
    pub description: Option<String>,
}

impl GateControlEntry {
    /// The single byte the schema can carry, or `None` when unset.
    /// Bytes beyond the first are silently truncated.
    pub fn gate_state_byte(&self) -> Option<u8> {
        self.gate_states.first().copied()
    }
}

/// A full gate-control schedule for one interface.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GateControlSchedule {
    pub schedule_id: String,

    /// Absolute start of the first cycle, nanoseconds since the PTP epoch.
    pub base_time_ns: u64,

    /// Cycle length in nanoseconds.
    pub cycle_time_ns: u64,

    pub admin_state: AdminState,

    /// Producer-ordered entry list; `index` is the canonical sort key when
    /// re-serializing.
    #[serde(default)]
    pub entries: Vec<GateControlEntry>,

    /// Vendor-specific PHY offset.  No supported schema carries it; when
    /// present it is logged as unmapped.
    #[serde(default)]
    pub interface_time_offset_ns: Option<i64>,
}

// ── IntentMessage ─────────────────────────────────────────────────────────────

/// The closed set of intent kinds the service can carry.
///
/// Plugins discriminate on the variant via
/// [`Plugin::supports`](crate::plugin::Plugin::supports); the engine
/// dispatches on [`feature_name`](IntentMessage::feature_name).
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "feature")]
pub enum IntentMessage {
    #[serde(rename = "qbv")]
    GateSchedule(GateControlSchedule),
}

impl IntentMessage {
    /// The feature key this message is dispatched under.
    pub fn feature_name(&self) -> &'static str {
        match self {
            IntentMessage::GateSchedule(_) => FEATURE_QBV,
        }
    }

    /// Short description for log lines.
    pub fn describe(&self) -> String {
        match self {
            IntentMessage::GateSchedule(s) => {
                format!("gate schedule '{}' ({} entries)", s.schedule_id, s.entries.len())
            }
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
