/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! NETCONF plugin variants of the gate-schedule (IEEE 802.1Qbv) feature.
//!
//! Both variants map a [`GateControlSchedule`] onto the same intermediate
//! [`GateParameterTable`]; they differ in the schema revision they require,
//! the cycle-time scale, the admin-gate-states summary policy and how the
//! table is serialized:
//!
//! | Variant | Schema revision | Cycle denominator | Summary | Serializer |
//! |---|---|---|---|---|
//! | [`GateScheduleNetconf`] | 2023-06-22 | 1e9 (ns-exact) | omitted | generic wire encoder |
//! | [`GateScheduleNetconfLegacy`] | 2018-09-10 | 1000 | OR of all entries | hand-built markup |
//!
//! The mapping itself ([`map_gate_schedule`]) is pure and shared.

pub mod gate_schedule;
pub mod gate_schedule_legacy;

pub use gate_schedule::GateScheduleNetconf;
pub use gate_schedule_legacy::GateScheduleNetconfLegacy;

use tracing::debug;

use crate::intent::{AdminState, GateControlSchedule, GateOperation};
use crate::plugin::MappingError;

pub(crate) const NANOS_PER_SECOND: u64 = 1_000_000_000;

// ── Intermediate wire structures ──────────────────────────────────────────────

/// `base-time` split into the two leaves the schema carries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseTime {
    pub seconds: u64,
    pub nanoseconds: u32,
}

/// `cycle-time` as the schema's rational pair.  The denominator is a
/// per-plugin constant scale, never derived from the message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleTime {
    pub numerator: u32,
    pub denominator: u32,
}

/// One wire gate-control entry, keyed by the intent's verbatim index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GateEntry {
    pub index: u32,
    pub operation: GateOperation,
    pub time_interval_ns: u32,
    /// `None` when the intent left the bitmask unset — the wire field is
    /// then absent, not zero.
    pub gate_states: Option<u8>,
}

/// Mapped gate-parameter table for one interface.
///
/// This is the [`MappedConfig`](crate::plugin::MappedConfig) both variants
/// box up; each variant's `push` downcasts back to it.
#[derive(Debug, Clone, PartialEq)]
pub struct GateParameterTable {
    pub gate_enabled: bool,
    /// Summary over the entries; presence and derivation are a per-variant
    /// policy (see [`SummaryPolicy`]).
    pub admin_gate_states: Option<u8>,
    pub base_time: BaseTime,
    pub cycle_time: CycleTime,
    /// Producer order preserved; serializers sort by `index` themselves.
    pub entries: Vec<GateEntry>,
}

/// How a variant derives the top-level `admin-gate-states` summary leaf.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SummaryPolicy {
    /// Schema has no summary leaf; nothing is emitted.
    Omit,
    /// First entry's gate-state byte, absent when that entry has none.
    FirstEntry,
    /// Bitwise OR across every entry's gate-state byte (0 when none carry
    /// one).
    OrAllEntries,
}

// ── Mapping algorithm ─────────────────────────────────────────────────────────

/// Pure intent → [`GateParameterTable`] transformation shared by both
/// variants.
///
/// * `base_time_ns` splits by integer division/remainder — no rounding.
/// * `cycle_time_ns` becomes the numerator over the variant's fixed
///   `denominator`; a value above `u32::MAX` is not representable.
/// * Entry indices are preserved verbatim; only the first gate-state byte is
///   representable, further bytes are silently truncated.
/// * `interface_time_offset_ns` has no leaf in this schema family; when
///   present it is logged as unmapped, never fabricated into the output.
pub(crate) fn map_gate_schedule(
    plugin: &str,
    schedule: &GateControlSchedule,
    denominator: u32,
    summary: SummaryPolicy,
) -> Result<GateParameterTable, MappingError> {
    let numerator =
        u32::try_from(schedule.cycle_time_ns).map_err(|_| MappingError::ValueOutOfRange {
            field: "cycle-time",
            value: schedule.cycle_time_ns,
        })?;

    let entries: Vec<GateEntry> = schedule
        .entries
        .iter()
        .map(|e| GateEntry {
            index: e.index,
            operation: e.operation,
            time_interval_ns: e.time_interval_ns,
            gate_states: e.gate_state_byte(),
        })
        .collect();

    let admin_gate_states = match summary {
        SummaryPolicy::Omit => None,
        SummaryPolicy::FirstEntry => entries.first().and_then(|e| e.gate_states),
        SummaryPolicy::OrAllEntries => Some(
            entries
                .iter()
                .filter_map(|e| e.gate_states)
                .fold(0u8, |acc, b| acc | b),
        ),
    };

    if let Some(offset) = schedule.interface_time_offset_ns {
        debug!(
            plugin,
            schedule_id = %schedule.schedule_id,
            interface_time_offset_ns = offset,
            "intent field has no leaf in the target schema, left unmapped"
        );
    }

    Ok(GateParameterTable {
        gate_enabled: schedule.admin_state == AdminState::Enabled,
        admin_gate_states,
        base_time: BaseTime {
            seconds: schedule.base_time_ns / NANOS_PER_SECOND,
            nanoseconds: (schedule.base_time_ns % NANOS_PER_SECOND) as u32,
        },
        cycle_time: CycleTime {
            numerator,
            denominator,
        },
        entries,
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────
