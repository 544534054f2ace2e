/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Gate-schedule plugin for switches on the 2018 bridge schema.
//!
//! That schema generation differs enough from the current one that generic
//! tree traversal gets awkward: the per-entry parameters live in an
//! operation-dependent sub-element (`sgs-params` / `shm-params` /
//! `srm-params`), the control list carries an explicit length leaf, and a
//! top-level `admin-gate-states` summary is mandatory.  The plugin therefore
//! opts out of the generic encoder and assembles the markup tag by tag —
//! sorting entries by index so the output stays diff-stable.
//!
//! Cycle time is carried at the legacy millisecond scale (denominator 1000);
//! `admin-gate-states` is the bitwise OR across all entries.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info, warn};

use super::{map_gate_schedule, GateEntry, GateParameterTable, SummaryPolicy};
use crate::device::SchemaModule;
use crate::intent::{GateOperation, IntentMessage};
use crate::plugin::{MappedConfig, MappingError, Plugin, PluginError};
use crate::session::{Datastore, SessionOpener};
use crate::topology::DeviceTarget;

const PLUGIN_NAME: &str = "gate-schedule-netconf-legacy";

/// Revision of the 802.1Q sched modules this variant is written against.
pub const SCHED_REVISION: &str = "2018-09-10";

/// Legacy millisecond-scale cycle denominator.
const CYCLE_DENOMINATOR: u32 = 1000;

pub struct GateScheduleNetconfLegacy {
    opener: Arc<dyn SessionOpener>,
    required: Vec<SchemaModule>,
}

impl GateScheduleNetconfLegacy {
    pub fn new(opener: Arc<dyn SessionOpener>) -> Self {
        Self {
            opener,
            required: vec![
                SchemaModule::new("ieee802-dot1q-sched", SCHED_REVISION),
                SchemaModule::new("ieee802-dot1q-sched-bridge", SCHED_REVISION),
            ],
        }
    }
}

// ── Custom serializer ─────────────────────────────────────────────────────────

fn params_tag(operation: GateOperation) -> &'static str {
    match operation {
        GateOperation::SetAndHoldMac => "shm-params",
        GateOperation::SetAndReleaseMac => "srm-params",
        GateOperation::SetGateStates => "sgs-params",
    }
}

/// Assembles the full `edit-config` subtree for one interface.
///
/// Entries are emitted sorted by `index` ascending.
fn build_xml(table: &GateParameterTable, interface: &str) -> String {
    const NS_IF: &str = "urn:ietf:params:xml:ns:yang:ietf-interfaces";
    const NS_SCHED: &str = "urn:ieee:std:802.1Q:yang:ieee802-dot1q-sched";

    let mut entries: Vec<&GateEntry> = table.entries.iter().collect();
    entries.sort_by_key(|e| e.index);

    let mut buf = String::new();
    buf.push_str(&format!("<interfaces xmlns=\"{NS_IF}\">"));
    buf.push_str("<interface>");
    buf.push_str(&format!("<name>{interface}</name>"));
    buf.push_str(&format!("<gate-parameters xmlns=\"{NS_SCHED}\">"));

    buf.push_str(&format!(
        "<gate-enabled>{}</gate-enabled>",
        table.gate_enabled
    ));
    if let Some(states) = table.admin_gate_states {
        buf.push_str(&format!(
            "<admin-gate-states>{states}</admin-gate-states>"
        ));
    }
    buf.push_str(&format!(
        "<admin-control-list-length>{}</admin-control-list-length>",
        entries.len()
    ));

    for entry in &entries {
        buf.push_str("<admin-control-list>");
        buf.push_str(&format!("<index>{}</index>", entry.index));
        buf.push_str(&format!(
            "<operation-name>{}</operation-name>",
            entry.operation.wire_name()
        ));

        let params = params_tag(entry.operation);
        buf.push_str(&format!("<{params}>"));
        if let Some(states) = entry.gate_states {
            buf.push_str(&format!(
                "<gate-states-value>{states}</gate-states-value>"
            ));
        }
        buf.push_str(&format!(
            "<time-interval-value>{}</time-interval-value>",
            entry.time_interval_ns
        ));
        buf.push_str(&format!("</{params}>"));
        buf.push_str("</admin-control-list>");
    }

    buf.push_str("<admin-cycle-time>");
    buf.push_str(&format!(
        "<numerator>{}</numerator>",
        table.cycle_time.numerator
    ));
    buf.push_str(&format!(
        "<denominator>{}</denominator>",
        table.cycle_time.denominator
    ));
    buf.push_str("</admin-cycle-time>");
    buf.push_str("<admin-cycle-time-extension>0</admin-cycle-time-extension>");

    buf.push_str("<admin-base-time>");
    buf.push_str(&format!("<seconds>{}</seconds>", table.base_time.seconds));
    buf.push_str(&format!(
        "<fractional-seconds>{}</fractional-seconds>",
        table.base_time.nanoseconds
    ));
    buf.push_str("</admin-base-time>");

    buf.push_str("<config-change>true</config-change>");

    buf.push_str("</gate-parameters>");
    buf.push_str("</interface>");
    buf.push_str("</interfaces>");
    buf
}

// ── Plugin impl ───────────────────────────────────────────────────────────────

#[async_trait]
impl Plugin for GateScheduleNetconfLegacy {
    fn name(&self) -> &str {
        PLUGIN_NAME
    }

    fn feature_name(&self) -> &str {
        crate::intent::FEATURE_QBV
    }

    fn required_modules(&self) -> &[SchemaModule] {
        &self.required
    }

    fn supports(&self, msg: &IntentMessage) -> bool {
        matches!(msg, IntentMessage::GateSchedule(_))
    }

    fn map(&self, msg: &IntentMessage) -> Result<MappedConfig, MappingError> {
        let IntentMessage::GateSchedule(schedule) = msg;
        debug!(plugin = PLUGIN_NAME, schedule_id = %schedule.schedule_id, "mapping gate schedule");

        let table = map_gate_schedule(
            PLUGIN_NAME,
            schedule,
            CYCLE_DENOMINATOR,
            SummaryPolicy::OrAllEntries,
        )?;
        Ok(Box::new(table))
    }

    async fn push(&self, mapped: &MappedConfig, target: &DeviceTarget) -> Result<(), PluginError> {
        let table = mapped.downcast_ref::<GateParameterTable>().ok_or_else(|| {
            MappingError::ForeignMappedConfig {
                plugin: PLUGIN_NAME.to_string(),
            }
        })?;

        let payload = build_xml(table, &target.interface_name);

        let mut session = self.opener.open(target).await.map_err(PluginError::from)?;
        let result = session.edit_config(Datastore::Running, &payload).await;
        if let Err(e) = session.close().await {
            warn!(plugin = PLUGIN_NAME, error = %e, "session close failed");
        }
        result?;

        info!(
            plugin = PLUGIN_NAME,
            endpoint = %target.management.endpoint(),
            interface = %target.interface_name,
            "configuration pushed"
        );
        Ok(())
    }

    fn custom_serializer(&self) -> bool {
        true
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plugin::netconf::{BaseTime, CycleTime};

    fn table() -> GateParameterTable {
        GateParameterTable {
            gate_enabled: true,
            admin_gate_states: Some(0xA1),
            base_time: BaseTime {
                seconds: 2,
                nanoseconds: 123,
            },
            cycle_time: CycleTime {
                numerator: 1_000_000,
                denominator: 1000,
            },
            entries: vec![
                GateEntry {
                    index: 7,
                    operation: GateOperation::SetGateStates,
                    time_interval_ns: 400_000,
                    gate_states: Some(0x81),
                },
                GateEntry {
                    index: 2,
                    operation: GateOperation::SetAndHoldMac,
                    time_interval_ns: 600_000,
                    gate_states: None,
                },
            ],
        }
    }

    #[test]
    fn entry_indices_are_non_decreasing_in_the_output() {
        let xml = build_xml(&table(), "sw0p2");

        let mut last = None;
        let mut rest = xml.as_str();
        while let Some(start) = rest.find("<index>") {
            let tail = &rest[start + "<index>".len()..];
            let end = tail.find("</index>").unwrap();
            let idx: u32 = tail[..end].parse().unwrap();
            if let Some(prev) = last {
                assert!(idx >= prev, "indices must be sorted ascending");
            }
            last = Some(idx);
            rest = &tail[end..];
        }
        assert_eq!(last, Some(7), "both entries emitted");
    }

    #[test]
    fn operation_selects_the_params_sub_element() {
        let xml = build_xml(&table(), "sw0p2");
        assert!(xml.contains("<shm-params><time-interval-value>600000</time-interval-value></shm-params>"));
        assert!(xml.contains(
            "<sgs-params><gate-states-value>129</gate-states-value><time-interval-value>400000</time-interval-value></sgs-params>"
        ));
    }

    #[test]
    fn unset_gate_states_leave_the_value_absent() {
        let xml = build_xml(&table(), "sw0p2");
        // Only the index-7 entry carries a gate-states-value.
        assert_eq!(xml.matches("<gate-states-value>").count(), 1);
    }

    #[test]
    fn legacy_framing_leaves_are_present() {
        let xml = build_xml(&table(), "sw0p2");
        assert!(xml.contains("<admin-control-list-length>2</admin-control-list-length>"));
        assert!(xml.contains("<admin-gate-states>161</admin-gate-states>"));
        assert!(xml.contains("<admin-cycle-time-extension>0</admin-cycle-time-extension>"));
        assert!(xml.contains("<fractional-seconds>123</fractional-seconds>"));
        assert!(xml.contains("<config-change>true</config-change>"));
        assert!(xml.contains("<denominator>1000</denominator>"));
        assert!(xml.starts_with("<interfaces xmlns=\"urn:ietf:params:xml:ns:yang:ietf-interfaces\">"));
    }

    #[test]
    fn declares_the_custom_serializer_capability() {
        let opener = Arc::new(crate::session::testing::RecordingOpener::new());
        let plugin = GateScheduleNetconfLegacy::new(opener);
        assert!(plugin.custom_serializer());
        assert_eq!(plugin.newest_required_revision(), Some(SCHED_REVISION));
    }
}
