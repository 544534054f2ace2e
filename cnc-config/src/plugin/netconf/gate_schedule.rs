/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Gate-schedule plugin for the current 802.1Qbv bridge schema.
//!
//! Maps onto the `gate-parameter-table` container under the interface's
//! bridge port and serializes through the generic wire encoder.  Cycle time
//! is nanosecond-exact (denominator 1e9); the schema has no top-level
//! `admin-gate-states` summary leaf, so none is emitted.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info, warn};

use super::{map_gate_schedule, GateEntry, GateParameterTable, SummaryPolicy};
use crate::device::SchemaModule;
use crate::intent::IntentMessage;
use crate::plugin::{MappedConfig, MappingError, Plugin, PluginError};
use crate::session::{Datastore, SessionOpener};
use crate::topology::DeviceTarget;
use crate::wire::{self, WireValue};

const PLUGIN_NAME: &str = "gate-schedule-netconf";

/// Revision of the 802.1Q sched modules this variant is written against.
pub const SCHED_REVISION: &str = "2023-06-22";

/// Nanosecond-exact cycle scale.
const CYCLE_DENOMINATOR: u32 = 1_000_000_000;

pub struct GateScheduleNetconf {
    opener: Arc<dyn SessionOpener>,
    required: Vec<SchemaModule>,
}

impl GateScheduleNetconf {
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

// ── Wire tree ─────────────────────────────────────────────────────────────────

/// Builds the interface-rooted wire tree for the generic encoder.
///
/// Entries are sorted by index here: the encoder preserves traversal order,
/// so the tree itself must already be canonical.
fn wire_tree(table: &GateParameterTable, interface: &str) -> WireValue {
    let mut entries: Vec<&GateEntry> = table.entries.iter().collect();
    entries.sort_by_key(|e| e.index);

    let entry_values: Vec<WireValue> = entries
        .into_iter()
        .map(|e| {
            let mut pairs = vec![
                ("index".to_string(), WireValue::uint(u64::from(e.index))),
                (
                    "operation-name".to_string(),
                    WireValue::str(format!("ieee802-dot1q-types:{}", e.operation.wire_name())),
                ),
                (
                    "time-interval-value".to_string(),
                    WireValue::uint(u64::from(e.time_interval_ns)),
                ),
            ];
            if let Some(states) = e.gate_states {
                pairs.push((
                    "gate-states-value".to_string(),
                    WireValue::uint(u64::from(states)),
                ));
            }
            WireValue::Map(pairs)
        })
        .collect();

    let mut gate_parameters = vec![("gate-enabled", WireValue::Bool(table.gate_enabled))];
    if let Some(summary) = table.admin_gate_states {
        gate_parameters.push(("admin-gate-states", WireValue::uint(u64::from(summary))));
    }
    gate_parameters.extend([
        (
            "admin-base-time",
            WireValue::map(vec![
                ("seconds", WireValue::uint(table.base_time.seconds)),
                (
                    "nanoseconds",
                    WireValue::uint(u64::from(table.base_time.nanoseconds)),
                ),
            ]),
        ),
        (
            "admin-cycle-time",
            WireValue::map(vec![
                (
                    "numerator",
                    WireValue::uint(u64::from(table.cycle_time.numerator)),
                ),
                (
                    "denominator",
                    WireValue::uint(u64::from(table.cycle_time.denominator)),
                ),
            ]),
        ),
        (
            "admin-control-list",
            WireValue::map(vec![("gate-control-entry", WireValue::seq(entry_values))]),
        ),
    ]);

    WireValue::map(vec![(
        "ietf-interfaces:interfaces",
        WireValue::map(vec![(
            "interface",
            WireValue::seq(vec![WireValue::map(vec![
                ("name", WireValue::str(interface)),
                (
                    "ieee802-dot1q-bridge:bridge-port",
                    WireValue::map(vec![(
                        "ieee802-dot1q-sched-bridge:gate-parameter-table",
                        WireValue::map(gate_parameters),
                    )]),
                ),
            ])]),
        )]),
    )])
}

// ── Plugin impl ───────────────────────────────────────────────────────────────

#[async_trait]
impl Plugin for GateScheduleNetconf {
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

        let table = map_gate_schedule(PLUGIN_NAME, schedule, CYCLE_DENOMINATOR, SummaryPolicy::Omit)?;
        Ok(Box::new(table))
    }

    async fn push(&self, mapped: &MappedConfig, target: &DeviceTarget) -> Result<(), PluginError> {
        let table = mapped.downcast_ref::<GateParameterTable>().ok_or_else(|| {
            MappingError::ForeignMappedConfig {
                plugin: PLUGIN_NAME.to_string(),
            }
        })?;

        let payload = wire::encode(&wire_tree(table, &target.interface_name));

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
}

// ── Tests ─────────────────────────────────────────────────────────────────────
