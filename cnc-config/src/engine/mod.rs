/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Orchestration engine: fans one intent out across the topology.
//!
//! For every node whose management protocol has a registered backend, each
//! port becomes a [`DeviceTarget`] and goes through the backend's
//! map-and-push pipeline.  Pushes run concurrently in bounded batches; every
//! worker owns its session and its error, results merge only at join time.
//!
//! Failure propagation rules:
//! * intent / topology fetch failure → the whole call fails ([`EngineError`]),
//!   there is nothing to iterate;
//! * device-model fetch failure → every port of that node is recorded as
//!   failed, the remaining nodes continue;
//! * mapping / capability / transport failure → that single target is
//!   recorded as failed, everything else continues.
//!
//! Cancellation stops *issuing* new batches; in-flight pushes run to
//! completion (bounded by the session's RPC timeout) and the remaining
//! targets land in the report as skipped — the report stays consistent.

pub mod report;

pub use report::{ApplyOutcome, ApplyReport, Skip, SkipReason, TargetError, TargetFailure, TargetRef};

use std::sync::Arc;

use futures::future::join_all;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::backend::{BackendRegistry, ProtocolBackend};
use crate::device::DeviceModel;
use crate::intent::IntentMessage;
use crate::store::{ConfigStore, StoreError};
use crate::topology::{DeviceTarget, Topology};

/// Upper bound on concurrently open device sessions per orchestration pass.
pub const DEFAULT_MAX_IN_FLIGHT: usize = 4;

// ── EngineError ───────────────────────────────────────────────────────────────

/// Failure that aborts a whole orchestration call — the inputs themselves
/// could not be resolved.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("failed to fetch configuration '{id}': {source}")]
    Configuration {
        id: String,
        #[source]
        source: StoreError,
    },

    #[error("failed to fetch topology: {source}")]
    Topology {
        #[source]
        source: StoreError,
    },
}

// ── ConfigEngine ──────────────────────────────────────────────────────────────

/// Resolves backends and drives the per-target push pipeline.
///
/// Holds shared references only; one engine serves the whole process and all
/// per-run state lives on the stack of `apply_topology_config`.
pub struct ConfigEngine {
    registry: Arc<BackendRegistry>,
    store: Arc<dyn ConfigStore>,
    max_in_flight: usize,
    cancel: CancellationToken,
}

impl ConfigEngine {
    pub fn new(registry: Arc<BackendRegistry>, store: Arc<dyn ConfigStore>) -> Self {
        Self {
            registry,
            store,
            max_in_flight: DEFAULT_MAX_IN_FLIGHT,
            cancel: CancellationToken::new(),
        }
    }

    /// Caps concurrently open sessions.  Values below 1 are clamped to 1.
    pub fn with_max_in_flight(mut self, max_in_flight: usize) -> Self {
        self.max_in_flight = max_in_flight.max(1);
        self
    }

    /// Token cancelling in-flight orchestration runs.  Cloning hands the
    /// caller a handle; cancelling stops new pushes from being issued.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Fetches the stored intent configuration `id` plus the topology and
    /// applies it.  Store failures here abort the call.
    pub async fn apply_configuration(
        &self,
        id: &str,
        secret: &str,
    ) -> Result<ApplyReport, EngineError> {
        let intent = self
            .store
            .get_configuration(id)
            .await
            .map_err(|source| EngineError::Configuration {
                id: id.to_string(),
                source,
            })?;

        let topology = self
            .store
            .get_topology()
            .await
            .map_err(|source| EngineError::Topology { source })?;

        info!(id, intent = %intent.describe(), "applying stored configuration");
        Ok(self.apply_topology_config(&intent, &topology, secret).await)
    }

    /// Re-applies the most recently stored configuration, if any.
    pub async fn apply_last_configuration(
        &self,
        secret: &str,
    ) -> Result<Option<ApplyReport>, EngineError> {
        let id = match self.store.last_configuration_id().await {
            Ok(Some(id)) => id,
            Ok(None) => return Ok(None),
            Err(e) => {
                warn!(error = %e, "could not look up last configuration");
                return Ok(None);
            }
        };
        self.apply_configuration(&id, secret).await.map(Some)
    }

    /// Fans `intent` out across `topology`.
    ///
    /// Always returns a report — per-target failures are data, not errors.
    pub async fn apply_topology_config(
        &self,
        intent: &IntentMessage,
        topology: &Topology,
        secret: &str,
    ) -> ApplyReport {
        let mut report = ApplyReport::default();

        // ── Resolve targets ───────────────────────────────────────────────────
        type Work = (TargetRef, Arc<dyn ProtocolBackend>, DeviceModel, DeviceTarget);
        let mut work: Vec<Work> = Vec::new();

        for node in &topology.nodes {
            let Some(mgmt) = &node.management else {
                debug!(node = %node.display_name(), "node has no management info, skipping");
                report.skipped.push(Skip {
                    node: node.id.clone(),
                    port: None,
                    reason: SkipReason::NoManagementInfo,
                });
                continue;
            };

            let Some(backend) = self.registry.get(mgmt.protocol) else {
                debug!(
                    node = %node.display_name(),
                    protocol = %mgmt.protocol,
                    "no backend registered for protocol, skipping node"
                );
                report.skipped.push(Skip {
                    node: node.id.clone(),
                    port: None,
                    reason: SkipReason::NoBackend(mgmt.protocol),
                });
                continue;
            };

            let model = match self.store.get_device_model(&node.id).await {
                Ok(model) => model,
                Err(e) => {
                    warn!(node = %node.display_name(), error = %e, "device model fetch failed");
                    for port in &node.ports {
                        report.failed.push(TargetFailure {
                            target: TargetRef {
                                node: node.id.clone(),
                                port: port.name.clone(),
                            },
                            error: TargetError::Model(e.clone()),
                        });
                    }
                    continue;
                }
            };

            for port in &node.ports {
                work.push((
                    TargetRef {
                        node: node.id.clone(),
                        port: port.name.clone(),
                    },
                    Arc::clone(&backend),
                    model.clone(),
                    DeviceTarget::new(mgmt.clone(), secret, port.name.clone()),
                ));
            }
        }

        info!(
            feature = intent.feature_name(),
            targets = work.len(),
            max_in_flight = self.max_in_flight,
            "starting topology fan-out"
        );

        // ── Bounded fan-out ───────────────────────────────────────────────────
        let mut remaining = work;
        while !remaining.is_empty() {
            if self.cancel.is_cancelled() {
                warn!(
                    remaining = remaining.len(),
                    "orchestration cancelled, remaining targets skipped"
                );
                for (target, ..) in remaining.drain(..) {
                    report.skipped.push(Skip {
                        node: target.node,
                        port: Some(target.port),
                        reason: SkipReason::Cancelled,
                    });
                }
                break;
            }

            let batch_len = remaining.len().min(self.max_in_flight);
            let batch: Vec<Work> = remaining.drain(..batch_len).collect();

            let pushes = batch.into_iter().map(|(target, backend, model, device)| {
                // Each worker owns its session and error value; results are
                // merged only at join time.
                async move {
                    let result = backend.map_and_push(intent, &model, &device).await;
                    (target, result)
                }
            });

            for (target, result) in join_all(pushes).await {
                match result {
                    Ok(()) => {
                        info!(node = %target.node, port = %target.port, "configuration pushed");
                        report.succeeded.push(target);
                    }
                    Err(e) => {
                        warn!(node = %target.node, port = %target.port, error = %e, "push failed");
                        report.failed.push(TargetFailure {
                            target,
                            error: TargetError::Dispatch(e),
                        });
                    }
                }
            }
        }

        info!(outcome = %report.outcome(), "topology fan-out finished");
        report
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::NetconfBackend;
    use crate::device::SchemaModule;
    use crate::intent::{AdminState, GateControlEntry, GateControlSchedule, GateOperation};
    use crate::plugin::netconf::{gate_schedule_legacy, GateScheduleNetconf, GateScheduleNetconfLegacy};
    use crate::session::testing::RecordingOpener;
    use crate::store::memory::MemoryStore;
    use crate::topology::{ManagementInfo, ManagementProtocol, Node, Port};

    fn legacy_model() -> DeviceModel {
        DeviceModel::new([
            SchemaModule::new("ieee802-dot1q-sched", gate_schedule_legacy::SCHED_REVISION),
            SchemaModule::new(
                "ieee802-dot1q-sched-bridge",
                gate_schedule_legacy::SCHED_REVISION,
            ),
        ])
    }

    fn netconf_node(id: &str, ip: &str) -> Node {
        Node {
            id: id.into(),
            name: String::new(),
            management: Some(ManagementInfo {
                ip_address: ip.into(),
                port: 830,
                username: "admin".into(),
                protocol: ManagementProtocol::Netconf,
            }),
            ports: vec![Port { name: "sw0p1".into() }],
        }
    }

    fn intent() -> IntentMessage {
        IntentMessage::GateSchedule(GateControlSchedule {
            schedule_id: "s1".into(),
            base_time_ns: 0,
            cycle_time_ns: 1_000_000,
            admin_state: AdminState::Enabled,
            entries: vec![GateControlEntry {
                index: 0,
                time_interval_ns: 500_000,
                gate_states: vec![0xFF],
                operation: GateOperation::default(),
                description: None,
            }],
            interface_time_offset_ns: None,
        })
    }

    /// Registry with both gate-schedule variants wired to `opener`.
    fn registry(opener: &Arc<RecordingOpener>) -> Arc<BackendRegistry> {
        let mut backend = NetconfBackend::new();
        backend.add_plugin(Arc::new(GateScheduleNetconf::new(opener.clone())));
        backend.add_plugin(Arc::new(GateScheduleNetconfLegacy::new(opener.clone())));

        let mut registry = BackendRegistry::new();
        registry
            .register(ManagementProtocol::Netconf, Arc::new(backend))
            .unwrap();
        Arc::new(registry)
    }

    fn three_node_store() -> MemoryStore {
        let topology = Topology {
            nodes: vec![
                netconf_node("sw1", "10.0.0.1"),
                netconf_node("sw2", "10.0.0.2"),
                netconf_node("sw3", "10.0.0.3"),
            ],
        };
        MemoryStore::new(topology)
            .with_device_model("sw1", legacy_model())
            .with_device_model("sw2", legacy_model())
            .with_device_model("sw3", legacy_model())
    }

    #[tokio::test]
    async fn one_failing_target_does_not_abort_the_others() {
        let opener = Arc::new(RecordingOpener::new().fail_endpoint("10.0.0.2:830"));
        let engine = ConfigEngine::new(registry(&opener), Arc::new(three_node_store()));

        let topology = engine.store.get_topology().await.unwrap();
        let report = engine
            .apply_topology_config(&intent(), &topology, "secret")
            .await;

        assert_eq!(report.succeeded.len(), 2);
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].target.node, "sw2");
        assert_eq!(
            report.outcome(),
            ApplyOutcome::PartiallyApplied {
                failed: 1,
                total: 3
            }
        );
        assert_eq!(opener.pushes().len(), 2);
    }

    #[tokio::test]
    async fn all_targets_succeeding_is_fully_applied() {
        let opener = Arc::new(RecordingOpener::new());
        let engine = ConfigEngine::new(registry(&opener), Arc::new(three_node_store()))
            .with_max_in_flight(2);

        let topology = engine.store.get_topology().await.unwrap();
        let report = engine
            .apply_topology_config(&intent(), &topology, "secret")
            .await;

        assert!(report.is_fully_applied());
        assert_eq!(report.attempted(), 3);
        assert_eq!(opener.pushes().len(), 3);
    }

    #[tokio::test]
    async fn unsupported_devices_fail_without_any_session() {
        let opener = Arc::new(RecordingOpener::new());
        let store = MemoryStore::new(Topology {
            nodes: vec![netconf_node("sw1", "10.0.0.1")],
        })
        .with_device_model("sw1", DeviceModel::default());
        let engine = ConfigEngine::new(registry(&opener), Arc::new(store));

        let topology = engine.store.get_topology().await.unwrap();
        let report = engine
            .apply_topology_config(&intent(), &topology, "secret")
            .await;

        assert_eq!(report.outcome(), ApplyOutcome::NotApplied);
        assert_eq!(report.failed.len(), 1);
        assert!(matches!(
            report.failed[0].error,
            TargetError::Dispatch(crate::backend::DispatchError::UnsupportedFeature { .. })
        ));
        assert_eq!(opener.open_count(), 0, "no push may be attempted");
    }

    #[tokio::test]
    async fn unmanageable_nodes_are_skipped_not_failed() {
        let opener = Arc::new(RecordingOpener::new());
        let mut gnmi_node = netconf_node("sw2", "10.0.0.2");
        if let Some(mgmt) = gnmi_node.management.as_mut() {
            mgmt.protocol = ManagementProtocol::Gnmi;
        }
        let silent_node = Node {
            id: "es1".into(),
            name: String::new(),
            management: None,
            ports: vec![],
        };

        let store = MemoryStore::new(Topology {
            nodes: vec![netconf_node("sw1", "10.0.0.1"), gnmi_node, silent_node],
        })
        .with_device_model("sw1", legacy_model());
        let engine = ConfigEngine::new(registry(&opener), Arc::new(store));

        let topology = engine.store.get_topology().await.unwrap();
        let report = engine
            .apply_topology_config(&intent(), &topology, "secret")
            .await;

        assert_eq!(report.succeeded.len(), 1);
        assert!(report.failed.is_empty());
        assert_eq!(report.skipped.len(), 2);
        assert!(report
            .skipped
            .iter()
            .any(|s| s.reason == SkipReason::NoBackend(ManagementProtocol::Gnmi)));
        assert!(report
            .skipped
            .iter()
            .any(|s| s.reason == SkipReason::NoManagementInfo));
        assert!(report.is_fully_applied(), "skips do not taint the outcome");
    }

    #[tokio::test]
    async fn missing_device_model_fails_the_node_but_not_the_run() {
        let opener = Arc::new(RecordingOpener::new());
        let store = MemoryStore::new(Topology {
            nodes: vec![
                netconf_node("sw1", "10.0.0.1"),
                netconf_node("sw2", "10.0.0.2"),
            ],
        })
        .with_device_model("sw1", legacy_model());
        let engine = ConfigEngine::new(registry(&opener), Arc::new(store));

        let topology = engine.store.get_topology().await.unwrap();
        let report = engine
            .apply_topology_config(&intent(), &topology, "secret")
            .await;

        assert_eq!(report.succeeded.len(), 1);
        assert_eq!(report.failed.len(), 1);
        assert!(matches!(report.failed[0].error, TargetError::Model(_)));
    }

    #[tokio::test]
    async fn cancellation_stops_new_pushes_and_keeps_the_report_consistent() {
        let opener = Arc::new(RecordingOpener::new());
        let engine = ConfigEngine::new(registry(&opener), Arc::new(three_node_store()));
        engine.cancellation_token().cancel();

        let topology = engine.store.get_topology().await.unwrap();
        let report = engine
            .apply_topology_config(&intent(), &topology, "secret")
            .await;

        assert_eq!(report.attempted(), 0);
        assert_eq!(report.skipped.len(), 3);
        assert!(report
            .skipped
            .iter()
            .all(|s| s.reason == SkipReason::Cancelled));
        assert_eq!(opener.pushes().len(), 0);
    }

    #[tokio::test]
    async fn missing_configuration_aborts_the_whole_call() {
        let opener = Arc::new(RecordingOpener::new());
        let engine = ConfigEngine::new(registry(&opener), Arc::new(three_node_store()));

        let err = engine.apply_configuration("no-such-id", "secret").await;
        assert!(matches!(err, Err(EngineError::Configuration { .. })));
    }

    #[tokio::test]
    async fn apply_last_configuration_uses_the_stored_id() {
        let opener = Arc::new(RecordingOpener::new());
        let store = three_node_store().with_configuration("req-1", intent());
        let engine = ConfigEngine::new(registry(&opener), Arc::new(store));

        let report = engine
            .apply_last_configuration("secret")
            .await
            .unwrap()
            .expect("a last configuration exists");
        assert!(report.is_fully_applied());

        let empty_engine = ConfigEngine::new(
            registry(&opener),
            Arc::new(MemoryStore::new(Topology::default())),
        );
        assert!(empty_engine
            .apply_last_configuration("secret")
            .await
            .unwrap()
            .is_none());
    }
}
