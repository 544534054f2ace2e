/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! cnc-config – centralized TSN configuration service
//!
//! Translates protocol-neutral intent models (gate-control schedules) into
//! schema-version-specific YANG wire payloads and pushes them over NETCONF
//! to every capable node/port of a network topology.
//!
//! Module layout:
//!
//! ```text
//! lib.rs
//! ├── intent/    – protocol-neutral intent model (gate schedules)
//! ├── device/    – per-device schema-capability snapshots
//! ├── topology/  – nodes, ports, management reachability, push targets
//! ├── wire/      – generic structure → namespace-qualified XML encoder
//! ├── plugin/    – plugin contract + gate-schedule variants (per schema rev)
//! ├── backend/   – per-protocol plugin sets, capability matching, registry
//! ├── engine/    – topology fan-out with per-target failure isolation
//! ├── session/   – management-session traits + NETCONF-over-SSH adapter
//! ├── store/     – device models / topology / configurations (trait + YAML)
//! ├── grpc/      – thin northbound ConfigService wrapper
//! └── proto/     – generated gRPC/protobuf types & stubs
//! ```
//!
//! Dispatch pipeline for one target:
//!
//! ```text
//! IntentMessage ──► BackendRegistry ──► ProtocolBackend ──► Plugin::map ──► Plugin::push
//!                    (by protocol)       (capability gate)    (pure)          (edit-config)
//! ```

pub mod backend;
pub mod device;
pub mod engine;
pub mod grpc;
pub mod intent;
pub mod plugin;
pub mod proto;
pub mod session;
pub mod store;
pub mod topology;
pub mod wire;
