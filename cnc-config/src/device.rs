/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Device schema-capability snapshots.
//!
//! A [`DeviceModel`] is the per-switch list of installed YANG modules (name +
//! revision) as reported by the device model registry.  Plugins consult it to
//! decide whether their mapping can be applied to a given device at all —
//! presence of the required modules proves the schema is installed, **not**
//! that every leaf or RPC the plugin emits is implemented by the firmware.
//!
//! Both types are read-only once constructed: the core never mutates a
//! snapshot it received from the store.

use std::collections::HashSet;
use std::fmt;

use serde::Deserialize;

// ── SchemaModule ──────────────────────────────────────────────────────────────

/// One unit of installed device schema: a YANG module name plus its revision
/// date (`YYYY-MM-DD`).
///
/// Two modules are equal only when both name **and** revision match — a
/// device carrying `ieee802-dot1q-sched@2018-09-10` does not satisfy a plugin
/// that requires the 2023 revision of the same module.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
pub struct SchemaModule {
    pub name: String,
    pub revision: String,
}

impl SchemaModule {
    pub fn new(name: impl Into<String>, revision: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            revision: revision.into(),
        }
    }
}

impl fmt::Display for SchemaModule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.name, self.revision)
    }
}

// ── DeviceModel ───────────────────────────────────────────────────────────────

/// Snapshot of the schema modules installed on one device.
///
/// Owned by the store layer; the core only reads it.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct DeviceModel {
    modules: HashSet<SchemaModule>,
}

impl DeviceModel {
    pub fn new(modules: impl IntoIterator<Item = SchemaModule>) -> Self {
        Self {
            modules: modules.into_iter().collect(),
        }
    }

    /// Exact (name, revision) membership test.
    pub fn has_module(&self, name: &str, revision: &str) -> bool {
        self.modules
            .iter()
            .any(|m| m.name == name && m.revision == revision)
    }

    /// True iff every module in `required` is installed, at the exact
    /// required revision.
    ///
    /// This is the capability gate behind
    /// [`Plugin::supported_by_device`](crate::plugin::Plugin::supported_by_device).
    pub fn supports_all(&self, required: &[SchemaModule]) -> bool {
        required.iter().all(|m| self.modules.contains(m))
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn sched_model(revision: &str) -> DeviceModel {
        DeviceModel::new([
            SchemaModule::new("ieee802-dot1q-sched", revision),
            SchemaModule::new("ieee802-dot1q-sched-bridge", revision),
            SchemaModule::new("ietf-interfaces", "2018-02-20"),
        ])
    }

    #[test]
    fn has_module_requires_exact_revision() {
        let model = sched_model("2018-09-10");
        assert!(model.has_module("ieee802-dot1q-sched", "2018-09-10"));
        assert!(!model.has_module("ieee802-dot1q-sched", "2023-06-22"));
        assert!(!model.has_module("ieee802-dot1q-sched", ""));
    }

    #[test]
    fn supports_all_is_a_subset_test() {
        let model = sched_model("2018-09-10");
        let required = [
            SchemaModule::new("ieee802-dot1q-sched", "2018-09-10"),
            SchemaModule::new("ieee802-dot1q-sched-bridge", "2018-09-10"),
        ];
        assert!(model.supports_all(&required));

        let too_much = [
            SchemaModule::new("ieee802-dot1q-sched", "2018-09-10"),
            SchemaModule::new("ieee802-dot1q-preemption", "2018-09-10"),
        ];
        assert!(!model.supports_all(&too_much));
    }

    #[test]
    fn supports_all_of_empty_set_is_true() {
        assert!(DeviceModel::default().supports_all(&[]));
    }

    #[test]
    fn revision_mismatch_fails_the_whole_set() {
        let model = sched_model("2023-06-22");
        let required = [
            SchemaModule::new("ieee802-dot1q-sched", "2018-09-10"),
            SchemaModule::new("ieee802-dot1q-sched-bridge", "2018-09-10"),
        ];
        assert!(!model.supports_all(&required));
    }

    #[test]
    fn deserializes_from_a_plain_module_list() {
        let yaml = r#"
- name: ieee802-dot1q-sched
  revision: "2018-09-10"
- name: ietf-interfaces
  revision: "2018-02-20"
"#;
        let model: DeviceModel = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(model.len(), 2);
        assert!(model.has_module("ietf-interfaces", "2018-02-20"));
    }
}
