/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Aggregate fan-out result.
//!
//! One orchestration pass never collapses into a bare pass/fail boolean: the
//! caller always sees which targets succeeded, which failed with what error,
//! and which were skipped (and why).  "Partially applied" is a first-class
//! outcome, not a log line.

use std::fmt;

use thiserror::Error;

use crate::backend::DispatchError;
use crate::store::StoreError;
use crate::topology::ManagementProtocol;

// ── Target identity ───────────────────────────────────────────────────────────

/// One `(node, port)` push destination inside a report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetRef {
    pub node: String,
    pub port: String,
}

impl fmt::Display for TargetRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.node, self.port)
    }
}

// ── Failures and skips ────────────────────────────────────────────────────────

/// Why a single target failed.
#[derive(Debug, Error)]
pub enum TargetError {
    #[error(transparent)]
    Dispatch(#[from] DispatchError),

    /// The device-model snapshot for the node could not be fetched; every
    /// port of that node fails with this, the rest of the run continues.
    #[error("device model unavailable: {0}")]
    Model(#[from] StoreError),
}

#[derive(Debug)]
pub struct TargetFailure {
    pub target: TargetRef,
    pub error: TargetError,
}

/// Why a node or target was never attempted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// Node has no management info — present in the topology but not
    /// configurable.
    NoManagementInfo,
    /// No backend registered for the node's management protocol.
    NoBackend(ManagementProtocol),
    /// Orchestration was cancelled before this target was issued.
    Cancelled,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::NoManagementInfo => write!(f, "no management info"),
            SkipReason::NoBackend(p) => write!(f, "no backend for protocol '{p}'"),
            SkipReason::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// One skipped node (`port: None`) or target.
#[derive(Debug)]
pub struct Skip {
    pub node: String,
    pub port: Option<String>,
    pub reason: SkipReason,
}

// ── ApplyReport ───────────────────────────────────────────────────────────────

/// User-visible classification of one orchestration pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// Every attempted target succeeded (and at least one was attempted).
    FullyApplied,
    /// Some targets succeeded, some failed.
    PartiallyApplied { failed: usize, total: usize },
    /// Nothing was applied: every target failed, or none was attempted.
    NotApplied,
}

impl fmt::Display for ApplyOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApplyOutcome::FullyApplied => write!(f, "fully applied"),
            ApplyOutcome::PartiallyApplied { failed, total } => {
                write!(f, "partially applied ({failed}/{total} targets failed)")
            }
            ApplyOutcome::NotApplied => write!(f, "not applied"),
        }
    }
}

/// Per-target results of one orchestration pass.
#[derive(Debug, Default)]
pub struct ApplyReport {
    pub succeeded: Vec<TargetRef>,
    pub failed: Vec<TargetFailure>,
    pub skipped: Vec<Skip>,
}

impl ApplyReport {
    /// Targets actually issued (successes + failures; skips excluded).
    pub fn attempted(&self) -> usize {
        self.succeeded.len() + self.failed.len()
    }

    pub fn outcome(&self) -> ApplyOutcome {
        match (self.succeeded.is_empty(), self.failed.is_empty()) {
            (false, true) => ApplyOutcome::FullyApplied,
            (false, false) => ApplyOutcome::PartiallyApplied {
                failed: self.failed.len(),
                total: self.attempted(),
            },
            (true, _) => ApplyOutcome::NotApplied,
        }
    }

    pub fn is_fully_applied(&self) -> bool {
        self.outcome() == ApplyOutcome::FullyApplied
    }

    /// One-line summary with per-target failure reasons appended.
    pub fn summary(&self) -> String {
        let mut s = format!(
            "{} ({} succeeded, {} failed, {} skipped)",
            self.outcome(),
            self.succeeded.len(),
            self.failed.len(),
            self.skipped.len()
        );
        if !self.failed.is_empty() {
            let reasons: Vec<String> = self
                .failed
                .iter()
                .map(|f| format!("{}: {}", f.target, f.error))
                .collect();
            s.push_str(&format!("; failures: {}", reasons.join("; ")));
        }
        s
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn target(n: &str) -> TargetRef {
        TargetRef {
            node: n.into(),
            port: "p1".into(),
        }
    }

    fn failure(n: &str) -> TargetFailure {
        TargetFailure {
            target: target(n),
            error: TargetError::Model(StoreError::NotFound {
                key: format!("device-models/{n}"),
            }),
        }
    }

    #[test]
    fn all_successes_classify_as_fully_applied() {
        let report = ApplyReport {
            succeeded: vec![target("a"), target("b")],
            ..Default::default()
        };
        assert_eq!(report.outcome(), ApplyOutcome::FullyApplied);
        assert!(report.is_fully_applied());
    }

    #[test]
    fn mixed_results_classify_as_partially_applied() {
        let report = ApplyReport {
            succeeded: vec![target("a")],
            failed: vec![failure("b"), failure("c")],
            ..Default::default()
        };
        assert_eq!(
            report.outcome(),
            ApplyOutcome::PartiallyApplied {
                failed: 2,
                total: 3
            }
        );
    }

    #[test]
    fn no_successes_classify_as_not_applied() {
        let all_failed = ApplyReport {
            failed: vec![failure("a")],
            ..Default::default()
        };
        assert_eq!(all_failed.outcome(), ApplyOutcome::NotApplied);

        let empty = ApplyReport::default();
        assert_eq!(empty.outcome(), ApplyOutcome::NotApplied);
    }

    #[test]
    fn summary_names_the_failing_targets() {
        let report = ApplyReport {
            succeeded: vec![target("a")],
            failed: vec![failure("b")],
            ..Default::default()
        };
        let summary = report.summary();
        assert!(summary.contains("partially applied"));
        assert!(summary.contains("b/p1"));
        assert!(summary.contains("device model unavailable"));
    }
}
