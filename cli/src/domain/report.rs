//! Structured outcomes of mutating operations.
//!
//! Every affected entity gets its own entry so callers can render a line per
//! file, trust-store target or key pair.

use serde::Serialize;

use crate::domain::host::{HostRecord, PublicKeyStatus};
use crate::domain::keys::{KeyFilePair, PairRemoval};

/// Terminal state of create, delete and sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationState {
    /// Every step succeeded.
    Committed,
    /// Nothing was persisted; any created artifact was removed again.
    RolledBack,
    /// The primary action succeeded but at least one sub-step did not.
    PartiallyFailed,
}

/// Outcome of a non-fatal sub-step such as trust-store removal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "result", content = "reason", rename_all = "snake_case")]
pub enum StepOutcome {
    Done,
    Failed(String),
}

impl StepOutcome {
    #[must_use]
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

/// Report of a host creation, saved or discarded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateReport {
    pub state: OperationState,
    pub record: HostRecord,
    pub public_key: PublicKeyStatus,
    /// Key pair removal performed when the host was discarded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rollback: Option<PairRemoval>,
}

/// Trust-store removal for one target (alias or `[host]:port`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrustStoreRemoval {
    pub target: String,
    pub outcome: StepOutcome,
}

/// Report of a host deletion. Only produced once the record is removed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeleteReport {
    pub name: String,
    /// `None` when the record had no identity file.
    pub keys: Option<PairRemoval>,
    pub trust_store: Vec<TrustStoreRemoval>,
}

impl DeleteReport {
    /// A missing key file counts as a flagged sub-step, not a silent no-op.
    #[must_use]
    pub fn state(&self) -> OperationState {
        let keys_ok = self.keys.as_ref().is_none_or(PairRemoval::is_complete);
        let trust_ok = self.trust_store.iter().all(|t| !t.outcome.is_failed());
        if keys_ok && trust_ok {
            OperationState::Committed
        } else {
            OperationState::PartiallyFailed
        }
    }
}

/// What happened to one orphaned key pair during a sweep.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum SweepOutcome {
    Removed { removal: PairRemoval },
    Skipped { pair: KeyFilePair },
    Failed { removal: PairRemoval },
}

/// Report of a cleanup sweep.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SweepReport {
    pub items: Vec<SweepOutcome>,
}

impl SweepReport {
    #[must_use]
    pub fn removed(&self) -> usize {
        self.count(|o| matches!(o, SweepOutcome::Removed { .. }))
    }

    #[must_use]
    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, SweepOutcome::Skipped { .. }))
    }

    #[must_use]
    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, SweepOutcome::Failed { .. }))
    }

    /// No orphan was found.
    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.items.is_empty()
    }

    #[must_use]
    pub fn state(&self) -> OperationState {
        if self.failed() == 0 {
            OperationState::Committed
        } else {
            OperationState::PartiallyFailed
        }
    }

    fn count(&self, pred: impl Fn(&SweepOutcome) -> bool) -> usize {
        self.items.iter().filter(|o| pred(o)).count()
    }
}
