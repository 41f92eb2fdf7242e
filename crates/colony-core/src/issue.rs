//! Non-fatal problems recorded while a turn runs.

use serde::{Deserialize, Serialize};

/// How a recorded issue was handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    /// A referenced id was missing; a neutral default was used.
    MissingReference,
    /// Work could not happen (locked activity, hidden location).
    Blocked,
    /// A value was out of bounds and was corrected.
    InvariantCorrected,
    /// A subsystem failed and the turn was rolled back.
    Subsystem,
}

/// One recorded problem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnIssue {
    /// Classification.
    pub kind: IssueKind,
    /// Human-readable description.
    pub message: String,
}

impl TurnIssue {
    /// A missing-reference issue.
    pub fn missing(message: impl Into<String>) -> Self {
        Self {
            kind: IssueKind::MissingReference,
            message: message.into(),
        }
    }

    /// A blocked-work issue.
    pub fn blocked(message: impl Into<String>) -> Self {
        Self {
            kind: IssueKind::Blocked,
            message: message.into(),
        }
    }

    /// A corrected-invariant issue.
    pub fn corrected(message: impl Into<String>) -> Self {
        Self {
            kind: IssueKind::InvariantCorrected,
            message: message.into(),
        }
    }

    /// A fatal subsystem failure.
    pub fn subsystem(message: impl Into<String>) -> Self {
        Self {
            kind: IssueKind::Subsystem,
            message: message.into(),
        }
    }

    /// Whether this issue aborted the turn.
    pub const fn is_fatal(&self) -> bool {
        matches!(self.kind, IssueKind::Subsystem)
    }
}
