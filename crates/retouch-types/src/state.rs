//! Observable workflow state

use crate::artifact::ImageArtifact;
use serde::{Deserialize, Serialize};

/// Everything a front end needs to render the edit workflow.
///
/// Owned by the orchestrator; observers only ever see copies.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowState {
    pub original: Option<ImageArtifact>,
    pub edited: Option<ImageArtifact>,
    pub pending_prompt: String,
    pub in_flight: bool,
    pub last_error: Option<String>,
}

/// Coarse phase of the workflow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Idle,
    Submitting,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Phase::Idle => write!(f, "idle"),
            Phase::Submitting => write!(f, "submitting"),
        }
    }
}

impl WorkflowState {
    pub fn phase(&self) -> Phase {
        if self.in_flight {
            Phase::Submitting
        } else {
            Phase::Idle
        }
    }

    /// Whether a submit would pass validation and is not blocked by an
    /// outstanding request. Front ends use this to enable their trigger.
    pub fn can_submit(&self) -> bool {
        !self.in_flight && self.original.is_some() && !self.pending_prompt.trim().is_empty()
    }

    pub fn can_download(&self) -> bool {
        self.edited.is_some()
    }
}
