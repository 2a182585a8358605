use serde::{Deserialize, Serialize};

use crate::models::resume::FileResult;

pub const PENDING_STATUS: &str = "Processing...";

/// Lifecycle of one upload job, as reported by `GET /status/:task_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobState {
    Pending { status: String },
    /// Finished. Handled per-file errors also land here, inside `result`.
    Success { result: FileResult },
    /// The worker itself died.
    Failure { error: String },
}

impl JobState {
    pub fn pending() -> Self {
        JobState::Pending {
            status: PENDING_STATUS.to_string(),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            JobState::Pending { .. } => "PENDING",
            JobState::Success { .. } => "SUCCESS",
            JobState::Failure { .. } => "FAILURE",
        }
    }

    pub fn is_finished(&self) -> bool {
        !matches!(self, JobState::Pending { .. })
    }
}
