use core::fmt;

use serde::Serialize;

/// Where the signup submission currently stands. Exactly one state holds at
/// a time; `Succeeded` and `Failed` are the settled states.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SubmissionState {
    #[default]
    Idle,
    Pending,
    Succeeded,
    Failed(String),
}

impl SubmissionState {
    pub fn loading(&self) -> bool {
        matches!(self, SubmissionState::Pending)
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            SubmissionState::Failed(message) => Some(message),
            _ => None,
        }
    }

    pub fn success(&self) -> bool {
        matches!(self, SubmissionState::Succeeded)
    }

    pub fn flags(&self) -> SubmissionFlags {
        SubmissionFlags::from(self)
    }
}

impl fmt::Display for SubmissionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubmissionState::Idle => write!(f, "idle"),
            SubmissionState::Pending => write!(f, "pending"),
            SubmissionState::Succeeded => write!(f, "succeeded"),
            SubmissionState::Failed(message) => write!(f, "failed: {}", message),
        }
    }
}

/// The `{loading, error, success}` view a front end renders from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SubmissionFlags {
    pub loading: bool,
    pub error: Option<String>,
    pub success: bool,
}

impl From<&SubmissionState> for SubmissionFlags {
    fn from(state: &SubmissionState) -> Self {
        SubmissionFlags {
            loading: state.loading(),
            error: state.error().map(str::to_string),
            success: state.success(),
        }
    }
}
