use crate::client::TransportError;
use serde::Serialize;
use thiserror::Error;

/// Missing or malformed navigation parameters, detected before any network call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("missing required parameter(s): {}", .0.join(", "))]
    Missing(Vec<&'static str>),
    #[error("parameter `{0}` must be an integer")]
    Malformed(&'static str),
}

/// Client-side password rules for the reset form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PolicyViolation {
    #[error("passwords do not match")]
    Mismatch,
    #[error("password does not meet the strength policy")]
    TooWeak,
}

/// Every way a flow can end in `Failure`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FlowError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    LocalPolicy(#[from] PolicyViolation),
    #[error("remote rejected the request: {}", .message.as_deref().unwrap_or("no message"))]
    NegativeResult { message: Option<String> },
    #[error(transparent)]
    Transport(#[from] TransportError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureCause {
    Validation,
    NegativeResult,
    Transport,
    LocalPolicy,
}

impl FlowError {
    #[must_use]
    pub fn rejected(message: Option<String>) -> Self {
        Self::NegativeResult { message }
    }

    #[must_use]
    pub const fn cause(&self) -> FailureCause {
        match self {
            Self::Validation(_) => FailureCause::Validation,
            Self::LocalPolicy(_) => FailureCause::LocalPolicy,
            Self::NegativeResult { .. } => FailureCause::NegativeResult,
            Self::Transport(_) => FailureCause::Transport,
        }
    }

    /// Text supplied by the server or the transport; blank text counts as absent.
    #[must_use]
    pub fn supplied_message(&self) -> Option<&str> {
        match self {
            Self::NegativeResult { message } => message
                .as_deref()
                .map(str::trim)
                .filter(|message| !message.is_empty()),
            Self::Transport(err) => err.message(),
            Self::Validation(_) | Self::LocalPolicy(_) => None,
        }
    }
}
