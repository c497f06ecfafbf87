use http::StatusCode;
use thiserror::Error;

/// Used when the signup request failed but the server gave no usable message.
pub const SIGNUP_FAILED_MESSAGE: &str = "Signup failed";
/// Used when the failure is not a transport or HTTP-level error.
pub const UNKNOWN_ERROR_MESSAGE: &str = "An unknown error occurred";

#[derive(Debug, Error)]
pub enum SignupError {
    #[error("Signup request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Signup endpoint responded with status {status}")]
    Api {
        status: StatusCode,
        message: Option<String>,
    },
    /// Anything that is neither a transport error nor an HTTP rejection,
    /// such as a malformed endpoint URL or a payload that cannot be encoded.
    #[error("Signup failed unexpectedly: {0}")]
    Other(String),
}

impl SignupError {
    /// The single error string shown above the form.
    pub fn user_message(&self) -> String {
        match self {
            SignupError::Api {
                message: Some(message),
                ..
            } => message.clone(),
            SignupError::Api { message: None, .. } | SignupError::Http(_) => {
                SIGNUP_FAILED_MESSAGE.to_string()
            }
            SignupError::Other(_) => UNKNOWN_ERROR_MESSAGE.to_string(),
        }
    }

    pub fn status(&self) -> Option<StatusCode> {
        match self {
            SignupError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}
