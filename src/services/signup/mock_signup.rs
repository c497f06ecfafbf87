use crate::models::SignupPayload;
use crate::services::signup::{errors::SignupError, service::SignupService};
use async_trait::async_trait;
use http::StatusCode;
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

#[derive(Debug, Clone)]
pub enum MockSignupFailure {
    Rejected {
        status: StatusCode,
        message: Option<String>,
    },
    Unknown(String),
}

/// A mock signup service that records submitted payloads for testing purposes.
#[derive(Debug, Default)]
#[allow(dead_code)]
pub struct MockSignupService {
    pub submitted: Mutex<Vec<SignupPayload>>,
    pub response: Value,
    pub failure: Option<MockSignupFailure>,
    /// When set, each call waits for a notification before answering.
    pub hold: Option<Arc<Notify>>,
}

#[allow(dead_code)]
impl MockSignupService {
    pub fn succeeding() -> Self {
        MockSignupService {
            response: json!({ "status": "created" }),
            ..Default::default()
        }
    }

    pub fn rejecting(status: StatusCode, message: Option<&str>) -> Self {
        MockSignupService {
            failure: Some(MockSignupFailure::Rejected {
                status,
                message: message.map(str::to_string),
            }),
            ..Default::default()
        }
    }

    pub fn failing_unexpectedly(reason: &str) -> Self {
        MockSignupService {
            failure: Some(MockSignupFailure::Unknown(reason.to_string())),
            ..Default::default()
        }
    }

    pub fn held(mut self, gate: Arc<Notify>) -> Self {
        self.hold = Some(gate);
        self
    }

    pub fn calls(&self) -> usize {
        self.submitted.lock().unwrap().len()
    }
}

#[async_trait]
impl SignupService for MockSignupService {
    async fn signup(&self, payload: &SignupPayload) -> Result<Value, SignupError> {
        self.submitted.lock().unwrap().push(payload.clone());

        if let Some(gate) = self.hold.as_ref() {
            gate.notified().await;
        }

        match self.failure.clone() {
            Some(MockSignupFailure::Rejected { status, message }) => {
                Err(SignupError::Api { status, message })
            }
            Some(MockSignupFailure::Unknown(reason)) => Err(SignupError::Other(reason)),
            None => Ok(self.response.clone()),
        }
    }
}
