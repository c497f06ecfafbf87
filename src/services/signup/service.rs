use crate::models::SignupPayload;
use crate::services::signup::errors::SignupError;
use async_trait::async_trait;
use serde_json::Value;

#[async_trait]
pub trait SignupService: Send + Sync {
    /// Posts the payload once. Returns the response body on any 2xx.
    async fn signup(&self, payload: &SignupPayload) -> Result<Value, SignupError>;
}
