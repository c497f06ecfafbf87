use crate::models::SignupPayload;
use crate::services::signup::{errors::SignupError, service::SignupService};
use async_trait::async_trait;
use http::StatusCode;
use reqwest::{Client, Url};
use serde_json::Value;
use tracing::debug;

const MESSAGE_KEYS: [&str; 3] = ["message", "error", "detail"];

#[derive(Clone)]
pub struct SignupClient {
    pub client: Client,
    pub endpoint_url: String,
}

impl SignupClient {
    pub fn new(client: Client, endpoint_url: impl Into<String>) -> Self {
        SignupClient {
            client,
            endpoint_url: endpoint_url.into(),
        }
    }
}

/// Blank messages count as absent; anything else is kept as sent.
fn non_empty(text: &str) -> Option<String> {
    if text.trim().is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}

fn field_messages(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => non_empty(text),
        Value::Array(items) => {
            let messages: Vec<String> = items
                .iter()
                .filter_map(Value::as_str)
                .filter_map(non_empty)
                .collect();
            if messages.is_empty() {
                None
            } else {
                Some(messages.join(", "))
            }
        }
        _ => None,
    }
}

fn message_from_json(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => non_empty(text),
        Value::Object(map) => {
            if let Some(message) = MESSAGE_KEYS
                .iter()
                .filter_map(|key| map.get(*key))
                .filter_map(Value::as_str)
                .find_map(non_empty)
            {
                return Some(message);
            }

            // {"username": ["A user with that username already exists."]}
            let per_field: Vec<String> = map
                .iter()
                .filter_map(|(field, value)| {
                    field_messages(value).map(|messages| format!("{}: {}", field, messages))
                })
                .collect();
            if per_field.is_empty() {
                None
            } else {
                Some(per_field.join("; "))
            }
        }
        _ => None,
    }
}

/// Extracts the error message a rejected signup response carries, if any.
pub fn server_message(body: &str) -> Option<String> {
    if body.trim().is_empty() {
        return None;
    }
    match serde_json::from_str::<Value>(body) {
        Ok(value) => message_from_json(&value),
        Err(_) => Some(body.to_string()),
    }
}

#[async_trait]
impl SignupService for SignupClient {
    async fn signup(&self, payload: &SignupPayload) -> Result<Value, SignupError> {
        let url = Url::parse(&self.endpoint_url).map_err(|err| {
            SignupError::Other(format!(
                "invalid signup endpoint '{}': {}",
                self.endpoint_url, err
            ))
        })?;
        let body = serde_json::to_vec(payload).map_err(|err| {
            SignupError::Other(format!("could not encode signup payload: {}", err))
        })?;

        let response = self
            .client
            .post(url)
            .header(reqwest::header::ACCEPT, "application/json")
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let status =
                StatusCode::from_u16(status.as_u16()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            return Err(SignupError::Api {
                status,
                message: server_message(&body),
            });
        }

        if body.trim().is_empty() {
            return Ok(Value::Null);
        }
        match serde_json::from_str::<Value>(&body) {
            Ok(value) => Ok(value),
            Err(err) => {
                debug!(%err, "signup response body is not JSON");
                Ok(Value::String(body))
            }
        }
    }
}
