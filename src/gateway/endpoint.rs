//! HTTP client for the survey submission endpoint.
//!
//! The endpoint accepts the serialized record as JSON and answers with either
//! `{ "recordId": ... }` or `{ "error": ..., "details": [{ field?, message }] }`.
use super::{Gateway, GatewayError, SubmissionPayload, SubmissionReceipt};
use crate::survey::validate::FieldError;
use serde::Deserialize;
use serde_json::Value;
use std::time::{Duration, Instant};
use ureq::Agent;

const SUBMIT_FAILED: &str = "Failed to submit survey";
const SUBMIT_FAILED_RETRY: &str = "Failed to submit survey. Please try again.";

pub struct EndpointGateway {
    url: String,
    agent: Agent,
}

impl EndpointGateway {
    /// Build a client for `url`. `timeout` of `None` waits for completion.
    pub fn new(url: impl Into<String>, timeout: Option<Duration>) -> Self {
        let agent: Agent = Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(timeout)
            .build()
            .into();
        EndpointGateway {
            url: url.into(),
            agent,
        }
    }
}

impl Gateway for EndpointGateway {
    fn submit(&self, payload: &SubmissionPayload) -> Result<SubmissionReceipt, GatewayError> {
        let start = Instant::now();
        let mut response = self
            .agent
            .post(self.url.as_str())
            .send_json(payload)
            .map_err(|err| GatewayError::Transport(err.to_string()))?;
        let status = response.status().as_u16();
        let body = response
            .body_mut()
            .read_to_string()
            .map_err(|err| GatewayError::Transport(err.to_string()))?;
        tracing::info!(
            status,
            elapsed_ms = start.elapsed().as_millis(),
            body_bytes = body.len(),
            "survey endpoint responded"
        );
        interpret_response(status, &body)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SuccessBody {
    #[serde(default)]
    record_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FailureBody {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    details: Option<Vec<Value>>,
}

/// Map an endpoint response onto the gateway result.
pub fn interpret_response(status: u16, body: &str) -> Result<SubmissionReceipt, GatewayError> {
    if (200..300).contains(&status) {
        let record_id = serde_json::from_str::<SuccessBody>(body)
            .ok()
            .and_then(|parsed| parsed.record_id);
        return Ok(SubmissionReceipt {
            record_id,
            fields: None,
        });
    }

    let Ok(failure) = serde_json::from_str::<FailureBody>(body) else {
        let text = body.trim();
        let message = if text.is_empty() { SUBMIT_FAILED } else { text };
        return Err(GatewayError::rejected(message));
    };

    let details: Vec<FieldError> = failure
        .details
        .unwrap_or_default()
        .iter()
        .map(detail_from_value)
        .collect();
    if !details.is_empty() {
        return Err(GatewayError::Rejected {
            message: failure.error.unwrap_or_else(|| SUBMIT_FAILED_RETRY.to_string()),
            details,
        });
    }
    match failure.error {
        Some(message) => Err(GatewayError::rejected(message)),
        None => Err(GatewayError::rejected(SUBMIT_FAILED_RETRY)),
    }
}

/// Details are expected as `{ field?, message }`; anything else is shown as text.
fn detail_from_value(value: &Value) -> FieldError {
    let field = value
        .get("field")
        .and_then(Value::as_str)
        .map(str::to_string);
    let message = match value.get("message") {
        Some(Value::String(text)) => text.clone(),
        Some(other) if !other.is_null() => other.to_string(),
        _ => match value {
            Value::String(text) => text.clone(),
            other => other.to_string(),
        },
    };
    FieldError { field, message }
}
