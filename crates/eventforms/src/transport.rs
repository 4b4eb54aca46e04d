//! Submission transport
//!
//! Forwards `{form, eventName}` to the forms API. Each attempt is bounded by
//! a timeout; transport errors and 5xx responses are retried, 4xx are not.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

use crate::submission::SubmissionMap;
use crate::{FormsError, Result};

/// Body of `POST /api/form/submit-form`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitRequest {
    pub form: SubmissionMap,
    pub event_name: String,
}

/// What the forms API answered for an accepted submission.
#[derive(Clone, Debug, PartialEq)]
pub struct SubmissionReceipt {
    pub status: u16,
    pub document: Value,
}

#[async_trait]
pub trait FormSubmitter: Send + Sync {
    async fn submit(&self, request: &SubmitRequest) -> Result<SubmissionReceipt>;
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct SubmitterConfig {
    /// Full URL of the submit endpoint
    pub endpoint: String,
    /// Per-attempt timeout in milliseconds
    pub timeout_ms: u64,
    /// Extra attempts after the first failure
    pub retries: u32,
}

impl SubmitterConfig {
    pub fn for_api(base_url: &str) -> Self {
        Self {
            endpoint: format!("{}/api/form/submit-form", base_url.trim_end_matches('/')),
            ..Self::default()
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Default for SubmitterConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:5000/api/form/submit-form".into(),
            timeout_ms: 10_000,
            retries: 1,
        }
    }
}

/// Outcome of one attempt that did not succeed.
enum AttemptError {
    Retryable(FormsError),
    Fatal(FormsError),
}

pub struct HttpSubmitter {
    config: SubmitterConfig,
    client: reqwest::Client,
}

impl HttpSubmitter {
    pub fn new(config: SubmitterConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| FormsError::SubmissionTransport { status: None, message: e.to_string() })?;
        Ok(Self { config, client })
    }

    pub fn config(&self) -> &SubmitterConfig {
        &self.config
    }

    async fn attempt(&self, request: &SubmitRequest) -> std::result::Result<SubmissionReceipt, AttemptError> {
        let resp = self
            .client
            .post(&self.config.endpoint)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                AttemptError::Retryable(FormsError::SubmissionTransport { status: None, message: e.to_string() })
            })?;

        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(Value::Null);

        if status.is_success() {
            return Ok(SubmissionReceipt { status: status.as_u16(), document: body });
        }

        let message = body
            .get("message")
            .and_then(Value::as_str)
            .map(String::from)
            .unwrap_or_else(|| format!("HTTP {status}"));
        let err = FormsError::SubmissionTransport { status: Some(status.as_u16()), message };
        if status.is_server_error() {
            Err(AttemptError::Retryable(err))
        } else {
            Err(AttemptError::Fatal(err))
        }
    }
}

#[async_trait]
impl FormSubmitter for HttpSubmitter {
    async fn submit(&self, request: &SubmitRequest) -> Result<SubmissionReceipt> {
        let mut attempt = 0;
        loop {
            match self.attempt(request).await {
                Ok(receipt) => {
                    tracing::debug!(event = %request.event_name, status = receipt.status, "submission accepted");
                    return Ok(receipt);
                }
                Err(AttemptError::Retryable(e)) if attempt < self.config.retries => {
                    attempt += 1;
                    tracing::warn!(event = %request.event_name, attempt, error = %e, "submission failed, retrying");
                }
                Err(AttemptError::Retryable(e) | AttemptError::Fatal(e)) => {
                    tracing::error!(event = %request.event_name, error = %e, "submission failed");
                    return Err(e);
                }
            }
        }
    }
}
