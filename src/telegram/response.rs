use serde_json::Value;
use std::time::Duration;

use super::ApiMethod;
use crate::errors::{NotifierError, Result};

const TOO_MANY_REQUESTS: u16 = 429;

/// Status and body of one Bot API call.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderResponse {
    pub status: u16,
    pub body: Value,
}

impl ProviderResponse {
    pub fn new(status: u16, body: Value) -> Self {
        Self { status, body }
    }

    /// Parse the raw body as JSON, keeping it as a plain string otherwise.
    pub fn from_raw(status: u16, text: &str) -> Self {
        let body = serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string()));
        Self { status, body }
    }

    /// `parameters.retry_after` from a throttled response, if it is a
    /// whole number of seconds.
    pub fn retry_after(&self) -> Option<Duration> {
        self.body
            .get("parameters")
            .and_then(|p| p.get("retry_after"))
            .and_then(Value::as_u64)
            .map(Duration::from_secs)
    }

    /// Classify the response against the success predicate of `method`.
    pub fn into_result(self, method: ApiMethod) -> Result<ProviderResponse> {
        if method.is_success(self.status) {
            return Ok(self);
        }

        if self.status == TOO_MANY_REQUESTS {
            if let Some(retry_after) = self.retry_after() {
                return Err(NotifierError::Throttled {
                    method,
                    retry_after,
                    body: self.body,
                });
            }
        }

        Err(NotifierError::Transport {
            method,
            status: self.status,
            body: self.body,
        })
    }
}
