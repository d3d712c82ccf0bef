// errors.rs
use std::time::Duration;

use crate::telegram::ApiMethod;

/// Errors raised while rendering, sending or configuring notifications.
///
/// Only the bootstrap variants (`Config`, `Io`, `Json`) ever leave the crate;
/// everything that happens during a dispatch is logged at the call site.
#[derive(Debug, thiserror::Error)]
pub enum NotifierError {
    #[error("Template error: {0}")]
    Template(String),

    #[error("Listing is missing `{0}`, which the message template requires")]
    MissingField(&'static str),

    #[error("Request failed: {0}")]
    Request(String),

    #[error("{method} returned status {status}: {body}")]
    Transport {
        method: ApiMethod,
        status: u16,
        body: serde_json::Value,
    },

    #[error("{method} returned status 429 (throttled, provider asks to wait {retry_after:?}): {body}")]
    Throttled {
        method: ApiMethod,
        retry_after: Duration,
        body: serde_json::Value,
    },

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl NotifierError {
    /// True for the variants that stop a listing from being announced at all.
    pub fn is_render_error(&self) -> bool {
        matches!(self, NotifierError::Template(_) | NotifierError::MissingField(_))
    }

    /// The provider's requested wait, for throttled calls.
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            NotifierError::Throttled { retry_after, .. } => Some(*retry_after),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, NotifierError>;
