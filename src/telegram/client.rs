use std::sync::Arc;
use tracing::debug;

use super::{ApiCall, ProviderResponse, RetryPolicy, Sleeper, Transport};
use crate::errors::Result;

/// Paced, logged access to the Bot API for one bot.
pub struct TelegramClient {
    pub(super) transport: Box<dyn Transport>,
    pub(super) sleeper: Arc<dyn Sleeper>,
    pub(super) retry: RetryPolicy,
}

impl TelegramClient {
    pub fn new(transport: Box<dyn Transport>, sleeper: Arc<dyn Sleeper>, retry: RetryPolicy) -> Self {
        Self {
            transport,
            sleeper,
            retry,
        }
    }

    /// Issue one call and classify the answer. Every request/response pair
    /// is logged here; the caller logs the failure.
    pub(super) fn deliver(&self, call: &ApiCall) -> Result<ProviderResponse> {
        let method = call.method();
        let chat_id = call.chat_id();

        match call {
            ApiCall::SendMessage { text, .. } => {
                debug!(%method, %chat_id, text = %text, "Sending request")
            }
            ApiCall::SendPhoto { photo, .. } => {
                debug!(%method, %chat_id, photo = %photo, "Sending request")
            }
            ApiCall::SendMediaGroup { media, .. } => {
                debug!(%method, %chat_id, media = media.len(), "Sending request")
            }
        }

        let response = self.transport.execute(call)?;
        debug!(
            %method,
            %chat_id,
            status = response.status,
            body = %response.body,
            "Got response"
        );

        response.into_result(method)
    }
}
