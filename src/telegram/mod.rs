//! Delivery to the Telegram Bot API.
//!
//! `TelegramClient` turns text and image lists into paced API calls and
//! logs every outcome; nothing in here returns delivery errors to the caller.

mod client;
mod images;
mod pacing;
mod response;
mod retry;
mod text;
mod transport;

pub use client::TelegramClient;
pub use images::{
    normalize_image_url, plan_batches, ImageBatch, GROUP_PACING, MAX_GROUP_SIZE,
    RECIPIENT_PACING,
};
pub use pacing::{Sleeper, ThreadSleeper};
pub use response::ProviderResponse;
pub use retry::RetryPolicy;
pub use text::{encode_text, split_segments, MAX_SEGMENT_LEN, SEGMENT_PACING, SEPARATOR};
pub use transport::{HttpTransport, Transport, DEFAULT_API_BASE};

use std::fmt;

use crate::domain::Recipient;

/// Bot API methods used by the notifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiMethod {
    SendMessage,
    SendPhoto,
    SendMediaGroup,
}

impl ApiMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            ApiMethod::SendMessage => "sendMessage",
            ApiMethod::SendPhoto => "sendPhoto",
            ApiMethod::SendMediaGroup => "sendMediaGroup",
        }
    }

    /// Text sends only count as delivered on exactly 200, media sends on
    /// anything up to 290. The provider has always been checked this way.
    pub fn is_success(self, status: u16) -> bool {
        match self {
            ApiMethod::SendMessage => status == 200,
            ApiMethod::SendPhoto | ApiMethod::SendMediaGroup => status <= 290,
        }
    }
}

impl fmt::Display for ApiMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The thing sent in one call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryUnit {
    /// Already percent-encoded, at most `MAX_SEGMENT_LEN` long.
    TextSegment(String),
    ImageBatch(ImageBatch),
}

impl DeliveryUnit {
    pub fn into_call(self, chat_id: &Recipient) -> ApiCall {
        let chat_id = chat_id.clone();
        match self {
            DeliveryUnit::TextSegment(text) => ApiCall::SendMessage { chat_id, text },
            DeliveryUnit::ImageBatch(ImageBatch::Single(photo)) => {
                ApiCall::SendPhoto { chat_id, photo }
            }
            DeliveryUnit::ImageBatch(ImageBatch::Group(media)) => {
                ApiCall::SendMediaGroup { chat_id, media }
            }
        }
    }
}

/// One outbound request, before it is turned into HTTP.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiCall {
    SendMessage { chat_id: Recipient, text: String },
    SendPhoto { chat_id: Recipient, photo: String },
    SendMediaGroup { chat_id: Recipient, media: Vec<String> },
}

impl ApiCall {
    pub fn method(&self) -> ApiMethod {
        match self {
            ApiCall::SendMessage { .. } => ApiMethod::SendMessage,
            ApiCall::SendPhoto { .. } => ApiMethod::SendPhoto,
            ApiCall::SendMediaGroup { .. } => ApiMethod::SendMediaGroup,
        }
    }

    pub fn chat_id(&self) -> &Recipient {
        match self {
            ApiCall::SendMessage { chat_id, .. }
            | ApiCall::SendPhoto { chat_id, .. }
            | ApiCall::SendMediaGroup { chat_id, .. } => chat_id,
        }
    }
}
