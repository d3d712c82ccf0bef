// src/telegram/transport.rs

use reqwest::blocking::{Client, Request};
use serde::Serialize;
use std::fmt;
use std::time::Duration;
use url::{form_urlencoded, Url};

use super::{ApiCall, ProviderResponse};
use crate::errors::{NotifierError, Result};

pub const DEFAULT_API_BASE: &str = "https://api.telegram.org";

/// Sends one API call and hands back whatever the provider answered.
///
/// A non-success status is still `Ok`; only failures to get an answer at
/// all (DNS, TLS, timeouts) are errors here.
pub trait Transport: Send + Sync {
    fn execute(&self, call: &ApiCall) -> Result<ProviderResponse>;
}

#[derive(Serialize)]
struct InputMediaPhoto<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    media: &'a str,
}

/// Blocking HTTP transport against `{api_base}/bot{token}/{method}`.
pub struct HttpTransport {
    client: Client,
    api_base: String,
    bot_token: String,
}

impl fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpTransport")
            .field("api_base", &self.api_base)
            .field("bot_token", &"<redacted>")
            .finish()
    }
}

impl HttpTransport {
    pub fn new(bot_token: String, api_base: String, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| NotifierError::Request(e.to_string()))?;

        Ok(Self {
            client,
            api_base: api_base.trim_end_matches('/').to_string(),
            bot_token,
        })
    }

    fn endpoint(&self, call: &ApiCall) -> Result<Url> {
        let raw = format!(
            "{}/bot{}/{}",
            self.api_base,
            self.bot_token,
            call.method().as_str()
        );
        Url::parse(&raw).map_err(|e| NotifierError::Config(format!("Invalid api_base: {e}")))
    }

    /// Build the HTTP request for `call` without sending it.
    pub fn build_request(&self, call: &ApiCall) -> Result<Request> {
        let mut url = self.endpoint(call)?;
        let chat_id = call.chat_id().to_string();

        let request = match call {
            // `text` is already percent-encoded and must go out untouched.
            ApiCall::SendMessage { text, .. } => {
                let chat: String = form_urlencoded::byte_serialize(chat_id.as_bytes()).collect();
                url.set_query(Some(&format!("chat_id={chat}&text={text}")));
                self.client.get(url).build()
            }
            ApiCall::SendPhoto { photo, .. } => self
                .client
                .post(url)
                .query(&[("chat_id", chat_id.as_str()), ("photo", photo.as_str())])
                .build(),
            ApiCall::SendMediaGroup { media, .. } => {
                let items: Vec<InputMediaPhoto> = media
                    .iter()
                    .map(|m| InputMediaPhoto {
                        kind: "photo",
                        media: m,
                    })
                    .collect();
                let media_json = serde_json::to_string(&items)?;
                self.client
                    .post(url)
                    .query(&[("chat_id", chat_id.as_str()), ("media", media_json.as_str())])
                    .build()
            }
        };

        request.map_err(|e| NotifierError::Request(e.to_string()))
    }
}

impl Transport for HttpTransport {
    fn execute(&self, call: &ApiCall) -> Result<ProviderResponse> {
        let request = self.build_request(call)?;

        let resp = self
            .client
            .execute(request)
            .map_err(|e| NotifierError::Request(e.without_url().to_string()))?;

        let status = resp.status().as_u16();
        let text = resp
            .text()
            .map_err(|e| NotifierError::Request(e.without_url().to_string()))?;

        Ok(ProviderResponse::from_raw(status, &text))
    }
}
