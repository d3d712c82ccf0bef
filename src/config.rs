// src/config.rs

use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

use crate::domain::{MessageTemplate, Recipient};
use crate::errors::{NotifierError, Result};
use crate::telegram::{RetryPolicy, DEFAULT_API_BASE};

/// Environment variable that overrides `bot_token` from the file.
pub const BOT_TOKEN_ENV: &str = "TELEGRAM_BOT_TOKEN";

/// Notifier settings, usually read from a TOML file:
///
/// ```toml
/// bot_token = "123456:ABC..."
/// receiver_ids = [12345678, "@flat_alerts"]
/// message = "{title}\n{price}\n{url}"
///
/// [retry]
/// max_retries = 3
/// max_delay_secs = 300
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct NotifierConfig {
    pub bot_token: String,
    /// `None` turns every send into a no-op.
    pub receiver_ids: Option<Vec<Recipient>>,
    pub message: Option<String>,
    pub api_base: String,
    pub request_timeout_secs: u64,
    pub retry: RetryPolicy,
}

impl Default for NotifierConfig {
    fn default() -> Self {
        Self {
            bot_token: String::new(),
            receiver_ids: None,
            message: None,
            api_base: DEFAULT_API_BASE.to_string(),
            request_timeout_secs: 30,
            retry: RetryPolicy::default(),
        }
    }
}

impl NotifierConfig {
    /// Read `path` and apply environment overrides.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            NotifierError::Config(format!("Failed to read {}: {e}", path.display()))
        })?;

        let mut config = Self::from_toml_str(&raw)?;
        config.apply_env(std::env::var(BOT_TOKEN_ENV).ok());
        Ok(config)
    }

    pub fn from_toml_str(raw: &str) -> Result<Self> {
        toml::from_str(raw).map_err(|e| NotifierError::Config(e.to_string()))
    }

    fn apply_env(&mut self, bot_token: Option<String>) {
        if let Some(token) = bot_token.filter(|t| !t.trim().is_empty()) {
            self.bot_token = token;
        }
    }

    pub fn template(&self) -> Result<MessageTemplate> {
        match &self.message {
            Some(message) => MessageTemplate::parse(message),
            None => Ok(MessageTemplate::default()),
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_config() {
        let config = NotifierConfig::from_toml_str(
            r#"
            bot_token = "123:ABC"
            receiver_ids = [12345678, "@flat_alerts"]
            message = "{title} {price}"
            request_timeout_secs = 10

            [retry]
            max_retries = 1
            "#,
        )
        .unwrap();

        assert_eq!(config.bot_token, "123:ABC");
        assert_eq!(
            config.receiver_ids,
            Some(vec![Recipient::Id(12345678), Recipient::Handle("@flat_alerts".into())])
        );
        assert_eq!(config.request_timeout(), Duration::from_secs(10));
        assert_eq!(config.retry.max_retries, 1);
        assert_eq!(config.retry.max_delay, Duration::from_secs(300));
        assert_eq!(config.api_base, DEFAULT_API_BASE);
    }

    #[test]
    fn missing_receivers_stay_none() {
        let config = NotifierConfig::from_toml_str(r#"bot_token = "t""#).unwrap();
        assert!(config.receiver_ids.is_none());
        assert!(config.message.is_none());
    }

    #[test]
    fn env_token_overrides_file() {
        let mut config = NotifierConfig::from_toml_str(r#"bot_token = "from-file""#).unwrap();

        config.apply_env(Some("   ".into()));
        assert_eq!(config.bot_token, "from-file");

        config.apply_env(Some("from-env".into()));
        assert_eq!(config.bot_token, "from-env");
    }

    #[test]
    fn bad_template_is_reported() {
        let config = NotifierConfig {
            message: Some("{title".into()),
            ..Default::default()
        };
        assert!(matches!(config.template(), Err(NotifierError::Template(_))));
    }

    #[test]
    fn invalid_toml_is_config_error() {
        let err = NotifierConfig::from_toml_str("receiver_ids = [").unwrap_err();
        assert!(matches!(err, NotifierError::Config(_)));
    }
}
