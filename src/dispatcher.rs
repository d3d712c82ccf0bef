// src/dispatcher.rs

use std::sync::Arc;
use tracing::{debug, error, info, info_span, Dispatch};

use crate::config::NotifierConfig;
use crate::domain::{ListingRecord, MessageTemplate, Recipient};
use crate::errors::Result;
use crate::processor::Processor;
use crate::telegram::{HttpTransport, Sleeper, TelegramClient, ThreadSleeper, Transport};

/// Announces listings to a fixed set of Telegram chats.
///
/// Holds only configuration, so one dispatcher can announce any number of
/// listings. Delivery problems are logged and never returned.
pub struct Dispatcher {
    client: TelegramClient,
    receiver_ids: Option<Vec<Recipient>>,
    template: MessageTemplate,
    log: Option<Dispatch>,
}

impl Dispatcher {
    /// Build a dispatcher talking HTTP to the configured Bot API.
    pub fn new(config: &NotifierConfig) -> Result<Self> {
        let transport = HttpTransport::new(
            config.bot_token.clone(),
            config.api_base.clone(),
            config.request_timeout(),
        )?;
        Self::with_transport(config, Box::new(transport), Arc::new(ThreadSleeper))
    }

    /// Build a dispatcher on top of any transport and sleeper.
    pub fn with_transport(
        config: &NotifierConfig,
        transport: Box<dyn Transport>,
        sleeper: Arc<dyn Sleeper>,
    ) -> Result<Self> {
        Ok(Self {
            client: TelegramClient::new(transport, sleeper, config.retry.clone()),
            receiver_ids: config.receiver_ids.clone(),
            template: config.template()?,
            log: None,
        })
    }

    /// Replace the configured receivers.
    pub fn with_recipients(mut self, recipients: Vec<Recipient>) -> Self {
        self.receiver_ids = Some(recipients);
        self
    }

    /// Route this dispatcher's logs to `dispatch` instead of the global
    /// subscriber.
    pub fn with_log_dispatch(mut self, dispatch: Dispatch) -> Self {
        self.log = Some(dispatch);
        self
    }

    pub fn recipients(&self) -> &[Recipient] {
        self.receiver_ids.as_deref().unwrap_or(&[])
    }

    /// The primary message for `listing`, trimmed.
    pub fn render(&self, listing: &ListingRecord) -> Result<String> {
        Ok(self.template.render(listing)?.trim().to_string())
    }

    /// Send the listing, its images and its description to every receiver,
    /// then hand the listing back.
    pub fn announce(&self, listing: ListingRecord) -> ListingRecord {
        match &self.log {
            Some(dispatch) => tracing::dispatcher::with_default(dispatch, || self.deliver(&listing)),
            None => self.deliver(&listing),
        }
        listing
    }

    fn deliver(&self, listing: &ListingRecord) {
        let span = info_span!("announce", listing = listing.log_label());
        let _guard = span.enter();

        let message = match self.render(listing) {
            Ok(message) => message,
            Err(e) => {
                error!(error = %e, "Could not render listing message, skipping listing");
                return;
            }
        };

        let Some(recipients) = self.receiver_ids.as_deref() else {
            debug!("No receivers configured, nothing to send");
            return;
        };

        info!(receivers = recipients.len(), "Announcing listing");

        self.client.send_text(recipients, &message, true);

        let images = listing.image_urls();
        if images.is_empty() {
            debug!("No images to send");
        } else {
            self.client.send_images(recipients, images);
        }

        if let Some(description) = listing.description_text() {
            self.client.send_text(recipients, description, false);
        }
    }
}

impl Processor for Dispatcher {
    fn process_listing(&self, listing: ListingRecord) -> ListingRecord {
        self.announce(listing)
    }
}
