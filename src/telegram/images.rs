use std::time::Duration;
use tracing::{debug, error};

use super::{ApiCall, DeliveryUnit, TelegramClient};
use crate::domain::Recipient;

/// Photos per `sendMediaGroup`; the provider accepts 10, we stay one below.
pub const MAX_GROUP_SIZE: usize = 9;

/// Pause before a recipient's images start.
pub const RECIPIENT_PACING: Duration = Duration::from_secs(1);

/// Pause before every group after the first one for a recipient.
pub const GROUP_PACING: Duration = Duration::from_secs(3);

const ORIGINAL_MARKER: &str = "/ORIG";

/// One image call worth of photos.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageBatch {
    Single(String),
    Group(Vec<String>),
}

impl ImageBatch {
    pub fn len(&self) -> usize {
        match self {
            ImageBatch::Single(_) => 1,
            ImageBatch::Group(urls) => urls.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Drop the `/ORIG...` resolution suffix some portals append.
pub fn normalize_image_url(url: &str) -> &str {
    match url.find(ORIGINAL_MARKER) {
        Some(idx) => &url[..idx],
        None => url,
    }
}

/// Normalize and partition `urls` into consecutive batches of at most
/// `MAX_GROUP_SIZE`. A batch holding a single photo goes out as `Single`.
pub fn plan_batches(urls: &[String]) -> Vec<ImageBatch> {
    let normalized: Vec<String> = urls
        .iter()
        .map(|u| normalize_image_url(u).to_string())
        .collect();

    normalized
        .chunks(MAX_GROUP_SIZE)
        .map(|chunk| match chunk {
            [only] => ImageBatch::Single(only.clone()),
            many => ImageBatch::Group(many.to_vec()),
        })
        .collect()
}

impl TelegramClient {
    /// Send the listing's photos to every recipient, in batches.
    pub fn send_images(&self, recipients: &[Recipient], image_urls: &[String]) {
        let batches = plan_batches(image_urls);
        if batches.is_empty() {
            debug!("No images to send");
            return;
        }

        debug!(
            images = image_urls.len(),
            batches = batches.len(),
            "Sending images"
        );

        for chat_id in recipients {
            self.sleeper.sleep(RECIPIENT_PACING);

            for (i, batch) in batches.iter().enumerate() {
                if i > 0 {
                    self.sleeper.sleep(GROUP_PACING);
                }

                match DeliveryUnit::ImageBatch(batch.clone()).into_call(chat_id) {
                    call @ ApiCall::SendMediaGroup { .. } => self.send_media_group(&call),
                    call => self.send_photo(&call),
                }
            }
        }
    }

    fn send_photo(&self, call: &ApiCall) {
        let chat_id = call.chat_id();
        match self.deliver(call) {
            Ok(_) => debug!(%chat_id, "Image sent"),
            Err(e) => error!(
                %chat_id,
                error = %e,
                "When sending bot photo message, the provider did not accept it"
            ),
        }
    }

    fn send_media_group(&self, call: &ApiCall) {
        let chat_id = call.chat_id();
        match self.retry.run(self.sleeper.as_ref(), || self.deliver(call)) {
            Ok(_) => debug!(%chat_id, "Images sent"),
            Err(e) => error!(
                %chat_id,
                error = %e,
                "When sending bot media message, the provider did not accept it"
            ),
        }
    }
}
