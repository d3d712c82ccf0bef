use std::time::Duration;
use tracing::{debug, error};
use url::form_urlencoded;

use super::{DeliveryUnit, TelegramClient};
use crate::domain::Recipient;

/// Longest `text` parameter sent in one `sendMessage`, counted after encoding.
pub const MAX_SEGMENT_LEN: usize = 4095;

/// Pause between consecutive segments going to the same chat.
pub const SEGMENT_PACING: Duration = Duration::from_secs(1);

/// Banner that opens every new listing in a chat.
pub const SEPARATOR: &str = "------------NEW LISTING------------";

/// Form-encode `text` for the query string (spaces become `+`).
pub fn encode_text(text: &str) -> String {
    form_urlencoded::byte_serialize(text.as_bytes()).collect()
}

/// Cut `encoded` into consecutive pieces of `max_len` bytes; the last one may
/// be shorter. Empty input still yields one (empty) segment.
pub fn split_segments(encoded: &str, max_len: usize) -> Vec<&str> {
    let max_len = max_len.max(1);
    if encoded.len() <= max_len {
        return vec![encoded];
    }

    let mut segments = Vec::with_capacity(encoded.len().div_ceil(max_len));
    let mut rest = encoded;
    while !rest.is_empty() {
        let mut end = max_len.min(rest.len());
        // Encoded text is ASCII, so this only moves for raw input.
        while !rest.is_char_boundary(end) {
            end -= 1;
        }
        if end == 0 {
            // A single char wider than `max_len` goes out whole.
            end = rest.chars().next().map_or(rest.len(), char::len_utf8);
        }
        let (head, tail) = rest.split_at(end);
        segments.push(head);
        rest = tail;
    }
    segments
}

impl TelegramClient {
    /// Send `text` to every recipient, split into paced segments, optionally
    /// preceded by the new-listing banner.
    pub fn send_text(&self, recipients: &[Recipient], text: &str, with_separator: bool) {
        let encoded = encode_text(text);
        let segments = split_segments(&encoded, MAX_SEGMENT_LEN);

        debug!(
            encoded_len = encoded.len(),
            segments = segments.len(),
            with_separator,
            "Sending text"
        );

        for chat_id in recipients {
            if with_separator {
                self.send_segment(chat_id, encode_text(SEPARATOR));
            }

            for (i, segment) in segments.iter().enumerate() {
                if i > 0 {
                    self.sleeper.sleep(SEGMENT_PACING);
                }
                self.send_segment(chat_id, (*segment).to_string());
            }
        }
    }

    fn send_segment(&self, chat_id: &Recipient, segment: String) {
        let call = DeliveryUnit::TextSegment(segment).into_call(chat_id);

        match self.deliver(&call) {
            Ok(_) => debug!(%chat_id, "Message sent"),
            Err(e) => error!(
                %chat_id,
                error = %e,
                "When sending bot message, the provider did not accept it"
            ),
        }
    }
}
