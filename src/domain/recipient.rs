use serde::{Deserialize, Serialize};
use std::fmt;

/// A chat the bot can post into: a numeric chat id or an `@handle`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Recipient {
    Id(i64),
    Handle(String),
}

impl fmt::Display for Recipient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Recipient::Id(id) => write!(f, "{id}"),
            Recipient::Handle(handle) => write!(f, "{handle}"),
        }
    }
}

impl From<i64> for Recipient {
    fn from(id: i64) -> Self {
        Recipient::Id(id)
    }
}

impl From<&str> for Recipient {
    fn from(handle: &str) -> Self {
        Recipient::Handle(handle.to_string())
    }
}
