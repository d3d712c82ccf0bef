use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// A listing as handed over by the crawler.
///
/// Scalar fields are kept as display text: the crawlers emit "3", 3 and 3.5
/// for the same thing, and the message only ever needs the text.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ListingRecord {
    #[serde(default, deserialize_with = "lenient_text")]
    pub id: Option<String>,

    #[serde(default, deserialize_with = "lenient_text")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub rooms: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub size: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub price: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub rent_warm: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub url: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub address: Option<String>,

    // Absent and empty both mean "nothing to send".
    #[serde(default)]
    pub images: Option<Vec<String>>,

    #[serde(default, deserialize_with = "lenient_text")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub durations: Option<String>,
}

impl ListingRecord {
    pub fn image_urls(&self) -> &[String] {
        self.images.as_deref().unwrap_or(&[])
    }

    /// The description, trimmed, if there is anything left to send.
    pub fn description_text(&self) -> Option<&str> {
        self.description
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty())
    }

    /// Short label for log lines.
    pub fn log_label(&self) -> &str {
        self.id
            .as_deref()
            .or(self.url.as_deref())
            .or(self.title.as_deref())
            .unwrap_or("<unnamed listing>")
    }
}

fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(Value::Bool(b)) => Some(b.to_string()),
        Some(other) => Some(other.to_string()),
    })
}
