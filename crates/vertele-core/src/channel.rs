use serde::{Deserialize, Serialize};

/// Category stored for channels that do not name one.
pub const DEFAULT_CATEGORY: &str = "General";

/// A persisted channel row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Channel {
    pub title: String,
    /// Stable lookup key, never shown in the list.
    pub instance: String,
    #[serde(default)]
    pub page_url: Option<String>,
    pub stream_url: String,
    #[serde(default = "default_category")]
    pub category: String,
}

fn default_category() -> String {
    DEFAULT_CATEGORY.to_string()
}

/// The channel currently highlighted in the UI. Transient, never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedChannel {
    pub title: String,
    pub instance: String,
    pub page_url: Option<String>,
    pub stream_url: String,
}

impl From<&Channel> for SelectedChannel {
    fn from(ch: &Channel) -> Self {
        Self {
            title: ch.title.clone(),
            instance: ch.instance.clone(),
            page_url: ch.page_url.clone(),
            stream_url: ch.stream_url.clone(),
        }
    }
}
