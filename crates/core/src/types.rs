use serde::{Deserialize, Serialize};

/// A single browser page tracked by the assistant.
///
/// Ids are opaque strings assigned by the tab host (or by the registry for
/// reopened tabs) and are never reused while the tab is open.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tab {
    pub id: String,
    pub title: String,
    pub url: String,
    /// Emoji, URL, or data-URI reference.
    pub favicon: String,
    /// Extracted page text, populated lazily by the content reader.
    pub content: Option<String>,
    /// Unix millis of the last interaction.
    pub last_accessed: i64,
    /// Derived flag, recomputed on every idle tick.
    pub is_idle: bool,
}

/// A remembered tab without identity or timestamps; both are assigned when
/// the template is reopened into the registry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TabTemplate {
    pub title: String,
    pub url: String,
    pub favicon: String,
    pub content: Option<String>,
}

impl TabTemplate {
    pub fn new(
        title: impl Into<String>,
        url: impl Into<String>,
        favicon: impl Into<String>,
        content: Option<String>,
    ) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
            favicon: favicon.into(),
            content,
        }
    }
}
