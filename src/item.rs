//! Input items supplied by the ingestion side.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One news item. Read-only input; the engine never stores it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsItem {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    pub published_at: DateTime<Utc>,
    #[serde(default)]
    pub source_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl NewsItem {
    pub fn new(title: impl Into<String>, published_at: DateTime<Utc>) -> Self {
        Self {
            title: title.into(),
            description: None,
            content: None,
            published_at,
            source_name: String::new(),
            url: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source_name = source.into();
        self
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Items with a blank title are skipped by every scorer.
    pub fn has_title(&self) -> bool {
        !self.title.trim().is_empty()
    }

    /// Title, description and content joined with single spaces.
    pub fn full_text(&self) -> String {
        let mut parts = vec![self.title.as_str()];
        parts.extend(self.description.as_deref());
        parts.extend(self.content.as_deref());
        parts.join(" ")
    }

    /// Text embedded per item for similarity scoring.
    pub fn headline_text(&self) -> String {
        match self.description.as_deref() {
            Some(d) => format!("{} {}", self.title, d),
            None => self.title.clone(),
        }
    }
}

/// Anonymized batch id for logs: first 6 bytes of SHA-256 over the titles.
pub(crate) fn batch_fingerprint<'a>(items: impl IntoIterator<Item = &'a NewsItem>) -> String {
    use sha2::{Digest, Sha256};
    let mut hasher = Sha256::new();
    for it in items {
        hasher.update(it.title.as_bytes());
        hasher.update([0u8]);
    }
    let digest = hasher.finalize();
    let mut out = String::with_capacity(12);
    for b in digest.iter().take(6) {
        use std::fmt::Write as _;
        let _ = write!(&mut out, "{:02x}", b);
    }
    out
}
