//! Field weights and the weighted token extractor.
//!
//! TOML shape (section `[weights]` of `config/vibe.toml`):
//! ```toml
//! [weights]
//! title = 3
//! description = 1
//! content = 1
//! ```
//!
//! Weights are integer repetition counts: a title token with weight 3 is
//! appended three times, so frequency alone encodes field importance.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::analyze::text::normalize;
use crate::item::NewsItem;

/// Upper bound on any single field weight.
pub const MAX_FIELD_WEIGHT: usize = 100;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldWeights {
    pub title: usize,
    pub description: usize,
    pub content: usize,
}

impl Default for FieldWeights {
    fn default() -> Self {
        Self {
            title: 3,
            description: 1,
            content: 1,
        }
    }
}

impl FieldWeights {
    /// Caps each weight at [`MAX_FIELD_WEIGHT`]. All-zero weights would erase
    /// every token, so they fall back to defaults.
    pub fn sanitized(self) -> Self {
        let capped = Self {
            title: self.title.min(MAX_FIELD_WEIGHT),
            description: self.description.min(MAX_FIELD_WEIGHT),
            content: self.content.min(MAX_FIELD_WEIGHT),
        };
        if capped.title == 0 && capped.description == 0 && capped.content == 0 {
            Self::default()
        } else {
            capped
        }
    }
}

/// Build one flat token sequence for the batch, repeating each field's
/// tokens by its weight. Items with a blank title are skipped.
pub fn weighted_tokens<'a>(
    items: impl IntoIterator<Item = &'a NewsItem>,
    weights: FieldWeights,
) -> Vec<String> {
    let mut out = Vec::new();
    for item in items {
        if !item.has_title() {
            debug!(target: "vibe", source = %item.source_name, "skipping item with empty title");
            continue;
        }
        push_repeated(&mut out, &normalize(&item.title), weights.title);
        if let Some(d) = item.description.as_deref() {
            push_repeated(&mut out, &normalize(d), weights.description);
        }
        if let Some(c) = item.content.as_deref() {
            push_repeated(&mut out, &normalize(c), weights.content);
        }
    }
    out
}

fn push_repeated(out: &mut Vec<String>, tokens: &[String], times: usize) {
    for _ in 0..times {
        out.extend_from_slice(tokens);
    }
}
