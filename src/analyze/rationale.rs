//! Explainability: rationale sentence, theme detection and keyword extraction.
//!
//! Themes come from their own table (`data/themes.json`), ranked by raw hit
//! count over the weighted tokens. Keywords are the most frequent weighted
//! tokens that belong to the selected vibe's lexicon.

use std::collections::HashMap;

use crate::lexicon::THEMES;
use crate::result::SentimentScore;
use crate::vibe::Vibe;

pub const TOP_THEMES: usize = 3;
pub const TOP_KEYWORDS: usize = 5;

pub fn positivity_descriptor(positivity: f32) -> &'static str {
    if positivity < 0.3 {
        "challenging news"
    } else if positivity < 0.7 {
        "mixed developments"
    } else {
        "positive developments"
    }
}

pub fn energy_descriptor(energy: f32) -> &'static str {
    if energy < 0.3 {
        "calm, steady news"
    } else if energy < 0.7 {
        "moderate activity"
    } else {
        "high-energy events"
    }
}

/// Up to `limit` theme names with at least one hit, most hits first.
pub fn detect_themes(tokens: &[String], limit: usize) -> Vec<&'static str> {
    let mut ranked: Vec<(&'static str, usize)> = THEMES
        .iter()
        .map(|theme| {
            let hits = tokens
                .iter()
                .filter(|t| theme.keywords.contains(t.as_str()))
                .count();
            (theme.name.as_str(), hits)
        })
        .filter(|(_, hits)| *hits > 0)
        .collect();
    // Stable sort keeps table order among equal counts.
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked.into_iter().take(limit).map(|(name, _)| name).collect()
}

/// Most frequent lexicon tokens of `vibe`; ties broken alphabetically.
pub fn top_keywords(tokens: &[String], vibe: Vibe, limit: usize) -> Vec<String> {
    let profile = vibe.profile();
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for t in tokens {
        if profile.has_keyword(t) {
            *counts.entry(t.as_str()).or_insert(0) += 1;
        }
    }
    let mut ranked: Vec<(&str, usize)> = counts.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    ranked
        .into_iter()
        .take(limit)
        .map(|(w, _)| w.to_string())
        .collect()
}

pub fn build_rationale(vibe: Vibe, sentiment: &SentimentScore, themes: &[&str]) -> String {
    let themes_part = if themes.is_empty() {
        "No single theme dominates.".to_string()
    } else {
        format!("Key themes: {}.", themes.join(", "))
    };
    format!(
        "Today's news carries a {} vibe, shaped by {} and {}. {} {}",
        vibe.display_name(),
        positivity_descriptor(sentiment.positivity()),
        energy_descriptor(sentiment.energy()),
        themes_part,
        vibe.description()
    )
}

/// Rationale used when nothing in the batch matched.
pub fn fallback_rationale() -> String {
    format!(
        "No dominant signal in today's news, so the mood settles on {}. {}",
        Vibe::NEUTRAL.display_name(),
        Vibe::NEUTRAL.description()
    )
}
