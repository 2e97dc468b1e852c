//! Keyword density per vibe.
//!
//! Matching is exact token equality against the vibe lexicon, so `war` never
//! matches `warmth`. Scores are raw `matches / tokens` ratios, comparable
//! across vibes regardless of lexicon size.

use std::collections::HashSet;

use crate::analyze::scoring::VibeScores;
use crate::vibe::Vibe;

/// Fraction of `tokens` that are members of `keywords`.
pub fn keyword_density(tokens: &[String], keywords: &HashSet<String>) -> f32 {
    if tokens.is_empty() {
        return 0.0;
    }
    let hits = tokens
        .iter()
        .filter(|t| keywords.contains(t.as_str()))
        .count();
    hits as f32 / tokens.len() as f32
}

/// Density of every vibe over the weighted token sequence.
pub fn density_scores(tokens: &[String]) -> VibeScores {
    Vibe::ALL
        .iter()
        .map(|v| (*v, keyword_density(tokens, v.profile().keyword_set())))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyze::text::normalize;

    fn set(words: &[&str]) -> HashSet<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn exact_match_only() {
        let tokens = normalize("Warmth returns as the warming trend continues");
        assert_eq!(keyword_density(&tokens, &set(&["war"])), 0.0);

        let tokens = normalize("War returns");
        assert_eq!(keyword_density(&tokens, &set(&["war"])), 0.5);
    }

    #[test]
    fn empty_tokens_score_zero() {
        assert_eq!(keyword_density(&[], &set(&["hope"])), 0.0);
    }

    #[test]
    fn every_vibe_gets_a_score() {
        let scores = density_scores(&normalize("galaxy telescope aurora"));
        assert_eq!(scores.len(), Vibe::ALL.len());
        assert_eq!(scores[&Vibe::Awestruck], 1.0);
        assert_eq!(scores[&Vibe::Hopeful], 0.0);
    }
}
