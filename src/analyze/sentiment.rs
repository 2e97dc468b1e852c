//! Lexicon sentiment scoring with a short negation window.
//!
//! The scan runs over *unweighted* tokens of the whole batch so that headline
//! repetition does not tilt the tone. A negation word opens a window of two
//! tokens; positive/negative hits inside the window count for the opposite
//! polarity. Energy/calm hits ignore negation.

use crate::analyze::text::sentiment_tokens;
use crate::lexicon::LEXICON;
use crate::result::SentimentScore;

/// Tokens after a negation that get their polarity flipped.
pub const NEGATION_WINDOW: u8 = 2;

/// Raw hit counts from one scan.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SentimentHits {
    pub positive: usize,
    pub negative: usize,
    pub energy: usize,
    pub calm: usize,
}

/// Scan tokens in order, applying the negation window.
pub fn count_hits(tokens: &[String]) -> SentimentHits {
    let mut hits = SentimentHits::default();
    let mut window: u8 = 0;

    for tok in tokens {
        let w = tok.as_str();
        if LEXICON.is_negation(w) {
            window = NEGATION_WINDOW;
            continue;
        }

        let negated = window > 0;
        if LEXICON.is_positive(w) {
            if negated {
                hits.negative += 1;
            } else {
                hits.positive += 1;
            }
        } else if LEXICON.is_negative(w) {
            if negated {
                hits.positive += 1;
            } else {
                hits.negative += 1;
            }
        }

        if LEXICON.is_energy(w) {
            hits.energy += 1;
        }
        if LEXICON.is_calm(w) {
            hits.calm += 1;
        }

        window = window.saturating_sub(1);
    }
    hits
}

/// Score pre-tokenized text. No tokens yields [`SentimentScore::neutral`].
pub fn score_tokens(tokens: &[String]) -> SentimentScore {
    if tokens.is_empty() {
        return SentimentScore::neutral();
    }
    let hits = count_hits(tokens);
    SentimentScore::new(
        balance(hits.positive, hits.negative),
        balance(hits.energy, hits.calm),
        complexity(tokens),
    )
}

/// Tokenize and score raw text.
pub fn score_text(text: &str) -> SentimentScore {
    score_tokens(&sentiment_tokens(text))
}

/// `0.5 + 0.5 * (a - b) / max(1, a + b)`
fn balance(a: usize, b: usize) -> f32 {
    let total = (a + b).max(1) as f32;
    0.5 + 0.5 * (a as f32 - b as f32) / total
}

/// Mean token length (scaled by 10) averaged with the type/token ratio.
fn complexity(tokens: &[String]) -> f32 {
    let n = tokens.len() as f32;
    let mean_len = tokens.iter().map(|t| t.chars().count()).sum::<usize>() as f32 / n;
    let unique = tokens
        .iter()
        .collect::<std::collections::HashSet<_>>()
        .len() as f32;
    (mean_len / 10.0 + unique / n) / 2.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positive_text_scores_high() {
        let s = score_text("Great progress and strong growth after the breakthrough");
        assert_eq!(s.positivity(), 1.0);
    }

    #[test]
    fn negative_text_scores_low() {
        let s = score_text("Market crash triggers widespread fear and uncertainty");
        assert_eq!(s.positivity(), 0.0);
        assert!(s.energy() > 0.5);
    }

    #[test]
    fn negation_flips_polarity() {
        let plain = score_text("good news, great progress, strong growth");
        let negated = score_text("not good news, not great progress, not strong growth");
        assert_eq!(plain.positivity(), 1.0);
        assert_eq!(negated.positivity(), 0.0);
    }

    #[test]
    fn negation_window_spans_two_tokens() {
        // "never" -> "quite"(1) -> "good"(flip) ; the second "good" is outside.
        let hits = count_hits(&sentiment_tokens("never quite good, then good"));
        assert_eq!(hits.negative, 1);
        assert_eq!(hits.positive, 1);

        // Three tokens later the window has closed.
        let hits = count_hits(&sentiment_tokens("without hesitation officials called good"));
        assert_eq!(hits.positive, 1);
        assert_eq!(hits.negative, 0);
    }

    #[test]
    fn negated_negative_counts_as_positive() {
        let hits = count_hits(&sentiment_tokens("there was no crisis"));
        assert_eq!(hits.positive, 1);
        assert_eq!(hits.negative, 0);
    }

    #[test]
    fn energy_ignores_negation() {
        let hits = count_hits(&sentiment_tokens("not a massive surge, calm markets"));
        assert_eq!(hits.energy, 2);
        assert_eq!(hits.calm, 1);
    }

    #[test]
    fn negation_word_is_not_a_hit() {
        let hits = count_hits(&sentiment_tokens("no"));
        assert_eq!(hits, SentimentHits::default());
    }

    #[test]
    fn empty_input_is_neutral() {
        let s = score_text("");
        assert_eq!(s, SentimentScore::neutral());
        assert_eq!(s.complexity(), 0.0);
    }

    #[test]
    fn complexity_reflects_variety_and_length() {
        let repetitive = score_text("cat cat cat cat cat cat");
        let varied = score_text("extraordinary parliamentary negotiations concluded successfully");
        assert!(varied.complexity() > repetitive.complexity());
        assert!(varied.complexity() <= 1.0);
    }

    #[test]
    fn no_lexicon_hits_means_balanced() {
        let s = score_text("zorblat quenmir vastrel");
        assert_eq!(s.positivity(), 0.5);
        assert_eq!(s.energy(), 0.5);
    }
}
