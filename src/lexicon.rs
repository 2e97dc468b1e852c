//! Word lists shared by the normalizer, the sentiment scorer and theme detection.
//!
//! Both tables are embedded at compile time (`data/lexicon.json`,
//! `data/themes.json`) and parsed lazily on first use.

use once_cell::sync::Lazy;
use serde::Deserialize;
use std::collections::HashSet;

#[derive(Debug, Deserialize)]
pub struct SentimentLexicon {
    stopwords: HashSet<String>,
    negations: HashSet<String>,
    positive: HashSet<String>,
    negative: HashSet<String>,
    energy: HashSet<String>,
    calm: HashSet<String>,
}

impl SentimentLexicon {
    #[inline]
    pub fn is_stopword(&self, w: &str) -> bool {
        self.stopwords.contains(w)
    }
    #[inline]
    pub fn is_negation(&self, w: &str) -> bool {
        self.negations.contains(w)
    }
    #[inline]
    pub fn is_positive(&self, w: &str) -> bool {
        self.positive.contains(w)
    }
    #[inline]
    pub fn is_negative(&self, w: &str) -> bool {
        self.negative.contains(w)
    }
    #[inline]
    pub fn is_energy(&self, w: &str) -> bool {
        self.energy.contains(w)
    }
    #[inline]
    pub fn is_calm(&self, w: &str) -> bool {
        self.calm.contains(w)
    }
}

pub static LEXICON: Lazy<SentimentLexicon> = Lazy::new(|| {
    let raw = include_str!("../data/lexicon.json");
    serde_json::from_str::<SentimentLexicon>(raw).expect("valid sentiment lexicon")
});

/// One row of the theme-detection table.
#[derive(Debug, Deserialize)]
pub struct Theme {
    pub name: String,
    pub keywords: HashSet<String>,
}

/// Theme table in declaration order (order breaks ties between equal counts).
pub static THEMES: Lazy<Vec<Theme>> = Lazy::new(|| {
    let raw = include_str!("../data/themes.json");
    serde_json::from_str::<Vec<Theme>>(raw).expect("valid theme table")
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lexicon_sizes_are_sane() {
        for (name, set) in [
            ("positive", &LEXICON.positive),
            ("negative", &LEXICON.negative),
            ("energy", &LEXICON.energy),
            ("calm", &LEXICON.calm),
        ] {
            assert!(
                (50..=150).contains(&set.len()),
                "{name} has {} entries",
                set.len()
            );
        }
        assert!(LEXICON.negations.len() >= 25);
    }

    #[test]
    fn keyword_tokens_never_contain_negations() {
        for neg in &LEXICON.negations {
            let toks = crate::analyze::text::normalize(neg);
            assert!(toks.is_empty(), "`{neg}` leaked as {toks:?}");
        }
        assert!(LEXICON.is_negation("isn't"));
        assert!(!LEXICON.is_positive("not"));
    }

    #[test]
    fn themes_table_has_six_rows() {
        let names: Vec<&str> = THEMES.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(
            names,
            ["politics", "health", "technology", "environment", "economy", "social"]
        );
    }
}
