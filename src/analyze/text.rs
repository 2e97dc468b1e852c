//! Text normalization.
//!
//! Two tokenizers live here:
//! - [`normalize`] for keyword matching: lowercase, letters only, length > 2,
//!   stopwords and negations removed.
//! - [`sentiment_tokens`] for the sentiment scan: same filtering, but
//!   negation words and contractions (`isn't`, `won't`) are kept so the
//!   scorer can see them.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::lexicon::LEXICON;

static RE_TAGS: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?is)</?[^>]+>").expect("tag regex"));

/// Decode HTML entities, drop tags and fold curly apostrophes to ASCII.
pub fn clean_markup(raw: &str) -> String {
    let decoded = html_escape::decode_html_entities(raw);
    let stripped = RE_TAGS.replace_all(&decoded, " ");
    stripped.replace(['\u{2018}', '\u{2019}'], "'")
}

/// Tokenize for keyword matching.
pub fn normalize(raw: &str) -> Vec<String> {
    words(raw)
        .into_iter()
        .filter(|w| !LEXICON.is_negation(w))
        .flat_map(|w| {
            w.split('\'')
                .filter(|part| keep_token(part))
                .map(str::to_string)
                .collect::<Vec<_>>()
        })
        .collect()
}

/// Tokenize for the sentiment scan (negations survive).
pub fn sentiment_tokens(raw: &str) -> Vec<String> {
    words(raw)
        .into_iter()
        .map(|w| match w.strip_suffix("'s") {
            Some(stem) => stem.to_string(),
            None => w,
        })
        .filter(|t| !t.is_empty())
        .filter(|t| LEXICON.is_negation(t) || keep_token(t))
        .collect()
}

/// Lowercased runs of letters and apostrophes; contractions stay whole.
fn words(raw: &str) -> Vec<String> {
    clean_markup(raw)
        .to_lowercase()
        .split(|c: char| !(c.is_alphabetic() || c == '\''))
        .map(|t| t.trim_matches('\''))
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

#[inline]
fn keep_token(w: &str) -> bool {
    w.chars().count() > 2 && !LEXICON.is_stopword(w)
}
