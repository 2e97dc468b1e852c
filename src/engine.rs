//! # Vibe Engine
//! Deterministic batch analysis: `[NewsItem]` → `AnalysisResult`.
//!
//! The engine holds only immutable state (weights and precomputed vibe
//! anchors), so one instance can serve concurrent callers. Every failure mode
//! degrades instead of erroring: no signal yields the neutral vibe, missing
//! embeddings yield density-only scoring, blank titles are skipped.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use metrics::counter;
use tracing::{info, warn};

use crate::analyze::density::density_scores;
use crate::analyze::intensity::{intensity, INTENSITY_FLOOR};
use crate::analyze::rationale::{
    build_rationale, detect_themes, fallback_rationale, top_keywords, TOP_KEYWORDS, TOP_THEMES,
};
use crate::analyze::scoring::{combine, select, HybridWeights, Selection};
use crate::analyze::semantic::SemanticScorer;
use crate::analyze::sentiment::score_text;
use crate::analyze::weights::{weighted_tokens, FieldWeights};
use crate::analyzer::VibeAnalyzer;
use crate::embed::EmbeddingBackend;
use crate::item::{batch_fingerprint, NewsItem};
use crate::result::{AnalysisResult, SentimentScore};
use crate::vibe::Vibe;

#[derive(Debug)]
pub struct VibeEngine {
    weights: FieldWeights,
    hybrid: HybridWeights,
    semantic: Option<SemanticScorer>,
}

impl VibeEngine {
    /// Density-only engine; never touches an embedding backend.
    pub fn keyword_only(weights: FieldWeights) -> Self {
        Self {
            weights: weights.sanitized(),
            hybrid: HybridWeights::default(),
            semantic: None,
        }
    }

    /// Build an engine, embedding every vibe definition up front. Any anchor
    /// failure leaves the engine in density-only mode.
    pub async fn new(
        weights: FieldWeights,
        hybrid: HybridWeights,
        embedder: Arc<dyn EmbeddingBackend>,
    ) -> Self {
        let hybrid = hybrid.sanitized();
        let backend = embedder.name();
        let wanted = embedder.is_available();
        let semantic = SemanticScorer::build(embedder, hybrid).await;
        match (&semantic, wanted) {
            (Some(_), _) => info!(target: "vibe", backend, "semantic scoring enabled"),
            (None, true) => {
                warn!(target: "vibe", backend, "vibe anchors unavailable; density-only scoring")
            }
            (None, false) => info!(target: "vibe", "no embedding backend; density-only scoring"),
        }
        Self {
            weights: weights.sanitized(),
            hybrid,
            semantic,
        }
    }

    pub fn semantic_enabled(&self) -> bool {
        self.semantic.is_some()
    }

    pub async fn analyze(&self, items: &[NewsItem]) -> AnalysisResult {
        self.analyze_at(items, Utc::now()).await
    }

    /// Same as [`analyze`](Self::analyze) with a caller-supplied timestamp,
    /// which makes the result fully reproducible.
    pub async fn analyze_at(
        &self,
        items: &[NewsItem],
        analyzed_at: DateTime<Utc>,
    ) -> AnalysisResult {
        let usable: Vec<&NewsItem> = items.iter().filter(|it| it.has_title()).collect();
        let fp = batch_fingerprint(usable.iter().copied());

        let tokens = weighted_tokens(items, self.weights);
        let sentiment_text = usable
            .iter()
            .map(|it| it.full_text())
            .collect::<Vec<_>>()
            .join(" ");
        let sentiment = score_text(&sentiment_text);
        let density = density_scores(&tokens);

        let similarity = match &self.semantic {
            Some(scorer) if !usable.is_empty() => {
                let sim = scorer.score(&usable).await;
                if sim.is_none() {
                    warn!(
                        target: "vibe",
                        batch = %fp,
                        "no item embedded; density-only for this batch"
                    );
                }
                sim
            }
            _ => None,
        };
        let combined = combine(&density, similarity.as_ref(), &self.hybrid);
        counter!("vibe_analyses_total", "path" => "engine").increment(1);

        match select(&combined) {
            Selection::NoSignal => {
                counter!("vibe_fallback_total").increment(1);
                info!(
                    target: "vibe",
                    batch = %fp,
                    items = items.len(),
                    tokens = tokens.len(),
                    "no signal; neutral vibe"
                );
                neutral_result(sentiment, analyzed_at)
            }
            Selection::Matched { vibe, confidence } => {
                let themes = detect_themes(&tokens, TOP_THEMES);
                let keywords = top_keywords(&tokens, vibe, TOP_KEYWORDS);
                let rationale = build_rationale(vibe, &sentiment, &themes);
                let level = intensity(confidence, &sentiment);
                info!(
                    target: "vibe",
                    batch = %fp,
                    items = items.len(),
                    vibe = vibe.tag(),
                    confidence,
                    semantic = similarity.is_some(),
                    "vibe selected"
                );
                AnalysisResult::new(
                    vibe,
                    confidence,
                    rationale,
                    keywords,
                    sentiment,
                    analyzed_at,
                    level,
                )
            }
        }
    }
}

/// Zero-confidence result for batches without any signal.
pub fn neutral_result(sentiment: SentimentScore, analyzed_at: DateTime<Utc>) -> AnalysisResult {
    AnalysisResult::new(
        Vibe::NEUTRAL,
        0.0,
        fallback_rationale(),
        Vec::new(),
        sentiment,
        analyzed_at,
        INTENSITY_FLOOR,
    )
}

#[async_trait]
impl VibeAnalyzer for VibeEngine {
    async fn analyze(&self, items: &[NewsItem]) -> anyhow::Result<Option<AnalysisResult>> {
        Ok(Some(self.analyze_at(items, Utc::now()).await))
    }

    fn name(&self) -> &'static str {
        "engine"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at() -> DateTime<Utc> {
        "2025-06-01T07:30:00Z".parse().unwrap()
    }

    #[tokio::test]
    async fn empty_batch_is_neutral() {
        let engine = VibeEngine::keyword_only(FieldWeights::default());
        let r = engine.analyze_at(&[], at()).await;
        assert_eq!(r.vibe(), Vibe::NEUTRAL);
        assert_eq!(r.confidence(), 0.0);
        assert!(r.keywords().is_empty());
        assert_eq!(r.intensity_info().intensity(), INTENSITY_FLOOR);
        assert_eq!(*r.sentiment(), SentimentScore::neutral());
    }

    #[tokio::test]
    async fn keyword_hit_selects_vibe() {
        let engine = VibeEngine::keyword_only(FieldWeights::default());
        let items = [NewsItem::new("Telescope spots a distant galaxy", at())];
        let r = engine.analyze_at(&items, at()).await;
        assert_eq!(r.vibe(), Vibe::Awestruck);
        assert!(r.confidence() > 0.0);
        assert!(r.keywords().iter().any(|k| k == "galaxy"));
        assert!(r.rationale().contains("Awestruck"));
    }

    #[tokio::test]
    async fn blank_titles_do_not_abort_the_batch() {
        let engine = VibeEngine::keyword_only(FieldWeights::default());
        let items = [
            NewsItem::new("   ", at()).with_description("galaxy galaxy galaxy"),
            NewsItem::new("Quiet garden by the lake", at()),
        ];
        let r = engine.analyze_at(&items, at()).await;
        assert_eq!(r.vibe(), Vibe::Serene);
        assert!(!r.keywords().iter().any(|k| k == "galaxy"));
    }

    #[tokio::test]
    async fn keyword_only_engine_has_no_semantic_mode() {
        assert!(!VibeEngine::keyword_only(FieldWeights::default()).semantic_enabled());
    }
}
