// tests/semantic_mode.rs
//
// Hybrid scoring with deterministic fake embedding backends.
//
// The fake backends recognise vibe definitions by their "Display Name." prefix
// and map them to one-hot vectors, so similarities are exact.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use news_vibe::analyze::{FieldWeights, HybridWeights};
use news_vibe::{EmbeddingBackend, NewsItem, Vibe, VibeEngine};

fn at() -> DateTime<Utc> {
    "2025-09-12T06:00:00Z".parse().unwrap()
}

fn one_hot(vibe: Vibe) -> Vec<f32> {
    Vibe::ALL
        .iter()
        .map(|v| if *v == vibe { 1.0 } else { 0.0 })
        .collect()
}

fn definition_vibe(text: &str) -> Option<Vibe> {
    Vibe::ALL
        .iter()
        .copied()
        .find(|v| text.starts_with(&format!("{}.", v.display_name())))
}

/// Definitions embed one-hot; any text mentioning "rocket" points at
/// Awestruck; everything else fails.
struct RocketEmbedder {
    calls: AtomicUsize,
}

impl RocketEmbedder {
    fn new() -> Self {
        Self {
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl EmbeddingBackend for RocketEmbedder {
    async fn embed(&self, text: &str) -> Option<Vec<f32>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(v) = definition_vibe(text) {
            return Some(one_hot(v));
        }
        if text.to_lowercase().contains("rocket") {
            return Some(one_hot(Vibe::Awestruck));
        }
        None
    }

    fn name(&self) -> &'static str {
        "rocket"
    }
}

/// Fails on one specific definition, so anchors are incomplete.
struct BrokenAnchors;

#[async_trait]
impl EmbeddingBackend for BrokenAnchors {
    async fn embed(&self, text: &str) -> Option<Vec<f32>> {
        match definition_vibe(text) {
            Some(Vibe::Tender) => None,
            Some(v) => Some(one_hot(v)),
            None => Some(one_hot(Vibe::Tender)),
        }
    }

    fn name(&self) -> &'static str {
        "broken"
    }
}

async fn rocket_engine() -> (VibeEngine, Arc<RocketEmbedder>) {
    let embedder = Arc::new(RocketEmbedder::new());
    let engine = VibeEngine::new(
        FieldWeights::default(),
        HybridWeights::default(),
        embedder.clone(),
    )
    .await;
    (engine, embedder)
}

#[tokio::test]
async fn anchors_are_embedded_once_at_construction() {
    let (engine, embedder) = rocket_engine().await;
    assert!(engine.semantic_enabled());
    assert_eq!(embedder.calls.load(Ordering::SeqCst), Vibe::ALL.len());

    let items = [NewsItem::new("Rocket lifts off", at())];
    engine.analyze_at(&items, at()).await;
    engine.analyze_at(&items, at()).await;
    assert_eq!(embedder.calls.load(Ordering::SeqCst), Vibe::ALL.len() + 2);
}

#[tokio::test]
async fn similarity_alone_can_select_a_vibe() {
    let (engine, _) = rocket_engine().await;
    let items = [NewsItem::new("Rocket lifts off", at())];

    let r = engine.analyze_at(&items, at()).await;

    // No lexicon hits; cosine 1.0 normalizes to 1.0, weighted by 0.7.
    assert_eq!(r.vibe(), Vibe::Awestruck);
    assert!((r.confidence() - 0.7).abs() < 1e-6, "got {}", r.confidence());
    assert!(r.keywords().is_empty());
}

#[tokio::test]
async fn failed_items_are_skipped_not_fatal() {
    let (engine, _) = rocket_engine().await;
    let items = [
        NewsItem::new("Rocket lifts off", at()),
        NewsItem::new("Council meets on Tuesday", at()),
    ];

    let r = engine.analyze_at(&items, at()).await;

    // Average over the one embedded item only.
    assert_eq!(r.vibe(), Vibe::Awestruck);
    assert!((r.confidence() - 0.7).abs() < 1e-6);
}

#[tokio::test]
async fn batch_with_no_embeddings_falls_back_to_density() {
    let (engine, _) = rocket_engine().await;
    let keyword_only = VibeEngine::keyword_only(FieldWeights::default());
    let items = [NewsItem::new("Quiet garden by the lake", at())];

    let hybrid = engine.analyze_at(&items, at()).await;
    let density = keyword_only.analyze_at(&items, at()).await;

    assert_eq!(hybrid, density);
    assert_eq!(hybrid.vibe(), Vibe::Serene);
}

#[tokio::test]
async fn incomplete_anchors_disable_semantic_mode() {
    let engine = VibeEngine::new(
        FieldWeights::default(),
        HybridWeights::default(),
        Arc::new(BrokenAnchors),
    )
    .await;
    assert!(!engine.semantic_enabled());

    // Every item would point at Tender if semantic mode were on.
    let items = [NewsItem::new("Telescope captures a distant galaxy", at())];
    let r = engine.analyze_at(&items, at()).await;
    assert_eq!(r.vibe(), Vibe::Awestruck);
}

#[tokio::test]
async fn hybrid_blend_rewards_agreement() {
    let (engine, _) = rocket_engine().await;
    // "telescope" and "galaxy" are Awestruck lexicon words; "rocket" steers similarity.
    let items = [NewsItem::new("Rocket telescope galaxy", at())];

    let r = engine.analyze_at(&items, at()).await;

    // density = 6/9 (two of three tokens, title weight 3), similarity = 1.0
    let expected = 0.3 * (6.0 / 9.0) + 0.7;
    assert_eq!(r.vibe(), Vibe::Awestruck);
    assert!((r.confidence() - expected).abs() < 1e-5);
}
