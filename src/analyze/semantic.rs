//! Embedding similarity between news items and vibe definitions.
//!
//! Each vibe's definition (name, description, first five keywords) is
//! embedded once when the scorer is built. Per analysis, every item's
//! `title + description` is embedded concurrently, compared against all
//! definition vectors by cosine similarity, and averaged over the items that
//! embedded successfully.

use std::sync::Arc;

use futures::future::join_all;
use metrics::counter;
use tracing::{debug, warn};

use crate::analyze::scoring::{HybridWeights, VibeScores};
use crate::embed::{cosine_similarity, EmbeddingBackend};
use crate::item::NewsItem;
use crate::vibe::Vibe;

pub struct SemanticScorer {
    embedder: Arc<dyn EmbeddingBackend>,
    anchors: Vec<(Vibe, Vec<f32>)>,
    calibration: HybridWeights,
}

impl std::fmt::Debug for SemanticScorer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SemanticScorer")
            .field("embedder", &self.embedder.name())
            .field("anchors", &self.anchors.len())
            .finish()
    }
}

impl SemanticScorer {
    /// Embed every vibe definition. Returns `None` when the backend is
    /// unavailable or any definition fails: a partial anchor table would
    /// bias selection toward the vibes that did embed.
    pub async fn build(
        embedder: Arc<dyn EmbeddingBackend>,
        calibration: HybridWeights,
    ) -> Option<Self> {
        if !embedder.is_available() {
            return None;
        }

        let definitions: Vec<(Vibe, String)> = Vibe::ALL
            .iter()
            .map(|v| (*v, v.profile().definition()))
            .collect();
        let vectors = join_all(definitions.iter().map(|(_, d)| embedder.embed(d))).await;

        let mut anchors = Vec::with_capacity(definitions.len());
        for ((vibe, _), vector) in definitions.iter().zip(vectors) {
            match vector {
                Some(v) if !v.is_empty() => anchors.push((*vibe, v)),
                _ => {
                    warn!(target: "vibe::embed", vibe = vibe.tag(), "definition failed to embed");
                    return None;
                }
            }
        }
        debug!(
            target: "vibe::embed",
            backend = embedder.name(),
            anchors = anchors.len(),
            "vibe anchors ready"
        );
        Some(Self {
            embedder,
            anchors,
            calibration,
        })
    }

    /// Normalized similarity per vibe, or `None` if no item embedded.
    pub async fn score(&self, items: &[&NewsItem]) -> Option<VibeScores> {
        let texts: Vec<String> = items.iter().map(|it| it.headline_text()).collect();
        let embeddings = join_all(texts.iter().map(|t| self.embedder.embed(t))).await;

        let mut sums: VibeScores = self.anchors.iter().map(|(v, _)| (*v, 0.0)).collect();
        let mut embedded = 0usize;
        for vector in embeddings.into_iter().flatten() {
            embedded += 1;
            for (vibe, anchor) in &self.anchors {
                if let Some(sum) = sums.get_mut(vibe) {
                    *sum += cosine_similarity(&vector, anchor);
                }
            }
        }

        let failed = texts.len() - embedded;
        if failed > 0 {
            counter!("vibe_embedding_failures_total").increment(failed as u64);
            debug!(target: "vibe::embed", failed, embedded, "some items failed to embed");
        }
        if embedded == 0 {
            return None;
        }

        let n = embedded as f32;
        Some(
            sums.into_iter()
                .map(|(vibe, sum)| (vibe, self.calibration.normalize_similarity(sum / n)))
                .collect(),
        )
    }
}
