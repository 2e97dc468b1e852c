//! Hybrid score blending and vibe selection.
//!
//! With similarity available:
//!   final = density_weight * density + similarity_weight * normalized_similarity
//! Otherwise `final = density`.
//!
//! Selection takes the maximum `final` (first in declaration order on ties).
//! A maximum of exactly zero means no signal and yields the neutral vibe.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::vibe::Vibe;

/// Per-vibe scores, iterated in declaration order.
pub type VibeScores = BTreeMap<Vibe, f32>;

/// Blend weights and similarity calibration (section `[hybrid]`).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HybridWeights {
    pub density_weight: f32,
    pub similarity_weight: f32,
    /// Raw cosine similarity that maps to 0.
    pub similarity_floor: f32,
    /// Multiplier applied after subtracting the floor.
    pub similarity_scale: f32,
}

impl Default for HybridWeights {
    fn default() -> Self {
        Self {
            density_weight: 0.3,
            similarity_weight: 0.7,
            similarity_floor: 0.05,
            similarity_scale: 4.0,
        }
    }
}

impl HybridWeights {
    /// Replace negative or non-finite values with defaults.
    pub fn sanitized(self) -> Self {
        let d = Self::default();
        let fix = |x: f32, fallback: f32| if x.is_finite() && x >= 0.0 { x } else { fallback };
        Self {
            density_weight: fix(self.density_weight, d.density_weight),
            similarity_weight: fix(self.similarity_weight, d.similarity_weight),
            similarity_floor: fix(self.similarity_floor, d.similarity_floor),
            similarity_scale: fix(self.similarity_scale, d.similarity_scale),
        }
    }

    /// Map a raw mean cosine similarity into `[0, 1]`.
    pub fn normalize_similarity(&self, raw: f32) -> f32 {
        ((raw - self.similarity_floor) * self.similarity_scale).clamp(0.0, 1.0)
    }
}

/// Blend density with (already normalized) similarity when present.
pub fn combine(
    density: &VibeScores,
    similarity: Option<&VibeScores>,
    w: &HybridWeights,
) -> VibeScores {
    match similarity {
        Some(sim) => density
            .iter()
            .map(|(vibe, d)| {
                let s = sim.get(vibe).copied().unwrap_or(0.0);
                (*vibe, w.density_weight * d + w.similarity_weight * s)
            })
            .collect(),
        None => density.clone(),
    }
}

/// Outcome of picking a vibe from blended scores.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Selection {
    Matched { vibe: Vibe, confidence: f32 },
    NoSignal,
}

pub fn select(scores: &VibeScores) -> Selection {
    let mut best: Option<(Vibe, f32)> = None;
    for (&vibe, &score) in scores {
        if best.map_or(true, |(_, top)| score > top) {
            best = Some((vibe, score));
        }
    }
    match best {
        Some((vibe, score)) if score > 0.0 => Selection::Matched {
            vibe,
            confidence: score.clamp(0.0, 1.0),
        },
        _ => Selection::NoSignal,
    }
}
