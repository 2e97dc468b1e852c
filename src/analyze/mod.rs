// src/analyze/mod.rs
//! Scoring pipeline components.
//!
//! Order per batch:
//! 1) weighted tokens (`weights`) and unweighted sentiment scan (`sentiment`)
//! 2) keyword density per vibe (`density`), optional similarity (`semantic`)
//! 3) blend + select (`scoring`)
//! 4) rationale, themes, keywords (`rationale`) and display intensity (`intensity`)

pub mod density;
pub mod intensity;
pub mod rationale;
pub mod scoring;
pub mod semantic;
pub mod sentiment;
pub mod text;
pub mod weights;

// Re-export convenient types.
pub use crate::analyze::scoring::{HybridWeights, Selection, VibeScores};
pub use crate::analyze::semantic::SemanticScorer;
pub use crate::analyze::weights::FieldWeights;
