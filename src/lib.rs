// src/lib.rs
// Public library surface for the binary and integration tests.

pub mod analyze;
pub mod analyzer;
pub mod api;
pub mod bootstrap;
pub mod config;
pub mod daily_cache;
pub mod delegate;
pub mod embed;
pub mod engine;
pub mod item;
pub mod lexicon;
pub mod metrics;
pub mod result;
pub mod service;
pub mod vibe;

// ---- Re-exports for stable public API ----
pub use crate::analyzer::{AnalyzerChain, VibeAnalyzer};
pub use crate::api::{create_router, AppState};
pub use crate::config::VibeConfig;
pub use crate::daily_cache::{CacheStatus, Cached, DailyCache};
pub use crate::embed::{EmbeddingBackend, NoopEmbedder};
pub use crate::engine::VibeEngine;
pub use crate::item::NewsItem;
pub use crate::result::{AnalysisResult, IntensityInfo, SentimentScore};
pub use crate::service::VibeService;
pub use crate::vibe::Vibe;

use axum::Router;

/// Build the full HTTP router from `config/vibe.toml` (or `VIBE_CONFIG_PATH`).
/// Used by the binary and by in-process tests.
pub async fn app() -> anyhow::Result<Router> {
    let cfg = VibeConfig::load_default()?;
    let service = bootstrap::build_service(&cfg).await;
    Ok(create_router(AppState::new(service)))
}
