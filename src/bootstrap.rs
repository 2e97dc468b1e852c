// src/bootstrap.rs
use std::sync::Arc;
use tracing::info;

use crate::analyzer::AnalyzerChain;
use crate::config::VibeConfig;
use crate::delegate::build_delegate;
use crate::embed::create_embedder;
use crate::engine::VibeEngine;
use crate::service::VibeService;

/// Wire embedder, engine, optional delegate and cache from config.
pub async fn build_service(cfg: &VibeConfig) -> VibeService {
    let embedder = create_embedder(&cfg.embedding);
    let engine = Arc::new(VibeEngine::new(cfg.weights, cfg.hybrid, embedder).await);

    let mut chain = AnalyzerChain::new(engine).with_delegate_timeout(cfg.delegate.timeout());
    if let Some(delegate) = build_delegate(&cfg.delegate) {
        chain = chain.with_delegate(delegate);
    }

    // Safe diagnostics only: no keys, no text.
    info!(
        target: "vibe",
        semantic = chain.engine().semantic_enabled(),
        delegates = ?chain.delegate_names(),
        "vibe service ready"
    );
    VibeService::new(chain)
}
