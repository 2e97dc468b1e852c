//! Sentence-embedding backends.
//!
//! The `EmbeddingBackend` trait abstracts over embedding generation.
//! Implementations:
//! - `OpenAiEmbedder`: OpenAI-compatible `/v1/embeddings` endpoint over HTTP.
//! - `NoopEmbedder`: always unavailable, so the engine runs keyword-only.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::config::ai::EmbeddingConfig;

const DEFAULT_EMBEDDINGS_ENDPOINT: &str = "https://api.openai.com/v1/embeddings";

#[async_trait]
pub trait EmbeddingBackend: Send + Sync {
    /// Embed one text. `None` means this call failed; callers skip it.
    async fn embed(&self, text: &str) -> Option<Vec<f32>>;

    /// Whether the backend can produce embeddings at all.
    fn is_available(&self) -> bool {
        true
    }

    /// Backend name for diagnostics.
    fn name(&self) -> &'static str;
}

/// Placeholder backend that never embeds (keyword-only mode).
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopEmbedder;

#[async_trait]
impl EmbeddingBackend for NoopEmbedder {
    async fn embed(&self, _text: &str) -> Option<Vec<f32>> {
        None
    }

    fn is_available(&self) -> bool {
        false
    }

    fn name(&self) -> &'static str {
        "noop"
    }
}

/// OpenAI-compatible embeddings client. Requires an API key.
pub struct OpenAiEmbedder {
    http: reqwest::Client,
    api_key: String,
    model: String,
    endpoint: String,
}

impl OpenAiEmbedder {
    pub fn new(cfg: &EmbeddingConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("news-vibe/", env!("CARGO_PKG_VERSION")))
            .connect_timeout(Duration::from_secs(4))
            .timeout(Duration::from_millis(cfg.timeout_ms))
            .build()
            .context("building embeddings http client")?;
        Ok(Self {
            http,
            api_key: cfg.api_key.clone(),
            model: cfg.model.clone(),
            endpoint: cfg
                .endpoint
                .clone()
                .unwrap_or_else(|| DEFAULT_EMBEDDINGS_ENDPOINT.to_string()),
        })
    }

    async fn request(&self, text: &str) -> Result<Vec<f32>> {
        #[derive(Serialize)]
        struct Req<'a> {
            model: &'a str,
            input: &'a str,
        }
        #[derive(Deserialize)]
        struct Resp {
            data: Vec<Datum>,
        }
        #[derive(Deserialize)]
        struct Datum {
            embedding: Vec<f32>,
        }

        let resp = self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&Req {
                model: &self.model,
                input: text,
            })
            .send()
            .await
            .context("embeddings request")?
            .error_for_status()
            .context("embeddings status")?;
        let body: Resp = resp.json().await.context("embeddings body")?;
        body.data
            .into_iter()
            .next()
            .map(|d| d.embedding)
            .filter(|v| !v.is_empty())
            .context("embeddings response had no vector")
    }
}

#[async_trait]
impl EmbeddingBackend for OpenAiEmbedder {
    async fn embed(&self, text: &str) -> Option<Vec<f32>> {
        match self.request(text).await {
            Ok(v) => Some(v),
            Err(e) => {
                warn!(target: "vibe::embed", error = %format!("{e:#}"), "embedding call failed");
                None
            }
        }
    }

    fn is_available(&self) -> bool {
        !self.api_key.is_empty()
    }

    fn name(&self) -> &'static str {
        "openai"
    }
}

/// Pick the best available backend for the config; falls back to `NoopEmbedder`.
pub fn create_embedder(cfg: &EmbeddingConfig) -> Arc<dyn EmbeddingBackend> {
    if !cfg.enabled {
        info!(target: "vibe::embed", "embeddings disabled in config; keyword-only scoring");
        return Arc::new(NoopEmbedder);
    }
    match cfg.provider.as_str() {
        "openai" => match OpenAiEmbedder::new(cfg) {
            Ok(e) if e.is_available() => {
                info!(target: "vibe::embed", model = %cfg.model, "using OpenAI embeddings");
                Arc::new(e)
            }
            Ok(_) => {
                warn!(
                    target: "vibe::embed",
                    "embeddings enabled but no API key; keyword-only scoring"
                );
                Arc::new(NoopEmbedder)
            }
            Err(e) => {
                warn!(target: "vibe::embed", error = %format!("{e:#}"), "embedder unavailable");
                Arc::new(NoopEmbedder)
            }
        },
        other => {
            warn!(target: "vibe::embed", provider = other, "unsupported embedding provider");
            Arc::new(NoopEmbedder)
        }
    }
}

/// `dot(a, b) / (|a| * |b|)`; 0 for empty, mismatched or zero-magnitude vectors.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.is_empty() || a.len() != b.len() {
        return 0.0;
    }
    let mut dot = 0.0f32;
    let mut na = 0.0f32;
    let mut nb = 0.0f32;
    for (x, y) in a.iter().zip(b) {
        dot += x * y;
        na += x * x;
        nb += y * y;
    }
    if na == 0.0 || nb == 0.0 {
        return 0.0;
    }
    dot / (na.sqrt() * nb.sqrt())
}
