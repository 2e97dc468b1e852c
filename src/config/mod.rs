// src/config/mod.rs
//! Service configuration loaded from `config/vibe.toml`.
//!
//! Every section is optional. A missing file yields defaults; a file that
//! exists but cannot be read or parsed is an error.

pub mod ai;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::analyze::scoring::HybridWeights;
use crate::analyze::weights::FieldWeights;
use ai::{DelegateConfig, EmbeddingConfig};

pub const DEFAULT_VIBE_CONFIG_PATH: &str = "config/vibe.toml";
pub const ENV_VIBE_CONFIG_PATH: &str = "VIBE_CONFIG_PATH";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VibeConfig {
    pub weights: FieldWeights,
    pub hybrid: HybridWeights,
    pub delegate: DelegateConfig,
    pub embedding: EmbeddingConfig,
}

impl VibeConfig {
    /// Resolve the path from `VIBE_CONFIG_PATH` (must exist when set) or fall
    /// back to `config/vibe.toml`, then defaults.
    pub fn load_default() -> anyhow::Result<Self> {
        if let Ok(p) = std::env::var(ENV_VIBE_CONFIG_PATH) {
            let path = PathBuf::from(p);
            return Self::load_from(&path);
        }
        let path = Path::new(DEFAULT_VIBE_CONFIG_PATH);
        if path.exists() {
            Self::load_from(path)
        } else {
            info!(target: "vibe", "no {DEFAULT_VIBE_CONFIG_PATH}; using defaults");
            Ok(Self::default().sanitized())
        }
    }

    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read vibe config at {}", path.display()))?;
        let cfg = Self::from_toml_str(&content)
            .with_context(|| format!("Failed to parse vibe config at {}", path.display()))?;
        info!(
            target: "vibe",
            path = %path.display(),
            delegate = cfg.delegate.enabled,
            embeddings = cfg.embedding.enabled,
            "vibe config loaded"
        );
        Ok(cfg)
    }

    pub fn from_toml_str(s: &str) -> anyhow::Result<Self> {
        let cfg: VibeConfig = toml::from_str(s)?;
        Ok(cfg.sanitized())
    }

    fn sanitized(mut self) -> Self {
        self.weights = self.weights.sanitized();
        self.hybrid = self.hybrid.sanitized();
        self.delegate.resolve();
        self.embedding.resolve();
        self
    }
}
