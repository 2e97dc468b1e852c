// src/config/ai.rs
//! Remote model settings: the smart delegate (`[delegate]`) and the
//! embedding backend (`[embedding]`).

use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;
use tracing::warn;

pub const ENV_OPENAI_API_KEY: &str = "OPENAI_API_KEY";

fn default_provider() -> String {
    "openai".to_string()
}
fn default_api_key() -> String {
    "ENV".to_string()
}
fn default_delegate_model() -> String {
    "gpt-4o-mini".to_string()
}
fn default_delegate_timeout_ms() -> u64 {
    8_000
}
fn default_daily_limit() -> u32 {
    20
}
fn default_embedding_model() -> String {
    "text-embedding-3-small".to_string()
}
fn default_embedding_timeout_ms() -> u64 {
    5_000
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DelegateConfig {
    #[serde(default)]
    pub enabled: bool,
    /// Only "openai" is supported (case-insensitive).
    #[serde(default = "default_provider")]
    pub provider: String,
    #[serde(default = "default_delegate_model")]
    pub model: String,
    /// "ENV" means: read from OPENAI_API_KEY
    #[serde(default = "default_api_key")]
    pub api_key: String,
    #[serde(default = "default_delegate_timeout_ms")]
    pub timeout_ms: u64,
    /// Max remote calls per calendar day.
    #[serde(default = "default_daily_limit")]
    pub daily_limit: u32,
}

impl Default for DelegateConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            provider: default_provider(),
            model: default_delegate_model(),
            api_key: default_api_key(),
            timeout_ms: default_delegate_timeout_ms(),
            daily_limit: default_daily_limit(),
        }
    }
}

impl DelegateConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Lowercase provider, resolve `ENV` keys, and switch the delegate off when
    /// no key is available.
    pub fn resolve(&mut self) {
        self.provider = self.provider.trim().to_lowercase();
        if self.timeout_ms == 0 {
            self.timeout_ms = default_delegate_timeout_ms();
        }
        self.api_key = resolve_api_key(&self.api_key);
        if self.enabled && self.api_key.is_empty() {
            warn!(
                target: "vibe::delegate",
                "delegate enabled but {ENV_OPENAI_API_KEY} is missing; disabling"
            );
            self.enabled = false;
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_provider")]
    pub provider: String,
    #[serde(default = "default_embedding_model")]
    pub model: String,
    #[serde(default = "default_api_key")]
    pub api_key: String,
    #[serde(default = "default_embedding_timeout_ms")]
    pub timeout_ms: u64,
    /// Override for OpenAI-compatible servers.
    #[serde(default)]
    pub endpoint: Option<String>,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            provider: default_provider(),
            model: default_embedding_model(),
            api_key: default_api_key(),
            timeout_ms: default_embedding_timeout_ms(),
            endpoint: None,
        }
    }
}

impl EmbeddingConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn resolve(&mut self) {
        self.provider = self.provider.trim().to_lowercase();
        if self.timeout_ms == 0 {
            self.timeout_ms = default_embedding_timeout_ms();
        }
        self.api_key = resolve_api_key(&self.api_key);
        if self.enabled && self.api_key.is_empty() {
            warn!(
                target: "vibe::embed",
                "embeddings enabled but {ENV_OPENAI_API_KEY} is missing; disabling"
            );
            self.enabled = false;
        }
    }
}

/// `ENV` (any case) reads `OPENAI_API_KEY`; a missing variable yields an empty key.
fn resolve_api_key(raw: &str) -> String {
    if raw.trim().eq_ignore_ascii_case("env") {
        env::var(ENV_OPENAI_API_KEY).unwrap_or_default()
    } else {
        raw.trim().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_key_is_kept() {
        let mut cfg = DelegateConfig {
            enabled: true,
            provider: " OpenAI ".into(),
            api_key: "sk-test".into(),
            ..DelegateConfig::default()
        };
        cfg.resolve();
        assert!(cfg.enabled);
        assert_eq!(cfg.provider, "openai");
        assert_eq!(cfg.api_key, "sk-test");
    }

    #[test]
    fn missing_key_disables_delegate() {
        let mut cfg = DelegateConfig {
            enabled: true,
            api_key: "  ".into(),
            ..DelegateConfig::default()
        };
        cfg.resolve();
        assert!(!cfg.enabled);
    }

    #[test]
    fn zero_timeout_falls_back() {
        let mut cfg = EmbeddingConfig {
            timeout_ms: 0,
            ..EmbeddingConfig::default()
        };
        cfg.resolve();
        assert_eq!(cfg.timeout(), Duration::from_millis(5_000));
    }
}
