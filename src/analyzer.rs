//! Analyzer abstraction and the delegate-then-engine chain.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use metrics::counter;
use tokio::time::timeout;
use tracing::{debug, info, warn};

use crate::engine::VibeEngine;
use crate::item::{batch_fingerprint, NewsItem};
use crate::result::AnalysisResult;

pub const DEFAULT_DELEGATE_TIMEOUT: Duration = Duration::from_millis(8_000);

/// Anything that can turn a batch into a verdict.
///
/// `Ok(None)` means the analyzer declined (disabled, over budget); `Err` means
/// it tried and failed. Callers treat both as "fall through".
#[async_trait]
pub trait VibeAnalyzer: Send + Sync {
    async fn analyze(&self, items: &[NewsItem]) -> anyhow::Result<Option<AnalysisResult>>;

    /// Name for diagnostics/logs.
    fn name(&self) -> &'static str;
}

/// Delegates are consulted in order, each under a bounded wait; the
/// deterministic engine always has the last word.
pub struct AnalyzerChain {
    delegates: Vec<Arc<dyn VibeAnalyzer>>,
    engine: Arc<VibeEngine>,
    delegate_timeout: Duration,
}

impl AnalyzerChain {
    pub fn new(engine: Arc<VibeEngine>) -> Self {
        Self {
            delegates: Vec::new(),
            engine,
            delegate_timeout: DEFAULT_DELEGATE_TIMEOUT,
        }
    }

    pub fn with_delegate(mut self, delegate: Arc<dyn VibeAnalyzer>) -> Self {
        self.delegates.push(delegate);
        self
    }

    pub fn with_delegate_timeout(mut self, limit: Duration) -> Self {
        self.delegate_timeout = limit;
        self
    }

    pub fn engine(&self) -> &VibeEngine {
        &self.engine
    }

    pub fn delegate_names(&self) -> Vec<&'static str> {
        self.delegates.iter().map(|d| d.name()).collect()
    }

    /// Never fails: worst case is the engine's neutral result.
    pub async fn analyze(&self, items: &[NewsItem]) -> AnalysisResult {
        for delegate in &self.delegates {
            let name = delegate.name();
            match timeout(self.delegate_timeout, delegate.analyze(items)).await {
                Ok(Ok(Some(result))) => {
                    counter!("vibe_analyses_total", "path" => "delegate").increment(1);
                    info!(
                        target: "vibe::delegate",
                        delegate = name,
                        batch = %batch_fingerprint(items),
                        vibe = result.vibe().tag(),
                        confidence = result.confidence(),
                        "delegate verdict accepted"
                    );
                    return result;
                }
                Ok(Ok(None)) => {
                    debug!(target: "vibe::delegate", delegate = name, "delegate declined");
                }
                Ok(Err(e)) => {
                    counter!("vibe_delegate_failures_total").increment(1);
                    warn!(
                        target: "vibe::delegate",
                        delegate = name,
                        error = %format!("{e:#}"),
                        "delegate failed; falling back"
                    );
                }
                Err(_) => {
                    counter!("vibe_delegate_failures_total").increment(1);
                    warn!(
                        target: "vibe::delegate",
                        delegate = name,
                        timeout_ms = self.delegate_timeout.as_millis() as u64,
                        "delegate timed out; falling back"
                    );
                }
            }
        }
        self.engine.analyze(items).await
    }
}
