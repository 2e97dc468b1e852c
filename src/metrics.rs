use anyhow::Context;
use axum::{routing::get, Router};
use metrics::describe_counter;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

pub struct Metrics {
    pub handle: PrometheusHandle,
}

impl Metrics {
    /// Install the Prometheus recorder and describe the vibe counters.
    /// Fails if a global recorder is already installed.
    pub fn init() -> anyhow::Result<Self> {
        let handle = PrometheusBuilder::new()
            .install_recorder()
            .context("prometheus: install recorder")?;

        describe_counter!("vibe_analyses_total", "Analyses completed, by path (engine|delegate)");
        describe_counter!("vibe_fallback_total", "Batches that fell back to the neutral vibe");
        describe_counter!("vibe_embedding_failures_total", "Item embeddings that failed");
        describe_counter!("vibe_delegate_failures_total", "Delegate errors and timeouts");
        describe_counter!("vibe_cache_total", "Daily cache lookups, by outcome (hit|miss|refresh)");

        Ok(Self { handle })
    }

    /// Returns a router exposing `/metrics` with the Prometheus exposition format.
    pub fn router(&self) -> Router {
        let handle = self.handle.clone();
        Router::new().route(
            "/metrics",
            get(move || {
                let h = handle.clone();
                async move { h.render() }
            }),
        )
    }
}
