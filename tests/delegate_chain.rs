// tests/delegate_chain.rs
//
// Delegate-then-engine chain: accepted verdicts, declines, errors, timeouts.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use news_vibe::analyze::FieldWeights;
use news_vibe::delegate::{parse_verdict, DisabledDelegate, FixedDelegate};
use news_vibe::{
    AnalysisResult, AnalyzerChain, NewsItem, SentimentScore, Vibe, VibeAnalyzer, VibeEngine,
};

fn at() -> DateTime<Utc> {
    "2025-09-12T06:00:00Z".parse().unwrap()
}

fn items() -> Vec<NewsItem> {
    vec![NewsItem::new("Telescope captures a distant galaxy", at())]
}

fn engine() -> Arc<VibeEngine> {
    Arc::new(VibeEngine::keyword_only(FieldWeights::default()))
}

fn preset(vibe: Vibe) -> AnalysisResult {
    AnalysisResult::new(
        vibe,
        0.9,
        "Preset verdict.",
        vec!["preset".into()],
        SentimentScore::new(0.8, 0.4, 0.5),
        at(),
        0.7,
    )
}

struct Failing;

#[async_trait]
impl VibeAnalyzer for Failing {
    async fn analyze(&self, _items: &[NewsItem]) -> anyhow::Result<Option<AnalysisResult>> {
        anyhow::bail!("upstream exploded")
    }
    fn name(&self) -> &'static str {
        "failing"
    }
}

struct Malformed;

#[async_trait]
impl VibeAnalyzer for Malformed {
    async fn analyze(&self, _items: &[NewsItem]) -> anyhow::Result<Option<AnalysisResult>> {
        parse_verdict(r#"{"vibe":"sleepy","confidence":2}"#, Utc::now()).map(Some)
    }
    fn name(&self) -> &'static str {
        "malformed"
    }
}

struct Slow;

#[async_trait]
impl VibeAnalyzer for Slow {
    async fn analyze(&self, _items: &[NewsItem]) -> anyhow::Result<Option<AnalysisResult>> {
        tokio::time::sleep(Duration::from_secs(3600)).await;
        Ok(Some(preset(Vibe::Whimsical)))
    }
    fn name(&self) -> &'static str {
        "slow"
    }
}

#[tokio::test]
async fn accepted_delegate_verdict_wins() {
    let chain = AnalyzerChain::new(engine())
        .with_delegate(Arc::new(FixedDelegate::new(preset(Vibe::Tender))));
    let r = chain.analyze(&items()).await;
    assert_eq!(r, preset(Vibe::Tender));
}

#[tokio::test]
async fn declining_delegate_falls_through() {
    let chain = AnalyzerChain::new(engine()).with_delegate(Arc::new(DisabledDelegate));
    let r = chain.analyze(&items()).await;
    assert_eq!(r.vibe(), Vibe::Awestruck);
}

#[tokio::test]
async fn failing_and_malformed_delegates_fall_through() {
    let chain = AnalyzerChain::new(engine())
        .with_delegate(Arc::new(Failing))
        .with_delegate(Arc::new(Malformed));
    let r = chain.analyze(&items()).await;
    assert_eq!(r.vibe(), Vibe::Awestruck);
}

#[tokio::test]
async fn later_delegate_is_consulted_after_a_failure() {
    let chain = AnalyzerChain::new(engine())
        .with_delegate(Arc::new(Failing))
        .with_delegate(Arc::new(FixedDelegate::new(preset(Vibe::Defiant))));
    assert_eq!(chain.analyze(&items()).await.vibe(), Vibe::Defiant);
    assert_eq!(chain.delegate_names(), vec!["failing", "fixed"]);
}

#[tokio::test(start_paused = true)]
async fn slow_delegate_is_bounded_by_timeout() {
    let chain = AnalyzerChain::new(engine())
        .with_delegate(Arc::new(Slow))
        .with_delegate_timeout(Duration::from_millis(250));

    let started = tokio::time::Instant::now();
    let r = chain.analyze(&items()).await;

    assert_eq!(r.vibe(), Vibe::Awestruck);
    assert!(started.elapsed() < Duration::from_secs(1));
}

#[tokio::test]
async fn empty_chain_is_the_engine() {
    let chain = AnalyzerChain::new(engine());
    let direct = chain.engine().analyze_at(&[], at()).await;
    assert_eq!(direct.vibe(), Vibe::Contemplative);
    assert_eq!(chain.analyze(&[]).await.vibe(), Vibe::Contemplative);
}
