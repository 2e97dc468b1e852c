//! Shared service: analyzer chain plus the per-day result cache.

use std::future::Future;

use chrono::{Local, NaiveDate};
use tracing::info;

use crate::analyzer::AnalyzerChain;
use crate::daily_cache::{Cached, DailyCache};
use crate::item::NewsItem;
use crate::result::AnalysisResult;

/// Local calendar day used as the cache key.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

pub struct VibeService {
    chain: AnalyzerChain,
    cache: DailyCache<AnalysisResult>,
}

impl VibeService {
    pub fn new(chain: AnalyzerChain) -> Self {
        Self {
            chain,
            cache: DailyCache::new(),
        }
    }

    pub fn chain(&self) -> &AnalyzerChain {
        &self.chain
    }

    /// Fresh analysis; the cache is neither read nor written.
    pub async fn analyze(&self, items: &[NewsItem]) -> AnalysisResult {
        self.chain.analyze(items).await
    }

    pub async fn vibe_for_today(&self, items: &[NewsItem]) -> Cached<AnalysisResult> {
        self.vibe_for_day(today(), items).await
    }

    pub async fn vibe_for_day(&self, day: NaiveDate, items: &[NewsItem]) -> Cached<AnalysisResult> {
        self.cache
            .get_or_compute(day, || self.chain.analyze(items))
            .await
    }

    pub async fn refresh_today(&self, items: &[NewsItem]) -> AnalysisResult {
        self.refresh_day(today(), items).await
    }

    pub async fn refresh_day(&self, day: NaiveDate, items: &[NewsItem]) -> AnalysisResult {
        self.cache.refresh(day, || self.chain.analyze(items)).await
    }

    /// Cached-or-computed result, abandoned when `cancel` completes first.
    /// An abandoned call leaves the cache untouched and yields `None`.
    pub async fn vibe_for_today_until<C>(
        &self,
        items: &[NewsItem],
        cancel: C,
    ) -> Option<Cached<AnalysisResult>>
    where
        C: Future<Output = ()>,
    {
        self.vibe_for_day_until(today(), items, cancel).await
    }

    /// The race covers the wait for the slot lock too, so a caller queued
    /// behind another computation is released as soon as `cancel` fires.
    pub async fn vibe_for_day_until<C>(
        &self,
        day: NaiveDate,
        items: &[NewsItem],
        cancel: C,
    ) -> Option<Cached<AnalysisResult>>
    where
        C: Future<Output = ()>,
    {
        until(self.vibe_for_day(day, items), cancel, items.len()).await
    }

    pub async fn refresh_today_until<C>(
        &self,
        items: &[NewsItem],
        cancel: C,
    ) -> Option<AnalysisResult>
    where
        C: Future<Output = ()>,
    {
        self.refresh_day_until(today(), items, cancel).await
    }

    pub async fn refresh_day_until<C>(
        &self,
        day: NaiveDate,
        items: &[NewsItem],
        cancel: C,
    ) -> Option<AnalysisResult>
    where
        C: Future<Output = ()>,
    {
        until(self.refresh_day(day, items), cancel, items.len()).await
    }

    pub async fn cached_today(&self) -> Option<AnalysisResult> {
        self.cache.peek(today()).await
    }

    pub async fn cached_for(&self, day: NaiveDate) -> Option<AnalysisResult> {
        self.cache.peek(day).await
    }
}

/// Run `work` unless `cancel` completes first. Cancellation wins ties.
///
/// Dropping `work` drops any in-flight delegate or embedding calls and, if it
/// held the cache slot, releases the lock before anything is stored.
async fn until<W, C>(work: W, cancel: C, items: usize) -> Option<W::Output>
where
    W: Future,
    C: Future<Output = ()>,
{
    tokio::select! {
        biased;
        _ = cancel => {
            info!(target: "vibe", items, "analysis cancelled; result discarded");
            None
        }
        out = work => Some(out),
    }
}
