//! Single-slot cache keyed by calendar day.
//!
//! The slot lock is held across the whole check-compute-store sequence, so
//! concurrent callers for the same day wait for the first computation instead
//! of each running their own. Dropping a pending call before its computation
//! finishes releases the lock and stores nothing.

use std::future::Future;

use chrono::NaiveDate;
use metrics::counter;
use tokio::sync::Mutex;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheStatus {
    Hit,
    Miss,
}

impl CacheStatus {
    pub fn as_header(self) -> &'static str {
        match self {
            CacheStatus::Hit => "HIT",
            CacheStatus::Miss => "MISS",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Cached<T> {
    pub value: T,
    pub status: CacheStatus,
}

#[derive(Debug)]
pub struct DailyCache<T> {
    slot: Mutex<Option<(NaiveDate, T)>>,
}

impl<T> Default for DailyCache<T> {
    fn default() -> Self {
        Self {
            slot: Mutex::new(None),
        }
    }
}

impl<T: Clone> DailyCache<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Value stored for `day`, if any. Never computes.
    pub async fn peek(&self, day: NaiveDate) -> Option<T> {
        let g = self.slot.lock().await;
        match g.as_ref() {
            Some((d, v)) if *d == day => Some(v.clone()),
            _ => None,
        }
    }

    pub async fn cached_day(&self) -> Option<NaiveDate> {
        self.slot.lock().await.as_ref().map(|(d, _)| *d)
    }

    /// Return the value for `day`, computing and storing it when absent.
    pub async fn get_or_compute<F, Fut>(&self, day: NaiveDate, compute: F) -> Cached<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = T>,
    {
        let mut g = self.slot.lock().await;
        if let Some((d, v)) = g.as_ref() {
            if *d == day {
                counter!("vibe_cache_total", "outcome" => "hit").increment(1);
                debug!(target: "vibe::cache", %day, "cache hit");
                return Cached {
                    value: v.clone(),
                    status: CacheStatus::Hit,
                };
            }
        }
        let value = compute().await;
        counter!("vibe_cache_total", "outcome" => "miss").increment(1);
        debug!(target: "vibe::cache", %day, "cache miss; stored");
        *g = Some((day, value.clone()));
        Cached {
            value,
            status: CacheStatus::Miss,
        }
    }

    /// Always recompute and overwrite.
    pub async fn refresh<F, Fut>(&self, day: NaiveDate, compute: F) -> T
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = T>,
    {
        let mut g = self.slot.lock().await;
        let value = compute().await;
        counter!("vibe_cache_total", "outcome" => "refresh").increment(1);
        debug!(target: "vibe::cache", %day, "cache refreshed");
        *g = Some((day, value.clone()));
        value
    }

    pub async fn clear(&self) {
        *self.slot.lock().await = None;
    }
}
