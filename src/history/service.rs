//! Refresh policy tying the draw source to the on-disk caches

use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{NaiveDateTime, NaiveTime};
use futures::future::join_all;
use tokio::sync::Semaphore;

use super::frequency::FrequencyTable;
use super::store::{FrequencySnapshot, HistorySnapshot};
use super::{DrawSource, FrequencyStore, HistoryStore};
use crate::config::AppConfig;
use crate::error::{LottoForgeError, Result};
use crate::types::DrawResult;

/// Fetch progress reported while refreshing history
#[derive(Debug, Clone, Copy)]
pub struct FetchProgress {
    pub fetched: usize,
    pub total: usize,
}

/// History settings used by [`HistoryService`]
#[derive(Debug, Clone)]
pub struct HistoryConfig {
    pub depth: u32,
    pub concurrency: usize,
    pub request_delay: Duration,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self::from(&AppConfig::default())
    }
}

impl From<&AppConfig> for HistoryConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            depth: config.history_depth,
            concurrency: config.fetch_concurrency,
            request_delay: config.request_delay,
        }
    }
}

/// Keeps draw history and frequency rankings fresh
pub struct HistoryService<S, H, F> {
    source: S,
    history_store: H,
    frequency_store: F,
    config: HistoryConfig,
}

impl<S, H, F> HistoryService<S, H, F>
where
    S: DrawSource,
    H: HistoryStore,
    F: FrequencyStore,
{
    pub fn new(source: S, history_store: H, frequency_store: F, config: HistoryConfig) -> Self {
        Self {
            source,
            history_store,
            frequency_store,
            config,
        }
    }

    /// Cached history when fresh, otherwise a refetch of the latest draws
    pub async fn history(&self, now: NaiveDateTime) -> Result<Vec<DrawResult>> {
        self.history_with_progress(now, |_| {}).await
    }

    pub async fn history_with_progress<P>(&self, now: NaiveDateTime, on_progress: P) -> Result<Vec<DrawResult>>
    where
        P: Fn(FetchProgress) + Send + Sync,
    {
        self.resolve_history(now, &on_progress)
            .await
            .map(|snapshot| snapshot.results)
    }

    /// Fresh history, or the stale cache when the refresh fails; the snapshot keeps its own `last_update`
    async fn resolve_history<P>(&self, now: NaiveDateTime, on_progress: &P) -> Result<HistorySnapshot>
    where
        P: Fn(FetchProgress) + Send + Sync,
    {
        let cached = match self.history_store.load() {
            Ok(snapshot) => snapshot,
            Err(e) => {
                tracing::warn!(error = %e, "History cache unreadable, refetching");
                None
            }
        };

        if let Some(snapshot) = cached.as_ref().filter(|s| !s.is_stale(now)) {
            tracing::debug!(draws = %snapshot.results.len(), "Using cached history");
            return Ok(snapshot.clone());
        }

        match self.fetch_recent(on_progress).await {
            Ok(results) => {
                let snapshot = HistorySnapshot::new(now.date(), results);
                if let Err(e) = self.history_store.save(&snapshot) {
                    tracing::warn!(error = %e, "Failed to save history cache");
                }
                Ok(snapshot)
            }
            Err(e) => match cached {
                Some(snapshot) => {
                    tracing::warn!(
                        error = %e,
                        last_update = %snapshot.last_update,
                        "History refresh failed, serving stale cache"
                    );
                    Ok(snapshot)
                }
                None => Err(e),
            },
        }
    }

    /// The newest `count` draws
    pub async fn latest_results(&self, now: NaiveDateTime, count: usize) -> Result<Vec<DrawResult>> {
        let mut results = self.history(now).await?;
        results.truncate(count);
        Ok(results)
    }

    /// Cached ranking when fresh, otherwise recomputed from history
    pub async fn frequencies(&self, now: NaiveDateTime) -> Result<FrequencySnapshot> {
        self.frequencies_with_progress(now, |_| {}).await
    }

    /// When history cannot be refreshed the stored ranking is served as is.
    /// A ranking rebuilt from stale history carries that history's date and is not saved.
    pub async fn frequencies_with_progress<P>(
        &self,
        now: NaiveDateTime,
        on_progress: P,
    ) -> Result<FrequencySnapshot>
    where
        P: Fn(FetchProgress) + Send + Sync,
    {
        let existing = match self.frequency_store.load() {
            Ok(snapshot) => snapshot,
            Err(e) => {
                tracing::warn!(error = %e, "Frequency cache unreadable, recomputing");
                None
            }
        };

        if let Some(snapshot) = existing.as_ref().filter(|s| !s.is_stale(now)) {
            return Ok(snapshot.clone());
        }

        let history = match self.resolve_history(now, &on_progress).await {
            Ok(history) => history,
            Err(e) => match existing {
                Some(snapshot) => {
                    tracing::warn!(
                        error = %e,
                        updated = %snapshot.updated,
                        "History unavailable, serving stale frequency ranking"
                    );
                    return Ok(snapshot);
                }
                None => return Err(e),
            },
        };

        let history_is_stale = history.is_stale(now);
        if history_is_stale {
            if let Some(snapshot) = existing {
                tracing::warn!(
                    last_update = %history.last_update,
                    updated = %snapshot.updated,
                    "History is stale, keeping stored frequency ranking"
                );
                return Ok(snapshot);
            }
        }

        let table = FrequencyTable::from_draws(&history.results);
        tracing::info!(draws = %table.draws(), "Frequency ranking recomputed");

        if history_is_stale {
            // not persisted, so the next call retries the refresh
            return Ok(table.into_snapshot(history.last_update.and_time(NaiveTime::default())));
        }

        let snapshot = table.into_snapshot(now);
        self.frequency_store.save(&snapshot)?;
        Ok(snapshot)
    }

    /// The stored top `n` numbers without touching the network; empty when no ranking exists yet
    pub fn top_numbers(&self, n: usize) -> Vec<u8> {
        match self.frequency_store.load() {
            Ok(Some(snapshot)) => snapshot.top_numbers(n),
            Ok(None) => Vec::new(),
            Err(e) => {
                tracing::warn!(error = %e, "Frequency cache unreadable");
                Vec::new()
            }
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    async fn fetch_recent<P>(&self, on_progress: &P) -> Result<Vec<DrawResult>>
    where
        P: Fn(FetchProgress) + Send + Sync,
    {
        let start_time = Instant::now();
        let latest = self.source.latest_draw_no().await?;
        if latest == 0 {
            return Err(LottoForgeError::parse("Latest draw number is 0", None));
        }

        // newest first, never below draw 1
        let oldest = latest.saturating_sub(self.config.depth.saturating_sub(1)).max(1);
        let draw_numbers: Vec<u32> = (oldest..=latest).rev().collect();
        let total = draw_numbers.len();

        let semaphore = Arc::new(Semaphore::new(self.config.concurrency.max(1)));
        let fetched = std::sync::atomic::AtomicUsize::new(0);

        let futures = draw_numbers.iter().map(|&draw_no| {
            let semaphore = Arc::clone(&semaphore);
            let fetched = &fetched;
            async move {
                let _permit = semaphore.acquire().await.map_err(|e| {
                    LottoForgeError::internal(format!("Failed to acquire semaphore: {}", e))
                })?;
                let result = self.source.fetch_draw(draw_no).await;
                if !self.config.request_delay.is_zero() {
                    tokio::time::sleep(self.config.request_delay).await;
                }
                let done = fetched.fetch_add(1, std::sync::atomic::Ordering::Relaxed) + 1;
                on_progress(FetchProgress { fetched: done, total });
                result.map(|draw| (draw_no, draw))
            }
        });
        let results = join_all(futures).await;

        let mut draws = Vec::with_capacity(total);
        let mut error_count = 0u32;
        for result in results {
            match result {
                Ok((_, Some(draw))) => draws.push(draw),
                Ok((draw_no, None)) => {
                    tracing::debug!(draw_no = %draw_no, "Draw not available");
                }
                Err(e) => {
                    error_count += 1;
                    tracing::warn!(error = %e, "Failed to fetch draw");
                }
            }
        }

        if draws.is_empty() {
            return Err(LottoForgeError::network(
                format!("No draws could be fetched from {}", self.source.name()),
                None,
                None,
            ));
        }

        draws.sort_by(|a, b| b.draw_no.cmp(&a.draw_no));

        tracing::info!(
            source = %self.source.name(),
            latest = %latest,
            draws = %draws.len(),
            errors = %error_count,
            duration_ms = %start_time.elapsed().as_millis(),
            "History refresh completed"
        );

        Ok(draws)
    }
}
