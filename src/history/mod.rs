//! Draw history collaborator
//!
//! Past results come from a [`DrawSource`] and are cached through
//! [`HistoryStore`] and [`FrequencyStore`]. The generator never depends on
//! this module; frequency rankings only feed the candidate pool handed to
//! [`generate_from_top_n`](crate::generator::generate_from_top_n).

mod client;
mod frequency;
mod service;
mod store;

use async_trait::async_trait;
use chrono::NaiveDateTime;

use crate::error::Result;
use crate::types::DrawResult;

pub use client::{parse_latest_draw_no, DhLotteryClient};
pub use frequency::FrequencyTable;
pub use service::{FetchProgress, HistoryConfig, HistoryService};
pub use store::{
    FrequencySnapshot, HistorySnapshot, JsonFrequencyStore, JsonHistoryStore,
    FREQUENCY_MAX_AGE_DAYS, FREQUENCY_REFRESH_DAY,
};

/// Where draw results come from
#[async_trait]
pub trait DrawSource: Send + Sync {
    /// Number of the most recent draw
    async fn latest_draw_no(&self) -> Result<u32>;

    /// A single draw, `None` when the source has no such draw
    async fn fetch_draw(&self, draw_no: u32) -> Result<Option<DrawResult>>;

    fn name(&self) -> &'static str;
}

/// Persistence for draw history
pub trait HistoryStore: Send + Sync {
    fn load(&self) -> Result<Option<HistorySnapshot>>;

    fn save(&self, snapshot: &HistorySnapshot) -> Result<()>;

    /// Missing or unreadable history counts as stale
    fn is_stale(&self, now: NaiveDateTime) -> bool {
        match self.load() {
            Ok(Some(snapshot)) => snapshot.is_stale(now),
            Ok(None) => true,
            Err(e) => {
                tracing::warn!(error = %e, "History cache unreadable");
                true
            }
        }
    }
}

/// Persistence for frequency rankings
pub trait FrequencyStore: Send + Sync {
    fn load(&self) -> Result<Option<FrequencySnapshot>>;

    fn save(&self, snapshot: &FrequencySnapshot) -> Result<()>;

    /// Missing or unreadable rankings count as stale
    fn is_stale(&self, now: NaiveDateTime) -> bool {
        match self.load() {
            Ok(Some(snapshot)) => snapshot.is_stale(now),
            Ok(None) => true,
            Err(e) => {
                tracing::warn!(error = %e, "Frequency cache unreadable");
                true
            }
        }
    }
}
