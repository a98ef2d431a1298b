//! JSON file caches for draw history and frequency rankings

use std::path::{Path, PathBuf};

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, Weekday};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::{FrequencyStore, HistoryStore};
use crate::error::{LottoForgeError, Result};
use crate::types::DrawResult;

/// Frequency rankings older than this are refreshed regardless of weekday
pub const FREQUENCY_MAX_AGE_DAYS: i64 = 7;

/// Day of the week on which the ranking is always refreshed
pub const FREQUENCY_REFRESH_DAY: Weekday = Weekday::Sun;

/// Cached draw history, newest draw first
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistorySnapshot {
    pub last_update: NaiveDate,
    pub results: Vec<DrawResult>,
}

impl HistorySnapshot {
    pub fn new(last_update: NaiveDate, results: Vec<DrawResult>) -> Self {
        Self {
            last_update,
            results,
        }
    }

    /// Stale unless updated on the same calendar day as `now`
    pub fn is_stale(&self, now: NaiveDateTime) -> bool {
        self.last_update != now.date()
    }
}

/// Cached frequency ranking as `(number, count)`, most frequent first
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrequencySnapshot {
    pub updated: NaiveDateTime,
    pub top_numbers: Vec<(u8, u32)>,
}

impl FrequencySnapshot {
    pub fn new(updated: NaiveDateTime, top_numbers: Vec<(u8, u32)>) -> Self {
        Self {
            updated,
            top_numbers,
        }
    }

    /// Stale after a week, or on the refresh day when not yet refreshed that day
    pub fn is_stale(&self, now: NaiveDateTime) -> bool {
        if now - self.updated >= Duration::days(FREQUENCY_MAX_AGE_DAYS) {
            return true;
        }
        now.weekday() == FREQUENCY_REFRESH_DAY && self.updated.date() != now.date()
    }

    /// The `n` most frequent numbers, highest count first
    pub fn top_numbers(&self, n: usize) -> Vec<u8> {
        self.top_numbers.iter().take(n).map(|&(number, _)| number).collect()
    }
}

/// Draw history kept in a JSON file
#[derive(Debug, Clone)]
pub struct JsonHistoryStore {
    path: PathBuf,
}

impl JsonHistoryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl HistoryStore for JsonHistoryStore {
    fn load(&self) -> Result<Option<HistorySnapshot>> {
        read_json(&self.path)
    }

    fn save(&self, snapshot: &HistorySnapshot) -> Result<()> {
        write_json(&self.path, snapshot)
    }
}

/// Frequency ranking kept in a JSON file
#[derive(Debug, Clone)]
pub struct JsonFrequencyStore {
    path: PathBuf,
}

impl JsonFrequencyStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl FrequencyStore for JsonFrequencyStore {
    fn load(&self) -> Result<Option<FrequencySnapshot>> {
        read_json(&self.path)
    }

    fn save(&self, snapshot: &FrequencySnapshot) -> Result<()> {
        write_json(&self.path, snapshot)
    }
}

/// `Ok(None)` when the file does not exist
fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    if !path.exists() {
        return Ok(None);
    }

    let content = std::fs::read_to_string(path).map_err(|e| {
        LottoForgeError::io(e.to_string(), Some(path.to_string_lossy().to_string()))
    })?;

    serde_json::from_str(&content)
        .map(Some)
        .map_err(|e| LottoForgeError::parse(e.to_string(), Some(content)))
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    // Ensure parent directory exists
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| {
            LottoForgeError::io(e.to_string(), Some(parent.to_string_lossy().to_string()))
        })?;
    }

    let content = serde_json::to_string_pretty(value).map_err(|e| {
        LottoForgeError::internal(format!("Failed to serialize cache: {}", e))
    })?;

    std::fs::write(path, content).map_err(|e| {
        LottoForgeError::io(e.to_string(), Some(path.to_string_lossy().to_string()))
    })
}
