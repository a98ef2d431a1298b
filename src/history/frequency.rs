//! Frequency ranking over historical draws

use chrono::NaiveDateTime;

use super::store::FrequencySnapshot;
use crate::types::{DrawResult, MAX_NUMBER};

/// How often each number appeared among the main six of a set of draws
#[derive(Debug, Clone)]
pub struct FrequencyTable {
    counts: [u32; MAX_NUMBER as usize + 1],
    draws: usize,
}

impl FrequencyTable {
    /// Count the main numbers of every draw; bonus balls are not counted
    pub fn from_draws(draws: &[DrawResult]) -> Self {
        let mut counts = [0u32; MAX_NUMBER as usize + 1];
        for draw in draws {
            for &n in &draw.numbers {
                if let Some(slot) = counts.get_mut(n as usize) {
                    *slot += 1;
                }
            }
        }
        Self {
            counts,
            draws: draws.len(),
        }
    }

    pub fn count(&self, number: u8) -> u32 {
        self.counts.get(number as usize).copied().unwrap_or(0)
    }

    pub fn draws(&self) -> usize {
        self.draws
    }

    /// Numbers seen at least once as `(number, count)`, by count descending then number ascending
    pub fn ranked(&self) -> Vec<(u8, u32)> {
        let mut ranked: Vec<(u8, u32)> = self
            .counts
            .iter()
            .enumerate()
            .skip(1)
            .filter(|&(_, &count)| count > 0)
            .map(|(n, &count)| (n as u8, count))
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
        ranked
    }

    pub fn into_snapshot(self, updated: NaiveDateTime) -> FrequencySnapshot {
        FrequencySnapshot::new(updated, self.ranked())
    }
}
