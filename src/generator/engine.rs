//! Rejection-sampling combination generator

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use rand::Rng;

use super::metrics::{GenerationMetrics, MetricsSnapshot};
use super::predicate_set::PredicateSet;
use super::sampler::{make_rng, sample_combination, sample_from_pool};
use crate::error::{LottoForgeError, Result};
use crate::types::{Combination, GenerationConfig};

/// Generator that samples combinations until every predicate in its set accepts
///
/// Stateless between calls apart from the shared metrics counters, so one
/// instance can be cloned into several threads.
#[derive(Clone, Debug)]
pub struct CombinationGenerator {
    predicates: PredicateSet,
    max_attempts: u64,
    metrics: Arc<GenerationMetrics>,
}

impl CombinationGenerator {
    /// Create a generator for the given predicate set with the default attempt cap
    pub fn new(predicates: impl Into<PredicateSet>) -> Self {
        Self {
            predicates: predicates.into(),
            max_attempts: GenerationConfig::default().max_attempts,
            metrics: Arc::new(GenerationMetrics::new()),
        }
    }

    /// Samples allowed per accepted combination
    pub fn with_max_attempts(mut self, max_attempts: u64) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    pub fn predicates(&self) -> &PredicateSet {
        &self.predicates
    }

    pub fn max_attempts(&self) -> u64 {
        self.max_attempts
    }

    /// Generate according to `config`, seeding from `config.seed` when set
    pub fn generate_with_config(&self, config: &GenerationConfig) -> Result<Vec<Combination>> {
        let mut rng = make_rng(config.seed)?;
        self.clone()
            .with_max_attempts(config.max_attempts)
            .generate_with_rng(config.count, &mut rng)
    }

    /// Generate `count` accepted combinations from an OS-seeded RNG
    pub fn generate(&self, count: usize) -> Result<Vec<Combination>> {
        let mut rng = make_rng(None)?;
        self.generate_with_rng(count, &mut rng)
    }

    /// Generate `count` accepted combinations from the supplied RNG
    pub fn generate_with_rng<R: Rng + ?Sized>(
        &self,
        count: usize,
        rng: &mut R,
    ) -> Result<Vec<Combination>> {
        if count == 0 {
            return Err(LottoForgeError::validation("Combination count must be at least 1"));
        }
        if self.predicates.is_empty() {
            return Err(LottoForgeError::validation("Predicate set must not be empty"));
        }
        if self.max_attempts == 0 {
            return Err(LottoForgeError::validation("Attempt cap must be at least 1"));
        }

        let start_time = Instant::now();
        let mut results = Vec::with_capacity(count);
        let mut rejections: HashMap<&str, u64> = HashMap::new();
        let mut total_attempts = 0u64;

        while results.len() < count {
            let mut attempts = 0u64;
            let accepted = loop {
                if attempts == self.max_attempts {
                    break None;
                }
                attempts += 1;

                let candidate = sample_combination(rng);
                match self.predicates.first_failure(&candidate) {
                    None => break Some(candidate),
                    Some(name) => *rejections.entry(name).or_insert(0) += 1,
                }
            };
            total_attempts += attempts;

            match accepted {
                Some(combination) => {
                    tracing::debug!(
                        combination = %combination,
                        attempts = %attempts,
                        "Combination accepted"
                    );
                    results.push(combination);
                }
                None => {
                    self.metrics
                        .record_batch(total_attempts, results.len() as u64, rejections);
                    self.metrics.increment_exhausted();
                    tracing::warn!(
                        max_attempts = %self.max_attempts,
                        predicates = %self.predicates.len(),
                        accepted = %results.len(),
                        requested = %count,
                        "Attempt cap reached without an acceptable combination"
                    );
                    return Err(LottoForgeError::unsatisfiable(
                        self.max_attempts,
                        self.predicates.len(),
                    ));
                }
            }
        }

        self.metrics
            .record_batch(total_attempts, results.len() as u64, rejections);

        tracing::info!(
            requested = %count,
            predicates = %self.predicates.len(),
            attempts = %total_attempts,
            duration_ms = %start_time.elapsed().as_millis(),
            "Generation completed"
        );

        Ok(results)
    }

    /// Get current metrics snapshot
    pub fn get_metrics_snapshot(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }
}

impl Default for CombinationGenerator {
    fn default() -> Self {
        Self::new(PredicateSet::full())
    }
}

/// Pick six numbers from a ranked frequency pool (for example the top 20)
///
/// Returns `Ok(None)` when fewer than six distinct numbers are available,
/// which callers treat as "ranking not ready" rather than a failure.
pub fn generate_from_top_n<R: Rng + ?Sized>(
    pool: &[u8],
    rng: &mut R,
) -> Result<Option<Combination>> {
    let pick = sample_from_pool(pool, rng)?;
    if pick.is_none() {
        tracing::debug!(pool_size = %pool.len(), "Frequency pool too small for a pick");
    }
    Ok(pick)
}
