//! Constraint-filtered combination generation
//!
//! Candidates are drawn uniformly from the C(45, 6) space and kept only when
//! every predicate of the active set accepts them.

mod engine;
mod metrics;
mod predicate;
mod predicate_set;
mod sampler;
pub mod tables;

pub use engine::{generate_from_top_n, CombinationGenerator};
pub use metrics::{GenerationMetrics, MetricsSnapshot};
pub use predicate::{ac_value, color_band_count, consecutive_pairs, FnPredicate, Predicate, Rule};
pub use predicate_set::{PredicateSet, Preset};
pub use sampler::{make_rng, sample_combination, sample_from_pool};
