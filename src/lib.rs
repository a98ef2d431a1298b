//! Lotto Forge - constraint-filtered 6/45 lottery combination generation
//!
//! Combinations are sampled uniformly and kept only when they pass a
//! configurable set of statistical rules. Draw history from the official
//! results site feeds a frequency ranking used for frequency-derived picks.

pub mod config;
pub mod error;
pub mod generator;
pub mod history;
pub mod logging;
pub mod types;

// Re-export commonly used types
pub use config::AppConfig;
pub use error::{LottoForgeError, Result};
pub use types::{
    ColorBand, Combination, DrawResult, GenerationConfig, GenerationResponse, TopPickResponse,
};

// Re-export main functionality
pub use generator::{
    generate_from_top_n, CombinationGenerator, MetricsSnapshot, Predicate, PredicateSet, Preset,
    Rule,
};
pub use history::{DhLotteryClient, DrawSource, FrequencyStore, HistoryService, HistoryStore};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize the library
pub fn init() -> Result<()> {
    // Load .env file if it exists
    dotenv::dotenv().ok();
    Ok(())
}
