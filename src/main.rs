//! Lotto Forge - constraint-filtered 6/45 lottery combinations
//!
//! Generates combinations that pass a set of statistical rules, and keeps a
//! local copy of recent draw history for frequency-derived picks.

use std::process;

use chrono::{Local, NaiveDateTime};
use clap::{Args, Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};

use lotto_forge::{
    generator::make_rng,
    history::{FetchProgress, HistoryConfig, JsonFrequencyStore, JsonHistoryStore},
    AppConfig, CombinationGenerator, DhLotteryClient, GenerationConfig,
    GenerationResponse, LottoForgeError, PredicateSet, Preset, Result, Rule, TopPickResponse,
};

type Service = lotto_forge::HistoryService<DhLotteryClient, JsonHistoryStore, JsonFrequencyStore>;

#[derive(Parser)]
#[command(
    name = "lotto-forge",
    version,
    about = "Constraint-filtered 6/45 lottery combination generator"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Generate combinations that pass the selected rules (default).
    Generate(GenerateArgs),
    /// List the available rules and their preset membership.
    Predicates,
    /// Show the most recent draws, refreshing the local cache when stale.
    History {
        /// Number of draws to show.
        #[arg(short = 'n', long, default_value_t = 5)]
        count: usize,
        #[arg(long)]
        json: bool,
    },
    /// Show the most frequent numbers across recent draws.
    Top {
        /// Number of ranked entries to show.
        #[arg(short = 'n', long, default_value_t = 20)]
        count: usize,
        #[arg(long)]
        json: bool,
    },
    /// Pick six numbers from the stored top-ranked pool.
    Pick {
        /// Seed for reproducible output.
        #[arg(long)]
        seed: Option<u64>,
        #[arg(long)]
        json: bool,
    },
}

#[derive(Args)]
struct GenerateArgs {
    /// Number of combinations.
    #[arg(short, long, default_value_t = 1)]
    count: usize,
    /// Rule preset: basic or full.
    #[arg(short, long, default_value_t = Preset::Full)]
    preset: Preset,
    /// Comma-separated rule names, replacing the preset.
    #[arg(long, value_delimiter = ',')]
    only: Vec<String>,
    /// Samples allowed per accepted combination.
    #[arg(long)]
    max_attempts: Option<u64>,
    /// Seed for reproducible output.
    #[arg(long)]
    seed: Option<u64>,
    /// Print `{"lotto_numbers": [...]}`.
    #[arg(long)]
    json: bool,
    /// Print acceptance statistics after generating.
    #[arg(long)]
    stats: bool,
}

impl Default for GenerateArgs {
    fn default() -> Self {
        Self {
            count: 1,
            preset: Preset::Full,
            only: Vec::new(),
            max_attempts: None,
            seed: None,
            json: false,
            stats: false,
        }
    }
}

#[tokio::main]
async fn main() {
    // Initialize the library
    if let Err(e) = lotto_forge::init() {
        eprintln!("❌ Failed to initialize: {}", e);
        process::exit(1);
    }
    lotto_forge::logging::init();

    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        eprintln!("{}", e.user_message());
        process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = AppConfig::from_env()?;

    match cli.command.unwrap_or_else(|| Command::Generate(GenerateArgs::default())) {
        Command::Generate(args) => cmd_generate(&config, args),
        Command::Predicates => {
            cmd_predicates();
            Ok(())
        }
        Command::History { count, json } => {
            require_positive(count)?;
            cmd_history(&config, count, json).await
        }
        Command::Top { count, json } => {
            require_positive(count)?;
            cmd_top(&config, count, json).await
        }
        Command::Pick { seed, json } => cmd_pick(&config, seed, json),
    }
}

fn cmd_generate(config: &AppConfig, args: GenerateArgs) -> Result<()> {
    let predicates = if args.only.is_empty() {
        args.preset.predicates()
    } else {
        PredicateSet::from_names(&args.only)?
    };

    let generator = CombinationGenerator::new(predicates);
    let generation = GenerationConfig {
        count: args.count,
        max_attempts: args.max_attempts.unwrap_or(config.max_attempts),
        seed: args.seed,
    };
    let combinations = generator.generate_with_config(&generation)?;

    if args.json {
        let response = GenerationResponse {
            lotto_numbers: combinations,
        };
        println!("{}", serde_json::to_string(&response)?);
    } else {
        println!("🎱 Lotto Forge ({} rules)", generator.predicates().len());
        println!("═══════════════════════════");
        for (i, combination) in combinations.iter().enumerate() {
            println!("{:2}. {}", i + 1, combination);
        }
    }

    if args.stats {
        let metrics = generator.get_metrics_snapshot();
        eprintln!();
        eprintln!("📈 Summary:");
        eprintln!("   🎯 Accepted: {}", metrics.accepted);
        eprintln!("   🔁 Attempts: {}", metrics.attempts);
        eprintln!("   📊 Acceptance rate: {:.3}%", metrics.acceptance_rate() * 100.0);
        for (name, count) in metrics.top_rejections().into_iter().take(5) {
            eprintln!("   ❌ {:<16} {}", name, count);
        }
    }

    Ok(())
}

fn cmd_predicates() {
    println!("📋 Rules (basic preset marked with *)");
    println!("═════════════════════════════════════");
    let basic = Preset::Basic.rules();
    for rule in Rule::ALL {
        let marker = if basic.contains(&rule) { '*' } else { ' ' };
        println!("{} {:<16} {}", marker, rule.name(), rule.description());
    }
}

async fn cmd_history(config: &AppConfig, count: usize, json: bool) -> Result<()> {
    let service = build_service(config)?;
    let now = now();

    let draws = with_fetch_progress(json, |progress| service.history_with_progress(now, progress)).await?;
    let draws: Vec<_> = draws.into_iter().take(count).collect();

    if json {
        println!("{}", serde_json::to_string(&draws)?);
        return Ok(());
    }

    println!("📜 Recent draws");
    println!("═══════════════");
    for draw in &draws {
        let numbers: Vec<String> = draw.numbers.iter().map(|n| format!("{:2}", n)).collect();
        println!("#{:<5} {}  + {:2}", draw.draw_no, numbers.join("  "), draw.bonus);
    }
    Ok(())
}

async fn cmd_top(config: &AppConfig, count: usize, json: bool) -> Result<()> {
    let service = build_service(config)?;
    let now = now();

    let mut snapshot =
        with_fetch_progress(json, |progress| service.frequencies_with_progress(now, progress)).await?;
    snapshot.top_numbers.truncate(count);

    if json {
        println!("{}", serde_json::to_string(&snapshot)?);
        return Ok(());
    }

    println!("🔥 Most frequent numbers (updated {})", snapshot.updated.format("%Y-%m-%d %H:%M"));
    println!("═══════════════════════════════════════");
    for (rank, (number, hits)) in snapshot.top_numbers.iter().enumerate() {
        println!("{:2}. {:2}  ({} draws)", rank + 1, number, hits);
    }
    Ok(())
}

fn cmd_pick(config: &AppConfig, seed: Option<u64>, json: bool) -> Result<()> {
    let service = build_service(config)?;
    let pool = service.top_numbers(config.top_pool_size);

    let mut rng = make_rng(seed)?;
    let pick = lotto_forge::generate_from_top_n(&pool, &mut rng)?;

    if json {
        println!("{}", serde_json::to_string(&TopPickResponse::from(pick))?);
        return Ok(());
    }

    match pick {
        Some(combination) => println!("🎯 {}", combination),
        None => println!("⚠️  Frequency ranking not ready. Run `lotto-forge top` first."),
    }
    Ok(())
}

fn require_positive(count: usize) -> Result<()> {
    if count == 0 {
        return Err(LottoForgeError::cli("--count must be at least 1"));
    }
    Ok(())
}

fn build_service(config: &AppConfig) -> Result<Service> {
    Ok(lotto_forge::HistoryService::new(
        DhLotteryClient::new(config)?,
        JsonHistoryStore::new(&config.history_file),
        JsonFrequencyStore::new(&config.top_numbers_file),
        HistoryConfig::from(config),
    ))
}

/// Run a history fetch with a progress bar on stderr, hidden for JSON output
async fn with_fetch_progress<T, F, Fut>(quiet: bool, fetch: F) -> Result<T>
where
    F: FnOnce(Box<dyn Fn(FetchProgress) + Send + Sync>) -> Fut,
    Fut: std::future::Future<Output = Result<T>>,
{
    let pb = if quiet {
        ProgressBar::hidden()
    } else {
        let pb = ProgressBar::new(0);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} draws")
                .map_err(|e| LottoForgeError::internal(format!("Invalid progress template: {}", e)))?
                .progress_chars("=> "),
        );
        pb
    };

    let bar = pb.clone();
    let result = fetch(Box::new(move |progress: FetchProgress| {
        bar.set_length(progress.total as u64);
        bar.set_position(progress.fetched as u64);
    }))
    .await;

    pb.finish_and_clear();
    result
}

fn now() -> NaiveDateTime {
    Local::now().naive_local()
}
