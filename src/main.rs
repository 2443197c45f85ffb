//! Command-line entry point for the ladder
//!
//! Loads a match history file, replays it through the rating engine and
//! prints standings or recent results.

use anyhow::Result;
use clap::{Parser, Subcommand};
use paddle_ladder::config::AppConfig;
use paddle_ladder::history::HistoryFile;
use paddle_ladder::rating::InMemoryLeaderboardStore;
use paddle_ladder::service::Leaderboard;
use paddle_ladder::utils::percentage;
use std::path::{Path, PathBuf};
use tracing::{error, info};

/// Paddle Ladder - Elo rankings for table-tennis results
#[derive(Parser)]
#[command(
    name = "paddle-ladder",
    version,
    about = "Elo rankings for table-tennis match results",
    long_about = "Paddle Ladder replays a history of recorded matches through a fixed-K Elo \
                 rating engine and prints the resulting standings."
)]
struct Args {
    /// Configuration file path
    #[arg(
        short,
        long,
        value_name = "FILE",
        help = "Path to configuration file (TOML format)"
    )]
    config: Option<PathBuf>,

    /// Log level override
    #[arg(
        short,
        long,
        value_name = "LEVEL",
        help = "Override log level (trace, debug, info, warn, error)"
    )]
    log_level: Option<String>,

    /// Enable debug mode
    #[arg(short, long, help = "Enable debug mode with verbose logging")]
    debug: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the ranked table for a match history
    Standings {
        /// Match history file (JSON)
        history: PathBuf,
    },
    /// Print the most recent matches
    Recent {
        /// Match history file (JSON)
        history: PathBuf,

        /// Number of matches to show
        #[arg(long, value_name = "N")]
        limit: Option<usize>,
    },
    /// Validate configuration and exit
    CheckConfig,
}

/// Initialize structured logging with the configured level
fn init_logging(log_level: &str) -> Result<()> {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| log_level.into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    Ok(())
}

/// Load configuration and apply CLI overrides
fn load_config(args: &Args) -> Result<AppConfig> {
    let mut config = if let Some(config_path) = &args.config {
        AppConfig::from_file(config_path)?
    } else {
        AppConfig::from_env()?
    };

    if let Some(log_level) = &args.log_level {
        config.service.log_level = log_level.clone();
    }

    if args.debug {
        config.service.log_level = "debug".to_string();
    }

    paddle_ladder::config::validate_config(&config)?;
    Ok(config)
}

fn load_leaderboard(
    config: &AppConfig,
    history: &Path,
) -> Result<Leaderboard<InMemoryLeaderboardStore>> {
    info!("Loading match history from: {}", history.display());
    let store = InMemoryLeaderboardStore::new(config.rating.default_rating);
    let board = Leaderboard::from_config(store, config)?;
    HistoryFile::load(history)?.apply(&board)?;
    Ok(board)
}

fn print_standings(config: &AppConfig, board: &Leaderboard<InMemoryLeaderboardStore>) -> Result<()> {
    let standings = board.standings()?;
    if standings.is_empty() {
        println!("No rated players yet.");
        return Ok(());
    }

    println!(
        "{:>4}  {:<28} {:>6}  {:>9}  {:>6}  {:>6}",
        "Rank", "Player", "Rating", "W-L-D", "Win%", "PPG"
    );
    for row in &standings {
        let record = format!("{}-{}-{}", row.stats.wins, row.stats.losses, row.stats.draws);
        println!(
            "{:>4}  {:<28} {:>6}  {:>9}  {:>6}  {:>6.1}",
            row.rank,
            row.player.full_name(),
            row.rating,
            record,
            percentage(row.stats.win_percentage(), config.display.percentage_decimals),
            row.stats.points_per_game()
        );
    }
    Ok(())
}

fn print_recent(board: &Leaderboard<InMemoryLeaderboardStore>, limit: usize) -> Result<()> {
    let matches = board.recent_matches(limit)?;
    if matches.is_empty() {
        println!("No matches recorded.");
        return Ok(());
    }

    for game in &matches {
        println!("{}", board.describe(game)?);
    }
    Ok(())
}

fn run(args: Args, config: AppConfig) -> Result<()> {
    match args.command {
        Command::Standings { history } => {
            let board = load_leaderboard(&config, &history)?;
            print_standings(&config, &board)
        }
        Command::Recent { history, limit } => {
            let board = load_leaderboard(&config, &history)?;
            print_recent(&board, limit.unwrap_or(config.display.recent_matches))
        }
        Command::CheckConfig => {
            info!("Configuration validation successful");
            println!("{}", toml::to_string_pretty(&config)?);
            Ok(())
        }
    }
}

fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Load configuration (CLI args can override environment/config file)
    let config = load_config(&args).unwrap_or_else(|e| {
        eprintln!("Configuration error: {}", e);
        std::process::exit(1);
    });

    if let Err(e) = init_logging(&config.service.log_level) {
        eprintln!("Failed to initialize logging: {}", e);
        std::process::exit(1);
    }

    info!(
        "{} v{} (K-factor {}, default rating {})",
        config.service.name,
        paddle_ladder::VERSION,
        config.rating.k_factor,
        config.rating.default_rating
    );

    if let Err(e) = run(args, config) {
        error!("{:#}", e);
        return Err(e);
    }
    Ok(())
}
