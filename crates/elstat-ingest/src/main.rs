//! elstat-ingest binary.
//!
//! Reads `elstat.toml` (or the path given with `--config`), opens the SQLite
//! store and runs one ingestion command against the live provider.

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use elstat_ingest::{IngestConfig, Orchestrator, RunReport};
use elstat_provider::ProviderClient;
use elstat_store_sqlite::SqliteStore;
use serde::Serialize;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Euroleague statistics ingestion")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "elstat.toml")]
  config: PathBuf,

  /// Print the result as JSON instead of a summary.
  #[arg(long)]
  json: bool,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand)]
enum Command {
  /// Register the configured seasons and crawl each from the first game.
  Init,
  /// Discover new seasons and fetch games added since the last run.
  Update,
  /// Fetch one game again and fill in any missing rows.
  Reingest {
    #[arg(long)]
    season: String,
    #[arg(long)]
    game:   i64,
  },
  /// Show how many games are stored for a season.
  Status {
    /// Defaults to the configured current season, then the newest one.
    #[arg(long)]
    season: Option<String>,
  },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  let config = IngestConfig::load(&cli.config)
    .with_context(|| format!("failed to load config from {:?}", cli.config))?;

  let store_path = expand_tilde(&config.store_path);
  let store = SqliteStore::open(&store_path)
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))?;
  let feed = ProviderClient::new(config.provider_settings())
    .context("failed to build provider client")?;

  let orchestrator = Orchestrator::new(store, feed, config);

  match cli.command {
    Command::Init => {
      let report = orchestrator.initialize().await.context("initialize run aborted")?;
      print_run(&report, cli.json)?;
    }
    Command::Update => {
      let report = orchestrator.update().await.context("update run aborted")?;
      print_run(&report, cli.json)?;
    }
    Command::Reingest { season, game } => {
      let report = orchestrator
        .reingest_game(&season, game)
        .await
        .with_context(|| format!("failed to reingest game {game} of {season}"))?;
      if cli.json {
        print_json(&report)?;
      } else {
        println!(
          "{season} game {game}: {} player rows, {} skipped lines",
          report.game.player_rows, report.game.skipped_lines
        );
        if let Some(points) = report.points {
          println!("  {} scoring events stored", points.stored);
        }
      }
    }
    Command::Status { season } => {
      let status = orchestrator
        .season_status(season.as_deref())
        .await
        .context("failed to resolve season")?;
      if cli.json {
        print_json(&status)?;
      } else {
        let max = status
          .max_game_code
          .map_or_else(|| "-".to_owned(), |code| code.to_string());
        println!(
          "{} ({}): {} games, highest gamecode {max}",
          status.season.code, status.season.name, status.games
        );
      }
    }
  }

  Ok(())
}

fn print_run(report: &RunReport, json: bool) -> anyhow::Result<()> {
  if json {
    return print_json(report);
  }

  for code in &report.discovered {
    println!("discovered season {code}");
  }
  for season in &report.seasons {
    println!(
      "{} [{}]: {} new, {} existing, {} fetch failures, {} process failures, last gamecode {}",
      season.season,
      season.mode,
      season.ingested,
      season.existing,
      season.fetch_failures,
      season.process_failures,
      season.last_code.map_or_else(|| "-".to_owned(), |code| code.to_string()),
    );
  }
  for failure in &report.failures {
    println!("{} [{}]: aborted: {}", failure.season, failure.mode, failure.error);
  }
  Ok(())
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
  println!("{}", serde_json::to_string_pretty(value)?);
  Ok(())
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
