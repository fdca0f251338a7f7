//! Top-level ingestion runs.
//!
//! Seasons are processed one at a time in list order. A failure inside one
//! season is recorded in the [`RunReport`] and the run moves on; only season
//! registration and resolution errors abort the run.

use elstat_core::{season::Season, store::EntityStore};
use elstat_provider::{Endpoint, GameFeed};
use serde::Serialize;
use tracing::{error, info};

use crate::{
  config::IngestConfig,
  error::{IngestError, Result},
  game::{GameIngestor, GameReport},
  points::{PointsReport, ScoringEventIngestor},
  registry::SeasonRegistry,
  walker::{SeasonReport, SeasonWalker, WalkMode},
};

/// A season whose walk was aborted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeasonFailure {
  pub season: String,
  pub mode:   WalkMode,
  pub error:  String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunReport {
  /// Codes of seasons first registered by this run's discovery probe.
  pub discovered: Vec<String>,
  pub seasons:    Vec<SeasonReport>,
  pub failures:   Vec<SeasonFailure>,
}

impl RunReport {
  pub fn games_ingested(&self) -> u32 { self.seasons.iter().map(|s| s.ingested).sum() }
}

#[derive(Debug, Clone, Serialize)]
pub struct ReingestReport {
  pub game:   GameReport,
  /// `None` when the game already had scoring events.
  pub points: Option<PointsReport>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SeasonStatus {
  pub season:        Season,
  pub games:         usize,
  pub max_game_code: Option<i64>,
}

/// Owns the store, the provider feed and the run configuration.
pub struct Orchestrator<S, F> {
  store:  S,
  feed:   F,
  config: IngestConfig,
}

impl<S: EntityStore, F: GameFeed> Orchestrator<S, F> {
  pub fn new(store: S, feed: F, config: IngestConfig) -> Self {
    Self { store, feed, config }
  }

  pub fn store(&self) -> &S { &self.store }

  pub fn feed(&self) -> &F { &self.feed }

  pub fn registry(&self) -> SeasonRegistry<'_, S, F> {
    SeasonRegistry::new(&self.store, &self.feed, self.config.current_season.as_deref())
  }

  /// Register every configured season and walk each from gamecode 1.
  pub async fn initialize(&self) -> Result<RunReport> {
    info!(seasons = self.config.seasons.len(), "starting initialize run");
    let registry = self.registry();

    let mut seasons = Vec::with_capacity(self.config.seasons.len());
    for code in &self.config.seasons {
      seasons.push(registry.ensure_season(code).await?);
    }

    let mut report = RunReport::default();
    for season in &seasons {
      self.walk_into(&mut report, season, WalkMode::Initialize).await;
    }

    info!(
      games = report.games_ingested(),
      failures = report.failures.len(),
      "initialize run finished"
    );
    Ok(report)
  }

  /// Pick up newly opened seasons, then continue every known season from its
  /// highest stored gamecode.
  pub async fn update(&self) -> Result<RunReport> {
    info!("starting update run");
    let discovered = self
      .registry()
      .discover_candidate_seasons(&self.config.candidate_seasons)
      .await?;

    let mut report = RunReport::default();
    for season in &discovered {
      report.discovered.push(season.code.clone());
      self.walk_into(&mut report, season, WalkMode::Initialize).await;
    }

    let seasons = self.store.list_seasons().await.map_err(IngestError::store)?;
    for season in &seasons {
      self.walk_into(&mut report, season, WalkMode::Update).await;
    }

    info!(
      discovered = report.discovered.len(),
      games = report.games_ingested(),
      failures = report.failures.len(),
      "update run finished"
    );
    Ok(report)
  }

  /// Fetch one game again and fill in whatever rows it is missing.
  ///
  /// Scoring events are only loaded when the game has none, since they carry
  /// no uniqueness key.
  pub async fn reingest_game(&self, season_code: &str, game_code: i64) -> Result<ReingestReport> {
    let season = self.registry().resolve_season(Some(season_code)).await?;
    let payload = self
      .feed
      .fetch(Endpoint::Boxscore, game_code, &season.code)
      .await?;

    let ingestor = GameIngestor::new(&self.store);
    let existing = self
      .store
      .find_game(season.season_id, game_code)
      .await
      .map_err(IngestError::store)?;
    let game = match existing {
      Some(game) => ingestor.repair(game, &payload).await?,
      None => ingestor.ingest(&season, game_code, &payload).await?,
    };

    let events = self
      .store
      .count_scoring_events(game.game.game_id)
      .await
      .map_err(IngestError::store)?;
    let points = if events == 0 {
      Some(
        ScoringEventIngestor::new(&self.store, &self.feed)
          .ingest_points(&game.game, game_code, &season.code)
          .await,
      )
    } else {
      None
    };

    Ok(ReingestReport { game, points })
  }

  /// Stored game count and highest gamecode for a season.
  pub async fn season_status(&self, season_code: Option<&str>) -> Result<SeasonStatus> {
    let season = self.registry().resolve_season(season_code).await?;
    let games = self
      .store
      .list_games(season.season_id)
      .await
      .map_err(IngestError::store)?;

    Ok(SeasonStatus {
      max_game_code: games.iter().map(|g| g.game_code).max(),
      games: games.len(),
      season,
    })
  }

  async fn walk_into(&self, report: &mut RunReport, season: &Season, mode: WalkMode) {
    let walker = SeasonWalker::new(&self.store, &self.feed, self.config.walk_policy(mode));
    match walker.walk(season, mode).await {
      Ok(season_report) => report.seasons.push(season_report),
      Err(err) => {
        error!(season = %season.code, %mode, "season walk aborted: {err}");
        report.failures.push(SeasonFailure {
          season: season.code.clone(),
          mode,
          error: err.to_string(),
        });
      }
    }
  }
}
