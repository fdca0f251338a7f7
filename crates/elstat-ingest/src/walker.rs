//! Sequential gamecode walk over one season.
//!
//! The provider has no index of a season's games, so the walker tries
//! gamecodes in increasing order and treats a run of consecutive failed
//! fetches as the end of the season. Games already stored are skipped, which
//! makes walks resumable and safe to repeat.

use std::{fmt, time::Duration};

use elstat_core::{season::Season, store::EntityStore};
use elstat_provider::{Endpoint, GameFeed};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::{
  error::{IngestError, Result},
  game::GameIngestor,
  points::ScoringEventIngestor,
};

/// Where a walk starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WalkMode {
  /// From gamecode 1.
  Initialize,
  /// From the highest stored gamecode plus one.
  Update,
}

impl fmt::Display for WalkMode {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(match self {
      Self::Initialize => "initialize",
      Self::Update => "update",
    })
  }
}

/// Stopping thresholds and pacing for one walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WalkPolicy {
  /// Consecutive failed fetches that end the season.
  pub max_fetch_failures:   u32,
  /// Consecutive failed ingestions that end the season; `None` never stops.
  pub max_process_failures: Option<u32>,
  /// Pause after every game whose box score was fetched.
  pub request_delay:        Duration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
  FetchFailures,
  ProcessFailures,
}

/// Summary of one season walk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeasonReport {
  pub season:           String,
  pub mode:             WalkMode,
  pub start_code:       i64,
  /// Last gamecode looked at, `None` if the walk stopped before the first.
  pub last_code:        Option<i64>,
  /// Games this walk created.
  pub ingested:         u32,
  /// Gamecodes skipped because their game was already stored.
  pub existing:         u32,
  pub fetch_failures:   u32,
  pub process_failures: u32,
  /// Ingestions that lost a race against another writer.
  pub duplicates:       u32,
  pub scoring_events:   usize,
  pub stop_reason:      StopReason,
}

pub struct SeasonWalker<'a, S, F> {
  store:  &'a S,
  feed:   &'a F,
  policy: WalkPolicy,
}

impl<'a, S: EntityStore, F: GameFeed> SeasonWalker<'a, S, F> {
  pub fn new(store: &'a S, feed: &'a F, policy: WalkPolicy) -> Self {
    Self { store, feed, policy }
  }

  /// Walk `season` until the failure thresholds are reached.
  ///
  /// Per-game failures are logged and counted. Only store errors while
  /// checking for existing games abort the walk.
  pub async fn walk(&self, season: &Season, mode: WalkMode) -> Result<SeasonReport> {
    let start_code = match mode {
      WalkMode::Initialize => 1,
      WalkMode::Update => self
        .store
        .max_game_code(season.season_id)
        .await
        .map_err(IngestError::store)?
        .map_or(1, |max| max + 1),
    };
    info!(season = %season.code, %mode, start_code, "walking season");

    let mut report = SeasonReport {
      season: season.code.clone(),
      mode,
      start_code,
      last_code: None,
      ingested: 0,
      existing: 0,
      fetch_failures: 0,
      process_failures: 0,
      duplicates: 0,
      scoring_events: 0,
      stop_reason: StopReason::FetchFailures,
    };
    let mut fetch_streak = 0;
    let mut process_streak = 0;
    let mut game_code = start_code;

    report.stop_reason = loop {
      if fetch_streak >= self.policy.max_fetch_failures {
        break StopReason::FetchFailures;
      }
      if let Some(max) = self.policy.max_process_failures
        && process_streak >= max
      {
        break StopReason::ProcessFailures;
      }
      report.last_code = Some(game_code);

      if self
        .store
        .find_game(season.season_id, game_code)
        .await
        .map_err(IngestError::store)?
        .is_some()
      {
        debug!(season = %season.code, game_code, "game already stored, skipping");
        report.existing += 1;
        fetch_streak = 0;
        process_streak = 0;
        game_code += 1;
        continue;
      }

      let payload = match self.feed.fetch(Endpoint::Boxscore, game_code, &season.code).await {
        Ok(payload) => payload,
        Err(err) => {
          if err.is_terminal() {
            debug!(season = %season.code, game_code, "no game: {err}");
          } else {
            warn!(season = %season.code, game_code, "fetch failed: {err}");
          }
          report.fetch_failures += 1;
          fetch_streak += 1;
          game_code += 1;
          continue;
        }
      };
      fetch_streak = 0;

      match GameIngestor::new(self.store).ingest(season, game_code, &payload).await {
        Ok(game) => {
          process_streak = 0;
          if game.created {
            report.ingested += 1;
            let points = ScoringEventIngestor::new(self.store, self.feed)
              .ingest_points(&game.game, game_code, &season.code)
              .await;
            report.scoring_events += points.stored;
          } else {
            report.existing += 1;
          }
        }
        Err(err) if err.is_duplicate() => {
          warn!(season = %season.code, game_code, "game written concurrently: {err}");
          report.duplicates += 1;
          process_streak = 0;
        }
        Err(err) => {
          warn!(season = %season.code, game_code, "failed to ingest game: {err}");
          report.process_failures += 1;
          process_streak += 1;
        }
      }

      game_code += 1;
      tokio::time::sleep(self.policy.request_delay).await;
    };

    info!(
      season = %season.code,
      %mode,
      ingested = report.ingested,
      last_code = ?report.last_code,
      stop_reason = ?report.stop_reason,
      "finished season"
    );
    Ok(report)
  }
}
