//! Scoring events from the Points feed.
//!
//! The feed is supplementary: nothing here fails the surrounding game.

use elstat_core::{
  game::{Game, NewScoringEvent},
  store::{EntityStore, StoreError},
};
use elstat_provider::{
  Endpoint, GameFeed,
  payload::{PointsFeed, PointsRow},
};
use serde::Serialize;
use tracing::{debug, warn};

/// Outcome of one [`ScoringEventIngestor::ingest_points`] call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PointsReport {
  /// `false` when the feed could not be fetched or had no rows array.
  pub available: bool,
  pub stored:    usize,
  /// Rows that were malformed or named an unknown player or team.
  pub skipped:   usize,
  /// Rows the store refused for a reason other than a duplicate.
  pub failed:    usize,
}

pub struct ScoringEventIngestor<'a, S, F> {
  store: &'a S,
  feed:  &'a F,
}

enum RowOutcome {
  Stored,
  Skipped,
  Failed,
}

impl<'a, S: EntityStore, F: GameFeed> ScoringEventIngestor<'a, S, F> {
  pub fn new(store: &'a S, feed: &'a F) -> Self { Self { store, feed } }

  /// Fetch the Points document for `game` and append one scoring event per
  /// usable row.
  pub async fn ingest_points(&self, game: &Game, game_code: i64, season_code: &str) -> PointsReport {
    let mut report = PointsReport::default();

    let feed = match self.feed.fetch(Endpoint::Points, game_code, season_code).await {
      Ok(payload) => PointsFeed::from_payload(&payload),
      Err(err) => {
        warn!(season = season_code, game_code, "no points data: {err}");
        return report;
      }
    };
    let Some(feed) = feed else {
      warn!(season = season_code, game_code, "points payload has no rows");
      return report;
    };
    report.available = true;

    for parsed in feed.scoring_rows() {
      let outcome = match parsed {
        Ok(row) => self.store_row(game, &row).await,
        Err(err) => {
          warn!(game_code, "skipping malformed points row: {err}");
          RowOutcome::Skipped
        }
      };
      match outcome {
        RowOutcome::Stored => report.stored += 1,
        RowOutcome::Skipped => report.skipped += 1,
        RowOutcome::Failed => report.failed += 1,
      }
    }

    debug!(
      game_code,
      stored = report.stored,
      skipped = report.skipped,
      failed = report.failed,
      "stored scoring events"
    );
    report
  }

  async fn store_row(&self, game: &Game, row: &PointsRow) -> RowOutcome {
    let (Some(player_code), Some(team_code)) = (row.player_code(), row.team_code()) else {
      return RowOutcome::Skipped;
    };

    let player = match self.store.find_player(player_code).await {
      Ok(Some(player)) => player,
      Ok(None) => return RowOutcome::Skipped,
      Err(err) => {
        warn!(game_code = game.game_code, player_code, "player lookup failed: {err}");
        return RowOutcome::Failed;
      }
    };
    let team = match self.store.find_team(team_code).await {
      Ok(Some(team)) => team,
      Ok(None) => return RowOutcome::Skipped,
      Err(err) => {
        warn!(game_code = game.game_code, team_code, "team lookup failed: {err}");
        return RowOutcome::Failed;
      }
    };

    let points = row.points.unwrap_or(0);
    let event = NewScoringEvent {
      game_id:        game.game_id,
      team_id:        team.team_id,
      player_id:      player.player_id,
      minute:         row.minute,
      time_remaining: row.markertime.as_deref().map(str::trim).map(str::to_owned),
      points_scored:  Some(points),
      shot_type:      row.action().map(str::to_owned),
      zone:           row.zone.as_deref().map(str::trim).map(str::to_owned),
      is_made:        Some(points > 0),
    };

    match self.store.insert_scoring_event(event).await {
      Ok(_) => RowOutcome::Stored,
      Err(err) if err.is_constraint_violation() => {
        debug!(game_code = game.game_code, player_code, "scoring event already stored");
        RowOutcome::Skipped
      }
      Err(err) => {
        warn!(game_code = game.game_code, "failed to store scoring event: {err}");
        RowOutcome::Failed
      }
    }
  }
}
