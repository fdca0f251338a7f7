//! The `EntityStore` trait and supporting types.
//!
//! The trait is implemented by storage backends (e.g. `elstat-store-sqlite`).
//! The ingestion pipeline depends on this abstraction, not on any concrete
//! backend.

use std::future::Future;

use uuid::Uuid;

use crate::{
  game::{
    Game, NewGame, NewPlayerGameStats, NewScoringEvent, NewTeamGameStats,
    PlayerGameStats, ScoringEvent, TeamGameStats,
  },
  roster::{NewPlayer, NewTeam, Player, Team},
  season::{NewSeason, Season},
};

// ─── Upsert ──────────────────────────────────────────────────────────────────

/// Outcome of an insert-if-absent write.
///
/// `Existing` carries the row that already occupied the unique key; the
/// caller's input was discarded, never merged into it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Upsert<T> {
  Created(T),
  Existing(T),
}

impl<T> Upsert<T> {
  pub fn is_created(&self) -> bool { matches!(self, Self::Created(_)) }

  pub fn get(&self) -> &T {
    match self {
      Self::Created(t) | Self::Existing(t) => t,
    }
  }

  pub fn into_inner(self) -> T {
    match self {
      Self::Created(t) | Self::Existing(t) => t,
    }
  }
}

// ─── Errors ──────────────────────────────────────────────────────────────────

/// Error bound for [`EntityStore`] backends.
///
/// Backends must recognise unique-constraint violations themselves so callers
/// never have to inspect error messages.
pub trait StoreError: std::error::Error + Send + Sync + 'static {
  /// `true` when a write was rejected because the row already exists.
  fn is_constraint_violation(&self) -> bool;
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over the relational store the ingestion pipeline writes into.
///
/// Every `ensure_*` method is atomic insert-if-absent: concurrent callers with
/// the same key all observe the same row and none of them gets an error.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes.
pub trait EntityStore: Send + Sync {
  type Error: StoreError;

  // ── Seasons ───────────────────────────────────────────────────────────

  fn ensure_season(
    &self,
    input: NewSeason,
  ) -> impl Future<Output = Result<Upsert<Season>, Self::Error>> + Send + '_;

  /// Look a season up by its provider code.
  fn get_season<'a>(
    &'a self,
    code: &'a str,
  ) -> impl Future<Output = Result<Option<Season>, Self::Error>> + Send + 'a;

  /// The most recently registered season, if any.
  fn latest_season(
    &self,
  ) -> impl Future<Output = Result<Option<Season>, Self::Error>> + Send + '_;

  /// All seasons in registration order.
  fn list_seasons(
    &self,
  ) -> impl Future<Output = Result<Vec<Season>, Self::Error>> + Send + '_;

  // ── Teams and players ─────────────────────────────────────────────────

  fn ensure_team(
    &self,
    input: NewTeam,
  ) -> impl Future<Output = Result<Upsert<Team>, Self::Error>> + Send + '_;

  fn find_team<'a>(
    &'a self,
    code: &'a str,
  ) -> impl Future<Output = Result<Option<Team>, Self::Error>> + Send + 'a;

  fn ensure_player(
    &self,
    input: NewPlayer,
  ) -> impl Future<Output = Result<Upsert<Player>, Self::Error>> + Send + '_;

  fn find_player<'a>(
    &'a self,
    code: &'a str,
  ) -> impl Future<Output = Result<Option<Player>, Self::Error>> + Send + 'a;

  // ── Games ─────────────────────────────────────────────────────────────

  fn ensure_game(
    &self,
    input: NewGame,
  ) -> impl Future<Output = Result<Upsert<Game>, Self::Error>> + Send + '_;

  fn find_game(
    &self,
    season_id: Uuid,
    game_code: i64,
  ) -> impl Future<Output = Result<Option<Game>, Self::Error>> + Send + '_;

  /// Highest gamecode stored for the season, or `None` if it has no games.
  fn max_game_code(
    &self,
    season_id: Uuid,
  ) -> impl Future<Output = Result<Option<i64>, Self::Error>> + Send + '_;

  /// All games of a season ordered by gamecode.
  fn list_games(
    &self,
    season_id: Uuid,
  ) -> impl Future<Output = Result<Vec<Game>, Self::Error>> + Send + '_;

  // ── Box scores ────────────────────────────────────────────────────────

  fn ensure_team_game_stats(
    &self,
    input: NewTeamGameStats,
  ) -> impl Future<Output = Result<Upsert<TeamGameStats>, Self::Error>> + Send + '_;

  fn ensure_player_game_stats(
    &self,
    input: NewPlayerGameStats,
  ) -> impl Future<Output = Result<Upsert<PlayerGameStats>, Self::Error>> + Send + '_;

  fn list_team_game_stats(
    &self,
    game_id: Uuid,
  ) -> impl Future<Output = Result<Vec<TeamGameStats>, Self::Error>> + Send + '_;

  fn list_player_game_stats(
    &self,
    game_id: Uuid,
  ) -> impl Future<Output = Result<Vec<PlayerGameStats>, Self::Error>> + Send + '_;

  // ── Scoring events ────────────────────────────────────────────────────

  /// Plain append; there is no uniqueness key for scoring events.
  fn insert_scoring_event(
    &self,
    input: NewScoringEvent,
  ) -> impl Future<Output = Result<ScoringEvent, Self::Error>> + Send + '_;

  fn count_scoring_events(
    &self,
    game_id: Uuid,
  ) -> impl Future<Output = Result<u64, Self::Error>> + Send + '_;
}
