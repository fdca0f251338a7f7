//! Games and everything recorded against them: per-team and per-player box
//! score lines, and individual scoring events.

use std::{
  fmt,
  iter::Sum,
  ops::{Add, AddAssign},
  str::FromStr,
};

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::Error;

// ─── Status ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GameStatus {
  #[default]
  Scheduled,
  Completed,
}

impl GameStatus {
  pub fn as_str(self) -> &'static str {
    match self {
      Self::Scheduled => "Scheduled",
      Self::Completed => "Completed",
    }
  }
}

impl fmt::Display for GameStatus {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for GameStatus {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "Scheduled" => Ok(Self::Scheduled),
      "Completed" => Ok(Self::Completed),
      other => Err(Error::UnknownGameStatus(other.to_owned())),
    }
  }
}

// ─── Game ────────────────────────────────────────────────────────────────────

/// One game of a season. `(season_id, game_code)` is unique.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Game {
  pub game_id:      Uuid,
  pub season_id:    Uuid,
  /// Provider gamecode; sequential within a season.
  pub game_code:    i64,
  pub home_team_id: Uuid,
  pub away_team_id: Uuid,
  pub home_score:   Option<i64>,
  pub away_score:   Option<i64>,
  pub status:       GameStatus,
  pub date:         Option<NaiveDate>,
  pub created_at:   DateTime<Utc>,
}

/// Input to [`crate::store::EntityStore::ensure_game`].
#[derive(Debug, Clone)]
pub struct NewGame {
  pub season_id:    Uuid,
  pub game_code:    i64,
  pub home_team_id: Uuid,
  pub away_team_id: Uuid,
  pub home_score:   Option<i64>,
  pub away_score:   Option<i64>,
  pub status:       GameStatus,
  pub date:         Option<NaiveDate>,
}

// ─── Box score counters ──────────────────────────────────────────────────────

/// The counting stats shared by team and player box score rows.
///
/// Field goals include both two- and three-point attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StatLine {
  pub points:                   i64,
  pub field_goals_made:         i64,
  pub field_goals_attempted:    i64,
  pub three_pointers_made:      i64,
  pub three_pointers_attempted: i64,
  pub free_throws_made:         i64,
  pub free_throws_attempted:    i64,
  pub total_rebounds:           i64,
  pub assists:                  i64,
  pub steals:                   i64,
  pub blocks:                   i64,
  pub turnovers:                i64,
  pub fouls:                    i64,
}

impl Add for StatLine {
  type Output = Self;

  fn add(mut self, rhs: Self) -> Self {
    self += rhs;
    self
  }
}

impl AddAssign for StatLine {
  fn add_assign(&mut self, rhs: Self) {
    self.points += rhs.points;
    self.field_goals_made += rhs.field_goals_made;
    self.field_goals_attempted += rhs.field_goals_attempted;
    self.three_pointers_made += rhs.three_pointers_made;
    self.three_pointers_attempted += rhs.three_pointers_attempted;
    self.free_throws_made += rhs.free_throws_made;
    self.free_throws_attempted += rhs.free_throws_attempted;
    self.total_rebounds += rhs.total_rebounds;
    self.assists += rhs.assists;
    self.steals += rhs.steals;
    self.blocks += rhs.blocks;
    self.turnovers += rhs.turnovers;
    self.fouls += rhs.fouls;
  }
}

impl Sum for StatLine {
  fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
    iter.fold(Self::default(), Add::add)
  }
}

impl<'a> Sum<&'a StatLine> for StatLine {
  fn sum<I: Iterator<Item = &'a Self>>(iter: I) -> Self {
    iter.copied().sum()
  }
}

// ─── Team / player rows ──────────────────────────────────────────────────────

/// Aggregated totals for one team in one game. `(game_id, team_id)` is unique.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamGameStats {
  pub team_game_stats_id: Uuid,
  pub game_id:            Uuid,
  pub team_id:            Uuid,
  pub is_home:            Option<bool>,
  pub stats:              StatLine,
}

#[derive(Debug, Clone)]
pub struct NewTeamGameStats {
  pub game_id: Uuid,
  pub team_id: Uuid,
  pub is_home: Option<bool>,
  pub stats:   StatLine,
}

/// One player's box score line. `(game_id, player_id, team_id)` is unique.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerGameStats {
  pub player_game_stats_id: Uuid,
  pub game_id:              Uuid,
  pub player_id:            Uuid,
  pub team_id:              Uuid,
  /// Raw provider value: `"MM:SS"`, `"DNP"`, or absent. Never parsed here.
  pub minutes:              Option<String>,
  pub stats:                StatLine,
}

#[derive(Debug, Clone)]
pub struct NewPlayerGameStats {
  pub game_id:   Uuid,
  pub player_id: Uuid,
  pub team_id:   Uuid,
  pub minutes:   Option<String>,
  pub stats:     StatLine,
}

// ─── Scoring events ──────────────────────────────────────────────────────────

/// A single scoring action from the points feed.
///
/// There is no uniqueness constraint; duplicates are avoided by the ingestion
/// run only loading events for games it created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoringEvent {
  pub scoring_event_id: Uuid,
  pub game_id:          Uuid,
  pub team_id:          Uuid,
  pub player_id:        Uuid,
  pub minute:           Option<i64>,
  pub time_remaining:   Option<String>,
  pub points_scored:    Option<i64>,
  pub shot_type:        Option<String>,
  pub zone:             Option<String>,
  pub is_made:          Option<bool>,
  pub created_at:       DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewScoringEvent {
  pub game_id:        Uuid,
  pub team_id:        Uuid,
  pub player_id:      Uuid,
  pub minute:         Option<i64>,
  pub time_remaining: Option<String>,
  pub points_scored:  Option<i64>,
  pub shot_type:      Option<String>,
  pub zone:           Option<String>,
  pub is_made:        Option<bool>,
}

#[cfg(test)]
mod tests {
  use super::*;

  fn line(points: i64, rebounds: i64) -> StatLine {
    StatLine {
      points,
      total_rebounds: rebounds,
      ..Default::default()
    }
  }

  #[test]
  fn stat_lines_sum_field_by_field() {
    let lines = [line(10, 3), line(7, 0), line(0, 9)];
    let total: StatLine = lines.iter().sum();
    assert_eq!(total.points, 17);
    assert_eq!(total.total_rebounds, 12);
    assert_eq!(total.assists, 0);
  }

  #[test]
  fn empty_sum_is_zero() {
    let total: StatLine = std::iter::empty::<StatLine>().sum();
    assert_eq!(total, StatLine::default());
  }

  #[test]
  fn status_round_trips_through_text() {
    assert_eq!("Completed".parse::<GameStatus>().unwrap(), GameStatus::Completed);
    assert_eq!(GameStatus::Scheduled.to_string(), "Scheduled");
    assert!("Postponed".parse::<GameStatus>().is_err());
  }
}
