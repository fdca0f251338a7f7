//! Encoding and decoding helpers between domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as fixed-width RFC 3339 strings (microsecond
//! precision, `Z` suffix) so they sort lexically. Calendar dates are ISO 8601.
//! UUIDs are stored as hyphenated lowercase strings.

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use elstat_core::{
  game::{Game, GameStatus, PlayerGameStats, StatLine, TeamGameStats},
  roster::{Player, Team},
  season::Season,
};
use rusqlite::Row;
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ─────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc> / NaiveDate ───────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

pub fn encode_date(d: NaiveDate) -> String { d.format("%Y-%m-%d").to_string() }

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, "%Y-%m-%d")
    .map_err(|e| Error::DateParse(format!("{s:?}: {e}")))
}

// ─── GameStatus ──────────────────────────────────────────────────────────────

pub fn encode_status(s: GameStatus) -> &'static str { s.as_str() }

pub fn decode_status(s: &str) -> Result<GameStatus> { Ok(s.parse()?) }

// ─── StatLine ────────────────────────────────────────────────────────────────

/// Column list shared by both box score tables, in [`stat_values`] order.
pub const STAT_COLUMNS: &str = "points, field_goals_made, field_goals_attempted,
   three_pointers_made, three_pointers_attempted, free_throws_made,
   free_throws_attempted, total_rebounds, assists, steals, blocks, turnovers,
   fouls";

pub fn stat_values(s: &StatLine) -> [i64; 13] {
  [
    s.points,
    s.field_goals_made,
    s.field_goals_attempted,
    s.three_pointers_made,
    s.three_pointers_attempted,
    s.free_throws_made,
    s.free_throws_attempted,
    s.total_rebounds,
    s.assists,
    s.steals,
    s.blocks,
    s.turnovers,
    s.fouls,
  ]
}

/// Read the thirteen [`STAT_COLUMNS`] starting at column `at`.
fn read_stats(row: &Row<'_>, at: usize) -> rusqlite::Result<StatLine> {
  Ok(StatLine {
    points:                   row.get(at)?,
    field_goals_made:         row.get(at + 1)?,
    field_goals_attempted:    row.get(at + 2)?,
    three_pointers_made:      row.get(at + 3)?,
    three_pointers_attempted: row.get(at + 4)?,
    free_throws_made:         row.get(at + 5)?,
    free_throws_attempted:    row.get(at + 6)?,
    total_rebounds:           row.get(at + 7)?,
    assists:                  row.get(at + 8)?,
    steals:                   row.get(at + 9)?,
    blocks:                   row.get(at + 10)?,
    turnovers:                row.get(at + 11)?,
    fouls:                    row.get(at + 12)?,
  })
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw values read directly from a `seasons` row.
pub struct RawSeason {
  pub season_id:  String,
  pub code:       String,
  pub name:       String,
  pub created_at: String,
}

impl RawSeason {
  pub const COLUMNS: &'static str = "season_id, code, name, created_at";

  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      season_id:  row.get(0)?,
      code:       row.get(1)?,
      name:       row.get(2)?,
      created_at: row.get(3)?,
    })
  }

  pub fn into_season(self) -> Result<Season> {
    Ok(Season {
      season_id:  decode_uuid(&self.season_id)?,
      code:       self.code,
      name:       self.name,
      created_at: decode_dt(&self.created_at)?,
    })
  }
}

pub struct RawTeam {
  pub team_id:    String,
  pub code:       String,
  pub name:       String,
  pub city:       Option<String>,
  pub country:    Option<String>,
  pub created_at: String,
}

impl RawTeam {
  pub const COLUMNS: &'static str = "team_id, code, name, city, country, created_at";

  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      team_id:    row.get(0)?,
      code:       row.get(1)?,
      name:       row.get(2)?,
      city:       row.get(3)?,
      country:    row.get(4)?,
      created_at: row.get(5)?,
    })
  }

  pub fn into_team(self) -> Result<Team> {
    Ok(Team {
      team_id:    decode_uuid(&self.team_id)?,
      code:       self.code,
      name:       self.name,
      city:       self.city,
      country:    self.country,
      created_at: decode_dt(&self.created_at)?,
    })
  }
}

pub struct RawPlayer {
  pub player_id:  String,
  pub code:       String,
  pub first_name: String,
  pub last_name:  String,
  pub position:   Option<String>,
  pub created_at: String,
}

impl RawPlayer {
  pub const COLUMNS: &'static str =
    "player_id, code, first_name, last_name, position, created_at";

  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      player_id:  row.get(0)?,
      code:       row.get(1)?,
      first_name: row.get(2)?,
      last_name:  row.get(3)?,
      position:   row.get(4)?,
      created_at: row.get(5)?,
    })
  }

  pub fn into_player(self) -> Result<Player> {
    Ok(Player {
      player_id:  decode_uuid(&self.player_id)?,
      code:       self.code,
      first_name: self.first_name,
      last_name:  self.last_name,
      position:   self.position,
      created_at: decode_dt(&self.created_at)?,
    })
  }
}

pub struct RawGame {
  pub game_id:      String,
  pub season_id:    String,
  pub game_code:    i64,
  pub home_team_id: String,
  pub away_team_id: String,
  pub home_score:   Option<i64>,
  pub away_score:   Option<i64>,
  pub status:       String,
  pub date:         Option<String>,
  pub created_at:   String,
}

impl RawGame {
  pub const COLUMNS: &'static str = "game_id, season_id, game_code, home_team_id,
     away_team_id, home_score, away_score, status, date, created_at";

  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      game_id:      row.get(0)?,
      season_id:    row.get(1)?,
      game_code:    row.get(2)?,
      home_team_id: row.get(3)?,
      away_team_id: row.get(4)?,
      home_score:   row.get(5)?,
      away_score:   row.get(6)?,
      status:       row.get(7)?,
      date:         row.get(8)?,
      created_at:   row.get(9)?,
    })
  }

  pub fn into_game(self) -> Result<Game> {
    Ok(Game {
      game_id:      decode_uuid(&self.game_id)?,
      season_id:    decode_uuid(&self.season_id)?,
      game_code:    self.game_code,
      home_team_id: decode_uuid(&self.home_team_id)?,
      away_team_id: decode_uuid(&self.away_team_id)?,
      home_score:   self.home_score,
      away_score:   self.away_score,
      status:       decode_status(&self.status)?,
      date:         self.date.as_deref().map(decode_date).transpose()?,
      created_at:   decode_dt(&self.created_at)?,
    })
  }
}

pub struct RawTeamGameStats {
  pub team_game_stats_id: String,
  pub game_id:            String,
  pub team_id:            String,
  pub is_home:            Option<bool>,
  pub stats:              StatLine,
}

impl RawTeamGameStats {
  pub fn columns() -> String {
    format!("team_game_stats_id, game_id, team_id, is_home, {STAT_COLUMNS}")
  }

  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      team_game_stats_id: row.get(0)?,
      game_id:            row.get(1)?,
      team_id:            row.get(2)?,
      is_home:            row.get(3)?,
      stats:              read_stats(row, 4)?,
    })
  }

  pub fn into_stats(self) -> Result<TeamGameStats> {
    Ok(TeamGameStats {
      team_game_stats_id: decode_uuid(&self.team_game_stats_id)?,
      game_id:            decode_uuid(&self.game_id)?,
      team_id:            decode_uuid(&self.team_id)?,
      is_home:            self.is_home,
      stats:              self.stats,
    })
  }
}

pub struct RawPlayerGameStats {
  pub player_game_stats_id: String,
  pub game_id:              String,
  pub player_id:            String,
  pub team_id:              String,
  pub minutes:              Option<String>,
  pub stats:                StatLine,
}

impl RawPlayerGameStats {
  pub fn columns() -> String {
    format!(
      "player_game_stats_id, game_id, player_id, team_id, minutes, {STAT_COLUMNS}"
    )
  }

  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      player_game_stats_id: row.get(0)?,
      game_id:              row.get(1)?,
      player_id:            row.get(2)?,
      team_id:              row.get(3)?,
      minutes:              row.get(4)?,
      stats:                read_stats(row, 5)?,
    })
  }

  pub fn into_stats(self) -> Result<PlayerGameStats> {
    Ok(PlayerGameStats {
      player_game_stats_id: decode_uuid(&self.player_game_stats_id)?,
      game_id:              decode_uuid(&self.game_id)?,
      player_id:            decode_uuid(&self.player_id)?,
      team_id:              decode_uuid(&self.team_id)?,
      minutes:              self.minutes,
      stats:                self.stats,
    })
  }
}
