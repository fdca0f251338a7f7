//! Typed views over the provider's JSON documents.
//!
//! Only the fields the ingestion pipeline reads are modelled. Collections of
//! player lines and scoring rows are kept as raw [`Value`]s and parsed one at
//! a time, so a single malformed row never poisons its siblings.

use serde::Deserialize;
use serde_json::Value;

// ─── Boxscore ────────────────────────────────────────────────────────────────

/// `GET /Boxscore` document.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Boxscore {
  /// Exactly two blocks in a well-formed game: listed team first.
  pub stats:          Vec<TeamBlock>,
  /// Running score at the end of each quarter, one row per team.
  #[serde(default)]
  pub end_of_quarter: Vec<QuarterTotals>,
}

impl Boxscore {
  pub fn from_payload(payload: &Value) -> serde_json::Result<Self> {
    Self::deserialize(payload)
  }

  /// The `Quarter4` running total for `team_name`, matched by name so the
  /// order of the rows does not matter.
  pub fn final_score(&self, team_name: &str) -> Option<i64> {
    self
      .end_of_quarter
      .iter()
      .find(|q| q.team == team_name)
      .and_then(|q| q.quarter4)
  }
}

/// One row of `EndOfQuarter`. Only the final running total is read.
#[derive(Debug, Clone, Deserialize)]
pub struct QuarterTotals {
  #[serde(rename = "Team")]
  pub team:     String,
  #[serde(rename = "Quarter4", default)]
  pub quarter4: Option<i64>,
}

/// One team's section of a box score.
#[derive(Debug, Clone, Deserialize)]
pub struct TeamBlock {
  /// Display name, e.g. `"PANATHINAIKOS AKTOR ATHENS"`.
  #[serde(rename = "Team")]
  pub team:          String,
  #[serde(rename = "PlayersStats", default)]
  pub players_stats: Vec<Value>,
}

impl TeamBlock {
  /// Parse every player line, yielding an error for each malformed one.
  pub fn player_lines(&self) -> impl Iterator<Item = serde_json::Result<PlayerLine>> + '_ {
    self.players_stats.iter().map(PlayerLine::deserialize)
  }

  /// The short team code carried by the first player line that has one.
  pub fn listed_code(&self) -> Option<String> {
    self.players_stats.iter().find_map(|line| {
      line
        .get("Team")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|code| !code.is_empty())
        .map(str::to_owned)
    })
  }
}

/// One player's row within a [`TeamBlock`].
///
/// Counters are optional because the provider sends `null` for players who
/// did not play. A line without a usable id still counts toward its team's
/// totals; see [`PlayerLine::player_code`].
#[derive(Debug, Clone, Deserialize)]
pub struct PlayerLine {
  /// `P` followed by six digits, sometimes padded with trailing spaces.
  #[serde(rename = "Player_ID", default)]
  pub player_id:              Option<String>,
  /// `"LAST, FIRST"`.
  #[serde(rename = "Player", default)]
  pub player:                 String,
  /// `"MM:SS"`, `"DNP"` or `null`; passed through untouched.
  #[serde(rename = "Minutes", default)]
  pub minutes:                Option<String>,
  #[serde(rename = "Points", default)]
  pub points:                 Option<i64>,
  #[serde(rename = "FieldGoalsMade2", default)]
  pub field_goals_made2:      Option<i64>,
  #[serde(rename = "FieldGoalsAttempted2", default)]
  pub field_goals_attempted2: Option<i64>,
  #[serde(rename = "FieldGoalsMade3", default)]
  pub field_goals_made3:      Option<i64>,
  #[serde(rename = "FieldGoalsAttempted3", default)]
  pub field_goals_attempted3: Option<i64>,
  #[serde(rename = "FreeThrowsMade", default)]
  pub free_throws_made:       Option<i64>,
  #[serde(rename = "FreeThrowsAttempted", default)]
  pub free_throws_attempted:  Option<i64>,
  #[serde(rename = "TotalRebounds", default)]
  pub total_rebounds:         Option<i64>,
  #[serde(rename = "Assistances", default)]
  pub assists:                Option<i64>,
  #[serde(rename = "Steals", default)]
  pub steals:                 Option<i64>,
  #[serde(rename = "Turnovers", default)]
  pub turnovers:              Option<i64>,
  #[serde(rename = "BlocksFavour", default)]
  pub blocks:                 Option<i64>,
  #[serde(rename = "FoulsCommited", default)]
  pub fouls:                  Option<i64>,
}

impl PlayerLine {
  /// Trimmed player id; `None` when missing or blank.
  pub fn player_code(&self) -> Option<&str> { trimmed(self.player_id.as_deref()) }
}

// ─── Points ──────────────────────────────────────────────────────────────────

/// `GET /Points` document.
#[derive(Debug, Clone, Deserialize)]
pub struct PointsFeed {
  #[serde(rename = "Rows")]
  pub rows: Vec<Value>,
}

impl PointsFeed {
  /// `None` when the document has no usable `Rows` array.
  pub fn from_payload(payload: &Value) -> Option<Self> {
    Self::deserialize(payload).ok()
  }

  pub fn scoring_rows(&self) -> impl Iterator<Item = serde_json::Result<PointsRow>> + '_ {
    self.rows.iter().map(PointsRow::deserialize)
  }
}

/// One scoring action.
///
/// The feed has shipped both `ID_PLAYER`/`ID_ACTION` and
/// `PLAYER_ID`/`SHOT_TYPE` spellings; both are accepted.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct PointsRow {
  #[serde(default)]
  pub id_player:  Option<String>,
  #[serde(default)]
  pub player_id:  Option<String>,
  #[serde(default)]
  pub team:       Option<String>,
  #[serde(default)]
  pub id_action:  Option<String>,
  #[serde(default)]
  pub shot_type:  Option<String>,
  #[serde(default)]
  pub points:     Option<i64>,
  #[serde(default)]
  pub minute:     Option<i64>,
  #[serde(default)]
  pub markertime: Option<String>,
  #[serde(default)]
  pub zone:       Option<String>,
}

impl PointsRow {
  /// Trimmed player code, whichever spelling carried it.
  pub fn player_code(&self) -> Option<&str> {
    trimmed(self.id_player.as_deref().or(self.player_id.as_deref()))
  }

  pub fn team_code(&self) -> Option<&str> { trimmed(self.team.as_deref()) }

  pub fn action(&self) -> Option<&str> {
    trimmed(self.id_action.as_deref().or(self.shot_type.as_deref()))
  }
}

fn trimmed(s: Option<&str>) -> Option<&str> {
  s.map(str::trim).filter(|s| !s.is_empty())
}
