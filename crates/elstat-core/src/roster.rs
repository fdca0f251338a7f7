//! Teams and players, created lazily the first time a game payload mentions
//! them, and resolved by their provider code ever after.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ─── Team ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
  pub team_id:    Uuid,
  /// Stable identity key (e.g. `"PAN"`); the row id is not.
  pub code:       String,
  pub name:       String,
  pub city:       Option<String>,
  pub country:    Option<String>,
  pub created_at: DateTime<Utc>,
}

/// Input to [`crate::store::EntityStore::ensure_team`].
#[derive(Debug, Clone)]
pub struct NewTeam {
  pub code:    String,
  pub name:    String,
  pub city:    Option<String>,
  pub country: Option<String>,
}

impl NewTeam {
  pub fn new(code: impl Into<String>, name: impl Into<String>) -> Self {
    Self {
      code:    code.into(),
      name:    name.into(),
      city:    None,
      country: None,
    }
  }
}

// ─── Player ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
  pub player_id:  Uuid,
  /// Provider player id with surrounding whitespace removed (`"P003733"`).
  pub code:       String,
  pub first_name: String,
  pub last_name:  String,
  pub position:   Option<String>,
  pub created_at: DateTime<Utc>,
}

/// Input to [`crate::store::EntityStore::ensure_player`].
#[derive(Debug, Clone)]
pub struct NewPlayer {
  pub code:       String,
  pub first_name: String,
  pub last_name:  String,
  pub position:   Option<String>,
}

impl NewPlayer {
  /// Build a player from a provider id and a `"LAST, FIRST"` display name.
  ///
  /// The id is trimmed. The name is split on its first comma; when there is
  /// no comma both name parts carry the whole string.
  pub fn from_listing(code: &str, listed_name: &str) -> Self {
    let (last_name, first_name) = match listed_name.split_once(',') {
      Some((last, first)) if !first.trim().is_empty() => {
        (last.trim().to_owned(), first.trim().to_owned())
      }
      Some((last, _)) => (last.trim().to_owned(), listed_name.trim().to_owned()),
      None => (listed_name.trim().to_owned(), listed_name.trim().to_owned()),
    };

    Self {
      code: code.trim().to_owned(),
      first_name,
      last_name,
      position: None,
    }
  }
}
