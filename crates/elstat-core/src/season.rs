//! Seasons: the top-level grouping for games.
//!
//! A season is created once, the first time its provider code is seen, and is
//! never updated or deleted afterwards.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A competition season as registered in the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Season {
  pub season_id:  Uuid,
  /// Provider season code, e.g. `"E2025"`. Unique.
  pub code:       String,
  /// Display name derived from the code, e.g. `"2025-26 Season"`.
  pub name:       String,
  pub created_at: DateTime<Utc>,
}

/// Input to [`crate::store::EntityStore::ensure_season`].
#[derive(Debug, Clone)]
pub struct NewSeason {
  pub code: String,
  pub name: String,
}

impl NewSeason {
  /// Build a season whose display name is derived from `code`.
  pub fn from_code(code: impl Into<String>) -> Self {
    let code = code.into();
    let name = season_name(&code);
    Self { code, name }
  }
}

/// Derive the human-readable name for a season code.
///
/// The first run of ASCII digits in the code is read as the starting year;
/// `"E2023"` becomes `"2023-24 Season"`. Codes without digits are returned
/// verbatim.
pub fn season_name(code: &str) -> String {
  let digits: String = code
    .chars()
    .skip_while(|c| !c.is_ascii_digit())
    .take_while(char::is_ascii_digit)
    .collect();

  match digits.parse::<u64>() {
    Ok(year) => format!("{year}-{:02} Season", (year % 100 + 1) % 100),
    Err(_) => code.to_owned(),
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn name_from_euroleague_codes() {
    assert_eq!(season_name("E2023"), "2023-24 Season");
    assert_eq!(season_name("E2030"), "2030-31 Season");
  }

  #[test]
  fn name_wraps_century() {
    assert_eq!(season_name("E2099"), "2099-00 Season");
    assert_eq!(season_name("U2008"), "2008-09 Season");
  }

  #[test]
  fn name_without_digits_is_verbatim() {
    assert_eq!(season_name("PRESEASON"), "PRESEASON");
    assert_eq!(season_name(""), "");
  }

  #[test]
  fn new_season_derives_name() {
    let s = NewSeason::from_code("E2025");
    assert_eq!(s.code, "E2025");
    assert_eq!(s.name, "2025-26 Season");
  }
}
