//! Normalises one Boxscore document into game, team and player rows.

use chrono::Utc;
use elstat_core::{
  game::{Game, GameStatus, NewGame, NewPlayerGameStats, NewTeamGameStats, StatLine},
  roster::{NewPlayer, NewTeam, Team},
  season::Season,
  store::EntityStore,
};
use elstat_provider::payload::{Boxscore, PlayerLine, TeamBlock};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::error::{IngestError, Result};

/// Longest team-name prefix used as a code when no player line carries one.
const FALLBACK_CODE_LEN: usize = 10;

/// What a single [`GameIngestor`] call stored.
#[derive(Debug, Clone, Serialize)]
pub struct GameReport {
  pub game:          Game,
  /// `false` when the game row already existed before this call.
  pub created:       bool,
  /// Player lines resolved to a stored stat row (new or existing).
  pub player_rows:   usize,
  /// Player lines with no stat row: unparseable, or missing a player id.
  /// Lines without an id still count toward team totals.
  pub skipped_lines: usize,
}

pub struct GameIngestor<'a, S> {
  store: &'a S,
}

impl<'a, S: EntityStore> GameIngestor<'a, S> {
  pub fn new(store: &'a S) -> Self { Self { store } }

  /// Store the game described by `payload` as `game_code` of `season`.
  ///
  /// A game that already exists is returned untouched. Concurrent calls for
  /// the same game all succeed and resolve to one row.
  pub async fn ingest(
    &self,
    season: &Season,
    game_code: i64,
    payload: &Value,
  ) -> Result<GameReport> {
    if let Some(game) = self
      .store
      .find_game(season.season_id, game_code)
      .await
      .map_err(IngestError::store)?
    {
      debug!(season = %season.code, game_code, "game already stored");
      return Ok(GameReport {
        game,
        created: false,
        player_rows: 0,
        skipped_lines: 0,
      });
    }

    let boxscore = parse_boxscore(payload)?;
    let [home_block, away_block] = team_blocks(&boxscore)?;
    let home = self.resolve_team(home_block).await?;
    let away = self.resolve_team(away_block).await?;

    let upsert = self
      .store
      .ensure_game(NewGame {
        season_id:    season.season_id,
        game_code,
        home_team_id: home.team_id,
        away_team_id: away.team_id,
        home_score:   Some(boxscore.final_score(&home_block.team).unwrap_or(0)),
        away_score:   Some(boxscore.final_score(&away_block.team).unwrap_or(0)),
        status:       GameStatus::Completed,
        date:         Some(Utc::now().date_naive()),
      })
      .await
      .map_err(IngestError::store)?;

    let created = upsert.is_created();
    let game = upsert.into_inner();
    if created {
      info!(
        season = %season.code,
        game_code,
        home = %home_block.team,
        away = %away_block.team,
        "stored game"
      );
    } else {
      debug!(season = %season.code, game_code, "game stored concurrently, reusing row");
    }

    let (player_rows, skipped_lines) = self
      .store_box_score(&game, [(home_block, &home), (away_block, &away)])
      .await?;

    Ok(GameReport {
      game,
      created,
      player_rows,
      skipped_lines,
    })
  }

  /// Fill in any stat rows missing for an already stored game.
  ///
  /// Used after a crash left a game with only part of its box score. Rows
  /// that exist are left as they are.
  pub async fn repair(&self, game: Game, payload: &Value) -> Result<GameReport> {
    let boxscore = parse_boxscore(payload)?;
    let [home_block, away_block] = team_blocks(&boxscore)?;
    let home = self.resolve_team(home_block).await?;
    let away = self.resolve_team(away_block).await?;

    if home.team_id != game.home_team_id || away.team_id != game.away_team_id {
      return Err(IngestError::MalformedPayload(format!(
        "boxscore teams {} / {} do not match stored game {}",
        home.code, away.code, game.game_code
      )));
    }

    let (player_rows, skipped_lines) = self
      .store_box_score(&game, [(home_block, &home), (away_block, &away)])
      .await?;

    info!(game_code = game.game_code, player_rows, skipped_lines, "repaired game");
    Ok(GameReport {
      game,
      created: false,
      player_rows,
      skipped_lines,
    })
  }

  /// Get or create the team a block belongs to.
  async fn resolve_team(&self, block: &TeamBlock) -> Result<Team> {
    let code = block.listed_code().unwrap_or_else(|| fallback_code(&block.team));
    let upsert = self
      .store
      .ensure_team(NewTeam::new(code, block.team.clone()))
      .await
      .map_err(IngestError::store)?;

    if upsert.is_created() {
      info!(code = %upsert.get().code, name = %upsert.get().name, "created team");
    }
    Ok(upsert.into_inner())
  }

  /// Write the team totals and player lines for both teams. Returns the
  /// number of stored player rows and skipped lines.
  ///
  /// Totals are summed over every parseable line, including lines whose
  /// player id is blank.
  async fn store_box_score(
    &self,
    game: &Game,
    teams: [(&TeamBlock, &Team); 2],
  ) -> Result<(usize, usize)> {
    let mut player_rows = 0;
    let mut skipped_lines = 0;

    for (index, (block, team)) in teams.into_iter().enumerate() {
      let mut lines = Vec::with_capacity(block.players_stats.len());
      for parsed in block.player_lines() {
        match parsed {
          Ok(line) => lines.push(line),
          Err(err) => {
            skipped_lines += 1;
            warn!(game_code = game.game_code, team = %team.code, "skipping malformed player line: {err}");
          }
        }
      }

      let totals = self
        .store
        .ensure_team_game_stats(NewTeamGameStats {
          game_id: game.game_id,
          team_id: team.team_id,
          is_home: Some(index == 0),
          stats:   lines.iter().map(stat_line).sum(),
        })
        .await
        .map_err(IngestError::store)?;
      if !totals.is_created() {
        debug!(game_code = game.game_code, team = %team.code, "team totals already stored");
      }

      for line in &lines {
        let Some(code) = line.player_code() else {
          skipped_lines += 1;
          warn!(
            game_code = game.game_code,
            team = %team.code,
            player = %line.player,
            "skipping player line without an id"
          );
          continue;
        };
        self.store_player_line(game, team, code, line).await?;
        player_rows += 1;
      }
    }

    Ok((player_rows, skipped_lines))
  }

  async fn store_player_line(
    &self,
    game: &Game,
    team: &Team,
    code: &str,
    line: &PlayerLine,
  ) -> Result<()> {
    let player = self
      .store
      .ensure_player(NewPlayer::from_listing(code, &line.player))
      .await
      .map_err(IngestError::store)?;
    if player.is_created() {
      let p = player.get();
      debug!(code = %p.code, "created player {} {}", p.first_name, p.last_name);
    }

    self
      .store
      .ensure_player_game_stats(NewPlayerGameStats {
        game_id:   game.game_id,
        player_id: player.get().player_id,
        team_id:   team.team_id,
        minutes:   line.minutes.clone(),
        stats:     stat_line(line),
      })
      .await
      .map_err(IngestError::store)?;
    Ok(())
  }
}

fn parse_boxscore(payload: &Value) -> Result<Boxscore> {
  Boxscore::from_payload(payload)
    .map_err(|err| IngestError::MalformedPayload(format!("boxscore: {err}")))
}

/// The two team blocks, listed team first.
fn team_blocks(boxscore: &Boxscore) -> Result<[&TeamBlock; 2]> {
  match boxscore.stats.as_slice() {
    [home, away] => Ok([home, away]),
    other => Err(IngestError::MalformedPayload(format!(
      "expected 2 team blocks, found {}",
      other.len()
    ))),
  }
}

fn fallback_code(team_name: &str) -> String {
  team_name
    .chars()
    .take(FALLBACK_CODE_LEN)
    .collect::<String>()
    .trim()
    .to_owned()
}

/// Convert a provider line to stored counters. Missing counters are zero and
/// field goals combine two- and three-point attempts.
pub fn stat_line(line: &PlayerLine) -> StatLine {
  let n = |v: Option<i64>| v.unwrap_or(0);
  StatLine {
    points:                   n(line.points),
    field_goals_made:         n(line.field_goals_made2) + n(line.field_goals_made3),
    field_goals_attempted:    n(line.field_goals_attempted2) + n(line.field_goals_attempted3),
    three_pointers_made:      n(line.field_goals_made3),
    three_pointers_attempted: n(line.field_goals_attempted3),
    free_throws_made:         n(line.free_throws_made),
    free_throws_attempted:    n(line.free_throws_attempted),
    total_rebounds:           n(line.total_rebounds),
    assists:                  n(line.assists),
    steals:                   n(line.steals),
    blocks:                   n(line.blocks),
    turnovers:                n(line.turnovers),
    fouls:                    n(line.fouls),
  }
}
