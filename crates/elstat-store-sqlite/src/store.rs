//! [`SqliteStore`]: the SQLite implementation of [`EntityStore`].

use std::path::Path;

use chrono::Utc;
use rusqlite::{OptionalExtension as _, Row};
use uuid::Uuid;

use elstat_core::{
  game::{
    Game, NewGame, NewPlayerGameStats, NewScoringEvent, NewTeamGameStats,
    PlayerGameStats, ScoringEvent, TeamGameStats,
  },
  roster::{NewPlayer, NewTeam, Player, Team},
  season::{NewSeason, Season},
  store::{EntityStore, Upsert},
};

use crate::{
  Result,
  encode::{
    RawGame, RawPlayer, RawPlayerGameStats, RawSeason, RawTeam,
    RawTeamGameStats, STAT_COLUMNS, encode_date, encode_dt, encode_status,
    encode_uuid, stat_values,
  },
  schema::SCHEMA,
};

fn upsert<T>(created: bool, value: T) -> Upsert<T> {
  if created { Upsert::Created(value) } else { Upsert::Existing(value) }
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// A statistics store backed by a single SQLite file.
///
/// Cloning is cheap: the inner connection is reference-counted. All clones
/// share one connection thread, so every `call` closure runs atomically with
/// respect to the others.
#[derive(Clone)]
pub struct SqliteStore {
  pub(crate) conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, mostly for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    tracing::debug!("schema initialised");
    Ok(())
  }

  /// Run a single-parameter query and collect every mapped row.
  async fn query_all<T, F>(&self, sql: String, key: String, map: F) -> Result<Vec<T>>
  where
    T: Send + 'static,
    F: Fn(&Row<'_>) -> rusqlite::Result<T> + Send + 'static,
  {
    let rows = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map([&key], |row| map(row))?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(rows)
  }

  /// Run a single-parameter query expected to match at most one row.
  async fn query_opt<T, F>(&self, sql: String, key: String, map: F) -> Result<Option<T>>
  where
    T: Send + 'static,
    F: FnOnce(&Row<'_>) -> rusqlite::Result<T> + Send + 'static,
  {
    let row = self
      .conn
      .call(move |conn| Ok(conn.query_row(&sql, [&key], map).optional()?))
      .await?;
    Ok(row)
  }
}

// ─── EntityStore impl ────────────────────────────────────────────────────────

impl EntityStore for SqliteStore {
  type Error = crate::Error;

  // ── Seasons ───────────────────────────────────────────────────────────────

  async fn ensure_season(&self, input: NewSeason) -> Result<Upsert<Season>> {
    let id_str = encode_uuid(Uuid::new_v4());
    let at_str = encode_dt(Utc::now());
    let select = format!("SELECT {} FROM seasons WHERE code = ?1", RawSeason::COLUMNS);

    let (created, raw) = self
      .conn
      .call(move |conn| {
        let inserted = conn.execute(
          "INSERT INTO seasons (season_id, code, name, created_at)
           VALUES (?1, ?2, ?3, ?4)
           ON CONFLICT (code) DO NOTHING",
          rusqlite::params![id_str, input.code, input.name, at_str],
        )?;
        let raw = conn.query_row(&select, [&input.code], RawSeason::from_row)?;
        Ok((inserted > 0, raw))
      })
      .await?;

    Ok(upsert(created, raw.into_season()?))
  }

  async fn get_season(&self, code: &str) -> Result<Option<Season>> {
    let sql = format!("SELECT {} FROM seasons WHERE code = ?1", RawSeason::COLUMNS);
    let raw = self.query_opt(sql, code.to_owned(), RawSeason::from_row).await?;
    raw.map(RawSeason::into_season).transpose()
  }

  async fn latest_season(&self) -> Result<Option<Season>> {
    let sql = format!(
      "SELECT {} FROM seasons ORDER BY created_at DESC, rowid DESC LIMIT 1",
      RawSeason::COLUMNS
    );

    let raw = self
      .conn
      .call(move |conn| Ok(conn.query_row(&sql, [], RawSeason::from_row).optional()?))
      .await?;

    raw.map(RawSeason::into_season).transpose()
  }

  async fn list_seasons(&self) -> Result<Vec<Season>> {
    let sql = format!(
      "SELECT {} FROM seasons ORDER BY created_at, rowid",
      RawSeason::COLUMNS
    );

    let raws: Vec<RawSeason> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map([], RawSeason::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawSeason::into_season).collect()
  }

  // ── Teams and players ─────────────────────────────────────────────────────

  async fn ensure_team(&self, input: NewTeam) -> Result<Upsert<Team>> {
    let id_str = encode_uuid(Uuid::new_v4());
    let at_str = encode_dt(Utc::now());
    let select = format!("SELECT {} FROM teams WHERE code = ?1", RawTeam::COLUMNS);

    let (created, raw) = self
      .conn
      .call(move |conn| {
        let inserted = conn.execute(
          "INSERT INTO teams (team_id, code, name, city, country, created_at)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6)
           ON CONFLICT (code) DO NOTHING",
          rusqlite::params![
            id_str,
            input.code,
            input.name,
            input.city,
            input.country,
            at_str,
          ],
        )?;
        let raw = conn.query_row(&select, [&input.code], RawTeam::from_row)?;
        Ok((inserted > 0, raw))
      })
      .await?;

    Ok(upsert(created, raw.into_team()?))
  }

  async fn find_team(&self, code: &str) -> Result<Option<Team>> {
    let sql = format!("SELECT {} FROM teams WHERE code = ?1", RawTeam::COLUMNS);
    let raw = self.query_opt(sql, code.to_owned(), RawTeam::from_row).await?;
    raw.map(RawTeam::into_team).transpose()
  }

  async fn ensure_player(&self, input: NewPlayer) -> Result<Upsert<Player>> {
    let id_str = encode_uuid(Uuid::new_v4());
    let at_str = encode_dt(Utc::now());
    let select = format!("SELECT {} FROM players WHERE code = ?1", RawPlayer::COLUMNS);

    let (created, raw) = self
      .conn
      .call(move |conn| {
        let inserted = conn.execute(
          "INSERT INTO players (player_id, code, first_name, last_name, position, created_at)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6)
           ON CONFLICT (code) DO NOTHING",
          rusqlite::params![
            id_str,
            input.code,
            input.first_name,
            input.last_name,
            input.position,
            at_str,
          ],
        )?;
        let raw = conn.query_row(&select, [&input.code], RawPlayer::from_row)?;
        Ok((inserted > 0, raw))
      })
      .await?;

    Ok(upsert(created, raw.into_player()?))
  }

  async fn find_player(&self, code: &str) -> Result<Option<Player>> {
    let sql = format!("SELECT {} FROM players WHERE code = ?1", RawPlayer::COLUMNS);
    let raw = self.query_opt(sql, code.to_owned(), RawPlayer::from_row).await?;
    raw.map(RawPlayer::into_player).transpose()
  }

  // ── Games ─────────────────────────────────────────────────────────────────

  async fn ensure_game(&self, input: NewGame) -> Result<Upsert<Game>> {
    let id_str     = encode_uuid(Uuid::new_v4());
    let season_str = encode_uuid(input.season_id);
    let home_str   = encode_uuid(input.home_team_id);
    let away_str   = encode_uuid(input.away_team_id);
    let status_str = encode_status(input.status);
    let date_str   = input.date.map(encode_date);
    let at_str     = encode_dt(Utc::now());
    let game_code  = input.game_code;
    let select = format!(
      "SELECT {} FROM games WHERE season_id = ?1 AND game_code = ?2",
      RawGame::COLUMNS
    );

    let (created, raw) = self
      .conn
      .call(move |conn| {
        let inserted = conn.execute(
          "INSERT INTO games (
             game_id, season_id, game_code, home_team_id, away_team_id,
             home_score, away_score, status, date, created_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
           ON CONFLICT (season_id, game_code) DO NOTHING",
          rusqlite::params![
            id_str,
            season_str,
            game_code,
            home_str,
            away_str,
            input.home_score,
            input.away_score,
            status_str,
            date_str,
            at_str,
          ],
        )?;
        let raw = conn.query_row(
          &select,
          rusqlite::params![season_str, game_code],
          RawGame::from_row,
        )?;
        Ok((inserted > 0, raw))
      })
      .await?;

    Ok(upsert(created, raw.into_game()?))
  }

  async fn find_game(&self, season_id: Uuid, game_code: i64) -> Result<Option<Game>> {
    let season_str = encode_uuid(season_id);
    let sql = format!(
      "SELECT {} FROM games WHERE season_id = ?1 AND game_code = ?2",
      RawGame::COLUMNS
    );

    let raw = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(&sql, rusqlite::params![season_str, game_code], RawGame::from_row)
            .optional()?,
        )
      })
      .await?;

    raw.map(RawGame::into_game).transpose()
  }

  async fn max_game_code(&self, season_id: Uuid) -> Result<Option<i64>> {
    let season_str = encode_uuid(season_id);

    let max = self
      .conn
      .call(move |conn| {
        let max: Option<i64> = conn.query_row(
          "SELECT MAX(game_code) FROM games WHERE season_id = ?1",
          [&season_str],
          |r| r.get(0),
        )?;
        Ok(max)
      })
      .await?;

    Ok(max)
  }

  async fn list_games(&self, season_id: Uuid) -> Result<Vec<Game>> {
    let sql = format!(
      "SELECT {} FROM games WHERE season_id = ?1 ORDER BY game_code",
      RawGame::COLUMNS
    );
    let raws = self.query_all(sql, encode_uuid(season_id), RawGame::from_row).await?;
    raws.into_iter().map(RawGame::into_game).collect()
  }

  // ── Box scores ────────────────────────────────────────────────────────────

  async fn ensure_team_game_stats(
    &self,
    input: NewTeamGameStats,
  ) -> Result<Upsert<TeamGameStats>> {
    let id_str   = encode_uuid(Uuid::new_v4());
    let game_str = encode_uuid(input.game_id);
    let team_str = encode_uuid(input.team_id);
    let [pts, fgm, fga, tpm, tpa, ftm, fta, reb, ast, stl, blk, tov, pf] =
      stat_values(&input.stats);
    let insert = format!(
      "INSERT INTO team_game_stats (team_game_stats_id, game_id, team_id, is_home, {STAT_COLUMNS})
       VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17)
       ON CONFLICT (game_id, team_id) DO NOTHING"
    );
    let select = format!(
      "SELECT {} FROM team_game_stats WHERE game_id = ?1 AND team_id = ?2",
      RawTeamGameStats::columns()
    );

    let (created, raw) = self
      .conn
      .call(move |conn| {
        let inserted = conn.execute(
          &insert,
          rusqlite::params![
            id_str, game_str, team_str, input.is_home,
            pts, fgm, fga, tpm, tpa, ftm, fta, reb, ast, stl, blk, tov, pf,
          ],
        )?;
        let raw = conn.query_row(
          &select,
          rusqlite::params![game_str, team_str],
          RawTeamGameStats::from_row,
        )?;
        Ok((inserted > 0, raw))
      })
      .await?;

    Ok(upsert(created, raw.into_stats()?))
  }

  async fn ensure_player_game_stats(
    &self,
    input: NewPlayerGameStats,
  ) -> Result<Upsert<PlayerGameStats>> {
    let id_str     = encode_uuid(Uuid::new_v4());
    let game_str   = encode_uuid(input.game_id);
    let player_str = encode_uuid(input.player_id);
    let team_str   = encode_uuid(input.team_id);
    let [pts, fgm, fga, tpm, tpa, ftm, fta, reb, ast, stl, blk, tov, pf] =
      stat_values(&input.stats);
    let insert = format!(
      "INSERT INTO player_game_stats (
         player_game_stats_id, game_id, player_id, team_id, minutes, {STAT_COLUMNS}
       ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18)
       ON CONFLICT (game_id, player_id, team_id) DO NOTHING"
    );
    let select = format!(
      "SELECT {} FROM player_game_stats
       WHERE game_id = ?1 AND player_id = ?2 AND team_id = ?3",
      RawPlayerGameStats::columns()
    );

    let (created, raw) = self
      .conn
      .call(move |conn| {
        let inserted = conn.execute(
          &insert,
          rusqlite::params![
            id_str, game_str, player_str, team_str, input.minutes,
            pts, fgm, fga, tpm, tpa, ftm, fta, reb, ast, stl, blk, tov, pf,
          ],
        )?;
        let raw = conn.query_row(
          &select,
          rusqlite::params![game_str, player_str, team_str],
          RawPlayerGameStats::from_row,
        )?;
        Ok((inserted > 0, raw))
      })
      .await?;

    Ok(upsert(created, raw.into_stats()?))
  }

  async fn list_team_game_stats(&self, game_id: Uuid) -> Result<Vec<TeamGameStats>> {
    let sql = format!(
      "SELECT {} FROM team_game_stats WHERE game_id = ?1 ORDER BY is_home DESC",
      RawTeamGameStats::columns()
    );
    let raws = self
      .query_all(sql, encode_uuid(game_id), RawTeamGameStats::from_row)
      .await?;
    raws.into_iter().map(RawTeamGameStats::into_stats).collect()
  }

  async fn list_player_game_stats(&self, game_id: Uuid) -> Result<Vec<PlayerGameStats>> {
    let sql = format!(
      "SELECT {} FROM player_game_stats WHERE game_id = ?1 ORDER BY rowid",
      RawPlayerGameStats::columns()
    );
    let raws = self
      .query_all(sql, encode_uuid(game_id), RawPlayerGameStats::from_row)
      .await?;
    raws.into_iter().map(RawPlayerGameStats::into_stats).collect()
  }

  // ── Scoring events ────────────────────────────────────────────────────────

  async fn insert_scoring_event(&self, input: NewScoringEvent) -> Result<ScoringEvent> {
    let event = ScoringEvent {
      scoring_event_id: Uuid::new_v4(),
      game_id:          input.game_id,
      team_id:          input.team_id,
      player_id:        input.player_id,
      minute:           input.minute,
      time_remaining:   input.time_remaining,
      points_scored:    input.points_scored,
      shot_type:        input.shot_type,
      zone:             input.zone,
      is_made:          input.is_made,
      created_at:       Utc::now(),
    };

    let id_str     = encode_uuid(event.scoring_event_id);
    let game_str   = encode_uuid(event.game_id);
    let team_str   = encode_uuid(event.team_id);
    let player_str = encode_uuid(event.player_id);
    let at_str     = encode_dt(event.created_at);
    let row        = event.clone();

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO scoring_events (
             scoring_event_id, game_id, team_id, player_id, minute,
             time_remaining, points_scored, shot_type, zone, is_made, created_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
          rusqlite::params![
            id_str,
            game_str,
            team_str,
            player_str,
            row.minute,
            row.time_remaining,
            row.points_scored,
            row.shot_type,
            row.zone,
            row.is_made,
            at_str,
          ],
        )?;
        Ok(())
      })
      .await?;

    Ok(event)
  }

  async fn count_scoring_events(&self, game_id: Uuid) -> Result<u64> {
    let game_str = encode_uuid(game_id);

    let count: i64 = self
      .conn
      .call(move |conn| {
        Ok(conn.query_row(
          "SELECT COUNT(*) FROM scoring_events WHERE game_id = ?1",
          [&game_str],
          |r| r.get(0),
        )?)
      })
      .await?;

    Ok(count.max(0) as u64)
  }
}
