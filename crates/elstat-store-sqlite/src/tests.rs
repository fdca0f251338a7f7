//! Integration tests for `SqliteStore` against an in-memory database.

use chrono::NaiveDate;
use elstat_core::{
  game::{
    GameStatus, NewGame, NewPlayerGameStats, NewScoringEvent, NewTeamGameStats,
    StatLine,
  },
  roster::{NewPlayer, NewTeam, Team},
  season::{NewSeason, Season},
  store::{EntityStore, StoreError, Upsert},
};
use uuid::Uuid;

use crate::SqliteStore;

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

async fn season(s: &SqliteStore, code: &str) -> Season {
  s.ensure_season(NewSeason::from_code(code))
    .await
    .unwrap()
    .into_inner()
}

async fn team(s: &SqliteStore, code: &str) -> Team {
  s.ensure_team(NewTeam::new(code, format!("{code} Basket")))
    .await
    .unwrap()
    .into_inner()
}

fn new_game(season: &Season, code: i64, home: &Team, away: &Team) -> NewGame {
  NewGame {
    season_id:    season.season_id,
    game_code:    code,
    home_team_id: home.team_id,
    away_team_id: away.team_id,
    home_score:   Some(78),
    away_score:   Some(81),
    status:       GameStatus::Completed,
    date:         NaiveDate::from_ymd_opt(2024, 10, 3),
  }
}

// ─── Seasons ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn ensure_season_creates_once() {
  let s = store().await;

  let first = s.ensure_season(NewSeason::from_code("E2024")).await.unwrap();
  assert!(first.is_created());
  assert_eq!(first.get().name, "2024-25 Season");

  let second = s.ensure_season(NewSeason::from_code("E2024")).await.unwrap();
  assert!(!second.is_created());
  assert_eq!(second.get().season_id, first.get().season_id);

  assert_eq!(s.list_seasons().await.unwrap().len(), 1);
}

#[tokio::test]
async fn existing_season_is_not_overwritten() {
  let s = store().await;
  season(&s, "E2024").await;

  let again = s
    .ensure_season(NewSeason { code: "E2024".into(), name: "renamed".into() })
    .await
    .unwrap();

  assert!(matches!(again, Upsert::Existing(ref row) if row.name == "2024-25 Season"));
}

#[tokio::test]
async fn get_season_missing_returns_none() {
  let s = store().await;
  assert!(s.get_season("E1999").await.unwrap().is_none());
}

#[tokio::test]
async fn latest_season_is_last_registered() {
  let s = store().await;
  assert!(s.latest_season().await.unwrap().is_none());

  season(&s, "E2023").await;
  season(&s, "E2019").await;

  let latest = s.latest_season().await.unwrap().unwrap();
  assert_eq!(latest.code, "E2019");

  let codes: Vec<_> = s
    .list_seasons()
    .await
    .unwrap()
    .into_iter()
    .map(|season| season.code)
    .collect();
  assert_eq!(codes, ["E2023", "E2019"]);
}

// ─── Teams and players ───────────────────────────────────────────────────────

#[tokio::test]
async fn team_resolves_by_code_without_overwrite() {
  let s = store().await;

  let created = s.ensure_team(NewTeam::new("PAN", "Panathinaikos")).await.unwrap();
  assert!(created.is_created());

  let again = s
    .ensure_team(NewTeam::new("PAN", "PANATHINAIKOS AKTOR ATHENS"))
    .await
    .unwrap();
  assert!(!again.is_created());
  assert_eq!(again.get().name, "Panathinaikos");

  let found = s.find_team("PAN").await.unwrap().unwrap();
  assert_eq!(found.team_id, created.get().team_id);
  assert!(s.find_team("OLY").await.unwrap().is_none());
}

#[tokio::test]
async fn player_resolves_by_code() {
  let s = store().await;

  let p = s
    .ensure_player(NewPlayer::from_listing("P003733 ", "SLOUKAS, KOSTAS"))
    .await
    .unwrap();
  assert!(p.is_created());

  let again = s
    .ensure_player(NewPlayer::from_listing("P003733", "Sloukas, K."))
    .await
    .unwrap();
  assert!(!again.is_created());
  assert_eq!(again.get().first_name, "KOSTAS");

  let found = s.find_player("P003733").await.unwrap().unwrap();
  assert_eq!(found.player_id, p.get().player_id);
}

// ─── Games ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn game_is_unique_per_season_and_code() {
  let s = store().await;
  let e2024 = season(&s, "E2024").await;
  let e2023 = season(&s, "E2023").await;
  let home = team(&s, "PAN").await;
  let away = team(&s, "OLY").await;

  let first = s.ensure_game(new_game(&e2024, 1, &home, &away)).await.unwrap();
  assert!(first.is_created());

  let dup = s.ensure_game(new_game(&e2024, 1, &away, &home)).await.unwrap();
  assert!(!dup.is_created());
  assert_eq!(dup.get().game_id, first.get().game_id);
  assert_eq!(dup.get().home_team_id, home.team_id);

  // Same gamecode in another season is a different game.
  let other = s.ensure_game(new_game(&e2023, 1, &home, &away)).await.unwrap();
  assert!(other.is_created());

  assert_eq!(s.list_games(e2024.season_id).await.unwrap().len(), 1);
}

#[tokio::test]
async fn game_fields_roundtrip() {
  let s = store().await;
  let e2024 = season(&s, "E2024").await;
  let home = team(&s, "PAN").await;
  let away = team(&s, "OLY").await;

  s.ensure_game(new_game(&e2024, 7, &home, &away)).await.unwrap();
  let game = s.find_game(e2024.season_id, 7).await.unwrap().unwrap();

  assert_eq!(game.status, GameStatus::Completed);
  assert_eq!(game.home_score, Some(78));
  assert_eq!(game.away_score, Some(81));
  assert_eq!(game.date, NaiveDate::from_ymd_opt(2024, 10, 3));
  assert!(s.find_game(e2024.season_id, 8).await.unwrap().is_none());
}

#[tokio::test]
async fn max_game_code_tracks_highest() {
  let s = store().await;
  let e2024 = season(&s, "E2024").await;
  let home = team(&s, "PAN").await;
  let away = team(&s, "OLY").await;

  assert_eq!(s.max_game_code(e2024.season_id).await.unwrap(), None);

  for code in [3, 1, 12, 5] {
    s.ensure_game(new_game(&e2024, code, &home, &away)).await.unwrap();
  }

  assert_eq!(s.max_game_code(e2024.season_id).await.unwrap(), Some(12));
  let codes: Vec<_> = s
    .list_games(e2024.season_id)
    .await
    .unwrap()
    .iter()
    .map(|g| g.game_code)
    .collect();
  assert_eq!(codes, [1, 3, 5, 12]);
}

#[tokio::test]
async fn concurrent_ensure_game_yields_one_row() {
  let s = store().await;
  let e2024 = season(&s, "E2024").await;
  let home = team(&s, "PAN").await;
  let away = team(&s, "OLY").await;

  let (a, b) = tokio::join!(
    s.ensure_game(new_game(&e2024, 4, &home, &away)),
    s.ensure_game(new_game(&e2024, 4, &home, &away)),
  );
  let (a, b) = (a.unwrap(), b.unwrap());

  assert_eq!(a.get().game_id, b.get().game_id);
  assert!(a.is_created() ^ b.is_created());
  assert_eq!(s.list_games(e2024.season_id).await.unwrap().len(), 1);
}

// ─── Box scores ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn stat_rows_are_insert_if_absent() {
  let s = store().await;
  let e2024 = season(&s, "E2024").await;
  let home = team(&s, "PAN").await;
  let away = team(&s, "OLY").await;
  let game = s
    .ensure_game(new_game(&e2024, 1, &home, &away))
    .await
    .unwrap()
    .into_inner();
  let player = s
    .ensure_player(NewPlayer::from_listing("P000001", "DOE, JOHN"))
    .await
    .unwrap()
    .into_inner();

  let stats = StatLine { points: 21, assists: 4, ..Default::default() };

  let team_row = NewTeamGameStats {
    game_id: game.game_id,
    team_id: home.team_id,
    is_home: Some(true),
    stats,
  };
  assert!(s.ensure_team_game_stats(team_row.clone()).await.unwrap().is_created());
  let again = s.ensure_team_game_stats(team_row).await.unwrap();
  assert!(!again.is_created());
  assert_eq!(again.get().stats.points, 21);

  let player_row = NewPlayerGameStats {
    game_id:   game.game_id,
    player_id: player.player_id,
    team_id:   home.team_id,
    minutes:   Some("31:07".into()),
    stats,
  };
  assert!(s.ensure_player_game_stats(player_row.clone()).await.unwrap().is_created());
  assert!(!s.ensure_player_game_stats(player_row).await.unwrap().is_created());

  let team_rows = s.list_team_game_stats(game.game_id).await.unwrap();
  assert_eq!(team_rows.len(), 1);
  assert_eq!(team_rows[0].is_home, Some(true));

  let player_rows = s.list_player_game_stats(game.game_id).await.unwrap();
  assert_eq!(player_rows.len(), 1);
  assert_eq!(player_rows[0].minutes.as_deref(), Some("31:07"));
  assert_eq!(player_rows[0].stats, stats);
}

// ─── Scoring events ──────────────────────────────────────────────────────────

#[tokio::test]
async fn scoring_events_append_and_count() {
  let s = store().await;
  let e2024 = season(&s, "E2024").await;
  let home = team(&s, "PAN").await;
  let away = team(&s, "OLY").await;
  let game = s
    .ensure_game(new_game(&e2024, 1, &home, &away))
    .await
    .unwrap()
    .into_inner();
  let player = s
    .ensure_player(NewPlayer::from_listing("P000001", "DOE, JOHN"))
    .await
    .unwrap()
    .into_inner();

  let event = NewScoringEvent {
    game_id:        game.game_id,
    team_id:        home.team_id,
    player_id:      player.player_id,
    minute:         Some(23),
    time_remaining: Some("04:12".into()),
    points_scored:  Some(3),
    shot_type:      Some("3FGM".into()),
    zone:           Some("H".into()),
    is_made:        Some(true),
  };

  let stored = s.insert_scoring_event(event.clone()).await.unwrap();
  assert_eq!(stored.points_scored, Some(3));
  s.insert_scoring_event(event).await.unwrap();

  assert_eq!(s.count_scoring_events(game.game_id).await.unwrap(), 2);
  assert_eq!(s.count_scoring_events(Uuid::new_v4()).await.unwrap(), 0);
}

#[tokio::test]
async fn unique_violation_is_typed() {
  let s = store().await;
  let e2024 = season(&s, "E2024").await;
  let id = e2024.season_id.hyphenated().to_string();

  // Bypass the upsert path to provoke a raw primary-key collision.
  let err: crate::Error = s
    .conn
    .call(move |conn| {
      conn.execute(
        "INSERT INTO seasons (season_id, code, name, created_at)
         VALUES (?1, 'E2099', 'x', '2024-01-01T00:00:00.000000Z')",
        [&id],
      )?;
      Ok(())
    })
    .await
    .unwrap_err()
    .into();

  assert!(err.is_constraint_violation());
  assert!(matches!(err, crate::Error::ConstraintViolation(_)));
}
