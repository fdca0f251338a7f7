//! SQL schema for the statistics store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS seasons (
    season_id   TEXT PRIMARY KEY,
    code        TEXT NOT NULL UNIQUE,   -- provider code, e.g. 'E2025'
    name        TEXT NOT NULL,
    created_at  TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS teams (
    team_id     TEXT PRIMARY KEY,
    code        TEXT NOT NULL UNIQUE,
    name        TEXT NOT NULL,
    city        TEXT,
    country     TEXT,
    created_at  TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS players (
    player_id   TEXT PRIMARY KEY,
    code        TEXT NOT NULL UNIQUE,   -- trimmed provider id, e.g. 'P003733'
    first_name  TEXT NOT NULL,
    last_name   TEXT NOT NULL,
    position    TEXT,
    created_at  TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS games (
    game_id       TEXT PRIMARY KEY,
    season_id     TEXT NOT NULL REFERENCES seasons(season_id),
    game_code     INTEGER NOT NULL,
    home_team_id  TEXT NOT NULL REFERENCES teams(team_id),
    away_team_id  TEXT NOT NULL REFERENCES teams(team_id),
    home_score    INTEGER,
    away_score    INTEGER,
    status        TEXT NOT NULL DEFAULT 'Scheduled',  -- 'Scheduled' | 'Completed'
    date          TEXT,                               -- ISO 8601 calendar date
    created_at    TEXT NOT NULL,
    UNIQUE (season_id, game_code)
);

CREATE TABLE IF NOT EXISTS team_game_stats (
    team_game_stats_id        TEXT PRIMARY KEY,
    game_id                   TEXT NOT NULL REFERENCES games(game_id),
    team_id                   TEXT NOT NULL REFERENCES teams(team_id),
    is_home                   INTEGER,
    points                    INTEGER NOT NULL DEFAULT 0,
    field_goals_made          INTEGER NOT NULL DEFAULT 0,
    field_goals_attempted     INTEGER NOT NULL DEFAULT 0,
    three_pointers_made       INTEGER NOT NULL DEFAULT 0,
    three_pointers_attempted  INTEGER NOT NULL DEFAULT 0,
    free_throws_made          INTEGER NOT NULL DEFAULT 0,
    free_throws_attempted     INTEGER NOT NULL DEFAULT 0,
    total_rebounds            INTEGER NOT NULL DEFAULT 0,
    assists                   INTEGER NOT NULL DEFAULT 0,
    steals                    INTEGER NOT NULL DEFAULT 0,
    blocks                    INTEGER NOT NULL DEFAULT 0,
    turnovers                 INTEGER NOT NULL DEFAULT 0,
    fouls                     INTEGER NOT NULL DEFAULT 0,
    UNIQUE (game_id, team_id)
);

-- minutes is stored exactly as the provider sends it ('MM:SS', 'DNP' or NULL).
CREATE TABLE IF NOT EXISTS player_game_stats (
    player_game_stats_id      TEXT PRIMARY KEY,
    game_id                   TEXT NOT NULL REFERENCES games(game_id),
    player_id                 TEXT NOT NULL REFERENCES players(player_id),
    team_id                   TEXT NOT NULL REFERENCES teams(team_id),
    minutes                   TEXT,
    points                    INTEGER NOT NULL DEFAULT 0,
    field_goals_made          INTEGER NOT NULL DEFAULT 0,
    field_goals_attempted     INTEGER NOT NULL DEFAULT 0,
    three_pointers_made       INTEGER NOT NULL DEFAULT 0,
    three_pointers_attempted  INTEGER NOT NULL DEFAULT 0,
    free_throws_made          INTEGER NOT NULL DEFAULT 0,
    free_throws_attempted     INTEGER NOT NULL DEFAULT 0,
    total_rebounds            INTEGER NOT NULL DEFAULT 0,
    assists                   INTEGER NOT NULL DEFAULT 0,
    steals                    INTEGER NOT NULL DEFAULT 0,
    blocks                    INTEGER NOT NULL DEFAULT 0,
    turnovers                 INTEGER NOT NULL DEFAULT 0,
    fouls                     INTEGER NOT NULL DEFAULT 0,
    UNIQUE (game_id, player_id, team_id)
);

-- No natural key: the ingestion run is responsible for not loading twice.
CREATE TABLE IF NOT EXISTS scoring_events (
    scoring_event_id  TEXT PRIMARY KEY,
    game_id           TEXT NOT NULL REFERENCES games(game_id),
    team_id           TEXT NOT NULL REFERENCES teams(team_id),
    player_id         TEXT NOT NULL REFERENCES players(player_id),
    minute            INTEGER,            -- game minute as reported by the feed
    time_remaining    TEXT,
    points_scored     INTEGER,
    shot_type         TEXT,
    zone              TEXT,
    is_made           INTEGER,
    created_at        TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS games_season_idx          ON games(season_id, game_code);
CREATE INDEX IF NOT EXISTS player_game_stats_game_idx ON player_game_stats(game_id);
CREATE INDEX IF NOT EXISTS scoring_events_game_idx   ON scoring_events(game_id);

PRAGMA user_version = 1;
";
