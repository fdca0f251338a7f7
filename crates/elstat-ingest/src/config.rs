//! Runtime configuration for ingestion runs.
//!
//! Loaded from an optional TOML file layered with `ELSTAT_*` environment
//! variables, then handed to the [`crate::Orchestrator`] at construction.

use std::{
  path::{Path, PathBuf},
  time::Duration,
};

use elstat_provider::ProviderSettings;
use serde::Deserialize;

use crate::walker::{WalkMode, WalkPolicy};

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct IngestConfig {
  /// SQLite database file; a leading `~/` is expanded by the binary.
  pub store_path:                       PathBuf,
  pub provider_base_url:                String,
  pub user_agent:                       String,
  /// Seasons registered and crawled from gamecode 1 by `initialize`.
  pub seasons:                          Vec<String>,
  /// Codes probed by `update` to pick up newly opened seasons.
  pub candidate_seasons:                Vec<String>,
  /// Default for season lookups that do not name a season.
  pub current_season:                   Option<String>,
  pub request_delay_ms:                 u64,
  pub max_retries:                      u32,
  pub retry_backoff_ms:                 u64,
  pub request_timeout_secs:             u64,
  pub init_fetch_failure_threshold:     u32,
  pub update_fetch_failure_threshold:   u32,
  pub update_process_failure_threshold: u32,
}

impl Default for IngestConfig {
  fn default() -> Self {
    let provider = ProviderSettings::default();
    Self {
      store_path:                       PathBuf::from("elstat.db"),
      provider_base_url:                provider.base_url,
      user_agent:                       provider.user_agent,
      seasons:                          codes(&[
        "E2025", "E2024", "E2023", "E2022", "E2021", "E2020", "E2019", "E2018",
      ]),
      candidate_seasons:                codes(&["E2023", "E2024", "E2025", "E2026"]),
      current_season:                   None,
      request_delay_ms:                 500,
      max_retries:                      provider.max_attempts,
      retry_backoff_ms:                 provider.backoff.as_millis() as u64,
      request_timeout_secs:             provider.timeout.as_secs(),
      init_fetch_failure_threshold:     2,
      update_fetch_failure_threshold:   3,
      update_process_failure_threshold: 3,
    }
  }
}

fn codes(list: &[&str]) -> Vec<String> {
  list.iter().map(|c| (*c).to_owned()).collect()
}

impl IngestConfig {
  /// Read `path` (if it exists) and overlay `ELSTAT_*` environment variables.
  ///
  /// List-valued keys (`seasons`, `candidate_seasons`) accept comma-separated
  /// environment values.
  pub fn load(path: &Path) -> Result<Self, ::config::ConfigError> {
    ::config::Config::builder()
      .add_source(::config::File::from(path).required(false))
      .add_source(
        ::config::Environment::with_prefix("ELSTAT")
          .try_parsing(true)
          .list_separator(",")
          .with_list_parse_key("seasons")
          .with_list_parse_key("candidate_seasons"),
      )
      .build()?
      .try_deserialize()
  }

  pub fn provider_settings(&self) -> ProviderSettings {
    ProviderSettings {
      base_url:     self.provider_base_url.clone(),
      timeout:      Duration::from_secs(self.request_timeout_secs),
      max_attempts: self.max_retries,
      backoff:      Duration::from_millis(self.retry_backoff_ms),
      user_agent:   self.user_agent.clone(),
    }
  }

  /// Stopping thresholds and pacing for a season walk in `mode`.
  pub fn walk_policy(&self, mode: WalkMode) -> WalkPolicy {
    let request_delay = Duration::from_millis(self.request_delay_ms);
    match mode {
      WalkMode::Initialize => WalkPolicy {
        max_fetch_failures: self.init_fetch_failure_threshold,
        max_process_failures: None,
        request_delay,
      },
      WalkMode::Update => WalkPolicy {
        max_fetch_failures: self.update_fetch_failure_threshold,
        max_process_failures: Some(self.update_process_failure_threshold),
        request_delay,
      },
    }
  }
}
