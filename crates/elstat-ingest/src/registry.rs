//! Season bookkeeping: lookup, registration and discovery by probing.

use elstat_core::{
  season::{NewSeason, Season},
  store::EntityStore,
};
use elstat_provider::{Endpoint, GameFeed};
use tracing::{debug, info};

use crate::error::{IngestError, Result};

/// Gamecode fetched to decide whether a season exists at the provider.
const PROBE_GAME_CODE: i64 = 1;

pub struct SeasonRegistry<'a, S, F> {
  store:          &'a S,
  feed:           &'a F,
  current_season: Option<&'a str>,
}

impl<'a, S: EntityStore, F: GameFeed> SeasonRegistry<'a, S, F> {
  /// `current_season` is used by [`Self::resolve_season`] when no code is
  /// given explicitly.
  pub fn new(store: &'a S, feed: &'a F, current_season: Option<&'a str>) -> Self {
    Self { store, feed, current_season }
  }

  /// Find the season to operate on.
  ///
  /// An explicit `code` wins over the configured current season; with
  /// neither, the most recently registered season is used. A named season
  /// that is not registered is an error, as is an empty registry.
  pub async fn resolve_season(&self, code: Option<&str>) -> Result<Season> {
    match code.or(self.current_season) {
      Some(code) => self
        .store
        .get_season(code)
        .await
        .map_err(IngestError::store)?
        .ok_or_else(|| IngestError::SeasonNotFound(code.to_owned())),
      None => self
        .store
        .latest_season()
        .await
        .map_err(IngestError::store)?
        .ok_or(IngestError::NoSeasons),
    }
  }

  /// Register `code` if it is new. The display name is derived from the
  /// code's year.
  pub async fn ensure_season(&self, code: &str) -> Result<Season> {
    let upsert = self
      .store
      .ensure_season(NewSeason::from_code(code))
      .await
      .map_err(IngestError::store)?;

    if upsert.is_created() {
      info!(code, name = %upsert.get().name, "registered season");
    }
    Ok(upsert.into_inner())
  }

  /// Probe every unregistered candidate and register the ones the provider
  /// serves a first game for. Returns only the newly registered seasons.
  ///
  /// A probe that fails for any reason means the season is not open yet.
  pub async fn discover_candidate_seasons(&self, candidates: &[String]) -> Result<Vec<Season>> {
    let mut discovered = Vec::new();

    for code in candidates {
      if self
        .store
        .get_season(code)
        .await
        .map_err(IngestError::store)?
        .is_some()
      {
        continue;
      }

      match self.feed.fetch(Endpoint::Boxscore, PROBE_GAME_CODE, code).await {
        Ok(_) => {
          let upsert = self
            .store
            .ensure_season(NewSeason::from_code(code.as_str()))
            .await
            .map_err(IngestError::store)?;
          if upsert.is_created() {
            info!(code = %code, "discovered new season");
            discovered.push(upsert.into_inner());
          }
        }
        Err(err) => debug!(code = %code, "season not available: {err}"),
      }
    }

    Ok(discovered)
  }
}
