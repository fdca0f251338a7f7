//! Incremental ingestion of Euroleague game data.
//!
//! The [`Orchestrator`] walks each season's gamecodes through a
//! [`elstat_provider::GameFeed`], normalises every box score with the
//! [`GameIngestor`] and writes through an [`elstat_core::store::EntityStore`].
//! Every write is insert-if-absent, so runs can be repeated and resumed.

pub mod config;
pub mod error;
pub mod game;
pub mod orchestrator;
pub mod points;
pub mod registry;
pub mod walker;

pub use config::IngestConfig;
pub use error::{IngestError, Result};
pub use game::{GameIngestor, GameReport};
pub use orchestrator::{Orchestrator, ReingestReport, RunReport, SeasonFailure, SeasonStatus};
pub use points::{PointsReport, ScoringEventIngestor};
pub use registry::SeasonRegistry;
pub use walker::{SeasonReport, SeasonWalker, StopReason, WalkMode, WalkPolicy};
