//! Client for the Euroleague live-data provider.
//!
//! The provider exposes one JSON document per `(endpoint, gamecode,
//! seasoncode)` triple and no index of which triples exist. [`ProviderClient`]
//! fetches a single document with bounded retries and classifies the outcome
//! so callers can tell "this game does not exist" apart from "try later".

// Native `async fn` in traits; see `elstat-core`.
#![allow(async_fn_in_trait)]

pub mod client;
pub mod error;
pub mod payload;

pub use client::{Endpoint, GameFeed, ProviderClient, ProviderSettings};
pub use error::{Error, FetchError, Result};
