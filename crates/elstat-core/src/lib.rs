//! Core types and trait definitions for the Euroleague statistics store.
//!
//! This crate is deliberately free of HTTP and database dependencies. The
//! provider client, the storage backends and the ingestion pipeline all depend
//! on it; it depends on nothing of theirs.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod error;
pub mod game;
pub mod roster;
pub mod season;
pub mod store;

pub use error::{Error, Result};
