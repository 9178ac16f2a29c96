//! Core types and algorithms for the Kaizen issue tracker.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! It holds the domain model, the raw ranking events, and the three pure
//! stages of leaderboard computation: aggregation, weighted scoring and
//! competition ranking. Storage backends implement the traits in [`store`].

pub mod aggregate;
pub mod error;
pub mod event;
pub mod model;
pub mod rank;
pub mod scoring;
pub mod store;

pub use error::{Error, Result};
