//! Triggers a GitHub Actions workflow via the REST API and waits for the
//! resulting run to reach a terminal state.
//!
//! The whole crate is one sequential routine: resolve which workflow the
//! caller means, dispatch it, discover which run the dispatch produced, and
//! poll that run until it completes. See [`transactions::run`].

pub mod config;
pub mod github;
pub mod output;
pub mod transactions;
