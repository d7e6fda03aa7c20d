//! Controller access and the temperature probe fallback chain.
//!
//! - [`BmcClient`]: authenticated HTTP access to the controller.
//! - [`ProbeStrategy`] / [`CatalogStrategy`]: one retrieval strategy from
//!   the endpoint catalog, parsed with its own heuristics.
//! - [`ProbeExecutor`]: runs strategies in priority order and returns the
//!   first reading, or an [`AggregatedFailure`].

pub mod client;
pub mod config;
pub mod probe;
pub mod strategy;

#[cfg(test)]
mod test_support;

pub use client::{BmcClient, BmcError};
pub use config::BmcConfig;
pub use probe::{AggregatedFailure, ProbeExecutor};
pub use strategy::{CatalogStrategy, ProbeStrategy, StrategyFailure};
