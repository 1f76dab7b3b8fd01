//! Data layer for the catalog dashboard.
//!
//! Loads a delimited catalog export into an immutable [`catalog::Catalog`],
//! filters it by a [`filter::FilterSpec`] and computes the named dashboard
//! results: frequency tables, time series, cross tabs and trends.

pub mod aggregator;
pub mod analysis;
pub mod catalog;
pub mod filter;
pub mod normalize;
pub mod reader;
pub mod trend;

#[cfg(test)]
mod testing;

pub use catalog_core as core;
