//! Runtime layer for the catalog dashboard.
//!
//! Memoizes catalog loads and dashboard results, and runs the background
//! session the presentation layer talks to over channels.

pub mod cache;
pub mod session;

pub use catalog_core as core;
pub use catalog_data as data;
