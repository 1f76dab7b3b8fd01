//! Shared domain types for the catalog dashboard.
//!
//! Holds the normalized row model, the error taxonomy, tolerant cell parsers,
//! number formatting and the command-line settings.

pub mod error;
pub mod formatting;
pub mod models;
pub mod parsing;
pub mod settings;
