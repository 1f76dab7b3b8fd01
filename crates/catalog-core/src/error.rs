use std::path::PathBuf;
use thiserror::Error;

/// All pipeline-level errors produced by the catalog crates.
#[derive(Error, Debug)]
pub enum CatalogError {
    /// No input was supplied at all. An empty-but-present input is not an error.
    #[error("No catalog input provided")]
    MissingInput,

    /// A file could not be opened or read from disk.
    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The delimited-text reader failed before any record could be read.
    #[error("Failed to parse CSV: {0}")]
    Csv(#[from] csv::Error),

    /// The header row lacks a column the normalizer cannot do without.
    #[error("Catalog schema error: {0}")]
    Schema(String),

    /// A filter selection that can never be satisfied.
    #[error("Invalid filter: {0}")]
    InvalidFilter(String),

    /// A JSON document could not be produced or parsed.
    #[error("Failed to process JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Pass-through for any raw I/O error that does not carry a path.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Catch-all for errors from third-party crates via `anyhow`.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Convenience alias used throughout the catalog crates.
pub type Result<T> = std::result::Result<T, CatalogError>;

/// A single input row that could not be turned into a [`CatalogRow`].
///
/// Row errors never fail a load; they are collected and surfaced alongside
/// the rows that did normalize.
///
/// [`CatalogRow`]: crate::models::CatalogRow
#[derive(Error, Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RowError {
    /// A required column was empty or missing.
    #[error("Row {row}: missing required field '{field}'")]
    MissingField { row: usize, field: String },

    /// A required column held a value that could not be interpreted.
    #[error("Row {row}: invalid value '{value}' for field '{field}'")]
    InvalidField {
        row: usize,
        field: String,
        value: String,
    },

    /// The record could not be decoded at all (bad quoting, bad UTF-8, ...).
    #[error("Row {row}: malformed record: {message}")]
    Malformed { row: usize, message: String },
}

impl RowError {
    /// 1-based data row number the error refers to.
    pub fn row(&self) -> usize {
        match self {
            RowError::MissingField { row, .. }
            | RowError::InvalidField { row, .. }
            | RowError::Malformed { row, .. } => *row,
        }
    }
}
