//! The loaded, immutable catalog and its identity.

use std::collections::BTreeSet;
use std::fmt;

use catalog_core::error::RowError;
use catalog_core::models::{CatalogRow, ContentType};
use serde::Serialize;

// ── CatalogId ─────────────────────────────────────────────────────────────────

/// Identity of one loaded input: the BLAKE3 hash of its raw bytes.
///
/// Two loads of byte-identical input share an id, which is what the runtime
/// caches key on.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct CatalogId(String);

impl CatalogId {
    pub fn of_bytes(bytes: &[u8]) -> Self {
        CatalogId(blake3::hash(bytes).to_hex().to_string())
    }

    /// Short form for log lines.
    pub fn short(&self) -> &str {
        &self.0[..self.0.len().min(12)]
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CatalogId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ── LoadReport ────────────────────────────────────────────────────────────────

/// Outcome of turning raw input into catalog rows.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LoadReport {
    /// Data records seen in the input (header excluded).
    pub records_read: usize,
    /// Records that became catalog rows.
    pub rows_loaded: usize,
    /// One entry per dropped record.
    pub errors: Vec<RowError>,
}

impl LoadReport {
    pub fn rows_dropped(&self) -> usize {
        self.errors.len()
    }
}

// ── Catalog ───────────────────────────────────────────────────────────────────

/// The full normalized set of rows for one loaded input.
#[derive(Debug, Clone)]
pub struct Catalog {
    id: CatalogId,
    rows: Vec<CatalogRow>,
    report: LoadReport,
}

impl Catalog {
    pub fn new(id: CatalogId, rows: Vec<CatalogRow>, report: LoadReport) -> Self {
        Self { id, rows, report }
    }

    /// Build a catalog from already-normalized rows.
    ///
    /// The id is derived from the rows' JSON encoding, so equal row sets get
    /// equal ids.
    pub fn from_rows(rows: Vec<CatalogRow>) -> Self {
        let encoded = serde_json::to_vec(&rows).unwrap_or_default();
        let report = LoadReport {
            records_read: rows.len(),
            rows_loaded: rows.len(),
            errors: Vec::new(),
        };
        Self::new(CatalogId::of_bytes(&encoded), rows, report)
    }

    pub fn id(&self) -> &CatalogId {
        &self.id
    }

    pub fn rows(&self) -> &[CatalogRow] {
        &self.rows
    }

    pub fn report(&self) -> &LoadReport {
        &self.report
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Content types present in the catalog.
    pub fn observed_types(&self) -> BTreeSet<ContentType> {
        self.rows.iter().map(|r| r.content_type).collect()
    }

    /// Rating categories present in the catalog; `None` is "unrated".
    pub fn observed_ratings(&self) -> BTreeSet<Option<String>> {
        self.rows.iter().map(|r| r.rating.clone()).collect()
    }

    /// Smallest and largest release year, or `None` for an empty catalog.
    pub fn release_year_bounds(&self) -> Option<(i32, i32)> {
        let min = self.rows.iter().map(|r| r.release_year).min()?;
        let max = self.rows.iter().map(|r| r.release_year).max()?;
        Some((min, max))
    }
}
