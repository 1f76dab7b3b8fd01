//! Delimited-text loading for catalog exports.
//!
//! Reads the header row, deserializes every record into a [`RawRecord`] and
//! hands the batch to [`normalize`]. Records the CSV reader cannot decode are
//! reported as [`RowError::Malformed`] so that the row accounting of the whole
//! load still adds up.

use std::io::Read;
use std::path::Path;

use catalog_core::error::{CatalogError, Result, RowError};
use csv::{ReaderBuilder, StringRecord, Trim};
use tracing::{debug, info, warn};

use crate::catalog::{Catalog, CatalogId, LoadReport};
use crate::normalize::{normalize, RawRecord};

/// Header columns that must be present for any row to normalize.
pub const REQUIRED_COLUMNS: &[&str] = &["type", "release_year"];

/// Knobs for reading the input file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadOptions {
    pub delimiter: u8,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self { delimiter: b',' }
    }
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Load a catalog from a file.
///
/// `None` is a [`CatalogError::MissingInput`]; an existing but empty file is
/// a valid, empty catalog.
pub fn load_catalog(path: Option<&Path>, options: LoadOptions) -> Result<Catalog> {
    let path = path.ok_or(CatalogError::MissingInput)?;
    let bytes = read_input(path)?;
    let catalog = catalog_from_bytes(&bytes, options)?;
    info!(
        "Loaded {} rows from {} ({} dropped)",
        catalog.len(),
        path.display(),
        catalog.report().rows_dropped()
    );
    Ok(catalog)
}

/// Read the raw bytes of an input file.
pub fn read_input(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path).map_err(|source| CatalogError::FileRead {
        path: path.to_path_buf(),
        source,
    })
}

/// Parse and normalize an in-memory input; the id is the hash of `bytes`.
pub fn catalog_from_bytes(bytes: &[u8], options: LoadOptions) -> Result<Catalog> {
    let id = CatalogId::of_bytes(bytes);
    let (raw, mut errors) = read_raw_records(bytes, options)?;
    let records_read = raw.len() + errors.len();

    let (rows, row_errors) = normalize(&raw);
    errors.extend(row_errors);
    errors.sort_by_key(RowError::row);

    if !errors.is_empty() {
        warn!(
            "{} of {} records dropped while loading catalog {}",
            errors.len(),
            records_read,
            id.short()
        );
    }

    let report = LoadReport {
        records_read,
        rows_loaded: rows.len(),
        errors,
    };
    Ok(Catalog::new(id, rows, report))
}

/// Load a catalog from any reader. The whole input is buffered so the
/// catalog id can be computed.
pub fn load_catalog_from_reader<R: Read>(mut reader: R, options: LoadOptions) -> Result<Catalog> {
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;
    catalog_from_bytes(&bytes, options)
}

/// Decode every data record into a [`RawRecord`].
///
/// Returns the decoded records plus one [`RowError::Malformed`] per record
/// the reader could not decode. Row numbers are 1-based and exclude the
/// header.
pub fn read_raw_records(
    bytes: &[u8],
    options: LoadOptions,
) -> Result<(Vec<RawRecord>, Vec<RowError>)> {
    let mut reader = ReaderBuilder::new()
        .delimiter(options.delimiter)
        .flexible(true)
        .trim(Trim::Headers)
        .from_reader(bytes);

    let headers = reader.headers()?.clone();
    if headers.iter().all(str::is_empty) {
        debug!("input has no header row; treating as empty catalog");
        return Ok((Vec::new(), Vec::new()));
    }
    check_schema(&headers)?;

    let mut records = Vec::new();
    let mut errors = Vec::new();

    for (index, result) in reader.records().enumerate() {
        let row = index + 1;
        let decoded = result
            .map_err(|e| e.to_string())
            .and_then(|record| {
                record
                    .deserialize::<RawRecord>(Some(&headers))
                    .map_err(|e| e.to_string())
            });
        match decoded {
            Ok(mut raw) => {
                raw.row = row;
                records.push(raw);
            }
            Err(message) => {
                debug!(row, "undecodable record: {}", message);
                errors.push(RowError::Malformed { row, message });
            }
        }
    }

    Ok((records, errors))
}

// ── Internal helpers ──────────────────────────────────────────────────────────

fn check_schema(headers: &StringRecord) -> Result<()> {
    let missing: Vec<&str> = REQUIRED_COLUMNS
        .iter()
        .copied()
        .filter(|col| !headers.iter().any(|h| h == *col))
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(CatalogError::Schema(format!(
            "missing required column(s): {}",
            missing.join(", ")
        )))
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
