use std::collections::BTreeSet;

use catalog_core::error::{CatalogError, Result};
use catalog_core::settings::Settings;
use catalog_data::catalog::Catalog;
use catalog_data::filter::FilterSpec;
use catalog_data::reader::LoadOptions;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

// ── Logging bootstrap ──────────────────────────────────────────────────────────

/// Map a `--log-level` name to an [`EnvFilter`] directive.
///
/// Unknown names are passed through so that full directives such as
/// `"catalog_data=debug"` keep working.
pub fn level_directive(log_level: &str) -> String {
    match log_level.to_uppercase().as_str() {
        "DEBUG" => "debug".to_string(),
        "INFO" => "info".to_string(),
        "WARNING" | "WARN" => "warn".to_string(),
        "ERROR" => "error".to_string(),
        _ => log_level.to_string(),
    }
}

/// Initialise the global `tracing` subscriber writing to stderr.
///
/// Stdout is reserved for the rendered dashboard so `--format json` output
/// stays machine-readable.
pub fn setup_logging(log_level: &str) -> anyhow::Result<()> {
    let filter = EnvFilter::try_new(level_directive(log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let layer = fmt::layer()
        .with_target(false)
        .with_thread_ids(false)
        .with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(filter)
        .with(layer)
        .try_init()?;

    Ok(())
}

// ── Settings → pipeline inputs ─────────────────────────────────────────────────

/// Reader options from the command line.
pub fn load_options(settings: &Settings) -> Result<LoadOptions> {
    let delimiter = settings.delimiter_byte().ok_or_else(|| {
        CatalogError::Other(anyhow::anyhow!(
            "delimiter {:?} is not a single ASCII character",
            settings.delimiter
        ))
    })?;
    Ok(LoadOptions { delimiter })
}

/// The filter the command line asks for, starting from "everything in
/// `catalog`". The result is validated.
///
/// `--rating` names match the catalog's ratings regardless of case.
pub fn filter_spec(settings: &Settings, catalog: &Catalog) -> Result<FilterSpec> {
    let observed = catalog.observed_ratings();
    let ratings: Vec<Option<String>> = settings
        .rating_selection()
        .into_iter()
        .map(|rating| rating.map(|name| resolve_rating(name, &observed)))
        .collect();

    let spec = FilterSpec::all(catalog)
        .with_year_range(settings.year_min, settings.year_max)
        .with_types(settings.content_types())
        .with_ratings(ratings);
    spec.validate()?;
    Ok(spec)
}

fn resolve_rating(name: String, observed: &BTreeSet<Option<String>>) -> String {
    observed
        .iter()
        .flatten()
        .find(|known| known.eq_ignore_ascii_case(&name))
        .cloned()
        .unwrap_or(name)
}

// ── Tests ──────────────────────────────────────────────────────────────────────
