//! Text and JSON rendering of a dashboard analysis.
//!
//! Empty or undefined results always print the [`NO_DATA`] placeholder
//! instead of an empty table.

use catalog_core::formatting::{format_count, format_decimal, format_runtime, format_share};
use catalog_core::models::{CatalogRow, FieldValue, TimeField};
use catalog_core::parsing::month_name;
use catalog_core::settings::Settings;
use catalog_data::aggregator::{CrossTab, FrequencyTable, TimeSeries};
use catalog_data::analysis::{ids, AggregationResult, DashboardAnalysis};
use catalog_data::catalog::{Catalog, LoadReport};
use catalog_data::filter::FilterSpec;
use catalog_data::trend::{Trend, UndefinedReason};
use serde::Serialize;

pub const NO_DATA: &str = "(no data)";

/// Rows printed per frequency table when `--top` is not given.
const DEFAULT_TABLE_ROWS: usize = 20;

/// Presentation switches taken from the command line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderOptions {
    /// Caps the rows printed per frequency table.
    pub top: Option<usize>,
    pub show_errors: bool,
    /// Print at most this many of the filtered titles themselves.
    pub show_rows: Option<usize>,
}

impl RenderOptions {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            top: settings.top,
            show_errors: settings.show_errors,
            show_rows: settings.show_rows,
        }
    }
}

// ── JSON ──────────────────────────────────────────────────────────────────────

#[derive(Serialize)]
struct JsonOutput<'a> {
    load: &'a LoadReport,
    analysis: &'a DashboardAnalysis,
    #[serde(skip_serializing_if = "Option::is_none")]
    rows: Option<Vec<&'a CatalogRow>>,
}

/// Pretty JSON with the load report and the analysis side by side, plus the
/// first filtered rows when `show_rows` asks for them.
pub fn render_json(
    analysis: &DashboardAnalysis,
    catalog: &Catalog,
    options: RenderOptions,
) -> serde_json::Result<String> {
    let rows = options
        .show_rows
        .map(|limit| analysis.filtered_rows(catalog).take(limit).collect());
    serde_json::to_string_pretty(&JsonOutput {
        load: catalog.report(),
        analysis,
        rows,
    })
}

// ── Text ──────────────────────────────────────────────────────────────────────

/// Plain-text dashboard.
///
/// `options.top` caps the rows printed per frequency table; leaderboards are
/// already sized by the battery.
pub fn render_text(analysis: &DashboardAnalysis, catalog: &Catalog, options: RenderOptions) -> String {
    let mut lines = Vec::new();
    let meta = &analysis.metadata;
    let report = catalog.report();

    lines.push(format!(
        "Catalog {}: {} titles loaded, {} rows dropped",
        meta.catalog_id.short(),
        format_count(report.rows_loaded),
        format_count(report.rows_dropped())
    ));
    lines.push(format!("Filter: {}", describe_filter(&analysis.spec)));
    lines.push(format!(
        "Showing {} of {} titles ({})",
        format_count(meta.rows_after_filter),
        format_count(meta.rows_in_catalog),
        format_share(meta.rows_after_filter, meta.rows_in_catalog)
    ));

    let limit = options.top.unwrap_or(DEFAULT_TABLE_ROWS);
    for (id, result) in analysis.results.iter() {
        lines.push(String::new());
        match result {
            AggregationResult::Count { value } => {
                lines.push(format!("{}: {}", title_for(id), format_count(*value)));
            }
            AggregationResult::Mean { value } => {
                let shown = match value {
                    None => NO_DATA.to_string(),
                    Some(v) if id == ids::AVG_MOVIE_DURATION_MINUTES => format_runtime(*v),
                    Some(v) => format_decimal(*v, 1),
                };
                lines.push(format!("{}: {}", title_for(id), shown));
            }
            AggregationResult::Frequency { table } => {
                lines.push(title_for(id).to_string());
                lines.extend(frequency_lines(table, limit));
            }
            AggregationResult::Series { series } => {
                lines.push(title_for(id).to_string());
                lines.extend(series_lines(series));
            }
            AggregationResult::Matrix { matrix } => {
                lines.push(title_for(id).to_string());
                lines.extend(matrix_lines(matrix));
            }
            AggregationResult::Trend { trend } => {
                lines.push(format!("{}: {}", title_for(id), describe_trend(trend)));
            }
        }
    }

    if let Some(limit) = options.show_rows {
        lines.push(String::new());
        lines.push("Filtered titles".to_string());
        let rows: Vec<&CatalogRow> = analysis.filtered_rows(catalog).take(limit).collect();
        lines.extend(raw_row_lines(&rows, meta.rows_after_filter));
    }

    if options.show_errors && !report.errors.is_empty() {
        lines.push(String::new());
        lines.push("Dropped rows".to_string());
        lines.extend(report.errors.iter().map(|e| format!("  {e}")));
    }

    lines.push(String::new());
    lines.join("\n")
}

fn title_for(id: &str) -> &str {
    match id {
        ids::TOTAL_TITLES => "Total titles",
        ids::MOVIE_COUNT => "Movies",
        ids::TV_SHOW_COUNT => "TV shows",
        ids::AVG_MOVIE_DURATION_MINUTES => "Average movie length",
        ids::AVG_SEASON_COUNT => "Average seasons per show",
        ids::DISTINCT_COUNTRIES => "Producing countries",
        ids::DISTINCT_GENRES => "Genres",
        ids::COUNT_BY_TYPE => "Titles by type",
        ids::COUNT_BY_RATING => "Titles by rating",
        ids::BOTTOM_5_RATINGS => "Least common ratings",
        ids::ADDED_BY_YEAR_AND_TYPE => "Titles added per year",
        ids::RELEASES_BY_YEAR_AND_TYPE => "Titles released per year",
        ids::ADDED_BY_MONTH => "Titles added per month",
        ids::TOP_10_COUNTRIES => "Top 10 countries",
        ids::TOP_15_GENRES => "Top 15 genres",
        ids::TOP_10_DIRECTORS => "Top 10 directors",
        ids::TOP_10_CAST => "Top 10 cast members",
        ids::MOVIE_DURATION_DISTRIBUTION => "Movie lengths (minutes)",
        ids::SEASON_COUNT_DISTRIBUTION => "Seasons per show",
        ids::RATING_BY_TYPE_CROSS_TAB => "Ratings by type",
        ids::MOVIE_DURATION_TREND => "Movie length trend",
        other => other,
    }
}

fn describe_filter(spec: &FilterSpec) -> String {
    let years = if spec.year_range.min == i32::MIN && spec.year_range.max == i32::MAX {
        "all years".to_string()
    } else {
        format!("{}–{}", spec.year_range.min, spec.year_range.max)
    };
    let types: Vec<&str> = spec.types.iter().map(|t| t.label()).collect();
    let ratings: Vec<&str> = spec
        .ratings
        .iter()
        .map(|r| r.as_deref().unwrap_or("unrated"))
        .collect();
    format!(
        "{}; types: {}; ratings: {}",
        years,
        types.join(", "),
        if ratings.is_empty() {
            "none".to_string()
        } else {
            ratings.join(", ")
        }
    )
}

fn frequency_lines(table: &FrequencyTable, limit: usize) -> Vec<String> {
    if table.is_empty() {
        return vec![format!("  {NO_DATA}")];
    }
    let total = table.total();
    let shown = &table.entries()[..table.len().min(limit)];
    let width = shown
        .iter()
        .map(|e| e.value.to_string().chars().count())
        .max()
        .unwrap_or(0);

    let mut lines: Vec<String> = shown
        .iter()
        .map(|e| {
            format!(
                "  {:<width$}  {:>7}  {:>6}",
                e.value.to_string(),
                format_count(e.count),
                format_share(e.count, total),
            )
        })
        .collect();
    if table.len() > shown.len() {
        lines.push(format!("  … {} more", table.len() - shown.len()));
    }
    lines
}

fn time_label(field: TimeField, time: i64) -> String {
    match field {
        TimeField::AddedMonth => u32::try_from(time)
            .ok()
            .and_then(month_name)
            .map(str::to_string)
            .unwrap_or_else(|| time.to_string()),
        TimeField::ReleaseYear | TimeField::AddedYear => time.to_string(),
    }
}

fn series_lines(series: &TimeSeries) -> Vec<String> {
    if series.is_empty() {
        return vec![format!("  {NO_DATA}")];
    }
    let mut lines = Vec::new();
    let mut current: Option<i64> = None;
    let mut cells: Vec<String> = Vec::new();

    for point in &series.points {
        if current != Some(point.time) {
            if let Some(time) = current {
                lines.push(format!("  {:<9} {}", time_label(series.time_field, time), cells.join(", ")));
            }
            current = Some(point.time);
            cells.clear();
        }
        cells.push(format!("{}: {}", point.bucket, format_count(point.count)));
    }
    if let Some(time) = current {
        lines.push(format!("  {:<9} {}", time_label(series.time_field, time), cells.join(", ")));
    }
    lines
}

fn matrix_lines(matrix: &CrossTab) -> Vec<String> {
    if matrix.is_empty() {
        return vec![format!("  {NO_DATA}")];
    }
    let label = |v: &FieldValue| v.to_string();
    let row_width = matrix
        .row_labels()
        .iter()
        .map(|v| label(v).chars().count())
        .max()
        .unwrap_or(0);
    let col_widths: Vec<usize> = matrix
        .column_labels()
        .iter()
        .map(|v| label(v).chars().count().max(5))
        .collect();

    let mut header = format!("  {:<row_width$}", "");
    for (col, &width) in matrix.column_labels().iter().zip(&col_widths) {
        header.push_str(&format!("  {:>width$}", label(col)));
    }
    let mut lines = vec![header];

    for (r, row) in matrix.row_labels().iter().enumerate() {
        let mut line = format!("  {:<row_width$}", label(row));
        for (c, &width) in col_widths.iter().enumerate() {
            line.push_str(&format!("  {:>width$}", format_count(matrix.cell(r, c))));
        }
        lines.push(line);
    }
    lines
}

fn raw_row_lines(rows: &[&CatalogRow], total: usize) -> Vec<String> {
    if total == 0 {
        return vec![format!("  {NO_DATA}")];
    }
    let id_width = rows.iter().map(|r| r.id.chars().count()).max().unwrap_or(0);
    let title_width = rows.iter().map(|r| r.title.chars().count()).max().unwrap_or(0);

    let mut lines: Vec<String> = rows
        .iter()
        .map(|r| {
            format!(
                "  {:<id_width$}  {:<7}  {:<title_width$}  {}  {:<8}  {:<10}  {}",
                r.id,
                r.content_type.label(),
                r.title,
                r.release_year,
                r.rating.as_deref().unwrap_or("-"),
                r.duration.as_deref().unwrap_or("-"),
                r.country.as_ref().map(|c| c.join(", ")).unwrap_or_default(),
            )
        })
        .collect();
    if total > rows.len() {
        lines.push(format!("  … {} more", total - rows.len()));
    }
    lines
}

fn describe_trend(trend: &Trend) -> String {
    match trend {
        Trend::Defined {
            slope,
            correlation,
            points,
            ..
        } => format!(
            "{} min per year, r = {} over {} titles",
            format_decimal(*slope, 2),
            format_decimal(*correlation, 2),
            format_count(*points)
        ),
        Trend::Undefined {
            reason: UndefinedReason::TooFewPoints { .. },
        } => NO_DATA.to_string(),
        Trend::Undefined {
            reason: UndefinedReason::ZeroVarianceX,
        } => format!("{NO_DATA} (single release year)"),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
