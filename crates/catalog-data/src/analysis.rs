//! The dashboard battery: filter a catalog and compute every named result.
//!
//! [`analyze`] is the one entry point the runtime and the binary call. It
//! validates the [`FilterSpec`], filters the catalog, runs
//! [`build_dashboard`] over the survivors and wraps everything with
//! [`AnalysisMetadata`].

use std::time::Instant;

use catalog_core::error::Result;
use catalog_core::models::{
    CatalogRow, ContentType, Field, MultiValueField, NumericField, TimeField,
};
use chrono::Utc;
use indexmap::IndexMap;
use serde::Serialize;
use tracing::debug;

use crate::aggregator::{
    bottom_n, count_by, cross_tab, distinct_count, explode_count_by, grouped_time_series, mean_of,
    top_n, CrossTab, FrequencyTable, TimeSeries,
};
use crate::catalog::{Catalog, CatalogId};
use crate::filter::{filter_positions, FilterSpec};
use crate::trend::{linear_trend, Trend};

/// Stable result identifiers.
pub mod ids {
    pub const TOTAL_TITLES: &str = "totalTitles";
    pub const MOVIE_COUNT: &str = "movieCount";
    pub const TV_SHOW_COUNT: &str = "tvShowCount";
    pub const AVG_MOVIE_DURATION_MINUTES: &str = "avgMovieDurationMinutes";
    pub const AVG_SEASON_COUNT: &str = "avgSeasonCount";
    pub const DISTINCT_COUNTRIES: &str = "distinctCountries";
    pub const DISTINCT_GENRES: &str = "distinctGenres";
    pub const COUNT_BY_TYPE: &str = "countByType";
    pub const COUNT_BY_RATING: &str = "countByRating";
    pub const BOTTOM_5_RATINGS: &str = "bottom5Ratings";
    pub const ADDED_BY_YEAR_AND_TYPE: &str = "addedByYearAndType";
    pub const RELEASES_BY_YEAR_AND_TYPE: &str = "releasesByYearAndType";
    pub const ADDED_BY_MONTH: &str = "addedByMonth";
    pub const TOP_10_COUNTRIES: &str = "top10Countries";
    pub const TOP_15_GENRES: &str = "top15Genres";
    pub const TOP_10_DIRECTORS: &str = "top10Directors";
    pub const TOP_10_CAST: &str = "top10Cast";
    pub const MOVIE_DURATION_DISTRIBUTION: &str = "movieDurationDistribution";
    pub const SEASON_COUNT_DISTRIBUTION: &str = "seasonCountDistribution";
    pub const RATING_BY_TYPE_CROSS_TAB: &str = "ratingByTypeCrossTab";
    pub const MOVIE_DURATION_TREND: &str = "movieDurationTrend";
}

// ── Result types ──────────────────────────────────────────────────────────────

/// One named output of the battery.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AggregationResult {
    Count { value: usize },
    Mean { value: Option<f64> },
    Frequency { table: FrequencyTable },
    Series { series: TimeSeries },
    Matrix { matrix: CrossTab },
    Trend { trend: Trend },
}

impl AggregationResult {
    /// Whether a presentation layer should show a "no data" placeholder.
    ///
    /// Counts are never empty; a zero is a real answer.
    pub fn is_empty(&self) -> bool {
        match self {
            AggregationResult::Count { .. } => false,
            AggregationResult::Mean { value } => value.is_none(),
            AggregationResult::Frequency { table } => table.is_empty(),
            AggregationResult::Series { series } => series.is_empty(),
            AggregationResult::Matrix { matrix } => matrix.is_empty(),
            AggregationResult::Trend { trend } => !trend.is_defined(),
        }
    }
}

/// Results keyed by stable identifier, in battery order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ResultSet {
    results: IndexMap<String, AggregationResult>,
}

impl ResultSet {
    fn insert(&mut self, id: &str, result: AggregationResult) {
        self.results.insert(id.to_string(), result);
    }

    pub fn get(&self, id: &str) -> Option<&AggregationResult> {
        self.results.get(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &AggregationResult)> {
        self.results.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

/// Metadata produced alongside a battery run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisMetadata {
    /// ISO-8601 timestamp when this result was generated.
    pub generated_at: String,
    pub catalog_id: CatalogId,
    pub rows_in_catalog: usize,
    pub rows_after_filter: usize,
    /// Wall-clock seconds spent filtering and aggregating.
    pub compute_time_seconds: f64,
}

/// The complete output of [`analyze`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardAnalysis {
    pub spec: FilterSpec,
    pub metadata: AnalysisMetadata,
    pub results: ResultSet,
    /// Catalog positions of the rows that passed the filter, in input order.
    #[serde(skip)]
    pub row_positions: Vec<usize>,
}

impl DashboardAnalysis {
    /// The filtered rows, looked up in the catalog this analysis was
    /// computed from.
    pub fn filtered_rows<'a>(
        &'a self,
        catalog: &'a Catalog,
    ) -> impl Iterator<Item = &'a CatalogRow> + 'a {
        self.row_positions
            .iter()
            .filter_map(|&pos| catalog.rows().get(pos))
    }
}

// ── Public functions ──────────────────────────────────────────────────────────

/// Validate `spec`, filter `catalog` and run the battery.
pub fn analyze(catalog: &Catalog, spec: &FilterSpec) -> Result<DashboardAnalysis> {
    spec.validate()?;

    let start = Instant::now();
    let row_positions = filter_positions(catalog.rows(), spec);
    let rows: Vec<&CatalogRow> = row_positions
        .iter()
        .filter_map(|&pos| catalog.rows().get(pos))
        .collect();
    let results = build_dashboard(&rows);
    let compute_time = start.elapsed().as_secs_f64();

    debug!(
        catalog = catalog.id().short(),
        rows = rows.len(),
        results = results.len(),
        "dashboard computed in {:.3}s",
        compute_time
    );

    Ok(DashboardAnalysis {
        spec: spec.clone(),
        metadata: AnalysisMetadata {
            generated_at: Utc::now().to_rfc3339(),
            catalog_id: catalog.id().clone(),
            rows_in_catalog: catalog.len(),
            rows_after_filter: rows.len(),
            compute_time_seconds: compute_time,
        },
        results,
        row_positions,
    })
}

/// Compute every named result over already-filtered rows.
pub fn build_dashboard(rows: &[&CatalogRow]) -> ResultSet {
    let movies = of_type(rows, ContentType::Movie);
    let shows = of_type(rows, ContentType::TvShow);
    let ratings = count_by(rows, Field::Rating);

    let mut set = ResultSet::default();

    // ── KPI cards ─────────────────────────────────────────────────────────────
    set.insert(ids::TOTAL_TITLES, count(rows.len()));
    set.insert(ids::MOVIE_COUNT, count(movies.len()));
    set.insert(ids::TV_SHOW_COUNT, count(shows.len()));
    set.insert(
        ids::AVG_MOVIE_DURATION_MINUTES,
        AggregationResult::Mean {
            value: mean_of(&movies, NumericField::DurationMinutes),
        },
    );
    set.insert(
        ids::AVG_SEASON_COUNT,
        AggregationResult::Mean {
            value: mean_of(&shows, NumericField::SeasonCount),
        },
    );
    set.insert(
        ids::DISTINCT_COUNTRIES,
        count(distinct_count(rows, MultiValueField::Country)),
    );
    set.insert(
        ids::DISTINCT_GENRES,
        count(distinct_count(rows, MultiValueField::Genres)),
    );

    // ── Composition ───────────────────────────────────────────────────────────
    set.insert(ids::COUNT_BY_TYPE, frequency(count_by(rows, Field::Type)));
    let rarest_ratings = bottom_n(&ratings, 5);
    set.insert(ids::COUNT_BY_RATING, frequency(ratings));
    set.insert(ids::BOTTOM_5_RATINGS, frequency(rarest_ratings));

    // ── Over time ─────────────────────────────────────────────────────────────
    set.insert(
        ids::ADDED_BY_YEAR_AND_TYPE,
        series(grouped_time_series(rows, TimeField::AddedYear, Field::Type)),
    );
    set.insert(
        ids::RELEASES_BY_YEAR_AND_TYPE,
        series(grouped_time_series(rows, TimeField::ReleaseYear, Field::Type)),
    );
    set.insert(
        ids::ADDED_BY_MONTH,
        series(grouped_time_series(rows, TimeField::AddedMonth, Field::Type)),
    );

    // ── Leaderboards ──────────────────────────────────────────────────────────
    let leaderboards = [
        (ids::TOP_10_COUNTRIES, MultiValueField::Country, 10),
        (ids::TOP_15_GENRES, MultiValueField::Genres, 15),
        (ids::TOP_10_DIRECTORS, MultiValueField::Director, 10),
        (ids::TOP_10_CAST, MultiValueField::Cast, 10),
    ];
    for (id, field, n) in leaderboards {
        set.insert(id, frequency(top_n(&explode_count_by(rows, field), n)));
    }

    // ── Durations ─────────────────────────────────────────────────────────────
    set.insert(
        ids::MOVIE_DURATION_DISTRIBUTION,
        frequency(count_by(&movies, Field::DurationMinutes)),
    );
    set.insert(
        ids::SEASON_COUNT_DISTRIBUTION,
        frequency(count_by(&shows, Field::SeasonCount)),
    );

    set.insert(
        ids::RATING_BY_TYPE_CROSS_TAB,
        AggregationResult::Matrix {
            matrix: cross_tab(rows, Field::Rating, Field::Type),
        },
    );

    let duration_points: Vec<(f64, f64)> = movies
        .iter()
        .filter_map(|row| {
            row.duration_minutes
                .map(|minutes| (f64::from(row.release_year), f64::from(minutes)))
        })
        .collect();
    set.insert(
        ids::MOVIE_DURATION_TREND,
        AggregationResult::Trend {
            trend: linear_trend(&duration_points),
        },
    );

    set
}

// ── Private helpers ───────────────────────────────────────────────────────────

fn of_type<'a>(rows: &[&'a CatalogRow], content_type: ContentType) -> Vec<&'a CatalogRow> {
    rows.iter()
        .copied()
        .filter(|row| row.content_type == content_type)
        .collect()
}

fn count(value: usize) -> AggregationResult {
    AggregationResult::Count { value }
}

fn frequency(table: FrequencyTable) -> AggregationResult {
    AggregationResult::Frequency { table }
}

fn series(series: TimeSeries) -> AggregationResult {
    AggregationResult::Series { series }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{row, scenario_rows};
    use catalog_core::error::CatalogError;
    use catalog_core::models::FieldValue;

    fn sample_rows() -> Vec<CatalogRow> {
        vec![
            row(ContentType::Movie, 2010)
                .rating("PG")
                .minutes(90)
                .country("US, UK")
                .genres("Dramas")
                .director("Jane Doe")
                .added(2019, 3)
                .build(),
            row(ContentType::Movie, 2014)
                .rating("R")
                .minutes(110)
                .country("US")
                .genres("Dramas, Comedies")
                .cast("A, B")
                .added(2020, 3)
                .build(),
            row(ContentType::TvShow, 2018)
                .rating("TV-MA")
                .seasons(2)
                .country("IN")
                .genres("TV Dramas")
                .added(2020, 7)
                .build(),
            row(ContentType::TvShow, 2020).seasons(4).build(),
        ]
    }

    fn count_value(set: &ResultSet, id: &str) -> usize {
        match set.get(id) {
            Some(AggregationResult::Count { value }) => *value,
            other => panic!("{id} is not a count: {other:?}"),
        }
    }

    fn table<'a>(set: &'a ResultSet, id: &str) -> &'a FrequencyTable {
        match set.get(id) {
            Some(AggregationResult::Frequency { table }) => table,
            other => panic!("{id} is not a frequency table: {other:?}"),
        }
    }

    #[test]
    fn test_battery_has_every_id_in_order() {
        let rows = sample_rows();
        let refs: Vec<&CatalogRow> = rows.iter().collect();
        let set = build_dashboard(&refs);

        let got: Vec<&str> = set.iter().map(|(id, _)| id).collect();
        assert_eq!(set.len(), 21);
        assert_eq!(got[0], ids::TOTAL_TITLES);
        assert_eq!(got[20], ids::MOVIE_DURATION_TREND);
        assert!(set.get(ids::RATING_BY_TYPE_CROSS_TAB).is_some());
    }

    #[test]
    fn test_kpis() {
        let rows = sample_rows();
        let refs: Vec<&CatalogRow> = rows.iter().collect();
        let set = build_dashboard(&refs);

        assert_eq!(count_value(&set, ids::TOTAL_TITLES), 4);
        assert_eq!(count_value(&set, ids::MOVIE_COUNT), 2);
        assert_eq!(count_value(&set, ids::TV_SHOW_COUNT), 2);
        assert_eq!(count_value(&set, ids::DISTINCT_COUNTRIES), 3);
        assert_eq!(count_value(&set, ids::DISTINCT_GENRES), 3);
        assert_eq!(
            set.get(ids::AVG_MOVIE_DURATION_MINUTES),
            Some(&AggregationResult::Mean { value: Some(100.0) })
        );
        assert_eq!(
            set.get(ids::AVG_SEASON_COUNT),
            Some(&AggregationResult::Mean { value: Some(3.0) })
        );
    }

    #[test]
    fn test_leaderboards_and_distributions() {
        let rows = sample_rows();
        let refs: Vec<&CatalogRow> = rows.iter().collect();
        let set = build_dashboard(&refs);

        let countries = table(&set, ids::TOP_10_COUNTRIES);
        assert_eq!(countries.entries()[0].value, FieldValue::text("US"));
        assert_eq!(countries.entries()[0].count, 2);

        let durations = table(&set, ids::MOVIE_DURATION_DISTRIBUTION);
        assert_eq!(durations.get(&FieldValue::Number(90)), 1);
        assert_eq!(durations.get(&FieldValue::Number(110)), 1);

        let seasons = table(&set, ids::SEASON_COUNT_DISTRIBUTION);
        assert_eq!(seasons.total(), 2);

        // Unrated rows are not part of the rating table.
        assert_eq!(table(&set, ids::COUNT_BY_RATING).total(), 3);
        assert_eq!(table(&set, ids::BOTTOM_5_RATINGS).len(), 3);
    }

    #[test]
    fn test_duration_trend_over_movies() {
        let rows = sample_rows();
        let refs: Vec<&CatalogRow> = rows.iter().collect();
        let set = build_dashboard(&refs);

        match set.get(ids::MOVIE_DURATION_TREND) {
            Some(AggregationResult::Trend { trend }) => {
                assert!((trend.slope().unwrap() - 5.0).abs() < 1e-9);
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_empty_rows_render_as_no_data() {
        let set = build_dashboard(&[]);
        assert_eq!(count_value(&set, ids::TOTAL_TITLES), 0);
        let empty: Vec<&str> = set
            .iter()
            .filter(|(_, result)| result.is_empty())
            .map(|(id, _)| id)
            .collect();
        // Only the five plain counts carry data.
        assert_eq!(empty.len(), 21 - 5);
        assert!(empty.contains(&ids::MOVIE_DURATION_TREND));
        assert!(empty.contains(&ids::AVG_MOVIE_DURATION_MINUTES));
    }

    #[test]
    fn test_analyze_filters_then_aggregates() {
        let catalog = Catalog::from_rows(scenario_rows());
        let spec = FilterSpec::all(&catalog).with_year_range(Some(2016), Some(2020));
        let analysis = analyze(&catalog, &spec).unwrap();

        assert_eq!(analysis.metadata.rows_in_catalog, 3);
        assert_eq!(analysis.metadata.rows_after_filter, 1);
        assert_eq!(&analysis.metadata.catalog_id, catalog.id());
        assert_eq!(count_value(&analysis.results, ids::TV_SHOW_COUNT), 1);
        assert_eq!(count_value(&analysis.results, ids::MOVIE_COUNT), 0);

        assert_eq!(analysis.row_positions, vec![1]);
        let kept: Vec<&CatalogRow> = analysis.filtered_rows(&catalog).collect();
        assert_eq!(kept, vec![&catalog.rows()[1]]);
    }

    #[test]
    fn test_analyze_rejects_invalid_spec() {
        let catalog = Catalog::from_rows(scenario_rows());
        let spec = FilterSpec::all(&catalog).with_year_range(Some(2020), Some(2000));
        let err = analyze(&catalog, &spec).unwrap_err();
        assert!(matches!(err, CatalogError::InvalidFilter(_)));
    }

    #[test]
    fn test_result_set_serializes_with_kind_tags() {
        let catalog = Catalog::from_rows(scenario_rows());
        let analysis = analyze(&catalog, &FilterSpec::all(&catalog)).unwrap();
        let json = serde_json::to_value(&analysis).unwrap();

        assert_eq!(json["results"]["totalTitles"]["kind"], "count");
        assert_eq!(json["results"]["totalTitles"]["value"], 3);
        assert_eq!(json["results"]["countByType"]["kind"], "frequency");
        assert_eq!(json["results"]["countByType"]["table"][0]["value"], "Movie");
        assert!(json.get("row_positions").is_none());
        assert_eq!(json["results"]["countByType"]["table"][0]["count"], 2);
        assert_eq!(json["metadata"]["rows_after_filter"], 3);
    }
}
