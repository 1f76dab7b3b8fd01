//! Row filtering by release year, content type and rating.

use std::collections::BTreeSet;

use catalog_core::error::{CatalogError, Result};
use catalog_core::models::{CatalogRow, ContentType};
use serde::{Deserialize, Serialize};

use crate::catalog::Catalog;

// ── YearRange ─────────────────────────────────────────────────────────────────

/// Inclusive range over `release_year`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct YearRange {
    pub min: i32,
    pub max: i32,
}

impl YearRange {
    pub fn new(min: i32, max: i32) -> Self {
        Self { min, max }
    }

    /// A range no year falls outside of.
    pub fn unbounded() -> Self {
        Self::new(i32::MIN, i32::MAX)
    }

    pub fn contains(&self, year: i32) -> bool {
        self.min <= year && year <= self.max
    }
}

// ── FilterSpec ────────────────────────────────────────────────────────────────

/// The active filter constraints of one view.
///
/// Ratings are matched as categories: `None` stands for "unrated" and is
/// selectable like any other rating.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FilterSpec {
    pub year_range: YearRange,
    pub types: BTreeSet<ContentType>,
    pub ratings: BTreeSet<Option<String>>,
}

impl FilterSpec {
    /// A spec that accepts every row of `catalog`.
    ///
    /// For an empty catalog the type set falls back to every known type so
    /// the spec still validates.
    pub fn all(catalog: &Catalog) -> Self {
        let year_range = catalog
            .release_year_bounds()
            .map(|(min, max)| YearRange::new(min, max))
            .unwrap_or_else(YearRange::unbounded);
        let mut types = catalog.observed_types();
        if types.is_empty() {
            types = ContentType::ALL.into_iter().collect();
        }
        Self {
            year_range,
            types,
            ratings: catalog.observed_ratings(),
        }
    }

    /// Narrow the year range; `None` keeps the current bound.
    pub fn with_year_range(mut self, min: Option<i32>, max: Option<i32>) -> Self {
        if let Some(min) = min {
            self.year_range.min = min;
        }
        if let Some(max) = max {
            self.year_range.max = max;
        }
        self
    }

    /// Replace the type selection; an empty selection keeps the current one.
    pub fn with_types(mut self, types: impl IntoIterator<Item = ContentType>) -> Self {
        let types: BTreeSet<ContentType> = types.into_iter().collect();
        if !types.is_empty() {
            self.types = types;
        }
        self
    }

    /// Replace the rating selection; an empty selection keeps the current one.
    pub fn with_ratings(mut self, ratings: impl IntoIterator<Item = Option<String>>) -> Self {
        let ratings: BTreeSet<Option<String>> = ratings.into_iter().collect();
        if !ratings.is_empty() {
            self.ratings = ratings;
        }
        self
    }

    /// Reject selections that can never match anything by construction.
    pub fn validate(&self) -> Result<()> {
        if self.types.is_empty() {
            return Err(CatalogError::InvalidFilter(
                "no content types selected".to_string(),
            ));
        }
        if self.year_range.min > self.year_range.max {
            return Err(CatalogError::InvalidFilter(format!(
                "year range {}..={} is empty",
                self.year_range.min, self.year_range.max
            )));
        }
        Ok(())
    }

    /// Whether `row` passes every constraint.
    pub fn accepts(&self, row: &CatalogRow) -> bool {
        self.year_range.contains(row.release_year)
            && self.types.contains(&row.content_type)
            && self.ratings.contains(&row.rating)
    }
}

/// Rows of `rows` accepted by `spec`, in input order.
pub fn filter<'a>(
    rows: impl IntoIterator<Item = &'a CatalogRow>,
    spec: &FilterSpec,
) -> Vec<&'a CatalogRow> {
    rows.into_iter().filter(|row| spec.accepts(row)).collect()
}

/// Positions in `rows` of the rows accepted by `spec`, ascending.
pub fn filter_positions(rows: &[CatalogRow], spec: &FilterSpec) -> Vec<usize> {
    rows.iter()
        .enumerate()
        .filter(|(_, row)| spec.accepts(row))
        .map(|(pos, _)| pos)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{row, scenario_rows};

    fn spec_for(rows: &[CatalogRow]) -> FilterSpec {
        FilterSpec::all(&Catalog::from_rows(rows.to_vec()))
    }

    #[test]
    fn test_all_accepts_every_row() {
        let rows = scenario_rows();
        let spec = spec_for(&rows);
        assert_eq!(filter(&rows, &spec).len(), rows.len());
        assert!(spec.validate().is_ok());
    }

    #[test]
    fn test_year_range_is_inclusive() {
        let rows = scenario_rows();
        let spec = spec_for(&rows).with_year_range(Some(2016), Some(2020));
        let kept = filter(&rows, &spec);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].content_type, ContentType::TvShow);
        assert_eq!(kept[0].release_year, 2018);

        let spec = spec_for(&rows).with_year_range(Some(2015), Some(2015));
        assert_eq!(filter(&rows, &spec).len(), 2);
    }

    #[test]
    fn test_type_filter() {
        let rows = scenario_rows();
        let spec = spec_for(&rows).with_types([ContentType::Movie]);
        let kept = filter(&rows, &spec);
        assert_eq!(kept.len(), 2);
        assert!(kept.iter().all(|r| r.content_type == ContentType::Movie));
    }

    #[test]
    fn test_unrated_is_a_selectable_category() {
        let rows = vec![
            row(ContentType::Movie, 2015).rating("PG").build(),
            row(ContentType::Movie, 2016).build(),
            row(ContentType::Movie, 2017).rating("R").build(),
        ];

        // Default selection keeps unrated rows.
        assert_eq!(filter(&rows, &spec_for(&rows)).len(), 3);

        let only_pg = spec_for(&rows).with_ratings([Some("PG".to_string())]);
        assert_eq!(filter(&rows, &only_pg).len(), 1);

        let pg_and_unrated = spec_for(&rows).with_ratings([Some("PG".to_string()), None]);
        let kept = filter(&rows, &pg_and_unrated);
        assert_eq!(kept.len(), 2);
        assert_eq!(kept[1].rating, None);
    }

    #[test]
    fn test_filter_is_idempotent() {
        let rows = scenario_rows();
        let spec = spec_for(&rows)
            .with_year_range(Some(2014), Some(2016))
            .with_types([ContentType::Movie]);
        let once = filter(&rows, &spec);
        let twice = filter(once.iter().copied(), &spec);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_empty_selections_keep_previous() {
        let rows = scenario_rows();
        let base = spec_for(&rows);
        let same = base
            .clone()
            .with_types(Vec::new())
            .with_ratings(Vec::new())
            .with_year_range(None, None);
        assert_eq!(base, same);
    }

    #[test]
    fn test_validate_rejects_empty_types_and_inverted_range() {
        let rows = scenario_rows();
        let mut spec = spec_for(&rows);
        spec.types.clear();
        assert!(matches!(
            spec.validate(),
            Err(CatalogError::InvalidFilter(_))
        ));

        let spec = spec_for(&rows).with_year_range(Some(2020), Some(2010));
        assert!(spec.validate().is_err());
        assert!(filter(&rows, &spec).is_empty());
    }

    #[test]
    fn test_positions_follow_input_order() {
        let rows = scenario_rows();
        let spec = spec_for(&rows).with_types([ContentType::Movie]);
        let positions = filter_positions(&rows, &spec);

        let kept: Vec<&CatalogRow> = positions.iter().map(|&pos| &rows[pos]).collect();
        assert_eq!(kept, filter(&rows, &spec));
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_all_on_empty_catalog_validates() {
        let spec = FilterSpec::all(&Catalog::from_rows(Vec::new()));
        assert!(spec.validate().is_ok());
        assert_eq!(spec.types.len(), 2);
        assert_eq!(spec.year_range, YearRange::unbounded());
    }

    #[test]
    fn test_spec_is_hashable_key() {
        use std::collections::HashSet;
        let rows = scenario_rows();
        let a = spec_for(&rows);
        let b = spec_for(&rows);
        let set: HashSet<FilterSpec> = [a, b].into_iter().collect();
        assert_eq!(set.len(), 1);
    }
}
