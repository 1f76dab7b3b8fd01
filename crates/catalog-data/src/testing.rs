//! Row fixtures shared by the unit tests of this crate.

use catalog_core::models::{CatalogRow, ContentType};
use catalog_core::parsing::split_multi_value;
use chrono::NaiveDate;

pub(crate) struct RowBuilder {
    row: CatalogRow,
}

pub(crate) fn row(content_type: ContentType, release_year: i32) -> RowBuilder {
    RowBuilder {
        row: CatalogRow {
            id: format!("{}-{}", content_type.label(), release_year),
            content_type,
            title: String::new(),
            director: None,
            cast: None,
            country: None,
            date_added: None,
            release_year,
            rating: None,
            duration: None,
            genres: None,
            description: None,
            added_year: None,
            added_month: None,
            duration_minutes: None,
            season_count: None,
        },
    }
}

impl RowBuilder {
    pub(crate) fn rating(mut self, rating: &str) -> Self {
        self.row.rating = Some(rating.to_string());
        self
    }

    pub(crate) fn genres(mut self, genres: &str) -> Self {
        self.row.genres = split_multi_value(Some(genres));
        self
    }

    pub(crate) fn country(mut self, country: &str) -> Self {
        self.row.country = split_multi_value(Some(country));
        self
    }

    pub(crate) fn cast(mut self, cast: &str) -> Self {
        self.row.cast = split_multi_value(Some(cast));
        self
    }

    pub(crate) fn director(mut self, director: &str) -> Self {
        self.row.director = split_multi_value(Some(director));
        self
    }

    pub(crate) fn added(mut self, year: i32, month: u32) -> Self {
        self.row.set_date_added(NaiveDate::from_ymd_opt(year, month, 1));
        self
    }

    pub(crate) fn minutes(mut self, minutes: u32) -> Self {
        self.row.duration = Some(format!("{minutes} min"));
        self.row.duration_minutes = Some(minutes);
        self
    }

    pub(crate) fn seasons(mut self, seasons: u32) -> Self {
        self.row.duration = Some(format!("{seasons} Seasons"));
        self.row.season_count = Some(seasons);
        self
    }

    pub(crate) fn build(self) -> CatalogRow {
        self.row
    }
}

/// The three-title catalog used throughout the engine tests.
pub(crate) fn scenario_rows() -> Vec<CatalogRow> {
    vec![
        row(ContentType::Movie, 2015)
            .country("US")
            .genres("Drama, Comedy")
            .build(),
        row(ContentType::TvShow, 2018)
            .country("IN")
            .genres("Drama")
            .build(),
        row(ContentType::Movie, 2015).genres("Comedy").build(),
    ]
}
