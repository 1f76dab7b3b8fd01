use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Whether a catalog entry is a film or a series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ContentType {
    #[serde(rename = "Movie")]
    Movie,
    #[serde(rename = "TV Show")]
    TvShow,
}

impl ContentType {
    /// Every content type, in display order.
    pub const ALL: [ContentType; 2] = [ContentType::Movie, ContentType::TvShow];

    /// Parse the source encoding (`"Movie"`, `"TV Show"`).
    ///
    /// Matching ignores case and inner whitespace, so `"TVShow"` and
    /// `"tv show"` are accepted too.
    pub fn parse(s: &str) -> Option<Self> {
        let compact: String = s
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '-' && *c != '_')
            .collect::<String>()
            .to_ascii_lowercase();
        match compact.as_str() {
            "movie" => Some(ContentType::Movie),
            "tvshow" => Some(ContentType::TvShow),
            _ => None,
        }
    }

    /// Label used in tables and charts.
    pub fn label(self) -> &'static str {
        match self {
            ContentType::Movie => "Movie",
            ContentType::TvShow => "TV Show",
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A key in a frequency table or on a cross-tab axis.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Number(i64),
    Text(String),
}

impl FieldValue {
    pub fn text(s: impl Into<String>) -> Self {
        FieldValue::Text(s.into())
    }

    pub fn as_number(&self) -> Option<i64> {
        match self {
            FieldValue::Number(n) => Some(*n),
            FieldValue::Text(_) => None,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Number(n) => write!(f, "{n}"),
            FieldValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

impl From<i64> for FieldValue {
    fn from(n: i64) -> Self {
        FieldValue::Number(n)
    }
}

/// One normalized catalog entry.
///
/// Multi-value fields are `None` when the source cell held no values; they
/// are never `Some(vec![])`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogRow {
    /// `show_id` from the source, or `row-<n>` when the column is absent.
    pub id: String,
    pub content_type: ContentType,
    pub title: String,
    pub director: Option<Vec<String>>,
    pub cast: Option<Vec<String>>,
    pub country: Option<Vec<String>>,
    pub date_added: Option<NaiveDate>,
    pub release_year: i32,
    pub rating: Option<String>,
    /// Raw duration text, e.g. `"90 min"` or `"3 Seasons"`.
    pub duration: Option<String>,
    pub genres: Option<Vec<String>>,
    pub description: Option<String>,

    // Derived at normalization time.
    pub added_year: Option<i32>,
    /// Calendar month 1-12.
    pub added_month: Option<u32>,
    /// Only ever set on movies.
    pub duration_minutes: Option<u32>,
    /// Only ever set on TV shows.
    pub season_count: Option<u32>,
}

impl CatalogRow {
    /// Value of a single-valued field, or `None` when absent.
    pub fn value_of(&self, field: Field) -> Option<FieldValue> {
        match field {
            Field::Type => Some(FieldValue::text(self.content_type.label())),
            Field::Rating => self.rating.as_deref().map(FieldValue::from),
            Field::ReleaseYear => Some(FieldValue::Number(i64::from(self.release_year))),
            Field::AddedYear => self.added_year.map(|y| FieldValue::Number(i64::from(y))),
            Field::AddedMonth => self.added_month.map(|m| FieldValue::Number(i64::from(m))),
            Field::DurationMinutes => self
                .duration_minutes
                .map(|m| FieldValue::Number(i64::from(m))),
            Field::SeasonCount => self.season_count.map(|s| FieldValue::Number(i64::from(s))),
        }
    }

    /// Values of a multi-value field; empty slice when absent.
    pub fn values_of(&self, field: MultiValueField) -> &[String] {
        let values = match field {
            MultiValueField::Genres => &self.genres,
            MultiValueField::Country => &self.country,
            MultiValueField::Director => &self.director,
            MultiValueField::Cast => &self.cast,
        };
        values.as_deref().unwrap_or(&[])
    }

    /// Value of a time axis, or `None` when absent.
    pub fn time_of(&self, field: TimeField) -> Option<i64> {
        match field {
            TimeField::ReleaseYear => Some(i64::from(self.release_year)),
            TimeField::AddedYear => self.added_year.map(i64::from),
            TimeField::AddedMonth => self.added_month.map(i64::from),
        }
    }

    /// Value of a numeric measure, or `None` when absent.
    pub fn number_of(&self, field: NumericField) -> Option<f64> {
        match field {
            NumericField::ReleaseYear => Some(f64::from(self.release_year)),
            NumericField::AddedYear => self.added_year.map(f64::from),
            NumericField::DurationMinutes => self.duration_minutes.map(f64::from),
            NumericField::SeasonCount => self.season_count.map(f64::from),
        }
    }

    /// Recompute the derived date columns from `date_added`.
    pub fn set_date_added(&mut self, date: Option<NaiveDate>) {
        self.date_added = date;
        self.added_year = date.map(|d| d.year());
        self.added_month = date.map(|d| d.month());
    }
}

/// Single-valued categorical or numeric fields that can be counted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Type,
    Rating,
    ReleaseYear,
    AddedYear,
    AddedMonth,
    DurationMinutes,
    SeasonCount,
}

/// Fields whose source encoding is a comma-separated list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MultiValueField {
    Genres,
    Country,
    Director,
    Cast,
}

/// Fields usable as the x-axis of a time series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeField {
    ReleaseYear,
    AddedYear,
    AddedMonth,
}

/// Numeric measures usable for means and trends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NumericField {
    ReleaseYear,
    AddedYear,
    DurationMinutes,
    SeasonCount,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_row(content_type: ContentType, year: i32) -> CatalogRow {
        CatalogRow {
            id: "s1".to_string(),
            content_type,
            title: "Title".to_string(),
            director: None,
            cast: None,
            country: None,
            date_added: None,
            release_year: year,
            rating: None,
            duration: None,
            genres: None,
            description: None,
            added_year: None,
            added_month: None,
            duration_minutes: None,
            season_count: None,
        }
    }

    #[test]
    fn test_content_type_parse_variants() {
        assert_eq!(ContentType::parse("Movie"), Some(ContentType::Movie));
        assert_eq!(ContentType::parse("TV Show"), Some(ContentType::TvShow));
        assert_eq!(ContentType::parse("TVShow"), Some(ContentType::TvShow));
        assert_eq!(ContentType::parse(" tv show "), Some(ContentType::TvShow));
        assert_eq!(ContentType::parse("Podcast"), None);
        assert_eq!(ContentType::parse(""), None);
    }

    #[test]
    fn test_content_type_serializes_as_label() {
        let json = serde_json::to_string(&ContentType::TvShow).unwrap();
        assert_eq!(json, "\"TV Show\"");
        assert_eq!(ContentType::Movie.to_string(), "Movie");
    }

    #[test]
    fn test_field_value_display_and_serialize() {
        assert_eq!(FieldValue::Number(2019).to_string(), "2019");
        assert_eq!(FieldValue::text("Drama").to_string(), "Drama");
        assert_eq!(serde_json::to_string(&FieldValue::Number(7)).unwrap(), "7");
        assert_eq!(
            serde_json::to_string(&FieldValue::text("TV-MA")).unwrap(),
            "\"TV-MA\""
        );
    }

    #[test]
    fn test_value_of_absent_fields() {
        let row = make_row(ContentType::Movie, 2015);
        assert_eq!(row.value_of(Field::Type), Some(FieldValue::text("Movie")));
        assert_eq!(row.value_of(Field::ReleaseYear), Some(FieldValue::Number(2015)));
        assert_eq!(row.value_of(Field::Rating), None);
        assert_eq!(row.value_of(Field::AddedYear), None);
        assert!(row.values_of(MultiValueField::Genres).is_empty());
        assert_eq!(row.time_of(TimeField::AddedYear), None);
        assert_eq!(row.number_of(NumericField::DurationMinutes), None);
    }

    #[test]
    fn test_set_date_added_derives_year_and_month() {
        let mut row = make_row(ContentType::TvShow, 2018);
        row.set_date_added(NaiveDate::from_ymd_opt(2021, 9, 25));
        assert_eq!(row.added_year, Some(2021));
        assert_eq!(row.added_month, Some(9));

        row.set_date_added(None);
        assert_eq!(row.added_year, None);
        assert_eq!(row.added_month, None);
    }
}
