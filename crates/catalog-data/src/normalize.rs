//! Raw record → [`CatalogRow`] normalization.
//!
//! Each raw record either becomes exactly one row or produces exactly one
//! [`RowError`]; nothing is dropped silently.

use catalog_core::error::RowError;
use catalog_core::models::{CatalogRow, ContentType};
use catalog_core::parsing::{non_blank, split_multi_value, DateParser, DurationParser};
use serde::Deserialize;
use tracing::debug;

/// One record of the source table with every cell kept as text.
///
/// Column names follow the source header; unknown columns are ignored and
/// missing columns read as `None`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct RawRecord {
    /// 1-based data row number; `0` means "use the position in the input".
    #[serde(skip)]
    pub row: usize,
    pub show_id: Option<String>,
    #[serde(rename = "type")]
    pub content_type: Option<String>,
    pub title: Option<String>,
    pub director: Option<String>,
    pub cast: Option<String>,
    pub country: Option<String>,
    pub date_added: Option<String>,
    pub release_year: Option<String>,
    pub rating: Option<String>,
    pub duration: Option<String>,
    pub listed_in: Option<String>,
    pub description: Option<String>,
}

/// Normalize a sequence of raw records.
///
/// Returns the rows that normalized and one error per record that did not.
/// `rows.len() + errors.len() == raw.len()` always holds.
pub fn normalize(raw: &[RawRecord]) -> (Vec<CatalogRow>, Vec<RowError>) {
    let mut rows = Vec::with_capacity(raw.len());
    let mut errors = Vec::new();

    for (index, record) in raw.iter().enumerate() {
        let row_no = if record.row > 0 { record.row } else { index + 1 };
        match normalize_record(record, row_no) {
            Ok(row) => rows.push(row),
            Err(e) => {
                debug!("dropping record: {e}");
                errors.push(e);
            }
        }
    }

    (rows, errors)
}

/// Normalize one record; `row_no` is used for the fallback id and errors.
pub fn normalize_record(record: &RawRecord, row_no: usize) -> Result<CatalogRow, RowError> {
    let content_type = required(record.content_type.as_deref(), "type", row_no)?;
    let content_type = ContentType::parse(content_type).ok_or_else(|| RowError::InvalidField {
        row: row_no,
        field: "type".to_string(),
        value: content_type.to_string(),
    })?;

    let release_year = required(record.release_year.as_deref(), "release_year", row_no)?;
    let release_year = parse_year(release_year).ok_or_else(|| RowError::InvalidField {
        row: row_no,
        field: "release_year".to_string(),
        value: release_year.to_string(),
    })?;

    let duration = non_blank(record.duration.as_deref()).map(str::to_string);
    let duration_number = duration.as_deref().and_then(DurationParser::leading_number);
    let (duration_minutes, season_count) = match content_type {
        ContentType::Movie => (duration_number, None),
        ContentType::TvShow => (None, duration_number),
    };

    let date_added = non_blank(record.date_added.as_deref()).and_then(|s| {
        let parsed = DateParser::parse(s);
        if parsed.is_none() {
            debug!(row = row_no, value = s, "date_added left missing");
        }
        parsed
    });

    let id = non_blank(record.show_id.as_deref())
        .map(str::to_string)
        .unwrap_or_else(|| format!("row-{row_no}"));

    let mut row = CatalogRow {
        id,
        content_type,
        title: non_blank(record.title.as_deref())
            .unwrap_or_default()
            .to_string(),
        director: split_multi_value(record.director.as_deref()),
        cast: split_multi_value(record.cast.as_deref()),
        country: split_multi_value(record.country.as_deref()),
        date_added: None,
        release_year,
        rating: non_blank(record.rating.as_deref()).map(str::to_string),
        duration,
        genres: split_multi_value(record.listed_in.as_deref()),
        description: non_blank(record.description.as_deref()).map(str::to_string),
        added_year: None,
        added_month: None,
        duration_minutes,
        season_count,
    };
    row.set_date_added(date_added);
    Ok(row)
}

// ── Private helpers ───────────────────────────────────────────────────────────

fn required<'a>(cell: Option<&'a str>, field: &str, row: usize) -> Result<&'a str, RowError> {
    non_blank(cell).ok_or_else(|| RowError::MissingField {
        row,
        field: field.to_string(),
    })
}

/// Accepts `"2019"` and spreadsheet-style `"2019.0"`.
fn parse_year(s: &str) -> Option<i32> {
    if let Ok(year) = s.parse::<i32>() {
        return Some(year);
    }
    let f = s.parse::<f64>().ok()?;
    if f.fract() == 0.0 && f >= f64::from(i32::MIN) && f <= f64::from(i32::MAX) {
        Some(f as i32)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(content_type: &str, year: &str) -> RawRecord {
        RawRecord {
            content_type: Some(content_type.to_string()),
            release_year: Some(year.to_string()),
            title: Some("Some Title".to_string()),
            ..Default::default()
        }
    }

    fn with_duration(mut record: RawRecord, duration: &str) -> RawRecord {
        record.duration = Some(duration.to_string());
        record
    }

    #[test]
    fn test_tv_show_seasons_derive_season_count_only() {
        let (rows, errors) = normalize(&[with_duration(raw("TV Show", "2018"), "7 Seasons")]);
        assert!(errors.is_empty());
        assert_eq!(rows[0].content_type, ContentType::TvShow);
        assert_eq!(rows[0].season_count, Some(7));
        assert_eq!(rows[0].duration_minutes, None);
        assert_eq!(rows[0].duration.as_deref(), Some("7 Seasons"));
    }

    #[test]
    fn test_movie_minutes_derive_duration_only() {
        let (rows, _) = normalize(&[with_duration(raw("Movie", "2015"), "90 min")]);
        assert_eq!(rows[0].duration_minutes, Some(90));
        assert_eq!(rows[0].season_count, None);
    }

    #[test]
    fn test_unparseable_duration_leaves_derived_absent() {
        let (rows, errors) = normalize(&[with_duration(raw("Movie", "2015"), "unknown")]);
        assert!(errors.is_empty());
        assert_eq!(rows[0].duration_minutes, None);
        assert_eq!(rows[0].season_count, None);
    }

    #[test]
    fn test_bad_date_keeps_row_with_missing_derived_columns() {
        let mut record = raw("Movie", "2015");
        record.date_added = Some("sometime last year".to_string());
        let (rows, errors) = normalize(&[record]);
        assert!(errors.is_empty());
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].date_added, None);
        assert_eq!(rows[0].added_year, None);
        assert_eq!(rows[0].added_month, None);
    }

    #[test]
    fn test_good_date_derives_year_and_month() {
        let mut record = raw("TV Show", "2021");
        record.date_added = Some(" September 24, 2021".to_string());
        let (rows, _) = normalize(&[record]);
        assert_eq!(rows[0].added_year, Some(2021));
        assert_eq!(rows[0].added_month, Some(9));
    }

    #[test]
    fn test_multi_value_fields_split_and_absent() {
        let mut record = raw("Movie", "2015");
        record.listed_in = Some("Dramas, International Movies".to_string());
        record.country = Some("".to_string());
        record.cast = Some("A, B, C".to_string());
        let (rows, _) = normalize(&[record]);

        assert_eq!(
            rows[0].genres,
            Some(vec!["Dramas".to_string(), "International Movies".to_string()])
        );
        assert_eq!(rows[0].country, None);
        assert_eq!(rows[0].director, None);
        assert_eq!(rows[0].cast.as_ref().map(Vec::len), Some(3));
    }

    #[test]
    fn test_missing_type_is_reported_not_thrown() {
        let mut record = raw("Movie", "2015");
        record.content_type = None;
        let (rows, errors) = normalize(&[record, raw("Movie", "2016")]);

        assert_eq!(rows.len(), 1);
        assert_eq!(
            errors,
            vec![RowError::MissingField {
                row: 1,
                field: "type".to_string()
            }]
        );
    }

    #[test]
    fn test_invalid_type_and_year_are_reported() {
        let (rows, errors) = normalize(&[raw("Podcast", "2015"), raw("Movie", "soon")]);
        assert!(rows.is_empty());
        assert_eq!(errors.len(), 2);
        assert!(matches!(&errors[0], RowError::InvalidField { field, .. } if field == "type"));
        assert!(
            matches!(&errors[1], RowError::InvalidField { row: 2, field, .. } if field == "release_year")
        );
    }

    #[test]
    fn test_counts_add_up_to_input() {
        let mut missing_year = raw("Movie", "");
        missing_year.release_year = None;
        let input = vec![
            raw("Movie", "2015"),
            missing_year,
            raw("TV Show", "2018"),
            raw("Cartoon", "2001"),
            raw("Movie", "2019.0"),
        ];
        let (rows, errors) = normalize(&input);
        assert_eq!(rows.len() + errors.len(), input.len());
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[2].release_year, 2019);
    }

    #[test]
    fn test_empty_input_is_empty_catalog() {
        let (rows, errors) = normalize(&[]);
        assert!(rows.is_empty());
        assert!(errors.is_empty());
    }

    #[test]
    fn test_id_falls_back_to_row_number() {
        let mut with_id = raw("Movie", "2015");
        with_id.show_id = Some("s42".to_string());
        let mut explicit_row = raw("Movie", "2015");
        explicit_row.row = 10;
        let (rows, _) = normalize(&[with_id, raw("Movie", "2016"), explicit_row]);
        assert_eq!(rows[0].id, "s42");
        assert_eq!(rows[1].id, "row-2");
        assert_eq!(rows[2].id, "row-10");
    }

    #[test]
    fn test_blank_rating_is_absent() {
        let mut record = raw("Movie", "2015");
        record.rating = Some("   ".to_string());
        let (rows, _) = normalize(&[record]);
        assert_eq!(rows[0].rating, None);
    }
}
