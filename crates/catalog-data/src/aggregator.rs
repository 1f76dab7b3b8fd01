//! Grouped counts, exploded multi-value counts, time series and cross tabs.
//!
//! Every function here is pure and total: an empty row set yields an empty
//! result, never an error. Ordering is deterministic for a given input
//! order: frequency tables sort by count descending and break ties by the
//! order in which values were first encountered.

use catalog_core::models::{CatalogRow, Field, FieldValue, MultiValueField, NumericField, TimeField};
use indexmap::{IndexMap, IndexSet};
use serde::Serialize;

// ── FrequencyTable ────────────────────────────────────────────────────────────

/// One value and how often it occurred.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FrequencyEntry {
    pub value: FieldValue,
    pub count: usize,
}

/// Value → count, ordered by count descending then first encounter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FrequencyTable {
    entries: Vec<FrequencyEntry>,
}

impl FrequencyTable {
    /// Build from counts kept in first-encountered order.
    fn from_counts(counts: IndexMap<FieldValue, usize>) -> Self {
        let mut entries: Vec<FrequencyEntry> = counts
            .into_iter()
            .map(|(value, count)| FrequencyEntry { value, count })
            .collect();
        // Stable sort keeps first-encountered order among equal counts.
        entries.sort_by(|a, b| b.count.cmp(&a.count));
        Self { entries }
    }

    pub fn entries(&self) -> &[FrequencyEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of all counts.
    pub fn total(&self) -> usize {
        self.entries.iter().map(|e| e.count).sum()
    }

    /// Count for `value`; 0 when the value never occurred.
    pub fn get(&self, value: &FieldValue) -> usize {
        self.entries
            .iter()
            .find(|e| &e.value == value)
            .map_or(0, |e| e.count)
    }

    pub fn values(&self) -> impl Iterator<Item = &FieldValue> {
        self.entries.iter().map(|e| &e.value)
    }
}

/// The `n` most frequent entries; the whole table when `n` exceeds its size.
pub fn top_n(table: &FrequencyTable, n: usize) -> FrequencyTable {
    FrequencyTable {
        entries: table.entries.iter().take(n).cloned().collect(),
    }
}

/// The `n` least frequent entries, least frequent first.
///
/// Ties keep first-encountered order, so at the cutoff the earlier value
/// wins just as it does in [`top_n`].
pub fn bottom_n(table: &FrequencyTable, n: usize) -> FrequencyTable {
    let mut entries = table.entries.clone();
    entries.sort_by_key(|e| e.count);
    entries.truncate(n);
    FrequencyTable { entries }
}

// ── Counting ──────────────────────────────────────────────────────────────────

/// Frequency of each value of a single-valued field. Rows where the field
/// is absent do not contribute.
pub fn count_by(rows: &[&CatalogRow], field: Field) -> FrequencyTable {
    let mut counts: IndexMap<FieldValue, usize> = IndexMap::new();
    for value in rows.iter().filter_map(|row| row.value_of(field)) {
        *counts.entry(value).or_insert(0) += 1;
    }
    FrequencyTable::from_counts(counts)
}

/// Frequency of each value of a multi-value field, one count per value per
/// row carrying it.
pub fn explode_count_by(rows: &[&CatalogRow], field: MultiValueField) -> FrequencyTable {
    MultiValueIndex::build(rows, field).frequencies()
}

/// Number of distinct values of a multi-value field.
pub fn distinct_count(rows: &[&CatalogRow], field: MultiValueField) -> usize {
    MultiValueIndex::build(rows, field).distinct_count()
}

/// Arithmetic mean of a numeric field over rows where it is present.
pub fn mean_of(rows: &[&CatalogRow], field: NumericField) -> Option<f64> {
    let (sum, n) = rows
        .iter()
        .filter_map(|row| row.number_of(field))
        .fold((0.0, 0usize), |(sum, n), v| (sum + v, n + 1));
    if n == 0 {
        None
    } else {
        Some(sum / n as f64)
    }
}

// ── MultiValueIndex ───────────────────────────────────────────────────────────

/// The exploded (row → each value) pairing of one multi-value field.
///
/// A row with k values contributes k entries. Borrowed from the rows it was
/// built over and rebuilt per query.
#[derive(Debug, Clone)]
pub struct MultiValueIndex<'a> {
    field: MultiValueField,
    /// `(position of the row in the input slice, value)`.
    pairs: Vec<(usize, &'a str)>,
}

impl<'a> MultiValueIndex<'a> {
    pub fn build(rows: &[&'a CatalogRow], field: MultiValueField) -> Self {
        let pairs = rows
            .iter()
            .enumerate()
            .flat_map(|(pos, &row)| row.values_of(field).iter().map(move |v| (pos, v.as_str())))
            .collect();
        Self { field, pairs }
    }

    pub fn field(&self) -> MultiValueField {
        self.field
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn pairs(&self) -> &[(usize, &'a str)] {
        &self.pairs
    }

    pub fn distinct_count(&self) -> usize {
        self.pairs
            .iter()
            .map(|(_, v)| *v)
            .collect::<IndexSet<&str>>()
            .len()
    }

    pub fn frequencies(&self) -> FrequencyTable {
        let mut counts: IndexMap<FieldValue, usize> = IndexMap::new();
        for (_, value) in &self.pairs {
            *counts.entry(FieldValue::from(*value)).or_insert(0) += 1;
        }
        FrequencyTable::from_counts(counts)
    }
}

// ── TimeSeries ────────────────────────────────────────────────────────────────

/// Count of rows at one time value within one bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeriesPoint {
    pub time: i64,
    pub bucket: FieldValue,
    pub count: usize,
}

/// Counts per (time, bucket) pair, e.g. titles per (year added, type).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimeSeries {
    pub time_field: TimeField,
    pub bucket_field: Field,
    /// Buckets in first-encountered order.
    pub buckets: Vec<FieldValue>,
    /// Ordered by time, then bucket order.
    pub points: Vec<SeriesPoint>,
}

impl TimeSeries {
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Sum of all point counts.
    pub fn total(&self) -> usize {
        self.points.iter().map(|p| p.count).sum()
    }

    /// `(time, count)` pairs of one bucket, in time order.
    pub fn series_for(&self, bucket: &FieldValue) -> Vec<(i64, usize)> {
        self.points
            .iter()
            .filter(|p| &p.bucket == bucket)
            .map(|p| (p.time, p.count))
            .collect()
    }
}

/// Count rows per (time value, bucket value).
///
/// Rows missing the time value are left out rather than bucketed under a
/// sentinel; rows missing the bucket value are left out as well.
pub fn grouped_time_series(
    rows: &[&CatalogRow],
    time_field: TimeField,
    bucket_field: Field,
) -> TimeSeries {
    let mut buckets: IndexSet<FieldValue> = IndexSet::new();
    let mut counts: IndexMap<(i64, usize), usize> = IndexMap::new();

    for row in rows {
        let (Some(time), Some(bucket)) = (row.time_of(time_field), row.value_of(bucket_field))
        else {
            continue;
        };
        let (bucket_idx, _) = buckets.insert_full(bucket);
        *counts.entry((time, bucket_idx)).or_insert(0) += 1;
    }

    let mut keyed: Vec<((i64, usize), usize)> = counts.into_iter().collect();
    keyed.sort_by_key(|(key, _)| *key);

    let points = keyed
        .into_iter()
        .filter_map(|((time, bucket_idx), count)| {
            buckets.get_index(bucket_idx).map(|bucket| SeriesPoint {
                time,
                bucket: bucket.clone(),
                count,
            })
        })
        .collect();

    TimeSeries {
        time_field,
        bucket_field,
        buckets: buckets.into_iter().collect(),
        points,
    }
}

// ── CrossTab ──────────────────────────────────────────────────────────────────

/// Dense count matrix over the observed values of two fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CrossTab {
    row_field: Field,
    column_field: Field,
    /// Observed values of `row_field`, first-encountered order.
    row_labels: Vec<FieldValue>,
    /// Observed values of `column_field`, first-encountered order.
    column_labels: Vec<FieldValue>,
    /// `counts[r][c]`; zero cells are present.
    counts: Vec<Vec<usize>>,
}

impl CrossTab {
    pub fn row_field(&self) -> Field {
        self.row_field
    }

    pub fn column_field(&self) -> Field {
        self.column_field
    }

    pub fn row_labels(&self) -> &[FieldValue] {
        &self.row_labels
    }

    pub fn column_labels(&self) -> &[FieldValue] {
        &self.column_labels
    }

    /// One row of counts per row label, one cell per column label.
    pub fn counts(&self) -> &[Vec<usize>] {
        &self.counts
    }

    pub fn is_empty(&self) -> bool {
        self.row_labels.is_empty() || self.column_labels.is_empty()
    }

    /// Count at row index `r` and column index `c`; 0 out of range.
    pub fn cell(&self, r: usize, c: usize) -> usize {
        self.counts
            .get(r)
            .and_then(|cells| cells.get(c))
            .copied()
            .unwrap_or(0)
    }

    /// Count of one cell; 0 for unknown labels.
    pub fn get(&self, row: &FieldValue, column: &FieldValue) -> usize {
        let r = self.row_labels.iter().position(|l| l == row);
        let c = self.column_labels.iter().position(|l| l == column);
        match (r, c) {
            (Some(r), Some(c)) => self.cell(r, c),
            _ => 0,
        }
    }

    pub fn total(&self) -> usize {
        self.counts.iter().flatten().sum()
    }

    /// Per-row sums as a frequency table.
    pub fn row_totals(&self) -> FrequencyTable {
        let counts = self
            .row_labels
            .iter()
            .zip(&self.counts)
            .map(|(label, cells)| (label.clone(), cells.iter().sum()))
            .collect();
        FrequencyTable::from_counts(counts)
    }

    /// Per-column sums as a frequency table.
    pub fn column_totals(&self) -> FrequencyTable {
        let counts = self
            .column_labels
            .iter()
            .enumerate()
            .map(|(c, label)| {
                let sum = (0..self.row_labels.len()).map(|r| self.cell(r, c)).sum();
                (label.clone(), sum)
            })
            .collect();
        FrequencyTable::from_counts(counts)
    }
}

/// Cross-tabulate two fields. Rows missing either value are left out.
pub fn cross_tab(rows: &[&CatalogRow], row_field: Field, column_field: Field) -> CrossTab {
    let mut row_labels: IndexSet<FieldValue> = IndexSet::new();
    let mut column_labels: IndexSet<FieldValue> = IndexSet::new();
    let mut cells: Vec<(usize, usize)> = Vec::new();

    for row in rows {
        let (Some(a), Some(b)) = (row.value_of(row_field), row.value_of(column_field)) else {
            continue;
        };
        let (r, _) = row_labels.insert_full(a);
        let (c, _) = column_labels.insert_full(b);
        cells.push((r, c));
    }

    let mut counts = vec![vec![0usize; column_labels.len()]; row_labels.len()];
    for (r, c) in cells {
        counts[r][c] += 1;
    }

    CrossTab {
        row_field,
        column_field,
        row_labels: row_labels.into_iter().collect(),
        column_labels: column_labels.into_iter().collect(),
        counts,
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
