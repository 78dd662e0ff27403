use std::{collections::HashMap, fs::File, io::Read, path::Path};

use chrono::{DateTime, Utc};
use csv::DeserializeRecordsIntoIter;
use itertools::Itertools;
use snafu::ResultExt;

use crate::{
    FishingState, Point, Result,
    error::error::{IoSnafu, MissingColumnSnafu},
};

/// A raw source row, column name to value.
pub type Row = HashMap<String, String>;

/// Adapts one source format to the canonical [`Point`] shape.
pub trait Dialect {
    type Vessel;

    fn vessel(&self, row: &Row) -> Result<Self::Vessel>;
    fn timestamp(&self, row: &Row) -> Result<DateTime<Utc>>;
    fn state(&self, row: &Row) -> Result<FishingState>;

    fn point(&self, row: &Row) -> Result<Point<Self::Vessel>> {
        Ok(Point {
            vessel: self.vessel(row)?,
            timestamp: self.timestamp(row)?,
            state: self.state(row)?,
        })
    }
}

/// A [`Dialect`] assembled from three plain functions.
pub struct FnDialect<A, B, C> {
    vessel: A,
    timestamp: B,
    state: C,
}

impl<V, A, B, C> FnDialect<A, B, C>
where
    A: Fn(&Row) -> Result<V>,
    B: Fn(&Row) -> Result<DateTime<Utc>>,
    C: Fn(&Row) -> Result<FishingState>,
{
    pub fn new(vessel: A, timestamp: B, state: C) -> Self {
        Self {
            vessel,
            timestamp,
            state,
        }
    }
}

impl<V, A, B, C> Dialect for FnDialect<A, B, C>
where
    A: Fn(&Row) -> Result<V>,
    B: Fn(&Row) -> Result<DateTime<Utc>>,
    C: Fn(&Row) -> Result<FishingState>,
{
    type Vessel = V;

    fn vessel(&self, row: &Row) -> Result<V> {
        (self.vessel)(row)
    }
    fn timestamp(&self, row: &Row) -> Result<DateTime<Utc>> {
        (self.timestamp)(row)
    }
    fn state(&self, row: &Row) -> Result<FishingState> {
        (self.state)(row)
    }
}

/// Looks up a column that must be present in the row.
pub fn column<'a>(row: &'a Row, name: &str) -> Result<&'a str> {
    row.get(name)
        .map(|v| v.as_str())
        .map_or_else(|| MissingColumnSnafu { column: name }.fail(), Ok)
}

pub struct RowIter<R> {
    inner: DeserializeRecordsIntoIter<R, Row>,
}

impl<R: Read> Iterator for RowIter<R> {
    type Item = Result<Row>;

    fn next(&mut self) -> Option<Result<Row>> {
        self.inner.next().map(|r| r.map_err(From::from))
    }
}

pub fn rows_from_reader<R: Read>(reader: R) -> RowIter<R> {
    let csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    RowIter {
        inner: csv_reader.into_deserialize(),
    }
}

pub fn rows_from_path(path: &Path) -> Result<RowIter<File>> {
    let file = File::open(path).context(IoSnafu)?;
    Ok(rows_from_reader(file))
}

/// Lazily converts rows into points, the first failing row ends the conversion.
pub fn points_from_rows<D, I>(
    rows: I,
    dialect: &D,
) -> impl Iterator<Item = Result<Point<D::Vessel>>>
where
    D: Dialect,
    I: IntoIterator<Item = Result<Row>>,
{
    rows.into_iter()
        .map(move |row| row.and_then(|row| dialect.point(&row)))
}

pub fn points_from_path<D: Dialect>(path: &Path, dialect: &D) -> Result<Vec<Point<D::Vessel>>> {
    points_from_rows(rows_from_path(path)?, dialect).collect()
}

/// Sorts points by `(vessel, timestamp)` and merges points sharing that key.
///
/// Merged points keep the state the duplicates agree on, conflicting reports
/// become [`FishingState::Unknown`].
pub fn dedup_and_sort_points<V>(points: impl IntoIterator<Item = Point<V>>) -> Vec<Point<V>>
where
    V: Ord + Clone,
{
    let mut points: Vec<Point<V>> = points.into_iter().collect();
    points.sort_by(|a, b| {
        a.vessel
            .cmp(&b.vessel)
            .then_with(|| a.timestamp.cmp(&b.timestamp))
    });

    let groups = points
        .into_iter()
        .chunk_by(|p| (p.vessel.clone(), p.timestamp));

    let deduped = groups
        .into_iter()
        .map(|((vessel, timestamp), group)| Point {
            vessel,
            timestamp,
            state: FishingState::reconcile(group.map(|p| p.state)),
        })
        .collect();

    deduped
}
