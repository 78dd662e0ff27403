use std::{
    collections::BTreeMap,
    fmt::Display,
    io::{Read, Write},
};

use chrono::{DateTime, Utc};
use csv::StringRecord;
use fishing_ranges::{Range, fishing_series_unordered, group_ranges_by_vessel, parse_timestamp};
use snafu::ResultExt;
use tracing::debug;

use crate::{
    error::{
        Result,
        error::{IoSnafu, MissingTrackColumnSnafu},
    },
    settings::LabelSettings,
};

#[derive(Debug, Clone)]
pub struct TrackColumns {
    pub vessel: String,
    pub timestamp: String,
    pub label: String,
}

impl From<&LabelSettings> for TrackColumns {
    fn from(value: &LabelSettings) -> Self {
        Self {
            vessel: value.vessel_column.clone(),
            timestamp: value.timestamp_column.clone(),
            label: value.label_column.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LabelSummary {
    pub rows: usize,
    pub labeled: usize,
}

fn column_index(headers: &StringRecord, name: &str) -> Result<usize> {
    headers
        .iter()
        .position(|h| h == name)
        .map_or_else(|| MissingTrackColumnSnafu { column: name }.fail(), Ok)
}

/// Labels every row of a track file with the fishing state of the range covering it.
///
/// The vessel column of each row is resolved through `resolve`, which also
/// decides what is written back into that column. Rows without a known state
/// are dropped, the remaining rows keep their input order and get the state
/// token appended as a new column.
pub fn label_tracks<V, R, W, F>(
    ranges: Vec<Range<V>>,
    reader: R,
    writer: W,
    columns: &TrackColumns,
    resolve: F,
) -> Result<LabelSummary>
where
    V: Ord + Clone + Display,
    R: Read,
    W: Write,
    F: Fn(&str) -> V,
{
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = reader.headers()?.clone();
    let vessel_index = column_index(&headers, &columns.vessel)?;
    let timestamp_index = column_index(&headers, &columns.timestamp)?;

    let records = reader
        .into_records()
        .collect::<std::result::Result<Vec<_>, _>>()?;

    let mut vessels = Vec::with_capacity(records.len());
    let mut timestamps: Vec<DateTime<Utc>> = Vec::with_capacity(records.len());
    for record in &records {
        vessels.push(resolve(record.get(vessel_index).unwrap_or_default()));
        let timestamp = record.get(timestamp_index).unwrap_or_default();
        timestamps.push(parse_timestamp(timestamp)?);
    }

    let mut rows_by_vessel: BTreeMap<&V, Vec<usize>> = BTreeMap::new();
    for (i, vessel) in vessels.iter().enumerate() {
        rows_by_vessel.entry(vessel).or_default().push(i);
    }

    let ranges = group_ranges_by_vessel(ranges);
    let mut labels = vec![None; records.len()];

    for (vessel, rows) in rows_by_vessel {
        let vessel_ranges = ranges.get(vessel).map(Vec::as_slice).unwrap_or_default();
        let vessel_timestamps: Vec<_> = rows.iter().map(|&i| timestamps[i]).collect();
        let series = fishing_series_unordered(&vessel_timestamps, vessel_ranges)?;

        for (i, state) in rows.into_iter().zip(series) {
            labels[i] = Some(state).filter(|s| s.is_known());
        }
    }

    let mut writer = csv::Writer::from_writer(writer);

    let mut header: Vec<&str> = headers.iter().collect();
    header.push(&columns.label);
    writer.write_record(&header)?;

    let mut summary = LabelSummary {
        rows: records.len(),
        labeled: 0,
    };

    for ((record, vessel), label) in records.iter().zip(&vessels).zip(labels) {
        let Some(state) = label else {
            continue;
        };

        let mut row: Vec<String> = record.iter().map(String::from).collect();
        row[vessel_index] = vessel.to_string();
        row.push(state.token().to_string());
        writer.write_record(&row)?;

        summary.labeled += 1;
    }

    writer.flush().context(IoSnafu)?;

    debug!("labeled {} of {} track rows", summary.labeled, summary.rows);

    Ok(summary)
}
