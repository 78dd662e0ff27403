use chrono::{DateTime, NaiveDateTime, Utc};
use fishing_ranges::{Dialect, FishingState, Mmsi, Row, column, parse_timestamp};

use crate::settings::ColumnSettings;

/// Column dialect configured from settings.
///
/// Each field is looked up through a list of candidate column names, as
/// different exports of the same source do not agree on a header.
#[derive(Debug, Clone)]
pub struct ColumnDialect {
    vessel_columns: Vec<String>,
    timestamp_columns: Vec<String>,
    timestamp_formats: Vec<String>,
    state_columns: Vec<String>,
    state_tokens: Vec<(String, FishingState)>,
}

impl From<ColumnSettings> for ColumnDialect {
    fn from(value: ColumnSettings) -> Self {
        let ColumnSettings {
            vessel_columns,
            timestamp_columns,
            timestamp_formats,
            state_columns,
            state_tokens,
        } = value;

        Self {
            vessel_columns,
            timestamp_columns,
            timestamp_formats,
            state_columns,
            state_tokens: state_tokens
                .into_iter()
                .map(|t| (t.token, t.state.into()))
                .collect(),
        }
    }
}

fn first_column<'a>(row: &'a Row, columns: &[String]) -> fishing_ranges::Result<&'a str> {
    match columns.iter().find(|c| row.contains_key(c.as_str())) {
        Some(c) => column(row, c),
        None => column(row, &columns.join("|")),
    }
}

impl Dialect for ColumnDialect {
    type Vessel = Mmsi;

    fn vessel(&self, row: &Row) -> fishing_ranges::Result<Mmsi> {
        first_column(row, &self.vessel_columns).map(Mmsi::new)
    }

    fn timestamp(&self, row: &Row) -> fishing_ranges::Result<DateTime<Utc>> {
        let value = first_column(row, &self.timestamp_columns)?;

        self.timestamp_formats
            .iter()
            .find_map(|f| NaiveDateTime::parse_from_str(value, f).ok())
            .map_or_else(|| parse_timestamp(value), |v| Ok(v.and_utc()))
    }

    fn state(&self, row: &Row) -> fishing_ranges::Result<FishingState> {
        let value = first_column(row, &self.state_columns)?;

        match self.state_tokens.iter().find(|(t, _)| t == value) {
            Some((_, state)) => Ok(*state),
            None => value.parse(),
        }
    }
}
