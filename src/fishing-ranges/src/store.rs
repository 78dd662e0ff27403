//! Canonical range store, a CSV file with the header `mmsi,start_time,end_time,is_fishing`.

use std::{
    fmt::Display,
    fs::File,
    io::{BufWriter, Read, Write},
    path::Path,
};

use chrono::{DateTime, NaiveDateTime, Offset, TimeZone, Utc};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use snafu::ResultExt;
use tracing::instrument;

use crate::{
    FishingState, Range, Result,
    deserialize_utils::{date_time_utc_from_str, fishing_state_from_str},
    error::error::{IoSnafu, NonUtcTimestampSnafu, ParseTimestampSnafu},
};

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";
pub const HEADER: [&str; 4] = ["mmsi", "start_time", "end_time", "is_fishing"];

/// Formats a timestamp for the store, timestamps with a non-zero UTC offset are rejected.
pub fn format_timestamp<Tz>(timestamp: &DateTime<Tz>) -> Result<String>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    if timestamp.offset().fix().local_minus_utc() != 0 {
        return NonUtcTimestampSnafu {
            timestamp: timestamp.to_rfc3339(),
        }
        .fail();
    }

    Ok(timestamp
        .with_timezone(&Utc)
        .format(TIMESTAMP_FORMAT)
        .to_string())
}

/// Parses RFC 3339 timestamps, timestamps without an offset are assumed to be UTC.
pub fn parse_timestamp(value: &str) -> Result<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(v) = DateTime::parse_from_rfc3339(value) {
        return Ok(v.with_timezone(&Utc));
    }

    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S%.f"))
        .map(|v| v.and_utc())
        .context(ParseTimestampSnafu { value })
}

#[derive(Serialize)]
struct RangeRow<'a, V> {
    mmsi: &'a V,
    start_time: String,
    end_time: String,
    is_fishing: i8,
}

#[derive(Deserialize)]
struct RangeRecord<V> {
    mmsi: V,
    #[serde(deserialize_with = "date_time_utc_from_str")]
    start_time: DateTime<Utc>,
    #[serde(deserialize_with = "date_time_utc_from_str")]
    end_time: DateTime<Utc>,
    #[serde(deserialize_with = "fishing_state_from_str")]
    is_fishing: FishingState,
}

pub fn write_ranges<'a, W, V>(
    writer: W,
    ranges: impl IntoIterator<Item = &'a Range<V>>,
) -> Result<()>
where
    W: Write,
    V: Serialize + 'a,
{
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);

    writer.write_record(HEADER)?;

    for range in ranges {
        writer.serialize(RangeRow {
            mmsi: &range.vessel,
            start_time: format_timestamp(&range.start)?,
            end_time: format_timestamp(&range.end)?,
            is_fishing: range.state.token(),
        })?;
    }

    writer.flush().context(IoSnafu)
}

pub fn read_ranges<R, V>(reader: R) -> Result<Vec<Range<V>>>
where
    R: Read,
    V: DeserializeOwned,
{
    csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader)
        .into_deserialize::<RangeRecord<V>>()
        .map(|record| {
            let record = record?;
            Range::new(
                record.mmsi,
                record.start_time,
                record.end_time,
                record.is_fishing,
            )
        })
        .collect()
}

/// Writes all ranges to `path`, nothing is left behind if formatting fails.
#[instrument(skip(ranges))]
pub fn write_ranges_to_path<'a, V>(
    path: &Path,
    ranges: impl IntoIterator<Item = &'a Range<V>>,
) -> Result<()>
where
    V: Serialize + 'a,
{
    let mut buffer = Vec::new();
    write_ranges(&mut buffer, ranges)?;

    let mut file = BufWriter::new(File::create(path).context(IoSnafu)?);
    file.write_all(&buffer).context(IoSnafu)?;
    file.flush().context(IoSnafu)
}

#[instrument]
pub fn read_ranges_from_path<V: DeserializeOwned>(path: &Path) -> Result<Vec<Range<V>>> {
    let file = File::open(path).context(IoSnafu)?;
    read_ranges(file)
}
