use chrono::{DateTime, Utc};
use snafu::{Location, Snafu};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Snafu)]
#[snafu(module, visibility(pub))]
pub enum Error {
    #[snafu(display("IO error"))]
    Io {
        #[snafu(implicit)]
        location: Location,
        #[snafu(source)]
        error: std::io::Error,
    },
    #[snafu(display("CSV error"))]
    Csv {
        #[snafu(implicit)]
        location: Location,
        #[snafu(source)]
        error: csv::Error,
    },
    #[snafu(display("Received incomplete csv data"))]
    IncompleteData {
        #[snafu(implicit)]
        location: Location,
        #[snafu(source)]
        error: csv::DeserializeError,
    },
    #[snafu(display("Row is missing column '{column}'"))]
    MissingColumn {
        #[snafu(implicit)]
        location: Location,
        column: String,
    },
    #[snafu(display("Failed to parse timestamp '{value}'"))]
    ParseTimestamp {
        #[snafu(implicit)]
        location: Location,
        value: String,
        #[snafu(source)]
        error: chrono::ParseError,
    },
    #[snafu(display("Encountered an invalid fishing state '{value}'"))]
    InvalidFishingState {
        #[snafu(implicit)]
        location: Location,
        value: String,
    },
    #[snafu(display("Timestamp '{timestamp}' is not in UTC"))]
    NonUtcTimestamp {
        #[snafu(implicit)]
        location: Location,
        timestamp: String,
    },
    #[snafu(display("Range ends before it starts, start: '{start}', end: '{end}'"))]
    InvalidRange {
        #[snafu(implicit)]
        location: Location,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },
    #[snafu(display("Encountered a negative gap between '{prev}' and '{next}'"))]
    NegativeGap {
        #[snafu(implicit)]
        location: Location,
        prev: DateTime<Utc>,
        next: DateTime<Utc>,
    },
    #[snafu(display("Timestamps must be sorted, index '{index}' is out of order"))]
    UnsortedTimestamps {
        #[snafu(implicit)]
        location: Location,
        index: usize,
    },
    #[snafu(display("Ranges must belong to a single vessel, found '{first}' and '{other}'"))]
    MixedVessels {
        #[snafu(implicit)]
        location: Location,
        first: String,
        other: String,
    },
}

impl From<csv::Error> for Error {
    #[track_caller]
    fn from(e: csv::Error) -> Self {
        let location = std::panic::Location::caller();
        let location = Location::new(location.file(), location.line(), location.column());
        match e.kind() {
            csv::ErrorKind::Deserialize { pos: _, err } => match err.kind() {
                csv::DeserializeErrorKind::UnexpectedEndOfRow => Error::IncompleteData {
                    error: err.clone(),
                    location,
                },
                _ => Error::Csv { location, error: e },
            },
            _ => Error::Csv { location, error: e },
        }
    }
}
