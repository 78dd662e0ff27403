use snafu::{Location, Snafu};
use tokio::task::JoinError;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Snafu)]
#[snafu(module, visibility(pub))]
pub enum Error {
    #[snafu(display("Failed a range operation"))]
    Ranges {
        #[snafu(implicit)]
        location: Location,
        source: fishing_ranges::Error,
    },
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
    #[snafu(display("Failed to join tasks"))]
    Join {
        #[snafu(implicit)]
        location: Location,
        #[snafu(source)]
        error: JoinError,
    },
    #[snafu(display("The source queue closed before all sources were sent"))]
    ChannelClosed {
        #[snafu(implicit)]
        location: Location,
    },
    #[snafu(display("Missing settings section '{section}'"))]
    MissingSettings {
        #[snafu(implicit)]
        location: Location,
        section: &'static str,
    },
    #[snafu(display("Track file is missing column '{column}'"))]
    MissingTrackColumn {
        #[snafu(implicit)]
        location: Location,
        column: String,
    },
}

impl From<fishing_ranges::Error> for Error {
    #[track_caller]
    fn from(source: fishing_ranges::Error) -> Self {
        let location = std::panic::Location::caller();
        let location = Location::new(location.file(), location.line(), location.column());
        Error::Ranges { location, source }
    }
}

impl From<csv::Error> for Error {
    #[track_caller]
    fn from(error: csv::Error) -> Self {
        let location = std::panic::Location::caller();
        let location = Location::new(location.file(), location.line(), location.column());
        Error::Csv { location, error }
    }
}
