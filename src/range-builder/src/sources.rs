use std::path::{Path, PathBuf};

use fishing_ranges::{
    FishingState, Mmsi, Range, column, parse_timestamp, points_from_path, ranges_from_points,
    rows_from_path,
};
use rand::{SeedableRng, rngs::StdRng};
use snafu::ResultExt;
use tracing::{instrument, warn};

use crate::{
    dialect::ColumnDialect,
    error::{Result, error::IoSnafu},
    settings::{IntervalSettings, SourceFormat, SourceSettings},
};

/// A single source file waiting to be converted into ranges.
#[derive(Debug, Clone)]
pub struct SourceJob {
    pub path: PathBuf,
    pub format: SourceFormat,
}

impl SourceJob {
    /// Converts the file, `seed` drives the edge fuzzing of point sources.
    #[instrument(skip(self), fields(path = %self.path.display()))]
    pub fn convert(&self, seed: u64) -> Result<Vec<Range<Mmsi>>> {
        match &self.format {
            SourceFormat::Points(columns) => {
                let dialect = ColumnDialect::from(columns.clone());
                let points = points_from_path(&self.path, &dialect)?;
                let mut rng = StdRng::seed_from_u64(seed);
                Ok(ranges_from_points(points, &mut rng)?)
            }
            SourceFormat::Intervals(settings) => intervals_from_path(&self.path, settings),
        }
    }
}

/// Reads ranges that are already described as `start,end` pairs, typically
/// manually reviewed false positives.
///
/// Reversed pairs are swapped and rows that cannot be read are skipped. The
/// interval edges are taken as is, no fuzzing is applied.
pub fn intervals_from_path(path: &Path, settings: &IntervalSettings) -> Result<Vec<Range<Mmsi>>> {
    let state = FishingState::from(settings.state);
    let mut ranges = Vec::new();

    for (i, row) in rows_from_path(path)?.enumerate() {
        let range = row.and_then(|row| {
            let vessel = Mmsi::new(column(&row, &settings.vessel_column)?);
            let start = parse_timestamp(column(&row, &settings.start_column)?)?;
            let end = parse_timestamp(column(&row, &settings.end_column)?)?;
            Range::new(vessel, start.min(end), start.max(end), state)
        });

        match range {
            Ok(v) => ranges.push(v),
            Err(e) => warn!("skipping row {} of {}: {e}", i + 1, path.display()),
        }
    }

    Ok(ranges)
}

/// Expands directory sources into one job per contained csv file, in file name order.
pub fn expand_sources(sources: &[SourceSettings]) -> Result<Vec<SourceJob>> {
    let mut jobs = Vec::new();

    for source in sources {
        if source.path.is_dir() {
            let mut paths = std::fs::read_dir(&source.path)
                .context(IoSnafu)?
                .map(|e| e.map(|e| e.path()))
                .collect::<std::io::Result<Vec<_>>>()
                .context(IoSnafu)?;

            paths.retain(|p| p.is_file() && p.extension().is_some_and(|e| e == "csv"));
            paths.sort();

            jobs.extend(paths.into_iter().map(|path| SourceJob {
                path,
                format: source.format.clone(),
            }));
        } else {
            jobs.push(SourceJob {
                path: source.path.clone(),
                format: source.format.clone(),
            });
        }
    }

    Ok(jobs)
}
