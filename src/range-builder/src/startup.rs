use std::{fmt::Display, fs::File, path::PathBuf};

use async_channel::Receiver;
use fishing_ranges::{
    AnonymousId, Mmsi, Range, anonymize_ranges, read_ranges_from_path, write_ranges_to_path,
};
use serde::de::DeserializeOwned;
use snafu::{OptionExt, ResultExt};
use tokio::task::JoinSet;
use tracing::{info, instrument, warn};

use crate::{
    error::{
        Result,
        error::{ChannelClosedSnafu, IoSnafu, JoinSnafu, MissingSettingsSnafu},
    },
    label::{LabelSummary, TrackColumns, label_tracks},
    settings::{AnonymizeSettings, Environment, LabelSettings, RangeSettings, Settings},
    sources::{SourceJob, expand_sources},
};

pub struct App {
    environment: Environment,
    num_workers: usize,
    jitter_seed: Option<u64>,
    anonymize: Option<AnonymizeSettings>,
    ranges: Option<RangeSettings>,
    label: Option<LabelSettings>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RangeSummary {
    pub converted: usize,
    pub skipped: usize,
    pub ranges: usize,
}

struct Conversion {
    index: usize,
    path: PathBuf,
    result: Result<Vec<Range<Mmsi>>>,
}

impl App {
    pub fn build(settings: Settings) -> App {
        App {
            environment: settings.environment,
            num_workers: settings.num_workers.max(1),
            jitter_seed: settings.jitter_seed,
            anonymize: settings.anonymize,
            ranges: settings.ranges,
            label: settings.label,
        }
    }

    /// Raw vessel ids must never leave a production run.
    fn check_anonymization(&self) -> Result<()> {
        if self.environment == Environment::Production && self.anonymize.is_none() {
            MissingSettingsSnafu {
                section: "anonymize",
            }
            .fail()
        } else {
            Ok(())
        }
    }

    /// Converts every configured source into ranges and writes them to the
    /// canonical store.
    ///
    /// A source that fails to convert is logged and left out of the output,
    /// the remaining sources are still written.
    #[instrument(skip_all)]
    pub async fn build_ranges(&self) -> Result<RangeSummary> {
        let settings = self
            .ranges
            .as_ref()
            .context(MissingSettingsSnafu { section: "ranges" })?;
        self.check_anonymization()?;

        let jobs = expand_sources(&settings.sources)?;
        let seed = self.jitter_seed.unwrap_or_else(rand::random);
        info!("converting {} sources with seed {seed}", jobs.len());

        let (sender, receiver) = async_channel::bounded(self.num_workers);
        let mut set = JoinSet::new();

        for _ in 0..self.num_workers {
            set.spawn(conversion_worker(receiver.clone(), seed));
        }

        for job in jobs.into_iter().enumerate() {
            if sender.send(job).await.is_err() {
                return ChannelClosedSnafu.fail();
            }
        }

        // Workers drain the queue and exit once it is empty and closed.
        drop(sender);

        let mut conversions = Vec::new();
        while let Some(res) = set.join_next().await {
            conversions.extend(res.context(JoinSnafu)?);
        }
        conversions.sort_by_key(|c| c.index);

        let mut summary = RangeSummary::default();
        let mut ranges = Vec::new();

        for conversion in conversions {
            match conversion.result {
                Ok(v) => {
                    info!(
                        "converted {} into {} ranges",
                        conversion.path.display(),
                        v.len()
                    );
                    summary.converted += 1;
                    ranges.extend(v);
                }
                Err(e) => {
                    warn!("failed to convert {}: {e:?}", conversion.path.display());
                    summary.skipped += 1;
                }
            }
        }

        summary.ranges = ranges.len();

        match &self.anonymize {
            Some(anonymize) => {
                let anonymizer = anonymize.anonymizer();
                let ranges: Vec<_> = anonymize_ranges(ranges, &anonymizer).collect();
                write_ranges_to_path(&settings.output, &ranges)?;
            }
            None => write_ranges_to_path(&settings.output, &ranges)?,
        }

        let output = settings.output.display();
        info!("wrote {} ranges to {output}", summary.ranges);

        Ok(summary)
    }

    /// Labels a track file against a previously built range store.
    ///
    /// When anonymization is configured the store is expected to hold anonymized
    /// ids, track vessels are anonymized with the same salt before the join.
    #[instrument(skip_all)]
    pub async fn label_tracks(&self) -> Result<LabelSummary> {
        let settings = self
            .label
            .clone()
            .context(MissingSettingsSnafu { section: "label" })?;
        self.check_anonymization()?;
        let anonymizer = self.anonymize.as_ref().map(AnonymizeSettings::anonymizer);

        let summary = tokio::task::spawn_blocking(move || match anonymizer {
            Some(anonymizer) => label_from_paths::<AnonymousId, _>(&settings, |v| {
                anonymizer.anonymize(&Mmsi::new(v))
            }),
            None => label_from_paths::<Mmsi, _>(&settings, |v| Mmsi::new(v)),
        })
        .await
        .context(JoinSnafu)??;

        info!("labeled {} of {} track rows", summary.labeled, summary.rows);

        Ok(summary)
    }
}

async fn conversion_worker(
    receiver: Receiver<(usize, SourceJob)>,
    seed: u64,
) -> Vec<Conversion> {
    let mut conversions = Vec::new();

    while let Ok((index, job)) = receiver.recv().await {
        let path = job.path.clone();
        let job_seed = seed.wrapping_add(index as u64);

        let result = tokio::task::spawn_blocking(move || job.convert(job_seed))
            .await
            .context(JoinSnafu)
            .and_then(|v| v);

        conversions.push(Conversion {
            index,
            path,
            result,
        });
    }

    conversions
}

/// Labels into memory first, `settings.output` is only replaced once the whole
/// track file labels successfully.
fn label_from_paths<V, F>(settings: &LabelSettings, resolve: F) -> Result<LabelSummary>
where
    V: Ord + Clone + Display + DeserializeOwned,
    F: Fn(&str) -> V,
{
    let ranges = read_ranges_from_path::<V>(&settings.ranges)?;
    let tracks = File::open(&settings.tracks).context(IoSnafu)?;

    let mut buffer: Vec<u8> = Vec::new();
    let summary = label_tracks(
        ranges,
        tracks,
        &mut buffer,
        &TrackColumns::from(settings),
        resolve,
    )?;

    std::fs::write(&settings.output, buffer).context(IoSnafu)?;

    Ok(summary)
}
