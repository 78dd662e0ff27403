use std::path::{Path, PathBuf};

use config::{Config, ConfigError, File};
use fishing_ranges::{Anonymizer, FishingState};
use serde::Deserialize;
use strum::{AsRefStr, EnumString};
use tracing_subscriber::EnvFilter;

pub const ENV_PREFIX: &str = "RANGE_BUILDER";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, AsRefStr, EnumString)]
pub enum Environment {
    Local,
    Development,
    Production,
    Test,
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub environment: Environment,
    pub log_level: String,
    pub num_workers: usize,
    /// Seeds the edge fuzzing, a random seed is drawn when absent.
    pub jitter_seed: Option<u64>,
    /// The salt should be supplied through `RANGE_BUILDER__ANONYMIZE__SALT`
    /// rather than a config file.
    pub anonymize: Option<AnonymizeSettings>,
    pub ranges: Option<RangeSettings>,
    pub label: Option<LabelSettings>,
}

#[derive(Deserialize, Clone)]
pub struct AnonymizeSettings {
    pub salt: String,
    pub hex_digits: Option<usize>,
}

impl std::fmt::Debug for AnonymizeSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnonymizeSettings")
            .field("salt", &"<redacted>")
            .field("hex_digits", &self.hex_digits)
            .finish()
    }
}

impl AnonymizeSettings {
    pub fn anonymizer(&self) -> Anonymizer {
        let anonymizer = Anonymizer::new(self.salt.clone());
        match self.hex_digits {
            Some(v) => anonymizer.with_hex_digits(v),
            None => anonymizer,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RangeSettings {
    pub sources: Vec<SourceSettings>,
    pub output: PathBuf,
}

/// A csv file, or a directory whose csv files all share the same format.
#[derive(Debug, Clone, Deserialize)]
pub struct SourceSettings {
    pub path: PathBuf,
    pub format: SourceFormat,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SourceFormat {
    /// Rows are point observations, converted through a column dialect.
    Points(ColumnSettings),
    /// Rows already describe an interval with a fixed state.
    Intervals(IntervalSettings),
}

#[derive(Debug, Clone, Deserialize)]
pub struct ColumnSettings {
    /// Candidate column names, the first one present in a row is used.
    pub vessel_columns: Vec<String>,
    pub timestamp_columns: Vec<String>,
    /// `chrono` formats tried in order, RFC 3339 and naive UTC timestamps are
    /// always accepted as a fallback.
    #[serde(default)]
    pub timestamp_formats: Vec<String>,
    pub state_columns: Vec<String>,
    #[serde(default)]
    pub state_tokens: Vec<StateToken>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StateToken {
    pub token: String,
    pub state: StateSetting,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StateSetting {
    Fishing,
    NotFishing,
    Unknown,
}

impl From<StateSetting> for FishingState {
    fn from(value: StateSetting) -> Self {
        match value {
            StateSetting::Fishing => FishingState::Fishing,
            StateSetting::NotFishing => FishingState::NotFishing,
            StateSetting::Unknown => FishingState::Unknown,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct IntervalSettings {
    pub vessel_column: String,
    pub start_column: String,
    pub end_column: String,
    #[serde(default = "default_interval_state")]
    pub state: StateSetting,
}

fn default_interval_state() -> StateSetting {
    StateSetting::NotFishing
}

#[derive(Debug, Clone, Deserialize)]
pub struct LabelSettings {
    pub ranges: PathBuf,
    pub tracks: PathBuf,
    pub output: PathBuf,
    #[serde(default = "default_vessel_column")]
    pub vessel_column: String,
    #[serde(default = "default_timestamp_column")]
    pub timestamp_column: String,
    #[serde(default = "default_label_column")]
    pub label_column: String,
}

fn default_vessel_column() -> String {
    "mmsi".into()
}

fn default_timestamp_column() -> String {
    "timestamp".into()
}

fn default_label_column() -> String {
    "is_fishing".into()
}

impl Settings {
    pub fn new(path: &Path) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::from(path).required(true))
            .add_source(config::Environment::with_prefix(ENV_PREFIX).separator("__"))
            .build()?
            .try_deserialize()
    }

    pub fn init_tracing(&self) {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(&self.log_level));

        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_ansi(self.environment == Environment::Local)
            .init();
    }
}
