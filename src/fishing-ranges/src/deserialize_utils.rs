use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, de::Error};

use crate::{FishingState, store::parse_timestamp};

pub fn date_time_utc_from_str<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    parse_timestamp(&s).map_err(Error::custom)
}

/// Parses the state column through [`FishingState`]'s `FromStr`, so unknown
/// sentinels, empty cells and `NaN` all collapse into [`FishingState::Unknown`].
pub fn fishing_state_from_str<'de, D>(deserializer: D) -> Result<FishingState, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    s.parse().map_err(Error::custom)
}
