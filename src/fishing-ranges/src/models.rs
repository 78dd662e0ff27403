use std::{convert::Infallible, fmt::Display, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, Serializer};
use strum::{AsRefStr, EnumIter};

use crate::{
    Result,
    error::error::{InvalidFishingStateSnafu, InvalidRangeSnafu},
};

/// Tri-state fishing label.
///
/// Every unknown sentinel found in source data (`-1`, `2`, empty or `NaN`) is
/// normalized into [`FishingState::Unknown`] when parsed, no other numeric
/// values are accepted.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, AsRefStr, EnumIter)]
pub enum FishingState {
    NotFishing,
    Fishing,
    #[default]
    Unknown,
}

impl FishingState {
    pub fn is_known(&self) -> bool {
        !matches!(self, FishingState::Unknown)
    }

    pub fn from_f64(value: f64) -> Option<FishingState> {
        if value == 1.0 {
            Some(FishingState::Fishing)
        } else if value == 0.0 {
            Some(FishingState::NotFishing)
        } else if value == -1.0 || value == 2.0 {
            Some(FishingState::Unknown)
        } else {
            None
        }
    }

    pub fn as_f64(&self) -> f64 {
        match self {
            FishingState::NotFishing => 0.0,
            FishingState::Fishing => 1.0,
            FishingState::Unknown => -1.0,
        }
    }

    /// Token used in the canonical store.
    pub fn token(&self) -> i8 {
        match self {
            FishingState::NotFishing => 0,
            FishingState::Fishing => 1,
            FishingState::Unknown => -1,
        }
    }

    /// Collapses the states reported for a single instant.
    ///
    /// Unknown reports carry no evidence and are ignored, any disagreement between
    /// the remaining reports results in [`FishingState::Unknown`].
    pub fn reconcile(states: impl IntoIterator<Item = FishingState>) -> FishingState {
        let mut agreed = None;
        for state in states.into_iter().filter(FishingState::is_known) {
            match agreed {
                None => agreed = Some(state),
                Some(v) if v == state => {}
                Some(_) => return FishingState::Unknown,
            }
        }
        agreed.unwrap_or_default()
    }
}

impl FromStr for FishingState {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self> {
        let v = s.trim();
        if v.is_empty() || v.eq_ignore_ascii_case("nan") {
            return Ok(FishingState::Unknown);
        }
        if v.eq_ignore_ascii_case("true") {
            return Ok(FishingState::Fishing);
        }
        if v.eq_ignore_ascii_case("false") {
            return Ok(FishingState::NotFishing);
        }

        v.parse::<f64>()
            .ok()
            .and_then(FishingState::from_f64)
            .map_or_else(|| InvalidFishingStateSnafu { value: v }.fail(), Ok)
    }
}

impl Display for FishingState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.token())
    }
}

/// Maritime Mobile Service Identity as reported by the source, kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize)]
#[serde(transparent)]
pub struct Mmsi(String);

impl Mmsi {
    pub fn new(value: impl AsRef<str>) -> Mmsi {
        Mmsi(value.as_ref().trim().to_string())
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl AsRef<str> for Mmsi {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for Mmsi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Mmsi {
    type Err = Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Mmsi::new(s))
    }
}

impl From<u32> for Mmsi {
    fn from(value: u32) -> Self {
        Mmsi(value.to_string())
    }
}

/// Width of a written [`AnonymousId`], the largest id of [`crate::MAX_HEX_DIGITS`]
/// hex digits (`16^12 - 1`) has 15 decimal digits.
pub const ANONYMOUS_ID_WIDTH: usize = 15;

/// Vessel identity after anonymization, see [`crate::Anonymizer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
#[serde(transparent)]
pub struct AnonymousId(u64);

impl AnonymousId {
    pub fn new(value: u64) -> AnonymousId {
        AnonymousId(value)
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

impl Display for AnonymousId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:0width$}", self.0, width = ANONYMOUS_ID_WIDTH)
    }
}

impl Serialize for AnonymousId {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl FromStr for AnonymousId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        s.trim().parse().map(AnonymousId)
    }
}

/// A single observation of a vessel's fishing state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Point<V> {
    pub vessel: V,
    pub timestamp: DateTime<Utc>,
    pub state: FishingState,
}

impl<V> Point<V> {
    pub fn new(vessel: V, timestamp: DateTime<Utc>, state: FishingState) -> Point<V> {
        Point {
            vessel,
            timestamp,
            state,
        }
    }
}

/// A labeled time interval for one vessel, both ends inclusive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Range<V> {
    pub vessel: V,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub state: FishingState,
}

impl<V> Range<V> {
    pub fn new(
        vessel: V,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        state: FishingState,
    ) -> Result<Range<V>> {
        if start > end {
            InvalidRangeSnafu { start, end }.fail()
        } else {
            Ok(Range {
                vessel,
                start,
                end,
                state,
            })
        }
    }

    pub fn contains(&self, timestamp: &DateTime<Utc>) -> bool {
        self.start <= *timestamp && *timestamp <= self.end
    }

    pub fn overlaps<W>(&self, other: &Range<W>) -> bool {
        self.start <= other.end && other.start <= self.end
    }

    /// Replaces the vessel identity, leaving the interval and state untouched.
    pub fn with_vessel<W>(self, vessel: W) -> Range<W> {
        Range {
            vessel,
            start: self.start,
            end: self.end,
            state: self.state,
        }
    }
}
