use std::{collections::BTreeMap, fmt::Display};

use chrono::{DateTime, Utc};
use tracing::warn;

use crate::{
    FishingState, Range, Result,
    error::error::{MixedVesselsSnafu, UnsortedTimestampsSnafu},
};

/// Labels each timestamp of a single vessel with the state of the range covering it.
///
/// `timestamps` must be sorted ascending and all `ranges` must belong to the same
/// vessel. Timestamps not covered by a range with a known state are labeled
/// [`FishingState::Unknown`].
///
/// Ranges are applied in order of their end time (ties keep the given order), so
/// where ranges overlap the range ending last decides the label. Overlaps are
/// logged as they indicate inconsistent input.
pub fn fishing_series<V>(
    timestamps: &[DateTime<Utc>],
    ranges: &[Range<V>],
) -> Result<Vec<FishingState>>
where
    V: PartialEq + Display,
{
    if let Some(i) = timestamps.windows(2).position(|w| w[1] < w[0]) {
        return UnsortedTimestampsSnafu { index: i + 1 }.fail();
    }

    if let Some(first) = ranges.first() {
        if let Some(other) = ranges.iter().find(|r| r.vessel != first.vessel) {
            return MixedVesselsSnafu {
                first: first.vessel.to_string(),
                other: other.vessel.to_string(),
            }
            .fail();
        }
    }

    let mut known: Vec<&Range<V>> = ranges.iter().filter(|r| r.state.is_known()).collect();
    known.sort_by_key(|r| r.end);

    if let Some((a, b)) = find_overlap(&known) {
        warn!(
            "overlapping ranges for vessel {}: [{}, {}] and [{}, {}], the latest ending wins",
            a.vessel, a.start, a.end, b.start, b.end
        );
    }

    let mut series = vec![FishingState::Unknown; timestamps.len()];
    for range in known {
        let start = timestamps.partition_point(|t| *t < range.start);
        let end = timestamps.partition_point(|t| *t <= range.end);
        if start < end {
            series[start..end].fill(range.state);
        }
    }

    Ok(series)
}

/// Same as [`fishing_series`] but accepts timestamps in any order, labels are
/// returned in the order of the given timestamps.
pub fn fishing_series_unordered<V>(
    timestamps: &[DateTime<Utc>],
    ranges: &[Range<V>],
) -> Result<Vec<FishingState>>
where
    V: PartialEq + Display,
{
    let mut order: Vec<usize> = (0..timestamps.len()).collect();
    order.sort_by_key(|&i| timestamps[i]);

    let sorted: Vec<DateTime<Utc>> = order.iter().map(|&i| timestamps[i]).collect();
    let sorted_series = fishing_series(&sorted, ranges)?;

    let mut series = vec![FishingState::Unknown; timestamps.len()];
    for (state, i) in sorted_series.into_iter().zip(order) {
        series[i] = state;
    }

    Ok(series)
}

pub fn group_ranges_by_vessel<V>(
    ranges: impl IntoIterator<Item = Range<V>>,
) -> BTreeMap<V, Vec<Range<V>>>
where
    V: Ord + Clone,
{
    let mut grouped: BTreeMap<V, Vec<Range<V>>> = BTreeMap::new();
    for range in ranges {
        grouped.entry(range.vessel.clone()).or_default().push(range);
    }
    grouped
}

fn find_overlap<'a, V>(ranges: &[&'a Range<V>]) -> Option<(&'a Range<V>, &'a Range<V>)> {
    let mut by_start = ranges.to_vec();
    by_start.sort_by_key(|r| r.start);

    let mut furthest: Option<&'a Range<V>> = None;
    for range in by_start {
        if let Some(prev) = furthest {
            if range.start <= prev.end {
                return Some((prev, range));
            }
            if range.end > prev.end {
                furthest = Some(range);
            }
        } else {
            furthest = Some(range);
        }
    }
    None
}
