use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use tracing::debug;

use crate::{
    FishingState, Point, Range, Result, dedup_and_sort_points, error::error::NegativeGapSnafu,
};

/// Range edges are never fuzzed by this amount or more.
pub const MAX_FUZZ_SECONDS: i64 = 10 * 60;

/// Draws the random offset applied to a range edge.
///
/// Within one vessel the offset stays below half the gap between the two points,
/// so independently fuzzed neighbouring edges can never cross.
pub fn fuzzy_delta<R: Rng + ?Sized>(
    next: DateTime<Utc>,
    prev: DateTime<Utc>,
    same_vessel: bool,
    rng: &mut R,
) -> Result<Duration> {
    let cap = if same_vessel {
        let gap = next - prev;
        if gap < Duration::zero() {
            return NegativeGapSnafu { prev, next }.fail();
        }
        (gap.num_seconds() / 2).min(MAX_FUZZ_SECONDS)
    } else {
        MAX_FUZZ_SECONDS
    };

    if cap == 0 {
        Ok(Duration::zero())
    } else {
        Ok(Duration::seconds(rng.random_range(0..cap)))
    }
}

#[derive(Debug)]
struct Segment<V> {
    vessel: V,
    state: FishingState,
    start: DateTime<Utc>,
    last: DateTime<Utc>,
}

impl<V> Segment<V> {
    fn into_range(self, end: DateTime<Utc>) -> Range<V> {
        Range {
            vessel: self.vessel,
            start: self.start,
            end,
            state: self.state,
        }
    }
}

/// Folds an ordered point stream into ranges, one per run of equal state.
pub struct RangeStatemachine<'a, V, R: ?Sized> {
    rng: &'a mut R,
    current: Option<Segment<V>>,
    ranges: Vec<Range<V>>,
}

impl<'a, V, R> RangeStatemachine<'a, V, R>
where
    V: PartialEq,
    R: Rng + ?Sized,
{
    pub fn new(rng: &'a mut R) -> Self {
        Self {
            rng,
            current: None,
            ranges: vec![],
        }
    }

    /// Points must arrive ordered by `(vessel, timestamp)`.
    pub fn advance(&mut self, point: Point<V>) -> Result<()> {
        let segment = match self.current.take() {
            None => {
                let fuzz = fuzzy_delta(point.timestamp, point.timestamp, false, &mut *self.rng)?;
                Segment {
                    vessel: point.vessel,
                    state: point.state,
                    start: point.timestamp - fuzz,
                    last: point.timestamp,
                }
            }
            Some(mut segment) if segment.vessel == point.vessel && segment.state == point.state => {
                if point.timestamp < segment.last {
                    return NegativeGapSnafu {
                        prev: segment.last,
                        next: point.timestamp,
                    }
                    .fail();
                }
                segment.last = point.timestamp;
                segment
            }
            Some(segment) => {
                let same_vessel = segment.vessel == point.vessel;
                let gap = (point.timestamp, segment.last);
                let end_fuzz = fuzzy_delta(gap.0, gap.1, same_vessel, &mut *self.rng)?;
                let start_fuzz = fuzzy_delta(gap.0, gap.1, same_vessel, &mut *self.rng)?;

                let end = segment.last + end_fuzz;
                self.ranges.push(segment.into_range(end));

                Segment {
                    vessel: point.vessel,
                    state: point.state,
                    start: point.timestamp - start_fuzz,
                    last: point.timestamp,
                }
            }
        };

        self.current = Some(segment);
        Ok(())
    }

    /// Closes the trailing segment, its end is left unfuzzed as there is no
    /// following point to bound the offset.
    pub fn finalize(mut self) -> Vec<Range<V>> {
        if let Some(segment) = self.current.take() {
            let end = segment.last;
            self.ranges.push(segment.into_range(end));
        }
        self.ranges
    }
}

/// Builds ranges from points already deduplicated and ordered by `(vessel, timestamp)`.
pub fn ranges_from_sorted_points<V, R>(
    points: impl IntoIterator<Item = Point<V>>,
    rng: &mut R,
) -> Result<Vec<Range<V>>>
where
    V: PartialEq,
    R: Rng + ?Sized,
{
    let machine = points
        .into_iter()
        .try_fold(RangeStatemachine::new(rng), |mut machine, point| {
            machine.advance(point)?;
            Ok::<_, crate::Error>(machine)
        })?;

    let ranges = machine.finalize();
    debug!("assembled {} ranges", ranges.len());
    Ok(ranges)
}

/// Deduplicates and orders arbitrary points before building ranges from them.
pub fn ranges_from_points<V, R>(
    points: impl IntoIterator<Item = Point<V>>,
    rng: &mut R,
) -> Result<Vec<Range<V>>>
where
    V: Ord + Clone,
    R: Rng + ?Sized,
{
    ranges_from_sorted_points(dedup_and_sort_points(points), rng)
}
