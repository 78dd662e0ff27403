use chrono::{DateTime, Duration, TimeZone, Utc};
use fishing_ranges::{FishingState, Mmsi, Point, Range};
use rand::{SeedableRng, rngs::StdRng};

pub fn base() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2016, 3, 1, 0, 0, 0).unwrap()
}

pub fn ts(seconds: i64) -> DateTime<Utc> {
    base() + Duration::seconds(seconds)
}

pub fn point(vessel: u32, seconds: i64, state: FishingState) -> Point<Mmsi> {
    Point::new(Mmsi::from(vessel), ts(seconds), state)
}

pub fn range(vessel: u32, start: i64, end: i64, state: FishingState) -> Range<Mmsi> {
    Range::new(Mmsi::from(vessel), ts(start), ts(end), state).unwrap()
}

pub fn rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}
