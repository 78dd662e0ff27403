use crate::helper::{point, rng, ts};
use chrono::Duration;
use fishing_ranges::{
    FishingState, MAX_FUZZ_SECONDS, Point, ranges_from_points, ranges_from_sorted_points,
};
use rand::Rng;

#[test]
fn test_state_change_splits_ranges_and_trailing_end_is_exact() {
    let points = vec![
        point(1, 0, FishingState::NotFishing),
        point(1, 100, FishingState::Fishing),
        point(1, 200, FishingState::Fishing),
    ];

    let ranges = ranges_from_points(points, &mut rng(42)).unwrap();

    assert_eq!(ranges.len(), 2);
    let (first, second) = (&ranges[0], &ranges[1]);

    assert_eq!(first.state, FishingState::NotFishing);
    assert!(first.start <= ts(0) && first.start > ts(-MAX_FUZZ_SECONDS));
    assert!(first.end >= ts(0) && first.end < ts(50));

    assert_eq!(second.state, FishingState::Fishing);
    assert!(second.start > ts(50) && second.start <= ts(100));
    assert!(first.end <= second.start);
    assert_eq!(second.end, ts(200));
}

#[test]
fn test_single_point_yields_single_range_ending_at_the_point() {
    let ranges =
        ranges_from_points(vec![point(5, 10, FishingState::Fishing)], &mut rng(1)).unwrap();

    assert_eq!(ranges.len(), 1);
    assert!(ranges[0].start <= ts(10));
    assert!(ranges[0].start > ts(10 - MAX_FUZZ_SECONDS));
    assert_eq!(ranges[0].end, ts(10));
}

#[test]
fn test_empty_input_yields_no_ranges() {
    let ranges =
        ranges_from_points(Vec::<Point<fishing_ranges::Mmsi>>::new(), &mut rng(1)).unwrap();
    assert!(ranges.is_empty());
}

#[test]
fn test_vessel_change_uses_flat_fuzz_cap() {
    let points = vec![
        point(1, 0, FishingState::Fishing),
        point(2, 1, FishingState::Fishing),
    ];

    let ranges = ranges_from_points(points, &mut rng(7)).unwrap();

    assert_eq!(ranges.len(), 2);
    assert_eq!(ranges[0].vessel.as_ref(), "1");
    assert!(ranges[0].end >= ts(0) && ranges[0].end < ts(MAX_FUZZ_SECONDS));
    assert_eq!(ranges[1].vessel.as_ref(), "2");
    assert!(ranges[1].start <= ts(1) && ranges[1].start > ts(1 - MAX_FUZZ_SECONDS));
    assert_eq!(ranges[1].end, ts(1));
}

#[test]
fn test_only_the_last_range_of_the_stream_is_unfuzzed() {
    let points = vec![
        point(1, 0, FishingState::Fishing),
        point(1, 1000, FishingState::Fishing),
        point(2, 0, FishingState::NotFishing),
        point(2, 1000, FishingState::NotFishing),
    ];

    let mut ends = vec![];
    for seed in 0..50 {
        let ranges = ranges_from_points(points.clone(), &mut rng(seed)).unwrap();
        assert_eq!(ranges.len(), 2);
        assert_eq!(ranges[1].end, ts(1000));
        ends.push(ranges[0].end);
    }
    // The first vessel's end is fuzzed against the flat cap.
    assert!(ends.iter().any(|e| *e > ts(1000)));
    assert!(ends.iter().all(|e| *e < ts(1000 + MAX_FUZZ_SECONDS)));
}

#[test]
fn test_unknown_segments_are_emitted() {
    let points = vec![
        point(1, 0, FishingState::Fishing),
        point(1, 100, FishingState::Unknown),
        point(1, 200, FishingState::Unknown),
        point(1, 300, FishingState::NotFishing),
    ];

    let ranges = ranges_from_points(points, &mut rng(3)).unwrap();

    let states: Vec<_> = ranges.iter().map(|r| r.state).collect();
    assert_eq!(
        states,
        vec![
            FishingState::Fishing,
            FishingState::Unknown,
            FishingState::NotFishing
        ]
    );
    assert!(ranges[1].start > ts(50) && ranges[1].start <= ts(100));
    assert!(ranges[1].end >= ts(200) && ranges[1].end < ts(250));
}

#[test]
fn test_conflicting_duplicates_become_unknown_range() {
    let points = vec![
        point(1, 0, FishingState::Fishing),
        point(1, 100, FishingState::Fishing),
        point(1, 100, FishingState::NotFishing),
        point(1, 200, FishingState::Fishing),
    ];

    let ranges = ranges_from_points(points, &mut rng(3)).unwrap();

    assert_eq!(ranges.len(), 3);
    assert_eq!(ranges[1].state, FishingState::Unknown);
}

#[test]
fn test_seeded_rng_gives_identical_ranges() {
    let points = vec![
        point(1, 0, FishingState::NotFishing),
        point(1, 3600, FishingState::Fishing),
        point(1, 7200, FishingState::NotFishing),
        point(2, 0, FishingState::Fishing),
    ];

    let first = ranges_from_points(points.clone(), &mut rng(99)).unwrap();
    let second = ranges_from_points(points, &mut rng(99)).unwrap();

    assert_eq!(first, second);
}

#[test]
fn test_ranges_of_a_vessel_never_overlap() {
    let mut source = rng(2024);
    let points: Vec<_> = (0..2000)
        .map(|_| {
            let state = match source.random_range(0..3) {
                0 => FishingState::Fishing,
                1 => FishingState::NotFishing,
                _ => FishingState::Unknown,
            };
            point(
                source.random_range(1..=4),
                source.random_range(0..50_000),
                state,
            )
        })
        .collect();

    for seed in 0..10 {
        let ranges = ranges_from_points(points.clone(), &mut rng(seed)).unwrap();

        for range in &ranges {
            assert!(range.start <= range.end);
        }
        for pair in ranges.windows(2) {
            if pair[0].vessel == pair[1].vessel {
                assert!(
                    pair[0].end <= pair[1].start,
                    "{:?} overlaps {:?}",
                    pair[0],
                    pair[1]
                );
                assert_ne!(pair[0].state, pair[1].state);
            }
        }
    }
}

#[test]
fn test_sorted_input_with_negative_gap_is_rejected() {
    let state_change = vec![
        point(1, 100, FishingState::Fishing),
        point(1, 0, FishingState::NotFishing),
    ];
    assert!(ranges_from_sorted_points(state_change, &mut rng(1)).is_err());

    let same_state = vec![
        point(1, 100, FishingState::Fishing),
        point(1, 0, FishingState::Fishing),
    ];
    assert!(ranges_from_sorted_points(same_state, &mut rng(1)).is_err());
}

#[test]
fn test_fuzz_never_exceeds_half_gap_between_close_points() {
    let points = vec![
        point(1, 0, FishingState::Fishing),
        point(1, 3, FishingState::NotFishing),
    ];

    for seed in 0..50 {
        let ranges = ranges_from_points(points.clone(), &mut rng(seed)).unwrap();
        // A three second gap leaves a one second cap, which only allows a zero offset.
        assert_eq!(ranges[0].end, ts(0));
        assert_eq!(ranges[1].start, ts(3));
        assert!(ranges[1].start - ranges[0].end == Duration::seconds(3));
    }
}
