use crate::helper::{range, ts};
use chrono::Duration;
use fishing_ranges::{
    FishingState, fishing_series, fishing_series_unordered, group_ranges_by_vessel,
};

#[test]
fn test_range_boundaries_are_inclusive() {
    let ranges = vec![range(1, 1000, 2000, FishingState::Fishing)];
    let timestamps = vec![ts(999), ts(1000), ts(1500), ts(2000), ts(2001)];

    let series = fishing_series(&timestamps, &ranges).unwrap();

    assert_eq!(
        series,
        vec![
            FishingState::Unknown,
            FishingState::Fishing,
            FishingState::Fishing,
            FishingState::Fishing,
            FishingState::Unknown,
        ]
    );
}

#[test]
fn test_unsorted_timestamps_are_rejected() {
    let ranges = vec![range(1, 0, 10, FishingState::Fishing)];
    let timestamps = vec![ts(0), ts(5), ts(3)];

    assert!(fishing_series(&timestamps, &ranges).is_err());
}

#[test]
fn test_ranges_of_different_vessels_are_rejected() {
    let ranges = vec![
        range(1, 0, 10, FishingState::Fishing),
        range(2, 20, 30, FishingState::NotFishing),
    ];
    let timestamps = vec![ts(0), ts(25)];

    assert!(fishing_series(&timestamps, &ranges).is_err());
}

#[test]
fn test_unknown_ranges_do_not_label() {
    let ranges = vec![
        range(1, 0, 100, FishingState::NotFishing),
        range(1, 40, 60, FishingState::Unknown),
    ];
    let timestamps = vec![ts(10), ts(50), ts(90)];

    let series = fishing_series(&timestamps, &ranges).unwrap();

    assert_eq!(series, vec![FishingState::NotFishing; 3]);
}

#[test]
fn test_empty_inputs() {
    let ranges = vec![range(1, 0, 100, FishingState::NotFishing)];
    assert!(fishing_series(&[], &ranges).unwrap().is_empty());

    let no_ranges: Vec<fishing_ranges::Range<fishing_ranges::Mmsi>> = vec![];
    assert_eq!(
        fishing_series(&[ts(0), ts(1)], &no_ranges).unwrap(),
        vec![FishingState::Unknown; 2]
    );
}

#[test]
fn test_latest_ending_range_wins_overlaps_regardless_of_order() {
    let early = range(1, 0, 100, FishingState::Fishing);
    let late = range(1, 50, 150, FishingState::NotFishing);
    let timestamps = vec![ts(25), ts(75), ts(125)];
    let expected = vec![
        FishingState::Fishing,
        FishingState::NotFishing,
        FishingState::NotFishing,
    ];

    assert_eq!(
        fishing_series(&timestamps, &[early.clone(), late.clone()]).unwrap(),
        expected
    );
    assert_eq!(fishing_series(&timestamps, &[late, early]).unwrap(), expected);
}

#[test]
fn test_gaps_between_ranges_stay_unknown() {
    let ranges = vec![
        range(1, 0, 100, FishingState::Fishing),
        range(1, 200, 300, FishingState::NotFishing),
    ];
    let timestamps: Vec<_> = (0..=6).map(|i| ts(i * 50)).collect();

    let series = fishing_series(&timestamps, &ranges).unwrap();

    assert_eq!(
        series,
        vec![
            FishingState::Fishing,
            FishingState::Fishing,
            FishingState::Fishing,
            FishingState::Unknown,
            FishingState::NotFishing,
            FishingState::NotFishing,
            FishingState::NotFishing,
        ]
    );
}

#[test]
fn test_unordered_series_keeps_input_order() {
    let ranges = vec![range(1, 100, 200, FishingState::Fishing)];
    let timestamps = vec![ts(300), ts(150), ts(0), ts(100) + Duration::seconds(1)];

    let series = fishing_series_unordered(&timestamps, &ranges).unwrap();

    assert_eq!(
        series,
        vec![
            FishingState::Unknown,
            FishingState::Fishing,
            FishingState::Unknown,
            FishingState::Fishing,
        ]
    );
}

#[test]
fn test_group_ranges_by_vessel() {
    let ranges = vec![
        range(2, 0, 10, FishingState::Fishing),
        range(1, 0, 10, FishingState::Fishing),
        range(2, 20, 30, FishingState::NotFishing),
    ];

    let grouped = group_ranges_by_vessel(ranges);

    assert_eq!(grouped.len(), 2);
    let (first_vessel, first_ranges) = grouped.iter().next().unwrap();
    assert_eq!(first_vessel.as_ref(), "1");
    assert_eq!(first_ranges.len(), 1);
    let second: Vec<_> = grouped.values().nth(1).unwrap().iter().map(|r| r.state).collect();
    assert_eq!(second, vec![FishingState::Fishing, FishingState::NotFishing]);
}
