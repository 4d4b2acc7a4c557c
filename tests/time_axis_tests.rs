use pattern_chart::ChartError;
use pattern_chart::core::{Bar, ChartMode, IntradayOffset, TimeAxisMap, TimeCoordinate};

fn bar(key: &str) -> Bar {
    Bar::new(key, 10.0, 11.0, 9.0, 10.5, 100.0).expect("valid bar")
}

fn build(keys: &[&str], mode: ChartMode) -> TimeAxisMap {
    let bars: Vec<Bar> = keys.iter().map(|key| bar(key)).collect();
    TimeAxisMap::build(&bars, mode, IntradayOffset::IST)
        .expect("axis")
        .expect("non-empty axis")
}

#[test]
fn intraday_keys_map_to_epoch_seconds_in_ist() {
    let axis = build(
        &["2024-03-15 09:15", "2024-03-15 09:20:30"],
        ChartMode::Intraday,
    );

    assert_eq!(axis.mode(), ChartMode::Intraday);
    assert_eq!(
        axis.coordinates(),
        &[
            TimeCoordinate::Epoch(1_710_474_300),
            TimeCoordinate::Epoch(1_710_474_630),
        ]
    );
}

#[test]
fn intraday_offset_is_configurable() {
    let bars = vec![bar("2024-03-15 09:15")];
    let utc = IntradayOffset::from_seconds_east(0).expect("utc offset");
    let axis = TimeAxisMap::build(&bars, ChartMode::Intraday, utc)
        .expect("axis")
        .expect("non-empty axis");
    assert_eq!(
        axis.coordinate_at(0),
        Some(&TimeCoordinate::Epoch(1_710_474_300 + 19_800))
    );
    assert!(IntradayOffset::from_seconds_east(90_000).is_err());
}

#[test]
fn historical_keys_keep_the_calendar_date() {
    let axis = build(
        &["2024-03-14", "2024-03-15T00:00:00", "2024-03-18 15:30"],
        ChartMode::Historical,
    );
    assert_eq!(
        axis.coordinates(),
        &[
            TimeCoordinate::Date("2024-03-14".to_owned()),
            TimeCoordinate::Date("2024-03-15".to_owned()),
            TimeCoordinate::Date("2024-03-18".to_owned()),
        ]
    );
}

#[test]
fn empty_bars_produce_no_axis() {
    let axis = TimeAxisMap::build(&[], ChartMode::Historical, IntradayOffset::IST).expect("ok");
    assert!(axis.is_none());
}

#[test]
fn reverse_lookup_resolves_only_loaded_keys() {
    let axis = build(&["2024-01-02", "2024-01-03", "2024-01-04"], ChartMode::Historical);

    assert_eq!(axis.index_of("2024-01-03"), Some(1));
    assert_eq!(
        axis.coordinate_for("2024-01-04"),
        Some(&TimeCoordinate::Date("2024-01-04".to_owned()))
    );
    assert_eq!(axis.index_of("2024-01-05"), None);
    assert_eq!(axis.coordinate_for("2024-01-05"), None);
    assert_eq!(axis.len(), 3);
}

#[test]
fn unparseable_keys_are_reported_with_the_key() {
    let bars = vec![bar("yesterday")];
    let err = TimeAxisMap::build(&bars, ChartMode::Intraday, IntradayOffset::IST)
        .expect_err("must fail");
    assert!(matches!(err, ChartError::InvalidTimeKey { ref key, .. } if key == "yesterday"));

    let err = TimeAxisMap::build(&[bar("2024-02-30")], ChartMode::Historical, IntradayOffset::IST)
        .expect_err("invalid date");
    assert!(matches!(err, ChartError::InvalidTimeKey { .. }));
}

#[test]
fn decreasing_coordinates_are_rejected() {
    let bars = vec![bar("2024-01-03"), bar("2024-01-02")];
    let err = TimeAxisMap::build(&bars, ChartMode::Historical, IntradayOffset::IST)
        .expect_err("must fail");
    assert!(matches!(err, ChartError::InvalidData(_)));
}

#[test]
fn duplicate_keys_are_rejected() {
    let bars = vec![bar("2024-01-02"), bar("2024-01-02")];
    assert!(TimeAxisMap::build(&bars, ChartMode::Historical, IntradayOffset::IST).is_err());
}

#[test]
fn coordinate_order_is_numeric_for_epochs_and_lexicographic_for_dates() {
    assert!(TimeCoordinate::Epoch(9) < TimeCoordinate::Epoch(10));
    assert!(
        TimeCoordinate::Date("2023-12-31".to_owned()) < TimeCoordinate::Date("2024-01-01".to_owned())
    );
}
