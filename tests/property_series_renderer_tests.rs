use chrono::{Days, NaiveDate};
use pattern_chart::api::{ChartStyle, build_chart, line_points};
use pattern_chart::core::{
    Bar, ChartMode, ContainerSize, IndicatorSet, IntradayOffset, TimeAxisMap,
};
use pattern_chart::render::HeadlessBackend;
use proptest::prelude::*;

fn bars_from(closes: &[(f64, u32)]) -> Vec<Bar> {
    let start = NaiveDate::from_ymd_opt(2022, 6, 1).expect("start date");
    let mut day = 0u64;
    closes
        .iter()
        .map(|&(close, gap)| {
            day += u64::from(gap) + 1;
            let open = 100.0;
            Bar::new(
                (start + Days::new(day)).format("%Y-%m-%d").to_string(),
                open,
                open.max(close) + 0.5,
                open.min(close) - 0.5,
                close,
                1_000.0,
            )
            .expect("valid bar")
        })
        .collect()
}

proptest! {
    #[test]
    fn candle_count_matches_bar_count(
        rows in prop::collection::vec((50.0f64..150.0, 0u32..4), 1..120)
    ) {
        let bars = bars_from(&rows);
        let axis = TimeAxisMap::build(&bars, ChartMode::Historical, IntradayOffset::IST)
            .expect("axis")
            .expect("non-empty axis");
        let mut backend = HeadlessBackend::default();
        let handle = build_chart(
            &mut backend,
            &bars,
            &axis,
            &IndicatorSet::default(),
            ContainerSize::new(800, 400),
            &ChartStyle::default(),
        )
        .expect("chart");

        let chart = backend.chart(handle.chart()).expect("stored chart");
        let candles = chart.candlestick_series().expect("candles");
        prop_assert_eq!(candles.data.len(), bars.len());
        prop_assert_eq!(handle.bar_count(), bars.len());
    }

    #[test]
    fn line_points_never_zero_fill(
        values in prop::collection::vec(prop::option::of(1.0f64..500.0), 1..80)
    ) {
        let rows: Vec<(f64, u32)> = values.iter().map(|_| (100.0, 0)).collect();
        let bars = bars_from(&rows);
        let axis = TimeAxisMap::build(&bars, ChartMode::Historical, IntradayOffset::IST)
            .expect("axis")
            .expect("non-empty axis");

        let points = line_points(&values, &axis);
        let defined = values.iter().filter(|value| value.is_some()).count();
        prop_assert_eq!(points.len(), defined);
        prop_assert!(points.iter().all(|point| point.value >= 1.0));
    }
}
