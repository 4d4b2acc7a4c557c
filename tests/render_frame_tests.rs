use chrono::{Days, NaiveDate};
use pattern_chart::api::HeadlessContainer;
use pattern_chart::core::{Bar, ChartMode, ContainerSize, IndicatorSet, LogicalRange};
use pattern_chart::extensions::{ActiveSelection, PatternEvent, PatternSignal};
use pattern_chart::render::{
    ChartBackend, ChartOptions, Color, HeadlessBackend, LineStrokeStyle, NullRenderer,
    SceneConfig,
};
use pattern_chart::{ChartInput, ChartView, ChartViewConfig};

fn daily_bars(count: u64) -> Vec<Bar> {
    let start = NaiveDate::from_ymd_opt(2024, 1, 1).expect("start date");
    (0..count)
        .map(|i| {
            let open = 100.0 + i as f64;
            let close = if i % 2 == 0 { open + 1.0 } else { open - 1.0 };
            Bar::new(
                (start + Days::new(i)).format("%Y-%m-%d").to_string(),
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

#[test]
fn full_chart_projects_to_a_valid_frame() {
    let bars = daily_bars(10);
    let indicators = IndicatorSet {
        sma_50: (0..10).map(|i| (i >= 3).then(|| 100.0 + i as f64)).collect(),
        sma_200: Vec::new(),
        support: Some(99.0),
        resistance: Some(111.0),
    };
    let patterns = vec![
        PatternEvent::new("Hammer", PatternSignal::Bullish, 70.0, "2024-01-03"),
        PatternEvent::new("Shooting Star", PatternSignal::Bearish, 60.0, "2024-01-05"),
        PatternEvent::new("Doji", PatternSignal::Neutral, 50.0, "2024-01-07"),
    ];
    let active = ActiveSelection::of(&patterns[2]);

    let mut backend = HeadlessBackend::default();
    let mut renderer = NullRenderer::default();
    let mut view = ChartView::mount(
        &mut backend,
        HeadlessContainer::new(ContainerSize::new(900, 500)),
        ChartViewConfig::default(),
    )
    .expect("mount");
    view.render(
        &ChartInput::new(&bars, ChartMode::Historical)
            .with_indicators(&indicators)
            .with_patterns(&patterns)
            .with_active(Some(&active)),
    )
    .expect("render");

    let chart = view.chart_id().expect("chart");
    let frame = view
        .backend()
        .build_render_frame(chart, &SceneConfig::default())
        .expect("frame");
    frame.validate().expect("valid frame");

    // Background, 10 volume bars, 10 candle bodies and one square marker.
    assert_eq!(frame.rects.len(), 22);
    // 10 wicks, 6 SMA segments and 2 price lines.
    assert_eq!(frame.lines.len(), 18);
    assert_eq!(frame.triangles.len(), 2);
    // Two price line titles and three marker labels.
    assert_eq!(frame.texts.len(), 5);
    assert!(frame.texts.iter().any(|text| text.text == "[Doji]"));
    assert!(
        frame
            .lines
            .iter()
            .filter(|line| line.stroke_style == LineStrokeStyle::Dashed)
            .count()
            == 2
    );

    view.backend()
        .render_chart(chart, &SceneConfig::default(), &mut renderer)
        .expect("render frame");
    assert_eq!(renderer.frames_rendered, 1);
    assert_eq!(renderer.last_rect_count, 22);
    assert_eq!(renderer.last_arrow_count, 2);
    assert_eq!(renderer.last_primitive_count, frame.primitive_count());
}

#[test]
fn narrowed_range_only_emits_visible_bars() {
    let bars = daily_bars(40);
    let mut backend = HeadlessBackend::default();
    let mut view = ChartView::mount(
        &mut backend,
        HeadlessContainer::new(ContainerSize::new(800, 400)),
        ChartViewConfig::default(),
    )
    .expect("mount");
    view.render(&ChartInput::new(&bars, ChartMode::Intraday).with_patterns(&[]))
        .expect_err("daily keys are not intraday timestamps");
    view.render(&ChartInput::new(&bars, ChartMode::Historical))
        .expect("render");
    view.set_visible_range(LogicalRange::new(9.5, 19.5))
        .expect("zoom");

    let chart = view.chart_id().expect("chart");
    let frame = view
        .backend()
        .build_render_frame(chart, &SceneConfig::default())
        .expect("frame");
    // Indices 9..=20 fall within half a bar of the range.
    assert_eq!(frame.lines.len(), 12);
    assert_eq!(frame.rects.len(), 1 + 2 * 12);
}

#[test]
fn chart_without_series_projects_to_an_empty_frame() {
    let mut backend = HeadlessBackend::default();
    let chart = backend
        .create_chart(&ChartOptions {
            size: ContainerSize::new(100, 100),
            background_color: Color::rgb(0.0, 0.0, 0.0),
            text_color: Color::rgb(1.0, 1.0, 1.0),
        })
        .expect("chart");
    let frame = backend
        .build_render_frame(chart, &SceneConfig::default())
        .expect("empty chart frame");
    assert!(frame.is_empty());
}
