use std::time::{Duration, Instant};

use approx::assert_relative_eq;
use chrono::{Days, NaiveDate};
use pattern_chart::api::{AnimationStatus, HeadlessContainer};
use pattern_chart::core::{Bar, ChartMode, ContainerSize, LogicalRange};
use pattern_chart::extensions::{ActiveSelection, PatternEvent, PatternSignal};
use pattern_chart::interaction::{
    NavigationBoundsPolicy, NavigationConfig, NavigationStep, ViewportNavigator,
    ease_out_quartic, navigation_target,
};
use pattern_chart::render::HeadlessBackend;
use pattern_chart::{ChartInput, ChartView, ChartViewConfig};

fn daily_bars(count: u64) -> Vec<Bar> {
    let start = NaiveDate::from_ymd_opt(2023, 1, 1).expect("start date");
    (0..count)
        .map(|i| {
            Bar::new(
                (start + Days::new(i)).format("%Y-%m-%d").to_string(),
                10.0,
                12.0,
                9.0,
                11.0,
                100.0,
            )
            .expect("valid bar")
        })
        .collect()
}

fn date_of(bars: &[Bar], index: usize) -> String {
    bars[index].source_key.clone()
}

#[test]
fn target_preserves_width_and_centers_the_bar() {
    let target = navigation_target(
        LogicalRange::new(10.0, 50.0),
        100,
        150,
        NavigationBoundsPolicy::Unclamped,
    )
    .expect("target");
    assert_relative_eq!(target.from, 80.0);
    assert_relative_eq!(target.to, 120.0);
}

#[test]
fn navigator_converges_to_the_target_range() {
    let start = LogicalRange::new(10.0, 50.0);
    let target = LogicalRange::new(80.0, 120.0);
    let mut navigator = ViewportNavigator::default();
    navigator.start(start, target, Duration::from_millis(700));

    let t0 = Instant::now();
    let mut previous = start.from;
    let mut last = None;
    for frame in 0..=50u64 {
        match navigator.step(t0 + Duration::from_millis(frame * 16)) {
            NavigationStep::Running(range) => {
                assert!(range.from >= previous);
                assert_relative_eq!(range.width(), 40.0, epsilon = 1e-9);
                previous = range.from;
            }
            NavigationStep::Finished(range) => {
                last = Some(range);
                break;
            }
            NavigationStep::Idle => panic!("navigator went idle before finishing"),
        }
    }
    assert_eq!(last, Some(target));
    assert!(!navigator.is_animating());
}

#[test]
fn zero_duration_finishes_on_first_frame() {
    let mut navigator = ViewportNavigator::default();
    let target = LogicalRange::new(5.0, 15.0);
    navigator.start(LogicalRange::new(0.0, 10.0), target, Duration::ZERO);
    assert_eq!(navigator.step(Instant::now()), NavigationStep::Finished(target));
}

#[test]
fn progress_does_not_run_backwards_with_an_older_clock() {
    let mut navigator = ViewportNavigator::default();
    navigator.start(
        LogicalRange::new(0.0, 10.0),
        LogicalRange::new(100.0, 110.0),
        Duration::from_millis(700),
    );
    let t0 = Instant::now();
    navigator.step(t0);
    let NavigationStep::Running(later) = navigator.step(t0 + Duration::from_millis(350)) else {
        panic!("still running");
    };
    let NavigationStep::Running(replayed) = navigator.step(t0 + Duration::from_millis(100)) else {
        panic!("still running");
    };
    assert!(replayed.from >= later.from);
}

#[test]
fn easing_is_ease_out_quartic() {
    assert_relative_eq!(ease_out_quartic(0.25), 1.0 - 0.75f64.powi(4));
    assert_relative_eq!(ease_out_quartic(-1.0), 0.0);
}

#[test]
fn selecting_a_pattern_animates_the_view() {
    let bars = daily_bars(150);
    let events = vec![PatternEvent::new(
        "Engulfing",
        PatternSignal::Bullish,
        72.0,
        date_of(&bars, 100),
    )];
    let active = ActiveSelection::of(&events[0]);
    let mut backend = HeadlessBackend::default();
    let mut view = ChartView::mount(
        &mut backend,
        HeadlessContainer::new(ContainerSize::new(1200, 600)),
        ChartViewConfig::default(),
    )
    .expect("mount");

    let base = ChartInput::new(&bars, ChartMode::Historical).with_patterns(&events);
    view.render(&base).expect("render");
    view.set_visible_range(LogicalRange::new(10.0, 50.0))
        .expect("user zoom");
    view.render(&base.with_active(Some(&active)))
        .expect("select");

    assert!(view.is_animating());
    assert_eq!(view.navigation_target(), Some(LogicalRange::new(80.0, 120.0)));

    let t0 = Instant::now();
    assert_eq!(view.on_animation_frame(t0).expect("frame"), AnimationStatus::Running);
    assert_eq!(
        view.on_animation_frame(t0 + Duration::from_millis(350))
            .expect("frame"),
        AnimationStatus::Running
    );
    assert_eq!(
        view.on_animation_frame(t0 + Duration::from_millis(700))
            .expect("frame"),
        AnimationStatus::Finished
    );
    assert_eq!(
        view.visible_range().expect("range"),
        Some(LogicalRange::new(80.0, 120.0))
    );
    assert_eq!(
        view.on_animation_frame(t0 + Duration::from_millis(800))
            .expect("frame"),
        AnimationStatus::Idle
    );
}

#[test]
fn deselecting_cancels_navigation_without_reanimating() {
    let bars = daily_bars(60);
    let events = vec![PatternEvent::new(
        "Doji",
        PatternSignal::Neutral,
        50.0,
        date_of(&bars, 30),
    )];
    let active = ActiveSelection::of(&events[0]);
    let mut backend = HeadlessBackend::default();
    let mut view = ChartView::mount(
        &mut backend,
        HeadlessContainer::new(ContainerSize::new(800, 400)),
        ChartViewConfig::default(),
    )
    .expect("mount");

    let base = ChartInput::new(&bars, ChartMode::Historical).with_patterns(&events);
    view.render(&base).expect("render");
    view.render(&base.with_active(Some(&active)))
        .expect("select");
    assert!(view.is_animating());

    let toggled = ActiveSelection::toggle(view.active_selection(), &events[0]);
    assert_eq!(toggled, None);
    view.render(&base.with_active(toggled.as_ref()))
        .expect("deselect");

    assert!(!view.is_animating());
    assert_eq!(
        view.on_animation_frame(Instant::now()).expect("frame"),
        AnimationStatus::Idle
    );
    let chart = view.chart_id().expect("chart");
    let stored = view.backend().chart(chart).expect("stored chart");
    assert!(stored.range_history.is_empty());
}

#[test]
fn a_new_selection_replaces_the_running_navigation() {
    let bars = daily_bars(200);
    let events = vec![
        PatternEvent::new("A", PatternSignal::Bullish, 60.0, date_of(&bars, 20)),
        PatternEvent::new("B", PatternSignal::Bearish, 60.0, date_of(&bars, 180)),
    ];
    let first = ActiveSelection::of(&events[0]);
    let second = ActiveSelection::of(&events[1]);
    let mut backend = HeadlessBackend::default();
    let mut view = ChartView::mount(
        &mut backend,
        HeadlessContainer::new(ContainerSize::new(800, 400)),
        ChartViewConfig::default(),
    )
    .expect("mount");

    let base = ChartInput::new(&bars, ChartMode::Historical).with_patterns(&events);
    view.render(&base).expect("render");
    view.set_visible_range(LogicalRange::new(0.0, 40.0))
        .expect("zoom");
    view.render(&base.with_active(Some(&first))).expect("first");

    let t0 = Instant::now();
    view.on_animation_frame(t0).expect("frame");
    view.on_animation_frame(t0 + Duration::from_millis(200))
        .expect("frame");

    view.render(&base.with_active(Some(&second))).expect("second");
    let target = view.navigation_target().expect("running");
    assert_relative_eq!(target.center(), 180.0);

    let t1 = t0 + Duration::from_millis(250);
    view.on_animation_frame(t1).expect("frame");
    let status = view
        .on_animation_frame(t1 + Duration::from_millis(700))
        .expect("frame");
    assert_eq!(status, AnimationStatus::Finished);

    let range = view.visible_range().expect("range").expect("some range");
    assert_relative_eq!(range.center(), 180.0);
    assert_relative_eq!(range.width(), 40.0, epsilon = 1e-9);
}

#[test]
fn clamp_policy_keeps_the_view_on_loaded_bars() {
    let bars = daily_bars(50);
    let events = vec![PatternEvent::new(
        "Edge",
        PatternSignal::Bullish,
        60.0,
        date_of(&bars, 1),
    )];
    let active = ActiveSelection::of(&events[0]);
    let config = ChartViewConfig::default().with_navigation(NavigationConfig {
        duration_ms: 0,
        bounds: NavigationBoundsPolicy::ClampToData,
    });
    let mut backend = HeadlessBackend::default();
    let mut view = ChartView::mount(
        &mut backend,
        HeadlessContainer::new(ContainerSize::new(800, 400)),
        config,
    )
    .expect("mount");

    let base = ChartInput::new(&bars, ChartMode::Historical).with_patterns(&events);
    view.render(&base).expect("render");
    view.set_visible_range(LogicalRange::new(20.0, 40.0))
        .expect("zoom");
    view.render(&base.with_active(Some(&active))).expect("select");

    assert_eq!(
        view.on_animation_frame(Instant::now()).expect("frame"),
        AnimationStatus::Finished
    );
    assert_eq!(
        view.visible_range().expect("range"),
        Some(LogicalRange::new(0.0, 20.0))
    );
}

#[test]
fn user_pan_stops_the_animation() {
    let bars = daily_bars(80);
    let events = vec![PatternEvent::new(
        "Hammer",
        PatternSignal::Bullish,
        70.0,
        date_of(&bars, 60),
    )];
    let active = ActiveSelection::of(&events[0]);
    let mut backend = HeadlessBackend::default();
    let mut view = ChartView::mount(
        &mut backend,
        HeadlessContainer::new(ContainerSize::new(800, 400)),
        ChartViewConfig::default(),
    )
    .expect("mount");

    let base = ChartInput::new(&bars, ChartMode::Historical).with_patterns(&events);
    view.render(&base).expect("render");
    view.render(&base.with_active(Some(&active))).expect("select");
    assert!(view.is_animating());

    view.set_visible_range(LogicalRange::new(5.0, 25.0))
        .expect("pan");
    assert!(!view.is_animating());
    assert_eq!(
        view.visible_range().expect("range"),
        Some(LogicalRange::new(5.0, 25.0))
    );
}
