use std::cell::RefCell;
use std::rc::Rc;
use std::time::{Duration, Instant};

use chrono::{Days, NaiveDate};
use pattern_chart::api::HeadlessContainer;
use pattern_chart::core::{Bar, ChartMode, ContainerSize};
use pattern_chart::extensions::{
    ActiveSelection, ChartEvent, ChartPlugin, PatternEvent, PatternSignal, PluginContext,
};
use pattern_chart::render::HeadlessBackend;
use pattern_chart::{ChartError, ChartInput, ChartView, ChartViewConfig};

#[derive(Clone)]
struct RecordingPlugin {
    id: String,
    events: Rc<RefCell<Vec<(ChartEvent, PluginContext)>>>,
}

impl RecordingPlugin {
    fn new(id: impl Into<String>, events: Rc<RefCell<Vec<(ChartEvent, PluginContext)>>>) -> Self {
        Self {
            id: id.into(),
            events,
        }
    }
}

impl ChartPlugin for RecordingPlugin {
    fn id(&self) -> &str {
        &self.id
    }

    fn on_event(&mut self, event: ChartEvent, context: PluginContext) {
        self.events.borrow_mut().push((event, context));
    }
}

fn event_kind(event: &ChartEvent) -> &'static str {
    match event {
        ChartEvent::ChartCreated { .. } => "created",
        ChartEvent::ChartDisposed { .. } => "disposed",
        ChartEvent::MarkersApplied { .. } => "markers",
        ChartEvent::NavigationStarted { .. } => "nav_start",
        ChartEvent::NavigationFinished { .. } => "nav_finish",
        ChartEvent::NavigationCancelled => "nav_cancel",
        ChartEvent::Resized { .. } => "resized",
    }
}

fn daily_bars(count: u64) -> Vec<Bar> {
    let start = NaiveDate::from_ymd_opt(2024, 5, 1).expect("start date");
    (0..count)
        .map(|i| {
            Bar::new(
                (start + Days::new(i)).format("%Y-%m-%d").to_string(),
                10.0,
                11.0,
                9.0,
                10.5,
                10.0,
            )
            .expect("valid bar")
        })
        .collect()
}

#[test]
fn plugin_receives_deterministic_event_sequence() {
    let bars = daily_bars(20);
    let patterns = vec![
        PatternEvent::new("Hammer", PatternSignal::Bullish, 70.0, "2024-05-10"),
        PatternEvent::new("Doji", PatternSignal::Neutral, 50.0, "2023-01-01"),
    ];
    let hammer = ActiveSelection::of(&patterns[0]);
    let events = Rc::new(RefCell::new(Vec::new()));

    let mut backend = HeadlessBackend::default();
    {
        let mut view = ChartView::mount(
            &mut backend,
            HeadlessContainer::new(ContainerSize::new(800, 400)),
            ChartViewConfig::default(),
        )
        .expect("mount");
        view.register_plugin(Box::new(RecordingPlugin::new("recorder", events.clone())))
            .expect("register plugin");

        let base = ChartInput::new(&bars, ChartMode::Historical).with_patterns(&patterns);
        view.render(&base).expect("render");
        view.render(&base.with_active(Some(&hammer)))
            .expect("select");
        let t0 = Instant::now();
        view.on_animation_frame(t0).expect("frame");
        view.on_animation_frame(t0 + Duration::from_millis(700))
            .expect("frame");

        let resized = ContainerSize::new(600, 300);
        for observer in view.container_mut().resize(resized) {
            view.on_container_resize(observer, resized).expect("resize");
        }
    }

    let recorded = events.borrow();
    let kinds: Vec<&str> = recorded.iter().map(|(event, _)| event_kind(event)).collect();
    assert_eq!(
        kinds,
        vec![
            "created", "markers", "markers", "nav_start", "nav_finish", "resized", "disposed"
        ]
    );

    let ChartEvent::MarkersApplied { count, dropped } = recorded[1].0 else {
        panic!("expected markers event");
    };
    assert_eq!((count, dropped), (1, 1));

    let ChartEvent::NavigationStarted { bar_index, .. } = recorded[3].0 else {
        panic!("expected navigation start");
    };
    assert_eq!(bar_index, 9);
    assert!(recorded[3].1.animating);
    assert!(!recorded[4].1.animating);

    let (_, created_context) = recorded[0];
    assert_eq!(created_context.bar_count, 20);
    assert_eq!(created_context.mode, Some(ChartMode::Historical));
}

#[test]
fn rebuild_during_navigation_reports_cancellation() {
    let bars = daily_bars(20);
    let more_bars = daily_bars(21);
    let patterns = vec![PatternEvent::new(
        "Hammer",
        PatternSignal::Bullish,
        70.0,
        "2024-05-10",
    )];
    let hammer = ActiveSelection::of(&patterns[0]);
    let events = Rc::new(RefCell::new(Vec::new()));

    let mut backend = HeadlessBackend::default();
    let mut view = ChartView::mount(
        &mut backend,
        HeadlessContainer::new(ContainerSize::new(800, 400)),
        ChartViewConfig::default(),
    )
    .expect("mount");
    view.register_plugin(Box::new(RecordingPlugin::new("recorder", events.clone())))
        .expect("register plugin");

    view.render(
        &ChartInput::new(&bars, ChartMode::Historical)
            .with_patterns(&patterns)
            .with_active(Some(&hammer)),
    )
    .expect("render with selection");
    assert!(view.is_animating());

    view.render(
        &ChartInput::new(&more_bars, ChartMode::Historical)
            .with_patterns(&patterns)
            .with_active(Some(&hammer)),
    )
    .expect("new data");
    assert!(!view.is_animating());

    let kinds: Vec<&str> = events
        .borrow()
        .iter()
        .map(|(event, _)| event_kind(event))
        .collect();
    assert_eq!(
        kinds,
        vec![
            "created",
            "markers",
            "nav_start",
            "nav_cancel",
            "disposed",
            "created",
            "markers"
        ]
    );
}

#[test]
fn plugin_registration_rules() {
    let events = Rc::new(RefCell::new(Vec::new()));
    let mut backend = HeadlessBackend::default();
    let mut view = ChartView::mount(
        &mut backend,
        HeadlessContainer::new(ContainerSize::new(800, 400)),
        ChartViewConfig::default(),
    )
    .expect("mount");

    view.register_plugin(Box::new(RecordingPlugin::new("a", events.clone())))
        .expect("first");
    let duplicate = view.register_plugin(Box::new(RecordingPlugin::new("a", events.clone())));
    assert!(matches!(duplicate, Err(ChartError::InvalidData(_))));
    let empty = view.register_plugin(Box::new(RecordingPlugin::new("", events.clone())));
    assert!(matches!(empty, Err(ChartError::InvalidData(_))));

    assert!(view.has_plugin("a"));
    assert_eq!(view.plugin_count(), 1);
    assert!(view.unregister_plugin("a"));
    assert!(!view.unregister_plugin("a"));
    assert_eq!(view.plugin_count(), 0);
}
