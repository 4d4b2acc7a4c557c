use std::time::Instant;

use tracing::{debug, trace, warn};

use crate::api::{
    ChartHandle, ChartViewConfig, Container, ResizeObserverId, ResizeReactor, build_chart,
};
use crate::core::{
    Bar, ChartMode, ContainerSize, IndicatorSet, IntradayOffset, LogicalRange, TimeAxisMap,
};
use crate::error::{ChartError, ChartResult};
use crate::extensions::{
    ActiveSelection, ChartEvent, ChartPlugin, Marker, PatternEvent, PluginContext,
    project_pattern_markers,
};
use crate::interaction::{NavigationStep, ViewportNavigator, navigation_target};
use crate::render::{ChartBackend, ChartId};

/// Everything a view renders from, borrowed for one `render` call.
#[derive(Debug, Clone, Copy)]
pub struct ChartInput<'a> {
    pub bars: &'a [Bar],
    pub mode: ChartMode,
    pub indicators: Option<&'a IndicatorSet>,
    pub patterns: &'a [PatternEvent],
    pub active: Option<&'a ActiveSelection>,
}

impl<'a> ChartInput<'a> {
    #[must_use]
    pub fn new(bars: &'a [Bar], mode: ChartMode) -> Self {
        Self {
            bars,
            mode,
            indicators: None,
            patterns: &[],
            active: None,
        }
    }

    #[must_use]
    pub fn with_indicators(mut self, indicators: &'a IndicatorSet) -> Self {
        self.indicators = Some(indicators);
        self
    }

    #[must_use]
    pub fn with_patterns(mut self, patterns: &'a [PatternEvent]) -> Self {
        self.patterns = patterns;
        self
    }

    #[must_use]
    pub fn with_active(mut self, active: Option<&'a ActiveSelection>) -> Self {
        self.active = active;
        self
    }
}

/// Outcome of one animation frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationStatus {
    Idle,
    Running,
    Finished,
}

impl AnimationStatus {
    /// Whether the host should schedule another frame.
    #[must_use]
    pub fn needs_next_frame(self) -> bool {
        self == Self::Running
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
struct RenderedData {
    bars: Vec<Bar>,
    mode: ChartMode,
    indicators: IndicatorSet,
}

/// One interactive chart mounted in a container.
///
/// `render` runs three effects in a fixed order: rebuild the chart when
/// bars, mode or indicators change; push markers when patterns or the
/// selection change (or after a rebuild); start or cancel navigation when
/// the selection changes. Frames are stepped by the host through
/// `on_animation_frame`, resizes through `on_container_resize`.
pub struct ChartView<B: ChartBackend, C: Container> {
    backend: B,
    container: C,
    config: ChartViewConfig,
    offset: IntradayOffset,
    rendered: Option<RenderedData>,
    handle: Option<ChartHandle>,
    axis: Option<TimeAxisMap>,
    patterns: Vec<PatternEvent>,
    active: Option<ActiveSelection>,
    markers: Vec<Marker>,
    navigator: ViewportNavigator,
    reactor: ResizeReactor,
    plugins: Vec<Box<dyn ChartPlugin>>,
    disposed: bool,
}

impl<B: ChartBackend, C: Container> ChartView<B, C> {
    /// Mounts a view and subscribes to container resizes.
    ///
    /// No chart exists until the first `render` with non-empty bars.
    pub fn mount(backend: B, mut container: C, config: ChartViewConfig) -> ChartResult<Self> {
        let config = config.validate()?;
        let offset = config.intraday_offset()?;
        let mut reactor = ResizeReactor::default();
        reactor.attach(&mut container);

        Ok(Self {
            backend,
            container,
            config,
            offset,
            rendered: None,
            handle: None,
            axis: None,
            patterns: Vec::new(),
            active: None,
            markers: Vec::new(),
            navigator: ViewportNavigator::default(),
            reactor,
            plugins: Vec::new(),
            disposed: false,
        })
    }

    pub fn render(&mut self, input: &ChartInput<'_>) -> ChartResult<()> {
        self.ensure_mounted()?;

        let empty = IndicatorSet::default();
        let indicators = input.indicators.unwrap_or(&empty);
        let data_changed = self.rendered.as_ref().is_none_or(|rendered| {
            rendered.mode != input.mode
                || rendered.bars != input.bars
                || rendered.indicators != *indicators
        });
        let selection_changed = self.active.as_ref() != input.active;
        let patterns_changed = self.patterns != input.patterns;

        if data_changed {
            self.rebuild(input.bars, input.mode, indicators)?;
        }

        if data_changed || patterns_changed || selection_changed {
            self.patterns = input.patterns.to_vec();
            self.active = input.active.cloned();
            self.apply_markers()?;
        }

        if selection_changed {
            self.navigate_to_selection()?;
        }
        Ok(())
    }

    /// Advances an in-flight navigation to `now` and applies the range.
    pub fn on_animation_frame(&mut self, now: Instant) -> ChartResult<AnimationStatus> {
        let Some(chart) = self.chart_id() else {
            self.navigator.cancel();
            return Ok(AnimationStatus::Idle);
        };

        match self.navigator.step(now) {
            NavigationStep::Idle => Ok(AnimationStatus::Idle),
            NavigationStep::Running(range) => {
                self.backend.set_visible_logical_range(chart, range)?;
                trace!(%chart, from = range.from, to = range.to, "navigation frame");
                Ok(AnimationStatus::Running)
            }
            NavigationStep::Finished(range) => {
                self.backend.set_visible_logical_range(chart, range)?;
                debug!(%chart, from = range.from, to = range.to, "navigation finished");
                self.emit(ChartEvent::NavigationFinished { range });
                Ok(AnimationStatus::Finished)
            }
        }
    }

    /// Forwards a container size change to the live chart.
    ///
    /// Returns `true` when the chart was resized.
    pub fn on_container_resize(
        &mut self,
        observer: ResizeObserverId,
        size: ContainerSize,
    ) -> ChartResult<bool> {
        let Some(size) = self.reactor.accept(observer, size) else {
            return Ok(false);
        };
        let Some(chart) = self.chart_id() else {
            return Ok(false);
        };
        self.backend.resize(chart, size)?;
        debug!(%chart, width = size.width, height = size.height, "chart resized");
        self.emit(ChartEvent::Resized { size });
        Ok(true)
    }

    /// Applies a user pan or zoom; any in-flight navigation stops.
    pub fn set_visible_range(&mut self, range: LogicalRange) -> ChartResult<()> {
        let chart = self.chart_id().ok_or_else(|| {
            ChartError::InvalidData("no chart is built to apply a visible range to".to_owned())
        })?;
        self.cancel_navigation();
        self.backend.set_visible_logical_range(chart, range)
    }

    pub fn visible_range(&self) -> ChartResult<Option<LogicalRange>> {
        match self.chart_id() {
            Some(chart) => self.backend.visible_logical_range(chart),
            None => Ok(None),
        }
    }

    /// Tears down the chart and detaches the resize observer. Idempotent.
    pub fn dispose(&mut self) -> ChartResult<()> {
        if self.disposed {
            return Ok(());
        }
        self.disposed = true;
        self.cancel_navigation();
        self.reactor.detach(&mut self.container);
        self.teardown_chart()
    }

    /// Registers a plugin with unique identifier.
    pub fn register_plugin(&mut self, plugin: Box<dyn ChartPlugin>) -> ChartResult<()> {
        let plugin_id = plugin.id().to_owned();
        if plugin_id.is_empty() {
            return Err(ChartError::InvalidData(
                "plugin id must not be empty".to_owned(),
            ));
        }
        if self.has_plugin(&plugin_id) {
            return Err(ChartError::InvalidData(format!(
                "plugin with id `{plugin_id}` is already registered"
            )));
        }
        self.plugins.push(plugin);
        Ok(())
    }

    /// Unregisters a plugin by id. Returns `true` when removed.
    pub fn unregister_plugin(&mut self, plugin_id: &str) -> bool {
        if let Some(position) = self.plugins.iter().position(|entry| entry.id() == plugin_id) {
            self.plugins.remove(position);
            return true;
        }
        false
    }

    #[must_use]
    pub fn plugin_count(&self) -> usize {
        self.plugins.len()
    }

    #[must_use]
    pub fn has_plugin(&self, plugin_id: &str) -> bool {
        self.plugins.iter().any(|plugin| plugin.id() == plugin_id)
    }

    #[must_use]
    pub fn backend(&self) -> &B {
        &self.backend
    }

    #[must_use]
    pub fn container(&self) -> &C {
        &self.container
    }

    #[must_use]
    pub fn container_mut(&mut self) -> &mut C {
        &mut self.container
    }

    #[must_use]
    pub fn config(&self) -> &ChartViewConfig {
        &self.config
    }

    #[must_use]
    pub fn handle(&self) -> Option<&ChartHandle> {
        self.handle.as_ref()
    }

    #[must_use]
    pub fn chart_id(&self) -> Option<ChartId> {
        self.handle.as_ref().map(ChartHandle::chart)
    }

    #[must_use]
    pub fn time_axis(&self) -> Option<&TimeAxisMap> {
        self.axis.as_ref()
    }

    /// Markers last pushed to the candlestick series.
    #[must_use]
    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    #[must_use]
    pub fn active_selection(&self) -> Option<&ActiveSelection> {
        self.active.as_ref()
    }

    #[must_use]
    pub fn is_animating(&self) -> bool {
        self.navigator.is_animating()
    }

    #[must_use]
    pub fn navigation_target(&self) -> Option<LogicalRange> {
        self.navigator.target()
    }

    #[must_use]
    pub fn resize_observer(&self) -> Option<ResizeObserverId> {
        self.reactor.observer()
    }

    #[must_use]
    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    fn ensure_mounted(&self) -> ChartResult<()> {
        if self.disposed {
            return Err(ChartError::InvalidData(
                "chart view is already disposed".to_owned(),
            ));
        }
        Ok(())
    }

    fn rebuild(
        &mut self,
        bars: &[Bar],
        mode: ChartMode,
        indicators: &IndicatorSet,
    ) -> ChartResult<()> {
        self.cancel_navigation();
        self.rendered = None;
        self.markers.clear();
        self.teardown_chart()?;

        let Some(axis) = TimeAxisMap::build(bars, mode, self.offset)? else {
            debug!(%mode, "no bars loaded, chart not built");
            self.store_rendered(bars, mode, indicators);
            return Ok(());
        };

        let size = self.container.content_size();
        let handle = build_chart(
            &mut self.backend,
            bars,
            &axis,
            indicators,
            size,
            &self.config.style,
        )?;
        let chart = handle.chart();
        self.reactor.sync(size);
        self.axis = Some(axis);
        self.handle = Some(handle);
        self.store_rendered(bars, mode, indicators);

        debug!(%chart, %mode, bars = bars.len(), "chart rebuilt");
        self.emit(ChartEvent::ChartCreated {
            chart,
            mode,
            bar_count: bars.len(),
        });
        Ok(())
    }

    fn store_rendered(&mut self, bars: &[Bar], mode: ChartMode, indicators: &IndicatorSet) {
        self.rendered = Some(RenderedData {
            bars: bars.to_vec(),
            mode,
            indicators: indicators.clone(),
        });
    }

    fn teardown_chart(&mut self) -> ChartResult<()> {
        self.axis = None;
        let Some(handle) = self.handle.take() else {
            return Ok(());
        };
        let chart = handle.chart();
        handle.dispose(&mut self.backend)?;
        self.emit(ChartEvent::ChartDisposed { chart });
        Ok(())
    }

    fn apply_markers(&mut self) -> ChartResult<()> {
        let (Some(handle), Some(axis)) = (self.handle.as_ref(), self.axis.as_ref()) else {
            self.markers.clear();
            return Ok(());
        };

        let markers = project_pattern_markers(
            &self.patterns,
            axis,
            self.active.as_ref(),
            &self.config.markers,
        );
        self.backend.set_markers(handle.candles(), &markers)?;

        let count = markers.len();
        let dropped = self.patterns.len() - count;
        debug!(chart = %handle.chart(), count, dropped, "markers applied");
        self.markers = markers;
        self.emit(ChartEvent::MarkersApplied { count, dropped });
        Ok(())
    }

    fn navigate_to_selection(&mut self) -> ChartResult<()> {
        let resolved = match (self.active.as_ref(), self.axis.as_ref(), self.chart_id()) {
            (Some(selection), Some(axis), Some(chart)) => axis
                .index_of(&selection.date)
                .map(|index| (chart, index, axis.len())),
            _ => None,
        };

        let Some((chart, bar_index, bar_count)) = resolved else {
            self.cancel_navigation();
            return Ok(());
        };

        let current = match self.backend.visible_logical_range(chart)? {
            Some(range) => range,
            None => LogicalRange::new(-0.5, bar_count as f64 - 0.5),
        };
        let navigation = self.config.navigation;
        let target = navigation_target(current, bar_index, bar_count, navigation.bounds)?;
        let generation = self
            .navigator
            .start(current, target, navigation.duration());

        debug!(
            %chart,
            bar_index,
            generation,
            from = target.from,
            to = target.to,
            "navigation started"
        );
        self.emit(ChartEvent::NavigationStarted { bar_index, target });
        Ok(())
    }

    fn cancel_navigation(&mut self) {
        if self.navigator.cancel() {
            debug!(generation = self.navigator.generation(), "navigation cancelled");
            self.emit(ChartEvent::NavigationCancelled);
        }
    }

    fn plugin_context(&self) -> PluginContext {
        PluginContext {
            chart: self.chart_id(),
            mode: self.handle.as_ref().map(ChartHandle::mode),
            bar_count: self.handle.as_ref().map_or(0, ChartHandle::bar_count),
            marker_count: self.markers.len(),
            animating: self.navigator.is_animating(),
        }
    }

    fn emit(&mut self, event: ChartEvent) {
        if self.plugins.is_empty() {
            return;
        }
        let context = self.plugin_context();
        for plugin in &mut self.plugins {
            plugin.on_event(event, context);
        }
    }
}

impl<B: ChartBackend, C: Container> Drop for ChartView<B, C> {
    fn drop(&mut self) {
        if let Err(err) = self.dispose() {
            warn!(error = %err, "chart view teardown failed");
        }
    }
}
