use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use crate::core::LogicalRange;
use crate::error::{ChartError, ChartResult};

/// Ease-out quartic: fast start, smooth deceleration into the target.
#[must_use]
pub fn ease_out_quartic(progress: f64) -> f64 {
    let p = progress.clamp(0.0, 1.0);
    1.0 - (1.0 - p).powi(4)
}

/// What happens when a centered target leaves the loaded bars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum NavigationBoundsPolicy {
    /// Keep the target centered even if it extends past the data.
    #[default]
    Unclamped,
    /// Shift the target window inside `[0, bar_count - 1]`, keeping its width.
    ClampToData,
}

/// Tuning for animated viewport navigation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NavigationConfig {
    #[serde(default = "default_duration_ms")]
    pub duration_ms: u64,
    #[serde(default)]
    pub bounds: NavigationBoundsPolicy,
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            duration_ms: default_duration_ms(),
            bounds: NavigationBoundsPolicy::default(),
        }
    }
}

impl NavigationConfig {
    #[must_use]
    pub fn duration(self) -> Duration {
        Duration::from_millis(self.duration_ms)
    }
}

fn default_duration_ms() -> u64 {
    700
}

/// Window of `current`'s width centered on `bar_index`, bounded per `policy`.
pub fn navigation_target(
    current: LogicalRange,
    bar_index: usize,
    bar_count: usize,
    policy: NavigationBoundsPolicy,
) -> ChartResult<LogicalRange> {
    let current = current.validate()?;
    if bar_index >= bar_count {
        return Err(ChartError::InvalidData(format!(
            "navigation bar index {bar_index} is outside {bar_count} loaded bars"
        )));
    }

    let centered = current.centered_on(bar_index as f64);
    match policy {
        NavigationBoundsPolicy::Unclamped => Ok(centered),
        NavigationBoundsPolicy::ClampToData => {
            let last = (bar_count - 1) as f64;
            let width = centered.width();
            let max_from = last - width;
            if max_from < 0.0 {
                Ok(centered.centered_on(0.5 * last))
            } else {
                let from = centered.from.clamp(0.0, max_from);
                Ok(LogicalRange::new(from, from + width))
            }
        }
    }
}

/// Result of advancing the navigator by one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NavigationStep {
    /// No navigation in flight.
    Idle,
    /// Apply this range and request another frame.
    Running(LogicalRange),
    /// Apply this final range; the animation is over.
    Finished(LogicalRange),
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct ViewportAnimation {
    start: LogicalRange,
    target: LogicalRange,
    duration: Duration,
    started_at: Option<Instant>,
    last_progress: f64,
}

/// Drives one animated range transition at a time.
///
/// Starting a new navigation replaces the one in flight, so at most one
/// animation ever writes the visible range. The clock starts on the first
/// frame after `start`.
#[derive(Debug, Clone, Default)]
pub struct ViewportNavigator {
    active: Option<ViewportAnimation>,
    generation: u64,
}

impl ViewportNavigator {
    /// Begins animating from `start` to `target`; returns the new generation.
    pub fn start(&mut self, start: LogicalRange, target: LogicalRange, duration: Duration) -> u64 {
        self.generation += 1;
        self.active = Some(ViewportAnimation {
            start,
            target,
            duration,
            started_at: None,
            last_progress: 0.0,
        });
        self.generation
    }

    /// Drops the animation in flight. Returns `true` when one was running.
    pub fn cancel(&mut self) -> bool {
        if self.active.take().is_some() {
            self.generation += 1;
            return true;
        }
        false
    }

    #[must_use]
    pub fn is_animating(&self) -> bool {
        self.active.is_some()
    }

    /// Generation of the latest started or cancelled navigation.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    #[must_use]
    pub fn target(&self) -> Option<LogicalRange> {
        self.active.map(|animation| animation.target)
    }

    /// Advances to wall-clock time `now`.
    ///
    /// Progress never moves backwards even if `now` does.
    pub fn step(&mut self, now: Instant) -> NavigationStep {
        let Some(animation) = self.active.as_mut() else {
            return NavigationStep::Idle;
        };

        let started_at = *animation.started_at.get_or_insert(now);
        let elapsed = now.saturating_duration_since(started_at);
        let progress = if animation.duration.is_zero() {
            1.0
        } else {
            (elapsed.as_secs_f64() / animation.duration.as_secs_f64()).min(1.0)
        };
        let progress = progress.max(animation.last_progress);
        animation.last_progress = progress;

        if progress >= 1.0 {
            let target = animation.target;
            self.active = None;
            return NavigationStep::Finished(target);
        }

        let eased = ease_out_quartic(progress);
        NavigationStep::Running(animation.start.lerp(animation.target, eased))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn easing_hits_endpoints() {
        assert_relative_eq!(ease_out_quartic(0.0), 0.0);
        assert_relative_eq!(ease_out_quartic(1.0), 1.0);
        assert_relative_eq!(ease_out_quartic(0.5), 0.9375);
        assert_relative_eq!(ease_out_quartic(2.0), 1.0);
    }

    #[test]
    fn clamp_policy_keeps_window_inside_data() {
        let current = LogicalRange::new(10.0, 50.0);
        let target =
            navigation_target(current, 2, 100, NavigationBoundsPolicy::ClampToData).expect("ok");
        assert_relative_eq!(target.from, 0.0);
        assert_relative_eq!(target.to, 40.0);

        let target =
            navigation_target(current, 98, 100, NavigationBoundsPolicy::ClampToData).expect("ok");
        assert_relative_eq!(target.from, 59.0);
        assert_relative_eq!(target.to, 99.0);
    }

    #[test]
    fn unclamped_policy_may_leave_data() {
        let current = LogicalRange::new(10.0, 50.0);
        let target =
            navigation_target(current, 2, 100, NavigationBoundsPolicy::Unclamped).expect("ok");
        assert_relative_eq!(target.from, -18.0);
        assert_relative_eq!(target.to, 22.0);
    }

    #[test]
    fn clock_starts_on_first_frame() {
        let mut navigator = ViewportNavigator::default();
        navigator.start(
            LogicalRange::new(0.0, 10.0),
            LogicalRange::new(10.0, 20.0),
            Duration::from_millis(700),
        );
        let t0 = Instant::now();
        assert_eq!(
            navigator.step(t0),
            NavigationStep::Running(LogicalRange::new(0.0, 10.0))
        );
        assert_eq!(
            navigator.step(t0 + Duration::from_millis(700)),
            NavigationStep::Finished(LogicalRange::new(10.0, 20.0))
        );
        assert_eq!(navigator.step(t0 + Duration::from_millis(800)), NavigationStep::Idle);
    }

    #[test]
    fn restart_replaces_animation_in_flight() {
        let mut navigator = ViewportNavigator::default();
        let first = navigator.start(
            LogicalRange::new(0.0, 10.0),
            LogicalRange::new(10.0, 20.0),
            Duration::from_millis(700),
        );
        let second = navigator.start(
            LogicalRange::new(0.0, 10.0),
            LogicalRange::new(-10.0, 0.0),
            Duration::from_millis(700),
        );
        assert!(second > first);
        assert_eq!(navigator.target(), Some(LogicalRange::new(-10.0, 0.0)));
        assert!(navigator.cancel());
        assert!(!navigator.cancel());
    }
}
