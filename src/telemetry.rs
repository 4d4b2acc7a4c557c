//! Opt-in log output for hosts embedding `pattern-chart`.
//!
//! The engine only emits `tracing` events: chart builds and teardowns at
//! `debug`, marker pushes and animation frames at `trace`, backend cleanup
//! failures at `warn`. Nothing is printed until a subscriber is installed.

/// Directive used by [`init_default_tracing`] when `RUST_LOG` is unset.
pub const DEFAULT_FILTER: &str = "pattern_chart=info";

/// Installs a compact fmt subscriber filtered by `RUST_LOG`, falling back to
/// [`DEFAULT_FILTER`].
///
/// Returns `false` without the `telemetry` feature or when a global
/// subscriber is already set.
#[must_use]
pub fn init_default_tracing() -> bool {
    init_tracing(DEFAULT_FILTER)
}

/// Like [`init_default_tracing`] with a caller-chosen fallback directive,
/// e.g. `"pattern_chart=trace"` to follow every animation frame.
#[must_use]
pub fn init_tracing(fallback_directive: &str) -> bool {
    #[cfg(feature = "telemetry")]
    {
        use tracing_subscriber::EnvFilter;

        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(fallback_directive));
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .compact()
            .try_init()
            .is_ok()
    }

    #[cfg(not(feature = "telemetry"))]
    {
        let _ = fallback_directive;
        false
    }
}
