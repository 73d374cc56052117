//! Tracing initialization and subscriber setup.

use crate::Config;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_LEVEL: &str = "info";

/// Resolves the filter directive: `RUST_LOG`, then `trace_level`, then `info`.
fn resolve_filter(config: &Config) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = config.trace_level.as_deref().unwrap_or(DEFAULT_LEVEL);
        EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LEVEL))
    })
}

/// Installs a global subscriber writing formatted events to stderr.
///
/// Spans opened around event handling, worker operations and image fetches
/// are included as context on each line, and closed spans are reported with
/// their timing at `debug`.
///
/// # Initialization Behavior
///
/// - An unparseable `trace_level` falls back to `"info"`
/// - Idempotent: safe to call multiple times (only the first call takes
///   effect, later calls are ignored, including when another subscriber is
///   already installed)
///
/// # Example
///
/// ```rust
/// use digidex::observability::init_tracing;
/// use digidex::Config;
///
/// let config = Config {
///     trace_level: Some("digidex=debug".to_string()),
///     ..Default::default()
/// };
///
/// init_tracing(&config);
/// init_tracing(&config);
/// ```
pub fn init_tracing(config: &Config) {
    let subscriber = tracing_subscriber::registry()
        .with(resolve_filter(config))
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_span_events(fmt::format::FmtSpan::CLOSE),
        );

    let _ = subscriber.try_init();
}
