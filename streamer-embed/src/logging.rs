//! Logging setup: env-filtered `tracing` output with local timezone timestamps.

use chrono::Local;
use tracing_subscriber::{
    EnvFilter,
    fmt::{self, format::Writer, time::FormatTime},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

/// Default log filter directive.
pub const DEFAULT_LOG_FILTER: &str = "streamer_embed=info,streamer_platforms=info,sqlx=warn";

/// Formats timestamps in the server's local timezone.
#[derive(Debug, Clone, Copy)]
struct LocalTimer;

impl FormatTime for LocalTimer {
    fn format_time(&self, w: &mut Writer<'_>) -> std::fmt::Result {
        let now = Local::now();
        write!(w, "{}", now.format("%Y-%m-%dT%H:%M:%S%.3f%:z"))
    }
}

/// Build the filter: `RUST_LOG` wins, then `configured`, then [`DEFAULT_LOG_FILTER`].
fn build_filter(configured: Option<&str>) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(configured.unwrap_or(DEFAULT_LOG_FILTER)))
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER))
}

/// Install the global subscriber. Output goes to stderr so rendered markup
/// on stdout stays clean.
pub fn init_logging(configured: Option<&str>, json: bool) -> crate::Result<()> {
    let filter = build_filter(configured);
    let registry = tracing_subscriber::registry().with(filter);

    let result = if json {
        registry
            .with(
                fmt::layer()
                    .json()
                    .with_timer(LocalTimer)
                    .with_writer(std::io::stderr),
            )
            .try_init()
    } else {
        registry
            .with(
                fmt::layer()
                    .with_ansi(true)
                    .with_timer(LocalTimer)
                    .with_writer(std::io::stderr),
            )
            .try_init()
    };

    result.map_err(|e| crate::Error::Other(format!("Failed to set global default subscriber: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter_parses() {
        assert!(EnvFilter::try_new(DEFAULT_LOG_FILTER).is_ok());
    }

    #[test]
    fn test_local_timer_format() {
        let mut buf = String::new();
        LocalTimer.format_time(&mut Writer::new(&mut buf)).unwrap();
        // e.g. 2024-06-01T12:00:00.000+02:00
        assert_eq!(buf.len(), 29);
        assert_eq!(&buf[10..11], "T");
    }
}
