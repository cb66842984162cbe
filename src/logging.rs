//! Tracing subscriber setup.
//!
//! Logs go to stderr so stdout stays free for tool responses.

use clap::ValueEnum;
use std::sync::Once;
use tracing_subscriber::EnvFilter;

/// Output format for log events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Pretty,
    /// One JSON object per event.
    Json,
}

static INIT_ONCE: Once = Once::new();

const DEFAULT_FILTER: &str = "taskqueue=info";

/// Installs the global tracing subscriber.
///
/// The filter comes from `RUST_LOG` when set and falls back to
/// `taskqueue=info`. Only the first call has an effect; later calls, and
/// calls made after another subscriber was installed, are ignored.
pub fn init(format: LogFormat) {
    INIT_ONCE.call_once(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
        let builder = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr);
        let installed = match format {
            LogFormat::Pretty => builder.try_init(),
            LogFormat::Json => builder.json().try_init(),
        };
        if installed.is_err() {
            tracing::debug!("tracing subscriber already installed");
        }
    });
}
