//! Tracing/logging initialization.

use crate::config::LogSettings;
use tracing_subscriber::EnvFilter;

/// Initialize tracing/logging for the process.
///
/// `RUST_LOG` takes precedence over the configured filter. Safe to call
/// multiple times (subsequent calls are no-ops).
pub fn init(settings: &LogSettings) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&settings.filter));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);

    let installed = if settings.json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };

    // Another subscriber (an earlier call, or the host application) keeps
    // the process; this one is dropped.
    if let Err(e) = installed {
        tracing::debug!(error = %e, "global tracing subscriber already installed");
    }
}
