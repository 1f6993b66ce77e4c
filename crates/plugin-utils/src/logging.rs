//! Logging and tracing utilities

use crate::config::LogFormat;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize tracing with an explicit output format
///
/// The filter comes from `RUST_LOG` and defaults to `info`.
pub fn init_tracing_with(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    let resolved = format.resolve();
    match resolved {
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json().with_current_span(true))
            .init(),
        _ => registry.with(tracing_subscriber::fmt::layer()).init(),
    }

    tracing::debug!(requested = ?format, ?resolved, "Tracing initialized");
}
