use tracing_subscriber::EnvFilter;

use crate::settings::LoggingSettings;

/// Installs the global subscriber. `RUST_LOG` takes precedence over the
/// configured level. Safe to call more than once; later calls are ignored.
pub fn init_tracing(service_name: &str, logging: &LoggingSettings) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&logging.level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);
    let installed = if logging.json {
        builder.json().try_init().is_ok()
    } else {
        builder.try_init().is_ok()
    };

    if installed {
        tracing::info!(service = service_name, json = logging.json, "logging initialized");
    }
}
