use tracing_subscriber::EnvFilter;

use crate::config::LoggingSettings;

/// Install the global subscriber
///
/// `LOG_LEVEL` and `LOG_FORMAT` override the configured values, and
/// `RUST_LOG` takes precedence over both for the filter. Calling this twice
/// is harmless: the second install is ignored.
pub fn init(settings: &LoggingSettings) {
    let level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| settings.level.clone());
    let format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| settings.format.clone());

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true);

    let installed = match format.as_str() {
        "pretty" => subscriber.pretty().try_init(),
        "json" => subscriber.json().try_init(),
        _ => subscriber.try_init(),
    };

    if installed.is_err() {
        tracing::debug!("Tracing subscriber already installed");
    }
}
