use crate::config::LogFormat;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Install the global subscriber.
///
/// `RUST_LOG` wins over `log_level` when set. Returns `false` when a global
/// subscriber was already installed (tests call this repeatedly).
pub fn init_tracing(service_name: &str, log_level: &str, format: LogFormat) -> bool {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level));

    let registry = tracing_subscriber::registry().with(env_filter);
    let installed = match format {
        LogFormat::Json => registry
            .with(
                fmt::layer()
                    .with_file(true)
                    .with_line_number(true)
                    .json()
                    .flatten_event(true),
            )
            .try_init(),
        LogFormat::Pretty => registry.with(fmt::layer().pretty()).try_init(),
    }
    .is_ok();

    if installed {
        tracing::info!(service = %service_name, log_level = %log_level, "Tracing initialized");
    }

    installed
}
