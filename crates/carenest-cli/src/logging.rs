use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Initializes tracing on stderr.
///
/// `RUST_LOG` wins over `default_level` (the config's `logging.level`).
pub fn init(default_level: &str) {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .init();

    tracing::debug!("Tracing initialized");
}
