use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crate::{ConfigError, ObservabilityConfig};

/// Initialize the global tracing subscriber.
///
/// `RUST_LOG` wins when set; otherwise the workspace crates log at the
/// configured level and everything else at `warn`. Logs go to stderr so
/// stdout stays free for command output.
pub fn init_tracing(config: &ObservabilityConfig) -> Result<(), ConfigError> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = &config.log_level;
        EnvFilter::new(format!("warn,answer_engine={level}"))
    });

    let fmt_layer = if config.log_json {
        tracing_subscriber::fmt::layer()
            .json()
            .with_target(true)
            .with_writer(std::io::stderr)
            .boxed()
    } else {
        tracing_subscriber::fmt::layer()
            .with_target(true)
            .with_writer(std::io::stderr)
            .boxed()
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()
        .map_err(|e| ConfigError::Tracing(e.to_string()))
}
