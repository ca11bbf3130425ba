use crate::core::config::LoggingConfig;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

// The occupancy poller hits the backend every few seconds
const QUIET_DEPENDENCIES: &str = "hyper_util=warn,reqwest=warn";

fn console_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("{},{}", level, QUIET_DEPENDENCIES)))
}

/// Install the global subscriber; `RUST_LOG` wins over the configured level
pub fn init_tracing(config: &LoggingConfig) {
    let filter = console_filter(&config.level);

    if config.console || config.format == "console" {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_ansi(true)
                    .with_line_number(true),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json().with_current_span(true))
            .init();
    }
}
