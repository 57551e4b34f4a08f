use tracing_subscriber::{
    fmt::format::Format, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter,
};

const DEFAULT_FILTER: &str = "sharebox=debug,tower_http=debug";

/// Initialize tracing.
///
/// Production gets JSON lines; everything else gets the compact console
/// format. `RUST_LOG` overrides the default filter. Calling this twice is
/// harmless: the second subscriber is rejected and the first stays active.
pub fn init_telemetry(environment: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_FILTER.into());
    let is_production = matches!(environment.to_lowercase().as_str(), "production" | "prod");

    let result = if is_production {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .try_init()
    } else {
        let console_fmt = tracing_subscriber::fmt::layer().event_format(
            Format::default()
                .compact()
                .with_target(false)
                .without_time(),
        );
        tracing_subscriber::registry()
            .with(filter)
            .with(console_fmt)
            .try_init()
    };

    match result {
        Ok(()) => tracing::info!(environment = %environment, "Tracing initialized"),
        Err(e) => tracing::debug!(error = %e, "Tracing subscriber already set"),
    }
}
