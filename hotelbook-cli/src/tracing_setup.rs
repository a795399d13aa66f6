//! Tracing and OpenTelemetry setup for the hotelbook CLI
//!
//! Usage:
//!   hotelbook --debug serve             # Debug logging to console
//!   hotelbook --otel serve              # Export traces to OTLP endpoint
//!   RUST_LOG=hotelbook_server=debug hotelbook serve
//!
//! Filter precedence: RUST_LOG, then `--debug`, then the `[logging]` section.
//!
//! Environment variables:
//!   RUST_LOG                          # Log filter
//!   OTEL_EXPORTER_OTLP_ENDPOINT       # OTLP endpoint (default: http://localhost:4317)
//!   OTEL_SERVICE_NAME                 # Service name (default: hotelbook)

use anyhow::{anyhow, Result};
use hotelbook_server::config::LoggingConfig;
use tracing_subscriber::EnvFilter;

/// Command-line switches that affect tracing
#[derive(Debug, Clone, Copy, Default)]
pub struct Flags {
    pub debug: bool,
    pub otel: bool,
}

/// Directives used when RUST_LOG is not set
fn fallback_directives(flags: Flags, logging: &LoggingConfig) -> String {
    if flags.debug {
        "debug".to_owned()
    } else {
        logging.directives()
    }
}

fn env_filter(flags: Flags, logging: &LoggingConfig) -> Result<EnvFilter> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }
    let directives = fallback_directives(flags, logging);
    EnvFilter::try_new(&directives)
        .map_err(|e| anyhow!("invalid [logging] directives '{}': {}", directives, e))
}

/// Initialize tracing with console output only (no OTEL)
fn init_tracing(flags: Flags, logging: &LoggingConfig) -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(flags, logging)?)
        .with_target(flags.debug || logging.show_targets)
        .compact()
        .try_init()
        .map_err(|err| anyhow!(err))
}

/// Initialize tracing with OpenTelemetry OTLP export
#[cfg(feature = "telemetry")]
fn init_tracing_with_otel(flags: Flags, logging: &LoggingConfig) -> Result<()> {
    use opentelemetry::trace::TracerProvider as _;
    use opentelemetry::KeyValue;
    use opentelemetry_otlp::WithExportConfig;
    use opentelemetry_sdk::trace::TracerProvider;
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let endpoint = std::env::var("OTEL_EXPORTER_OTLP_ENDPOINT")
        .unwrap_or_else(|_| "http://localhost:4317".to_string());

    let service_name =
        std::env::var("OTEL_SERVICE_NAME").unwrap_or_else(|_| "hotelbook".to_string());

    let otlp_exporter = opentelemetry_otlp::SpanExporter::builder()
        .with_tonic()
        .with_endpoint(&endpoint)
        .build()
        .map_err(|e| anyhow!("Failed to create OTLP exporter: {}", e))?;

    let resource = opentelemetry_sdk::Resource::new(vec![KeyValue::new(
        "service.name",
        service_name.clone(),
    )]);

    let provider = TracerProvider::builder()
        .with_batch_exporter(otlp_exporter, opentelemetry_sdk::runtime::Tokio)
        .with_resource(resource)
        .build();

    let tracer = provider.tracer("hotelbook");
    let telemetry_layer = tracing_opentelemetry::layer().with_tracer(tracer);

    // Dropping the provider stops export
    let _ = opentelemetry::global::set_tracer_provider(provider);

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(flags.debug || logging.show_targets)
        .compact();

    tracing_subscriber::registry()
        .with(env_filter(flags, logging)?)
        .with(fmt_layer)
        .with(telemetry_layer)
        .try_init()
        .map_err(|err| anyhow!(err))?;

    tracing::info!(
        endpoint = %endpoint,
        service = %service_name,
        "OpenTelemetry tracing initialized"
    );

    Ok(())
}

/// Shutdown OpenTelemetry (flush pending spans)
#[cfg(feature = "telemetry")]
pub fn shutdown_otel() {
    opentelemetry::global::shutdown_tracer_provider();
}

/// No-op shutdown when telemetry is disabled
#[cfg(not(feature = "telemetry"))]
pub fn shutdown_otel() {}

/// Initialize tracing; chooses between console-only and OTLP export.
pub fn init(flags: Flags, logging: &LoggingConfig) -> Result<()> {
    #[cfg(feature = "telemetry")]
    if flags.otel {
        return init_tracing_with_otel(flags, logging);
    }

    init_tracing(flags, logging)?;

    #[cfg(not(feature = "telemetry"))]
    if flags.otel {
        tracing::warn!("--otel ignored: built without the telemetry feature");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_flag_overrides_config_level() {
        let logging = LoggingConfig {
            level: "warn".into(),
            ..LoggingConfig::default()
        };
        let flags = Flags {
            debug: true,
            otel: false,
        };
        assert_eq!(fallback_directives(flags, &logging), "debug");
    }

    #[test]
    fn config_level_used_without_debug() {
        let logging = LoggingConfig {
            level: "warn".into(),
            ..LoggingConfig::default()
        };
        let directives = fallback_directives(Flags::default(), &logging);
        assert!(directives.starts_with("warn"));
        assert!(EnvFilter::try_new(&directives).is_ok());
    }
}
