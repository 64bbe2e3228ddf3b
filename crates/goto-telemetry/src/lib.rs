//! Tracing setup shared by the goto binaries.
//!
//! [`init`] installs a global subscriber made of an [`EnvFilter`], a `fmt`
//! layer (plain text or JSON) and, when an OTLP endpoint is configured, a
//! `tracing-opentelemetry` layer exporting spans over gRPC. Records emitted
//! through the `log` facade are bridged into tracing.

use opentelemetry::trace::TracerProvider as _;
use opentelemetry_otlp::WithExportConfig;
use opentelemetry_sdk::trace::SdkTracerProvider;
use opentelemetry_sdk::Resource;
use thiserror::Error;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{fmt, EnvFilter, Layer, Registry};
use typed_builder::TypedBuilder;

pub type Result<T> = std::result::Result<T, TelemetryError>;

const DEFAULT_FILTER: &str = "info";

#[derive(Debug, Error)]
pub enum TelemetryError {
    #[error("invalid log filter: {0}")]
    Filter(#[from] tracing_subscriber::filter::ParseError),
    #[error("failed to build OTLP span exporter: {0}")]
    Exporter(#[from] opentelemetry_otlp::ExporterBuildError),
    #[error("failed to bridge log records: {0}")]
    LogBridge(#[from] tracing_log::log::SetLoggerError),
    #[error("failed to install global subscriber: {0}")]
    Subscriber(#[from] tracing::subscriber::SetGlobalDefaultError),
}

/// Output format of the `fmt` layer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, TypedBuilder)]
pub struct TelemetryConfig {
    /// Reported as `service.name` on exported spans.
    #[builder(setter(into))]
    pub service_name: String,
    #[builder(default)]
    pub log_format: LogFormat,
    /// Filter directives. Falls back to `RUST_LOG`, then to `info`.
    #[builder(default, setter(strip_option, into))]
    pub filter: Option<String>,
    /// OTLP gRPC collector endpoint, e.g. `http://localhost:4317`.
    #[builder(default, setter(strip_option, into))]
    pub otlp_endpoint: Option<String>,
}

/// Keeps the span exporter alive; dropping it flushes pending spans.
#[must_use = "dropping the guard shuts down span export"]
pub struct TelemetryGuard {
    provider: Option<SdkTracerProvider>,
}

impl Drop for TelemetryGuard {
    fn drop(&mut self) {
        if let Some(provider) = self.provider.take() {
            if let Err(e) = provider.shutdown() {
                eprintln!("failed to shut down tracer provider: {e}");
            }
        }
    }
}

fn env_filter(directives: Option<&str>) -> Result<EnvFilter> {
    match directives {
        Some(directives) => Ok(EnvFilter::try_new(directives)?),
        None => Ok(EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(DEFAULT_FILTER))?),
    }
}

fn tracer_provider(endpoint: &str, service_name: &str) -> Result<SdkTracerProvider> {
    let exporter = opentelemetry_otlp::SpanExporter::builder()
        .with_tonic()
        .with_endpoint(endpoint)
        .build()?;

    Ok(SdkTracerProvider::builder()
        .with_batch_exporter(exporter)
        .with_resource(
            Resource::builder()
                .with_service_name(service_name.to_string())
                .build(),
        )
        .build())
}

/// Installs the global tracing subscriber. Call once, early in `main`.
pub fn init(config: TelemetryConfig) -> Result<TelemetryGuard> {
    let filter = env_filter(config.filter.as_deref())?;

    let provider = config
        .otlp_endpoint
        .as_deref()
        .map(|endpoint| tracer_provider(endpoint, &config.service_name))
        .transpose()?;
    let otel_layer = provider.as_ref().map(|provider| {
        tracing_opentelemetry::layer().with_tracer(provider.tracer(config.service_name.clone()))
    });

    let fmt_layer = match config.log_format {
        LogFormat::Text => fmt::layer().boxed(),
        LogFormat::Json => fmt::layer().json().boxed(),
    };

    let subscriber = Registry::default()
        .with(filter)
        .with(otel_layer)
        .with(fmt_layer);

    tracing_log::LogTracer::init()?;
    tracing::subscriber::set_global_default(subscriber)?;

    Ok(TelemetryGuard { provider })
}
