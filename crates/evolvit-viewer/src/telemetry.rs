//! OpenTelemetry instrumentation for the viewer.

use anyhow::Result;
use opentelemetry::{global, trace::TracerProvider as _, KeyValue};
use opentelemetry_otlp::WithExportConfig;
use opentelemetry_sdk::{
    runtime,
    trace::{RandomIdGenerator, Sampler, TracerProvider},
    Resource,
};
use opentelemetry_semantic_conventions::resource::{SERVICE_NAME, SERVICE_VERSION};
use std::fs::OpenOptions;
use std::sync::Mutex;
use tracing::info;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Filter used when `RUST_LOG` is unset
const DEFAULT_LOG_FILTER: &str = "info,evolvit_viewer=debug,evolvit_render=debug";

/// Where formatted log lines go
pub enum LogTarget<'a> {
    Stderr,
    File(&'a str),
}

pub fn init_telemetry(otel_endpoint: Option<&str>, target: LogTarget<'_>) -> Result<()> {
    // Check for standard OTEL environment variable, fallback to custom parameter
    let endpoint = std::env::var("OTEL_EXPORTER_OTLP_ENDPOINT")
        .ok()
        .or_else(|| otel_endpoint.map(|s| s.to_string()));

    let resource = Resource::new(vec![
        KeyValue::new(
            SERVICE_NAME,
            std::env::var("OTEL_SERVICE_NAME").unwrap_or_else(|_| "evolvit-viewer".to_string()),
        ),
        KeyValue::new(SERVICE_VERSION, env!("CARGO_PKG_VERSION")),
    ]);

    let tracer_provider = match &endpoint {
        Some(endpoint) => {
            let exporter = opentelemetry_otlp::SpanExporter::builder()
                .with_tonic()
                .with_endpoint(endpoint)
                .build()?;

            TracerProvider::builder()
                .with_batch_exporter(exporter, runtime::Tokio)
                .with_sampler(Sampler::AlwaysOn)
                .with_id_generator(RandomIdGenerator::default())
                .with_resource(resource)
                .build()
        }
        None => TracerProvider::builder()
            .with_sampler(Sampler::AlwaysOff)
            .with_resource(resource)
            .build(),
    };

    global::set_tracer_provider(tracer_provider.clone());

    let telemetry_layer =
        tracing_opentelemetry::layer().with_tracer(tracer_provider.tracer("evolvit-viewer"));

    let (writer, ansi) = match target {
        LogTarget::Stderr => (BoxMakeWriter::new(std::io::stderr), true),
        LogTarget::File(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            (BoxMakeWriter::new(Mutex::new(file)), false)
        }
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_ansi(ansi)
                .with_writer(writer),
        )
        .with(telemetry_layer)
        .init();

    match endpoint {
        Some(endpoint) => info!("OpenTelemetry exporting to {}", endpoint),
        None => info!("OpenTelemetry disabled (no endpoint configured)"),
    }
    info!("Telemetry initialized");
    Ok(())
}

pub fn shutdown_telemetry() {
    info!("Shutting down telemetry");
    global::shutdown_tracer_provider();
}

/// Record a counter metric
#[macro_export]
macro_rules! record_counter {
    ($name:expr, $value:expr) => {
        tracing::debug!(
            counter_name = $name,
            counter_value = $value,
            "Counter metric"
        );
    };
}

/// Record a histogram metric
#[macro_export]
macro_rules! record_histogram {
    ($name:expr, $value:expr) => {
        tracing::debug!(
            histogram_name = $name,
            histogram_value = $value,
            "Histogram metric"
        );
    };
}
