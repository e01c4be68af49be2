//! Tracer Pipeline Setup
//!
//! Wires the Datadog exporter into `tracing-subscriber` so spans produced by
//! [`crate::instrument`] flow to the APM agent alongside regular log output.

use opentelemetry_datadog::DatadogPropagator;
use opentelemetry_sdk::trace::Sampler;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::config::ExporterConfig;

/// Install the exporter pipeline and the subscriber registry.
///
/// The returned error is only ever a pipeline-construction failure; the
/// mapper itself has no failure mode.
pub fn init(config: &ExporterConfig) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    opentelemetry::global::set_text_map_propagator(DatadogPropagator::default());

    // Requires a running tokio runtime for the batch exporter.
    let tracer = opentelemetry_datadog::new_pipeline()
        .with_service_name(&config.service_name)
        .with_agent_endpoint(&config.trace_addr)
        .with_trace_config(
            opentelemetry_sdk::trace::Config::default()
                .with_sampler(Sampler::TraceIdRatioBased(config.trace_sample_rate))
                .with_resource(opentelemetry_sdk::Resource::new(vec![
                    opentelemetry::KeyValue::new("service.name", config.service_name.clone()),
                    opentelemetry::KeyValue::new("service.version", config.version.clone()),
                    opentelemetry::KeyValue::new("deployment.environment", config.env.clone()),
                ])),
        )
        .install_batch(opentelemetry_sdk::runtime::Tokio)?;

    let otel_layer = tracing_opentelemetry::layer().with_tracer(tracer);

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .with(otel_layer)
        .init();

    tracing::info!(
        service = %config.service_name,
        env = %config.env,
        version = %config.version,
        sample_rate = %config.trace_sample_rate,
        "Redis client telemetry initialized"
    );

    Ok(())
}

/// Flush pending spans and tear down the provider. Call before exit.
pub fn shutdown() {
    tracing::info!("Shutting down Redis client telemetry...");
    opentelemetry::global::shutdown_tracer_provider();
}
