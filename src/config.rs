//! Instrumentation and Exporter Configuration

use std::env;
use std::net::SocketAddr;

/// Gates for optional span attribute groups.
///
/// Mandatory attributes (`db.system`, `db.operation.name`) are always
/// emitted; these toggles only control the optional groups.
#[derive(Debug, Clone)]
pub struct InstrumentConfig {
    /// Emit `db.query.text`. For this protocol the command verb doubles as
    /// the statement text, but callers may still suppress it where
    /// statements are treated as sensitive.
    pub include_query_text: bool,
    /// Attach `Enqueued` / `Sent` / `ResponseReceived` span events when the
    /// profiler captured those phase timestamps.
    pub include_timing_events: bool,
}

impl Default for InstrumentConfig {
    fn default() -> Self {
        InstrumentConfig {
            include_query_text: true,
            include_timing_events: false,
        }
    }
}

impl InstrumentConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_query_text(mut self, enabled: bool) -> Self {
        self.include_query_text = enabled;
        self
    }

    pub fn with_timing_events(mut self, enabled: bool) -> Self {
        self.include_timing_events = enabled;
        self
    }
}

/// Exporter settings for the Datadog tracing/metrics backends.
///
/// Read from the standard `DD_*` environment variables; every field has a
/// usable local-agent default.
///
/// | Variable | Default | Description |
/// |----------|---------|-------------|
/// | `DD_SERVICE` | `redis-client-otel` | Service name |
/// | `DD_ENV` | `development` | Environment tag |
/// | `DD_VERSION` | pkg version | Service version |
/// | `DD_DOGSTATSD_URL` | `127.0.0.1:8125` | DogStatsD address |
/// | `DD_TRACE_AGENT_URL` | `http://127.0.0.1:8126` | APM agent URL |
/// | `DD_TRACE_SAMPLE_RATE` | `1.0` | Trace sampling rate |
/// | `DD_METRIC_PREFIX` | `redis_client` | Metric name prefix |
/// | `DD_TAGS` | `` | Global tags (k1:v1,k2:v2) |
#[derive(Debug, Clone)]
pub struct ExporterConfig {
    pub service_name: String,
    pub env: String,
    pub version: String,
    pub statsd_addr: SocketAddr,
    pub trace_addr: String,
    pub trace_sample_rate: f64,
    pub metric_prefix: String,
    pub tags: Vec<(String, String)>,
}

impl ExporterConfig {
    pub fn from_env() -> Self {
        let statsd_addr = env::var("DD_DOGSTATSD_URL")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or_else(|| SocketAddr::from(([127, 0, 0, 1], 8125)));

        let trace_sample_rate = env::var("DD_TRACE_SAMPLE_RATE")
            .ok()
            .and_then(|s| s.parse().ok())
            .map(|r: f64| r.clamp(0.0, 1.0))
            .unwrap_or(1.0);

        ExporterConfig {
            service_name: env::var("DD_SERVICE")
                .unwrap_or_else(|_| "redis-client-otel".to_string()),
            env: env::var("DD_ENV").unwrap_or_else(|_| "development".to_string()),
            version: env::var("DD_VERSION")
                .unwrap_or_else(|_| env!("CARGO_PKG_VERSION").to_string()),
            statsd_addr,
            trace_addr: env::var("DD_TRACE_AGENT_URL")
                .unwrap_or_else(|_| "http://127.0.0.1:8126".to_string()),
            trace_sample_rate,
            metric_prefix: env::var("DD_METRIC_PREFIX")
                .unwrap_or_else(|_| "redis_client".to_string()),
            tags: parse_tags(&env::var("DD_TAGS").unwrap_or_default()),
        }
    }

    /// Global tags in `key:value` form, ready to merge into every metric.
    pub fn formatted_tags(&self) -> Vec<String> {
        self.tags
            .iter()
            .map(|(k, v)| format!("{}:{}", k, v))
            .collect()
    }
}

fn parse_tags(raw: &str) -> Vec<(String, String)> {
    raw.split(',')
        .filter_map(|pair| {
            let (k, v) = pair.split_once(':')?;
            let (k, v) = (k.trim(), v.trim());
            if k.is_empty() || v.is_empty() {
                None
            } else {
                Some((k.to_string(), v.to_string()))
            }
        })
        .collect()
}
