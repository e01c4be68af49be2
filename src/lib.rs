//! OpenTelemetry Instrumentation for Profiled Redis Commands
//!
//! Translates command-execution records delivered by a Redis client's
//! profiling hook into OpenTelemetry client spans and duration metrics. The
//! profiler reports after the fact, so spans are reconstructed with the
//! record's own timestamps rather than the clock at mapping time.
//!
//! # Usage
//!
//! ```rust,ignore
//! use opentelemetry::Context;
//! use redis_client_otel::{instrument, InstrumentConfig, ProfiledCommand, noop_metrics};
//!
//! let config = InstrumentConfig::default();
//! let metrics = noop_metrics();
//!
//! // Delivered by the client's profiling subscription:
//! let record: ProfiledCommand = profiled_command;
//!
//! let tracer = opentelemetry::global::tracer("redis-client");
//! instrument(&tracer, &Context::current(), &record, &*metrics, &config);
//! ```
//!
//! # Span Attributes
//!
//! | Attribute | When |
//! |-----------|------|
//! | `db.system` | always, `"redis"` |
//! | `db.operation.name` | always, the command verb |
//! | `db.query.text` | unless suppressed via config |
//! | `db.namespace` | database index present (including 0) |
//! | `db.redis.flags` | any command flag set |
//! | `server.address` / `server.port` | per endpoint variant |
//! | `network.peer.address` / `network.peer.port` | IP endpoints only |

pub mod config;
pub mod instrument;
pub mod profiling;
pub mod recorder;
pub mod semconv;

// Feature-gated Datadog backends for the produced spans and metrics
#[cfg(feature = "datadog")]
pub mod metrics;
#[cfg(feature = "datadog")]
pub mod telemetry;

pub use config::{ExporterConfig, InstrumentConfig};
pub use instrument::{command_span_builder, instrument};
pub use profiling::{CommandFlags, Endpoint, ProfiledCommand};
pub use recorder::{
    capturing_metrics, noop_metrics, CapturedMetric, CapturingMetrics, MetricKind,
    MetricsRecorder, NoopMetrics, SharedMetrics,
};

#[cfg(feature = "datadog")]
pub use metrics::Metrics;
#[cfg(feature = "datadog")]
pub use telemetry::{init as init_telemetry, shutdown};
