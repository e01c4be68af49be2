//! Instrument Flow Tests
//!
//! Exercises the full `instrument` entry point with an injected tracer and
//! metrics sink:
//! 1. Exactly one duration observation per call
//! 2. The observation mirrors the span's attribute set
//! 3. No ambient state leaks between calls
//! 4. No-op sinks never panic

use std::net::IpAddr;
use std::time::{Duration, SystemTime};

use opentelemetry::trace::noop::NoopTracer;
use opentelemetry::Context;

use redis_client_otel::{
    instrument, semconv, CommandFlags, Endpoint, InstrumentConfig, MetricKind, NoopMetrics,
    ProfiledCommand,
};
use redis_client_otel::recorder::CapturingMetrics;

fn record() -> ProfiledCommand {
    let created_at = SystemTime::UNIX_EPOCH + Duration::from_secs(1_720_000_000);
    ProfiledCommand::new("GET", created_at, Duration::from_millis(12))
        .with_db(0)
        .with_flags(CommandFlags::FIRE_AND_FORGET)
        .with_endpoint(Endpoint::Ip {
            addr: "10.0.0.7".parse::<IpAddr>().unwrap(),
            port: 6379,
        })
}

#[test]
fn test_one_observation_per_call() {
    let tracer = NoopTracer::new();
    let metrics = CapturingMetrics::new();
    let config = InstrumentConfig::default();

    instrument(&tracer, &Context::new(), &record(), &metrics, &config);

    let captured = metrics.captured();
    assert_eq!(captured.len(), 1);
    assert_eq!(captured[0].name, semconv::METRIC_CLIENT_OPERATION_DURATION);
    assert_eq!(captured[0].kind, MetricKind::Histogram);
    assert_eq!(captured[0].value, Duration::from_millis(12).as_secs_f64());
}

#[test]
fn test_observation_tags_mirror_span_attributes() {
    let tracer = NoopTracer::new();
    let metrics = CapturingMetrics::new();

    instrument(
        &tracer,
        &Context::new(),
        &record(),
        &metrics,
        &InstrumentConfig::default(),
    );

    let observation = &metrics.captured()[0];
    let expected = [
        "db.system:redis",
        "db.operation.name:GET",
        "db.query.text:GET",
        "db.namespace:0",
        "db.redis.flags:FireAndForget",
        "server.address:10.0.0.7",
        "server.port:6379",
        "network.peer.address:10.0.0.7",
        "network.peer.port:6379",
    ];
    assert_eq!(observation.tags, expected);
}

#[test]
fn test_suppressed_query_text_is_absent_from_tags_too() {
    let tracer = NoopTracer::new();
    let metrics = CapturingMetrics::new();
    let config = InstrumentConfig::new().with_query_text(false);

    instrument(&tracer, &Context::new(), &record(), &metrics, &config);

    let observation = &metrics.captured()[0];
    assert!(observation.tags.iter().all(|t| !t.starts_with("db.query.text:")));
    assert!(observation
        .tags
        .iter()
        .any(|t| t == "db.operation.name:GET"));
}

#[test]
fn test_repeated_calls_are_identical() {
    let tracer = NoopTracer::new();
    let config = InstrumentConfig::default();

    let first = CapturingMetrics::new();
    instrument(&tracer, &Context::new(), &record(), &first, &config);

    let second = CapturingMetrics::new();
    instrument(&tracer, &Context::new(), &record(), &second, &config);

    let a = first.captured();
    let b = second.captured();
    assert_eq!(a.len(), b.len());
    assert_eq!(a[0].tags, b[0].tags);
    assert_eq!(a[0].value, b[0].value);
}

#[test]
fn test_minimal_record_degrades_to_mandatory_tags_only() {
    let tracer = NoopTracer::new();
    let metrics = CapturingMetrics::new();
    let minimal = ProfiledCommand::new(
        "PING",
        SystemTime::UNIX_EPOCH + Duration::from_secs(1_720_000_000),
        Duration::ZERO,
    );

    instrument(
        &tracer,
        &Context::new(),
        &minimal,
        &metrics,
        &InstrumentConfig::default(),
    );

    let observation = &metrics.captured()[0];
    assert_eq!(
        observation.tags,
        ["db.system:redis", "db.operation.name:PING", "db.query.text:PING"]
    );
    assert_eq!(observation.value, 0.0);
}

#[test]
fn test_noop_sinks_never_panic() {
    let tracer = NoopTracer::new();
    instrument(
        &tracer,
        &Context::current(),
        &record(),
        &NoopMetrics,
        &InstrumentConfig::new().with_timing_events(true),
    );
}
