//! Event-to-Span Mapping
//!
//! Turns one profiled command into one client span and one duration
//! observation. The span is a reconstruction of an operation that already
//! completed: both timestamps come from the record, never from the clock at
//! mapping time, since profiling events arrive after the fact and out of
//! order relative to span creation.

use opentelemetry::trace::{Event, Span, SpanBuilder, SpanKind, Tracer};
use opentelemetry::{Context, KeyValue};

use crate::config::InstrumentConfig;
use crate::profiling::{Endpoint, ProfiledCommand};
use crate::recorder::MetricsRecorder;
use crate::semconv;

/// Build the span descriptor for one profiled command.
///
/// The returned builder carries the span name (the command verb), explicit
/// start/end timestamps, `SpanKind::Client`, and the full attribute set.
/// Attributes are strictly conditional: an absent source field produces no
/// tag at all, never a null or sentinel value.
pub fn command_span_builder(record: &ProfiledCommand, config: &InstrumentConfig) -> SpanBuilder {
    let mut attributes = Vec::with_capacity(9);

    attributes.push(KeyValue::new(semconv::DB_SYSTEM, semconv::DB_SYSTEM_REDIS));
    attributes.push(KeyValue::new(
        semconv::DB_OPERATION_NAME,
        record.command.clone(),
    ));
    if config.include_query_text {
        // Single-verb protocol: operation name and statement text coincide.
        attributes.push(KeyValue::new(semconv::DB_QUERY_TEXT, record.command.clone()));
    }
    if let Some(db) = record.db {
        // 0 selects a real database; only a missing index is omitted.
        attributes.push(KeyValue::new(semconv::DB_NAMESPACE, db));
    }
    if !record.flags.is_empty() {
        attributes.push(KeyValue::new(semconv::DB_REDIS_FLAGS, record.flags.render()));
    }
    append_endpoint_attributes(&mut attributes, record.endpoint.as_ref());

    let mut builder = SpanBuilder::from_name(record.command.clone())
        .with_kind(SpanKind::Client)
        .with_start_time(record.created_at)
        .with_end_time(record.completed_at())
        .with_attributes(attributes);

    if config.include_timing_events {
        let events = phase_events(record);
        if !events.is_empty() {
            builder = builder.with_events(events);
        }
    }

    builder
}

/// Map one profiled command to a child span of `parent` plus a duration
/// observation on `metrics`.
///
/// Exactly one span and one observation per call, tagged identically so the
/// two stay consistent with each other. Total over well-formed records:
/// absent optional fields degrade to omitted attributes, never to a panic.
pub fn instrument<T: Tracer>(
    tracer: &T,
    parent: &Context,
    record: &ProfiledCommand,
    metrics: &dyn MetricsRecorder,
    config: &InstrumentConfig,
) -> T::Span {
    let completed_at = record.completed_at();
    let builder = command_span_builder(record, config);

    let tags = metric_tags(builder.attributes.as_deref().unwrap_or(&[]));
    let tag_refs: Vec<&str> = tags.iter().map(String::as_str).collect();
    metrics.histogram(
        semconv::METRIC_CLIENT_OPERATION_DURATION,
        record.elapsed.as_secs_f64(),
        &tag_refs,
    );

    let mut span = builder.start_with_context(tracer, parent);
    // Close at the historical end, overriding any sink that would stamp
    // "now" on end.
    span.end_with_timestamp(completed_at);
    span
}

/// Endpoint resolution: exactly one arm applies per call.
///
/// Name endpoints populate only the `server.*` pair: peer resolution has not
/// happened for DNS targets at profiling time. Opaque endpoints have no port
/// concept, so the port key stays absent rather than being set to zero.
fn append_endpoint_attributes(attributes: &mut Vec<KeyValue>, endpoint: Option<&Endpoint>) {
    match endpoint {
        Some(Endpoint::Ip { addr, port }) => {
            let addr = addr.to_string();
            let port = i64::from(*port);
            attributes.push(KeyValue::new(semconv::SERVER_ADDRESS, addr.clone()));
            attributes.push(KeyValue::new(semconv::SERVER_PORT, port));
            attributes.push(KeyValue::new(semconv::NETWORK_PEER_ADDRESS, addr));
            attributes.push(KeyValue::new(semconv::NETWORK_PEER_PORT, port));
        }
        Some(Endpoint::Name { host, port }) => {
            attributes.push(KeyValue::new(semconv::SERVER_ADDRESS, host.clone()));
            attributes.push(KeyValue::new(semconv::SERVER_PORT, i64::from(*port)));
        }
        Some(Endpoint::Other(raw)) => {
            attributes.push(KeyValue::new(semconv::SERVER_ADDRESS, raw.clone()));
        }
        None => {}
    }
}

/// Span events for whichever pipeline phase timestamps the profiler captured.
fn phase_events(record: &ProfiledCommand) -> Vec<Event> {
    [
        (semconv::EVENT_ENQUEUED, record.enqueued_at),
        (semconv::EVENT_SENT, record.sent_at),
        (semconv::EVENT_RESPONSE_RECEIVED, record.response_received_at),
    ]
    .into_iter()
    .filter_map(|(name, at)| at.map(|ts| Event::new(name, ts, Vec::new(), 0)))
    .collect()
}

/// Span attributes rendered as `key:value` metric tags, so the observation
/// carries the same attribute set as the span.
fn metric_tags(attributes: &[KeyValue]) -> Vec<String> {
    attributes
        .iter()
        .map(|kv| format!("{}:{}", kv.key.as_str(), kv.value.as_str()))
        .collect()
}
