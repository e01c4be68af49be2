//! Metrics Sink Abstraction
//!
//! The mapper records its duration observation through this trait, so
//! production code can hand in a real statsd-backed client while tests hand
//! in an in-memory capturing recorder. The sink is externally owned and must
//! be safe for concurrent use; the mapper itself holds no state.

use std::sync::Arc;

use parking_lot::Mutex;

/// Capability for recording metric observations.
pub trait MetricsRecorder: Send + Sync + 'static {
    /// Increment a counter by 1.
    fn incr(&self, name: &str, tags: &[&str]);

    /// Record a histogram/distribution value.
    fn histogram(&self, name: &str, value: f64, tags: &[&str]);

    /// Set a gauge value.
    fn gauge(&self, name: &str, value: f64, tags: &[&str]);

    /// Record a timing in milliseconds.
    fn timing(&self, name: &str, duration_ms: f64, tags: &[&str]);
}

/// No-op recorder - zero overhead when metrics are disabled.
#[derive(Clone, Copy, Default)]
pub struct NoopMetrics;

impl MetricsRecorder for NoopMetrics {
    #[inline]
    fn incr(&self, _name: &str, _tags: &[&str]) {}
    #[inline]
    fn histogram(&self, _name: &str, _value: f64, _tags: &[&str]) {}
    #[inline]
    fn gauge(&self, _name: &str, _value: f64, _tags: &[&str]) {}
    #[inline]
    fn timing(&self, _name: &str, _duration_ms: f64, _tags: &[&str]) {}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricKind {
    Counter,
    Histogram,
    Gauge,
    Timing,
}

/// One observation captured by [`CapturingMetrics`].
#[derive(Debug, Clone)]
pub struct CapturedMetric {
    pub name: String,
    pub value: f64,
    pub tags: Vec<String>,
    pub kind: MetricKind,
}

/// In-memory recorder for tests: keeps every observation for inspection.
#[derive(Default)]
pub struct CapturingMetrics {
    captured: Mutex<Vec<CapturedMetric>>,
}

impl CapturingMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// All observations recorded so far, in call order.
    pub fn captured(&self) -> Vec<CapturedMetric> {
        self.captured.lock().clone()
    }

    /// Observations recorded under `name`.
    pub fn by_name(&self, name: &str) -> Vec<CapturedMetric> {
        self.captured
            .lock()
            .iter()
            .filter(|m| m.name == name)
            .cloned()
            .collect()
    }

    pub fn clear(&self) {
        self.captured.lock().clear();
    }

    fn push(&self, name: &str, value: f64, tags: &[&str], kind: MetricKind) {
        self.captured.lock().push(CapturedMetric {
            name: name.to_string(),
            value,
            tags: tags.iter().map(|s| s.to_string()).collect(),
            kind,
        });
    }
}

impl MetricsRecorder for CapturingMetrics {
    fn incr(&self, name: &str, tags: &[&str]) {
        self.push(name, 1.0, tags, MetricKind::Counter);
    }

    fn histogram(&self, name: &str, value: f64, tags: &[&str]) {
        self.push(name, value, tags, MetricKind::Histogram);
    }

    fn gauge(&self, name: &str, value: f64, tags: &[&str]) {
        self.push(name, value, tags, MetricKind::Gauge);
    }

    fn timing(&self, name: &str, duration_ms: f64, tags: &[&str]) {
        self.push(name, duration_ms, tags, MetricKind::Timing);
    }
}

/// Arc wrapper for trait object usage.
pub type SharedMetrics = Arc<dyn MetricsRecorder>;

/// Create a no-op metrics recorder.
pub fn noop_metrics() -> SharedMetrics {
    Arc::new(NoopMetrics)
}

/// Create a capturing metrics recorder for tests.
pub fn capturing_metrics() -> Arc<CapturingMetrics> {
    Arc::new(CapturingMetrics::new())
}
