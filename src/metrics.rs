//! DogStatsD Metrics Backend
//!
//! Thread-safe, non-blocking UDP recorder. Degrades to a no-op if the agent
//! is unreachable so instrumentation never takes the client down.

use std::sync::Arc;

use dogstatsd::{Client, Options};

use crate::config::ExporterConfig;
use crate::recorder::MetricsRecorder;

/// Statsd-backed [`MetricsRecorder`] with prefix and global-tag merging.
#[derive(Clone)]
pub struct Metrics {
    client: Arc<Option<Client>>,
    prefix: String,
    global_tags: Vec<String>,
}

impl Metrics {
    pub fn new(config: &ExporterConfig) -> Self {
        let client = match Client::new(Options {
            to_addr: config.statsd_addr.to_string(),
            ..Default::default()
        }) {
            Ok(c) => {
                tracing::info!("DogStatsD client connected to {}", config.statsd_addr);
                Some(c)
            }
            Err(e) => {
                tracing::warn!("Failed to create DogStatsD client: {}. Metrics disabled.", e);
                None
            }
        };

        Metrics {
            client: Arc::new(client),
            prefix: config.metric_prefix.clone(),
            global_tags: config.formatted_tags(),
        }
    }

    fn merge_tags(&self, tags: &[&str]) -> Vec<String> {
        self.global_tags
            .iter()
            .cloned()
            .chain(tags.iter().map(|s| s.to_string()))
            .collect()
    }
}

impl MetricsRecorder for Metrics {
    #[inline]
    fn incr(&self, name: &str, tags: &[&str]) {
        if let Some(ref client) = *self.client {
            let metric_name = format!("{}.{}", self.prefix, name);
            let _ = client.incr(&metric_name, self.merge_tags(tags));
        }
    }

    #[inline]
    fn histogram(&self, name: &str, value: f64, tags: &[&str]) {
        if let Some(ref client) = *self.client {
            let metric_name = format!("{}.{}", self.prefix, name);
            let _ = client.histogram(&metric_name, value.to_string(), self.merge_tags(tags));
        }
    }

    #[inline]
    fn gauge(&self, name: &str, value: f64, tags: &[&str]) {
        if let Some(ref client) = *self.client {
            let metric_name = format!("{}.{}", self.prefix, name);
            let _ = client.gauge(&metric_name, value.to_string(), self.merge_tags(tags));
        }
    }

    #[inline]
    fn timing(&self, name: &str, duration_ms: f64, tags: &[&str]) {
        if let Some(ref client) = *self.client {
            let metric_name = format!("{}.{}", self.prefix, name);
            let _ = client.timing(&metric_name, duration_ms as i64, self.merge_tags(tags));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metrics_degrade_gracefully_without_an_agent() {
        let config = ExporterConfig {
            statsd_addr: "127.0.0.1:0".parse().unwrap(),
            ..ExporterConfig::from_env()
        };
        let metrics = Metrics::new(&config);

        metrics.incr("test.counter", &[]);
        metrics.gauge("test.gauge", 42.0, &[]);
        metrics.histogram("test.histogram", 1.5, &["db.system:redis"]);
        metrics.timing("test.timing", 0.5, &[]);
    }
}
