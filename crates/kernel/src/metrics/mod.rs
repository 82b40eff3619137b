//! Prometheus metrics collection.
//!
//! Provides catalog request timings in Prometheus format.

use std::time::Duration;

use prometheus_client::encoding::{EncodeLabelSet, text::encode};
use prometheus_client::metrics::counter::Counter;
use prometheus_client::metrics::family::Family;
use prometheus_client::metrics::histogram::{Histogram, exponential_buckets};
use prometheus_client::registry::Registry;

/// Endpoint labels.
#[derive(Clone, Debug, Hash, PartialEq, Eq, EncodeLabelSet)]
pub struct EndpointLabels {
    pub endpoint: String,
}

/// Error labels.
#[derive(Clone, Debug, Hash, PartialEq, Eq, EncodeLabelSet)]
pub struct ErrorLabels {
    pub endpoint: String,
    pub code: String,
}

/// Application metrics.
pub struct Metrics {
    registry: Registry,

    /// Total handler time per endpoint.
    pub request_duration_seconds: Family<EndpointLabels, Histogram>,

    /// Time holding a store connection per endpoint.
    pub store_duration_seconds: Family<EndpointLabels, Histogram>,

    /// Failed requests by endpoint and error code.
    pub request_errors: Family<ErrorLabels, Counter>,
}

impl Metrics {
    /// Create a new metrics registry.
    pub fn new() -> Self {
        let mut registry = Registry::default();

        let request_duration_seconds =
            Family::<EndpointLabels, Histogram>::new_with_constructor(|| {
                Histogram::new(exponential_buckets(0.001, 2.0, 12))
            });
        registry.register(
            "catalog_request_duration_seconds",
            "Catalog request handling time in seconds",
            request_duration_seconds.clone(),
        );

        let store_duration_seconds =
            Family::<EndpointLabels, Histogram>::new_with_constructor(|| {
                Histogram::new(exponential_buckets(0.0001, 2.0, 14))
            });
        registry.register(
            "catalog_store_duration_seconds",
            "Catalog store time in seconds",
            store_duration_seconds.clone(),
        );

        let request_errors = Family::<ErrorLabels, Counter>::default();
        registry.register(
            "catalog_request_errors",
            "Failed catalog requests",
            request_errors.clone(),
        );

        Self {
            registry,
            request_duration_seconds,
            store_duration_seconds,
            request_errors,
        }
    }

    /// Record a served request.
    pub fn record_request(&self, endpoint: &str, total: Duration, store: Option<Duration>) {
        let labels = EndpointLabels {
            endpoint: endpoint.to_string(),
        };

        self.request_duration_seconds
            .get_or_create(&labels)
            .observe(total.as_secs_f64());

        if let Some(store) = store {
            self.store_duration_seconds
                .get_or_create(&labels)
                .observe(store.as_secs_f64());
        }
    }

    /// Record a failed request.
    pub fn record_error(&self, endpoint: &str, code: &str) {
        let labels = ErrorLabels {
            endpoint: endpoint.to_string(),
            code: code.to_string(),
        };
        self.request_errors.get_or_create(&labels).inc();
    }

    /// Encode metrics in Prometheus text format.
    ///
    /// # Panics
    ///
    /// Panics if Prometheus metric encoding to a `String` buffer fails.
    /// The `fmt::Write` impl for `String` is infallible.
    pub fn encode(&self) -> String {
        let mut buffer = String::new();
        #[allow(clippy::expect_used)]
        encode(&mut buffer, &self.registry).expect("encoding metrics");
        buffer
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Metrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Metrics").finish()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn records_request_timings() {
        let metrics = Metrics::new();
        metrics.record_request(
            "search",
            Duration::from_millis(12),
            Some(Duration::from_millis(8)),
        );

        let output = metrics.encode();
        assert!(output.contains("catalog_request_duration_seconds"));
        assert!(output.contains("catalog_store_duration_seconds"));
        assert!(output.contains("endpoint=\"search\""));
    }

    #[test]
    fn records_errors_by_code() {
        let metrics = Metrics::new();
        metrics.record_error("movie", "STORE_UNAVAILABLE");

        let output = metrics.encode();
        assert!(output.contains("catalog_request_errors_total"));
        assert!(output.contains("code=\"STORE_UNAVAILABLE\""));
    }
}
