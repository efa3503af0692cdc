//! Request counters exported through OpenTelemetry when the `otel` feature is on.

#[cfg(feature = "otel")]
use std::sync::OnceLock;

#[cfg(feature = "otel")]
use opentelemetry::KeyValue;
#[cfg(feature = "otel")]
use opentelemetry::metrics::Counter;

#[cfg(feature = "otel")]
static REQUESTS: OnceLock<Counter<u64>> = OnceLock::new();

/// Counts one completed TMDB request by endpoint kind and HTTP status.
#[cfg(feature = "otel")]
pub fn record_request(endpoint: &str, status: u16) {
    let counter = REQUESTS.get_or_init(|| {
        opentelemetry::global::meter("cineview-api")
            .u64_counter("tmdb.requests")
            .with_description("TMDB API requests by endpoint and status")
            .build()
    });
    counter.add(
        1,
        &[
            KeyValue::new("endpoint", endpoint.to_owned()),
            KeyValue::new("status", i64::from(status)),
        ],
    );
}

/// Counts one completed TMDB request (no-op without the `otel` feature).
#[cfg(not(feature = "otel"))]
pub const fn record_request(_endpoint: &str, _status: u16) {}
