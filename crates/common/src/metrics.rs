use once_cell::sync::Lazy;
use prometheus::{register_int_counter_vec, Encoder, IntCounterVec, TextEncoder};

// Prometheus metrics (default registry)
pub static OUTBOUND_CALLS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "vehicles_outbound_calls_total",
        "Outbound calls to enrichment collaborators",
        &["collaborator"]
    )
    .expect("register outbound_calls_total")
});

pub static ENRICHMENT_FAILURES_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "vehicles_enrichment_failures_total",
        "Enrichment calls that failed and were tolerated",
        &["collaborator"]
    )
    .expect("register enrichment_failures_total")
});

pub static CAR_MUTATIONS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "vehicles_car_mutations_total",
        "Car writes by operation",
        &["operation"]
    )
    .expect("register car_mutations_total")
});

pub static PRICE_LOOKUPS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "pricing_lookups_total",
        "Price lookups by outcome",
        &["outcome"]
    )
    .expect("register pricing_lookups_total")
});

pub static REGISTRY_FAILURES_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "registry_failures_total",
        "Service registry calls that failed",
        &["operation"]
    )
    .expect("register registry_failures_total")
});

/// Render the default registry in the Prometheus text format.
pub fn encode_metrics() -> (axum::http::StatusCode, String) {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        return (
            axum::http::StatusCode::INTERNAL_SERVER_ERROR,
            format!("metrics encode error: {e}"),
        );
    }
    (
        axum::http::StatusCode::OK,
        String::from_utf8(buffer).unwrap_or_default(),
    )
}

/// Axum handler for `GET /metrics`.
pub async fn metrics_handler() -> (axum::http::StatusCode, String) {
    encode_metrics()
}
