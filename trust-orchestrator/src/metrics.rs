use std::sync::LazyLock;

use prometheus::{register_int_counter_vec, Encoder, IntCounterVec, TextEncoder};

pub static AGGREGATIONS: LazyLock<IntCounterVec> = LazyLock::new(|| {
    register_int_counter_vec!(
        "context_aggregations_total",
        "Context aggregations by outcome",
        &["outcome"]
    )
    .expect("register context_aggregations_total")
});

pub static SOURCES: LazyLock<IntCounterVec> = LazyLock::new(|| {
    register_int_counter_vec!(
        "context_sources_total",
        "Resolved context sources by origin and outcome",
        &["origin", "outcome"]
    )
    .expect("register context_sources_total")
});

pub static TRANSITIONS: LazyLock<IntCounterVec> = LazyLock::new(|| {
    register_int_counter_vec!(
        "trust_transitions_total",
        "Trust tier transitions by kind and resulting tier",
        &["kind", "tier"]
    )
    .expect("register trust_transitions_total")
});

/// Renders the default registry in the Prometheus text format.
pub fn render() -> (Vec<u8>, String) {
    let encoder = TextEncoder::new();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&prometheus::gather(), &mut buffer) {
        tracing::warn!(error = %e, "Failed to encode metrics");
    }
    (buffer, encoder.format_type().to_string())
}
