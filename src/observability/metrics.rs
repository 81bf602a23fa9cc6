//! Metrics collection and exposition.
//!
//! # Metrics
//! - `gateway_navigations_total` (counter): navigations by route, outcome
//! - `gateway_navigation_duration_seconds` (histogram): navigation latency
//! - `gateway_view_loads_total` (counter): deferred view loads by route, outcome
//! - `gateway_view_load_duration_seconds` (histogram): view load latency
//! - `gateway_routes` (gauge): registered routes

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus recorder and its scrape endpoint.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

/// Record a finished navigation.
pub fn record_navigation(route: &str, outcome: &'static str, start: Instant) {
    metrics::counter!(
        "gateway_navigations_total",
        "route" => route.to_string(),
        "outcome" => outcome
    )
    .increment(1);
    metrics::histogram!("gateway_navigation_duration_seconds", "outcome" => outcome)
        .record(start.elapsed().as_secs_f64());
}

/// Record a finished deferred view load.
pub fn record_view_load(route: &str, ok: bool, start: Instant) {
    let outcome = if ok { "ok" } else { "error" };
    metrics::counter!(
        "gateway_view_loads_total",
        "route" => route.to_string(),
        "outcome" => outcome
    )
    .increment(1);
    metrics::histogram!("gateway_view_load_duration_seconds", "route" => route.to_string())
        .record(start.elapsed().as_secs_f64());
}

/// Record the size of the route table.
pub fn record_route_count(count: usize) {
    metrics::gauge!("gateway_routes").set(count as f64);
}
