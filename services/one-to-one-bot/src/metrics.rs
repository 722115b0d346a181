//! Prometheus metrics exposition
//!
//! - `bot_requests_total` (counter): labels `route`, `status`
//! - `bot_request_duration_seconds` (histogram): label `route`
//! - `bot_matches_total` (counter): label `outcome` (`active`, `fallback`, `none`)
//! - `bot_authorizations_total` (counter): label `result`

use metrics_exporter_prometheus::{BuildError, Matcher, PrometheusBuilder, PrometheusHandle};

const DURATION_BUCKETS: &[f64] = &[0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0];

fn builder() -> Result<PrometheusBuilder, BuildError> {
    PrometheusBuilder::new().set_buckets_for_metric(
        Matcher::Full("bot_request_duration_seconds".to_string()),
        DURATION_BUCKETS,
    )
}

/// Install the global Prometheus recorder and return a handle for `/metrics`.
///
/// Request duration renders as a histogram (`_bucket` lines) rather than the
/// exporter's default summary.
pub fn install_recorder() -> Result<PrometheusHandle, BuildError> {
    builder()?.install_recorder()
}

/// Record a completed request on one of the bot's routes.
pub fn record_request(route: &'static str, status: u16, duration_secs: f64) {
    metrics::counter!("bot_requests_total", "route" => route, "status" => status.to_string())
        .increment(1);
    metrics::histogram!("bot_request_duration_seconds", "route" => route).record(duration_secs);
}

/// Record the result of a matchmaking request.
pub fn record_match(outcome: &'static str) {
    metrics::counter!("bot_matches_total", "outcome" => outcome).increment(1);
}

/// Record the result of an OAuth install.
pub fn record_authorization(result: &'static str) {
    metrics::counter!("bot_authorizations_total", "result" => result).increment(1);
}
