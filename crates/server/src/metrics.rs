//! Prometheus metrics endpoint.
//!
//! The engine and stores record through the `metrics` facade; this module
//! installs the Prometheus recorder behind it and renders the scrape
//! output at `/metrics`.

use axum::http::StatusCode;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use once_cell::sync::OnceCell;

static METRICS_HANDLE: OnceCell<PrometheusHandle> = OnceCell::new();

/// Install the Prometheus recorder. Call once at startup, before any
/// counter is touched; calling again (or failing to install) leaves the
/// facade as a no-op and the scrape endpoint empty.
pub fn init_metrics() -> Option<PrometheusHandle> {
    match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => {
            let _ = METRICS_HANDLE.set(handle.clone());
            Some(handle)
        }
        Err(error) => {
            tracing::warn!(error = %error, "failed to install metrics recorder");
            None
        }
    }
}

/// `GET /metrics` in Prometheus text format.
pub async fn metrics_handler() -> (StatusCode, String) {
    match METRICS_HANDLE.get() {
        Some(handle) => (StatusCode::OK, handle.render()),
        None => (StatusCode::NOT_FOUND, String::new()),
    }
}
