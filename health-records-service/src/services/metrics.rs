//! Metrics collection and Prometheus export.
//!
//! Initializes the metrics exporter and provides the /metrics endpoint handler,
//! plus the domain counters recorded by the handlers.

use metrics::counter;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::sync::OnceLock;

/// Global handle to the Prometheus recorder.
pub static METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Install the Prometheus recorder. Later calls are no-ops, so routers built
/// repeatedly in one process share the first recorder.
pub fn init_metrics() {
    if METRICS_HANDLE.get().is_some() {
        return;
    }

    match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => {
            let _ = METRICS_HANDLE.set(handle);
        }
        Err(e) => tracing::warn!(error = %e, "Failed to install Prometheus recorder"),
    }
}

/// Get the current metrics in Prometheus text format.
pub fn get_metrics() -> String {
    METRICS_HANDLE
        .get()
        .map(|handle| handle.render())
        .unwrap_or_else(|| "# Metrics recorder not initialized".to_string())
}

pub fn record_report_generated(format: &'static str) {
    counter!("reports_generated_total", "format" => format).increment(1);
}

pub fn record_share_link_created(share_type: &'static str) {
    counter!("share_links_created_total", "share_type" => share_type).increment(1);
}

pub fn record_share_notification(outcome: &'static str) {
    counter!("share_notifications_total", "outcome" => outcome).increment(1);
}

pub fn record_llm_request(operation: &'static str, success: bool) {
    let status = if success { "success" } else { "error" };
    counter!("llm_requests_total", "operation" => operation, "status" => status).increment(1);
}

pub fn record_document_uploaded() {
    counter!("documents_uploaded_total").increment(1);
}
