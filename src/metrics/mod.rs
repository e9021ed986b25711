use std::sync::Once;

use autometrics::prometheus_exporter::PrometheusResponse;
use autometrics::prometheus_exporter::{self};

static EXPORTER_INIT: Once = Once::new();

/// Installs the global Prometheus exporter that collects the per-operation
/// call counters and latency histograms of the store. Safe to call more
/// than once.
pub fn init_metrics() {
    EXPORTER_INIT.call_once(|| {
        prometheus_exporter::init();
    });
}

/// Export metrics for Prometheus to scrape
pub fn get_metrics_body() -> String {
    get_metrics().into_body()
}

/// Export metrics for Prometheus to scrape
pub fn get_metrics() -> PrometheusResponse {
    prometheus_exporter::encode_http_response()
}
