//! Prometheus metrics

use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::{Ipv4Addr, SocketAddr};
use std::time::Duration;

/// Counter metric types
#[derive(Debug, Clone, Copy)]
pub enum CounterMetric {
    /// Fetches attempted
    Polls,
    /// Fetches that failed
    PollFailures,
}

/// Gauge metric types
#[derive(Debug, Clone, Copy)]
pub enum GaugeMetric {
    /// Contests in the current snapshot
    ActiveContests,
    /// Wait before the next poll
    PollIntervalSeconds,
}

/// Increment a counter
pub fn increment(metric: CounterMetric) {
    let metric_name = match metric {
        CounterMetric::Polls => "kickoff_polls_total",
        CounterMetric::PollFailures => "kickoff_poll_failures_total",
    };

    metrics::counter!(metric_name).increment(1);
}

/// Set a gauge value
pub fn set_gauge(metric: GaugeMetric, value: f64) {
    let metric_name = match metric {
        GaugeMetric::ActiveContests => "kickoff_active_contests",
        GaugeMetric::PollIntervalSeconds => "kickoff_poll_interval_seconds",
    };

    metrics::gauge!(metric_name).set(value);
}

/// Count one forwarded highlight
pub fn record_highlight(kind: &'static str) {
    metrics::counter!("kickoff_highlights_total", "kind" => kind).increment(1);
}

/// Record the interval the scheduler is about to wait
pub fn record_interval(interval: Duration) {
    set_gauge(GaugeMetric::PollIntervalSeconds, interval.as_secs_f64());
}

/// Serve metrics for scraping on `port`
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(port: u16) -> anyhow::Result<()> {
    let addr = SocketAddr::from((Ipv4Addr::UNSPECIFIED, port));

    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .map_err(|e| anyhow::anyhow!("Failed to start metrics exporter: {}", e))?;

    tracing::info!(%addr, "Metrics exporter listening");
    Ok(())
}
