// src/metrics.rs
//! Prometheus exposition for the dashboard's run and request counters.

use anyhow::{Context, Result};
use axum::{routing::get, Router};
use metrics::gauge;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use once_cell::sync::OnceCell;

pub const ENV_DASHBOARD_METRICS: &str = "DASHBOARD_METRICS";

static HANDLE: OnceCell<PrometheusHandle> = OnceCell::new();

#[derive(Clone)]
pub struct Metrics {
    pub handle: PrometheusHandle,
}

impl Metrics {
    /// Install the process-wide recorder on first call; later calls reuse it.
    /// Publishes the configured page size as a gauge.
    pub fn init(page_size: usize) -> Result<Self> {
        let handle = HANDLE
            .get_or_try_init(|| {
                PrometheusBuilder::new()
                    .install_recorder()
                    .context("prometheus: install recorder")
            })?
            .clone();

        crate::orchestrator::ensure_metrics_described();
        gauge!("dashboard_page_size").set(page_size as f64);

        Ok(Self { handle })
    }

    /// `/metrics` is opt-in via DASHBOARD_METRICS=1.
    pub fn enabled_from_env() -> bool {
        std::env::var(ENV_DASHBOARD_METRICS).ok().as_deref() == Some("1")
    }

    pub fn router(&self) -> Router {
        let handle = self.handle.clone();
        Router::new().route(
            "/metrics",
            get(move || {
                let h = handle.clone();
                async move { h.render() }
            }),
        )
    }
}
