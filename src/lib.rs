// src/lib.rs
// Public library surface for the binary and integration tests.

pub mod api;
pub mod articles;
pub mod charts;
pub mod compare;
pub mod config;
pub mod dashboard;
pub mod dataset;
pub mod domain;
pub mod error;
pub mod fetch;
pub mod metrics;
pub mod orchestrator;
pub mod paginate;
pub mod pivot;
pub mod query;
pub mod report;
pub mod series;

// ---- Re-exports for stable public API ----
pub use crate::api::router;
pub use crate::config::DashboardConfig;
pub use crate::dashboard::Dashboard;
pub use crate::error::DashboardError;
pub use crate::orchestrator::{FetchState, Orchestrator, RunOutcome};

use axum::Router;
use tracing::info;

/// Build the full in-process app from env/file configuration.
///
/// Mounts `/metrics` when `DASHBOARD_METRICS=1`.
pub async fn app() -> anyhow::Result<Router> {
    let cfg = DashboardConfig::load_default()?;
    info!(
        base_url = %cfg.base_url,
        page_size = cfg.page_size,
        categories = cfg.categories.len(),
        "dashboard config loaded"
    );

    let state = api::AppState::new(Dashboard::from_config(&cfg));
    let mut router = api::router(state);

    if crate::metrics::Metrics::enabled_from_env() {
        let m = crate::metrics::Metrics::init(cfg.page_size)?;
        router = router.merge(m.router());
    }
    Ok(router)
}
