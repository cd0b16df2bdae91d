//! # Fetch orchestration
//! Runs a set of independent report fetches concurrently and publishes a
//! single terminal state once all of them have settled.
//!
//! - `Ready` always carries one value per request, in request order.
//! - Any failure fails the whole run; a partial tuple is never published.
//!   A shape check passed to [`Orchestrator::run_checked`] runs before
//!   publishing, so a rejected payload settles `Failed`, never `Ready`.
//! - Every run gets a monotonically increasing id. A run that settles after a
//!   newer run started (or after [`Orchestrator::supersede`]) is discarded
//!   without touching state.
//! - No timeout: a hung request keeps the state at `Loading`.

use std::sync::{Arc, Mutex};
use std::time::Instant;

use futures::future::join_all;
use metrics::{counter, describe_counter, describe_histogram, histogram};
use once_cell::sync::OnceCell;
use serde_json::Value;

use crate::error::DashboardError;
use crate::fetch::{ReportRequest, ReportSource};

/// One-time metrics registration (so series show up on /metrics).
pub(crate) fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!("dashboard_runs_total", "Orchestrated runs started.");
        describe_counter!(
            "dashboard_runs_failed_total",
            "Runs that settled in the failed state."
        );
        describe_counter!(
            "dashboard_runs_stale_total",
            "Runs discarded because a newer run superseded them."
        );
        describe_counter!(
            "dashboard_request_errors_total",
            "Backend request/transport/status errors."
        );
        describe_histogram!("dashboard_run_ms", "Run duration in milliseconds.");
    });
}

pub type RunId = u64;

#[derive(Debug, Clone, PartialEq, Default)]
pub enum FetchState {
    #[default]
    Idle,
    Loading,
    Ready(Vec<Value>),
    Failed(DashboardError),
}

impl FetchState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, FetchState::Ready(_) | FetchState::Failed(_))
    }

    pub fn name(&self) -> &'static str {
        match self {
            FetchState::Idle => "idle",
            FetchState::Loading => "loading",
            FetchState::Ready(_) => "ready",
            FetchState::Failed(_) => "failed",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome {
    /// This run was the latest when it settled; `state` is now published.
    Settled { run: RunId, state: FetchState },
    /// Superseded before settling. Nothing was published.
    Stale { run: RunId },
}

#[derive(Debug, Default)]
struct Inner {
    latest: RunId,
    state: FetchState,
}

/// Join-barrier over N report fetches with last-request-wins semantics.
pub struct Orchestrator {
    name: &'static str,
    source: Arc<dyn ReportSource>,
    inner: Mutex<Inner>,
}

impl Orchestrator {
    pub fn new(name: &'static str, source: Arc<dyn ReportSource>) -> Self {
        ensure_metrics_described();
        Self {
            name,
            source,
            inner: Mutex::new(Inner::default()),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn state(&self) -> FetchState {
        self.inner.lock().expect("orchestrator mutex poisoned").state.clone()
    }

    pub fn latest_run(&self) -> RunId {
        self.inner.lock().expect("orchestrator mutex poisoned").latest
    }

    pub fn is_current(&self, run: RunId) -> bool {
        self.latest_run() == run
    }

    /// Invalidate any in-flight run and return to `Idle`.
    pub fn supersede(&self) -> RunId {
        let mut inner = self.inner.lock().expect("orchestrator mutex poisoned");
        inner.latest += 1;
        inner.state = FetchState::Idle;
        tracing::trace!(orchestrator = self.name, run = inner.latest, "superseded");
        inner.latest
    }

    /// Start a new run: invalidates any older run and enters `Loading`.
    ///
    /// Callers that must tie the run to other state (e.g. a query revision)
    /// call this under their own lock, then [`complete`](Self::complete) it.
    pub fn begin(&self) -> RunId {
        let mut inner = self.inner.lock().expect("orchestrator mutex poisoned");
        inner.latest += 1;
        inner.state = FetchState::Loading;
        counter!("dashboard_runs_total").increment(1);
        inner.latest
    }

    /// Publish `state` for `run` only if it is still the latest run.
    fn settle(&self, run: RunId, state: FetchState) -> bool {
        let mut inner = self.inner.lock().expect("orchestrator mutex poisoned");
        if inner.latest != run {
            return false;
        }
        inner.state = state;
        true
    }

    /// Fetch every request concurrently and wait for all of them.
    pub async fn run_all(&self, requests: &[ReportRequest]) -> RunOutcome {
        self.run_checked(requests, |_| Ok(())).await
    }

    /// Like [`run_all`](Self::run_all), but `check` must accept the full
    /// tuple before it is published as `Ready`; its error settles `Failed`.
    pub async fn run_checked<F>(&self, requests: &[ReportRequest], check: F) -> RunOutcome
    where
        F: FnOnce(&[Value]) -> Result<(), DashboardError> + Send,
    {
        let run = self.begin();
        self.complete(run, requests, check).await
    }

    /// Perform `requests` for a run obtained from [`begin`](Self::begin).
    pub async fn complete<F>(&self, run: RunId, requests: &[ReportRequest], check: F) -> RunOutcome
    where
        F: FnOnce(&[Value]) -> Result<(), DashboardError> + Send,
    {
        let t0 = Instant::now();
        tracing::debug!(orchestrator = self.name, run, n = requests.len(), "run started");

        let results = join_all(requests.iter().map(|r| self.source.fetch(r))).await;

        let state = match results
            .into_iter()
            .collect::<Result<Vec<_>, _>>()
            .and_then(|values| check(&values).map(|()| values))
        {
            Ok(values) => FetchState::Ready(values),
            Err(e) => FetchState::Failed(e),
        };

        if !self.settle(run, state.clone()) {
            counter!("dashboard_runs_stale_total").increment(1);
            tracing::debug!(orchestrator = self.name, run, "stale run discarded");
            return RunOutcome::Stale { run };
        }

        histogram!("dashboard_run_ms").record(t0.elapsed().as_secs_f64() * 1_000.0);
        match &state {
            FetchState::Failed(e) => {
                counter!("dashboard_runs_failed_total").increment(1);
                tracing::warn!(orchestrator = self.name, run, error = %e, "run failed");
            }
            _ => tracing::debug!(orchestrator = self.name, run, "run ready"),
        }
        RunOutcome::Settled { run, state }
    }
}
