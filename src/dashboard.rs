//! # Dashboard session
//! Wires the query controller, the orchestrators and the result paginator
//! into the operations the front-end triggers.
//!
//! - Article searches (filtered and "all categories") share one orchestrator,
//!   so a newer search always wins over an older one.
//! - Charts and the source comparison each own an orchestrator.
//! - A mode or value change supersedes in-flight searches and comparisons,
//!   so a late answer for the previous query can never land.
//! - The session lock is never held across an await.

use std::sync::{Arc, Mutex, MutexGuard};

use serde::Serialize;

use crate::articles::{parse_articles, sort_by_date_desc, Article, ArticleView};
use crate::charts::{bundle_requests, ChartBundle};
use crate::compare::Comparison;
use crate::config::DashboardConfig;
use crate::dataset::BarSeries;
use crate::error::{DashboardError, MSG_NO_ARTICLES};
use crate::fetch::{HttpReportSource, ReportRequest, ReportSource};
use crate::orchestrator::{FetchState, Orchestrator, RunId, RunOutcome};
use crate::query::{ModeKind, QueryController, QueryMode, RequestParam};

#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    Loaded { count: usize },
    /// Backend had nothing (404 or zero dated articles).
    NotFound,
    /// Input rejected before any request.
    Invalid(DashboardError),
    Failed(DashboardError),
    Stale,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ChartsOutcome {
    Ready(Box<ChartBundle>),
    Failed(DashboardError),
    Stale,
}

/// Snapshot of the article panel for rendering.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct NewsPage {
    pub subject: String,
    pub mode: ModeKind,
    pub value: String,
    pub page: usize,
    pub page_count: usize,
    pub total: usize,
    pub articles: Vec<ArticleView>,
    pub error: Option<String>,
    pub comparison: Option<Comparison>,
    /// NewsAPI / Guardian / Other bars for the comparison, when present.
    pub comparison_chart: Option<BarSeries>,
}

pub struct Dashboard {
    source: Arc<dyn ReportSource>,
    news: Orchestrator,
    charts: Orchestrator,
    compare: Orchestrator,
    session: Mutex<QueryController>,
}

impl Dashboard {
    pub fn new(config: &DashboardConfig, source: Arc<dyn ReportSource>) -> Self {
        let session = QueryController::new(
            &config.default_category,
            config.categories.clone(),
            config.page_size,
        );
        Self {
            news: Orchestrator::new("news", source.clone()),
            charts: Orchestrator::new("charts", source.clone()),
            compare: Orchestrator::new("compare", source.clone()),
            source,
            session: Mutex::new(session),
        }
    }

    /// Dashboard talking HTTP to `config.base_url`.
    pub fn from_config(config: &DashboardConfig) -> Self {
        let source = HttpReportSource::new(config.base_url.clone());
        tracing::info!(base_url = source.base_url(), "dashboard backend configured");
        Self::new(config, Arc::new(source))
    }

    fn lock(&self) -> MutexGuard<'_, QueryController> {
        self.session.lock().expect("dashboard session mutex poisoned")
    }

    pub fn news_state(&self) -> FetchState {
        self.news.state()
    }

    pub fn charts_state(&self) -> FetchState {
        self.charts.state()
    }

    pub fn compare_state(&self) -> FetchState {
        self.compare.state()
    }

    // --- mode controller ---

    pub fn switch_mode(&self, kind: ModeKind) {
        let mut s = self.lock();
        s.switch_mode(kind);
        self.invalidate_query_runs();
    }

    pub fn set_value(&self, value: &str) {
        let mut s = self.lock();
        s.set_value(value);
        self.invalidate_query_runs();
    }

    pub fn apply(&self, mode: QueryMode) {
        let mut s = self.lock();
        s.apply(mode);
        self.invalidate_query_runs();
    }

    // Called with the session lock held, so a settling run sees either the old
    // query and a current id, or the new query and a stale id.
    fn invalidate_query_runs(&self) {
        self.news.supersede();
        self.compare.supersede();
    }

    // --- article search ---

    /// Fetch articles for the current query, then the source comparison.
    pub async fn search(&self) -> SearchOutcome {
        let (param, revision, run) = {
            let mut s = self.lock();
            match s.request_param() {
                Ok(p) => {
                    s.clear_error();
                    s.set_comparison(None);
                    s.results_mut().clear();
                    // Begun under the session lock: a query change either happened
                    // before the revision was read or supersedes this run.
                    (p, s.revision(), self.news.begin())
                }
                Err(e) => {
                    s.set_error(e.user_message());
                    return SearchOutcome::Invalid(e);
                }
            }
        };

        let request = ReportRequest::articles(&param);
        let mut articles = None;
        let outcome = self
            .news
            .complete(run, std::slice::from_ref(&request), |values| {
                let body = values
                    .first()
                    .ok_or_else(|| DashboardError::malformed("articles", "empty response"))?;
                articles = Some(parse_articles(body)?);
                Ok(())
            })
            .await;
        let state = match outcome {
            RunOutcome::Stale { .. } => return SearchOutcome::Stale,
            RunOutcome::Settled { state, .. } => state,
        };

        let outcome = self.apply_search(run, revision, state, articles);
        if matches!(outcome, SearchOutcome::Loaded { .. }) {
            self.refresh_comparison_for(&param, revision).await;
        }
        outcome
    }

    fn apply_search(
        &self,
        run: RunId,
        revision: u64,
        state: FetchState,
        articles: Option<Vec<Article>>,
    ) -> SearchOutcome {
        let parsed = match state {
            FetchState::Ready(_) => {
                articles.ok_or_else(|| DashboardError::malformed("articles", "empty response"))
            }
            FetchState::Failed(e) => Err(e),
            FetchState::Idle | FetchState::Loading => return SearchOutcome::Stale,
        };

        let mut s = self.lock();
        if !self.news.is_current(run) || s.revision() != revision {
            return SearchOutcome::Stale;
        }

        match parsed {
            Ok(articles) => {
                let sorted = sort_by_date_desc(articles);
                if sorted.is_empty() {
                    s.set_error(MSG_NO_ARTICLES);
                    return SearchOutcome::NotFound;
                }
                let count = sorted.len();
                s.results_mut().replace(sorted);
                tracing::info!(run, count, subject = %s.subject(), "articles loaded");
                SearchOutcome::Loaded { count }
            }
            Err(DashboardError::NotFound(_)) => {
                s.set_error(MSG_NO_ARTICLES);
                SearchOutcome::NotFound
            }
            Err(e) => {
                tracing::warn!(run, error = %e, "article search failed");
                s.set_error(e.user_message());
                SearchOutcome::Failed(e)
            }
        }
    }

    /// Comparison for the search that produced `revision`. Nothing is fetched or
    /// published once the query has moved on. Failures only clear the comparison.
    async fn refresh_comparison_for(&self, param: &RequestParam, revision: u64) -> Option<Comparison> {
        let run = {
            let s = self.lock();
            if s.revision() != revision {
                return None;
            }
            self.compare.begin()
        };

        let request = ReportRequest::compare(param);
        let state = match self
            .compare
            .complete(run, std::slice::from_ref(&request), |_| Ok(()))
            .await
        {
            RunOutcome::Stale { .. } => return None,
            RunOutcome::Settled { state, .. } => state,
        };

        let comparison = match state {
            FetchState::Ready(values) => values.first().and_then(Comparison::from_value),
            FetchState::Failed(e) => {
                tracing::warn!(error = %e, "comparison fetch failed");
                None
            }
            _ => None,
        };

        let mut s = self.lock();
        if !self.compare.is_current(run) || s.revision() != revision {
            return None;
        }
        s.set_comparison(comparison.clone());
        comparison
    }

    // --- pagination ---

    pub fn next_page(&self) -> bool {
        self.lock().results_mut().next_page()
    }

    pub fn prev_page(&self) -> bool {
        self.lock().results_mut().prev_page()
    }

    pub fn go_to_page(&self, page: usize) -> usize {
        self.lock().results_mut().go_to(page)
    }

    pub fn news_page(&self) -> NewsPage {
        let s = self.lock();
        let results = s.results();
        NewsPage {
            subject: s.subject(),
            mode: s.mode_kind(),
            value: s.mode().value().to_string(),
            page: results.current_page(),
            page_count: results.page_count(),
            total: results.len(),
            articles: results.visible().iter().map(ArticleView::from).collect(),
            error: s.error().map(str::to_string),
            comparison: s.comparison().cloned(),
            comparison_chart: s.comparison().map(Comparison::bar_series),
        }
    }

    // --- crawl ---

    /// Ask the backend to crawl for the current query. Returns the backend's message.
    pub async fn crawl(&self) -> Result<String, DashboardError> {
        let param = self.lock().request_param()?;
        let request = ReportRequest::crawl(&param);
        let body = self.source.fetch(&request).await?;
        let message = body
            .get("message")
            .and_then(|m| m.as_str())
            .unwrap_or("Crawl finished.")
            .to_string();
        tracing::info!(endpoint = %request.endpoint(), %message, "crawl requested");
        Ok(message)
    }

    // --- charts ---

    /// Fetch all five chart reports; ready only when every one arrived and parsed.
    /// A report of the wrong shape settles the charts run as failed.
    pub async fn load_charts(&self) -> ChartsOutcome {
        let requests = bundle_requests();
        let mut bundle = None;
        let outcome = self
            .charts
            .run_checked(&requests, |values| {
                bundle = Some(ChartBundle::from_reports(values)?);
                Ok(())
            })
            .await;

        match outcome {
            RunOutcome::Stale { .. } => ChartsOutcome::Stale,
            RunOutcome::Settled { run, state } => match (state, bundle) {
                (FetchState::Ready(_), Some(bundle)) => ChartsOutcome::Ready(Box::new(bundle)),
                (FetchState::Failed(e), _) => {
                    if matches!(e, DashboardError::MalformedReport { .. }) {
                        tracing::warn!(run, error = %e, "chart reports malformed");
                    }
                    ChartsOutcome::Failed(e)
                }
                _ => ChartsOutcome::Failed(DashboardError::malformed("charts", "bundle not built")),
            },
        }
    }
}
