use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use tower_http::cors::CorsLayer;

use crate::dashboard::{ChartsOutcome, Dashboard, NewsPage, SearchOutcome};
use crate::error::DashboardError;
use crate::query::{ModeKind, QueryMode};

#[derive(Clone)]
pub struct AppState {
    pub dashboard: Arc<Dashboard>,
}

impl AppState {
    pub fn new(dashboard: Dashboard) -> Self {
        Self {
            dashboard: Arc::new(dashboard),
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/api/charts", get(charts))
        .route("/api/news", get(news))
        .route("/api/news/page", get(news_page))
        .route("/api/news/next", post(news_next))
        .route("/api/news/prev", post(news_prev))
        .route("/api/crawl", post(crawl))
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

async fn charts(State(state): State<AppState>) -> Response {
    match state.dashboard.load_charts().await {
        ChartsOutcome::Ready(bundle) => Json(*bundle).into_response(),
        ChartsOutcome::Failed(e) => (
            StatusCode::BAD_GATEWAY,
            Json(json!({ "error": e.user_message() })),
        )
            .into_response(),
        // Only reachable when a concurrent /api/charts superseded this one.
        ChartsOutcome::Stale => (
            StatusCode::CONFLICT,
            Json(json!({ "error": "superseded by a newer request" })),
        )
            .into_response(),
    }
}

#[derive(Deserialize)]
struct NewsQuery {
    mode: Option<ModeKind>,
    value: Option<String>,
}

async fn news(State(state): State<AppState>, Query(q): Query<NewsQuery>) -> Response {
    let dash = &state.dashboard;
    match (q.mode, q.value) {
        (Some(ModeKind::Category), Some(v)) => dash.apply(QueryMode::Category(v)),
        (Some(ModeKind::Keyword), Some(v)) => dash.apply(QueryMode::Keyword(v)),
        (Some(kind), None) => dash.switch_mode(kind),
        (None, Some(v)) => dash.set_value(&v),
        (None, None) => {}
    }

    let status = match dash.search().await {
        SearchOutcome::Invalid(_) => StatusCode::BAD_REQUEST,
        _ => StatusCode::OK,
    };
    (status, Json(dash.news_page())).into_response()
}

#[derive(Deserialize)]
struct PageQuery {
    n: usize,
}

async fn news_page(State(state): State<AppState>, Query(q): Query<PageQuery>) -> Json<NewsPage> {
    state.dashboard.go_to_page(q.n);
    Json(state.dashboard.news_page())
}

async fn news_next(State(state): State<AppState>) -> Json<NewsPage> {
    state.dashboard.next_page();
    Json(state.dashboard.news_page())
}

async fn news_prev(State(state): State<AppState>) -> Json<NewsPage> {
    state.dashboard.prev_page();
    Json(state.dashboard.news_page())
}

async fn crawl(State(state): State<AppState>) -> Response {
    match state.dashboard.crawl().await {
        Ok(message) => Json(json!({ "message": message })).into_response(),
        Err(e @ DashboardError::Validation(_)) => (
            StatusCode::BAD_REQUEST,
            Json(json!({ "message": e.user_message() })),
        )
            .into_response(),
        Err(e) => (
            StatusCode::BAD_GATEWAY,
            Json(json!({ "message": e.server_message() })),
        )
            .into_response(),
    }
}
