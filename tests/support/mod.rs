// tests/support/mod.rs
//
// In-process mock of the analytics backend, bound to an ephemeral port.
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};

#[derive(Clone, Default)]
pub struct BackendOpts {
    /// Chart path (e.g. "/chart3") that answers 500.
    pub failing_chart: Option<&'static str>,
    /// Chart path whose body has the wrong shape.
    pub malformed_chart: Option<&'static str>,
    /// Chart path that answers 404.
    pub missing_chart: Option<&'static str>,
}

pub const MANY_ARTICLES: usize = 45;

/// Start the mock backend and return its base URL.
pub async fn spawn_backend(opts: BackendOpts) -> String {
    let app = Router::new()
        .route("/chart1", get(chart))
        .route("/chart2", get(chart))
        .route("/chart3", get(chart))
        .route("/chart4", get(chart))
        .route("/chart5", get(chart))
        .route("/get-news", get(get_news))
        .route("/get-all-news", get(get_all_news))
        .route("/compare-sources", get(compare_sources))
        .route("/crawl-news", post(crawl_news))
        .with_state(Arc::new(opts));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind mock backend");
    let addr = listener.local_addr().expect("mock backend addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("mock backend serve");
    });
    format!("http://{addr}")
}

pub fn article(i: usize, date: Option<String>) -> Value {
    json!({
        "title": format!("Story {i}"),
        "source": if i % 2 == 0 { "Guardian" } else { "NewsAPI" },
        "date": date,
        "url": format!("https://news.test/{i}"),
        "content": format!("Body of story {i} &amp; more"),
        "author": if i % 3 == 0 { Value::Null } else { json!("Reporter") },
    })
}

/// 45 dated articles (shuffled days) plus 2 undated ones.
pub fn many_articles() -> Vec<Value> {
    let mut out: Vec<Value> = (0..MANY_ARTICLES)
        .map(|i| {
            let day = (i * 7) % 28 + 1;
            let hour = i % 24;
            article(i, Some(format!("2024-02-{day:02}T{hour:02}:00:00Z")))
        })
        .collect();
    out.push(article(900, None));
    out.push(article(901, None));
    out
}

async fn chart(
    State(opts): State<Arc<BackendOpts>>,
    uri: axum::http::Uri,
) -> Response {
    let path = uri.path();
    if opts.failing_chart == Some(path) {
        return (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({"message": "boom"}))).into_response();
    }
    if opts.missing_chart == Some(path) {
        return (StatusCode::NOT_FOUND, Json(json!({"message": "no such report"}))).into_response();
    }
    if opts.malformed_chart == Some(path) {
        return Json(json!({"count_by_category": {"health": "lots"}, "category_by_source": [1, 2]}))
            .into_response();
    }
    let body = match path {
        "/chart1" => json!({"label": "Articles by category",
                            "count_by_category": {"sports": 4, "health": 7, "business": 2}}),
        "/chart2" => json!({"count_by_date": {"2024-02-03": 5, "2024-02-01": 2, "2024-02-02": 0}}),
        "/chart3" => json!({"author_availability": {"without_author": 3}}),
        "/chart4" => json!({"news_article_trends": {
                                "newsapi": {"2024-02-01": 2, "2024-02-03": 1},
                                "guardian": {"2024-02-02": 5}}}),
        "/chart5" => json!({"category_by_source": {
                                "sports": {"api": 1, "scraped": 2},
                                "health": {"api": 3}}}),
        _ => json!({}),
    };
    Json(body).into_response()
}

async fn get_news(Query(q): Query<HashMap<String, String>>) -> Response {
    let key = q
        .get("keyword")
        .or_else(|| q.get("category"))
        .cloned()
        .unwrap_or_default();
    match key.as_str() {
        "nothing" => (StatusCode::NOT_FOUND, Json(json!({"message": "no articles"}))).into_response(),
        "boom" => (StatusCode::INTERNAL_SERVER_ERROR, "kaboom").into_response(),
        "garbled" => (StatusCode::OK, "{not json").into_response(),
        "undated" => Json(json!([article(1, None), article(2, None)])).into_response(),
        "many" => Json(Value::Array(many_articles())).into_response(),
        other => Json(json!([
            article(1, Some("2024-02-01T08:00:00Z".into())),
            article(2, Some("2024-02-03T08:00:00Z".into())),
            {"title": format!("About {other}"), "source": "NewsAPI",
             "date": "2024-02-02", "url": "https://news.test/x", "content": "short"}
        ]))
        .into_response(),
    }
}

async fn get_all_news() -> Json<Value> {
    Json(json!({"articles": many_articles()}))
}

async fn compare_sources(Query(q): Query<HashMap<String, String>>) -> Json<Value> {
    let label = q
        .get("keyword")
        .or_else(|| q.get("category"))
        .cloned()
        .unwrap_or_else(|| "all".to_string());
    if label == "typo" {
        return Json(json!({"label": label, "total_newsapi": 1, "total_guardian": 2, "ohter": 3}));
    }
    Json(json!({"label": label, "total_newsapi": 10, "total_guardian": 6, "total_other": 1}))
}

async fn crawl_news(Query(q): Query<HashMap<String, String>>) -> Response {
    match q.get("keyword").map(String::as_str) {
        Some("busy") => {
            return (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({"message": "crawler busy"})),
            )
                .into_response();
        }
        Some("retired") => {
            return (
                StatusCode::NOT_FOUND,
                Json(json!({"message": "unknown category"})),
            )
                .into_response();
        }
        _ => {}
    }
    Json(json!({"message": "Crawl started"})).into_response()
}
