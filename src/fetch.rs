// src/fetch.rs
//! Request descriptors and the backend seam.
//!
//! [`ReportSource`] is the only place that talks to the network. The
//! orchestrator and dashboard only see JSON values or a [`DashboardError`].

use std::time::Instant;

use async_trait::async_trait;
use metrics::counter;
use reqwest::{Client, StatusCode};
use serde_json::Value;

use crate::error::{DashboardError, Result};
use crate::query::RequestParam;
use crate::report::ReportKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

/// One backend call: method, path relative to the base endpoint, query pairs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportRequest {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    /// 404 means "no matching data" rather than a failed call.
    pub empty_on_not_found: bool,
}

impl ReportRequest {
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: Method::Get,
            path: path.into(),
            query: Vec::new(),
            empty_on_not_found: false,
        }
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self {
            method: Method::Post,
            path: path.into(),
            query: Vec::new(),
            empty_on_not_found: false,
        }
    }

    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Attach the controller's parameter; "all categories" adds nothing.
    pub fn with_param(mut self, param: &RequestParam) -> Self {
        if let Some((k, v)) = param.query_pair() {
            self.query.push((k.to_string(), v.to_string()));
        }
        self
    }

    pub fn report(kind: ReportKind) -> Self {
        Self::get(kind.path())
    }

    /// Article list: bulk endpoint for "all categories", filtered otherwise.
    /// Only this request reads a 404 as an empty result.
    pub fn articles(param: &RequestParam) -> Self {
        let req = match param {
            RequestParam::AllCategories => Self::get("/get-all-news"),
            _ => Self::get("/get-news").with_param(param),
        };
        Self {
            empty_on_not_found: true,
            ..req
        }
    }

    pub fn compare(param: &RequestParam) -> Self {
        Self::get("/compare-sources").with_param(param)
    }

    pub fn crawl(param: &RequestParam) -> Self {
        Self::post("/crawl-news").with_param(param)
    }

    /// Path plus query, for logs and error messages.
    pub fn endpoint(&self) -> String {
        if self.query.is_empty() {
            return self.path.clone();
        }
        let qs = self
            .query
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join("&");
        format!("{}?{}", self.path, qs)
    }
}

#[async_trait]
pub trait ReportSource: Send + Sync {
    /// Perform `request` and return the decoded JSON body.
    ///
    /// 404 maps to [`DashboardError::NotFound`] when the request has
    /// `empty_on_not_found` set; any other non-success status (404 included)
    /// maps to [`DashboardError::Status`].
    async fn fetch(&self, request: &ReportRequest) -> Result<Value>;

    fn name(&self) -> &'static str;
}

/// reqwest-backed source bound to one base endpoint.
#[derive(Clone)]
pub struct HttpReportSource {
    base_url: String,
    client: Client,
}

impl HttpReportSource {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, Client::new())
    }

    pub fn with_client(base_url: impl Into<String>, client: Client) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { base_url, client }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url_for(&self, request: &ReportRequest) -> String {
        format!("{}{}", self.base_url, request.path)
    }
}

#[async_trait]
impl ReportSource for HttpReportSource {
    async fn fetch(&self, request: &ReportRequest) -> Result<Value> {
        let endpoint = request.endpoint();
        let t0 = Instant::now();

        let builder = match request.method {
            Method::Get => self.client.get(self.url_for(request)),
            Method::Post => self.client.post(self.url_for(request)),
        };

        let resp = match builder.query(&request.query).send().await {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!(error = ?e, %endpoint, "backend request failed");
                counter!("dashboard_request_errors_total").increment(1);
                return Err(DashboardError::transport(endpoint, e));
            }
        };

        let status = resp.status();
        if status == StatusCode::NOT_FOUND && request.empty_on_not_found {
            tracing::debug!(%endpoint, "backend reported no data (404)");
            return Err(DashboardError::NotFound(endpoint));
        }

        let body = resp
            .text()
            .await
            .map_err(|e| DashboardError::transport(endpoint.clone(), e))?;

        if !status.is_success() {
            counter!("dashboard_request_errors_total").increment(1);
            let message = serde_json::from_str::<Value>(&body).ok().and_then(|v| {
                v.get("message")
                    .and_then(Value::as_str)
                    .map(str::to_string)
            });
            tracing::warn!(%endpoint, status = status.as_u16(), ?message, "backend non-success status");
            return Err(DashboardError::Status {
                endpoint,
                status: status.as_u16(),
                message,
            });
        }

        let value: Value = serde_json::from_str(&body).map_err(|e| {
            counter!("dashboard_request_errors_total").increment(1);
            DashboardError::transport(endpoint.clone(), format!("decoding JSON: {e}"))
        })?;

        tracing::trace!(
            %endpoint,
            ms = t0.elapsed().as_millis() as u64,
            "backend request ok"
        );
        Ok(value)
    }

    fn name(&self) -> &'static str {
        "http"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn articles_request_picks_bulk_or_filtered_endpoint() {
        let all = ReportRequest::articles(&RequestParam::AllCategories);
        assert_eq!(all.endpoint(), "/get-all-news");

        let kw = ReportRequest::articles(&RequestParam::Keyword("climate change".into()));
        assert_eq!(kw.path, "/get-news");
        assert_eq!(kw.query, vec![("keyword".to_string(), "climate change".to_string())]);
        assert!(all.empty_on_not_found && kw.empty_on_not_found);
    }

    #[test]
    fn only_article_requests_treat_404_as_empty() {
        let param = RequestParam::Category("health".into());
        assert!(!ReportRequest::crawl(&param).empty_on_not_found);
        assert!(!ReportRequest::compare(&param).empty_on_not_found);
        assert!(!ReportRequest::report(ReportKind::AuthorAvailability).empty_on_not_found);
    }

    #[test]
    fn crawl_is_post_and_compare_without_param_has_no_query() {
        let c = ReportRequest::crawl(&RequestParam::Category("sports".into()));
        assert_eq!(c.method, Method::Post);
        assert_eq!(c.endpoint(), "/crawl-news?category=sports");

        let cmp = ReportRequest::compare(&RequestParam::AllCategories);
        assert_eq!(cmp.endpoint(), "/compare-sources");
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let src = HttpReportSource::new("http://localhost:5000/");
        assert_eq!(src.base_url(), "http://localhost:5000");
        assert_eq!(
            src.url_for(&ReportRequest::report(ReportKind::CountByDate)),
            "http://localhost:5000/chart2"
        );
    }
}
