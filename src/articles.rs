// src/articles.rs
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{DashboardError, Result};

const EXCERPT_CHARS: usize = 200;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Article {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub source: String,
    /// ISO datetime (or date). Absent or unparseable dates keep the article out of sorted views.
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub author: Option<String>,
}

impl Article {
    pub fn published_at(&self) -> Option<DateTime<Utc>> {
        self.date.as_deref().and_then(parse_article_date)
    }
}

// --- tolerant payload variants from /get-news and /get-all-news ---

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ArticlesPayload {
    Wrapped { articles: Vec<Article> },
    Bare(Vec<Article>),
}

/// Accept `{ "articles": [...] }` or a bare `[...]`.
pub fn parse_articles(value: &Value) -> Result<Vec<Article>> {
    match ArticlesPayload::deserialize(value) {
        Ok(ArticlesPayload::Wrapped { articles }) => Ok(articles),
        Ok(ArticlesPayload::Bare(articles)) => Ok(articles),
        Err(e) => Err(DashboardError::malformed("articles", e)),
    }
}

/// Parse RFC 3339, naive ISO datetime, or plain ISO date (midnight UTC).
pub fn parse_article_date(raw: &str) -> Option<DateTime<Utc>> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(ndt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(ndt.and_utc());
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|ndt| ndt.and_utc())
}

/// Drop undated articles and order the rest newest first.
/// Equal timestamps keep their received order.
pub fn sort_by_date_desc(articles: Vec<Article>) -> Vec<Article> {
    let total = articles.len();
    let mut dated: Vec<(DateTime<Utc>, Article)> = articles
        .into_iter()
        .filter_map(|a| a.published_at().map(|ts| (ts, a)))
        .collect();
    if dated.len() < total {
        tracing::debug!(dropped = total - dated.len(), "articles without a usable date skipped");
    }
    dated.sort_by(|a, b| b.0.cmp(&a.0));
    dated.into_iter().map(|(_, a)| a).collect()
}

/// List-row projection of an article.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ArticleView {
    pub title: String,
    pub source: String,
    /// `YYYY-MM-DD` part of the date.
    pub day: String,
    pub excerpt: String,
    pub url: String,
    pub author: Option<String>,
}

impl From<&Article> for ArticleView {
    fn from(a: &Article) -> Self {
        Self {
            title: a.title.clone(),
            source: a.source.clone(),
            day: a
                .date
                .as_deref()
                .map(|d| d.chars().take(10).collect())
                .unwrap_or_default(),
            excerpt: excerpt(&a.content),
            url: a.url.clone(),
            author: a.author.clone().filter(|s| !s.trim().is_empty()),
        }
    }
}

/// First 200 characters of decoded content, then `...`.
pub fn excerpt(content: &str) -> String {
    let decoded = html_escape::decode_html_entities(content);
    let mut out: String = decoded.chars().take(EXCERPT_CHARS).collect();
    out.push_str("...");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn art(title: &str, date: Option<&str>) -> Article {
        Article {
            title: title.into(),
            source: "Guardian".into(),
            date: date.map(str::to_string),
            url: format!("https://example.test/{title}"),
            content: String::new(),
            author: None,
        }
    }

    #[test]
    fn both_payload_shapes_parse() {
        let wrapped = json!({"articles": [{"title": "a", "date": "2024-01-01"}]});
        let bare = json!([{"title": "b"}]);
        assert_eq!(parse_articles(&wrapped).unwrap()[0].title, "a");
        assert_eq!(parse_articles(&bare).unwrap()[0].date, None);
        assert!(parse_articles(&json!({"message": "x"})).is_err());
    }

    #[test]
    fn date_formats() {
        assert!(parse_article_date("2024-03-05T10:00:00Z").is_some());
        assert!(parse_article_date("2024-03-05T10:00:00+02:00").is_some());
        assert!(parse_article_date("2024-03-05T10:00:00.123").is_some());
        assert!(parse_article_date("2024-03-05").is_some());
        assert!(parse_article_date("yesterday").is_none());
        assert!(parse_article_date("").is_none());
    }

    #[test]
    fn offsets_are_compared_in_utc() {
        let sorted = sort_by_date_desc(vec![
            art("early", Some("2024-03-05T10:00:00+02:00")), // 08:00Z
            art("late", Some("2024-03-05T09:00:00Z")),
        ]);
        assert_eq!(sorted[0].title, "late");
    }

    #[test]
    fn excerpt_decodes_entities_and_truncates() {
        assert_eq!(excerpt("Fish &amp; chips"), "Fish & chips...");
        let long = "x".repeat(500);
        assert_eq!(excerpt(&long).chars().count(), 203);
    }

    #[test]
    fn view_keeps_day_only() {
        let v = ArticleView::from(&art("t", Some("2024-03-05T10:00:00Z")));
        assert_eq!(v.day, "2024-03-05");
        assert_eq!(v.author, None);
    }
}
