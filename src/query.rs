//! # Query mode
//! Category-vs-keyword selector and the session state that depends on it.
//!
//! Any mode or value change clears the displayed error and the comparison,
//! and sends the result list back to page 1. Each mode remembers its own last
//! value, so switching back restores it.

use serde::{Deserialize, Serialize};

use crate::articles::Article;
use crate::compare::Comparison;
use crate::error::{DashboardError, Result, MSG_INVALID_INPUT};
use crate::paginate::Paginator;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModeKind {
    Category,
    Keyword,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "mode", content = "value", rename_all = "lowercase")]
pub enum QueryMode {
    Category(String),
    Keyword(String),
}

impl QueryMode {
    pub fn kind(&self) -> ModeKind {
        match self {
            QueryMode::Category(_) => ModeKind::Category,
            QueryMode::Keyword(_) => ModeKind::Keyword,
        }
    }

    pub fn value(&self) -> &str {
        match self {
            QueryMode::Category(v) | QueryMode::Keyword(v) => v,
        }
    }
}

/// Query parameter sent to the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestParam {
    /// Empty category: bulk fetch, no filter.
    AllCategories,
    Category(String),
    Keyword(String),
}

impl RequestParam {
    pub fn query_pair(&self) -> Option<(&'static str, &str)> {
        match self {
            RequestParam::AllCategories => None,
            RequestParam::Category(c) => Some(("category", c)),
            RequestParam::Keyword(k) => Some(("keyword", k)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct QueryController {
    mode: ModeKind,
    category: String,
    keyword: String,
    known_categories: Vec<String>,
    error: Option<String>,
    comparison: Option<Comparison>,
    results: Paginator<Article>,
    revision: u64,
}

impl QueryController {
    /// Starts in category mode on `default_category`. An empty `known_categories`
    /// accepts any category.
    pub fn new(default_category: &str, known_categories: Vec<String>, page_size: usize) -> Self {
        Self {
            mode: ModeKind::Category,
            category: default_category.to_string(),
            keyword: String::new(),
            known_categories,
            error: None,
            comparison: None,
            results: Paginator::new(page_size),
            revision: 0,
        }
    }

    pub fn mode(&self) -> QueryMode {
        match self.mode {
            ModeKind::Category => QueryMode::Category(self.category.clone()),
            ModeKind::Keyword => QueryMode::Keyword(self.keyword.clone()),
        }
    }

    pub fn mode_kind(&self) -> ModeKind {
        self.mode
    }

    /// Switch modes. Dependent state is reset even when the mode is unchanged.
    pub fn switch_mode(&mut self, kind: ModeKind) {
        self.mode = kind;
        self.reset_dependent();
    }

    /// Set the value of the current mode.
    pub fn set_value(&mut self, value: &str) {
        match self.mode {
            ModeKind::Category => self.category = value.trim().to_ascii_lowercase(),
            ModeKind::Keyword => self.keyword = value.to_string(),
        }
        self.reset_dependent();
    }

    /// Switch to `mode` and adopt its value in one step.
    pub fn apply(&mut self, mode: QueryMode) {
        self.mode = mode.kind();
        self.set_value(mode.value());
    }

    /// Parameter for the current mode, or a validation error (no request should be issued).
    pub fn request_param(&self) -> Result<RequestParam> {
        match self.mode {
            ModeKind::Category => {
                let c = self.category.trim();
                if c.is_empty() {
                    return Ok(RequestParam::AllCategories);
                }
                if !self.known_categories.is_empty()
                    && !self.known_categories.iter().any(|k| k.eq_ignore_ascii_case(c))
                {
                    return Err(DashboardError::Validation(MSG_INVALID_INPUT.to_string()));
                }
                Ok(RequestParam::Category(c.to_string()))
            }
            ModeKind::Keyword => {
                let k = self.keyword.trim();
                if k.is_empty() {
                    return Err(DashboardError::Validation(MSG_INVALID_INPUT.to_string()));
                }
                Ok(RequestParam::Keyword(k.to_string()))
            }
        }
    }

    /// Heading subject for the result list.
    pub fn subject(&self) -> String {
        match self.mode {
            ModeKind::Keyword => self.keyword.trim().to_string(),
            ModeKind::Category if self.category.trim().is_empty() => "all categories".to_string(),
            ModeKind::Category => self.category.clone(),
        }
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn set_error(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    pub fn comparison(&self) -> Option<&Comparison> {
        self.comparison.as_ref()
    }

    pub fn set_comparison(&mut self, comparison: Option<Comparison>) {
        self.comparison = comparison;
    }

    pub fn results(&self) -> &Paginator<Article> {
        &self.results
    }

    pub fn results_mut(&mut self) -> &mut Paginator<Article> {
        &mut self.results
    }

    /// Bumped on every mode or value change.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    fn reset_dependent(&mut self) {
        self.revision += 1;
        self.error = None;
        self.comparison = None;
        self.results.reset_page();
    }
}
