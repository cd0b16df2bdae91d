// src/config/dashboard.rs
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_DASHBOARD_CONFIG_PATH: &str = "config/dashboard.toml";
pub const FALLBACK_DASHBOARD_CONFIG_JSON: &str = "config/dashboard.json";

pub const ENV_DASHBOARD_CONFIG_PATH: &str = "DASHBOARD_CONFIG_PATH";
pub const ENV_DASHBOARD_BASE_URL: &str = "DASHBOARD_BASE_URL";

fn default_base_url() -> String {
    "http://localhost:5000".to_string()
}
fn default_page_size() -> usize {
    20
}
fn default_category() -> String {
    "health".to_string()
}
fn default_categories() -> Vec<String> {
    ["health", "business", "sports", "technology"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DashboardConfig {
    /// Backend endpoint every report path is resolved against.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Articles per page. Fixed for the session.
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    /// Category selected when the dashboard opens.
    #[serde(default = "default_category")]
    pub default_category: String,
    /// Categories offered in category mode.
    #[serde(default = "default_categories")]
    pub categories: Vec<String>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            page_size: default_page_size(),
            default_category: default_category(),
            categories: default_categories(),
        }
    }
}

impl DashboardConfig {
    /// Load from an explicit path. TOML or JSON, chosen by extension.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading dashboard config from {}", path.display()))?;
        let ext = path
            .extension()
            .and_then(|s| s.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();
        let cfg = parse_config(&content, ext.as_str())
            .with_context(|| format!("parsing dashboard config {}", path.display()))?;
        Ok(cfg.sanitized())
    }

    /// Load using env var + fallbacks:
    /// 1) $DASHBOARD_CONFIG_PATH (must exist)
    /// 2) config/dashboard.toml
    /// 3) config/dashboard.json
    /// 4) built-in defaults
    ///
    /// `$DASHBOARD_BASE_URL` overrides the file value in every case.
    pub fn load_default() -> Result<Self> {
        let mut cfg = if let Ok(p) = std::env::var(ENV_DASHBOARD_CONFIG_PATH) {
            let pb = PathBuf::from(p);
            if !pb.exists() {
                return Err(anyhow!(
                    "{ENV_DASHBOARD_CONFIG_PATH} points to non-existent path"
                ));
            }
            Self::load_from_file(&pb)?
        } else if Path::new(DEFAULT_DASHBOARD_CONFIG_PATH).exists() {
            Self::load_from_file(Path::new(DEFAULT_DASHBOARD_CONFIG_PATH))?
        } else if Path::new(FALLBACK_DASHBOARD_CONFIG_JSON).exists() {
            Self::load_from_file(Path::new(FALLBACK_DASHBOARD_CONFIG_JSON))?
        } else {
            Self::default()
        };

        if let Ok(url) = std::env::var(ENV_DASHBOARD_BASE_URL) {
            if !url.trim().is_empty() {
                cfg.base_url = url;
            }
        }
        Ok(cfg.sanitized())
    }

    fn sanitized(mut self) -> Self {
        self.base_url = self.base_url.trim().trim_end_matches('/').to_string();
        if self.base_url.is_empty() {
            self.base_url = default_base_url();
        }

        if self.page_size == 0 {
            self.page_size = default_page_size();
        }

        // Keep first-seen order, drop blanks and duplicates.
        let mut seen = BTreeSet::new();
        self.categories = self
            .categories
            .into_iter()
            .map(|c| c.trim().to_ascii_lowercase())
            .filter(|c| !c.is_empty() && seen.insert(c.clone()))
            .collect();
        if self.categories.is_empty() {
            self.categories = default_categories();
        }

        self.default_category = self.default_category.trim().to_ascii_lowercase();
        if !self.categories.contains(&self.default_category) {
            self.default_category = self.categories[0].clone();
        }
        self
    }
}

fn parse_config(s: &str, hint_ext: &str) -> Result<DashboardConfig> {
    match hint_ext {
        "json" => Ok(serde_json::from_str(s)?),
        "toml" => Ok(toml::from_str(s)?),
        _ => toml::from_str(s)
            .map_err(anyhow::Error::from)
            .or_else(|_| serde_json::from_str(s).map_err(anyhow::Error::from))
            .map_err(|_| anyhow!("unsupported dashboard config format")),
    }
}
