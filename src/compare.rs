// src/compare.rs
//! Source comparison payload from `/compare-sources`.
//!
//! Canonical field names: `label`, `total_newsapi`, `total_guardian`,
//! `total_other`. A payload missing any count is "no data", not an error.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::dataset::BarSeries;

pub const COMPARISON_LABELS: [&str; 3] = ["NewsAPI", "Guardian", "Other"];

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Comparison {
    #[serde(default)]
    pub label: String,
    pub total_newsapi: u64,
    pub total_guardian: u64,
    pub total_other: u64,
}

impl Comparison {
    /// `None` when a required count is missing or not a non-negative integer.
    pub fn from_value(value: &Value) -> Option<Self> {
        match Self::deserialize(value) {
            Ok(c) => Some(c),
            Err(e) => {
                tracing::debug!(error = %e, "comparison payload treated as no data");
                None
            }
        }
    }

    pub fn total(&self) -> u64 {
        self.total_newsapi + self.total_guardian + self.total_other
    }

    pub fn bar_series(&self) -> BarSeries {
        BarSeries {
            labels: COMPARISON_LABELS.iter().map(|s| s.to_string()).collect(),
            values: vec![self.total_newsapi, self.total_guardian, self.total_other],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn full_payload_parses() {
        let v = json!({"label": "health", "total_newsapi": 4, "total_guardian": 6, "total_other": 1});
        let c = Comparison::from_value(&v).unwrap();
        assert_eq!(c.total(), 11);
        assert_eq!(c.bar_series().values, vec![4, 6, 1]);
    }

    #[test]
    fn missing_or_misspelled_field_is_no_data() {
        let typo = json!({"label": "x", "total_newsapi": 1, "total_guardian": 2, "ohter": 3});
        assert_eq!(Comparison::from_value(&typo), None);
        let wrong_type = json!({"total_newsapi": "1", "total_guardian": 2, "total_other": 3});
        assert_eq!(Comparison::from_value(&wrong_type), None);
        assert_eq!(Comparison::from_value(&Value::Null), None);
    }

    #[test]
    fn label_is_optional() {
        let v = json!({"total_newsapi": 0, "total_guardian": 0, "total_other": 0});
        assert_eq!(Comparison::from_value(&v).unwrap().label, "");
    }
}
