//! # Reports
//! Ingestion boundary for the backend's pre-aggregated report payloads.
//!
//! Reports arrive as loosely shaped JSON. Everything downstream works on two
//! explicit shapes:
//!
//! - [`SparseSeries`]: `label -> count`, absent labels read as zero.
//! - [`SeriesTable`]: `outer -> SparseSeries`, used both for trend series
//!   (`source -> date -> count`) and for matrices (`category -> source -> count`).
//!
//! Both keep the order in which keys were received. Counts must be
//! non-negative integers; anything else is rejected here rather than deep
//! inside a chart builder.

use std::collections::BTreeSet;
use std::fmt;

use serde::de::{Deserializer, MapAccess, Visitor};
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

use crate::error::{DashboardError, Result};

/// Sparse `label -> count` mapping in wire order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SparseSeries {
    entries: Vec<(String, u64)>,
}

impl SparseSeries {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from pairs. A repeated label keeps its first position and the last value.
    pub fn from_pairs<I, K>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, u64)>,
        K: Into<String>,
    {
        let mut s = Self::new();
        for (k, v) in pairs {
            s.insert(k.into(), v);
        }
        s
    }

    pub fn insert(&mut self, label: String, count: u64) {
        match self.entries.iter_mut().find(|(k, _)| *k == label) {
            Some(slot) => slot.1 = count,
            None => self.entries.push((label, count)),
        }
    }

    /// Count for `label`; zero when absent.
    pub fn get(&self, label: &str) -> u64 {
        self.entries
            .iter()
            .find(|(k, _)| k == label)
            .map(|(_, v)| *v)
            .unwrap_or(0)
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Labels in ascending lexicographic order (chronological for ISO dates).
    pub fn sorted_labels(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.entries.iter().map(|(k, _)| k.clone()).collect();
        keys.sort();
        keys
    }

    pub fn total(&self) -> u64 {
        self.entries.iter().map(|(_, v)| *v).sum()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Validate an arbitrary JSON value as a sparse series.
    pub fn from_value(report: &str, value: &Value) -> Result<Self> {
        Self::deserialize(value).map_err(|e| DashboardError::malformed(report, e))
    }
}

impl<'de> Deserialize<'de> for SparseSeries {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct SeriesVisitor;

        impl<'de> Visitor<'de> for SeriesVisitor {
            type Value = SparseSeries;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of label to non-negative integer count")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> std::result::Result<SparseSeries, A::Error> {
                let mut out = SparseSeries::new();
                while let Some((k, v)) = map.next_entry::<String, u64>()? {
                    out.insert(k, v);
                }
                Ok(out)
            }
        }

        deserializer.deserialize_map(SeriesVisitor)
    }
}

impl Serialize for SparseSeries {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        use serde::ser::SerializeMap;
        let mut m = serializer.serialize_map(Some(self.entries.len()))?;
        for (k, v) in &self.entries {
            m.serialize_entry(k, v)?;
        }
        m.end()
    }
}

/// Two-level sparse mapping `outer -> (inner -> count)` in wire order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeriesTable {
    rows: Vec<(String, SparseSeries)>,
}

/// `source -> date -> count`. Dates are ISO strings.
pub type TrendSeries = SeriesTable;
/// `category -> source -> count`. Sources may differ per category.
pub type Matrix = SeriesTable;

impl SeriesTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_rows<I, K>(rows: I) -> Self
    where
        I: IntoIterator<Item = (K, SparseSeries)>,
        K: Into<String>,
    {
        let mut t = Self::new();
        for (k, s) in rows {
            t.insert(k.into(), s);
        }
        t
    }

    pub fn insert(&mut self, key: String, series: SparseSeries) {
        match self.rows.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = series,
            None => self.rows.push((key, series)),
        }
    }

    pub fn row(&self, key: &str) -> Option<&SparseSeries> {
        self.rows.iter().find(|(k, _)| k == key).map(|(_, s)| s)
    }

    /// Count at `(outer, inner)`; zero when either level is absent.
    pub fn get(&self, outer: &str, inner: &str) -> u64 {
        self.row(outer).map(|s| s.get(inner)).unwrap_or(0)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.rows.iter().map(|(k, _)| k.as_str())
    }

    pub fn rows(&self) -> impl Iterator<Item = (&str, &SparseSeries)> {
        self.rows.iter().map(|(k, s)| (k.as_str(), s))
    }

    /// Union of inner keys across all rows, sorted.
    pub fn inner_keys(&self) -> BTreeSet<String> {
        self.rows
            .iter()
            .flat_map(|(_, s)| s.labels().map(str::to_string))
            .collect()
    }

    /// Same table with rows ordered by key.
    pub fn sorted(&self) -> Self {
        let mut rows = self.rows.clone();
        rows.sort_by(|a, b| a.0.cmp(&b.0));
        Self { rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn from_value(report: &str, value: &Value) -> Result<Self> {
        Self::deserialize(value).map_err(|e| DashboardError::malformed(report, e))
    }
}

impl<'de> Deserialize<'de> for SeriesTable {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct TableVisitor;

        impl<'de> Visitor<'de> for TableVisitor {
            type Value = SeriesTable;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of key to count map")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> std::result::Result<SeriesTable, A::Error> {
                let mut out = SeriesTable::new();
                while let Some((k, v)) = map.next_entry::<String, SparseSeries>()? {
                    out.insert(k, v);
                }
                Ok(out)
            }
        }

        deserializer.deserialize_map(TableVisitor)
    }
}

impl Serialize for SeriesTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        use serde::ser::SerializeMap;
        let mut m = serializer.serialize_map(Some(self.rows.len()))?;
        for (k, s) in &self.rows {
            m.serialize_entry(k, s)?;
        }
        m.end()
    }
}

/// The five chart reports the dashboard renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportKind {
    CountByCategory,
    CountByDate,
    AuthorAvailability,
    NewsArticleTrends,
    CategoryBySource,
}

impl ReportKind {
    pub const ALL: [ReportKind; 5] = [
        ReportKind::CountByCategory,
        ReportKind::CountByDate,
        ReportKind::AuthorAvailability,
        ReportKind::NewsArticleTrends,
        ReportKind::CategoryBySource,
    ];

    pub fn path(self) -> &'static str {
        match self {
            ReportKind::CountByCategory => "/chart1",
            ReportKind::CountByDate => "/chart2",
            ReportKind::AuthorAvailability => "/chart3",
            ReportKind::NewsArticleTrends => "/chart4",
            ReportKind::CategoryBySource => "/chart5",
        }
    }

    /// Top-level key holding the report body.
    pub fn key(self) -> &'static str {
        match self {
            ReportKind::CountByCategory => "count_by_category",
            ReportKind::CountByDate => "count_by_date",
            ReportKind::AuthorAvailability => "author_availability",
            ReportKind::NewsArticleTrends => "news_article_trends",
            ReportKind::CategoryBySource => "category_by_source",
        }
    }

    /// Body of this report inside `payload`, or `None` when the key is absent or null.
    pub fn body(self, payload: &Value) -> Result<Option<Value>> {
        let obj = payload
            .as_object()
            .ok_or_else(|| DashboardError::malformed(self.key(), "payload is not a JSON object"))?;
        Ok(obj.get(self.key()).filter(|v| !v.is_null()).cloned())
    }

    /// Optional dataset label shipped alongside the body.
    pub fn label(self, payload: &Value) -> Option<String> {
        payload
            .get("label")
            .and_then(Value::as_str)
            .map(str::to_string)
    }
}
