//! # Domain union
//! Aligns per-source date series onto one shared, ascending date axis.
//!
//! Dates are ISO strings, so lexicographic order is chronological order.
//! A source that did not report a date contributes `0` at that position.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::dataset::Dataset;
use crate::report::TrendSeries;

/// Result of aligning a trend report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TrendChart {
    /// No source reported at all. Distinct from sources reporting zeros.
    NoData,
    Aligned {
        dates: Vec<String>,
        lines: Vec<Dataset>,
    },
}

impl TrendChart {
    pub fn is_no_data(&self) -> bool {
        matches!(self, TrendChart::NoData)
    }
}

/// Sorted, de-duplicated union of every date key under any source.
pub fn date_domain(trends: &TrendSeries) -> Vec<String> {
    trends
        .rows()
        .flat_map(|(_, s)| s.labels())
        .map(str::to_string)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Build the aligned multi-line chart. Lines are ordered by source name so a
/// source keeps its colour across reloads.
pub fn align_trends(trends: Option<&TrendSeries>) -> TrendChart {
    let trends = match trends {
        Some(t) if !t.is_empty() => t,
        _ => return TrendChart::NoData,
    };

    let dates = date_domain(trends);

    let mut sources: Vec<&str> = trends.keys().collect();
    sources.sort_unstable();

    let lines = sources
        .into_iter()
        .enumerate()
        .map(|(i, source)| {
            let values = dates.iter().map(|d| trends.get(source, d)).collect();
            Dataset::new(source, values, i)
        })
        .collect();

    TrendChart::Aligned { dates, lines }
}
