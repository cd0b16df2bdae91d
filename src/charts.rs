//! Chart bundle: the five chart reports joined into finished chart structures.

use serde::Serialize;
use serde_json::Value;

use crate::dataset::BarSeries;
use crate::domain::{align_trends, TrendChart};
use crate::error::{DashboardError, Result};
use crate::fetch::ReportRequest;
use crate::pivot::{pivot, PivotChart};
use crate::report::{Matrix, ReportKind, SparseSeries, TrendSeries};
use crate::series::{to_bar_series, to_sorted_bar_series};

const AUTHOR_ORDER: [&str; 2] = ["with_author", "without_author"];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabeledBar {
    pub label: String,
    #[serde(flatten)]
    pub series: BarSeries,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartBundle {
    pub count_by_category: LabeledBar,
    pub count_by_date: LabeledBar,
    pub author_availability: LabeledBar,
    pub news_article_trends: TrendChart,
    pub category_by_source: PivotChart,
}

/// Requests for the bundle, in [`ReportKind::ALL`] order.
pub fn bundle_requests() -> Vec<ReportRequest> {
    ReportKind::ALL.iter().map(|k| ReportRequest::report(*k)).collect()
}

impl ChartBundle {
    /// Build from one payload per report, in [`ReportKind::ALL`] order.
    ///
    /// A missing report body reads as empty (absent keys are zero); a body of the
    /// wrong shape fails the whole bundle.
    pub fn from_reports(payloads: &[Value]) -> Result<Self> {
        if payloads.len() != ReportKind::ALL.len() {
            return Err(DashboardError::malformed(
                "charts",
                format!("expected {} reports, got {}", ReportKind::ALL.len(), payloads.len()),
            ));
        }

        let by_category = &payloads[0];
        let by_date = &payloads[1];
        let authors = &payloads[2];
        let trends = &payloads[3];
        let matrix = &payloads[4];

        let count_by_category = labeled(
            ReportKind::CountByCategory,
            by_category,
            "Articles",
            |s| to_bar_series(s, None),
        )?;
        let count_by_date = labeled(ReportKind::CountByDate, by_date, "Articles", to_sorted_bar_series)?;

        let author_order: Vec<String> = AUTHOR_ORDER.iter().map(|s| s.to_string()).collect();
        let author_availability = labeled(ReportKind::AuthorAvailability, authors, "Articles", |s| {
            to_bar_series(s, Some(&author_order))
        })?;

        let kind = ReportKind::NewsArticleTrends;
        let trend_table = kind
            .body(trends)?
            .map(|v| TrendSeries::from_value(kind.key(), &v))
            .transpose()?;
        let news_article_trends = align_trends(trend_table.as_ref());

        let kind = ReportKind::CategoryBySource;
        let matrix_table = kind
            .body(matrix)?
            .map(|v| Matrix::from_value(kind.key(), &v))
            .transpose()?
            .unwrap_or_default();
        let category_by_source = pivot(&matrix_table.sorted());

        Ok(Self {
            count_by_category,
            count_by_date,
            author_availability,
            news_article_trends,
            category_by_source,
        })
    }
}

fn labeled<F>(kind: ReportKind, payload: &Value, fallback: &str, shape: F) -> Result<LabeledBar>
where
    F: FnOnce(&SparseSeries) -> BarSeries,
{
    let series = kind
        .body(payload)?
        .map(|v| SparseSeries::from_value(kind.key(), &v))
        .transpose()?
        .unwrap_or_default();
    Ok(LabeledBar {
        label: kind.label(payload).unwrap_or_else(|| fallback.to_string()),
        series: shape(&series),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn absent_bodies_read_as_empty_charts() {
        let empty = vec![json!({}); 5];
        let b = ChartBundle::from_reports(&empty).unwrap();
        assert!(b.count_by_category.series.is_empty());
        assert_eq!(b.count_by_category.label, "Articles");
        // Fixed author labels are always present.
        assert_eq!(b.author_availability.series.values, vec![0, 0]);
        assert!(b.news_article_trends.is_no_data());
        assert!(b.category_by_source.datasets.is_empty());
    }

    #[test]
    fn wrong_report_count_is_malformed() {
        let err = ChartBundle::from_reports(&[json!({})]).unwrap_err();
        assert!(matches!(err, DashboardError::MalformedReport { .. }));
    }

    #[test]
    fn non_object_payload_is_malformed() {
        let mut payloads = vec![json!({}); 5];
        payloads[3] = json!([1, 2, 3]);
        assert!(ChartBundle::from_reports(&payloads).is_err());
    }

    #[test]
    fn requests_follow_report_order() {
        let paths: Vec<String> = bundle_requests().into_iter().map(|r| r.path).collect();
        assert_eq!(paths, vec!["/chart1", "/chart2", "/chart3", "/chart4", "/chart5"]);
    }
}
