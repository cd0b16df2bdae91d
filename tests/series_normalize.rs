// tests/series_normalize.rs
//
// Sparse series → bar series: label order, zero fill, chronological dates.

use news_dashboard::report::SparseSeries;
use news_dashboard::series::{to_bar_series, to_sorted_bar_series};

fn s(pairs: &[(&str, u64)]) -> SparseSeries {
    SparseSeries::from_pairs(pairs.iter().map(|(k, v)| (*k, *v)))
}

#[test]
fn insertion_order_is_kept_without_explicit_order() {
    let series = s(&[("sports", 4), ("health", 7), ("business", 2)]);
    let bar = to_bar_series(&series, None);
    assert_eq!(bar.labels, vec!["sports", "health", "business"]);
    assert_eq!(bar.values, vec![4, 7, 2]);
}

#[test]
fn explicit_order_fills_missing_labels_with_zero() {
    let series = s(&[("without_author", 3)]);
    let order = vec!["with_author".to_string(), "without_author".to_string()];
    let bar = to_bar_series(&series, Some(&order));
    assert_eq!(bar.labels, order);
    assert_eq!(bar.values, vec![0, 3]);
}

#[test]
fn dates_come_out_chronological() {
    let series = s(&[("2024-02-03", 5), ("2024-01-31", 1), ("2024-02-01", 2)]);
    let bar = to_sorted_bar_series(&series);
    assert_eq!(bar.labels, vec!["2024-01-31", "2024-02-01", "2024-02-03"]);
    assert_eq!(bar.values, vec![1, 2, 5]);
}

#[test]
fn every_label_maps_to_its_count() {
    let series = s(&[("a", 1), ("b", 0), ("c", 9)]);
    let bar = to_bar_series(&series, None);
    assert_eq!(bar.labels.len(), bar.values.len());
    for (label, value) in bar.labels.iter().zip(&bar.values) {
        assert_eq!(series.get(label), *value);
    }
    assert_eq!(bar.values.iter().sum::<u64>(), series.total());
}

#[test]
fn empty_series_gives_empty_bars() {
    let bar = to_bar_series(&SparseSeries::default(), None);
    assert!(bar.is_empty());
}

#[test]
fn wire_order_survives_deserialization() {
    let v: serde_json::Value =
        serde_json::from_str(r#"{"zeta": 1, "alpha": 2, "mid": 3}"#).unwrap();
    let series = SparseSeries::from_value("count_by_category", &v).unwrap();
    let labels: Vec<&str> = series.labels().collect();
    assert_eq!(labels, vec!["zeta", "alpha", "mid"]);
}
