//! Sparse series → bar series.

use crate::dataset::BarSeries;
use crate::report::SparseSeries;

/// Flatten `series` into parallel labels/values.
///
/// With `order`, labels follow it exactly and labels missing from `series`
/// read as `0`; labels not named in `order` are dropped. Without it, the
/// series' own (wire) order is used.
pub fn to_bar_series(series: &SparseSeries, order: Option<&[String]>) -> BarSeries {
    match order {
        Some(order) => BarSeries {
            labels: order.to_vec(),
            values: order.iter().map(|l| series.get(l)).collect(),
        },
        None => {
            let (labels, values) = series.iter().map(|(l, v)| (l.to_string(), v)).unzip();
            BarSeries { labels, values }
        }
    }
}

/// Bar series with labels in ascending order (chronological for ISO dates).
pub fn to_sorted_bar_series(series: &SparseSeries) -> BarSeries {
    let order = series.sorted_labels();
    to_bar_series(series, Some(&order))
}
