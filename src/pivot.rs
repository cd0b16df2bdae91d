//! # Matrix pivot
//! Reshapes `category -> source -> count` into one dataset per source, each
//! indexed over the full category axis.
//!
//! - Sources are the union of inner keys across all categories.
//! - A missing `(category, source)` pair is `0`, never an error.
//! - Categories keep the order of the input table; call [`SeriesTable::sorted`]
//!   first for an alphabetical axis.
//! - Datasets are ordered by source name, so dataset index (and colour) for a
//!   source is stable across calls on the same source set.
//!
//! [`SeriesTable::sorted`]: crate::report::SeriesTable::sorted

use serde::Serialize;

use crate::dataset::Dataset;
use crate::report::Matrix;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PivotChart {
    pub categories: Vec<String>,
    pub datasets: Vec<Dataset>,
}

impl PivotChart {
    /// Sum over all datasets at category index `i`.
    pub fn category_total(&self, i: usize) -> u64 {
        self.datasets
            .iter()
            .filter_map(|d| d.values.get(i))
            .sum()
    }
}

pub fn pivot(matrix: &Matrix) -> PivotChart {
    let categories: Vec<String> = matrix.keys().map(str::to_string).collect();

    let datasets = matrix
        .inner_keys()
        .into_iter()
        .enumerate()
        .map(|(i, source)| {
            let values = categories
                .iter()
                .map(|c| matrix.get(c, &source))
                .collect();
            Dataset::new(source, values, i)
        })
        .collect();

    PivotChart {
        categories,
        datasets,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::SparseSeries;

    #[test]
    fn empty_matrix_pivots_to_empty_chart() {
        let chart = pivot(&Matrix::new());
        assert!(chart.categories.is_empty());
        assert!(chart.datasets.is_empty());
    }

    #[test]
    fn category_with_no_sources_is_all_zero_column() {
        let m = Matrix::from_rows([
            ("health", SparseSeries::new()),
            ("sports", SparseSeries::from_pairs([("api", 2)])),
        ]);
        let chart = pivot(&m);
        assert_eq!(chart.datasets.len(), 1);
        assert_eq!(chart.datasets[0].values, vec![0, 2]);
        assert_eq!(chart.category_total(0), 0);
    }
}
