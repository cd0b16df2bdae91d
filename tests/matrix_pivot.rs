// tests/matrix_pivot.rs
//
// Category x source matrix pivoted into one dataset per source.

use news_dashboard::pivot::pivot;
use news_dashboard::report::{Matrix, SparseSeries};

fn matrix(rows: &[(&str, &[(&str, u64)])]) -> Matrix {
    Matrix::from_rows(rows.iter().map(|(cat, cells)| {
        (
            *cat,
            SparseSeries::from_pairs(cells.iter().map(|(s, c)| (*s, *c))),
        )
    }))
}

#[test]
fn sports_health_example() {
    let m = matrix(&[
        ("sports", &[("api", 1), ("scraped", 2)]),
        ("health", &[("api", 3)]),
    ]);
    let chart = pivot(&m);

    assert_eq!(chart.categories, vec!["sports", "health"]);
    let api = chart.datasets.iter().find(|d| d.label == "api").unwrap();
    let scraped = chart.datasets.iter().find(|d| d.label == "scraped").unwrap();
    assert_eq!(api.values, vec![1, 3]);
    assert_eq!(scraped.values, vec![2, 0]);
}

#[test]
fn dataset_sums_match_row_totals() {
    let m = matrix(&[
        ("business", &[("a", 4), ("b", 1), ("c", 0)]),
        ("technology", &[("c", 6)]),
        ("health", &[]),
        ("sports", &[("b", 2), ("d", 5)]),
    ]);
    let chart = pivot(&m);

    for d in &chart.datasets {
        assert_eq!(d.values.len(), chart.categories.len());
    }
    for (i, category) in chart.categories.iter().enumerate() {
        let row_total = m.row(category).map(SparseSeries::total).unwrap_or(0);
        assert_eq!(chart.category_total(i), row_total, "{category}");
    }
}

#[test]
fn source_order_is_independent_of_row_order() {
    let a = pivot(&matrix(&[
        ("x", &[("zeta", 1), ("alpha", 2)]),
        ("y", &[("mid", 3)]),
    ]));
    let b = pivot(&matrix(&[
        ("y", &[("mid", 3)]),
        ("x", &[("alpha", 2), ("zeta", 1)]),
    ]));
    let labels = |c: &news_dashboard::pivot::PivotChart| {
        c.datasets.iter().map(|d| d.label.clone()).collect::<Vec<_>>()
    };
    assert_eq!(labels(&a), vec!["alpha", "mid", "zeta"]);
    assert_eq!(labels(&a), labels(&b));
    // Same source keeps the same colour.
    assert_eq!(a.datasets[0].color, b.datasets[0].color);
}

#[test]
fn empty_matrix_pivots_to_nothing() {
    let chart = pivot(&Matrix::default());
    assert!(chart.categories.is_empty());
    assert!(chart.datasets.is_empty());
}
