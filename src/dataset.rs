//! Chart-ready output structures handed to the drawing layer.

use serde::{Deserialize, Serialize};

/// Fixed colour cycle. Index `i` always maps to the same colour.
pub const PALETTE: [&str; 8] = [
    "#36A2EB", "#FF6384", "#4BC0C0", "#FF9F40", "#9966FF", "#FFCD56", "#4E73DF", "#1CC88A",
];

pub fn palette_color(index: usize) -> &'static str {
    PALETTE[index % PALETTE.len()]
}

/// Parallel label/value sequences for a single bar series.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BarSeries {
    pub labels: Vec<String>,
    pub values: Vec<u64>,
}

impl BarSeries {
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// One named series aligned to a shared label axis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dataset {
    pub label: String,
    pub values: Vec<u64>,
    pub color: String,
}

impl Dataset {
    pub fn new(label: impl Into<String>, values: Vec<u64>, color_index: usize) -> Self {
        Self {
            label: label.into(),
            values,
            color: palette_color(color_index).to_string(),
        }
    }
}
