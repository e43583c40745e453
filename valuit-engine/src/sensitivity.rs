//! Sensitivity analysis types.
//!
//! Models recompute their output metric over small fixed grids of
//! perturbed parameters. Grid construction lives with each model (the
//! perturbation rules are method-specific); the shared shapes live
//! here.

use serde::{Deserialize, Serialize};

/// An ordered 2-D sensitivity table.
///
/// `values` is row-major: `values[i][j]` is the recomputed output for
/// `row_values[i]` × `col_values[j]`. Cells where the perturbed
/// parameters are degenerate (e.g. a discount rate at or below the
/// growth rate) hold `None` instead of an infinite or negative
/// perpetuity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensitivityGrid {
    /// What the rows vary (e.g. "wacc")
    pub row_label: String,
    /// What the columns vary (e.g. "terminal_growth_rate")
    pub col_label: String,
    pub row_values: Vec<f64>,
    pub col_values: Vec<f64>,
    pub values: Vec<Vec<Option<f64>>>,
}

impl SensitivityGrid {
    /// Build a grid by evaluating `f` at every axis combination.
    pub fn from_fn(
        row_label: impl Into<String>,
        col_label: impl Into<String>,
        row_values: Vec<f64>,
        col_values: Vec<f64>,
        mut f: impl FnMut(f64, f64) -> Option<f64>,
    ) -> Self {
        let values = row_values
            .iter()
            .map(|&r| col_values.iter().map(|&c| f(r, c)).collect())
            .collect();

        Self {
            row_label: row_label.into(),
            col_label: col_label.into(),
            row_values,
            col_values,
            values,
        }
    }

    /// Cell at (row, col), if inside the grid and computed.
    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        self.values.get(row).and_then(|r| r.get(col)).copied().flatten()
    }
}

/// One-dimensional IRR sweep across candidate entry multiples.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IrrSensitivity {
    pub entry_multiples: Vec<f64>,
    pub irr_values: Vec<f64>,
}
