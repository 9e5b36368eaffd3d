use serde::Serialize;

use super::aggregate::KeyPart;
use super::record::Dimension;

// ---------------------------------------------------------------------------
// GapCell — One (row, column) deviation
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GapCell {
    pub row: KeyPart,
    pub column: KeyPart,
    /// Mean of the metric for this row/column combination.
    pub value: f64,
    /// Percent deviation from the column mean, rounded to 1 decimal.
    pub deviation: f64,
}

// ---------------------------------------------------------------------------
// ColumnMean — Cross-row mean of one column
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnMean {
    pub column: KeyPart,
    pub mean: f64,
}

// ---------------------------------------------------------------------------
// GapResult — Row x column deviation table
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GapResult {
    pub row_dimension: Dimension,
    pub column_dimension: Dimension,
    pub rows: Vec<KeyPart>,
    /// Columns that have a defined (non-zero) mean, in key order.
    pub columns: Vec<ColumnMean>,
    /// Columns dropped because their mean was zero.
    pub skipped_columns: Vec<KeyPart>,
    pub cells: Vec<GapCell>,
}

impl GapResult {
    pub fn deviation(&self, row: &KeyPart, column: &KeyPart) -> Option<f64> {
        self.cells
            .iter()
            .find(|c| &c.row == row && &c.column == column)
            .map(|c| c.deviation)
    }

    pub fn column_mean(&self, column: &KeyPart) -> Option<f64> {
        self.columns
            .iter()
            .find(|c| &c.column == column)
            .map(|c| c.mean)
    }

    /// Deviations laid out as `rows x columns`; absent combinations are `None`.
    pub fn matrix(&self) -> Vec<Vec<Option<f64>>> {
        self.rows
            .iter()
            .map(|row| {
                self.columns
                    .iter()
                    .map(|col| self.deviation(row, &col.column))
                    .collect()
            })
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Opportunity — Under-performing combination
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Opportunity {
    pub row: KeyPart,
    pub column: KeyPart,
    pub deviation: f64,
    pub column_mean: f64,
    /// Amount per transaction recovered by closing the gap to the column mean.
    pub potential: f64,
}
