//! Row x column gap analysis (e.g. store performance vs category average).

use tracing::debug;

use super::aggregate::AggregateQuery;
use super::round1;
use crate::connection::Connection;
use crate::error::{Result, SalesError};
use crate::models::{
    ColumnMean, Dimension, GapCell, GapResult, KeyPart, Metric, Opportunity,
};

// ---------------------------------------------------------------------------
// GapQuery
// ---------------------------------------------------------------------------

/// Compares each row/column mean against the column's cross-row mean.
pub struct GapQuery<'a> {
    conn: &'a Connection,
}

impl<'a> GapQuery<'a> {
    /// Create a new `GapQuery` bound to the given connection.
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Build the deviation table of `row_dimension` x `col_dimension`.
    ///
    /// Each cell holds the mean of `metric` for that combination. A column's
    /// mean is the simple mean of its existing cells; combinations with no
    /// rows are left out rather than counted as zero. Columns whose mean is
    /// zero have no defined deviation and are listed in `skipped_columns`.
    pub fn compute_gaps(
        &self,
        row_dimension: Dimension,
        col_dimension: Dimension,
        metric: Metric,
    ) -> Result<GapResult> {
        if row_dimension == col_dimension {
            return Err(SalesError::InvalidInput(
                "gap analysis needs two distinct dimensions".to_string(),
            ));
        }

        let aggregates = AggregateQuery::new(self.conn);
        let table = aggregates.aggregate(&[row_dimension, col_dimension], metric)?;
        let column_order = aggregates.aggregate(&[col_dimension], metric)?;

        let mut rows: Vec<KeyPart> = Vec::new();
        let mut raw: Vec<(KeyPart, KeyPart, f64)> = Vec::with_capacity(table.len());
        for entry in &table {
            if let [row, col] = entry.key.parts() {
                if !rows.contains(row) {
                    rows.push(row.clone());
                }
                raw.push((row.clone(), col.clone(), entry.stats.mean));
            }
        }

        let mut columns = Vec::new();
        let mut skipped_columns = Vec::new();
        let mut cells = Vec::with_capacity(raw.len());

        for col in column_order.keys().filter_map(|k| k.first()) {
            let values: Vec<&(KeyPart, KeyPart, f64)> =
                raw.iter().filter(|(_, c, _)| c == col).collect();
            if values.is_empty() {
                continue;
            }
            let mean = values.iter().map(|(_, _, v)| v).sum::<f64>() / values.len() as f64;

            let mut col_cells = Vec::with_capacity(values.len());
            let mut undefined = false;
            for (row, _, value) in &values {
                match deviation(*value, mean) {
                    Ok(d) => col_cells.push(GapCell {
                        row: row.clone(),
                        column: col.clone(),
                        value: *value,
                        deviation: d,
                    }),
                    Err(e) => {
                        debug!(column = %col, error = %e, "Skipping gap column");
                        undefined = true;
                        break;
                    }
                }
            }

            if undefined {
                skipped_columns.push(col.clone());
            } else {
                columns.push(ColumnMean {
                    column: col.clone(),
                    mean,
                });
                cells.extend(col_cells);
            }
        }

        // Row-major, matching the order of the `rows` and `columns` labels
        cells.sort_by_key(|c| {
            (
                rows.iter().position(|r| r == &c.row),
                columns.iter().position(|m| m.column == c.column),
            )
        });

        Ok(GapResult {
            row_dimension,
            column_dimension: col_dimension,
            rows,
            columns,
            skipped_columns,
            cells,
        })
    }
}

/// Percent deviation of `value` from `mean`, rounded to 1 decimal.
///
/// # Errors
///
/// `DivisionUndefined` when `mean` is zero.
pub fn deviation(value: f64, mean: f64) -> Result<f64> {
    if mean == 0.0 {
        return Err(SalesError::DivisionUndefined(format!(
            "deviation of {} from a zero mean",
            value
        )));
    }
    Ok(round1((value - mean) / mean * 100.0))
}

/// Combinations whose deviation is below `threshold`, worst first.
///
/// Each opportunity carries the amount per transaction that closing the gap
/// to the column mean would add.
pub fn find_opportunities(gaps: &GapResult, threshold: f64) -> Vec<Opportunity> {
    let mut found: Vec<Opportunity> = gaps
        .cells
        .iter()
        .filter(|c| c.deviation < threshold)
        .filter_map(|c| {
            let column_mean = gaps.column_mean(&c.column)?;
            Some(Opportunity {
                row: c.row.clone(),
                column: c.column.clone(),
                deviation: c.deviation,
                column_mean,
                potential: c.deviation.abs() * column_mean / 100.0,
            })
        })
        .collect();

    found.sort_by(|a, b| a.deviation.total_cmp(&b.deviation));
    found
}
