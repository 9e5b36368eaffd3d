//! Group-by aggregation over the sales table.

use tracing::debug;

use super::{ensure_dimension, ensure_non_empty, f64_field, u64_field};
use crate::config::SALES_TABLE;
use crate::connection::Connection;
use crate::error::{Result, SalesError};
use crate::models::{AggregateEntry, AggregateResult, AggregateStats, Dimension, GroupKey, Metric};
use crate::sql_builder::SqlBuilder;

// ---------------------------------------------------------------------------
// AggregateQuery
// ---------------------------------------------------------------------------

/// Sum/mean/count of a metric grouped by one or more dimensions.
pub struct AggregateQuery<'a> {
    conn: &'a Connection,
}

impl<'a> AggregateQuery<'a> {
    /// Create a new `AggregateQuery` bound to the given connection.
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Group the dataset by `group_by` and aggregate `metric`.
    ///
    /// Rows whose optional grouping column is null are left out. Keys come
    /// back in natural order: weekdays Monday to Sunday, calendar values
    /// ascending, text lexicographic.
    ///
    /// # Errors
    ///
    /// * `InvalidInput` if the dataset is empty or `group_by` is empty.
    /// * `MissingOptionalDimension` if a requested column is absent; picking
    ///   a fallback (e.g. `store_id` for `store_name`) is up to the caller.
    pub fn aggregate(&self, group_by: &[Dimension], metric: Metric) -> Result<AggregateResult> {
        ensure_non_empty(self.conn)?;
        if group_by.is_empty() {
            return Err(SalesError::InvalidInput(
                "at least one grouping dimension is required".to_string(),
            ));
        }
        for dim in group_by {
            ensure_dimension(self.conn, *dim)?;
        }

        let key_cols: Vec<String> = group_by
            .iter()
            .enumerate()
            .map(|(i, d)| format!("{} AS k{}", d.sql_expr(), i))
            .collect();
        let sum_col = format!("SUM({}) AS total", metric.column());

        let mut select: Vec<&str> = key_cols.iter().map(String::as_str).collect();
        select.push(&sum_col);
        select.push("COUNT(*) AS n");

        let group_exprs: Vec<&str> = group_by.iter().map(|d| d.sql_expr()).collect();
        let order: Vec<String> = (0..group_by.len()).map(|i| format!("k{} ASC", i)).collect();
        let order_refs: Vec<&str> = order.iter().map(String::as_str).collect();

        let mut qb = SqlBuilder::new(SALES_TABLE);
        qb.select(&select);
        for dim in group_by.iter().filter(|d| d.is_optional()) {
            qb.where_not_null(dim.column());
        }
        qb.group_by(&group_exprs).order_by(&order_refs);

        let rows = self.conn.execute(&qb.build(), &[])?;

        let mut entries = Vec::with_capacity(rows.len());
        for row in &rows {
            let mut parts = Vec::with_capacity(group_by.len());
            for (i, dim) in group_by.iter().enumerate() {
                let value = row
                    .get(&format!("k{}", i))
                    .ok_or_else(|| SalesError::InvalidInput(format!("missing key column k{}", i)))?;
                parts.push(dim.parse_key(value)?);
            }
            let stats = AggregateStats::from_sum(f64_field(row, "total")?, u64_field(row, "n")?);
            entries.push(AggregateEntry {
                key: GroupKey(parts),
                stats,
            });
        }

        debug!(dimensions = ?group_by, groups = entries.len(), "Aggregated sales");
        Ok(AggregateResult::new(group_by.to_vec(), entries))
    }

    /// Shorthand for grouping sales by a single dimension.
    pub fn by(&self, dim: Dimension) -> Result<AggregateResult> {
        self.aggregate(&[dim], Metric::Sales)
    }
}
