//! Analysis modules for the sales dataset.
//!
//! Query structs borrow the [`Connection`](crate::connection::Connection) and
//! return typed results; ranking and the threshold/band helpers are pure
//! functions over those results.

pub mod aggregate;
pub mod gaps;
pub mod rank;
pub mod summary;
pub mod trends;

pub use aggregate::AggregateQuery;
pub use gaps::{deviation, find_opportunities, GapQuery};
pub use rank::{bottom_n, rank, top_n};
pub use summary::SummaryQuery;
pub use trends::{pct_change, recent_trend_average, TrendQuery};

use std::collections::HashMap;

use serde_json::Value;

use crate::connection::Connection;
use crate::error::{Result, SalesError};
use crate::models::Dimension;

/// Fail with `InvalidInput` when no records are loaded.
pub(crate) fn ensure_non_empty(conn: &Connection) -> Result<()> {
    if conn.row_count() == 0 {
        return Err(SalesError::InvalidInput("dataset is empty".to_string()));
    }
    Ok(())
}

/// Fail with `MissingOptionalDimension` when the column behind `dim` is absent.
pub(crate) fn ensure_dimension(conn: &Connection, dim: Dimension) -> Result<()> {
    if !conn.schema().has(dim) {
        return Err(SalesError::MissingOptionalDimension(dim.column().to_string()));
    }
    Ok(())
}

pub(crate) fn f64_field(row: &HashMap<String, Value>, name: &str) -> Result<f64> {
    row.get(name)
        .and_then(Value::as_f64)
        .ok_or_else(|| SalesError::InvalidInput(format!("missing numeric column {}", name)))
}

pub(crate) fn u64_field(row: &HashMap<String, Value>, name: &str) -> Result<u64> {
    row.get(name)
        .and_then(Value::as_u64)
        .ok_or_else(|| SalesError::InvalidInput(format!("missing count column {}", name)))
}

/// Round to one decimal place.
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
