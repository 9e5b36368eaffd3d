//! DuckDB connection wrapper holding the sales table and executing queries.
//!
//! Records are loaded once into an in-memory `sales` table; every analysis
//! reads from that table and returns rows as `serde_json::Value` maps.

use crate::config::SALES_TABLE;
use crate::error::{Result, SalesError};
use crate::models::{SalesRecord, Schema};
use chrono::{Datelike, NaiveDate};
use duckdb::types::{FromSql, Value, ValueRef};
use duckdb::{params, Connection as DuckDbConnection};
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use tracing::{debug, info};

/// `num_days_from_ce` of 1970-01-01, the origin of DuckDB's DATE storage.
const UNIX_EPOCH_DAYS_FROM_CE: i64 = 719_163;

/// Wraps an in-memory DuckDB connection holding one sales table.
pub struct Connection {
    conn: DuckDbConnection,
    row_count: usize,
    schema: Schema,
}

impl Connection {
    /// Open an in-memory DuckDB database with an empty sales table.
    pub fn new() -> Result<Self> {
        let conn = DuckDbConnection::open_in_memory()?;
        conn.execute_batch(&format!(
            "CREATE TABLE {} (\
                date DATE NOT NULL, \
                sales DOUBLE NOT NULL, \
                store_id VARCHAR, \
                store_name VARCHAR, \
                item_id VARCHAR, \
                item_name VARCHAR, \
                category VARCHAR\
             )",
            SALES_TABLE
        ))?;
        Ok(Self {
            conn,
            row_count: 0,
            schema: Schema::default(),
        })
    }

    /// Append records to the sales table inside a single transaction.
    ///
    /// Returns the number of rows inserted. A record with a non-finite
    /// `sales` value fails the whole load and leaves the table unchanged.
    pub fn load_records(&mut self, records: &[SalesRecord]) -> Result<usize> {
        let tx = self.conn.transaction()?;
        {
            let mut stmt = tx.prepare(&format!(
                "INSERT INTO {} VALUES (?, ?, ?, ?, ?, ?, ?)",
                SALES_TABLE
            ))?;
            for r in records {
                if !r.sales.is_finite() {
                    return Err(SalesError::InvalidInput(format!(
                        "non-finite sales value {} on {}",
                        r.sales, r.date
                    )));
                }
                stmt.execute(params![
                    date_value(r.date)?,
                    r.sales,
                    r.store_id,
                    r.store_name,
                    r.item_id,
                    r.item_name,
                    r.category
                ])?;
            }
        }
        tx.commit()?;

        self.row_count += records.len();
        self.schema = self.schema.union(&Schema::infer(records));
        info!(rows = records.len(), table = SALES_TABLE, "Loaded sales records");
        Ok(records.len())
    }

    /// Number of rows loaded so far.
    pub fn row_count(&self) -> usize {
        self.row_count
    }

    /// Optional columns carried by the loaded records.
    pub fn schema(&self) -> Schema {
        self.schema
    }

    /// Execute SQL and return results as a `Vec` of `HashMap`s.
    ///
    /// Each row is represented as a `HashMap<String, serde_json::Value>`.
    pub fn execute(
        &self,
        sql: &str,
        params: &[String],
    ) -> Result<Vec<HashMap<String, serde_json::Value>>> {
        debug!(sql, "Executing query");
        let mut stmt = self.conn.prepare(sql)?;

        let param_values: Vec<&dyn duckdb::ToSql> = params
            .iter()
            .map(|p| p as &dyn duckdb::ToSql)
            .collect();

        let mut rows_result = stmt.query(param_values.as_slice())?;

        // Column metadata is only available once the statement has run
        let column_names: Vec<String> = rows_result
            .as_ref()
            .ok_or_else(|| SalesError::InvalidInput("query produced no statement".to_string()))?
            .column_names()
            .into_iter()
            .map(|s| s.to_string())
            .collect();

        let mut out: Vec<HashMap<String, serde_json::Value>> = Vec::new();

        while let Some(row) = rows_result.next()? {
            let mut map = HashMap::with_capacity(column_names.len());
            for (i, col_name) in column_names.iter().enumerate() {
                map.insert(col_name.clone(), convert_value_ref(row.get_ref(i)?));
            }
            out.push(map);
        }

        Ok(out)
    }

    /// Execute SQL and deserialize each row into type `T`.
    pub fn execute_into<T: DeserializeOwned>(&self, sql: &str, params: &[String]) -> Result<Vec<T>> {
        let rows = self.execute(sql, params)?;
        let mut results = Vec::with_capacity(rows.len());
        for row in rows {
            let value = serde_json::Value::Object(row.into_iter().collect());
            results.push(serde_json::from_value(value)?);
        }
        Ok(results)
    }
}

/// Convert a DuckDB `ValueRef` to a `serde_json::Value`.
fn convert_value_ref(val: ValueRef<'_>) -> serde_json::Value {
    match val {
        ValueRef::Null => serde_json::Value::Null,
        ValueRef::Boolean(b) => serde_json::Value::Bool(b),
        ValueRef::TinyInt(n) => serde_json::Value::Number(n.into()),
        ValueRef::SmallInt(n) => serde_json::Value::Number(n.into()),
        ValueRef::Int(n) => serde_json::Value::Number(n.into()),
        ValueRef::BigInt(n) => serde_json::Value::Number(n.into()),
        ValueRef::UTinyInt(n) => serde_json::Value::Number(n.into()),
        ValueRef::USmallInt(n) => serde_json::Value::Number(n.into()),
        ValueRef::UInt(n) => serde_json::Value::Number(n.into()),
        ValueRef::UBigInt(n) => serde_json::Value::Number(n.into()),
        ValueRef::HugeInt(n) => {
            // HUGEINT (e.g. SUM over BIGINT) rarely exceeds i64
            if let Ok(i) = i64::try_from(n) {
                serde_json::Value::Number(i.into())
            } else {
                serde_json::Value::String(n.to_string())
            }
        }
        ValueRef::Float(f) => serde_json::Number::from_f64(f as f64)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null),
        ValueRef::Double(f) => serde_json::Number::from_f64(f)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null),
        ValueRef::Text(bytes) => {
            serde_json::Value::String(String::from_utf8_lossy(bytes).to_string())
        }
        ValueRef::Date32(_) => NaiveDate::column_result(val)
            .map(|d| serde_json::Value::String(d.to_string()))
            .unwrap_or(serde_json::Value::Null),
        // Timestamps, intervals and nested types never leave the sales queries
        _ => serde_json::Value::Null,
    }
}

/// Bind a date as DuckDB's native DATE (days since 1970-01-01).
fn date_value(date: NaiveDate) -> Result<Value> {
    let days = i64::from(date.num_days_from_ce()) - UNIX_EPOCH_DAYS_FROM_CE;
    i32::try_from(days)
        .map(Value::Date32)
        .map_err(|_| SalesError::InvalidInput(format!("date {} out of range", date)))
}
