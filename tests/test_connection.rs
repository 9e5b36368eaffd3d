//! Connection integration tests: record loading, schema inference and raw
//! SQL execution.

mod common;

use common::date;
use serde::Deserialize;
use sales_insights::{Connection, SalesError, SalesRecord, Schema};

fn count_rows(conn: &Connection) -> i64 {
    let rows = conn.execute("SELECT COUNT(*) AS n FROM sales", &[]).unwrap();
    rows[0]["n"].as_i64().unwrap()
}

fn sample_connection() -> Connection {
    let mut conn = Connection::new().unwrap();
    conn.load_records(&common::sample_records()).unwrap();
    conn
}

// ---------------------------------------------------------------------------
// load_records
// ---------------------------------------------------------------------------

#[test]
fn new_connection_is_empty() {
    let conn = Connection::new().unwrap();
    assert_eq!(conn.row_count(), 0);
    assert_eq!(conn.schema(), Schema::default());
}

#[test]
fn load_records_counts_rows() {
    let mut conn = Connection::new().unwrap();
    assert_eq!(conn.load_records(&common::sample_records()).unwrap(), 10);
    assert_eq!(conn.row_count(), 10);

    assert_eq!(count_rows(&conn), 10);
}

#[test]
fn repeated_loads_append() {
    let mut conn = Connection::new().unwrap();
    conn.load_records(&[SalesRecord::new(date(2023, 1, 1), 1.0)]).unwrap();
    conn.load_records(&[SalesRecord::new(date(2023, 1, 2), 2.0).category("Toys")])
        .unwrap();

    assert_eq!(conn.row_count(), 2);
    assert!(conn.schema().category);
    assert!(!conn.schema().store_id);

    assert_eq!(count_rows(&conn), 2);
}

#[test]
fn failed_load_rolls_back_and_connection_stays_usable() {
    let mut conn = Connection::new().unwrap();
    let bad = vec![
        SalesRecord::new(date(2023, 1, 1), 10.0),
        SalesRecord::new(date(2023, 1, 2), f64::NAN),
    ];
    assert!(matches!(
        conn.load_records(&bad),
        Err(SalesError::InvalidInput(_))
    ));
    assert_eq!(conn.row_count(), 0);
    assert_eq!(count_rows(&conn), 0);

    conn.load_records(&[SalesRecord::new(date(2023, 1, 3), 5.0).category("Toys")])
        .unwrap();
    assert_eq!(conn.row_count(), 1);
    assert_eq!(count_rows(&conn), 1);
    assert!(conn.schema().category);
}

#[test]
fn dates_outside_four_digit_years_round_trip() {
    let mut conn = Connection::new().unwrap();
    conn.load_records(&[
        SalesRecord::new(date(-5, 1, 1), 1.0),
        SalesRecord::new(date(10000, 6, 15), 2.0),
    ])
    .unwrap();

    let rows = conn
        .execute("SELECT date, year(date) AS y FROM sales ORDER BY date", &[])
        .unwrap();
    assert_eq!(rows[0]["date"], date(-5, 1, 1).to_string());
    assert_eq!(rows[0]["y"], -5);
    assert_eq!(rows[1]["date"], date(10000, 6, 15).to_string());
    assert_eq!(rows[1]["y"], 10000);
}

#[test]
fn schema_tracks_optional_columns() {
    let conn = sample_connection();
    let schema = conn.schema();
    assert!(schema.store_id && schema.store_name);
    assert!(schema.item_id && schema.item_name);
    assert!(schema.category);
}

// ---------------------------------------------------------------------------
// execute
// ---------------------------------------------------------------------------

#[test]
fn execute_with_params() {
    let conn = sample_connection();
    let rows = conn
        .execute(
            "SELECT * FROM sales WHERE store_name = ? ORDER BY date",
            &["Airport".to_string()],
        )
        .unwrap();
    assert_eq!(rows.len(), 5);
    assert_eq!(rows[0]["item_name"], "Milk");
    assert_eq!(rows[0]["sales"], 50.0);
}

#[test]
fn execute_returns_empty_for_no_matches() {
    let conn = sample_connection();
    let rows = conn
        .execute(
            "SELECT * FROM sales WHERE category = ?",
            &["Produce".to_string()],
        )
        .unwrap();
    assert!(rows.is_empty());
}

#[test]
fn null_columns_become_json_null() {
    let mut conn = Connection::new().unwrap();
    conn.load_records(&[SalesRecord::new(date(2023, 1, 1), 1.0)]).unwrap();
    let rows = conn.execute("SELECT store_name FROM sales", &[]).unwrap();
    assert!(rows[0]["store_name"].is_null());
}

#[test]
fn invalid_sql_is_an_error() {
    let conn = sample_connection();
    assert!(conn.execute("SELECT nope FROM sales", &[]).is_err());
}

// ---------------------------------------------------------------------------
// execute_into
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct StoreTotal {
    store_name: String,
    total: f64,
}

#[test]
fn execute_into_deserializes_rows() {
    let conn = sample_connection();
    let totals: Vec<StoreTotal> = conn
        .execute_into(
            "SELECT store_name, SUM(sales) AS total FROM sales GROUP BY store_name ORDER BY store_name",
            &[],
        )
        .unwrap();
    assert_eq!(totals.len(), 2);
    assert_eq!(totals[0].store_name, "Airport");
    assert_eq!(totals[1].total, 480.0);
}

#[test]
fn analyzer_sql_escape_hatch() {
    let analyzer = common::sample_analyzer();
    let rows = analyzer
        .sql("SELECT COUNT(DISTINCT category) AS n FROM sales", &[])
        .unwrap();
    assert_eq!(rows[0]["n"], 2);
    assert_eq!(analyzer.len(), 10);
    assert!(!analyzer.is_empty());
    assert_eq!(
        analyzer.to_string(),
        "SalesAnalyzer(rows=10, store_key=store_name, item_key=item_name, category=true)"
    );
}
