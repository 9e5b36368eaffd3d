//! Unit tests for the SqlBuilder query construction.

use sales_insights::{Dimension, SqlBuilder};

// ---------------------------------------------------------------------------
// Basic construction
// ---------------------------------------------------------------------------

#[test]
fn new_creates_select_star_from_table() {
    let sql = SqlBuilder::new("sales").build();
    assert_eq!(sql, "SELECT *\nFROM sales");
}

#[test]
fn select_replaces_default_star() {
    let sql = SqlBuilder::new("sales")
        .select(&["store_name", "sales"])
        .build();
    assert!(sql.starts_with("SELECT store_name, sales\n"));
}

// ---------------------------------------------------------------------------
// WHERE conditions
// ---------------------------------------------------------------------------

#[test]
fn where_not_null_conditions_are_anded() {
    let sql = SqlBuilder::new("sales")
        .where_not_null("store_id")
        .where_not_null("category")
        .build();
    assert!(sql.contains("WHERE store_id IS NOT NULL AND category IS NOT NULL"));
}

// ---------------------------------------------------------------------------
// GROUP BY / ORDER BY
// ---------------------------------------------------------------------------

#[test]
fn group_by_and_order_by() {
    let sql = SqlBuilder::new("sales")
        .select(&["category", "SUM(sales) AS total"])
        .group_by(&["category"])
        .order_by(&["k0 ASC", "total DESC"])
        .build();
    assert!(sql.contains("GROUP BY category"));
    assert!(sql.ends_with("ORDER BY k0 ASC, total DESC"));
}

#[test]
fn full_query_clause_order() {
    let sql = SqlBuilder::new("sales")
        .select(&["isodow(date) AS k0", "COUNT(*) AS n"])
        .where_not_null("store_id")
        .group_by(&["isodow(date)"])
        .order_by(&["k0 ASC"])
        .build();
    assert_eq!(
        sql,
        "SELECT isodow(date) AS k0, COUNT(*) AS n\n\
         FROM sales\n\
         WHERE store_id IS NOT NULL\n\
         GROUP BY isodow(date)\n\
         ORDER BY k0 ASC"
    );
}

#[test]
fn dimension_expressions_build_group_queries() {
    let expr = Dimension::YearMonth.sql_expr();
    let select = format!("{} AS k0", expr);
    let sql = SqlBuilder::new("sales")
        .select(&[select.as_str()])
        .group_by(&[expr])
        .build();
    assert!(sql.contains("GROUP BY year(date) * 100 + month(date)"));
}
