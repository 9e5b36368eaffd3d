//! SQL builder for the grouped aggregate queries run against the sales table.
//!
//! Column expressions come from
//! [`Dimension::sql_expr`](crate::models::Dimension::sql_expr) and are never
//! user-supplied, so the builder carries no bound parameters. Builder methods
//! return `&mut Self` for chaining.
//!
//! # Example
//!
//! ```rust
//! use sales_insights::SqlBuilder;
//! let sql = SqlBuilder::new("sales")
//!     .select(&["store_name AS k0", "SUM(sales) AS total"])
//!     .where_not_null("store_name")
//!     .group_by(&["store_name"])
//!     .order_by(&["k0 ASC"])
//!     .build();
//! assert!(sql.contains("GROUP BY store_name"));
//! ```

/// Assembles SELECT / WHERE / GROUP BY / ORDER BY queries over one table.
pub struct SqlBuilder {
    select_cols: Vec<String>,
    from_table: String,
    not_null_cols: Vec<String>,
    group_by_cols: Vec<String>,
    order_by_cols: Vec<String>,
}

impl SqlBuilder {
    /// Create a builder targeting the given table.
    pub fn new(table: &str) -> Self {
        Self {
            select_cols: vec!["*".to_string()],
            from_table: table.to_string(),
            not_null_cols: Vec::new(),
            group_by_cols: Vec::new(),
            order_by_cols: Vec::new(),
        }
    }

    /// Set the columns to select (replaces the default `*`).
    pub fn select(&mut self, cols: &[&str]) -> &mut Self {
        self.select_cols = cols.iter().map(|c| c.to_string()).collect();
        self
    }

    /// Keep only rows where `column` has a value.
    pub fn where_not_null(&mut self, column: &str) -> &mut Self {
        self.not_null_cols.push(column.to_string());
        self
    }

    /// Add GROUP BY expressions.
    pub fn group_by(&mut self, cols: &[&str]) -> &mut Self {
        self.group_by_cols.extend(cols.iter().map(|c| c.to_string()));
        self
    }

    /// Add ORDER BY clauses (e.g. `"k0 ASC"`).
    pub fn order_by(&mut self, clauses: &[&str]) -> &mut Self {
        self.order_by_cols.extend(clauses.iter().map(|c| c.to_string()));
        self
    }

    /// Build the final SQL string.
    pub fn build(&self) -> String {
        let mut parts = vec![
            format!("SELECT {}", self.select_cols.join(", ")),
            format!("FROM {}", self.from_table),
        ];

        if !self.not_null_cols.is_empty() {
            let conditions: Vec<String> = self
                .not_null_cols
                .iter()
                .map(|c| format!("{} IS NOT NULL", c))
                .collect();
            parts.push(format!("WHERE {}", conditions.join(" AND ")));
        }

        if !self.group_by_cols.is_empty() {
            parts.push(format!("GROUP BY {}", self.group_by_cols.join(", ")));
        }

        if !self.order_by_cols.is_empty() {
            parts.push(format!("ORDER BY {}", self.order_by_cols.join(", ")));
        }

        parts.join("\n")
    }
}
