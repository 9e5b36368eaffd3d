//! Descriptive sales analytics for Rust.
//!
//! Loads tabular sales records (date, amount, optional store/item/category
//! columns) into an in-process DuckDB table and computes grouped aggregates,
//! rankings, store-vs-category gap analysis, month-over-month and
//! year-over-year trends, and a templated business insights report.
//!
//! # Quick start
//!
//! ```no_run
//! use chrono::NaiveDate;
//! use sales_insights::{Dimension, SalesAnalyzer, SalesRecord};
//!
//! let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
//! let records = vec![
//!     SalesRecord::new(date, 120.0).store("1", "Downtown").category("Dairy"),
//!     SalesRecord::new(date, 80.0).store("2", "Airport").category("Bakery"),
//! ];
//!
//! let analyzer = SalesAnalyzer::builder().records(records).build().unwrap();
//!
//! // Totals per store
//! let by_store = analyzer.aggregates().by(Dimension::StoreName).unwrap();
//!
//! // Full insights report
//! let report = analyzer.report().unwrap();
//! ```

pub mod analysis;
#[cfg(feature = "async")]
pub mod async_client;
pub mod charts;
pub mod config;
pub mod connection;
pub mod error;
pub mod format;
pub mod insights;
pub mod models;
pub mod render;
pub mod sql_builder;

pub use analysis::{
    bottom_n, deviation, find_opportunities, pct_change, rank, recent_trend_average, top_n,
    AggregateQuery, GapQuery, SummaryQuery, TrendQuery,
};
#[cfg(feature = "async")]
pub use async_client::AsyncSalesAnalyzer;
pub use config::{DimensionConfig, InsightConfig, TrendBands};
pub use connection::Connection;
pub use error::{Result, SalesError};
pub use insights::InsightBuilder;
pub use models::*;
pub use render::{JsonRenderer, Renderer};
pub use sql_builder::SqlBuilder;

use std::collections::HashMap;
use std::fmt;

use tracing::info;

// ---------------------------------------------------------------------------
// SalesAnalyzerBuilder
// ---------------------------------------------------------------------------

/// Builder for configuring and constructing a [`SalesAnalyzer`].
///
/// Use [`SalesAnalyzer::builder()`] to obtain a builder, chain configuration
/// methods, and call [`build()`](SalesAnalyzerBuilder::build) to load the data.
#[derive(Default)]
pub struct SalesAnalyzerBuilder {
    records: Vec<SalesRecord>,
    config: InsightConfig,
}

impl SalesAnalyzerBuilder {
    /// Append records to load. May be called repeatedly.
    pub fn records<I>(mut self, records: I) -> Self
    where
        I: IntoIterator<Item = SalesRecord>,
    {
        self.records.extend(records);
        self
    }

    /// Replace the report thresholds and sizes. Defaults to
    /// [`InsightConfig::default()`].
    pub fn config(mut self, config: InsightConfig) -> Self {
        self.config = config;
        self
    }

    /// Open the DuckDB connection, load every record and resolve which
    /// columns identify stores and items.
    pub fn build(self) -> Result<SalesAnalyzer> {
        let mut conn = Connection::new()?;
        conn.load_records(&self.records)?;
        let dims = DimensionConfig::resolve(&conn.schema());
        info!(
            rows = conn.row_count(),
            store_key = ?dims.store_key,
            item_key = ?dims.item_key,
            has_category = dims.has_category,
            "Sales analyzer ready"
        );
        Ok(SalesAnalyzer {
            conn,
            dims,
            config: self.config,
        })
    }
}

// ---------------------------------------------------------------------------
// SalesAnalyzer
// ---------------------------------------------------------------------------

/// The main entry point: one loaded dataset plus its report configuration.
///
/// Owns the [`Connection`] and exposes analysis interfaces as lightweight
/// borrowing wrappers. The dataset is read-only once built.
pub struct SalesAnalyzer {
    conn: Connection,
    dims: DimensionConfig,
    config: InsightConfig,
}

impl SalesAnalyzer {
    /// Create a new builder for configuring the analyzer.
    pub fn builder() -> SalesAnalyzerBuilder {
        SalesAnalyzerBuilder::default()
    }

    /// Build an analyzer with the default configuration.
    pub fn from_records<I>(records: I) -> Result<Self>
    where
        I: IntoIterator<Item = SalesRecord>,
    {
        Self::builder().records(records).build()
    }

    // -- Analysis accessors ------------------------------------------------

    /// Grouped sum/mean/count aggregation.
    pub fn aggregates(&self) -> AggregateQuery<'_> {
        AggregateQuery::new(&self.conn)
    }

    /// Row-vs-column deviation analysis.
    pub fn gaps(&self) -> GapQuery<'_> {
        GapQuery::new(&self.conn)
    }

    /// Monthly and year-over-year trends.
    pub fn trends(&self) -> TrendQuery<'_> {
        TrendQuery::new(&self.conn)
    }

    /// Headline metrics, calendar patterns, category shares and histograms.
    pub fn summary(&self) -> SummaryQuery<'_> {
        SummaryQuery::new(&self.conn)
    }

    /// Section-by-section access to the insights report.
    pub fn insights(&self) -> InsightBuilder<'_> {
        InsightBuilder::new(&self.conn, self.dims, &self.config)
    }

    /// Build the complete insights report.
    pub fn report(&self) -> Result<Report> {
        self.insights().build()
    }

    // -- Metadata and utility methods --------------------------------------

    /// Store/item key columns resolved for this dataset.
    pub fn dimensions(&self) -> DimensionConfig {
        self.dims
    }

    pub fn config(&self) -> &InsightConfig {
        &self.config
    }

    /// Which optional columns the loaded records carry.
    pub fn schema(&self) -> Schema {
        self.conn.schema()
    }

    /// Number of loaded records.
    pub fn len(&self) -> usize {
        self.conn.row_count()
    }

    pub fn is_empty(&self) -> bool {
        self.conn.row_count() == 0
    }

    /// Execute a raw SQL query against the `sales` table.
    ///
    /// # Arguments
    ///
    /// * `query` - SQL string with `?` positional placeholders.
    /// * `params` - Parameter values corresponding to the placeholders.
    pub fn sql(
        &self,
        query: &str,
        params: &[String],
    ) -> Result<Vec<HashMap<String, serde_json::Value>>> {
        self.conn.execute(query, params)
    }

    /// Return a reference to the underlying [`Connection`] for advanced usage.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

// ---------------------------------------------------------------------------
// Display
// ---------------------------------------------------------------------------

impl fmt::Display for SalesAnalyzer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = |d: Option<Dimension>| d.map(|d| d.column()).unwrap_or("none");
        write!(
            f,
            "SalesAnalyzer(rows={}, store_key={}, item_key={}, category={})",
            self.conn.row_count(),
            label(self.dims.store_key),
            label(self.dims.item_key),
            self.dims.has_category
        )
    }
}
