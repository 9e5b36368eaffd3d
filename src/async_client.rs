//! Async wrapper around [`SalesAnalyzer`] for use in async runtimes (Tokio, etc.).
//!
//! Runs all analysis on a blocking thread pool via
//! [`tokio::task::spawn_blocking`], keeping the async event loop free.
//!
//! # Example
//!
//! ```no_run
//! use sales_insights::{AsyncSalesAnalyzer, Dimension};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     let analyzer = AsyncSalesAnalyzer::builder().build().await.unwrap();
//!
//!     // Run any sync analyzer method via closure
//!     let by_month = analyzer.run(|a| a.aggregates().by(Dimension::Month)).await.unwrap();
//!
//!     // Convenience method for the full report
//!     let report = analyzer.report().await.unwrap();
//! }
//! ```

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::config::InsightConfig;
use crate::error::{Result, SalesError};
use crate::models::{Report, SalesRecord};
use crate::SalesAnalyzer;

// ---------------------------------------------------------------------------
// AsyncSalesAnalyzerBuilder
// ---------------------------------------------------------------------------

/// Builder for configuring and constructing an [`AsyncSalesAnalyzer`].
#[derive(Default)]
pub struct AsyncSalesAnalyzerBuilder {
    records: Vec<SalesRecord>,
    config: InsightConfig,
}

impl AsyncSalesAnalyzerBuilder {
    /// Append records to load.
    pub fn records<I>(mut self, records: I) -> Self
    where
        I: IntoIterator<Item = SalesRecord>,
    {
        self.records.extend(records);
        self
    }

    pub fn config(mut self, config: InsightConfig) -> Self {
        self.config = config;
        self
    }

    /// Load the records on the blocking thread pool.
    pub async fn build(self) -> Result<AsyncSalesAnalyzer> {
        tokio::task::spawn_blocking(move || {
            let analyzer = SalesAnalyzer::builder()
                .records(self.records)
                .config(self.config)
                .build()?;
            Ok(AsyncSalesAnalyzer {
                inner: Arc::new(Mutex::new(analyzer)),
            })
        })
        .await
        .map_err(|e| SalesError::InvalidInput(format!("Task join error: {e}")))?
    }
}

// ---------------------------------------------------------------------------
// AsyncSalesAnalyzer
// ---------------------------------------------------------------------------

/// Async wrapper around [`SalesAnalyzer`].
///
/// The DuckDB connection is not `Sync`, so the analyzer sits behind a
/// [`Mutex`] and every call is dispatched to a blocking thread.
pub struct AsyncSalesAnalyzer {
    inner: Arc<Mutex<SalesAnalyzer>>,
}

impl AsyncSalesAnalyzer {
    pub fn builder() -> AsyncSalesAnalyzerBuilder {
        AsyncSalesAnalyzerBuilder::default()
    }

    /// Run a sync analyzer operation on the blocking thread pool.
    ///
    /// ```no_run
    /// # use sales_insights::AsyncSalesAnalyzer;
    /// # async fn example() -> sales_insights::Result<()> {
    /// # let analyzer = AsyncSalesAnalyzer::builder().build().await?;
    /// let trend = analyzer
    ///     .run(|a| a.trends().monthly_trend(Default::default()))
    ///     .await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn run<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&SalesAnalyzer) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let analyzer = self.inner.clone();
        tokio::task::spawn_blocking(move || {
            let guard = analyzer
                .lock()
                .map_err(|_| SalesError::InvalidInput("analyzer lock poisoned".into()))?;
            f(&guard)
        })
        .await
        .map_err(|e| SalesError::InvalidInput(format!("Task join error: {e}")))?
    }

    /// Execute a raw SQL query asynchronously.
    pub async fn sql(
        &self,
        query: &str,
        params: &[String],
    ) -> Result<Vec<HashMap<String, serde_json::Value>>> {
        let query = query.to_string();
        let params = params.to_vec();
        self.run(move |a| a.sql(&query, &params)).await
    }

    /// Build the full insights report asynchronously.
    pub async fn report(&self) -> Result<Report> {
        self.run(|a| a.report()).await
    }

    /// Number of loaded records.
    pub async fn len(&self) -> Result<usize> {
        self.run(|a| Ok(a.len())).await
    }

    /// Drop the analyzer and its DuckDB connection.
    pub async fn close(self) -> Result<()> {
        tokio::task::spawn_blocking(move || {
            let analyzer = self
                .inner
                .lock()
                .map_err(|_| SalesError::InvalidInput("analyzer lock poisoned".into()))?;
            drop(analyzer);
            Ok(())
        })
        .await
        .map_err(|e| SalesError::InvalidInput(format!("Task join error: {e}")))?
    }
}
