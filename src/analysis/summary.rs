//! Headline metrics, calendar patterns and distributions.

use chrono::NaiveDate;
use serde::Deserialize;
use tracing::debug;

use super::aggregate::AggregateQuery;
use super::rank::rank;
use super::{ensure_dimension, ensure_non_empty, f64_field, round1, u64_field};
use crate::config::SALES_TABLE;
use crate::connection::Connection;
use crate::error::{Result, SalesError};
use crate::models::{
    AggregateResult, CategoryShare, Dimension, ExecutiveSummary, HistogramBin, KeyPart,
    Seasonality, SortOrder, StatField, WeekdayPattern,
};
use crate::sql_builder::SqlBuilder;

#[derive(Debug, Deserialize)]
struct SummaryRow {
    total_sales: f64,
    first_date: NaiveDate,
    last_date: NaiveDate,
    day_count: u64,
    store_count: u64,
    item_count: u64,
}

// ---------------------------------------------------------------------------
// SummaryQuery
// ---------------------------------------------------------------------------

/// Descriptive metrics over the whole dataset.
pub struct SummaryQuery<'a> {
    conn: &'a Connection,
}

impl<'a> SummaryQuery<'a> {
    /// Create a new `SummaryQuery` bound to the given connection.
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Total sales, date span, average daily revenue and distinct
    /// store/item counts.
    ///
    /// Store and item counts are based on the id columns and are zero when
    /// those columns are absent.
    pub fn executive_summary(&self) -> Result<ExecutiveSummary> {
        ensure_non_empty(self.conn)?;

        let sql = SqlBuilder::new(SALES_TABLE)
            .select(&[
                "SUM(sales) AS total_sales",
                "MIN(date) AS first_date",
                "MAX(date) AS last_date",
                "COUNT(DISTINCT date) AS day_count",
                "COUNT(DISTINCT store_id) AS store_count",
                "COUNT(DISTINCT item_id) AS item_count",
            ])
            .build();
        let row: SummaryRow = self
            .conn
            .execute_into(&sql, &[])?
            .into_iter()
            .next()
            .ok_or_else(|| SalesError::InvalidInput("dataset is empty".to_string()))?;

        let (first_date, last_date) = (row.first_date, row.last_date);
        let avg_daily_revenue = if row.day_count == 0 {
            0.0
        } else {
            row.total_sales / row.day_count as f64
        };

        Ok(ExecutiveSummary {
            total_sales: row.total_sales,
            first_date,
            last_date,
            total_days: (last_date - first_date).num_days() + 1,
            avg_daily_revenue,
            store_count: row.store_count,
            item_count: row.item_count,
        })
    }

    /// Sales totals per date, oldest first.
    pub fn daily_totals(&self) -> Result<AggregateResult> {
        AggregateQuery::new(self.conn).by(Dimension::Date)
    }

    /// Average sales per weekday with the best/worst day and weekend lift.
    pub fn weekday_pattern(&self) -> Result<WeekdayPattern> {
        let by_day = AggregateQuery::new(self.conn).by(Dimension::DayOfWeek)?;

        let (best, worst) = match (by_day.max_by(StatField::Mean), by_day.min_by(StatField::Mean)) {
            (Some(b), Some(w)) => (b, w),
            _ => return Err(SalesError::InvalidInput("dataset is empty".to_string())),
        };
        let best_day = best.key.first().cloned().ok_or_else(missing_key)?;
        let worst_day = worst.key.first().cloned().ok_or_else(missing_key)?;

        let averages: Vec<(KeyPart, f64)> = by_day
            .iter()
            .filter_map(|e| e.key.first().map(|k| (k.clone(), e.stats.mean)))
            .collect();

        let weekend_avg = mean_of(averages.iter().filter(|(k, _)| k.is_weekend()).map(|(_, v)| *v));
        let weekday_avg = mean_of(averages.iter().filter(|(k, _)| !k.is_weekend()).map(|(_, v)| *v));
        let weekend_lift = match (weekend_avg, weekday_avg) {
            (Some(we), Some(wd)) if wd != 0.0 => Some((we - wd) / wd * 100.0),
            (Some(_), Some(_)) => {
                debug!("Weekday average is zero; weekend lift undefined");
                None
            }
            _ => None,
        };

        Ok(WeekdayPattern {
            averages,
            best_day,
            worst_day,
            weekend_avg,
            weekday_avg,
            weekend_lift,
        })
    }

    /// Average sales per calendar month with the peak and low month.
    pub fn seasonality(&self) -> Result<Seasonality> {
        let by_month = AggregateQuery::new(self.conn).by(Dimension::Month)?;

        let (peak, low) = match (by_month.max_by(StatField::Mean), by_month.min_by(StatField::Mean)) {
            (Some(p), Some(l)) => (p, l),
            _ => return Err(SalesError::InvalidInput("dataset is empty".to_string())),
        };

        Ok(Seasonality {
            averages: by_month
                .iter()
                .filter_map(|e| e.key.first().map(|k| (k.clone(), e.stats.mean)))
                .collect(),
            peak_month: peak.key.first().cloned().ok_or_else(missing_key)?,
            low_month: low.key.first().cloned().ok_or_else(missing_key)?,
        })
    }

    /// Per-category totals ordered by revenue, with each category's share.
    pub fn category_share(&self) -> Result<Vec<CategoryShare>> {
        ensure_dimension(self.conn, Dimension::Category)?;
        let by_category = AggregateQuery::new(self.conn).by(Dimension::Category)?;
        let total = by_category.total();

        let shares = rank(&by_category, StatField::Sum, SortOrder::Descending, None)
            .into_iter()
            .filter_map(|r| {
                let stats = by_category.get(&r.key)?;
                let category = r.key.first()?.clone();
                let share_pct = if total == 0.0 {
                    0.0
                } else {
                    round1(stats.sum / total * 100.0)
                };
                Some(CategoryShare {
                    category,
                    total: stats.sum,
                    mean: stats.mean,
                    count: stats.count,
                    share_pct,
                })
            })
            .collect();
        Ok(shares)
    }

    /// Equal-width histogram of individual sales values.
    ///
    /// When every value is identical the single value is centred in a
    /// range one unit wide.
    pub fn sales_histogram(&self, bins: usize) -> Result<Vec<HistogramBin>> {
        ensure_non_empty(self.conn)?;
        if bins == 0 {
            return Err(SalesError::InvalidInput("histogram needs at least one bin".to_string()));
        }

        let sql = SqlBuilder::new(SALES_TABLE)
            .select(&["MIN(sales) AS lo", "MAX(sales) AS hi"])
            .build();
        let bounds = self
            .conn
            .execute(&sql, &[])?
            .into_iter()
            .next()
            .ok_or_else(|| SalesError::InvalidInput("dataset is empty".to_string()))?;
        let (mut lo, mut hi) = (f64_field(&bounds, "lo")?, f64_field(&bounds, "hi")?);
        if lo == hi {
            lo -= 0.5;
            hi += 0.5;
        }
        let width = (hi - lo) / bins as f64;

        // Values equal to the upper bound fall into the last bin
        let bin_expr = format!(
            "LEAST(CAST(FLOOR((sales - ({})) / {}) AS BIGINT), {})",
            lo,
            width,
            bins - 1
        );
        let bin_col = format!("{} AS bin", bin_expr);
        let sql = SqlBuilder::new(SALES_TABLE)
            .select(&[bin_col.as_str(), "COUNT(*) AS n"])
            .group_by(&[bin_expr.as_str()])
            .order_by(&["bin ASC"])
            .build();

        let mut histogram: Vec<HistogramBin> = (0..bins)
            .map(|i| HistogramBin {
                lower: lo + width * i as f64,
                upper: lo + width * (i + 1) as f64,
                count: 0,
            })
            .collect();
        for row in self.conn.execute(&sql, &[])? {
            let bin = row.get("bin").and_then(|v| v.as_u64()).unwrap_or(0) as usize;
            if let Some(slot) = histogram.get_mut(bin) {
                slot.count += u64_field(&row, "n")?;
            }
        }
        Ok(histogram)
    }
}

fn missing_key() -> SalesError {
    SalesError::InvalidInput("group key without parts".to_string())
}

fn mean_of(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, n) = values.fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    if n == 0 {
        None
    } else {
        Some(sum / n as f64)
    }
}
