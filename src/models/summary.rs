use chrono::NaiveDate;
use serde::Serialize;

use super::aggregate::KeyPart;

// ---------------------------------------------------------------------------
// ExecutiveSummary — Headline metrics
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExecutiveSummary {
    pub total_sales: f64,
    pub first_date: NaiveDate,
    pub last_date: NaiveDate,
    /// Inclusive day span between the first and last date.
    pub total_days: i64,
    /// Mean of the per-date totals.
    pub avg_daily_revenue: f64,
    pub store_count: u64,
    pub item_count: u64,
}

// ---------------------------------------------------------------------------
// WeekdayPattern — Average sales by day of week
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeekdayPattern {
    /// Mean sales per weekday present in the data, Monday first.
    pub averages: Vec<(KeyPart, f64)>,
    pub best_day: KeyPart,
    pub worst_day: KeyPart,
    pub weekend_avg: Option<f64>,
    pub weekday_avg: Option<f64>,
    /// Percent by which weekends out-sell weekdays.
    pub weekend_lift: Option<f64>,
}

// ---------------------------------------------------------------------------
// Seasonality — Average sales by calendar month
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Seasonality {
    pub averages: Vec<(KeyPart, f64)>,
    pub peak_month: KeyPart,
    pub low_month: KeyPart,
}

// ---------------------------------------------------------------------------
// CategoryShare — Revenue share per category
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryShare {
    pub category: KeyPart,
    pub total: f64,
    pub mean: f64,
    pub count: u64,
    /// Share of total revenue in percent, rounded to 1 decimal.
    pub share_pct: f64,
}

// ---------------------------------------------------------------------------
// HistogramBin — Equal-width bucket of sales values
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistogramBin {
    pub lower: f64,
    pub upper: f64,
    pub count: u64,
}
