use serde::{Deserialize, Serialize};

use crate::models::{Dimension, Schema, TrendState};

pub const SALES_TABLE: &str = "sales";

pub const DEFAULT_TOP_N: usize = 5;
pub const DEFAULT_CHART_TOP_N: usize = 10;
pub const DEFAULT_OPPORTUNITY_THRESHOLD: f64 = -10.0;
pub const DEFAULT_MAX_OPPORTUNITIES: usize = 5;
pub const DEFAULT_TREND_WINDOW: usize = 3;
pub const DEFAULT_HISTOGRAM_BINS: usize = 50;

pub const WEEKDAY_NAMES: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

pub const MONTH_ABBREVIATIONS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

pub const COLOR_PRIMARY: &str = "steelblue";
pub const COLOR_GOOD: &str = "#2ecc71";
pub const COLOR_BAD: &str = "#e74c3c";
pub const COLOR_NEUTRAL: &str = "#3498db";

// ---------------------------------------------------------------------------
// TrendBands
// ---------------------------------------------------------------------------

/// Thresholds (in percent month-over-month) separating the trend bands.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrendBands {
    /// Averages strictly above this are `Positive`.
    pub positive_above: f64,
    /// Averages strictly above this (and not positive) are `Stable`.
    pub stable_above: f64,
}

impl Default for TrendBands {
    fn default() -> Self {
        Self {
            positive_above: 5.0,
            stable_above: 0.0,
        }
    }
}

impl TrendBands {
    pub fn classify(&self, avg_change: f64) -> TrendState {
        if avg_change > self.positive_above {
            TrendState::Positive
        } else if avg_change > self.stable_above {
            TrendState::Stable
        } else {
            TrendState::Declining
        }
    }
}

// ---------------------------------------------------------------------------
// InsightConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InsightConfig {
    pub top_n: usize,
    pub chart_top_n: usize,
    pub opportunity_threshold: f64,
    pub max_opportunities: usize,
    pub trend_window: usize,
    pub histogram_bins: usize,
    pub trend_bands: TrendBands,
}

impl Default for InsightConfig {
    fn default() -> Self {
        Self {
            top_n: DEFAULT_TOP_N,
            chart_top_n: DEFAULT_CHART_TOP_N,
            opportunity_threshold: DEFAULT_OPPORTUNITY_THRESHOLD,
            max_opportunities: DEFAULT_MAX_OPPORTUNITIES,
            trend_window: DEFAULT_TREND_WINDOW,
            histogram_bins: DEFAULT_HISTOGRAM_BINS,
            trend_bands: TrendBands::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// DimensionConfig
// ---------------------------------------------------------------------------

/// Which columns identify stores and items, resolved once per dataset.
///
/// Names are preferred over ids; `None` means neither column is present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DimensionConfig {
    pub store_key: Option<Dimension>,
    pub item_key: Option<Dimension>,
    pub has_category: bool,
}

impl DimensionConfig {
    pub fn resolve(schema: &Schema) -> Self {
        let store_key = if schema.store_name {
            Some(Dimension::StoreName)
        } else if schema.store_id {
            Some(Dimension::StoreId)
        } else {
            None
        };
        let item_key = if schema.item_name {
            Some(Dimension::ItemName)
        } else if schema.item_id {
            Some(Dimension::ItemId)
        } else {
            None
        };
        Self {
            store_key,
            item_key,
            has_category: schema.category,
        }
    }
}
