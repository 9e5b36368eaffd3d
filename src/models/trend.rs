use serde::Serialize;

use super::aggregate::{GroupKey, KeyPart};
use super::record::Dimension;

// ---------------------------------------------------------------------------
// TrendPoint / TrendResult — Period totals with percent change
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendPoint {
    pub period: KeyPart,
    pub value: f64,
    /// `None` for the first period, or when the previous total is zero.
    pub pct_change: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendResult {
    pub points: Vec<TrendPoint>,
}

impl TrendResult {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn changes(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.iter().filter_map(|p| p.pct_change)
    }
}

// ---------------------------------------------------------------------------
// TrendState — Qualitative band of the recent trend
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendState {
    Positive,
    Stable,
    Declining,
}

// ---------------------------------------------------------------------------
// YoyGrowth — Growth between the two earliest years
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YoyEntry {
    pub key: GroupKey,
    pub year1_total: f64,
    pub year2_total: f64,
    /// Rounded to 1 decimal.
    pub growth_pct: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YoyGrowth {
    pub dimension: Dimension,
    pub year1: i32,
    pub year2: i32,
    /// Sorted by growth, fastest first.
    pub entries: Vec<YoyEntry>,
}

impl YoyGrowth {
    pub fn get(&self, key: &GroupKey) -> Option<&YoyEntry> {
        self.entries.iter().find(|e| &e.key == key)
    }

    pub fn fastest(&self, n: usize) -> &[YoyEntry] {
        &self.entries[..n.min(self.entries.len())]
    }

    /// Up to `n` declining entries, taken from the slowest end.
    pub fn declining(&self, n: usize) -> Vec<&YoyEntry> {
        let negative: Vec<&YoyEntry> = self.entries.iter().filter(|e| e.growth_pct < 0.0).collect();
        let skip = negative.len().saturating_sub(n);
        negative.into_iter().skip(skip).collect()
    }
}
