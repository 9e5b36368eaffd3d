//! Month-over-month and year-over-year trends.

use tracing::debug;

use super::aggregate::AggregateQuery;
use super::round1;
use crate::connection::Connection;
use crate::error::{Result, SalesError};
use crate::models::{
    Dimension, GroupKey, KeyPart, Metric, TrendPoint, TrendResult, YoyEntry, YoyGrowth,
};

// ---------------------------------------------------------------------------
// TrendQuery
// ---------------------------------------------------------------------------

/// Period-over-period change computations.
pub struct TrendQuery<'a> {
    conn: &'a Connection,
}

impl<'a> TrendQuery<'a> {
    /// Create a new `TrendQuery` bound to the given connection.
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Totals per year-month with the percent change from the previous period.
    ///
    /// Only months that have data appear. The first period, and any period
    /// following a zero total, has no change.
    pub fn monthly_trend(&self, metric: Metric) -> Result<TrendResult> {
        let monthly = AggregateQuery::new(self.conn).aggregate(&[Dimension::YearMonth], metric)?;

        let mut points: Vec<TrendPoint> = Vec::with_capacity(monthly.len());
        for entry in &monthly {
            let Some(period) = entry.key.first() else {
                continue;
            };
            let pct = match points.last() {
                None => None,
                Some(prev) => match pct_change(entry.stats.sum, prev.value) {
                    Ok(p) => Some(p),
                    Err(e) => {
                        debug!(period = %period, error = %e, "No month-over-month change");
                        None
                    }
                },
            };
            points.push(TrendPoint {
                period: period.clone(),
                value: entry.stats.sum,
                pct_change: pct,
            });
        }

        Ok(TrendResult { points })
    }

    /// Growth of each `group_by` key between the two earliest years.
    ///
    /// Keys present in only one of the two years, or with a zero total in
    /// the first year, are excluded. Returns `None` when the data spans fewer
    /// than two years.
    pub fn yoy_growth(&self, group_by: Dimension, metric: Metric) -> Result<Option<YoyGrowth>> {
        if matches!(group_by, Dimension::Year) {
            return Err(SalesError::InvalidInput(
                "year-over-year growth cannot be grouped by year".to_string(),
            ));
        }

        let table = AggregateQuery::new(self.conn).aggregate(&[Dimension::Year, group_by], metric)?;

        let mut years: Vec<i32> = table
            .keys()
            .filter_map(|k| match k.first() {
                Some(KeyPart::Year(y)) => Some(*y),
                _ => None,
            })
            .collect();
        years.dedup();
        let (year1, year2) = match years.as_slice() {
            [y1, y2, ..] => (*y1, *y2),
            _ => return Ok(None),
        };

        let mut totals: Vec<(GroupKey, Option<f64>, Option<f64>)> = Vec::new();
        for entry in &table {
            let (Some(KeyPart::Year(y)), Some(part)) = (entry.key.parts().first(), entry.key.parts().get(1))
            else {
                continue;
            };
            let slot = if *y == year1 {
                0
            } else if *y == year2 {
                1
            } else {
                continue;
            };

            let key = GroupKey::single(part.clone());
            let pos = match totals.iter().position(|(k, _, _)| k == &key) {
                Some(pos) => pos,
                None => {
                    totals.push((key, None, None));
                    totals.len() - 1
                }
            };
            if slot == 0 {
                totals[pos].1 = Some(entry.stats.sum);
            } else {
                totals[pos].2 = Some(entry.stats.sum);
            }
        }

        let mut entries: Vec<YoyEntry> = Vec::new();
        for (key, t1, t2) in totals {
            let (Some(t1), Some(t2)) = (t1, t2) else {
                continue;
            };
            match pct_change(t2, t1) {
                Ok(growth) => entries.push(YoyEntry {
                    key,
                    year1_total: t1,
                    year2_total: t2,
                    growth_pct: round1(growth),
                }),
                Err(e) => debug!(key = %key, error = %e, "Skipping year-over-year growth"),
            }
        }
        entries.sort_by(|a, b| b.growth_pct.total_cmp(&a.growth_pct));

        Ok(Some(YoyGrowth {
            dimension: group_by,
            year1,
            year2,
            entries,
        }))
    }
}

/// Percent change from `previous` to `current`.
///
/// # Errors
///
/// `DivisionUndefined` when `previous` is zero.
pub fn pct_change(current: f64, previous: f64) -> Result<f64> {
    if previous == 0.0 {
        return Err(SalesError::DivisionUndefined(format!(
            "change from a zero base to {}",
            current
        )));
    }
    Ok((current - previous) / previous * 100.0)
}

/// Mean of the last `window` defined percent changes.
///
/// Returns `None` when the trend has no defined change or `window` is zero.
pub fn recent_trend_average(trend: &TrendResult, window: usize) -> Option<f64> {
    let changes: Vec<f64> = trend.changes().collect();
    let recent = &changes[changes.len().saturating_sub(window)..];
    if recent.is_empty() {
        return None;
    }
    Some(recent.iter().sum::<f64>() / recent.len() as f64)
}
