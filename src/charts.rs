//! Figure builders.
//!
//! Each function turns an analysis result into a finished [`ChartSpec`]. A
//! figure is created, filled and returned in one call; renderers only draw
//! what they are handed.

use crate::config::{COLOR_BAD, COLOR_GOOD, COLOR_NEUTRAL, COLOR_PRIMARY, WEEKDAY_NAMES};
use crate::models::{
    AggregateResult, CategoryShare, ChartKind, ChartSpec, GapResult, HistogramBin, RankedEntry,
    Seasonality, Series, TrendResult, WeekdayPattern,
};

/// Monthly revenue totals as bars.
pub fn monthly_revenue(trend: &TrendResult) -> ChartSpec {
    ChartSpec::new(ChartKind::Bar, "Monthly Revenue Trend")
        .y_label("Total Sales ($)")
        .labels(trend.points.iter().map(|p| p.period.to_string()).collect())
        .series(Series::new("Total Sales", trend.points.iter().map(|p| p.value)))
        .colors(vec![COLOR_PRIMARY.to_string()])
}

/// Every store by revenue, best first; the top three are green and the
/// bottom three red.
pub fn store_ranking(ranked: &[RankedEntry]) -> ChartSpec {
    let n = ranked.len();
    let colors = (0..n)
        .map(|i| {
            let color = if i < 3 {
                COLOR_GOOD
            } else if i + 3 >= n {
                COLOR_BAD
            } else {
                COLOR_NEUTRAL
            };
            color.to_string()
        })
        .collect();

    ChartSpec::new(ChartKind::HorizontalBar, "Store Revenue Ranking")
        .x_label("Total Sales ($)")
        .labels(ranked.iter().map(|r| r.key.to_string()).collect())
        .series(Series::new("Total Sales", ranked.iter().map(|r| r.value)))
        .colors(colors)
}

pub fn top_products(ranked: &[RankedEntry]) -> ChartSpec {
    ChartSpec::new(
        ChartKind::HorizontalBar,
        format!("Top {} Products by Revenue", ranked.len()),
    )
    .x_label("Total Sales ($)")
    .labels(ranked.iter().map(|r| r.key.to_string()).collect())
    .series(Series::new("Total Sales", ranked.iter().map(|r| r.value)))
    .colors(vec![COLOR_GOOD.to_string()])
}

pub fn category_pie(shares: &[CategoryShare], title: &str) -> ChartSpec {
    ChartSpec::new(ChartKind::Pie, title)
        .labels(shares.iter().map(|s| s.category.to_string()).collect())
        .series(Series::new("Total Sales", shares.iter().map(|s| s.total)))
}

/// Average sales for all seven weekdays, Monday first; weekends are red.
///
/// Weekdays without data have no value.
pub fn weekday_averages(pattern: &WeekdayPattern) -> ChartSpec {
    let values = WEEKDAY_NAMES
        .iter()
        .map(|name| {
            pattern
                .averages
                .iter()
                .find(|(k, _)| k.to_string() == *name)
                .map(|(_, v)| *v)
        })
        .collect();
    let colors = (0..WEEKDAY_NAMES.len())
        .map(|i| {
            let color = if i >= 5 { COLOR_BAD } else { COLOR_NEUTRAL };
            color.to_string()
        })
        .collect();

    ChartSpec::new(ChartKind::Bar, "Average Sales by Day of Week")
        .y_label("Avg Sales ($)")
        .labels(WEEKDAY_NAMES.iter().map(|s| s.to_string()).collect())
        .series(Series::sparse("Avg Sales", values))
        .colors(colors)
}

pub fn seasonality(season: &Seasonality) -> ChartSpec {
    ChartSpec::new(ChartKind::Line, "Monthly Sales Seasonality")
        .y_label("Avg Sales ($)")
        .labels(season.averages.iter().map(|(k, _)| k.to_string()).collect())
        .series(Series::new("Avg Sales", season.averages.iter().map(|(_, v)| *v)))
        .colors(vec![COLOR_PRIMARY.to_string()])
}

/// Deviation heatmap: one series per row, one label per column.
pub fn gap_heatmap(gaps: &GapResult) -> ChartSpec {
    let mut chart = ChartSpec::new(
        ChartKind::Heatmap,
        format!(
            "{} Performance vs {} Average (%)",
            gaps.row_dimension.label(),
            gaps.column_dimension.label()
        ),
    )
    .labels(gaps.columns.iter().map(|c| c.column.to_string()).collect());

    for (row, values) in gaps.rows.iter().zip(gaps.matrix()) {
        chart = chart.series(Series::sparse(row.to_string(), values));
    }
    chart
}

/// Daily totals as a filled line, titled for the selected store.
///
/// `store_label` of `None` (or "All Stores") titles the chart for every store.
pub fn daily_sales(daily: &AggregateResult, store_label: Option<&str>) -> ChartSpec {
    let title = match store_label {
        Some(label) if label != "All Stores" => format!("Daily Sales - {}", label),
        _ => "Daily Sales - All Stores".to_string(),
    };
    ChartSpec::new(ChartKind::Area, title)
        .x_label("Date")
        .y_label("Total Sales")
        .labels(daily.keys().map(|k| k.to_string()).collect())
        .series(Series::new("Total Sales", daily.iter().map(|e| e.stats.sum)))
        .colors(vec![COLOR_PRIMARY.to_string()])
}

pub fn sales_distribution(bins: &[HistogramBin]) -> ChartSpec {
    ChartSpec::new(ChartKind::Histogram, "Sales Distribution")
        .x_label("Sales")
        .y_label("Frequency")
        .labels(
            bins.iter()
                .map(|b| format!("{:.2}-{:.2}", b.lower, b.upper))
                .collect(),
        )
        .series(Series::new("Frequency", bins.iter().map(|b| b.count as f64)))
        .colors(vec![COLOR_PRIMARY.to_string()])
}

/// The highest-grossing stores, best first.
pub fn store_comparison(ranked: &[RankedEntry]) -> ChartSpec {
    ChartSpec::new(
        ChartKind::HorizontalBar,
        format!("Top {} Stores by Sales", ranked.len()),
    )
    .x_label("Total Sales")
    .labels(ranked.iter().map(|r| r.key.to_string()).collect())
    .series(Series::new("Total Sales", ranked.iter().map(|r| r.value)))
    .colors(vec![COLOR_PRIMARY.to_string()])
}
