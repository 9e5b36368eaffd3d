//! Business insights report: metrics, figures and templated recommendations.
//!
//! Every section is computed fresh from the loaded dataset. Sections that need
//! a column the dataset lacks are left out of the report.

use tracing::debug;

use crate::analysis::{
    bottom_n, find_opportunities, pct_change, rank, recent_trend_average, top_n, AggregateQuery,
    GapQuery, SummaryQuery, TrendQuery,
};
use crate::charts;
use crate::config::{DimensionConfig, InsightConfig};
use crate::connection::Connection;
use crate::error::{Result, SalesError};
use crate::format::{format_currency, format_number};
use crate::models::{
    Dimension, Impact, Metric, RankedEntry, Recommendation, Report, Section, SortOrder,
    StatField, TextBlock, TrendState,
};

pub const NO_DATA_MESSAGE: &str = "No sales data available.";

/// Builds the insights [`Report`] for one dataset.
pub struct InsightBuilder<'a> {
    conn: &'a Connection,
    dims: DimensionConfig,
    config: &'a InsightConfig,
}

impl<'a> InsightBuilder<'a> {
    pub fn new(conn: &'a Connection, dims: DimensionConfig, config: &'a InsightConfig) -> Self {
        Self { conn, dims, config }
    }

    /// Assemble every section the dataset supports.
    ///
    /// An empty dataset yields a single section holding a "no data" warning.
    pub fn build(&self) -> Result<Report> {
        if self.conn.row_count() == 0 {
            let mut section = Section::new("Business Insights & Recommendations");
            section.text(TextBlock::warning(NO_DATA_MESSAGE));
            return Ok(Report {
                sections: vec![section],
            });
        }

        let candidates = [
            self.executive_summary().map(Some)?,
            optional(self.store_performance())?,
            optional(self.product_performance())?,
            optional(self.category_performance())?,
            self.weekday_insights().map(Some)?,
            self.seasonality_insights().map(Some)?,
            optional(self.store_category_gaps())?,
            optional(self.item_growth())?.flatten(),
            self.recommendations().map(Some)?,
        ];

        Ok(Report {
            sections: candidates.into_iter().flatten().collect(),
        })
    }

    pub fn executive_summary(&self) -> Result<Section> {
        let summary = SummaryQuery::new(self.conn).executive_summary()?;
        let trend = TrendQuery::new(self.conn).monthly_trend(Metric::Sales)?;

        let mut section = Section::new("Executive Summary");
        section.metric("Total Sales (all time)", format_currency(summary.total_sales, 0));
        section.metric("Avg Daily Revenue", format_currency(summary.avg_daily_revenue, 0));
        section.metric("Active Stores", format_number(summary.store_count));
        section.metric("Product Range", format!("{} items", format_number(summary.item_count)));

        let recent = recent_trend_average(&trend, self.config.trend_window);
        let block = match recent.map(|avg| (avg, self.config.trend_bands.classify(avg))) {
            Some((avg, TrendState::Positive)) => TextBlock::success(format!(
                "**Positive trend:** Sales have been growing ~{:.1}% month-over-month in \
                 recent months. Keep investing in what's working.",
                avg
            )),
            Some((avg, TrendState::Stable)) => TextBlock::info(format!(
                "**Stable growth:** Sales grew ~{:.1}% month-over-month recently. There's \
                 room to accelerate with targeted strategies.",
                avg
            )),
            Some((avg, TrendState::Declining)) => TextBlock::warning(format!(
                "**Declining trend:** Sales dropped ~{:.1}% month-over-month recently. \
                 Review the recommendations below to reverse this.",
                avg.abs()
            )),
            None => TextBlock::info(
                "**Not enough history:** At least two months of sales are needed to \
                 measure a month-over-month trend.",
            ),
        };
        section.text(block);
        section.chart(charts::monthly_revenue(&trend));
        Ok(section)
    }

    pub fn store_performance(&self) -> Result<Section> {
        let store_key = self.store_key()?;
        let stores = AggregateQuery::new(self.conn).by(store_key)?;
        let ranked = rank(&stores, StatField::Sum, SortOrder::Descending, None);

        let (Some(best), Some(worst)) = (ranked.first(), ranked.last()) else {
            return Err(SalesError::InvalidInput("no store has sales".to_string()));
        };
        let best_avg = stores.get(&best.key).map(|s| s.mean).unwrap_or_default();
        let worst_avg = stores.get(&worst.key).map(|s| s.mean).unwrap_or_default();

        let mut section = Section::new("Store Performance Ranking");
        section.text(TextBlock::success(format!(
            "**Top store:** {} ({} total, {} avg per transaction)",
            best.key,
            format_currency(best.value, 0),
            format_currency(best_avg, 1)
        )));
        section.text(TextBlock::error(format!(
            "**Lowest store:** {} ({} total, {} avg per transaction)",
            worst.key,
            format_currency(worst.value, 0),
            format_currency(worst_avg, 1)
        )));

        match pct_change(best.value, worst.value) {
            Ok(gap) => section.text(TextBlock::info(format!(
                "The gap between top and bottom stores is **{:.0}%**. Investigate what the \
                 top store does differently (staffing, layout, local marketing) and \
                 replicate those practices.",
                gap
            ))),
            Err(e) => {
                debug!(error = %e, "Store gap undefined");
            }
        }

        section.chart(charts::store_ranking(&ranked));
        Ok(section)
    }

    pub fn product_performance(&self) -> Result<Section> {
        let item_key = self.item_key()?;
        let items = AggregateQuery::new(self.conn).by(item_key)?;
        let ranked = rank(&items, StatField::Sum, SortOrder::Descending, None);

        let n = self.config.top_n;
        let best = &ranked[..n.min(ranked.len())];
        let lowest = &ranked[ranked.len().saturating_sub(n)..];

        let mut section = Section::new("Product Performance Ranking");
        section.text(TextBlock::success(format!(
            "**Best sellers:** {}. Ensure these are always well-stocked and prominently \
             displayed.",
            join_keys(best)
        )));
        section.text(TextBlock::error(format!(
            "**Lowest sellers:** {}. Consider promotions, bundling with popular items, or \
             reducing shelf space.",
            join_keys(lowest)
        )));
        section.chart(charts::top_products(&top_n(&items, self.config.chart_top_n)));
        Ok(section)
    }

    pub fn category_performance(&self) -> Result<Section> {
        let shares = SummaryQuery::new(self.conn).category_share()?;
        let (Some(top), Some(bottom)) = (shares.first(), shares.last()) else {
            return Err(SalesError::InvalidInput("no category has sales".to_string()));
        };

        let mut section = Section::new("Category Performance");
        section.chart(charts::category_pie(&shares, "Revenue Share by Category"));
        section.text(TextBlock::info(format!(
            "**{}** leads with **{:.1}%** of total revenue ({}).\n\n\
             **{}** contributes only **{:.1}%** ({}).\n\n\
             **Recommendation:** Cross-sell low-performing categories alongside top \
             performers. For example, bundle them in promotions or place them near \
             high-traffic product areas.",
            top.category,
            top.share_pct,
            format_currency(top.total, 0),
            bottom.category,
            bottom.share_pct,
            format_currency(bottom.total, 0)
        )));
        Ok(section)
    }

    pub fn weekday_insights(&self) -> Result<Section> {
        let pattern = SummaryQuery::new(self.conn).weekday_pattern()?;

        let mut section = Section::new("Day-of-Week Pattern");
        section.chart(charts::weekday_averages(&pattern));
        let text = match pattern.weekend_lift {
            Some(lift) if lift > 0.0 => format!(
                "**Weekends drive {:.1}% more sales** than weekdays. **{}** is the best day; \
                 **{}** is the weakest.\n\n**Action:** Schedule promotions and extra staffing \
                 on weekends. Consider mid-week flash sales on **{}** to boost traffic.",
                lift, pattern.best_day, pattern.worst_day, pattern.worst_day
            ),
            _ => format!(
                "Weekdays outperform weekends. **{}** is the best day.\n\n**Action:** Focus \
                 on weekday foot traffic and consider weekend specials.",
                pattern.best_day
            ),
        };
        section.text(TextBlock::info(text));
        Ok(section)
    }

    pub fn seasonality_insights(&self) -> Result<Section> {
        let season = SummaryQuery::new(self.conn).seasonality()?;

        let mut section = Section::new("Monthly Seasonality");
        section.chart(charts::seasonality(&season));
        section.text(TextBlock::info(format!(
            "**Peak season:** {}. Ensure sufficient inventory and staff.\n\n\
             **Low season:** {}. Run clearance sales or loyalty promotions to maintain \
             customer engagement.\n\n\
             **Action:** Plan inventory purchasing 1-2 months ahead of peak season. Use the \
             low season for store improvements and staff training.",
            season.peak_month, season.low_month
        )));
        Ok(section)
    }

    pub fn store_category_gaps(&self) -> Result<Section> {
        let store_key = self.store_key()?;
        let gaps = GapQuery::new(self.conn).compute_gaps(store_key, Dimension::Category, Metric::Sales)?;

        let mut section = Section::new("Underperforming Store-Category Combinations");
        section.chart(charts::gap_heatmap(&gaps));
        section.text(TextBlock::info(
            "**How to read this chart:** Positive cells indicate above-average performance; \
             negative cells are below average. Focus improvement efforts on the most negative \
             combinations. These represent the biggest revenue recovery opportunities.",
        ));

        let opportunities = find_opportunities(&gaps, self.config.opportunity_threshold);
        if !opportunities.is_empty() {
            let lines: Vec<String> = opportunities
                .iter()
                .take(self.config.max_opportunities)
                .map(|o| {
                    format!(
                        "- **{}** / **{}**: {:.0}% below average. Closing this gap could add \
                         ~{} per day.",
                        o.row,
                        o.column,
                        o.deviation.abs(),
                        format_currency(o.potential, 0)
                    )
                })
                .collect();
            section.text(TextBlock::warning(format!(
                "**Top Improvement Targets**\n\n{}",
                lines.join("\n")
            )));
        }
        Ok(section)
    }

    /// Year-over-year item growth; `None` when the data covers a single year.
    pub fn item_growth(&self) -> Result<Option<Section>> {
        let item_key = self.item_key()?;
        let Some(growth) = TrendQuery::new(self.conn).yoy_growth(item_key, Metric::Sales)? else {
            return Ok(None);
        };

        let mut section = Section::new("Year-over-Year Item Growth");
        let fastest: Vec<String> = growth
            .fastest(self.config.top_n)
            .iter()
            .map(|e| format!("- **{}**: {:+.1}% growth", e.key, e.growth_pct))
            .collect();
        section.text(TextBlock::info(format!(
            "**Fastest Growing Products ({} vs {})**\n\n{}\n\n*Invest more in these \
             products. Increase stock and expand their display area.*",
            growth.year2,
            growth.year1,
            fastest.join("\n")
        )));

        let declining = growth.declining(self.config.top_n);
        if declining.is_empty() {
            section.text(TextBlock::success("No declining products found!"));
        } else {
            let lines: Vec<String> = declining
                .iter()
                .map(|e| format!("- **{}**: {:.1}%", e.key, e.growth_pct))
                .collect();
            section.text(TextBlock::warning(format!(
                "**Declining Products**\n\n{}\n\n*Review pricing, placement, and relevance. \
                 Consider promotions or replacing with trending alternatives.*",
                lines.join("\n")
            )));
        }
        Ok(Some(section))
    }

    pub fn recommendations(&self) -> Result<Section> {
        let summary = SummaryQuery::new(self.conn);
        let aggregates = AggregateQuery::new(self.conn);
        let pattern = summary.weekday_pattern()?;
        let season = summary.seasonality()?;

        let mut section = Section::new("Actionable Recommendations");
        section.text(TextBlock::info(
            "Based on the analysis above, here are the **top strategies** to boost revenue:",
        ));

        if let Some(store_key) = self.dims.store_key {
            let stores = aggregates.by(store_key)?;
            if let (Some(best), Some(worst)) = (stores.max_by(StatField::Sum), stores.min_by(StatField::Sum)) {
                section.recommendation(Recommendation {
                    title: "Replicate Top Store Practices".to_string(),
                    detail: format!(
                        "**{}** significantly outperforms **{}**. Conduct a store audit: \
                         compare staffing levels, product placement, local marketing, and \
                         customer service quality. Transfer proven practices from top to \
                         bottom performers.",
                        best.key, worst.key
                    ),
                    impact: Impact::High,
                });
            }
        }

        section.recommendation(Recommendation {
            title: "Optimize Weekly Promotions".to_string(),
            detail: format!(
                "**{}** has the lowest sales. Launch targeted mid-week promotions (e.g., \
                 '{} Deals') with 10-15% discounts on slow-moving items to drive foot traffic \
                 on weak days.",
                pattern.worst_day, pattern.worst_day
            ),
            impact: Impact::Medium,
        });

        section.recommendation(Recommendation {
            title: "Seasonal Inventory Planning".to_string(),
            detail: format!(
                "Sales peak in **{}** and dip in **{}**. Stock up 1-2 months before {}. \
                 During {}, run loyalty programs and clearance sales to maintain cash flow.",
                season.peak_month, season.low_month, season.peak_month, season.low_month
            ),
            impact: Impact::High,
        });

        if let Some(item_key) = self.dims.item_key {
            let items = aggregates.by(item_key)?;
            let top_items = top_n(&items, self.config.top_n);
            let bottom_items = bottom_n(&items, self.config.top_n);

            section.recommendation(Recommendation {
                title: "Product Bundling Strategy".to_string(),
                detail: format!(
                    "Bundle low sellers ({}) with top sellers ({}). Offer 'Buy X, get Y at \
                     20% off' to move slow inventory while boosting basket size.",
                    join_keys(&bottom_items[..bottom_items.len().min(3)]),
                    join_keys(&top_items[..top_items.len().min(3)])
                ),
                impact: Impact::Medium,
            });
            section.recommendation(Recommendation {
                title: "Focus on High-Value Products".to_string(),
                detail: format!(
                    "Top revenue drivers are: **{}**. Ensure these are always in stock, \
                     prominently displayed, and featured in marketing materials.",
                    join_keys(&top_items)
                ),
                impact: Impact::High,
            });
        }

        if self.dims.has_category {
            let categories = aggregates.by(Dimension::Category)?;
            if let (Some(top), Some(bottom)) =
                (categories.max_by(StatField::Sum), categories.min_by(StatField::Sum))
            {
                section.recommendation(Recommendation {
                    title: "Cross-Category Promotion".to_string(),
                    detail: format!(
                        "**{}** underperforms compared to **{}**. Place {} products near {} \
                         displays. Run cross-category promotions to increase exposure.",
                        bottom.key, top.key, bottom.key, top.key
                    ),
                    impact: Impact::Medium,
                });
            }
        }

        Ok(section)
    }

    fn store_key(&self) -> Result<Dimension> {
        self.dims
            .store_key
            .ok_or_else(|| SalesError::MissingOptionalDimension("store_name/store_id".to_string()))
    }

    fn item_key(&self) -> Result<Dimension> {
        self.dims
            .item_key
            .ok_or_else(|| SalesError::MissingOptionalDimension("item_name/item_id".to_string()))
    }
}

/// Turn a missing optional column into an omitted section.
fn optional<T>(result: Result<T>) -> Result<Option<T>> {
    match result {
        Ok(v) => Ok(Some(v)),
        Err(SalesError::MissingOptionalDimension(column)) => {
            debug!(column, "Omitting section; column absent");
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

fn join_keys(entries: &[RankedEntry]) -> String {
    entries
        .iter()
        .map(|e| e.key.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
