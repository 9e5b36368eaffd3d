//! Ranking of aggregate results.

use crate::models::{AggregateResult, RankedEntry, SortOrder, StatField};

/// Order the groups of `result` by `by` and keep at most `limit` of them.
///
/// The sort is stable, so groups with equal values keep the aggregator's
/// key order.
pub fn rank(
    result: &AggregateResult,
    by: StatField,
    order: SortOrder,
    limit: Option<usize>,
) -> Vec<RankedEntry> {
    let mut ranked: Vec<RankedEntry> = result
        .iter()
        .map(|e| RankedEntry {
            key: e.key.clone(),
            value: e.stats.get(by),
        })
        .collect();

    match order {
        SortOrder::Descending => ranked.sort_by(|a, b| b.value.total_cmp(&a.value)),
        SortOrder::Ascending => ranked.sort_by(|a, b| a.value.total_cmp(&b.value)),
    }

    if let Some(n) = limit {
        ranked.truncate(n);
    }
    ranked
}

/// The `n` groups with the largest sums.
pub fn top_n(result: &AggregateResult, n: usize) -> Vec<RankedEntry> {
    rank(result, StatField::Sum, SortOrder::Descending, Some(n))
}

/// The `n` groups with the smallest sums, smallest first.
pub fn bottom_n(result: &AggregateResult, n: usize) -> Vec<RankedEntry> {
    rank(result, StatField::Sum, SortOrder::Ascending, Some(n))
}
