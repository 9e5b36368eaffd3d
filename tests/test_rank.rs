//! Ranking tests: ordering, limits and tie stability.

mod common;

use common::{assert_close, date};
use sales_insights::{
    bottom_n, rank, top_n, Dimension, SalesAnalyzer, SalesRecord, SortOrder, StatField,
};

#[test]
fn top_n_orders_by_sum_descending() {
    let analyzer = common::sample_analyzer();
    let items = analyzer.aggregates().by(Dimension::ItemName).unwrap();

    let top = top_n(&items, 2);
    assert_eq!(top.len(), 2);
    assert_eq!(top[0].key.to_string(), "Milk");
    assert_close(top[0].value, 330.0);
    assert_eq!(top[1].key.to_string(), "Cheese");
    assert_close(top[1].value, 190.0);
}

#[test]
fn bottom_n_orders_smallest_first() {
    let analyzer = common::sample_analyzer();
    let items = analyzer.aggregates().by(Dimension::ItemName).unwrap();

    let bottom = bottom_n(&items, 5);
    let labels: Vec<String> = bottom.iter().map(|r| r.key.to_string()).collect();
    assert_eq!(labels, vec!["Bread", "Cheese", "Milk"]);
}

#[test]
fn limit_larger_than_groups_returns_all() {
    let analyzer = common::sample_analyzer();
    let stores = analyzer.aggregates().by(Dimension::StoreName).unwrap();
    assert_eq!(top_n(&stores, 10).len(), 2);
    assert_eq!(rank(&stores, StatField::Sum, SortOrder::Descending, None).len(), 2);
}

#[test]
fn rank_by_mean_and_count() {
    let analyzer = common::sample_analyzer();
    let items = analyzer.aggregates().by(Dimension::ItemName).unwrap();

    let by_count = rank(&items, StatField::Count, SortOrder::Descending, Some(1));
    assert_eq!(by_count[0].key.to_string(), "Milk");
    assert_close(by_count[0].value, 4.0);

    // Cheese averages 63.33, Bread 43.33
    let by_mean = rank(&items, StatField::Mean, SortOrder::Ascending, None);
    assert_eq!(by_mean[0].key.to_string(), "Bread");
}

#[test]
fn ties_keep_key_order() {
    let d = date(2023, 5, 1);
    let analyzer = SalesAnalyzer::from_records(vec![
        SalesRecord::new(d, 10.0).store_id("C"),
        SalesRecord::new(d, 10.0).store_id("A"),
        SalesRecord::new(d, 10.0).store_id("B"),
        SalesRecord::new(d, 5.0).store_id("D"),
    ])
    .unwrap();
    let stores = analyzer.aggregates().by(Dimension::StoreId).unwrap();

    let top: Vec<String> = top_n(&stores, 4).iter().map(|r| r.key.to_string()).collect();
    assert_eq!(top, vec!["A", "B", "C", "D"]);

    let bottom: Vec<String> = bottom_n(&stores, 4).iter().map(|r| r.key.to_string()).collect();
    assert_eq!(bottom, vec!["D", "A", "B", "C"]);
}

#[test]
fn zero_limit_is_empty() {
    let analyzer = common::sample_analyzer();
    let stores = analyzer.aggregates().by(Dimension::StoreName).unwrap();
    assert!(top_n(&stores, 0).is_empty());
}

#[test]
fn best_of_two_stores() {
    let d = date(2023, 5, 1);
    let analyzer = SalesAnalyzer::from_records(vec![
        SalesRecord::new(d, 100.0).store_id("A"),
        SalesRecord::new(d, 50.0).store_id("B"),
    ])
    .unwrap();
    let stores = analyzer.aggregates().by(Dimension::StoreId).unwrap();

    let best = rank(&stores, StatField::Sum, SortOrder::Descending, Some(1));
    assert_eq!(best.len(), 1);
    assert_eq!(best[0].key.to_string(), "A");
    assert_close(best[0].value, 100.0);
}
