//! Shared test fixtures for the sales insights integration tests.
//!
//! `sample_records()` is a small two-year dataset with two stores, three
//! items and two categories. Its aggregates are easy to work out by hand:
//!
//! | date       | store    | item   | category | sales |
//! |------------|----------|--------|----------|-------|
//! | 2023-01-02 | Downtown | Milk   | Dairy    | 100   |
//! | 2023-01-02 | Airport  | Milk   | Dairy    |  50   |
//! | 2023-01-07 | Downtown | Bread  | Bakery   |  80   |
//! | 2023-01-07 | Airport  | Cheese | Dairy    |  40   |
//! | 2023-02-06 | Downtown | Cheese | Dairy    |  60   |
//! | 2023-02-06 | Airport  | Bread  | Bakery   |  20   |
//! | 2024-01-01 | Downtown | Milk   | Dairy    | 150   |
//! | 2024-01-01 | Airport  | Bread  | Bakery   |  30   |
//! | 2024-02-03 | Downtown | Cheese | Dairy    |  90   |
//! | 2024-02-03 | Airport  | Milk   | Dairy    |  30   |
//!
//! Mondays: 2023-01-02, 2023-02-06, 2024-01-01. Saturdays: 2023-01-07, 2024-02-03.

#![allow(dead_code)]

use chrono::NaiveDate;
use sales_insights::{SalesAnalyzer, SalesRecord};

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn row(d: NaiveDate, store: &str, item: &str, category: &str, sales: f64) -> SalesRecord {
    let store_id = if store == "Downtown" { "1" } else { "2" };
    let item_id = match item {
        "Milk" => "M1",
        "Cheese" => "C1",
        _ => "B1",
    };
    SalesRecord::new(d, sales)
        .store(store_id, store)
        .item(item_id, item)
        .category(category)
}

pub fn sample_records() -> Vec<SalesRecord> {
    vec![
        row(date(2023, 1, 2), "Downtown", "Milk", "Dairy", 100.0),
        row(date(2023, 1, 2), "Airport", "Milk", "Dairy", 50.0),
        row(date(2023, 1, 7), "Downtown", "Bread", "Bakery", 80.0),
        row(date(2023, 1, 7), "Airport", "Cheese", "Dairy", 40.0),
        row(date(2023, 2, 6), "Downtown", "Cheese", "Dairy", 60.0),
        row(date(2023, 2, 6), "Airport", "Bread", "Bakery", 20.0),
        row(date(2024, 1, 1), "Downtown", "Milk", "Dairy", 150.0),
        row(date(2024, 1, 1), "Airport", "Bread", "Bakery", 30.0),
        row(date(2024, 2, 3), "Downtown", "Cheese", "Dairy", 90.0),
        row(date(2024, 2, 3), "Airport", "Milk", "Dairy", 30.0),
    ]
}

pub fn sample_analyzer() -> SalesAnalyzer {
    SalesAnalyzer::from_records(sample_records()).unwrap()
}

/// Only the required columns: date and sales.
pub fn minimal_analyzer() -> SalesAnalyzer {
    SalesAnalyzer::from_records(vec![
        SalesRecord::new(date(2023, 3, 6), 10.0),
        SalesRecord::new(date(2023, 3, 11), 30.0),
        SalesRecord::new(date(2023, 3, 13), 20.0),
    ])
    .unwrap()
}

pub fn empty_analyzer() -> SalesAnalyzer {
    SalesAnalyzer::from_records(Vec::new()).unwrap()
}

pub fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-6,
        "expected {expected}, got {actual}"
    );
}
