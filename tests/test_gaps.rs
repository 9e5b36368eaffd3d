//! Gap analysis tests: deviations, column means, skipped columns and
//! improvement opportunities.

mod common;

use common::{assert_close, date};
use sales_insights::{
    deviation, find_opportunities, Dimension, KeyPart, Metric, SalesAnalyzer, SalesError,
    SalesRecord,
};

fn text(s: &str) -> KeyPart {
    KeyPart::Text(s.to_string())
}

// ---------------------------------------------------------------------------
// compute_gaps
// ---------------------------------------------------------------------------

#[test]
fn store_by_category_deviations() {
    let analyzer = common::sample_analyzer();
    let gaps = analyzer
        .gaps()
        .compute_gaps(Dimension::StoreName, Dimension::Category, Metric::Sales)
        .unwrap();

    assert_eq!(gaps.rows, vec![text("Airport"), text("Downtown")]);
    let columns: Vec<KeyPart> = gaps.columns.iter().map(|c| c.column.clone()).collect();
    assert_eq!(columns, vec![text("Bakery"), text("Dairy")]);

    // Bakery cell means: Downtown 80, Airport 25 -> column mean 52.5
    assert_close(gaps.column_mean(&text("Bakery")).unwrap(), 52.5);
    assert_close(gaps.column_mean(&text("Dairy")).unwrap(), 70.0);

    assert_eq!(gaps.deviation(&text("Downtown"), &text("Bakery")), Some(52.4));
    assert_eq!(gaps.deviation(&text("Airport"), &text("Bakery")), Some(-52.4));
    assert_eq!(gaps.deviation(&text("Downtown"), &text("Dairy")), Some(42.9));
    assert_eq!(gaps.deviation(&text("Airport"), &text("Dairy")), Some(-42.9));
    assert!(gaps.skipped_columns.is_empty());
}

#[test]
fn cells_are_row_major() {
    let analyzer = common::sample_analyzer();
    let gaps = analyzer
        .gaps()
        .compute_gaps(Dimension::StoreName, Dimension::Category, Metric::Sales)
        .unwrap();

    let order: Vec<(String, String)> = gaps
        .cells
        .iter()
        .map(|c| (c.row.to_string(), c.column.to_string()))
        .collect();
    assert_eq!(
        order,
        vec![
            ("Airport".to_string(), "Bakery".to_string()),
            ("Airport".to_string(), "Dairy".to_string()),
            ("Downtown".to_string(), "Bakery".to_string()),
            ("Downtown".to_string(), "Dairy".to_string()),
        ]
    );
    assert_eq!(
        gaps.matrix(),
        vec![vec![Some(-52.4), Some(-42.9)], vec![Some(52.4), Some(42.9)]]
    );
}

#[test]
fn missing_combination_is_not_counted_as_zero() {
    let d = date(2023, 4, 3);
    let analyzer = SalesAnalyzer::from_records(vec![
        SalesRecord::new(d, 100.0).store_id("A").category("Toys"),
        SalesRecord::new(d, 50.0).store_id("B").category("Toys"),
        SalesRecord::new(d, 30.0).store_id("A").category("Books"),
    ])
    .unwrap();

    let gaps = analyzer
        .gaps()
        .compute_gaps(Dimension::StoreId, Dimension::Category, Metric::Sales)
        .unwrap();

    // Books only exists at store A, so its mean is A's value
    assert_close(gaps.column_mean(&text("Books")).unwrap(), 30.0);
    assert_eq!(gaps.deviation(&text("A"), &text("Books")), Some(0.0));
    assert_eq!(gaps.deviation(&text("B"), &text("Books")), None);
    assert_eq!(gaps.matrix()[1], vec![None, Some(-33.3)]);
}

#[test]
fn zero_mean_column_is_skipped() {
    let d = date(2023, 4, 3);
    let analyzer = SalesAnalyzer::from_records(vec![
        SalesRecord::new(d, 100.0).store_id("A").category("Toys"),
        SalesRecord::new(d, 60.0).store_id("B").category("Toys"),
        SalesRecord::new(d, 0.0).store_id("A").category("Samples"),
        SalesRecord::new(d, 0.0).store_id("B").category("Samples"),
    ])
    .unwrap();

    let gaps = analyzer
        .gaps()
        .compute_gaps(Dimension::StoreId, Dimension::Category, Metric::Sales)
        .unwrap();

    assert_eq!(gaps.skipped_columns, vec![text("Samples")]);
    assert_eq!(gaps.columns.len(), 1);
    assert!(gaps.cells.iter().all(|c| c.column == text("Toys")));
    assert_eq!(gaps.deviation(&text("A"), &text("Toys")), Some(25.0));
}

#[test]
fn same_dimension_twice_is_invalid() {
    let analyzer = common::sample_analyzer();
    assert!(matches!(
        analyzer
            .gaps()
            .compute_gaps(Dimension::Category, Dimension::Category, Metric::Sales),
        Err(SalesError::InvalidInput(_))
    ));
}

#[test]
fn gaps_need_the_column_dimension() {
    let analyzer = SalesAnalyzer::from_records(vec![
        SalesRecord::new(date(2023, 4, 3), 10.0).store_id("A"),
    ])
    .unwrap();
    assert!(matches!(
        analyzer
            .gaps()
            .compute_gaps(Dimension::StoreId, Dimension::Category, Metric::Sales),
        Err(SalesError::MissingOptionalDimension(_))
    ));
}

// ---------------------------------------------------------------------------
// deviation
// ---------------------------------------------------------------------------

#[test]
fn deviation_is_rounded_percent() {
    assert_eq!(deviation(80.0, 52.5).unwrap(), 52.4);
    assert_eq!(deviation(50.0, 100.0).unwrap(), -50.0);
    assert_eq!(deviation(100.0, 100.0).unwrap(), 0.0);
}

#[test]
fn deviation_from_zero_mean_is_undefined() {
    assert!(matches!(
        deviation(10.0, 0.0),
        Err(SalesError::DivisionUndefined(_))
    ));
}

// ---------------------------------------------------------------------------
// find_opportunities
// ---------------------------------------------------------------------------

#[test]
fn opportunities_below_threshold_worst_first() {
    let analyzer = common::sample_analyzer();
    let gaps = analyzer
        .gaps()
        .compute_gaps(Dimension::StoreName, Dimension::Category, Metric::Sales)
        .unwrap();

    let found = find_opportunities(&gaps, -10.0);
    assert_eq!(found.len(), 2);

    assert_eq!(found[0].row, text("Airport"));
    assert_eq!(found[0].column, text("Bakery"));
    assert_eq!(found[0].deviation, -52.4);
    assert_close(found[0].potential, 52.4 * 52.5 / 100.0);

    assert_eq!(found[1].column, text("Dairy"));
    assert_close(found[1].potential, 42.9 * 70.0 / 100.0);
}

#[test]
fn threshold_is_strict() {
    let analyzer = common::sample_analyzer();
    let gaps = analyzer
        .gaps()
        .compute_gaps(Dimension::StoreName, Dimension::Category, Metric::Sales)
        .unwrap();

    assert_eq!(find_opportunities(&gaps, -42.9).len(), 1);
    assert!(find_opportunities(&gaps, -60.0).is_empty());
}

#[test]
fn identical_values_give_zero_deviations() {
    let d = date(2023, 4, 3);
    let analyzer = SalesAnalyzer::from_records(vec![
        SalesRecord::new(d, 40.0).store_id("A").category("Toys"),
        SalesRecord::new(d, 40.0).store_id("B").category("Toys"),
        SalesRecord::new(d, 40.0).store_id("C").category("Toys"),
    ])
    .unwrap();

    let gaps = analyzer
        .gaps()
        .compute_gaps(Dimension::StoreId, Dimension::Category, Metric::Sales)
        .unwrap();
    assert_eq!(gaps.cells.len(), 3);
    assert!(gaps.cells.iter().all(|c| c.deviation == 0.0));
}

#[test]
fn single_store_single_category_is_zero() {
    let analyzer = SalesAnalyzer::from_records(vec![
        SalesRecord::new(date(2023, 4, 3), 75.0).store_id("A").category("Toys"),
    ])
    .unwrap();

    let gaps = analyzer
        .gaps()
        .compute_gaps(Dimension::StoreId, Dimension::Category, Metric::Sales)
        .unwrap();
    assert_eq!(gaps.matrix(), vec![vec![Some(0.0)]]);
}
