//! End-to-end checks of the public engine surface.

use chrono::NaiveDate;
use finstat_core::aging::AgingBucket;
use finstat_core::ratio::{RatioKind, RatioStatus};
use finstat_core::statement::{
    BalanceSheetSnapshot, Category, LineItem, MatchKind, Section, StatementRequest,
};
use finstat_core::tax::{AdditionalCharge, InvoiceLineItem};
use finstat_core::{
    aggregate_snapshot, assemble_statement, bucket_for_due_date, compare_periods, compute_ratios,
    summarize_tax,
};
use finstat_shared::types::ItemId;
use finstat_shared::{AgingConfig, RatioConfig};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use uuid::Uuid;

fn snapshot() -> BalanceSheetSnapshot {
    BalanceSheetSnapshot {
        as_of: NaiveDate::from_ymd_opt(2025, 12, 31).unwrap(),
        assets: Section::new(
            vec![
                LineItem::new("Cash", dec!(125000)),
                LineItem::new("AR", dec!(185000)),
            ],
            vec![LineItem::new("PPE", dec!(890000))],
        ),
        liabilities: Section::new(
            vec![LineItem::new("AP", dec!(95000))],
            vec![LineItem::new("LTD", dec!(420000))],
        ),
        equity: vec![
            LineItem::new("Common", dec!(500000)),
            LineItem::new("Retained", dec!(185000)),
        ],
    }
}

#[test]
fn balance_sheet_rolls_up_and_balances() {
    let totals = aggregate_snapshot(&snapshot()).unwrap();
    assert_eq!(totals.total_assets, dec!(1200000));
    assert_eq!(totals.total_liabilities_and_equity, dec!(1200000));

    let statement = assemble_statement(&snapshot(), None).unwrap();
    assert!(statement.is_balanced);
}

#[test]
fn invoice_line_with_discount_and_tax() {
    let items = vec![InvoiceLineItem {
        description: "Widget".to_string(),
        quantity: dec!(2),
        unit_price: dec!(100),
        discount_pct: dec!(10),
        tax_rate_pct: dec!(5),
    }];

    let summary = summarize_tax(&items, &[]).unwrap();
    assert_eq!(summary.lines[0].taxable_value, dec!(180));
    assert_eq!(summary.lines[0].tax_amount, dec!(9));
    assert_eq!(summary.grand_total, dec!(189));

    let with_transport =
        summarize_tax(&items, &[AdditionalCharge::new("Transport", dec!(20))]).unwrap();
    assert_eq!(with_transport.grand_tax, dec!(9));
    assert_eq!(with_transport.grand_total, dec!(209));
}

#[test]
fn current_ratio_of_empty_balances_is_defined() {
    let empty = BalanceSheetSnapshot {
        as_of: NaiveDate::from_ymd_opt(2025, 1, 31).unwrap(),
        assets: Section::default(),
        liabilities: Section::default(),
        equity: vec![],
    };

    let totals = aggregate_snapshot(&empty).unwrap();
    let ratios = compute_ratios(&totals, &RatioConfig::default()).unwrap();
    let current = ratios
        .iter()
        .find(|r| r.kind == RatioKind::CurrentRatio)
        .unwrap();

    assert_eq!(current.value, Decimal::ZERO);
    assert_eq!(current.status, RatioStatus::Low);
}

#[test]
fn comparison_difference_is_antisymmetric_for_worked_example() {
    let mut prior = snapshot();
    prior.as_of = NaiveDate::from_ymd_opt(2024, 12, 31).unwrap();
    prior.assets.current[0].amount = dec!(98000.55);

    let forward = compare_periods(&snapshot(), &prior).unwrap();
    let backward = compare_periods(&prior, &snapshot()).unwrap();

    let f = forward.item(Category::CurrentAssets, "Cash").unwrap();
    let b = backward.item(Category::CurrentAssets, "Cash").unwrap();
    assert_eq!(f.delta.difference, Some(dec!(26999.45)));
    assert_eq!(b.delta.difference, Some(dec!(-26999.45)));
}

#[test]
fn renamed_item_matches_by_id() {
    let id = ItemId::from_uuid(Uuid::from_u128(0x0195_0000_0000_7000_8000_0000_0000_0001));

    let mut base = snapshot();
    base.liabilities.non_current = vec![LineItem::with_id(id, "Term Loan", dec!(400000))];
    let mut prior = snapshot();
    prior.liabilities.non_current = vec![LineItem::with_id(id, "LTD", dec!(420000))];

    let result = compare_periods(&base, &prior).unwrap();
    let loan = result
        .item_by_id(Category::NonCurrentLiabilities, id)
        .unwrap();

    assert_eq!(loan.match_kind, MatchKind::ById);
    assert_eq!(loan.name, "Term Loan");
    assert_eq!(loan.delta.difference, Some(dec!(-20000)));
    assert_eq!(loan.delta.percent_change, Some(dec!(-4.76)));
}

#[test]
fn due_date_bucketing_policy() {
    let as_of = NaiveDate::from_ymd_opt(2025, 3, 31).unwrap();
    let config = AgingConfig::default();
    let due = |y, m, d| NaiveDate::from_ymd_opt(y, m, d).unwrap();

    assert_eq!(bucket_for_due_date(due(2025, 3, 31), as_of, &config), AgingBucket::Current);
    assert_eq!(bucket_for_due_date(due(2025, 3, 1), as_of, &config), AgingBucket::Overdue30);
    assert_eq!(bucket_for_due_date(due(2025, 2, 28), as_of, &config), AgingBucket::Overdue60);
    assert_eq!(bucket_for_due_date(due(2024, 12, 1), as_of, &config), AgingBucket::Overdue90Plus);
}

#[test]
fn request_document_parses_from_json() {
    let json = r#"{
        "snapshot": {
            "as_of": "2025-12-31",
            "assets": { "current": [{ "name": "Cash", "amount": "100.50" }] },
            "equity": [{ "name": "Capital", "amount": 100.5 }]
        },
        "receivables": {
            "source": "open_items",
            "items": [{ "reference": "INV-9", "amount": "40", "due_date": "2025-10-01" }]
        }
    }"#;

    let request: StatementRequest = serde_json::from_str(json).unwrap();
    let statement = finstat_core::statement::StatementAssembler::default()
        .assemble(&request)
        .unwrap();

    assert!(statement.is_balanced);
    let receivables = statement.receivables.unwrap();
    assert_eq!(receivables.items[0].bucket, AgingBucket::Overdue90Plus);
    assert_eq!(receivables.percentages.overdue_90_plus, dec!(100));
}
