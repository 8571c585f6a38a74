//! Subcommand handlers.
//!
//! Handlers read JSON documents, run the engine, and return a JSON value for
//! the caller to print. Engine errors are mapped to `AppError` here.

use std::io::Read;
use std::path::Path;

use chrono::NaiveDate;
use finstat_core::aging::{AgingBucket, AgingClassifier, AgingError, parse_date};
use finstat_core::ratio::{RatioCalculator, RatioResult};
use finstat_core::statement::{
    BalanceSheetSnapshot, InvoiceInput, PeriodSet, StatementAssembler, StatementError,
    StatementRequest, Totals,
};
use finstat_core::tax::{SupplyType, TaxError, TaxSplit, TaxSummary};
use finstat_core::{aggregate_snapshot, summarize_tax};
use finstat_shared::{AppConfig, AppError, AppResult};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tracing::{debug, instrument};

use crate::cli::Command;

/// Runs a subcommand and returns its JSON output.
///
/// # Errors
///
/// Returns an `AppError` if input cannot be read or parsed, or the engine
/// rejects it.
#[instrument(skip_all)]
pub fn execute(command: &Command, config: &AppConfig) -> AppResult<Value> {
    match command {
        Command::Statement(args) => statement_report(read_json(&args.input)?, config),
        Command::Period(args) => {
            let periods: PeriodSet = read_json(&args.input)?;
            period_report(&periods, &args.base, args.compare.as_deref(), config)
        }
        Command::Tax(args) => {
            tax_report(&read_json(&args.input)?, args.supply.map(SupplyType::from))
        }
        Command::AgingBucket(args) => aging_bucket_report(&args.due_date, &args.as_of, config),
        Command::Ratios(args) => ratio_report(&read_json(&args.input)?, config),
    }
}

// ============================================================================
// Reports
// ============================================================================

/// Assembles one request, or each request of an array.
///
/// In a batch a failing request yields an error object in its slot; the
/// other statements are still returned.
pub fn statement_report(document: Value, config: &AppConfig) -> AppResult<Value> {
    let assembler = assembler(config)?;

    if document.is_array() {
        let requests: Vec<StatementRequest> = from_value(document)?;
        debug!(requests = requests.len(), "Assembling statement batch");

        let results = assembler
            .assemble_batch(&requests)
            .into_iter()
            .map(|result| match result {
                Ok(statement) => to_value(&statement),
                Err(err) => Ok(error_body(&map_statement_error(&err))),
            })
            .collect::<AppResult<Vec<_>>>()?;

        return Ok(Value::Array(results));
    }

    let request: StatementRequest = from_value(document)?;
    let statement = assembler
        .assemble(&request)
        .map_err(|e| map_statement_error(&e))?;
    to_value(&statement)
}

/// Assembles one period of a period set.
pub fn period_report(
    periods: &PeriodSet,
    base: &str,
    compare: Option<&str>,
    config: &AppConfig,
) -> AppResult<Value> {
    let statement = assembler(config)?
        .assemble_period(periods, base, compare)
        .map_err(|e| map_statement_error(&e))?;
    to_value(&statement)
}

#[derive(Debug, Serialize)]
struct TaxReport {
    #[serde(flatten)]
    summary: TaxSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    split: Option<TaxSplit>,
}

/// Summarizes invoice tax, optionally split by supply type.
pub fn tax_report(invoice: &InvoiceInput, supply: Option<SupplyType>) -> AppResult<Value> {
    let summary = summarize_tax(&invoice.items, &invoice.additional_charges)
        .map_err(|e| map_tax_error(&e))?;
    let split = supply.map(|supply| summary.split(supply));

    to_value(&TaxReport { summary, split })
}

#[derive(Debug, Serialize)]
struct AgingBucketReport {
    due_date: NaiveDate,
    as_of: NaiveDate,
    days_past_due: i64,
    bucket: AgingBucket,
}

/// Buckets a single due date.
pub fn aging_bucket_report(due_date: &str, as_of: &str, config: &AppConfig) -> AppResult<Value> {
    let classifier = AgingClassifier::new(config.engine.aging.clone())
        .map_err(|e| map_aging_error(&e))?;
    let due_date = parse_date(due_date).map_err(|e| map_aging_error(&e))?;
    let as_of = parse_date(as_of).map_err(|e| map_aging_error(&e))?;

    to_value(&AgingBucketReport {
        due_date,
        as_of,
        days_past_due: (as_of - due_date).num_days(),
        bucket: classifier.bucket(due_date, as_of),
    })
}

#[derive(Debug, Serialize)]
struct RatioReport {
    as_of: NaiveDate,
    totals: Totals,
    ratios: Vec<RatioResult>,
}

/// Computes ratios for a snapshot.
pub fn ratio_report(snapshot: &BalanceSheetSnapshot, config: &AppConfig) -> AppResult<Value> {
    let totals = aggregate_snapshot(snapshot).map_err(|e| map_statement_error(&e))?;
    let ratios = RatioCalculator::new(config.engine.ratios.clone())
        .compute(&totals)
        .map_err(|e| map_statement_error(&StatementError::from(e)))?;

    to_value(&RatioReport {
        as_of: snapshot.as_of,
        totals,
        ratios,
    })
}

/// Machine-readable error body, as printed on failure.
#[must_use]
pub fn error_body(err: &AppError) -> Value {
    json!({
        "error": err.error_code(),
        "message": err.to_string(),
    })
}

// ============================================================================
// Input / Output
// ============================================================================

fn assembler(config: &AppConfig) -> AppResult<StatementAssembler> {
    StatementAssembler::new(config.engine.clone()).map_err(|e| map_statement_error(&e))
}

fn read_json<T: DeserializeOwned>(path: &Path) -> AppResult<T> {
    let raw = if path == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        std::fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => AppError::NotFound(path.display().to_string()),
            _ => AppError::Io(format!("{}: {e}", path.display())),
        })?
    };

    serde_json::from_str(&raw)
        .map_err(|e| AppError::Serialization(format!("{}: {e}", path.display())))
}

fn from_value<T: DeserializeOwned>(value: Value) -> AppResult<T> {
    serde_json::from_value(value).map_err(|e| AppError::Serialization(e.to_string()))
}

fn to_value<T: Serialize>(value: &T) -> AppResult<Value> {
    serde_json::to_value(value).map_err(|e| AppError::Internal(e.to_string()))
}

// ============================================================================
// Error Mapping
// ============================================================================

/// Maps statement errors to application errors.
fn map_statement_error(e: &StatementError) -> AppError {
    match e {
        StatementError::Tax(err) => map_tax_error(err),
        StatementError::Aging(err) => map_aging_error(err),
        StatementError::Overflow(_) => AppError::Validation(e.to_string()),
        StatementError::InvalidConfig(msg) => AppError::Config(msg.clone()),
        StatementError::PeriodNotFound(_) => AppError::NotFound(e.to_string()),
    }
}

fn map_tax_error(e: &TaxError) -> AppError {
    AppError::Validation(e.to_string())
}

fn map_aging_error(e: &AgingError) -> AppError {
    match e {
        AgingError::MalformedDate { .. } | AgingError::Overflow(_) => {
            AppError::Validation(e.to_string())
        }
        AgingError::InvalidConfig(msg) => AppError::Config(msg.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    fn request_json(cash: &str, capital: &str) -> Value {
        json!({
            "snapshot": {
                "as_of": "2025-12-31",
                "assets": { "current": [{ "name": "Cash", "amount": cash }] },
                "equity": [{ "name": "Capital", "amount": capital }]
            }
        })
    }

    #[test]
    fn test_statement_report_single() {
        let out = statement_report(request_json("100", "100"), &AppConfig::default()).unwrap();

        assert_eq!(out["is_balanced"], json!(true));
        assert_eq!(out["as_of"], json!("2025-12-31"));
    }

    #[test]
    fn test_statement_report_batch_isolates_failures() {
        let mut bad = request_json("100", "100");
        bad["invoice"] = json!({
            "items": [{
                "description": "Broken",
                "quantity": "-1",
                "unit_price": "10",
                "discount_pct": "0",
                "tax_rate_pct": "5"
            }]
        });

        let batch = Value::Array(vec![request_json("100", "100"), bad, request_json("100", "90")]);
        let out = statement_report(batch, &AppConfig::default()).unwrap();
        let slots = out.as_array().unwrap();

        assert_eq!(slots.len(), 3);
        assert_eq!(slots[0]["is_balanced"], json!(true));
        assert_eq!(slots[1]["error"], json!("VALIDATION_ERROR"));
        assert_eq!(slots[2]["is_balanced"], json!(false));
    }

    #[test]
    fn test_statement_report_rejects_malformed_document() {
        let err = statement_report(json!({ "snapshot": 42 }), &AppConfig::default()).unwrap_err();
        assert!(matches!(err, AppError::Serialization(_)));
    }

    #[test]
    fn test_period_report_unknown_id() {
        let periods = PeriodSet::default();
        let err = period_report(&periods, "2025", None, &AppConfig::default()).unwrap_err();

        assert!(matches!(err, AppError::NotFound(_)));
        assert_eq!(err.exit_code(), 66);
    }

    #[test]
    fn test_tax_report_with_split() {
        let invoice: InvoiceInput = serde_json::from_value(json!({
            "items": [{
                "description": "Widget",
                "quantity": "2",
                "unit_price": "100",
                "discount_pct": "10",
                "tax_rate_pct": "5"
            }]
        }))
        .unwrap();

        let out = tax_report(&invoice, Some(SupplyType::IntraState)).unwrap();
        let split: TaxSplit = serde_json::from_value(out["split"].clone()).unwrap();
        let grand_total: rust_decimal::Decimal =
            serde_json::from_value(out["grand_total"].clone()).unwrap();

        assert_eq!(grand_total, dec!(189));
        assert_eq!(split.central, dec!(4.5));
        assert_eq!(split.state, dec!(4.5));
    }

    #[test]
    fn test_tax_report_without_split_omits_field() {
        let out = tax_report(&InvoiceInput::default(), None).unwrap();
        assert!(out.get("split").is_none());
    }

    #[rstest]
    #[case("2025-03-31", "current", 0)]
    #[case("2025-03-01", "overdue_30", 30)]
    #[case("2025-01-30", "overdue_60", 60)]
    #[case("2025-01-29", "overdue_90_plus", 61)]
    fn test_aging_bucket_report(#[case] due: &str, #[case] bucket: &str, #[case] days: i64) {
        let out = aging_bucket_report(due, "2025-03-31", &AppConfig::default()).unwrap();

        assert_eq!(out["bucket"], json!(bucket));
        assert_eq!(out["days_past_due"], json!(days));
    }

    #[test]
    fn test_aging_bucket_report_malformed_date() {
        let err =
            aging_bucket_report("31/03/2025", "2025-03-31", &AppConfig::default()).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_statement_report_out_of_range_is_validation_error() {
        let max = rust_decimal::Decimal::MAX.to_string();
        let mut request = request_json(&max, "100");
        request["snapshot"]["assets"]["current"]
            .as_array_mut()
            .unwrap()
            .push(json!({ "name": "Receivables", "amount": max }));

        let err = statement_report(request, &AppConfig::default()).unwrap_err();

        assert!(matches!(err, AppError::Validation(_)));
        assert_eq!(err.exit_code(), 65);
    }

    #[test]
    fn test_negative_tolerance_is_config_error() {
        let mut config = AppConfig::default();
        config.engine.balance_tolerance = dec!(-0.01);

        let err = statement_report(request_json("100", "100"), &config).unwrap_err();

        assert!(matches!(err, AppError::Config(ref msg) if msg.contains("balance_tolerance")));
        assert_eq!(err.exit_code(), 78);
    }

    #[test]
    fn test_ratio_report_order() {
        let snapshot: BalanceSheetSnapshot = serde_json::from_value(json!({
            "as_of": "2025-12-31",
            "assets": { "current": [{ "name": "Cash", "amount": "300" }] },
            "liabilities": { "current": [{ "name": "AP", "amount": "100" }] },
            "equity": [{ "name": "Capital", "amount": "200" }]
        }))
        .unwrap();

        let out = ratio_report(&snapshot, &AppConfig::default()).unwrap();
        let names: Vec<_> = out["ratios"]
            .as_array()
            .unwrap()
            .iter()
            .map(|r| r["name"].as_str().unwrap().to_string())
            .collect();

        assert_eq!(names, ["current_ratio", "debt_to_equity", "working_capital"]);
    }
}
