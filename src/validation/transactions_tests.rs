use std::collections::HashMap;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde_json::json;
use uuid::Uuid;

use super::*;
use crate::validation::common::EMPTY_UPDATE_MESSAGE;
use crate::validation::ValidationErrors;

fn query(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn has_error(errors: &ValidationErrors, path: &str) -> bool {
    errors.errors().iter().any(|e| e.path == path)
}

// ==================== List query ====================

#[test]
fn list_query_parses_all_filters() {
    let category_id = Uuid::new_v4().to_string();
    let filter = parse_list_transactions_query(&query(&[
        ("type", "EXPENSE"),
        ("categoryId", category_id.as_str()),
        ("from", "2024-01-01"),
        ("to", "2024-02-01"),
        ("minAmount", "5"),
        ("maxAmount", "100.50"),
        ("take", "20"),
        ("skip", "40"),
    ]))
    .unwrap();

    assert_eq!(filter.kind, Some(TransactionType::Expense));
    assert_eq!(filter.category_id.unwrap().to_string(), category_id);
    assert!(filter.from.unwrap() < filter.to.unwrap());
    assert_eq!(filter.min_amount, Some(Decimal::from_str("5").unwrap()));
    assert_eq!(filter.max_amount, Some(Decimal::from_str("100.50").unwrap()));
    assert_eq!(filter.take, Some(20));
    assert_eq!(filter.skip, Some(40));
}

#[test]
fn list_query_defaults_to_no_filters() {
    let filter = parse_list_transactions_query(&HashMap::new()).unwrap();
    assert_eq!(filter, TransactionFilter::default());
}

#[test]
fn list_query_rejects_inverted_date_range() {
    let errors = parse_list_transactions_query(&query(&[
        ("from", "2024-02-01"),
        ("to", "2024-01-01"),
    ]))
    .unwrap_err();
    assert!(has_error(&errors, "from"));
}

#[test]
fn list_query_rejects_inverted_amount_range() {
    let errors = parse_list_transactions_query(&query(&[
        ("minAmount", "100"),
        ("maxAmount", "5"),
    ]))
    .unwrap_err();
    assert!(has_error(&errors, "minAmount"));
}

#[test]
fn list_query_rejects_unknown_type() {
    let errors = parse_list_transactions_query(&query(&[("type", "TRANSFER")])).unwrap_err();
    assert!(has_error(&errors, "type"));
}

#[test]
fn list_query_treats_empty_values_as_absent() {
    let filter = parse_list_transactions_query(&query(&[
        ("type", ""),
        ("from", ""),
        ("minAmount", ""),
    ]))
    .unwrap();
    assert_eq!(filter, TransactionFilter::default());
}

// ==================== Create body ====================

#[test]
fn create_income_without_category_is_valid() {
    let body = json!({
        "type": "INCOME",
        "amount": 1500,
        "transactionDate": "2024-03-01T00:00:00Z"
    });
    let input = parse_create_transaction(&body).unwrap();
    assert_eq!(input.kind, TransactionType::Income);
    assert_eq!(input.category_id, None);
}

#[test]
fn create_expense_without_category_fails_on_category_path() {
    let body = json!({
        "type": "EXPENSE",
        "amount": 10,
        "transactionDate": "2024-03-01T00:00:00Z"
    });
    let errors = parse_create_transaction(&body).unwrap_err();
    let error = errors
        .errors()
        .iter()
        .find(|e| e.path == "categoryId")
        .unwrap();
    assert_eq!(error.message, EXPENSE_REQUIRES_CATEGORY);
}

#[test]
fn create_expense_with_category_is_valid() {
    let category_id = Uuid::new_v4();
    let body = json!({
        "type": "EXPENSE",
        "amount": "12.50",
        "transactionDate": "2024-03-01",
        "categoryId": category_id.to_string()
    });
    let input = parse_create_transaction(&body).unwrap();
    assert_eq!(input.category_id, Some(category_id));
    assert_eq!(input.amount, Decimal::from_str("12.50").unwrap());
}

#[test]
fn create_coerces_numeric_amount_exactly() {
    let body = json!({
        "type": "INCOME",
        "amount": 12.50,
        "transactionDate": "2024-03-01"
    });
    let input = parse_create_transaction(&body).unwrap();
    assert_eq!(input.amount, Decimal::from_str("12.5").unwrap());
}

#[test]
fn create_rejects_non_positive_amounts() {
    for amount in [json!(0), json!(-5), json!("-0.01")] {
        let body = json!({
            "type": "INCOME",
            "amount": amount,
            "transactionDate": "2024-03-01"
        });
        let errors = parse_create_transaction(&body).unwrap_err();
        assert!(has_error(&errors, "amount"));
    }
}

#[test]
fn create_rejects_unparseable_amount() {
    let body = json!({
        "type": "INCOME",
        "amount": "lots",
        "transactionDate": "2024-03-01"
    });
    let errors = parse_create_transaction(&body).unwrap_err();
    assert!(has_error(&errors, "amount"));
}

#[test]
fn create_rejects_missing_required_fields() {
    let errors = parse_create_transaction(&json!({})).unwrap_err();
    assert!(has_error(&errors, "type"));
    assert!(has_error(&errors, "amount"));
    assert!(has_error(&errors, "transactionDate"));
}

#[test]
fn create_rejects_bad_date() {
    let body = json!({
        "type": "INCOME",
        "amount": 1,
        "transactionDate": "soon"
    });
    let errors = parse_create_transaction(&body).unwrap_err();
    assert!(has_error(&errors, "transactionDate"));
}

#[test]
fn create_accepts_epoch_millis_date() {
    let body = json!({
        "type": "INCOME",
        "amount": 1,
        "transactionDate": 1709251200000i64
    });
    let input = parse_create_transaction(&body).unwrap();
    assert_eq!(input.transaction_date.timestamp_millis(), 1709251200000);
}

#[test]
fn create_trims_description() {
    let body = json!({
        "type": "INCOME",
        "amount": 1,
        "transactionDate": "2024-03-01",
        "description": "  salary  "
    });
    let input = parse_create_transaction(&body).unwrap();
    assert_eq!(input.description.as_deref(), Some("salary"));
}

// ==================== Update body ====================

#[test]
fn update_requires_at_least_one_field() {
    let errors = parse_update_transaction(&json!({})).unwrap_err();
    assert_eq!(errors.errors()[0].message, EMPTY_UPDATE_MESSAGE);
}

#[test]
fn update_null_category_means_clear() {
    let input = parse_update_transaction(&json!({"categoryId": null})).unwrap();
    assert_eq!(input.category_id, Patch::Clear);
}

#[test]
fn update_absent_category_means_keep() {
    let input = parse_update_transaction(&json!({"type": "INCOME"})).unwrap();
    assert_eq!(input.category_id, Patch::Keep);
    assert_eq!(input.kind, Some(TransactionType::Income));
}

#[test]
fn update_set_category() {
    let category_id = Uuid::new_v4();
    let input =
        parse_update_transaction(&json!({"categoryId": category_id.to_string()})).unwrap();
    assert_eq!(input.category_id, Patch::Set(category_id));
}

#[test]
fn update_null_description_means_clear() {
    let input = parse_update_transaction(&json!({"description": null})).unwrap();
    assert_eq!(input.description, Patch::Clear);
}

#[test]
fn update_rejects_invalid_amount() {
    let errors = parse_update_transaction(&json!({"amount": 0})).unwrap_err();
    assert!(has_error(&errors, "amount"));
}

#[test]
fn update_rejects_bad_category_uuid() {
    let errors = parse_update_transaction(&json!({"categoryId": "nope"})).unwrap_err();
    assert!(has_error(&errors, "categoryId"));
}
