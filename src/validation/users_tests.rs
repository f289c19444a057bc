use serde_json::json;

use super::*;
use crate::validation::common::EMPTY_UPDATE_MESSAGE;
use crate::validation::ValidationErrors;

fn has_error(errors: &ValidationErrors, path: &str) -> bool {
    errors.errors().iter().any(|e| e.path == path)
}

#[test]
fn create_normalizes_email_and_defaults_currency() {
    let body = json!({
        "name": "  Ana  ",
        "email": "ANA@X.Com",
        "passwordHash": "0123456789"
    });
    let input = parse_create_user(&body).unwrap();
    assert_eq!(input.name, "Ana");
    assert_eq!(input.email, "ana@x.com");
    assert_eq!(input.default_currency, "EUR");
}

#[test]
fn create_normalizes_supplied_currency() {
    let body = json!({
        "name": "Ana",
        "email": "ana@x.com",
        "passwordHash": "0123456789",
        "defaultCurrency": " usd "
    });
    let input = parse_create_user(&body).unwrap();
    assert_eq!(input.default_currency, "USD");
}

#[test]
fn create_rejects_bad_currency() {
    let body = json!({
        "name": "Ana",
        "email": "ana@x.com",
        "passwordHash": "0123456789",
        "defaultCurrency": "EURO"
    });
    let errors = parse_create_user(&body).unwrap_err();
    assert!(has_error(&errors, "defaultCurrency"));
}

#[test]
fn create_rejects_invalid_email() {
    let body = json!({
        "name": "Ana",
        "email": "not-an-email",
        "passwordHash": "0123456789"
    });
    let errors = parse_create_user(&body).unwrap_err();
    assert!(has_error(&errors, "email"));
}

#[test]
fn create_rejects_short_password_hash() {
    let body = json!({
        "name": "Ana",
        "email": "ana@x.com",
        "passwordHash": "short"
    });
    let errors = parse_create_user(&body).unwrap_err();
    assert!(has_error(&errors, "passwordHash"));
}

#[test]
fn create_collects_every_missing_field() {
    let errors = parse_create_user(&json!({})).unwrap_err();
    assert!(has_error(&errors, "name"));
    assert!(has_error(&errors, "email"));
    assert!(has_error(&errors, "passwordHash"));
}

#[test]
fn create_rejects_short_name() {
    let body = json!({
        "name": " a ",
        "email": "ana@x.com",
        "passwordHash": "0123456789"
    });
    let errors = parse_create_user(&body).unwrap_err();
    assert!(has_error(&errors, "name"));
}

#[test]
fn update_requires_at_least_one_field() {
    let errors = parse_update_user(&json!({})).unwrap_err();
    assert_eq!(errors.errors().len(), 1);
    assert_eq!(errors.errors()[0].message, EMPTY_UPDATE_MESSAGE);
}

#[test]
fn update_ignores_unknown_keys() {
    // Unknown keys do not count toward "at least one field".
    let errors = parse_update_user(&json!({"nickname": "ana"})).unwrap_err();
    assert_eq!(errors.errors()[0].message, EMPTY_UPDATE_MESSAGE);
}

#[test]
fn update_with_single_field_is_valid() {
    let input = parse_update_user(&json!({"name": "Beatriz"})).unwrap();
    assert_eq!(input.name.as_deref(), Some("Beatriz"));
    assert_eq!(input.email, None);
}

#[test]
fn update_normalizes_email() {
    let input = parse_update_user(&json!({"email": " Ana@X.COM "})).unwrap();
    assert_eq!(input.email.as_deref(), Some("ana@x.com"));
}

#[test]
fn rejects_non_object_body() {
    assert!(parse_create_user(&json!("nope")).is_err());
    assert!(parse_update_user(&json!([1, 2])).is_err());
}
