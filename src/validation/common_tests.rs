use std::collections::HashMap;

use chrono::{Datelike, Timelike};

use super::*;

fn query(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn has_error(errors: &ValidationErrors, path: &str) -> bool {
    errors.errors().iter().any(|e| e.path == path)
}

#[test]
fn parses_valid_uuid_param() {
    let id = parse_user_param("7f8af0d7-5b1a-4d38-8a34-42a3a7cf0b2f").unwrap();
    assert_eq!(id.to_string(), "7f8af0d7-5b1a-4d38-8a34-42a3a7cf0b2f");
}

#[test]
fn rejects_malformed_uuid_param() {
    let errors = parse_user_param("not-a-uuid").unwrap_err();
    assert!(has_error(&errors, "userId"));
}

#[test]
fn scoped_params_accumulate_one_error_per_bad_segment() {
    let errors = parse_scoped_params("categoryId", "nope", "also-nope").unwrap_err();
    assert_eq!(errors.errors().len(), 2);
    assert!(has_error(&errors, "userId"));
    assert!(has_error(&errors, "categoryId"));
}

#[test]
fn pagination_accepts_valid_window() {
    let pagination = parse_pagination_query(&query(&[("take", "10"), ("skip", "5")])).unwrap();
    assert_eq!(pagination.take, Some(10));
    assert_eq!(pagination.skip, Some(5));
}

#[test]
fn pagination_treats_empty_strings_as_absent() {
    let pagination = parse_pagination_query(&query(&[("take", ""), ("skip", "")])).unwrap();
    assert_eq!(pagination.take, None);
    assert_eq!(pagination.skip, None);
}

#[test]
fn pagination_rejects_out_of_range_take() {
    let errors = parse_pagination_query(&query(&[("take", "0")])).unwrap_err();
    assert!(has_error(&errors, "take"));

    // Out of range fails; it is never clamped.
    let errors = parse_pagination_query(&query(&[("take", "101")])).unwrap_err();
    assert!(has_error(&errors, "take"));
}

#[test]
fn pagination_accepts_the_upper_bound() {
    let pagination = parse_pagination_query(&query(&[("take", "100")])).unwrap();
    assert_eq!(pagination.take, Some(100));
}

#[test]
fn pagination_rejects_non_integers() {
    assert!(parse_pagination_query(&query(&[("take", "abc")])).is_err());
    assert!(parse_pagination_query(&query(&[("take", "1.5")])).is_err());
    assert!(parse_pagination_query(&query(&[("skip", "-1")])).is_err());
}

#[test]
fn pagination_accepts_zero_skip() {
    let pagination = parse_pagination_query(&query(&[("skip", "0")])).unwrap();
    assert_eq!(pagination.skip, Some(0));
}

#[test]
fn coerces_rfc3339_dates() {
    let date = coerce_date("2024-03-05T10:30:00Z").unwrap();
    assert_eq!(date.hour(), 10);
    assert_eq!(date.minute(), 30);
}

#[test]
fn coerces_bare_dates_to_midnight_utc() {
    let date = coerce_date("2024-03-05").unwrap();
    assert_eq!(date.year(), 2024);
    assert_eq!(date.month(), 3);
    assert_eq!(date.day(), 5);
    assert_eq!(date.hour(), 0);
}

#[test]
fn rejects_unparseable_dates() {
    assert!(coerce_date("yesterday").is_none());
    assert!(coerce_date("2024-13-40").is_none());
}

#[test]
fn email_check_accepts_plain_addresses() {
    assert!(is_valid_email("ana@example.com"));
    assert!(is_valid_email("a.b+c@sub.example.org"));
}

#[test]
fn email_check_rejects_malformed_addresses() {
    assert!(!is_valid_email("ana"));
    assert!(!is_valid_email("ana@"));
    assert!(!is_valid_email("@example.com"));
    assert!(!is_valid_email("ana@example"));
    assert!(!is_valid_email("ana@.com"));
    assert!(!is_valid_email("ana @example.com"));
}

#[test]
fn hex_color_check() {
    assert!(is_valid_hex_color("#a1B2c3"));
    assert!(!is_valid_hex_color("a1B2c3"));
    assert!(!is_valid_hex_color("#a1B2c"));
    assert!(!is_valid_hex_color("#a1B2c3d"));
    assert!(!is_valid_hex_color("#a1B2cz"));
}
