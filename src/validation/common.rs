//! Shared coercion and field helpers used by every route schema.
//!
//! Query-string values arrive as strings and are coerced here; empty strings
//! are treated as absent, matching how HTML forms submit blank inputs.

use std::collections::HashMap;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use serde_json::{Map, Value};
use uuid::Uuid;

use super::ValidationErrors;
use crate::db::models::{Pagination, Patch};

pub(crate) const UUID_MESSAGE: &str = "Must be a valid UUID.";
pub(crate) const EMPTY_UPDATE_MESSAGE: &str = "At least one field must be provided for update.";

// ==================== Path parameters ====================

/// Parse a single `userId` path segment.
pub fn parse_user_param(raw: &str) -> Result<Uuid, ValidationErrors> {
    let mut errors = ValidationErrors::new();
    let id = parse_uuid(&mut errors, "userId", raw);
    errors.finish(()).map(|_| id.unwrap_or_default())
}

/// Parse a `(userId, <child>)` path pair, accumulating one error per bad
/// segment.
pub fn parse_scoped_params(
    child_path: &str,
    user_raw: &str,
    child_raw: &str,
) -> Result<(Uuid, Uuid), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    let user_id = parse_uuid(&mut errors, "userId", user_raw);
    let child_id = parse_uuid(&mut errors, child_path, child_raw);
    errors.finish(()).map(|_| {
        (
            user_id.unwrap_or_default(),
            child_id.unwrap_or_default(),
        )
    })
}

pub(crate) fn parse_uuid(errors: &mut ValidationErrors, path: &str, raw: &str) -> Option<Uuid> {
    match Uuid::parse_str(raw) {
        Ok(id) => Some(id),
        Err(_) => {
            errors.push(path, UUID_MESSAGE);
            None
        }
    }
}

// ==================== Query parameters ====================

/// A query value is absent when the key is missing or the value is empty.
pub(crate) fn query_value<'a>(query: &'a HashMap<String, String>, key: &str) -> Option<&'a str> {
    query
        .get(key)
        .map(|v| v.as_str())
        .filter(|v| !v.is_empty())
}

/// Parse `take`/`skip` pagination query parameters.
pub fn parse_pagination_query(
    query: &HashMap<String, String>,
) -> Result<Pagination, ValidationErrors> {
    let mut errors = ValidationErrors::new();
    let pagination = parse_pagination(&mut errors, query);
    errors.finish(pagination)
}

pub(crate) fn parse_pagination(
    errors: &mut ValidationErrors,
    query: &HashMap<String, String>,
) -> Pagination {
    let take = match query_value(query, "take") {
        Some(raw) => match raw.parse::<i64>() {
            Ok(v) if v > 100 => {
                errors.push("take", "take must be at most 100.");
                None
            }
            Ok(v) if v > 0 => Some(v),
            _ => {
                errors.push("take", "take must be a positive integer.");
                None
            }
        },
        None => None,
    };

    let skip = match query_value(query, "skip") {
        Some(raw) => match raw.parse::<i64>() {
            Ok(v) if v >= 0 => Some(v),
            _ => {
                errors.push("skip", "skip must be a non-negative integer.");
                None
            }
        },
        None => None,
    };

    Pagination { take, skip }
}

pub(crate) fn parse_query_uuid(
    errors: &mut ValidationErrors,
    query: &HashMap<String, String>,
    key: &str,
) -> Option<Uuid> {
    query_value(query, key).and_then(|raw| parse_uuid(errors, key, raw))
}

pub(crate) fn parse_query_date(
    errors: &mut ValidationErrors,
    query: &HashMap<String, String>,
    key: &str,
) -> Option<DateTime<Utc>> {
    let raw = query_value(query, key)?;
    match coerce_date(raw) {
        Some(date) => Some(date),
        None => {
            errors.push(key, format!("{key} must be a valid date."));
            None
        }
    }
}

pub(crate) fn parse_query_decimal(
    errors: &mut ValidationErrors,
    query: &HashMap<String, String>,
    key: &str,
) -> Option<Decimal> {
    let raw = query_value(query, key)?;
    match Decimal::from_str(raw.trim()) {
        Ok(value) => Some(value),
        Err(_) => {
            errors.push(key, format!("{key} must be a number."));
            None
        }
    }
}

// ==================== Coercion ====================

/// Coerce a string into a UTC instant. Accepts RFC 3339, a bare date
/// (midnight UTC), or a naive datetime.
pub(crate) fn coerce_date(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map(|ndt| ndt.and_utc());
    }
    if let Ok(ndt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S") {
        return Some(ndt.and_utc());
    }
    None
}

/// Coerce a JSON value into a UTC instant. Numbers are epoch milliseconds.
pub(crate) fn coerce_date_value(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(raw) => coerce_date(raw),
        Value::Number(n) => n.as_i64().and_then(DateTime::from_timestamp_millis),
        _ => None,
    }
}

/// Coerce a JSON value into an exact decimal. Numbers go through their
/// shortest decimal representation so binary floats never leak in.
pub(crate) fn coerce_decimal_value(value: &Value) -> Option<Decimal> {
    match value {
        Value::Number(n) => Decimal::from_str(&n.to_string()).ok(),
        Value::String(raw) => Decimal::from_str(raw.trim()).ok(),
        _ => None,
    }
}

// ==================== Body fields ====================

pub(crate) fn body_object<'a>(
    errors: &mut ValidationErrors,
    body: &'a Value,
) -> Option<&'a Map<String, Value>> {
    match body.as_object() {
        Some(map) => Some(map),
        None => {
            errors.push("body", "Request body must be a JSON object.");
            None
        }
    }
}

/// Fail the whole update when none of `known_keys` is present in the body.
pub(crate) fn require_some_field(
    errors: &mut ValidationErrors,
    map: &Map<String, Value>,
    known_keys: &[&str],
) {
    if !known_keys.iter().any(|key| map.contains_key(*key)) {
        errors.push("body", EMPTY_UPDATE_MESSAGE);
    }
}

pub(crate) fn check_string_length(
    errors: &mut ValidationErrors,
    path: &str,
    trimmed: &str,
    min: usize,
    max: usize,
) -> Option<String> {
    let len = trimmed.chars().count();
    if len < min {
        errors.push(path, format!("{path} must have at least {min} characters."));
        None
    } else if len > max {
        errors.push(path, format!("{path} must have at most {max} characters."));
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Required, trimmed string with length bounds.
pub(crate) fn required_string(
    errors: &mut ValidationErrors,
    map: &Map<String, Value>,
    key: &str,
    min: usize,
    max: usize,
) -> Option<String> {
    match map.get(key) {
        None | Some(Value::Null) => {
            errors.push(key, format!("{key} is required."));
            None
        }
        Some(Value::String(raw)) => check_string_length(errors, key, raw.trim(), min, max),
        Some(_) => {
            errors.push(key, format!("{key} must be a string."));
            None
        }
    }
}

/// Optional, trimmed string with length bounds. Explicit `null` is rejected;
/// use [`nullable_string`] on update schemas where `null` means "clear".
pub(crate) fn optional_string(
    errors: &mut ValidationErrors,
    map: &Map<String, Value>,
    key: &str,
    min: usize,
    max: usize,
) -> Option<String> {
    match map.get(key) {
        None => None,
        Some(Value::String(raw)) => check_string_length(errors, key, raw.trim(), min, max),
        Some(_) => {
            errors.push(key, format!("{key} must be a string."));
            None
        }
    }
}

/// Optional, nullable, trimmed string: absent keeps the stored value,
/// explicit `null` clears it.
pub(crate) fn nullable_string(
    errors: &mut ValidationErrors,
    map: &Map<String, Value>,
    key: &str,
    min: usize,
    max: usize,
) -> Patch<String> {
    match map.get(key) {
        None => Patch::Keep,
        Some(Value::Null) => Patch::Clear,
        Some(Value::String(raw)) => match check_string_length(errors, key, raw.trim(), min, max) {
            Some(value) => Patch::Set(value),
            None => Patch::Keep,
        },
        Some(_) => {
            errors.push(key, format!("{key} must be a string."));
            Patch::Keep
        }
    }
}

// ==================== Format checks ====================

pub(crate) fn is_valid_email(value: &str) -> bool {
    if value.chars().any(char::is_whitespace) {
        return false;
    }
    let mut parts = value.splitn(2, '@');
    let local = parts.next().unwrap_or("");
    let Some(domain) = parts.next() else {
        return false;
    };
    if local.is_empty() || domain.is_empty() || domain.contains('@') {
        return false;
    }
    if !domain.contains('.') || domain.starts_with('.') || domain.ends_with('.') {
        return false;
    }
    true
}

pub(crate) fn is_valid_hex_color(value: &str) -> bool {
    match value.strip_prefix('#') {
        Some(rest) => rest.len() == 6 && rest.chars().all(|c| c.is_ascii_hexdigit()),
        None => false,
    }
}

#[cfg(test)]
#[path = "common_tests.rs"]
mod common_tests;
