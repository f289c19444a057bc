//! Schemas for user route bodies.

use serde_json::{Map, Value};

use super::common::{body_object, optional_string, required_string, require_some_field};
use super::ValidationErrors;

const DEFAULT_CURRENCY: &str = "EUR";
const UPDATE_KEYS: &[&str] = &["name", "email", "passwordHash", "defaultCurrency"];

/// Validated input for creating a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateUserInput {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub default_currency: String,
}

/// Validated patch for updating a user. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateUserInput {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password_hash: Option<String>,
    pub default_currency: Option<String>,
}

pub fn parse_create_user(body: &Value) -> Result<CreateUserInput, ValidationErrors> {
    let mut errors = ValidationErrors::new();
    let Some(map) = body_object(&mut errors, body) else {
        return Err(errors);
    };

    let name = required_string(&mut errors, map, "name", 2, 120);
    let email = required_email(&mut errors, map);
    let password_hash = required_password_hash(&mut errors, map);
    let default_currency = optional_currency(&mut errors, map)
        .unwrap_or_else(|| DEFAULT_CURRENCY.to_string());

    match (name, email, password_hash) {
        (Some(name), Some(email), Some(password_hash)) if errors.is_empty() => {
            Ok(CreateUserInput {
                name,
                email,
                password_hash,
                default_currency,
            })
        }
        _ => Err(errors),
    }
}

pub fn parse_update_user(body: &Value) -> Result<UpdateUserInput, ValidationErrors> {
    let mut errors = ValidationErrors::new();
    let Some(map) = body_object(&mut errors, body) else {
        return Err(errors);
    };

    require_some_field(&mut errors, map, UPDATE_KEYS);

    let input = UpdateUserInput {
        name: optional_string(&mut errors, map, "name", 2, 120),
        email: optional_email(&mut errors, map),
        password_hash: optional_password_hash(&mut errors, map),
        default_currency: optional_currency(&mut errors, map),
    };

    errors.finish(input)
}

/// Emails are trimmed and lower-cased before the syntactic check.
fn normalize_email(errors: &mut ValidationErrors, raw: &str) -> Option<String> {
    let email = raw.trim().to_lowercase();
    if super::common::is_valid_email(&email) {
        Some(email)
    } else {
        errors.push("email", "email must be a valid email address.");
        None
    }
}

fn required_email(errors: &mut ValidationErrors, map: &Map<String, Value>) -> Option<String> {
    match map.get("email") {
        None | Some(Value::Null) => {
            errors.push("email", "email is required.");
            None
        }
        Some(Value::String(raw)) => normalize_email(errors, raw),
        Some(_) => {
            errors.push("email", "email must be a string.");
            None
        }
    }
}

fn optional_email(errors: &mut ValidationErrors, map: &Map<String, Value>) -> Option<String> {
    match map.get("email") {
        None => None,
        Some(Value::String(raw)) => normalize_email(errors, raw),
        Some(_) => {
            errors.push("email", "email must be a string.");
            None
        }
    }
}

// The hash is opaque: no trimming, only a length floor.
fn check_password_hash(errors: &mut ValidationErrors, raw: &str) -> Option<String> {
    if raw.chars().count() >= 10 {
        Some(raw.to_string())
    } else {
        errors.push(
            "passwordHash",
            "passwordHash must have at least 10 characters.",
        );
        None
    }
}

fn required_password_hash(
    errors: &mut ValidationErrors,
    map: &Map<String, Value>,
) -> Option<String> {
    match map.get("passwordHash") {
        None | Some(Value::Null) => {
            errors.push("passwordHash", "passwordHash is required.");
            None
        }
        Some(Value::String(raw)) => check_password_hash(errors, raw),
        Some(_) => {
            errors.push("passwordHash", "passwordHash must be a string.");
            None
        }
    }
}

fn optional_password_hash(
    errors: &mut ValidationErrors,
    map: &Map<String, Value>,
) -> Option<String> {
    match map.get("passwordHash") {
        None => None,
        Some(Value::String(raw)) => check_password_hash(errors, raw),
        Some(_) => {
            errors.push("passwordHash", "passwordHash must be a string.");
            None
        }
    }
}

fn optional_currency(errors: &mut ValidationErrors, map: &Map<String, Value>) -> Option<String> {
    match map.get("defaultCurrency") {
        None => None,
        Some(Value::String(raw)) => {
            let currency = raw.trim().to_uppercase();
            if currency.len() == 3 && currency.chars().all(|c| c.is_ascii_alphabetic()) {
                Some(currency)
            } else {
                errors.push(
                    "defaultCurrency",
                    "defaultCurrency must be 3 letters (e.g. EUR).",
                );
                None
            }
        }
        Some(_) => {
            errors.push("defaultCurrency", "defaultCurrency must be a string.");
            None
        }
    }
}

#[cfg(test)]
#[path = "users_tests.rs"]
mod users_tests;
