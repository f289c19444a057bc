//! Schemas for transaction route bodies and list filters.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde_json::{Map, Value};
use uuid::Uuid;

use super::common::{
    body_object, coerce_date_value, coerce_decimal_value, nullable_string, optional_string,
    parse_pagination, parse_query_date, parse_query_decimal, parse_query_uuid, parse_uuid,
    query_value, require_some_field, UUID_MESSAGE,
};
use super::ValidationErrors;
use crate::db::models::{Patch, TransactionFilter, TransactionType};

pub(crate) const EXPENSE_REQUIRES_CATEGORY: &str =
    "categoryId is required for EXPENSE transactions.";
const TYPE_MESSAGE: &str = "type must be INCOME or EXPENSE.";
const UPDATE_KEYS: &[&str] = &[
    "type",
    "amount",
    "description",
    "transactionDate",
    "categoryId",
];

/// Validated input for creating a transaction.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateTransactionInput {
    pub kind: TransactionType,
    pub amount: Decimal,
    pub description: Option<String>,
    pub transaction_date: DateTime<Utc>,
    pub category_id: Option<Uuid>,
}

/// Validated patch for updating a transaction.
///
/// `description` and `categoryId` are nullable: explicit `null` clears the
/// stored value, absence leaves it unchanged.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdateTransactionInput {
    pub kind: Option<TransactionType>,
    pub amount: Option<Decimal>,
    pub description: Patch<String>,
    pub transaction_date: Option<DateTime<Utc>>,
    pub category_id: Patch<Uuid>,
}

/// Parse the transaction list query: pagination plus optional filters with
/// cross-field ordering rules.
pub fn parse_list_transactions_query(
    query: &HashMap<String, String>,
) -> Result<TransactionFilter, ValidationErrors> {
    let mut errors = ValidationErrors::new();

    let pagination = parse_pagination(&mut errors, query);
    let kind = parse_query_type(&mut errors, query);
    let category_id = parse_query_uuid(&mut errors, query, "categoryId");
    let from = parse_query_date(&mut errors, query, "from");
    let to = parse_query_date(&mut errors, query, "to");
    let min_amount = parse_query_decimal(&mut errors, query, "minAmount");
    let max_amount = parse_query_decimal(&mut errors, query, "maxAmount");

    if let (Some(min), Some(max)) = (min_amount, max_amount) {
        if min > max {
            errors.push("minAmount", "minAmount cannot be greater than maxAmount.");
        }
    }
    if let (Some(from), Some(to)) = (from, to) {
        if from > to {
            errors.push("from", "from cannot be later than to.");
        }
    }

    errors.finish(TransactionFilter {
        kind,
        category_id,
        from,
        to,
        min_amount,
        max_amount,
        take: pagination.take,
        skip: pagination.skip,
    })
}

pub fn parse_create_transaction(body: &Value) -> Result<CreateTransactionInput, ValidationErrors> {
    let mut errors = ValidationErrors::new();
    let Some(map) = body_object(&mut errors, body) else {
        return Err(errors);
    };

    let kind = required_type(&mut errors, map);
    let amount = required_amount(&mut errors, map);
    let description = optional_string(&mut errors, map, "description", 0, 255);
    let transaction_date = required_date(&mut errors, map);
    let category_id = match map.get("categoryId") {
        None => None,
        Some(Value::String(raw)) => parse_uuid(&mut errors, "categoryId", raw),
        Some(_) => {
            errors.push("categoryId", UUID_MESSAGE);
            None
        }
    };

    // EXPENSE requires a category reference; checked against the raw body so
    // an invalid categoryId reports its own error instead.
    if kind == Some(TransactionType::Expense) && !map.contains_key("categoryId") {
        errors.push("categoryId", EXPENSE_REQUIRES_CATEGORY);
    }

    match (kind, amount, transaction_date) {
        (Some(kind), Some(amount), Some(transaction_date)) if errors.is_empty() => {
            Ok(CreateTransactionInput {
                kind,
                amount,
                description,
                transaction_date,
                category_id,
            })
        }
        _ => Err(errors),
    }
}

pub fn parse_update_transaction(body: &Value) -> Result<UpdateTransactionInput, ValidationErrors> {
    let mut errors = ValidationErrors::new();
    let Some(map) = body_object(&mut errors, body) else {
        return Err(errors);
    };

    require_some_field(&mut errors, map, UPDATE_KEYS);

    let kind = match map.get("type") {
        None => None,
        Some(value) => parse_type_value(&mut errors, value),
    };
    let amount = match map.get("amount") {
        None => None,
        Some(value) => parse_amount_value(&mut errors, value),
    };
    let transaction_date = match map.get("transactionDate") {
        None => None,
        Some(value) => parse_date_field(&mut errors, value),
    };
    let category_id = match map.get("categoryId") {
        None => Patch::Keep,
        Some(Value::Null) => Patch::Clear,
        Some(Value::String(raw)) => match parse_uuid(&mut errors, "categoryId", raw) {
            Some(id) => Patch::Set(id),
            None => Patch::Keep,
        },
        Some(_) => {
            errors.push("categoryId", UUID_MESSAGE);
            Patch::Keep
        }
    };

    let input = UpdateTransactionInput {
        kind,
        amount,
        description: nullable_string(&mut errors, map, "description", 0, 255),
        transaction_date,
        category_id,
    };

    errors.finish(input)
}

fn parse_query_type(
    errors: &mut ValidationErrors,
    query: &HashMap<String, String>,
) -> Option<TransactionType> {
    let raw = query_value(query, "type")?;
    match TransactionType::parse(raw) {
        Some(kind) => Some(kind),
        None => {
            errors.push("type", TYPE_MESSAGE);
            None
        }
    }
}

fn parse_type_value(errors: &mut ValidationErrors, value: &Value) -> Option<TransactionType> {
    match value {
        Value::String(raw) => match TransactionType::parse(raw) {
            Some(kind) => Some(kind),
            None => {
                errors.push("type", TYPE_MESSAGE);
                None
            }
        },
        _ => {
            errors.push("type", TYPE_MESSAGE);
            None
        }
    }
}

fn required_type(errors: &mut ValidationErrors, map: &Map<String, Value>) -> Option<TransactionType> {
    match map.get("type") {
        None | Some(Value::Null) => {
            errors.push("type", "type is required.");
            None
        }
        Some(value) => parse_type_value(errors, value),
    }
}

fn parse_amount_value(errors: &mut ValidationErrors, value: &Value) -> Option<Decimal> {
    match coerce_decimal_value(value) {
        Some(amount) if amount > Decimal::ZERO => Some(amount),
        Some(_) => {
            errors.push("amount", "amount must be greater than 0.");
            None
        }
        None => {
            errors.push("amount", "amount must be a number.");
            None
        }
    }
}

fn required_amount(errors: &mut ValidationErrors, map: &Map<String, Value>) -> Option<Decimal> {
    match map.get("amount") {
        None | Some(Value::Null) => {
            errors.push("amount", "amount is required.");
            None
        }
        Some(value) => parse_amount_value(errors, value),
    }
}

fn parse_date_field(errors: &mut ValidationErrors, value: &Value) -> Option<DateTime<Utc>> {
    match coerce_date_value(value) {
        Some(date) => Some(date),
        None => {
            errors.push("transactionDate", "transactionDate must be a valid date.");
            None
        }
    }
}

fn required_date(errors: &mut ValidationErrors, map: &Map<String, Value>) -> Option<DateTime<Utc>> {
    match map.get("transactionDate") {
        None | Some(Value::Null) => {
            errors.push("transactionDate", "transactionDate is required.");
            None
        }
        Some(value) => parse_date_field(errors, value),
    }
}

#[cfg(test)]
#[path = "transactions_tests.rs"]
mod transactions_tests;
