//! Schemas for expense-category route bodies.

use serde_json::{Map, Value};

use super::common::{
    body_object, is_valid_hex_color, nullable_string, optional_string, required_string,
    require_some_field,
};
use super::ValidationErrors;
use crate::db::models::Patch;

const UPDATE_KEYS: &[&str] = &["name", "color", "icon"];

/// Validated input for creating an expense category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateCategoryInput {
    pub name: String,
    pub color: Option<String>,
    pub icon: Option<String>,
}

/// Validated patch for updating an expense category.
///
/// `icon` is nullable: explicit `null` clears the stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateCategoryInput {
    pub name: Option<String>,
    pub color: Option<String>,
    pub icon: Patch<String>,
}

pub fn parse_create_category(body: &Value) -> Result<CreateCategoryInput, ValidationErrors> {
    let mut errors = ValidationErrors::new();
    let Some(map) = body_object(&mut errors, body) else {
        return Err(errors);
    };

    let name = required_string(&mut errors, map, "name", 2, 80);
    let color = optional_color(&mut errors, map);
    let icon = optional_string(&mut errors, map, "icon", 1, 80);

    match name {
        Some(name) if errors.is_empty() => Ok(CreateCategoryInput { name, color, icon }),
        _ => Err(errors),
    }
}

pub fn parse_update_category(body: &Value) -> Result<UpdateCategoryInput, ValidationErrors> {
    let mut errors = ValidationErrors::new();
    let Some(map) = body_object(&mut errors, body) else {
        return Err(errors);
    };

    require_some_field(&mut errors, map, UPDATE_KEYS);

    let input = UpdateCategoryInput {
        name: optional_string(&mut errors, map, "name", 2, 80),
        color: optional_color(&mut errors, map),
        icon: nullable_string(&mut errors, map, "icon", 1, 80),
    };

    errors.finish(input)
}

fn optional_color(errors: &mut ValidationErrors, map: &Map<String, Value>) -> Option<String> {
    match map.get("color") {
        None => None,
        Some(Value::String(raw)) => {
            let color = raw.trim();
            if is_valid_hex_color(color) {
                Some(color.to_string())
            } else {
                errors.push("color", "color must be a hex color in #RRGGBB format.");
                None
            }
        }
        Some(_) => {
            errors.push("color", "color must be a string.");
            None
        }
    }
}

#[cfg(test)]
#[path = "expense_categories_tests.rs"]
mod expense_categories_tests;
