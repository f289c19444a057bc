//! Request validation layer.
//!
//! Schemas are plain functions over raw input (path segments, query-string
//! maps, JSON bodies) that either produce a typed, normalized value or fail
//! with a [`ValidationErrors`] collection of field-pathed messages. They run
//! before any domain logic and never partially apply a mutation.

pub mod common;
pub mod expense_categories;
pub mod transactions;
pub mod users;

use std::fmt;

use serde::{Deserialize, Serialize};

/// A single validation failure, addressed by the offending field path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    /// Field path the message refers to (e.g. `categoryId`, `take`)
    pub path: String,
    /// Human-readable description of the failed rule
    pub message: String,
}

/// Accumulated validation failures for one request.
///
/// Schemas collect every failure they can see instead of stopping at the
/// first one, so a response can report all invalid fields at once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a failure for `path`.
    pub fn push(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.errors.push(FieldError {
            path: path.into(),
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    pub fn into_errors(self) -> Vec<FieldError> {
        self.errors
    }

    /// Finish a schema: `Ok(value)` when nothing failed, the collected
    /// failures otherwise.
    pub fn finish<T>(self, value: T) -> Result<T, ValidationErrors> {
        if self.is_empty() {
            Ok(value)
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined = self
            .errors
            .iter()
            .map(|e| format!("{}: {}", e.path, e.message))
            .collect::<Vec<_>>()
            .join("; ");
        write!(f, "{}", joined)
    }
}

impl std::error::Error for ValidationErrors {}
