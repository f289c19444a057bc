//! Domain entities and repository input types.
//!
//! These are the storage-agnostic shapes shared by every repository backend.
//! Database row types live next to the backend that needs them.

use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Kind of a transaction. Serialized as `INCOME` / `EXPENSE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionType {
    Income,
    Expense,
}

impl TransactionType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Income => "INCOME",
            Self::Expense => "EXPENSE",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "INCOME" => Some(Self::Income),
            "EXPENSE" => Some(Self::Expense),
            _ => None,
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Three-state patch value for nullable columns: distinguish "leave
/// unchanged" from an explicit `null`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Patch<T> {
    /// Field absent from the patch; keep the stored value.
    #[default]
    Keep,
    /// Explicit `null`; clear the stored value.
    Clear,
    /// Replace the stored value.
    Set(T),
}

impl<T> Patch<T> {
    pub fn is_keep(&self) -> bool {
        matches!(self, Self::Keep)
    }

    /// Whether the patch touches the field at all.
    pub fn touched(&self) -> bool {
        !self.is_keep()
    }

    /// Resolve against the currently stored value.
    pub fn apply(self, current: Option<T>) -> Option<T> {
        match self {
            Self::Keep => current,
            Self::Clear => None,
            Self::Set(value) => Some(value),
        }
    }

    /// Double-`Option` form used by change-set rows: outer `None` skips the
    /// column, inner `None` writes SQL `NULL`.
    pub fn to_nullable_update(&self) -> Option<Option<T>>
    where
        T: Clone,
    {
        match self {
            Self::Keep => None,
            Self::Clear => Some(None),
            Self::Set(value) => Some(Some(value.clone())),
        }
    }
}

// ==================== Entities ====================

/// Full user row, including the credential hash. Never serialized directly;
/// responses go through [`SafeUser`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub default_currency: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// User projection with the credential hash stripped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SafeUser {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub default_currency: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for SafeUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            default_currency: user.default_currency,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpenseCategory {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub color: Option<String>,
    pub icon: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Reduced category projection embedded in transaction responses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategorySummary {
    pub id: Uuid,
    pub name: String,
    pub color: Option<String>,
    pub icon: Option<String>,
}

impl From<&ExpenseCategory> for CategorySummary {
    fn from(category: &ExpenseCategory) -> Self {
        Self {
            id: category.id,
            name: category.name.clone(),
            color: category.color.clone(),
            icon: category.icon.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    pub id: Uuid,
    pub user_id: Uuid,
    pub kind: TransactionType,
    pub amount: Decimal,
    pub description: Option<String>,
    pub transaction_date: DateTime<Utc>,
    pub category_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Transaction joined with its category projection, if any.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionWithCategory {
    pub transaction: Transaction,
    pub category: Option<CategorySummary>,
}

// ==================== Repository inputs ====================

/// `take`/`skip` windowing for list reads. `take` absent returns everything.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Pagination {
    pub take: Option<i64>,
    pub skip: Option<i64>,
}

/// Filters for the transaction list read.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionFilter {
    pub kind: Option<TransactionType>,
    pub category_id: Option<Uuid>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
    pub min_amount: Option<Decimal>,
    pub max_amount: Option<Decimal>,
    pub take: Option<i64>,
    pub skip: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub default_currency: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserChanges {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password_hash: Option<String>,
    pub default_currency: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCategory {
    pub name: String,
    pub color: Option<String>,
    pub icon: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryChanges {
    pub name: Option<String>,
    pub color: Option<String>,
    pub icon: Patch<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    pub kind: TransactionType,
    pub amount: Decimal,
    pub description: Option<String>,
    pub transaction_date: DateTime<Utc>,
    pub category_id: Option<Uuid>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionChanges {
    pub kind: Option<TransactionType>,
    pub amount: Option<Decimal>,
    pub description: Patch<String>,
    pub transaction_date: Option<DateTime<Utc>>,
    pub category_id: Patch<Uuid>,
}
