//! Data Transfer Objects for the REST API.
//!
//! Wire format is camelCase. Monetary amounts serialize as exact decimal
//! strings with trailing zeros normalized, never as binary floats.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::db::models::{
    CategorySummary, ExpenseCategory, SafeUser, TransactionType, TransactionWithCategory,
};

/// User response with the credential hash stripped.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDto {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub default_currency: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<SafeUser> for UserDto {
    fn from(user: SafeUser) -> Self {
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

/// Expense category response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryDto {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub color: Option<String>,
    pub icon: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ExpenseCategory> for CategoryDto {
    fn from(category: ExpenseCategory) -> Self {
        Self {
            id: category.id,
            user_id: category.user_id,
            name: category.name,
            color: category.color,
            icon: category.icon,
            created_at: category.created_at,
            updated_at: category.updated_at,
        }
    }
}

/// Reduced category projection embedded in transaction responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategorySummaryDto {
    pub id: Uuid,
    pub name: String,
    pub color: Option<String>,
    pub icon: Option<String>,
}

impl From<CategorySummary> for CategorySummaryDto {
    fn from(summary: CategorySummary) -> Self {
        Self {
            id: summary.id,
            name: summary.name,
            color: summary.color,
            icon: summary.icon,
        }
    }
}

/// Transaction response with its category projection (or `null`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionDto {
    pub id: Uuid,
    pub user_id: Uuid,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    /// Exact decimal string, e.g. `"12.5"`
    pub amount: String,
    pub description: Option<String>,
    pub transaction_date: DateTime<Utc>,
    pub category_id: Option<Uuid>,
    pub category: Option<CategorySummaryDto>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<TransactionWithCategory> for TransactionDto {
    fn from(joined: TransactionWithCategory) -> Self {
        let transaction = joined.transaction;
        Self {
            id: transaction.id,
            user_id: transaction.user_id,
            kind: transaction.kind,
            amount: transaction.amount.normalize().to_string(),
            description: transaction.description,
            transaction_date: transaction.transaction_date,
            category_id: transaction.category_id,
            category: joined.category.map(CategorySummaryDto::from),
            created_at: transaction.created_at,
            updated_at: transaction.updated_at,
        }
    }
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthDto {
    pub status: String,
    pub environment: String,
    pub timestamp: String,
}
