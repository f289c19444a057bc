//! Row and change-set types for the Postgres backend.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use rust_decimal::Decimal;
use uuid::Uuid;

use super::schema::{expense_categories, transactions, users};
use crate::db::models::{
    CategoryChanges, CategorySummary, ExpenseCategory, NewCategory, NewTransaction, NewUser,
    Transaction, TransactionChanges, TransactionType, User, UserChanges,
};
use crate::db::repository::RepositoryError;

// ==================== Users ====================

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UserRow {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub default_currency: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            email: row.email,
            password_hash: row.password_hash,
            default_currency: row.default_currency,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub struct NewUserRow {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub default_currency: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl NewUserRow {
    pub fn from_input(new_user: &NewUser) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: new_user.name.clone(),
            email: new_user.email.clone(),
            password_hash: new_user.password_hash.clone(),
            default_currency: new_user.default_currency.clone(),
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = users)]
pub struct UserChangesRow {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password_hash: Option<String>,
    pub default_currency: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl UserChangesRow {
    pub fn from_changes(changes: &UserChanges) -> Self {
        Self {
            name: changes.name.clone(),
            email: changes.email.clone(),
            password_hash: changes.password_hash.clone(),
            default_currency: changes.default_currency.clone(),
            updated_at: Utc::now(),
        }
    }
}

// ==================== Expense categories ====================

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = expense_categories)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct CategoryRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub color: Option<String>,
    pub icon: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<CategoryRow> for ExpenseCategory {
    fn from(row: CategoryRow) -> Self {
        Self {
            id: row.id,
            user_id: row.user_id,
            name: row.name,
            color: row.color,
            icon: row.icon,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

impl From<CategoryRow> for CategorySummary {
    fn from(row: CategoryRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            color: row.color,
            icon: row.icon,
        }
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = expense_categories)]
pub struct NewCategoryRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub color: Option<String>,
    pub icon: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl NewCategoryRow {
    pub fn from_input(user_id: Uuid, new_category: &NewCategory) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id,
            name: new_category.name.clone(),
            color: new_category.color.clone(),
            icon: new_category.icon.clone(),
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = expense_categories)]
pub struct CategoryChangesRow {
    pub name: Option<String>,
    pub color: Option<String>,
    // Double Option: outer None skips the column, inner None writes NULL.
    pub icon: Option<Option<String>>,
    pub updated_at: DateTime<Utc>,
}

impl CategoryChangesRow {
    pub fn from_changes(changes: &CategoryChanges) -> Self {
        Self {
            name: changes.name.clone(),
            color: changes.color.clone(),
            icon: changes.icon.to_nullable_update(),
            updated_at: Utc::now(),
        }
    }
}

// ==================== Transactions ====================

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = transactions)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TransactionRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub kind: String,
    pub amount: Decimal,
    pub description: Option<String>,
    pub transaction_date: DateTime<Utc>,
    pub category_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<TransactionRow> for Transaction {
    type Error = RepositoryError;

    fn try_from(row: TransactionRow) -> Result<Self, Self::Error> {
        let kind = TransactionType::parse(&row.kind).ok_or_else(|| {
            RepositoryError::InternalError(format!(
                "invalid transaction type '{}' stored for {}",
                row.kind, row.id
            ))
        })?;
        Ok(Self {
            id: row.id,
            user_id: row.user_id,
            kind,
            amount: row.amount,
            description: row.description,
            transaction_date: row.transaction_date,
            category_id: row.category_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = transactions)]
pub struct NewTransactionRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub kind: String,
    pub amount: Decimal,
    pub description: Option<String>,
    pub transaction_date: DateTime<Utc>,
    pub category_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl NewTransactionRow {
    pub fn from_input(user_id: Uuid, new_transaction: &NewTransaction) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id,
            kind: new_transaction.kind.as_str().to_string(),
            amount: new_transaction.amount,
            description: new_transaction.description.clone(),
            transaction_date: new_transaction.transaction_date,
            category_id: new_transaction.category_id,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = transactions)]
pub struct TransactionChangesRow {
    pub kind: Option<String>,
    pub amount: Option<Decimal>,
    pub description: Option<Option<String>>,
    pub transaction_date: Option<DateTime<Utc>>,
    pub category_id: Option<Option<Uuid>>,
    pub updated_at: DateTime<Utc>,
}

impl TransactionChangesRow {
    pub fn from_changes(changes: &TransactionChanges) -> Self {
        Self {
            kind: changes.kind.map(|k| k.as_str().to_string()),
            amount: changes.amount,
            description: changes.description.to_nullable_update(),
            transaction_date: changes.transaction_date,
            category_id: changes.category_id.to_nullable_update(),
            updated_at: Utc::now(),
        }
    }
}
