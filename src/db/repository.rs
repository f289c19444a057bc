//! Repository traits abstracting the persistence backend.
//!
//! The traits define every storage operation the service layer needs,
//! allowing backends (Postgres via Diesel, in-memory) to be swapped through
//! dependency injection.

use async_trait::async_trait;
use uuid::Uuid;

use super::models::{
    CategoryChanges, ExpenseCategory, NewCategory, NewTransaction, NewUser, Pagination,
    TransactionChanges, TransactionFilter, TransactionWithCategory, User, UserChanges,
};

/// Result type for repository operations
pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Constraint names surfaced by [`RepositoryError::UniqueViolation`]. Both
/// backends report the same names so callers can match on them.
pub mod constraints {
    pub const USERS_EMAIL: &str = "users_email_key";
    pub const CATEGORY_NAME_PER_USER: &str = "expense_categories_user_id_name_key";
}

/// Error type for repository operations
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Query error: {0}")]
    QueryError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    /// A uniqueness constraint rejected the write. Carries the constraint
    /// name so callers can translate it into a domain conflict.
    #[error("Unique constraint violation: {constraint}")]
    UniqueViolation { constraint: String },

    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl From<String> for RepositoryError {
    fn from(s: String) -> Self {
        RepositoryError::InternalError(s)
    }
}

impl From<&str> for RepositoryError {
    fn from(s: &str) -> Self {
        RepositoryError::InternalError(s.to_string())
    }
}

#[cfg(feature = "postgres-repo")]
impl From<diesel::result::Error> for RepositoryError {
    fn from(err: diesel::result::Error) -> Self {
        use diesel::result::{DatabaseErrorKind, Error};

        match err {
            Error::NotFound => RepositoryError::NotFound("Record not found".to_string()),
            Error::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
                RepositoryError::UniqueViolation {
                    constraint: info
                        .constraint_name()
                        .unwrap_or("unknown")
                        .to_string(),
                }
            }
            Error::DatabaseError(kind, info) => RepositoryError::QueryError(format!(
                "{} (kind: {:?})",
                info.message(),
                kind
            )),
            other => RepositoryError::QueryError(other.to_string()),
        }
    }
}

#[cfg(feature = "postgres-repo")]
impl From<diesel::r2d2::PoolError> for RepositoryError {
    fn from(err: diesel::r2d2::PoolError) -> Self {
        RepositoryError::ConnectionError(err.to_string())
    }
}

/// User storage operations.
///
/// # Thread Safety
/// Implementations must be `Send + Sync` to be shared across request tasks.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// List users ordered by creation time, newest first.
    async fn list_users(&self, pagination: &Pagination) -> RepositoryResult<Vec<User>>;

    async fn find_user(&self, user_id: Uuid) -> RepositoryResult<Option<User>>;

    /// Unique lookup used for idempotent seeding and diagnostics.
    async fn find_user_by_email(&self, email: &str) -> RepositoryResult<Option<User>>;

    /// Insert a user. Fails with [`RepositoryError::UniqueViolation`] on a
    /// duplicate email.
    async fn create_user(&self, new_user: &NewUser) -> RepositoryResult<User>;

    async fn update_user(&self, user_id: Uuid, changes: &UserChanges) -> RepositoryResult<User>;

    /// Delete a user and return the deleted row. Dependent categories and
    /// transactions are removed by the storage engine.
    async fn delete_user(&self, user_id: Uuid) -> RepositoryResult<User>;
}

/// Expense-category storage operations. All reads and writes are scoped to
/// `(user_id, category_id)`; an id that exists under another owner behaves
/// exactly like a missing one.
#[async_trait]
pub trait CategoryRepository: Send + Sync {
    /// List a user's categories ordered by name.
    async fn list_categories(&self, user_id: Uuid) -> RepositoryResult<Vec<ExpenseCategory>>;

    async fn find_category(
        &self,
        user_id: Uuid,
        category_id: Uuid,
    ) -> RepositoryResult<Option<ExpenseCategory>>;

    /// Insert a category. Fails with [`RepositoryError::UniqueViolation`]
    /// when the user already has a category with the same name.
    async fn create_category(
        &self,
        user_id: Uuid,
        new_category: &NewCategory,
    ) -> RepositoryResult<ExpenseCategory>;

    async fn update_category(
        &self,
        user_id: Uuid,
        category_id: Uuid,
        changes: &CategoryChanges,
    ) -> RepositoryResult<ExpenseCategory>;

    /// Delete a category and return the deleted row. Transactions that
    /// referenced it keep existing with their category reference cleared.
    async fn delete_category(
        &self,
        user_id: Uuid,
        category_id: Uuid,
    ) -> RepositoryResult<ExpenseCategory>;
}

/// Transaction storage operations, scoped like [`CategoryRepository`].
#[async_trait]
pub trait TransactionRepository: Send + Sync {
    /// List a user's transactions ordered by transaction date, newest first,
    /// then by creation time, newest first.
    async fn list_transactions(
        &self,
        user_id: Uuid,
        filter: &TransactionFilter,
    ) -> RepositoryResult<Vec<TransactionWithCategory>>;

    async fn find_transaction(
        &self,
        user_id: Uuid,
        transaction_id: Uuid,
    ) -> RepositoryResult<Option<TransactionWithCategory>>;

    async fn create_transaction(
        &self,
        user_id: Uuid,
        new_transaction: &NewTransaction,
    ) -> RepositoryResult<TransactionWithCategory>;

    async fn update_transaction(
        &self,
        user_id: Uuid,
        transaction_id: Uuid,
        changes: &TransactionChanges,
    ) -> RepositoryResult<TransactionWithCategory>;

    async fn delete_transaction(
        &self,
        user_id: Uuid,
        transaction_id: Uuid,
    ) -> RepositoryResult<TransactionWithCategory>;
}

/// Combined repository interface used by the service layer.
pub trait FullRepository: UserRepository + CategoryRepository + TransactionRepository {}

impl<T> FullRepository for T where T: UserRepository + CategoryRepository + TransactionRepository {}
