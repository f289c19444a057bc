//! Postgres repository implementation using Diesel.
//!
//! Connections come from an r2d2 pool; queries run on the blocking thread
//! pool via `tokio::task::spawn_blocking`. Pending migrations are applied
//! when the repository is constructed.
//!
//! ## Configuration
//!
//! Environment variables:
//! - `DATABASE_URL`: connection string (required)
//! - `PG_POOL_MAX`: maximum pool size (default: 10)
//! - `PG_POOL_MIN`: minimum idle connections (default: 1)
//! - `PG_CONN_TIMEOUT_SEC`: connection timeout in seconds (default: 30)

use std::time::Duration;

use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use log::info;
use tokio::task;
use uuid::Uuid;

use crate::db::models::{
    CategoryChanges, CategorySummary, ExpenseCategory, NewCategory, NewTransaction, NewUser,
    Pagination, Transaction, TransactionChanges, TransactionFilter, TransactionWithCategory,
    User, UserChanges,
};
use crate::db::repository::{
    CategoryRepository, RepositoryError, RepositoryResult, TransactionRepository, UserRepository,
};

mod models;
mod schema;

use models::{
    CategoryChangesRow, CategoryRow, NewCategoryRow, NewTransactionRow, NewUserRow,
    TransactionChangesRow, TransactionRow, UserChangesRow, UserRow,
};
use schema::{expense_categories, transactions, users};

type PgPool = Pool<ConnectionManager<PgConnection>>;

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Configuration for connecting to Postgres.
#[derive(Debug, Clone)]
pub struct PostgresConfig {
    /// Database connection URL
    pub database_url: String,
    /// Maximum number of connections in the pool
    pub max_pool_size: u32,
    /// Minimum number of idle connections kept in the pool
    pub min_pool_size: u32,
    /// Connection timeout in seconds
    pub connection_timeout_sec: u64,
}

impl PostgresConfig {
    /// Create configuration from environment variables.
    ///
    /// # Errors
    /// Returns an error if `DATABASE_URL` is not set.
    pub fn from_env() -> Result<Self, String> {
        let database_url =
            std::env::var("DATABASE_URL").map_err(|_| "DATABASE_URL must be set".to_string())?;

        let max_pool_size = std::env::var("PG_POOL_MAX")
            .ok()
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(10);

        let min_pool_size = std::env::var("PG_POOL_MIN")
            .ok()
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(1);

        let connection_timeout_sec = std::env::var("PG_CONN_TIMEOUT_SEC")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(30);

        Ok(Self {
            database_url,
            max_pool_size,
            min_pool_size,
            connection_timeout_sec,
        })
    }
}

/// Postgres-backed repository.
#[derive(Clone)]
pub struct PostgresRepository {
    pool: PgPool,
}

impl PostgresRepository {
    /// Connect to the database, build the pool, and run pending migrations.
    pub async fn new(config: &PostgresConfig) -> RepositoryResult<Self> {
        let manager = ConnectionManager::<PgConnection>::new(&config.database_url);
        let pool = Pool::builder()
            .max_size(config.max_pool_size)
            .min_idle(Some(config.min_pool_size))
            .connection_timeout(Duration::from_secs(config.connection_timeout_sec))
            .build(manager)
            .map_err(|e| RepositoryError::ConnectionError(e.to_string()))?;

        let repo = Self { pool };
        repo.run_migrations().await?;
        info!("Postgres repository initialized");
        Ok(repo)
    }

    async fn run_migrations(&self) -> RepositoryResult<()> {
        self.with_conn(|conn| {
            let applied = conn
                .run_pending_migrations(MIGRATIONS)
                .map_err(|e| RepositoryError::ConfigurationError(format!("migrations: {e}")))?;
            if !applied.is_empty() {
                info!("Applied {} pending migration(s)", applied.len());
            }
            Ok(())
        })
        .await
    }

    /// Run a closure with a pooled connection on the blocking thread pool.
    async fn with_conn<T, F>(&self, f: F) -> RepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> RepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        task::spawn_blocking(move || {
            let mut conn = pool.get()?;
            f(&mut conn)
        })
        .await
        .map_err(|e| RepositoryError::InternalError(format!("blocking task failed: {e}")))?
    }
}

/// Load a transaction row joined with its category, scoped to the owner.
fn load_transaction(
    conn: &mut PgConnection,
    user_id: Uuid,
    transaction_id: Uuid,
) -> RepositoryResult<Option<(TransactionRow, Option<CategoryRow>)>> {
    Ok(transactions::table
        .left_join(expense_categories::table)
        .filter(transactions::id.eq(transaction_id))
        .filter(transactions::user_id.eq(user_id))
        .select((TransactionRow::as_select(), Option::<CategoryRow>::as_select()))
        .get_result(conn)
        .optional()?)
}

fn into_joined(
    row: TransactionRow,
    category: Option<CategoryRow>,
) -> RepositoryResult<TransactionWithCategory> {
    Ok(TransactionWithCategory {
        transaction: Transaction::try_from(row)?,
        category: category.map(CategorySummary::from),
    })
}

#[async_trait]
impl UserRepository for PostgresRepository {
    async fn list_users(&self, pagination: &Pagination) -> RepositoryResult<Vec<User>> {
        let pagination = *pagination;
        self.with_conn(move |conn| {
            let mut query = users::table
                .select(UserRow::as_select())
                .order(users::created_at.desc())
                .into_boxed();
            if let Some(skip) = pagination.skip {
                query = query.offset(skip);
            }
            if let Some(take) = pagination.take {
                query = query.limit(take);
            }
            let rows = query.load::<UserRow>(conn)?;
            Ok(rows.into_iter().map(User::from).collect())
        })
        .await
    }

    async fn find_user(&self, user_id: Uuid) -> RepositoryResult<Option<User>> {
        self.with_conn(move |conn| {
            let row = users::table
                .find(user_id)
                .select(UserRow::as_select())
                .get_result(conn)
                .optional()?;
            Ok(row.map(User::from))
        })
        .await
    }

    async fn find_user_by_email(&self, email: &str) -> RepositoryResult<Option<User>> {
        let email = email.to_string();
        self.with_conn(move |conn| {
            let row = users::table
                .filter(users::email.eq(email))
                .select(UserRow::as_select())
                .get_result(conn)
                .optional()?;
            Ok(row.map(User::from))
        })
        .await
    }

    async fn create_user(&self, new_user: &NewUser) -> RepositoryResult<User> {
        let row = NewUserRow::from_input(new_user);
        self.with_conn(move |conn| {
            let row: UserRow = diesel::insert_into(users::table)
                .values(&row)
                .returning(UserRow::as_returning())
                .get_result(conn)?;
            Ok(row.into())
        })
        .await
    }

    async fn update_user(&self, user_id: Uuid, changes: &UserChanges) -> RepositoryResult<User> {
        let changes = UserChangesRow::from_changes(changes);
        self.with_conn(move |conn| {
            let row: UserRow = diesel::update(users::table.find(user_id))
                .set(&changes)
                .returning(UserRow::as_returning())
                .get_result(conn)?;
            Ok(row.into())
        })
        .await
    }

    async fn delete_user(&self, user_id: Uuid) -> RepositoryResult<User> {
        self.with_conn(move |conn| {
            let row: UserRow = diesel::delete(users::table.find(user_id))
                .returning(UserRow::as_returning())
                .get_result(conn)?;
            Ok(row.into())
        })
        .await
    }
}

#[async_trait]
impl CategoryRepository for PostgresRepository {
    async fn list_categories(&self, user_id: Uuid) -> RepositoryResult<Vec<ExpenseCategory>> {
        self.with_conn(move |conn| {
            let rows = expense_categories::table
                .filter(expense_categories::user_id.eq(user_id))
                .order(expense_categories::name.asc())
                .select(CategoryRow::as_select())
                .load::<CategoryRow>(conn)?;
            Ok(rows.into_iter().map(ExpenseCategory::from).collect())
        })
        .await
    }

    async fn find_category(
        &self,
        user_id: Uuid,
        category_id: Uuid,
    ) -> RepositoryResult<Option<ExpenseCategory>> {
        self.with_conn(move |conn| {
            let row = expense_categories::table
                .filter(expense_categories::id.eq(category_id))
                .filter(expense_categories::user_id.eq(user_id))
                .select(CategoryRow::as_select())
                .get_result(conn)
                .optional()?;
            Ok(row.map(ExpenseCategory::from))
        })
        .await
    }

    async fn create_category(
        &self,
        user_id: Uuid,
        new_category: &NewCategory,
    ) -> RepositoryResult<ExpenseCategory> {
        let row = NewCategoryRow::from_input(user_id, new_category);
        self.with_conn(move |conn| {
            let row: CategoryRow = diesel::insert_into(expense_categories::table)
                .values(&row)
                .returning(CategoryRow::as_returning())
                .get_result(conn)?;
            Ok(row.into())
        })
        .await
    }

    async fn update_category(
        &self,
        user_id: Uuid,
        category_id: Uuid,
        changes: &CategoryChanges,
    ) -> RepositoryResult<ExpenseCategory> {
        let changes = CategoryChangesRow::from_changes(changes);
        self.with_conn(move |conn| {
            let target = expense_categories::table
                .filter(expense_categories::id.eq(category_id))
                .filter(expense_categories::user_id.eq(user_id));
            let row: CategoryRow = diesel::update(target)
                .set(&changes)
                .returning(CategoryRow::as_returning())
                .get_result(conn)?;
            Ok(row.into())
        })
        .await
    }

    async fn delete_category(
        &self,
        user_id: Uuid,
        category_id: Uuid,
    ) -> RepositoryResult<ExpenseCategory> {
        self.with_conn(move |conn| {
            let target = expense_categories::table
                .filter(expense_categories::id.eq(category_id))
                .filter(expense_categories::user_id.eq(user_id));
            let row: CategoryRow = diesel::delete(target)
                .returning(CategoryRow::as_returning())
                .get_result(conn)?;
            Ok(row.into())
        })
        .await
    }
}

#[async_trait]
impl TransactionRepository for PostgresRepository {
    async fn list_transactions(
        &self,
        user_id: Uuid,
        filter: &TransactionFilter,
    ) -> RepositoryResult<Vec<TransactionWithCategory>> {
        let filter = filter.clone();
        self.with_conn(move |conn| {
            let mut query = transactions::table
                .left_join(expense_categories::table)
                .select((
                    TransactionRow::as_select(),
                    Option::<CategoryRow>::as_select(),
                ))
                .filter(transactions::user_id.eq(user_id))
                .order((
                    transactions::transaction_date.desc(),
                    transactions::created_at.desc(),
                ))
                .into_boxed();

            if let Some(kind) = filter.kind {
                query = query.filter(transactions::kind.eq(kind.as_str()));
            }
            if let Some(category_id) = filter.category_id {
                query = query.filter(transactions::category_id.eq(category_id));
            }
            if let Some(from) = filter.from {
                query = query.filter(transactions::transaction_date.ge(from));
            }
            if let Some(to) = filter.to {
                query = query.filter(transactions::transaction_date.le(to));
            }
            if let Some(min_amount) = filter.min_amount {
                query = query.filter(transactions::amount.ge(min_amount));
            }
            if let Some(max_amount) = filter.max_amount {
                query = query.filter(transactions::amount.le(max_amount));
            }
            if let Some(skip) = filter.skip {
                query = query.offset(skip);
            }
            if let Some(take) = filter.take {
                query = query.limit(take);
            }

            let rows = query.load::<(TransactionRow, Option<CategoryRow>)>(conn)?;
            rows.into_iter()
                .map(|(row, category)| into_joined(row, category))
                .collect()
        })
        .await
    }

    async fn find_transaction(
        &self,
        user_id: Uuid,
        transaction_id: Uuid,
    ) -> RepositoryResult<Option<TransactionWithCategory>> {
        self.with_conn(move |conn| {
            match load_transaction(conn, user_id, transaction_id)? {
                Some((row, category)) => Ok(Some(into_joined(row, category)?)),
                None => Ok(None),
            }
        })
        .await
    }

    async fn create_transaction(
        &self,
        user_id: Uuid,
        new_transaction: &NewTransaction,
    ) -> RepositoryResult<TransactionWithCategory> {
        let row = NewTransactionRow::from_input(user_id, new_transaction);
        self.with_conn(move |conn| {
            let row: TransactionRow = diesel::insert_into(transactions::table)
                .values(&row)
                .returning(TransactionRow::as_returning())
                .get_result(conn)?;
            let category = fetch_category(conn, row.category_id)?;
            into_joined(row, category)
        })
        .await
    }

    async fn update_transaction(
        &self,
        user_id: Uuid,
        transaction_id: Uuid,
        changes: &TransactionChanges,
    ) -> RepositoryResult<TransactionWithCategory> {
        let changes = TransactionChangesRow::from_changes(changes);
        self.with_conn(move |conn| {
            let target = transactions::table
                .filter(transactions::id.eq(transaction_id))
                .filter(transactions::user_id.eq(user_id));
            let row: TransactionRow = diesel::update(target)
                .set(&changes)
                .returning(TransactionRow::as_returning())
                .get_result(conn)?;
            let category = fetch_category(conn, row.category_id)?;
            into_joined(row, category)
        })
        .await
    }

    async fn delete_transaction(
        &self,
        user_id: Uuid,
        transaction_id: Uuid,
    ) -> RepositoryResult<TransactionWithCategory> {
        self.with_conn(move |conn| {
            let target = transactions::table
                .filter(transactions::id.eq(transaction_id))
                .filter(transactions::user_id.eq(user_id));
            let row: TransactionRow = diesel::delete(target)
                .returning(TransactionRow::as_returning())
                .get_result(conn)?;
            let category = fetch_category(conn, row.category_id)?;
            into_joined(row, category)
        })
        .await
    }
}

fn fetch_category(
    conn: &mut PgConnection,
    category_id: Option<Uuid>,
) -> RepositoryResult<Option<CategoryRow>> {
    let Some(category_id) = category_id else {
        return Ok(None);
    };
    Ok(expense_categories::table
        .find(category_id)
        .select(CategoryRow::as_select())
        .get_result(conn)
        .optional()?)
}
