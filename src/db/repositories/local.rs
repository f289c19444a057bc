//! In-memory repository implementation.
//!
//! Stores all data in HashMaps behind an `RwLock`, enforcing the same
//! constraints the Postgres schema does: global email uniqueness, per-user
//! category-name uniqueness, cascade on user delete, and set-null on
//! category delete. Used for local development and as the test backend.

use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::db::models::{
    CategoryChanges, CategorySummary, ExpenseCategory, NewCategory, NewTransaction, NewUser,
    Pagination, Transaction, TransactionChanges, TransactionFilter, TransactionWithCategory,
    User, UserChanges,
};
use crate::db::repository::{
    constraints, CategoryRepository, RepositoryError, RepositoryResult, TransactionRepository,
    UserRepository,
};

/// In-memory repository backend.
#[derive(Clone, Default)]
pub struct LocalRepository {
    data: Arc<RwLock<Store>>,
}

#[derive(Default)]
struct Store {
    users: HashMap<Uuid, User>,
    categories: HashMap<Uuid, ExpenseCategory>,
    transactions: HashMap<Uuid, Transaction>,
}

impl LocalRepository {
    /// Create a new empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, Store> {
        self.data.read().expect("repository lock poisoned")
    }

    fn write(&self) -> RwLockWriteGuard<'_, Store> {
        self.data.write().expect("repository lock poisoned")
    }
}

fn paginate<T>(items: Vec<T>, take: Option<i64>, skip: Option<i64>) -> Vec<T> {
    let skip = skip.unwrap_or(0).max(0) as usize;
    let take = take.map_or(usize::MAX, |t| t.max(0) as usize);
    items.into_iter().skip(skip).take(take).collect()
}

fn with_category(store: &Store, transaction: Transaction) -> TransactionWithCategory {
    let category = transaction
        .category_id
        .and_then(|id| store.categories.get(&id))
        .map(CategorySummary::from);
    TransactionWithCategory {
        transaction,
        category,
    }
}

#[async_trait]
impl UserRepository for LocalRepository {
    async fn list_users(&self, pagination: &Pagination) -> RepositoryResult<Vec<User>> {
        let store = self.read();
        let mut users: Vec<User> = store.users.values().cloned().collect();
        users.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(paginate(users, pagination.take, pagination.skip))
    }

    async fn find_user(&self, user_id: Uuid) -> RepositoryResult<Option<User>> {
        Ok(self.read().users.get(&user_id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> RepositoryResult<Option<User>> {
        Ok(self
            .read()
            .users
            .values()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn create_user(&self, new_user: &NewUser) -> RepositoryResult<User> {
        let mut store = self.write();
        if store.users.values().any(|u| u.email == new_user.email) {
            return Err(RepositoryError::UniqueViolation {
                constraint: constraints::USERS_EMAIL.to_string(),
            });
        }

        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            name: new_user.name.clone(),
            email: new_user.email.clone(),
            password_hash: new_user.password_hash.clone(),
            default_currency: new_user.default_currency.clone(),
            created_at: now,
            updated_at: now,
        };
        store.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn update_user(&self, user_id: Uuid, changes: &UserChanges) -> RepositoryResult<User> {
        let mut store = self.write();
        if let Some(email) = &changes.email {
            if store
                .users
                .values()
                .any(|u| u.id != user_id && u.email == *email)
            {
                return Err(RepositoryError::UniqueViolation {
                    constraint: constraints::USERS_EMAIL.to_string(),
                });
            }
        }

        let user = store
            .users
            .get_mut(&user_id)
            .ok_or_else(|| RepositoryError::NotFound("User record not found".to_string()))?;
        if let Some(name) = &changes.name {
            user.name = name.clone();
        }
        if let Some(email) = &changes.email {
            user.email = email.clone();
        }
        if let Some(password_hash) = &changes.password_hash {
            user.password_hash = password_hash.clone();
        }
        if let Some(default_currency) = &changes.default_currency {
            user.default_currency = default_currency.clone();
        }
        user.updated_at = Utc::now();
        Ok(user.clone())
    }

    async fn delete_user(&self, user_id: Uuid) -> RepositoryResult<User> {
        let mut store = self.write();
        let user = store
            .users
            .remove(&user_id)
            .ok_or_else(|| RepositoryError::NotFound("User record not found".to_string()))?;
        // Same cascade rules the SQL schema declares.
        store.categories.retain(|_, c| c.user_id != user_id);
        store.transactions.retain(|_, t| t.user_id != user_id);
        Ok(user)
    }
}

#[async_trait]
impl CategoryRepository for LocalRepository {
    async fn list_categories(&self, user_id: Uuid) -> RepositoryResult<Vec<ExpenseCategory>> {
        let store = self.read();
        let mut categories: Vec<ExpenseCategory> = store
            .categories
            .values()
            .filter(|c| c.user_id == user_id)
            .cloned()
            .collect();
        categories.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(categories)
    }

    async fn find_category(
        &self,
        user_id: Uuid,
        category_id: Uuid,
    ) -> RepositoryResult<Option<ExpenseCategory>> {
        Ok(self
            .read()
            .categories
            .get(&category_id)
            .filter(|c| c.user_id == user_id)
            .cloned())
    }

    async fn create_category(
        &self,
        user_id: Uuid,
        new_category: &NewCategory,
    ) -> RepositoryResult<ExpenseCategory> {
        let mut store = self.write();
        if store
            .categories
            .values()
            .any(|c| c.user_id == user_id && c.name == new_category.name)
        {
            return Err(RepositoryError::UniqueViolation {
                constraint: constraints::CATEGORY_NAME_PER_USER.to_string(),
            });
        }

        let now = Utc::now();
        let category = ExpenseCategory {
            id: Uuid::new_v4(),
            user_id,
            name: new_category.name.clone(),
            color: new_category.color.clone(),
            icon: new_category.icon.clone(),
            created_at: now,
            updated_at: now,
        };
        store.categories.insert(category.id, category.clone());
        Ok(category)
    }

    async fn update_category(
        &self,
        user_id: Uuid,
        category_id: Uuid,
        changes: &CategoryChanges,
    ) -> RepositoryResult<ExpenseCategory> {
        let mut store = self.write();
        if let Some(name) = &changes.name {
            if store
                .categories
                .values()
                .any(|c| c.user_id == user_id && c.id != category_id && c.name == *name)
            {
                return Err(RepositoryError::UniqueViolation {
                    constraint: constraints::CATEGORY_NAME_PER_USER.to_string(),
                });
            }
        }

        let category = store
            .categories
            .get_mut(&category_id)
            .filter(|c| c.user_id == user_id)
            .ok_or_else(|| RepositoryError::NotFound("Category record not found".to_string()))?;
        if let Some(name) = &changes.name {
            category.name = name.clone();
        }
        if let Some(color) = &changes.color {
            category.color = Some(color.clone());
        }
        category.icon = changes.icon.clone().apply(category.icon.take());
        category.updated_at = Utc::now();
        Ok(category.clone())
    }

    async fn delete_category(
        &self,
        user_id: Uuid,
        category_id: Uuid,
    ) -> RepositoryResult<ExpenseCategory> {
        let mut store = self.write();
        if !store
            .categories
            .get(&category_id)
            .is_some_and(|c| c.user_id == user_id)
        {
            return Err(RepositoryError::NotFound(
                "Category record not found".to_string(),
            ));
        }
        let category = store
            .categories
            .remove(&category_id)
            .ok_or_else(|| RepositoryError::NotFound("Category record not found".to_string()))?;
        // ON DELETE SET NULL equivalent.
        for transaction in store.transactions.values_mut() {
            if transaction.category_id == Some(category_id) {
                transaction.category_id = None;
            }
        }
        Ok(category)
    }
}

#[async_trait]
impl TransactionRepository for LocalRepository {
    async fn list_transactions(
        &self,
        user_id: Uuid,
        filter: &TransactionFilter,
    ) -> RepositoryResult<Vec<TransactionWithCategory>> {
        let store = self.read();
        let mut transactions: Vec<Transaction> = store
            .transactions
            .values()
            .filter(|t| t.user_id == user_id)
            .filter(|t| filter.kind.is_none_or(|kind| t.kind == kind))
            .filter(|t| filter.category_id.is_none_or(|id| t.category_id == Some(id)))
            .filter(|t| filter.from.is_none_or(|from| t.transaction_date >= from))
            .filter(|t| filter.to.is_none_or(|to| t.transaction_date <= to))
            .filter(|t| filter.min_amount.is_none_or(|min| t.amount >= min))
            .filter(|t| filter.max_amount.is_none_or(|max| t.amount <= max))
            .cloned()
            .collect();
        transactions.sort_by(|a, b| {
            b.transaction_date
                .cmp(&a.transaction_date)
                .then(b.created_at.cmp(&a.created_at))
                .then(b.id.cmp(&a.id))
        });
        let transactions = paginate(transactions, filter.take, filter.skip);
        Ok(transactions
            .into_iter()
            .map(|t| with_category(&store, t))
            .collect())
    }

    async fn find_transaction(
        &self,
        user_id: Uuid,
        transaction_id: Uuid,
    ) -> RepositoryResult<Option<TransactionWithCategory>> {
        let store = self.read();
        Ok(store
            .transactions
            .get(&transaction_id)
            .filter(|t| t.user_id == user_id)
            .cloned()
            .map(|t| with_category(&store, t)))
    }

    async fn create_transaction(
        &self,
        user_id: Uuid,
        new_transaction: &NewTransaction,
    ) -> RepositoryResult<TransactionWithCategory> {
        let mut store = self.write();
        let now = Utc::now();
        let transaction = Transaction {
            id: Uuid::new_v4(),
            user_id,
            kind: new_transaction.kind,
            amount: new_transaction.amount,
            description: new_transaction.description.clone(),
            transaction_date: new_transaction.transaction_date,
            category_id: new_transaction.category_id,
            created_at: now,
            updated_at: now,
        };
        store
            .transactions
            .insert(transaction.id, transaction.clone());
        Ok(with_category(&store, transaction))
    }

    async fn update_transaction(
        &self,
        user_id: Uuid,
        transaction_id: Uuid,
        changes: &TransactionChanges,
    ) -> RepositoryResult<TransactionWithCategory> {
        let mut store = self.write();
        let transaction = store
            .transactions
            .get_mut(&transaction_id)
            .filter(|t| t.user_id == user_id)
            .ok_or_else(|| {
                RepositoryError::NotFound("Transaction record not found".to_string())
            })?;

        if let Some(kind) = changes.kind {
            transaction.kind = kind;
        }
        if let Some(amount) = changes.amount {
            transaction.amount = amount;
        }
        transaction.description = changes
            .description
            .clone()
            .apply(transaction.description.take());
        if let Some(transaction_date) = changes.transaction_date {
            transaction.transaction_date = transaction_date;
        }
        transaction.category_id = changes.category_id.apply(transaction.category_id);
        transaction.updated_at = Utc::now();

        let transaction = transaction.clone();
        Ok(with_category(&store, transaction))
    }

    async fn delete_transaction(
        &self,
        user_id: Uuid,
        transaction_id: Uuid,
    ) -> RepositoryResult<TransactionWithCategory> {
        let mut store = self.write();
        if !store
            .transactions
            .get(&transaction_id)
            .is_some_and(|t| t.user_id == user_id)
        {
            return Err(RepositoryError::NotFound(
                "Transaction record not found".to_string(),
            ));
        }
        let transaction = store.transactions.remove(&transaction_id).ok_or_else(|| {
            RepositoryError::NotFound("Transaction record not found".to_string())
        })?;
        Ok(with_category(&store, transaction))
    }
}
