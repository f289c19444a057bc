//! Transaction service.
//!
//! Beyond plain CRUD, this module owns the EXPENSE-requires-category
//! invariant: on update it is re-derived from the merged effective state
//! (current row + patch), not from the patch alone.

use uuid::Uuid;

use crate::db::models::{
    NewTransaction, Patch, TransactionChanges, TransactionFilter, TransactionType,
    TransactionWithCategory,
};
use crate::db::repository::{CategoryRepository, FullRepository, TransactionRepository};
use crate::error::{AppError, AppResult};
use crate::validation::transactions::{CreateTransactionInput, UpdateTransactionInput};

const TRANSACTION_NOT_FOUND: &str = "Transaction not found.";
const CATEGORY_NOT_FOUND_FOR_USER: &str = "Expense category not found for this user.";
const EXPENSE_REQUIRES_CATEGORY: &str = "categoryId is required for EXPENSE transactions.";

/// A category reference is only usable when it belongs to the same user.
async fn ensure_category_belongs_to_user(
    repo: &dyn FullRepository,
    user_id: Uuid,
    category_id: Uuid,
) -> AppResult<()> {
    match repo.find_category(user_id, category_id).await? {
        Some(_) => Ok(()),
        None => Err(AppError::not_found(CATEGORY_NOT_FOUND_FOR_USER)),
    }
}

async fn get_transaction_or_not_found(
    repo: &dyn FullRepository,
    user_id: Uuid,
    transaction_id: Uuid,
) -> AppResult<TransactionWithCategory> {
    match repo.find_transaction(user_id, transaction_id).await? {
        Some(transaction) => Ok(transaction),
        None => Err(AppError::not_found(TRANSACTION_NOT_FOUND)),
    }
}

pub async fn list_transactions(
    repo: &dyn FullRepository,
    user_id: Uuid,
    filter: TransactionFilter,
) -> AppResult<Vec<TransactionWithCategory>> {
    super::ensure_user_exists(repo, user_id).await?;
    if let Some(category_id) = filter.category_id {
        ensure_category_belongs_to_user(repo, user_id, category_id).await?;
    }
    Ok(repo.list_transactions(user_id, &filter).await?)
}

pub async fn get_transaction_by_id(
    repo: &dyn FullRepository,
    user_id: Uuid,
    transaction_id: Uuid,
) -> AppResult<TransactionWithCategory> {
    super::ensure_user_exists(repo, user_id).await?;
    get_transaction_or_not_found(repo, user_id, transaction_id).await
}

pub async fn create_transaction(
    repo: &dyn FullRepository,
    user_id: Uuid,
    input: CreateTransactionInput,
) -> AppResult<TransactionWithCategory> {
    super::ensure_user_exists(repo, user_id).await?;

    if input.kind == TransactionType::Expense && input.category_id.is_none() {
        return Err(AppError::bad_request(EXPENSE_REQUIRES_CATEGORY));
    }
    if let Some(category_id) = input.category_id {
        ensure_category_belongs_to_user(repo, user_id, category_id).await?;
    }

    let new_transaction = NewTransaction {
        kind: input.kind,
        amount: input.amount,
        description: input.description,
        transaction_date: input.transaction_date,
        category_id: input.category_id,
    };
    Ok(repo.create_transaction(user_id, &new_transaction).await?)
}

pub async fn update_transaction(
    repo: &dyn FullRepository,
    user_id: Uuid,
    transaction_id: Uuid,
    input: UpdateTransactionInput,
) -> AppResult<TransactionWithCategory> {
    super::ensure_user_exists(repo, user_id).await?;
    let current = get_transaction_or_not_found(repo, user_id, transaction_id).await?;

    let effective_kind = input.kind.unwrap_or(current.transaction.kind);
    let mut effective_category = input.category_id.apply(current.transaction.category_id);
    // Switching to INCOME without touching categoryId drops the stale
    // category reference.
    if input.kind == Some(TransactionType::Income) && input.category_id.is_keep() {
        effective_category = None;
    }

    if effective_kind == TransactionType::Expense && effective_category.is_none() {
        return Err(AppError::bad_request(EXPENSE_REQUIRES_CATEGORY));
    }
    if let Some(category_id) = effective_category {
        ensure_category_belongs_to_user(repo, user_id, category_id).await?;
    }

    // Only write category_id when the patch touched type or categoryId.
    let category_patch = if input.category_id.touched() || input.kind.is_some() {
        match effective_category {
            Some(category_id) => Patch::Set(category_id),
            None => Patch::Clear,
        }
    } else {
        Patch::Keep
    };

    let changes = TransactionChanges {
        kind: input.kind,
        amount: input.amount,
        description: input.description,
        transaction_date: input.transaction_date,
        category_id: category_patch,
    };
    Ok(repo
        .update_transaction(user_id, transaction_id, &changes)
        .await?)
}

pub async fn delete_transaction(
    repo: &dyn FullRepository,
    user_id: Uuid,
    transaction_id: Uuid,
) -> AppResult<TransactionWithCategory> {
    super::ensure_user_exists(repo, user_id).await?;
    get_transaction_or_not_found(repo, user_id, transaction_id).await?;
    Ok(repo.delete_transaction(user_id, transaction_id).await?)
}
