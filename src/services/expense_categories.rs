//! Expense-category service: per-user CRUD with scoped lookups and
//! per-user name uniqueness.

use uuid::Uuid;

use crate::db::models::{CategoryChanges, ExpenseCategory, NewCategory};
use crate::db::repository::{CategoryRepository, FullRepository, RepositoryError};
use crate::error::{AppError, AppResult};
use crate::validation::expense_categories::{CreateCategoryInput, UpdateCategoryInput};

const CATEGORY_NOT_FOUND: &str = "Expense category not found.";
const NAME_CONFLICT: &str = "A category with this name already exists for this user.";

/// Scoped fetch: an id owned by another user is indistinguishable from a
/// missing one.
async fn get_category_or_not_found(
    repo: &dyn FullRepository,
    user_id: Uuid,
    category_id: Uuid,
) -> AppResult<ExpenseCategory> {
    match repo.find_category(user_id, category_id).await? {
        Some(category) => Ok(category),
        None => Err(AppError::not_found(CATEGORY_NOT_FOUND)),
    }
}

pub async fn list_categories(
    repo: &dyn FullRepository,
    user_id: Uuid,
) -> AppResult<Vec<ExpenseCategory>> {
    super::ensure_user_exists(repo, user_id).await?;
    Ok(repo.list_categories(user_id).await?)
}

pub async fn get_category_by_id(
    repo: &dyn FullRepository,
    user_id: Uuid,
    category_id: Uuid,
) -> AppResult<ExpenseCategory> {
    super::ensure_user_exists(repo, user_id).await?;
    get_category_or_not_found(repo, user_id, category_id).await
}

pub async fn create_category(
    repo: &dyn FullRepository,
    user_id: Uuid,
    input: CreateCategoryInput,
) -> AppResult<ExpenseCategory> {
    super::ensure_user_exists(repo, user_id).await?;

    let new_category = NewCategory {
        name: input.name,
        color: input.color,
        icon: input.icon,
    };

    match repo.create_category(user_id, &new_category).await {
        Ok(category) => Ok(category),
        Err(RepositoryError::UniqueViolation { .. }) => Err(AppError::conflict(NAME_CONFLICT)),
        Err(err) => Err(err.into()),
    }
}

pub async fn update_category(
    repo: &dyn FullRepository,
    user_id: Uuid,
    category_id: Uuid,
    input: UpdateCategoryInput,
) -> AppResult<ExpenseCategory> {
    super::ensure_user_exists(repo, user_id).await?;
    get_category_or_not_found(repo, user_id, category_id).await?;

    let changes = CategoryChanges {
        name: input.name,
        color: input.color,
        icon: input.icon,
    };

    match repo.update_category(user_id, category_id, &changes).await {
        Ok(category) => Ok(category),
        Err(RepositoryError::UniqueViolation { .. }) => Err(AppError::conflict(NAME_CONFLICT)),
        Err(err) => Err(err.into()),
    }
}

pub async fn delete_category(
    repo: &dyn FullRepository,
    user_id: Uuid,
    category_id: Uuid,
) -> AppResult<ExpenseCategory> {
    super::ensure_user_exists(repo, user_id).await?;
    get_category_or_not_found(repo, user_id, category_id).await?;
    Ok(repo.delete_category(user_id, category_id).await?)
}
