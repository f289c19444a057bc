//! User service: CRUD with global email uniqueness and safe-user shaping.

use log::info;
use uuid::Uuid;

use super::USER_NOT_FOUND;
use crate::db::models::{NewUser, Pagination, SafeUser, UserChanges};
use crate::db::repository::{FullRepository, RepositoryError, UserRepository};
use crate::error::{AppError, AppResult};
use crate::validation::users::{CreateUserInput, UpdateUserInput};

const EMAIL_CONFLICT: &str = "A user with this email already exists.";

pub async fn list_users(
    repo: &dyn FullRepository,
    pagination: &Pagination,
) -> AppResult<Vec<SafeUser>> {
    let users = repo.list_users(pagination).await?;
    Ok(users.into_iter().map(SafeUser::from).collect())
}

pub async fn get_user_by_id(repo: &dyn FullRepository, user_id: Uuid) -> AppResult<SafeUser> {
    match repo.find_user(user_id).await? {
        Some(user) => Ok(user.into()),
        None => Err(AppError::not_found(USER_NOT_FOUND)),
    }
}

pub async fn create_user(
    repo: &dyn FullRepository,
    input: CreateUserInput,
) -> AppResult<SafeUser> {
    let new_user = NewUser {
        name: input.name,
        email: input.email,
        password_hash: input.password_hash,
        default_currency: input.default_currency,
    };

    match repo.create_user(&new_user).await {
        Ok(user) => {
            info!("created user {}", user.id);
            Ok(user.into())
        }
        Err(RepositoryError::UniqueViolation { .. }) => Err(AppError::conflict(EMAIL_CONFLICT)),
        Err(err) => Err(err.into()),
    }
}

pub async fn update_user(
    repo: &dyn FullRepository,
    user_id: Uuid,
    input: UpdateUserInput,
) -> AppResult<SafeUser> {
    // 404 before 409: a missing user must not leak conflict information.
    super::ensure_user_exists(repo, user_id).await?;

    let changes = UserChanges {
        name: input.name,
        email: input.email,
        password_hash: input.password_hash,
        default_currency: input.default_currency,
    };

    match repo.update_user(user_id, &changes).await {
        Ok(user) => Ok(user.into()),
        Err(RepositoryError::UniqueViolation { .. }) => Err(AppError::conflict(EMAIL_CONFLICT)),
        Err(err) => Err(err.into()),
    }
}

pub async fn delete_user(repo: &dyn FullRepository, user_id: Uuid) -> AppResult<SafeUser> {
    super::ensure_user_exists(repo, user_id).await?;
    let user = repo.delete_user(user_id).await?;
    info!("deleted user {}", user.id);
    Ok(user.into())
}
