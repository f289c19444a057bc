//! Domain service layer.
//!
//! Per-entity business logic that sits between the HTTP handlers and the
//! repository: existence and ownership checks, invariant re-evaluation on
//! updates, uniqueness-conflict translation, and response shaping. Services
//! raise [`crate::error::AppError`] for every business-rule violation and
//! never retry a failed repository call.

pub mod expense_categories;
pub mod transactions;
pub mod users;

use uuid::Uuid;

use crate::db::repository::{FullRepository, UserRepository};
use crate::error::{AppError, AppResult};

pub(crate) const USER_NOT_FOUND: &str = "User not found.";

/// Confirm the owning user exists before touching any dependent entity.
pub(crate) async fn ensure_user_exists(
    repo: &dyn FullRepository,
    user_id: Uuid,
) -> AppResult<()> {
    match repo.find_user(user_id).await? {
        Some(_) => Ok(()),
        None => Err(AppError::not_found(USER_NOT_FOUND)),
    }
}
