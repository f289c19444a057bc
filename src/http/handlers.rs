//! HTTP handlers for the REST API.
//!
//! Each handler validates raw input through the schema layer, delegates to
//! the service layer, and maps the result to a response DTO. Errors bubble
//! up as [`AppError`] and are translated centrally in [`super::error`].

use std::collections::HashMap;

use axum::{
    extract::{Path, Query, State},
    http::{Method, StatusCode, Uri},
    Json,
};
use chrono::Utc;
use serde_json::Value;

use super::dto::{CategoryDto, HealthDto, TransactionDto, UserDto};
use super::error::ErrorBody;
use super::state::AppState;
use crate::error::AppError;
use crate::services;
use crate::validation;

/// Result type for handlers.
pub type HandlerResult<T> = Result<Json<T>, AppError>;

/// Result type for create handlers (201 + body).
pub type CreatedResult<T> = Result<(StatusCode, Json<T>), AppError>;

// =============================================================================
// Health Check
// =============================================================================

/// GET /api/health
pub async fn health(State(state): State<AppState>) -> HandlerResult<HealthDto> {
    Ok(Json(HealthDto {
        status: "ok".to_string(),
        environment: state.environment.clone(),
        timestamp: Utc::now().to_rfc3339(),
    }))
}

// =============================================================================
// Users
// =============================================================================

/// GET /api/users
pub async fn list_users(
    State(state): State<AppState>,
    Query(query): Query<HashMap<String, String>>,
) -> HandlerResult<Vec<UserDto>> {
    let pagination = validation::common::parse_pagination_query(&query)?;
    let users = services::users::list_users(state.repository.as_ref(), &pagination).await?;
    Ok(Json(users.into_iter().map(UserDto::from).collect()))
}

/// GET /api/users/{userId}
pub async fn get_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> HandlerResult<UserDto> {
    let user_id = validation::common::parse_user_param(&user_id)?;
    let user = services::users::get_user_by_id(state.repository.as_ref(), user_id).await?;
    Ok(Json(user.into()))
}

/// POST /api/users
pub async fn create_user(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> CreatedResult<UserDto> {
    let input = validation::users::parse_create_user(&body)?;
    let user = services::users::create_user(state.repository.as_ref(), input).await?;
    Ok((StatusCode::CREATED, Json(user.into())))
}

/// PATCH /api/users/{userId}
pub async fn update_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Json(body): Json<Value>,
) -> HandlerResult<UserDto> {
    let user_id = validation::common::parse_user_param(&user_id)?;
    let input = validation::users::parse_update_user(&body)?;
    let user = services::users::update_user(state.repository.as_ref(), user_id, input).await?;
    Ok(Json(user.into()))
}

/// DELETE /api/users/{userId}
pub async fn delete_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> HandlerResult<UserDto> {
    let user_id = validation::common::parse_user_param(&user_id)?;
    let user = services::users::delete_user(state.repository.as_ref(), user_id).await?;
    Ok(Json(user.into()))
}

// =============================================================================
// Expense Categories
// =============================================================================

/// GET /api/users/{userId}/expense-categories
pub async fn list_categories(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> HandlerResult<Vec<CategoryDto>> {
    let user_id = validation::common::parse_user_param(&user_id)?;
    let categories =
        services::expense_categories::list_categories(state.repository.as_ref(), user_id).await?;
    Ok(Json(categories.into_iter().map(CategoryDto::from).collect()))
}

/// GET /api/users/{userId}/expense-categories/{categoryId}
pub async fn get_category(
    State(state): State<AppState>,
    Path((user_id, category_id)): Path<(String, String)>,
) -> HandlerResult<CategoryDto> {
    let (user_id, category_id) =
        validation::common::parse_scoped_params("categoryId", &user_id, &category_id)?;
    let category = services::expense_categories::get_category_by_id(
        state.repository.as_ref(),
        user_id,
        category_id,
    )
    .await?;
    Ok(Json(category.into()))
}

/// POST /api/users/{userId}/expense-categories
pub async fn create_category(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Json(body): Json<Value>,
) -> CreatedResult<CategoryDto> {
    let user_id = validation::common::parse_user_param(&user_id)?;
    let input = validation::expense_categories::parse_create_category(&body)?;
    let category =
        services::expense_categories::create_category(state.repository.as_ref(), user_id, input)
            .await?;
    Ok((StatusCode::CREATED, Json(category.into())))
}

/// PATCH /api/users/{userId}/expense-categories/{categoryId}
pub async fn update_category(
    State(state): State<AppState>,
    Path((user_id, category_id)): Path<(String, String)>,
    Json(body): Json<Value>,
) -> HandlerResult<CategoryDto> {
    let (user_id, category_id) =
        validation::common::parse_scoped_params("categoryId", &user_id, &category_id)?;
    let input = validation::expense_categories::parse_update_category(&body)?;
    let category = services::expense_categories::update_category(
        state.repository.as_ref(),
        user_id,
        category_id,
        input,
    )
    .await?;
    Ok(Json(category.into()))
}

/// DELETE /api/users/{userId}/expense-categories/{categoryId}
pub async fn delete_category(
    State(state): State<AppState>,
    Path((user_id, category_id)): Path<(String, String)>,
) -> HandlerResult<CategoryDto> {
    let (user_id, category_id) =
        validation::common::parse_scoped_params("categoryId", &user_id, &category_id)?;
    let category = services::expense_categories::delete_category(
        state.repository.as_ref(),
        user_id,
        category_id,
    )
    .await?;
    Ok(Json(category.into()))
}

// =============================================================================
// Transactions
// =============================================================================

/// GET /api/users/{userId}/transactions
pub async fn list_transactions(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Query(query): Query<HashMap<String, String>>,
) -> HandlerResult<Vec<TransactionDto>> {
    let user_id = validation::common::parse_user_param(&user_id)?;
    let filter = validation::transactions::parse_list_transactions_query(&query)?;
    let transactions =
        services::transactions::list_transactions(state.repository.as_ref(), user_id, filter)
            .await?;
    Ok(Json(
        transactions.into_iter().map(TransactionDto::from).collect(),
    ))
}

/// GET /api/users/{userId}/transactions/{transactionId}
pub async fn get_transaction(
    State(state): State<AppState>,
    Path((user_id, transaction_id)): Path<(String, String)>,
) -> HandlerResult<TransactionDto> {
    let (user_id, transaction_id) =
        validation::common::parse_scoped_params("transactionId", &user_id, &transaction_id)?;
    let transaction = services::transactions::get_transaction_by_id(
        state.repository.as_ref(),
        user_id,
        transaction_id,
    )
    .await?;
    Ok(Json(transaction.into()))
}

/// POST /api/users/{userId}/transactions
pub async fn create_transaction(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Json(body): Json<Value>,
) -> CreatedResult<TransactionDto> {
    let user_id = validation::common::parse_user_param(&user_id)?;
    let input = validation::transactions::parse_create_transaction(&body)?;
    let transaction =
        services::transactions::create_transaction(state.repository.as_ref(), user_id, input)
            .await?;
    Ok((StatusCode::CREATED, Json(transaction.into())))
}

/// PATCH /api/users/{userId}/transactions/{transactionId}
pub async fn update_transaction(
    State(state): State<AppState>,
    Path((user_id, transaction_id)): Path<(String, String)>,
    Json(body): Json<Value>,
) -> HandlerResult<TransactionDto> {
    let (user_id, transaction_id) =
        validation::common::parse_scoped_params("transactionId", &user_id, &transaction_id)?;
    let input = validation::transactions::parse_update_transaction(&body)?;
    let transaction = services::transactions::update_transaction(
        state.repository.as_ref(),
        user_id,
        transaction_id,
        input,
    )
    .await?;
    Ok(Json(transaction.into()))
}

/// DELETE /api/users/{userId}/transactions/{transactionId}
pub async fn delete_transaction(
    State(state): State<AppState>,
    Path((user_id, transaction_id)): Path<(String, String)>,
) -> HandlerResult<TransactionDto> {
    let (user_id, transaction_id) =
        validation::common::parse_scoped_params("transactionId", &user_id, &transaction_id)?;
    let transaction = services::transactions::delete_transaction(
        state.repository.as_ref(),
        user_id,
        transaction_id,
    )
    .await?;
    Ok(Json(transaction.into()))
}

// =============================================================================
// Fallback
// =============================================================================

/// 404 for unmatched routes.
pub async fn route_not_found(method: Method, uri: Uri) -> (StatusCode, Json<ErrorBody>) {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorBody::message(format!(
            "Route not found: {} {}",
            method,
            uri.path()
        ))),
    )
}
