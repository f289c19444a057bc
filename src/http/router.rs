//! Router configuration for the HTTP API.
//!
//! This module sets up all routes, middleware (CORS, compression, tracing,
//! request ids), and creates the axum router ready for serving.

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::get,
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers;
use super::request_id;
use super::state::AppState;

/// Create the main application router with all routes and middleware.
pub fn create_router(state: AppState) -> Router {
    // CORS configuration - permissive for development, should be restricted in production
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api = Router::new()
        .route("/health", get(handlers::health))
        // User CRUD
        .route(
            "/users",
            get(handlers::list_users).post(handlers::create_user),
        )
        .route(
            "/users/{user_id}",
            get(handlers::get_user)
                .patch(handlers::update_user)
                .delete(handlers::delete_user),
        )
        // Expense categories, scoped per user
        .route(
            "/users/{user_id}/expense-categories",
            get(handlers::list_categories).post(handlers::create_category),
        )
        .route(
            "/users/{user_id}/expense-categories/{category_id}",
            get(handlers::get_category)
                .patch(handlers::update_category)
                .delete(handlers::delete_category),
        )
        // Transactions, scoped per user
        .route(
            "/users/{user_id}/transactions",
            get(handlers::list_transactions).post(handlers::create_transaction),
        )
        .route(
            "/users/{user_id}/transactions/{transaction_id}",
            get(handlers::get_transaction)
                .patch(handlers::update_transaction)
                .delete(handlers::delete_transaction),
        );

    Router::new()
        .nest("/api", api)
        .fallback(handlers::route_not_found)
        // Innermost first: the request-id layer must see uncompressed bodies.
        .layer(middleware::from_fn(request_id::attach_request_id))
        .layer(DefaultBodyLimit::max(1024 * 1024))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

#[cfg(all(test, feature = "local-repo"))]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::db::repositories::LocalRepository;
    use crate::db::repository::FullRepository;

    #[test]
    fn test_router_creation() {
        let repo = Arc::new(LocalRepository::new()) as Arc<dyn FullRepository>;
        let state = AppState::new(repo, "test");
        let _router = create_router(state);
        // If we got here, router was created successfully
    }
}
