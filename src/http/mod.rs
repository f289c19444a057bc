//! HTTP server module.
//!
//! Exposes the service layer as an axum REST API under `/api`. Handlers
//! validate raw input through the schema layer, call into the services, and
//! translate every error exactly once at this boundary.

pub mod dto;
pub mod error;
pub mod handlers;
pub mod request_id;
pub mod router;
pub mod state;

pub use router::create_router;
pub use state::AppState;
