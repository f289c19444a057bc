//! Fintrack backend library.
//!
//! A personal-finance REST API: users, per-user expense categories, and
//! transactions, persisted through a swappable repository backend.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │  HTTP Layer (axum handlers)                               │
//! │  - Schema validation of params/query/body                 │
//! │  - JSON serialization, CORS, compression, request ids     │
//! └───────────────────┬──────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼──────────────────────────────────────┐
//! │  Service Layer (services/)                                │
//! │  - Existence and ownership checks                         │
//! │  - Conflict translation, response shaping                 │
//! └───────────────────┬──────────────────────────────────────┘
//! ┌───────────────────▼──────────────────────────────────────┐
//! │  Repository Layer (db/)                                   │
//! │  - LocalRepository / PostgresRepository                   │
//! └──────────────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod db;
pub mod error;
pub mod services;
pub mod validation;

#[cfg(feature = "http-server")]
pub mod http;
