//! Repository implementations.
//!
//! - `local`: in-memory implementation for development and tests
//! - `postgres`: PostgreSQL implementation with Diesel ORM

#[cfg(feature = "local-repo")]
pub mod local;
#[cfg(feature = "postgres-repo")]
pub mod postgres;

#[cfg(feature = "local-repo")]
pub use local::LocalRepository;
#[cfg(feature = "postgres-repo")]
pub use postgres::{PostgresConfig, PostgresRepository};
