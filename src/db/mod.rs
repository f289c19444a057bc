//! Persistence module.
//!
//! Storage is abstracted behind the repository traits in [`repository`],
//! letting backends be swapped without touching the service layer:
//!
//! - `repositories::local`: in-memory implementation (development, tests)
//! - `repositories::postgres`: PostgreSQL implementation with Diesel ORM
//!
//! Repositories are constructed explicitly via [`factory::RepositoryFactory`]
//! and injected into the service layer at startup.

#[cfg(not(any(feature = "postgres-repo", feature = "local-repo")))]
compile_error!("Enable at least one repository backend feature.");

pub mod factory;
pub mod models;
pub mod repositories;
pub mod repository;

pub use factory::{RepositoryFactory, RepositoryType};
#[cfg(feature = "local-repo")]
pub use repositories::LocalRepository;
#[cfg(feature = "postgres-repo")]
pub use repositories::{PostgresConfig, PostgresRepository};
pub use repository::{FullRepository, RepositoryError, RepositoryResult};
