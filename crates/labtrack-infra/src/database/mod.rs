//! Storage adapters: SeaORM over PostgreSQL, and an in-memory fallback.

mod memory;

#[cfg(feature = "postgres")]
mod connections;
#[cfg(feature = "postgres")]
mod postgres_base;
#[cfg(feature = "postgres")]
pub mod postgres_repo;

#[cfg(feature = "postgres")]
pub mod entity;

use labtrack_core::error::RepoError;

pub use memory::InMemoryDatabase;

#[cfg(feature = "postgres")]
pub use connections::{DatabaseConfig, connect};

#[cfg(feature = "postgres")]
pub use postgres_repo::{
    PostgresDeviceRepository, PostgresExperimentRepository, PostgresReactorRepository,
    PostgresReadingRepository, PostgresUserRepository,
};

pub(crate) fn not_found(what: &str, id: i64) -> RepoError {
    RepoError::NotFound(format!("{what} with id {id} not found"))
}

#[cfg(feature = "postgres")]
#[cfg(test)]
mod tests;
