//! # LabTrack Infrastructure
//!
//! Concrete implementations of the ports defined in `labtrack-core`:
//! storage, token signing, password hashing, the email queue and reports.
//!
//! ## Feature Flags
//!
//! - `full` (default) - All features enabled
//! - `minimal` - No external dependencies, in-memory only
//! - `postgres` - PostgreSQL storage via SeaORM
//! - `auth` - JWT + Argon2 authentication

pub mod database;
pub mod jobs;
pub mod mail;
pub mod report;

#[cfg(feature = "auth")]
pub mod auth;

// Re-exports - In-Memory
pub use database::InMemoryDatabase;
pub use jobs::{InMemoryJobQueue, InMemoryJobQueueConfig};
pub use mail::{LogMailer, email_job_handler};
pub use report::CsvReportGenerator;

#[cfg(feature = "auth")]
pub use auth::{Argon2PasswordService, JwtConfig, JwtTokenService};

// Re-exports - PostgreSQL
#[cfg(feature = "postgres")]
pub use database::{DatabaseConfig, connect};
