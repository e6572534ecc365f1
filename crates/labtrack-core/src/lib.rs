//! # LabTrack Core
//!
//! The domain layer of the LabTrack backend.
//! Entities, filters, pagination and the ports infrastructure must implement.
//! No infrastructure dependencies live here.

pub mod domain;
pub mod error;
pub mod filter;
pub mod pagination;
pub mod ports;
pub mod time;

pub use error::{DomainError, ErrorKind, RepoError};
pub use pagination::{Page, PageRequest, Pagination};
