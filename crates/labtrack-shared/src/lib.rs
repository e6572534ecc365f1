//! # LabTrack Shared
//!
//! Wire types shared by the API server and its clients: request bodies,
//! list query parameters and response envelopes.

pub mod dto;
pub mod query;
pub mod response;

pub use response::{ApiResponse, ErrorResponse, PaginatedResponse};
