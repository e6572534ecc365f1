//! Observability - request IDs on spans and responses.

mod request_id;

pub use request_id::RequestIdMiddleware;
