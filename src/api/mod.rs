//! HTTP API.
//!
//! Exposes the discharge roster, cohort statistics and the chat pipeline
//! as JSON endpoints nested under `/api/`.

pub mod endpoints;
pub mod error;
pub mod middleware;
pub mod router;
pub mod server;
pub mod types;

pub use router::api_router;
pub use server::{serve, ServerError};
pub use types::ApiContext;
