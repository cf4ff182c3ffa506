//! HTTP inbound adapter exposing the todo REST endpoints.

pub mod error;
pub mod state;
pub mod todos;

pub use error::{ApiError, ApiResult, ProblemDetails};
