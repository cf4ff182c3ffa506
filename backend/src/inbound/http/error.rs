//! HTTP adapter mapping for service errors.
//!
//! Every failure leaves the API as an RFC 9457 problem document served with
//! `application/problem+json`. Internal causes are logged here and replaced
//! by a fixed detail so store messages never reach clients.

use std::fmt;

use actix_web::{HttpRequest, HttpResponse, ResponseError, http::StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, error};
use utoipa::ToSchema;

use crate::domain::TodoServiceError;

pub const PROBLEM_CONTENT_TYPE: &str = "application/problem+json";
pub const NOT_FOUND_TYPE: &str = "https://example.com/errors/not-found";
pub const BAD_REQUEST_TYPE: &str = "https://example.com/errors/bad-request";
pub const SERVER_ERROR_TYPE: &str = "https://example.com/errors/server-error";
const SERVER_ERROR_DETAIL: &str = "Unhandled error, please try again later";

/// Convenient result alias for HTTP handlers.
pub type ApiResult<T> = Result<T, ApiError>;

/// Problem document returned for every error response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ProblemDetails {
    /// URI identifying the problem kind.
    #[serde(rename = "type")]
    #[schema(example = "https://example.com/errors/not-found")]
    pub problem_type: String,
    /// Reason phrase of `status`.
    #[schema(example = "Not Found")]
    pub title: String,
    #[schema(example = 404)]
    pub status: u16,
    #[schema(example = "Todo not found: todoId=3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    pub detail: String,
    /// Path of the request that failed.
    #[schema(example = "/api/v1/todos/3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    pub instance: String,
}

/// Handler error carrying everything needed to render a problem document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    status: StatusCode,
    problem_type: &'static str,
    detail: String,
    instance: String,
}

impl ApiError {
    /// A request the client must fix before retrying.
    pub fn bad_request(detail: impl Into<String>, instance: impl Into<String>) -> Self {
        let detail = detail.into();
        debug!(%detail, "rejecting bad request");
        Self {
            status: StatusCode::BAD_REQUEST,
            problem_type: BAD_REQUEST_TYPE,
            detail,
            instance: instance.into(),
        }
    }

    /// No todo exists under `id`, which may be any client-supplied string.
    pub fn todo_not_found(id: impl fmt::Display, instance: impl Into<String>) -> Self {
        debug!(todo_id = %id, "todo not found");
        Self {
            status: StatusCode::NOT_FOUND,
            problem_type: NOT_FOUND_TYPE,
            detail: format!("Todo not found: todoId={id}"),
            instance: instance.into(),
        }
    }

    /// An internal failure; `cause` is logged and withheld from the client.
    pub fn server_error(cause: impl fmt::Display, instance: impl Into<String>) -> Self {
        let instance = instance.into();
        error!(%cause, %instance, "unhandled error");
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            problem_type: SERVER_ERROR_TYPE,
            detail: SERVER_ERROR_DETAIL.to_owned(),
            instance,
        }
    }

    /// Map a service failure for the request at `instance`.
    pub fn from_service(err: TodoServiceError, instance: impl Into<String>) -> Self {
        match err {
            TodoServiceError::TodoNotFound { id } => Self::todo_not_found(id, instance),
            TodoServiceError::Unhandled { message } => Self::server_error(message, instance),
        }
    }

    pub fn problem(&self) -> ProblemDetails {
        ProblemDetails {
            problem_type: self.problem_type.to_owned(),
            title: self
                .status
                .canonical_reason()
                .unwrap_or("Unknown Status")
                .to_owned(),
            status: self.status.as_u16(),
            detail: self.detail.clone(),
            instance: self.instance.clone(),
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}: {}", self.status.as_u16(), self.instance, self.detail)
    }
}

impl std::error::Error for ApiError {}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        self.status
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status)
            .content_type(PROBLEM_CONTENT_TYPE)
            .json(self.problem())
    }
}

/// Attach the request path to service failures.
pub trait ServiceResultExt<T> {
    fn or_problem(self, request: &HttpRequest) -> ApiResult<T>;
}

impl<T> ServiceResultExt<T> for Result<T, TodoServiceError> {
    fn or_problem(self, request: &HttpRequest) -> ApiResult<T> {
        self.map_err(|err| ApiError::from_service(err, request.path()))
    }
}
