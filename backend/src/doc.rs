//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every todo endpoint and the payload schemas they
//! exchange, including the problem document returned on failure. Swagger UI
//! serves it in debug builds.

use crate::inbound::http::ProblemDetails;
use crate::inbound::http::todos::{
    CreateTodoRequest, PaginationResponse, TodoListResponse, TodoResponse, UpdateTodoRequest,
};
use utoipa::OpenApi;

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Todo API",
        description = "CRUD interface for todo items backed by a transactional store."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::todos::list_todos,
        crate::inbound::http::todos::get_todo,
        crate::inbound::http::todos::create_todo,
        crate::inbound::http::todos::update_todo,
        crate::inbound::http::todos::delete_todo,
    ),
    components(schemas(
        TodoResponse,
        TodoListResponse,
        PaginationResponse,
        CreateTodoRequest,
        UpdateTodoRequest,
        ProblemDetails
    )),
    tags(
        (name = "todos", description = "Operations on todo items")
    )
)]
pub struct ApiDoc;
