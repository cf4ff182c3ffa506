//! Todo HTTP handlers.
//!
//! ```text
//! GET    /api/v1/todos
//! GET    /api/v1/todos/{id}
//! POST   /api/v1/todos
//! PUT    /api/v1/todos/{id}
//! DELETE /api/v1/todos/{id}
//! ```

use std::num::NonZeroU32;

use actix_web::{HttpRequest, HttpResponse, delete, get, post, put, web};
use chrono::{DateTime, Utc};
use pagination::{Page, PageMetadata};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::domain::ports::ListTodosRequest;
use crate::domain::{TODO_NAME_MAX, Todo, TodoForCreate, TodoForUpdate, TodoId};
use crate::inbound::http::error::{ApiError, ApiResult, ProblemDetails, ServiceResultExt};
use crate::inbound::http::state::HttpState;

/// Todo as returned by every endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TodoResponse {
    pub id: Uuid,
    pub name: String,
    pub completed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Todo> for TodoResponse {
    fn from(value: Todo) -> Self {
        Self {
            id: *value.id.as_uuid(),
            completed: value.is_completed(),
            name: value.name,
            completed_at: value.completed_at,
            created_at: value.created_at,
            updated_at: value.modified_at,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaginationResponse {
    pub page: u32,
    pub page_size: u32,
    pub total_pages: u64,
    pub total_rows: u64,
}

impl From<PageMetadata> for PaginationResponse {
    fn from(value: PageMetadata) -> Self {
        Self {
            page: value.page,
            page_size: value.page_size,
            total_pages: value.total_pages,
            total_rows: value.total_rows,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct TodoListResponse {
    pub data: Vec<TodoResponse>,
    pub pagination: PaginationResponse,
}

impl From<Page<Todo>> for TodoListResponse {
    fn from(page: Page<Todo>) -> Self {
        let pagination = PaginationResponse::from(page.metadata());
        Self {
            data: page.into_data().into_iter().map(TodoResponse::from).collect(),
            pagination,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct CreateTodoRequest {
    #[schema(example = "Buy milk")]
    pub name: String,
}

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct UpdateTodoRequest {
    pub name: String,
    /// `false` reopens the todo. `true` completes it, and absent is treated as
    /// `true`: an open todo is completed and a completed todo keeps its
    /// timestamp.
    #[serde(default)]
    pub completed: Option<bool>,
}

/// Query string accepted by `GET /todos`.
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ListTodosQuery {
    /// Rows per page; defaults to 20.
    pub page_size: Option<u32>,
    /// 1-based page number; defaults to 1.
    pub page: Option<u32>,
    /// Keep only completed (`true`) or open (`false`) todos.
    pub completed: Option<bool>,
}

/// Request values rejected before reaching the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TodoRequestError {
    #[error("pageSize must be greater than zero")]
    ZeroPageSize,
    #[error("page must be greater than zero")]
    ZeroPage,
    #[error("name must not be blank")]
    BlankName,
    #[error("name must be at most {max} characters")]
    NameTooLong { max: usize },
}

fn non_zero(
    value: Option<u32>,
    error: TodoRequestError,
) -> Result<Option<NonZeroU32>, TodoRequestError> {
    value.map(|raw| NonZeroU32::new(raw).ok_or(error)).transpose()
}

fn parse_list_query(query: ListTodosQuery) -> Result<ListTodosRequest, TodoRequestError> {
    Ok(ListTodosRequest {
        page_size: non_zero(query.page_size, TodoRequestError::ZeroPageSize)?,
        page: non_zero(query.page, TodoRequestError::ZeroPage)?,
        completed: query.completed,
    })
}

fn parse_name(name: String) -> Result<String, TodoRequestError> {
    if name.trim().is_empty() {
        return Err(TodoRequestError::BlankName);
    }
    if name.chars().count() > TODO_NAME_MAX {
        return Err(TodoRequestError::NameTooLong { max: TODO_NAME_MAX });
    }
    Ok(name)
}

/// Resolve a path id; a malformed id names no todo, so it reads as missing.
fn parse_todo_id(raw: &str, request: &HttpRequest) -> ApiResult<TodoId> {
    TodoId::parse(raw).map_err(|_| ApiError::todo_not_found(raw, request.path()))
}

fn bad_request(request: &HttpRequest) -> impl FnOnce(TodoRequestError) -> ApiError + '_ {
    move |err| ApiError::bad_request(err.to_string(), request.path())
}

/// List todos one page at a time, oldest first.
#[utoipa::path(
    get,
    path = "/api/v1/todos",
    params(ListTodosQuery),
    responses(
        (status = 200, description = "One page of todos", body = TodoListResponse),
        (status = 400, description = "Invalid paging parameters", body = ProblemDetails),
        (status = 500, description = "Internal server error", body = ProblemDetails)
    ),
    tags = ["todos"],
    operation_id = "listTodos"
)]
#[get("/todos")]
pub async fn list_todos(
    state: web::Data<HttpState>,
    request: HttpRequest,
    query: web::Query<ListTodosQuery>,
) -> ApiResult<web::Json<TodoListResponse>> {
    let list = parse_list_query(query.into_inner()).map_err(bad_request(&request))?;
    let page = state.todos_query.list(list).await.or_problem(&request)?;
    Ok(web::Json(TodoListResponse::from(page)))
}

#[utoipa::path(
    get,
    path = "/api/v1/todos/{id}",
    params(("id" = String, Path, description = "Todo id")),
    responses(
        (status = 200, description = "The todo", body = TodoResponse),
        (status = 404, description = "No todo with this id", body = ProblemDetails),
        (status = 500, description = "Internal server error", body = ProblemDetails)
    ),
    tags = ["todos"],
    operation_id = "getTodo"
)]
#[get("/todos/{id}")]
pub async fn get_todo(
    state: web::Data<HttpState>,
    request: HttpRequest,
    path: web::Path<String>,
) -> ApiResult<web::Json<TodoResponse>> {
    let id = parse_todo_id(&path, &request)?;
    let todo = state.todos_query.get(&id).await.or_problem(&request)?;
    Ok(web::Json(TodoResponse::from(todo)))
}

#[utoipa::path(
    post,
    path = "/api/v1/todos",
    request_body = CreateTodoRequest,
    responses(
        (status = 200, description = "Created todo", body = TodoResponse),
        (status = 400, description = "Invalid request", body = ProblemDetails),
        (status = 500, description = "Internal server error", body = ProblemDetails)
    ),
    tags = ["todos"],
    operation_id = "createTodo"
)]
#[post("/todos")]
pub async fn create_todo(
    state: web::Data<HttpState>,
    request: HttpRequest,
    payload: web::Json<CreateTodoRequest>,
) -> ApiResult<web::Json<TodoResponse>> {
    let name = parse_name(payload.into_inner().name).map_err(bad_request(&request))?;
    let todo = state
        .todos
        .create(TodoForCreate { name })
        .await
        .or_problem(&request)?;
    Ok(web::Json(TodoResponse::from(todo)))
}

/// Rename a todo and optionally complete or reopen it.
#[utoipa::path(
    put,
    path = "/api/v1/todos/{id}",
    params(("id" = String, Path, description = "Todo id")),
    request_body = UpdateTodoRequest,
    responses(
        (status = 200, description = "Updated todo", body = TodoResponse),
        (status = 400, description = "Invalid request", body = ProblemDetails),
        (status = 404, description = "No todo with this id", body = ProblemDetails),
        (status = 500, description = "Internal server error", body = ProblemDetails)
    ),
    tags = ["todos"],
    operation_id = "updateTodo"
)]
#[put("/todos/{id}")]
pub async fn update_todo(
    state: web::Data<HttpState>,
    request: HttpRequest,
    path: web::Path<String>,
    payload: web::Json<UpdateTodoRequest>,
) -> ApiResult<web::Json<TodoResponse>> {
    let id = parse_todo_id(&path, &request)?;
    let UpdateTodoRequest { name, completed } = payload.into_inner();
    let name = parse_name(name).map_err(bad_request(&request))?;
    let todo = state
        .todos
        .update(TodoForUpdate {
            id,
            name,
            completed,
        })
        .await
        .or_problem(&request)?;
    Ok(web::Json(TodoResponse::from(todo)))
}

#[utoipa::path(
    delete,
    path = "/api/v1/todos/{id}",
    params(("id" = String, Path, description = "Todo id")),
    responses(
        (status = 204, description = "Todo deleted"),
        (status = 404, description = "No todo with this id", body = ProblemDetails),
        (status = 500, description = "Internal server error", body = ProblemDetails)
    ),
    tags = ["todos"],
    operation_id = "deleteTodo"
)]
#[delete("/todos/{id}")]
pub async fn delete_todo(
    state: web::Data<HttpState>,
    request: HttpRequest,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = parse_todo_id(&path, &request)?;
    state.todos.delete(&id).await.or_problem(&request)?;
    Ok(HttpResponse::NoContent().finish())
}

/// Register the todo routes with extractor failures rendered as 400
/// problems.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(|err, request| {
        ApiError::bad_request(err.to_string(), request.path()).into()
    }))
    .app_data(web::QueryConfig::default().error_handler(|err, request| {
        ApiError::bad_request(err.to_string(), request.path()).into()
    }))
    .service(list_todos)
    .service(get_todo)
    .service(create_todo)
    .service(update_todo)
    .service(delete_todo);
}

#[cfg(test)]
#[path = "todos_tests.rs"]
mod tests;
