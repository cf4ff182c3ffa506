//! Tests for todo HTTP handlers.

use super::*;
use crate::domain::TodoServiceError;
use crate::domain::ports::{
    FixtureTodoCommand, FixtureTodoQuery, MockTodoCommand, MockTodoQuery, TodoCommand, TodoQuery,
};
use actix_web::http::StatusCode;
use actix_web::http::header::CONTENT_TYPE;
use actix_web::{App, test as actix_test, web};
use chrono::TimeZone;
use pagination::PageRequest;
use rstest::rstest;
use serde_json::{Value, json};
use std::sync::Arc;

fn at(hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 14, hour, 0, 0)
        .single()
        .expect("valid timestamp")
}

fn sample_todo(completed: bool) -> Todo {
    Todo {
        id: TodoId::parse("6f1c3a52-9a43-4d6e-8f2b-3c7d1e0a9b11").expect("valid id"),
        name: "Buy milk".to_owned(),
        completed_at: completed.then(|| at(11)),
        created_at: at(9),
        modified_at: at(11),
    }
}

fn test_app(
    query: impl TodoQuery + 'static,
    command: impl TodoCommand + 'static,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let state = HttpState::new(Arc::new(query), Arc::new(command));
    App::new()
        .app_data(web::Data::new(state))
        .service(web::scope("/api/v1").configure(configure))
}

async fn send(
    query: impl TodoQuery + 'static,
    command: impl TodoCommand + 'static,
    request: actix_test::TestRequest,
) -> (StatusCode, Value) {
    let app = actix_test::init_service(test_app(query, command)).await;
    let response = actix_test::call_service(&app, request.to_request()).await;
    let status = response.status();
    let body = actix_test::read_body(response).await;
    let value = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).expect("json body")
    };
    (status, value)
}

#[rstest]
#[case(ListTodosQuery::default(), Ok(ListTodosRequest::default()))]
#[case(
    ListTodosQuery { page_size: Some(5), page: Some(2), completed: Some(true) },
    Ok(ListTodosRequest {
        page_size: NonZeroU32::new(5),
        page: NonZeroU32::new(2),
        completed: Some(true),
    })
)]
#[case(
    ListTodosQuery { page_size: Some(0), ..ListTodosQuery::default() },
    Err(TodoRequestError::ZeroPageSize)
)]
#[case(
    ListTodosQuery { page: Some(0), ..ListTodosQuery::default() },
    Err(TodoRequestError::ZeroPage)
)]
fn list_query_parsing(
    #[case] query: ListTodosQuery,
    #[case] expected: Result<ListTodosRequest, TodoRequestError>,
) {
    assert_eq!(parse_list_query(query), expected);
}

#[rstest]
#[case("", Err(TodoRequestError::BlankName))]
#[case("   \t", Err(TodoRequestError::BlankName))]
#[case("Buy milk", Ok("Buy milk".to_owned()))]
fn name_parsing(#[case] name: &str, #[case] expected: Result<String, TodoRequestError>) {
    assert_eq!(parse_name(name.to_owned()), expected);
}

#[rstest]
fn names_are_limited_in_characters_not_bytes() {
    assert!(parse_name("é".repeat(TODO_NAME_MAX)).is_ok());
    assert_eq!(
        parse_name("x".repeat(TODO_NAME_MAX + 1)),
        Err(TodoRequestError::NameTooLong { max: TODO_NAME_MAX })
    );
}

#[rstest]
fn response_omits_completed_at_for_open_todos() {
    let value = serde_json::to_value(TodoResponse::from(sample_todo(false))).expect("serialise");

    assert_eq!(value["completed"], json!(false));
    assert!(value.get("completedAt").is_none());
    assert_eq!(value["updatedAt"], json!("2026-03-14T11:00:00Z"));
}

#[actix_web::test]
async fn list_returns_data_and_pagination() {
    let mut query = MockTodoQuery::new();
    query
        .expect_list()
        .withf(|request| {
            request.page_size == NonZeroU32::new(1)
                && request.page.is_none()
                && request.completed == Some(true)
        })
        .times(1)
        .returning(|_| {
            let request = PageRequest::try_new(1, 1).expect("valid request");
            Ok(Page::new(request, vec![sample_todo(true)], 3))
        });

    let (status, body) = send(
        query,
        FixtureTodoCommand,
        actix_test::TestRequest::get().uri("/api/v1/todos?pageSize=1&completed=true"),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["pagination"],
        json!({ "page": 1, "pageSize": 1, "totalPages": 3, "totalRows": 3 })
    );
    assert_eq!(body["data"][0]["completed"], json!(true));
    assert_eq!(body["data"][0]["completedAt"], json!("2026-03-14T11:00:00Z"));
}

#[rstest]
#[case("/api/v1/todos?pageSize=0", "pageSize must be greater than zero")]
#[case("/api/v1/todos?page=0", "page must be greater than zero")]
#[actix_rt::test]
async fn zero_paging_values_are_bad_requests(#[case] uri: &str, #[case] detail: &str) {
    let (status, body) = send(
        FixtureTodoQuery,
        FixtureTodoCommand,
        actix_test::TestRequest::get().uri(uri),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["detail"], json!(detail));
    assert_eq!(body["instance"], json!("/api/v1/todos"));
}

#[actix_web::test]
async fn non_integer_paging_values_are_bad_requests() {
    let app = actix_test::init_service(test_app(FixtureTodoQuery, FixtureTodoCommand)).await;
    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/todos?pageSize=many")
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok()),
        Some("application/problem+json")
    );
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["type"], json!("https://example.com/errors/bad-request"));
}

#[actix_web::test]
async fn get_returns_the_todo() {
    let todo = sample_todo(false);
    let id = todo.id;
    let mut query = MockTodoQuery::new();
    query
        .expect_get()
        .withf(move |requested| *requested == id)
        .times(1)
        .returning(move |_| Ok(todo.clone()));

    let (status, body) = send(
        query,
        FixtureTodoCommand,
        actix_test::TestRequest::get().uri(&format!("/api/v1/todos/{id}")),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], json!(id.to_string()));
    assert_eq!(body["name"], json!("Buy milk"));
}

#[actix_web::test]
async fn malformed_ids_are_not_found_without_calling_the_service() {
    let mut query = MockTodoQuery::new();
    query.expect_get().never();

    let (status, body) = send(
        query,
        FixtureTodoCommand,
        actix_test::TestRequest::get().uri("/api/v1/todos/not-a-uuid"),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["detail"], json!("Todo not found: todoId=not-a-uuid"));
    assert_eq!(body["instance"], json!("/api/v1/todos/not-a-uuid"));
}

#[actix_web::test]
async fn unhandled_service_errors_are_redacted() {
    let mut query = MockTodoQuery::new();
    query
        .expect_list()
        .returning(|_| Err(TodoServiceError::unhandled("pool exhausted")));

    let (status, body) = send(
        query,
        FixtureTodoCommand,
        actix_test::TestRequest::get().uri("/api/v1/todos"),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["type"], json!("https://example.com/errors/server-error"));
    assert_eq!(body["detail"], json!("Unhandled error, please try again later"));
}

#[actix_web::test]
async fn create_passes_the_name_through() {
    let mut command = MockTodoCommand::new();
    command
        .expect_create()
        .withf(|todo| todo.name == "Buy milk")
        .times(1)
        .returning(|_| Ok(sample_todo(false)));

    let (status, body) = send(
        FixtureTodoQuery,
        command,
        actix_test::TestRequest::post()
            .uri("/api/v1/todos")
            .set_json(json!({ "name": "Buy milk" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["createdAt"], json!("2026-03-14T09:00:00Z"));
}

#[rstest]
#[case(json!({ "name": "  " }))]
#[case(json!({ "title": "Buy milk" }))]
#[case(json!("Buy milk"))]
#[actix_rt::test]
async fn create_rejects_unusable_bodies(#[case] payload: Value) {
    let mut command = MockTodoCommand::new();
    command.expect_create().never();

    let (status, body) = send(
        FixtureTodoQuery,
        command,
        actix_test::TestRequest::post()
            .uri("/api/v1/todos")
            .set_json(payload),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], json!(400));
    assert_eq!(body["title"], json!("Bad Request"));
}

#[actix_web::test]
async fn update_forwards_the_completion_flag() {
    let todo = sample_todo(true);
    let id = todo.id;
    let mut command = MockTodoCommand::new();
    command
        .expect_update()
        .withf(move |update| {
            update.id == id && update.name == "Buy oat milk" && update.completed == Some(true)
        })
        .times(1)
        .returning(move |_| Ok(todo.clone()));

    let (status, body) = send(
        FixtureTodoQuery,
        command,
        actix_test::TestRequest::put()
            .uri(&format!("/api/v1/todos/{id}"))
            .set_json(json!({ "name": "Buy oat milk", "completed": true })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["completed"], json!(true));
}

#[actix_web::test]
async fn update_without_a_flag_leaves_completion_to_the_service() {
    let todo = sample_todo(true);
    let id = todo.id;
    let mut command = MockTodoCommand::new();
    command
        .expect_update()
        .withf(move |update| update.id == id && update.name == "Renamed" && update.completed.is_none())
        .times(1)
        .returning(move |_| Ok(todo.clone()));

    let (status, body) = send(
        FixtureTodoQuery,
        command,
        actix_test::TestRequest::put()
            .uri(&format!("/api/v1/todos/{id}"))
            .set_json(json!({ "name": "Renamed" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["completed"], json!(true));
}

#[actix_web::test]
async fn update_of_a_missing_todo_is_not_found() {
    let id = TodoId::random();
    let (status, body) = send(
        FixtureTodoQuery,
        FixtureTodoCommand,
        actix_test::TestRequest::put()
            .uri(&format!("/api/v1/todos/{id}"))
            .set_json(json!({ "name": "Anything" })),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["detail"], json!(format!("Todo not found: todoId={id}")));
}

#[actix_web::test]
async fn delete_answers_no_content() {
    let id = TodoId::random();
    let mut command = MockTodoCommand::new();
    command
        .expect_delete()
        .withf(move |requested| *requested == id)
        .times(1)
        .returning(|_| Ok(()));

    let (status, body) = send(
        FixtureTodoQuery,
        command,
        actix_test::TestRequest::delete().uri(&format!("/api/v1/todos/{id}")),
    )
    .await;

    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(body, Value::Null);
}
