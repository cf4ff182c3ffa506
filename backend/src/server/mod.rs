//! Server construction and route wiring.

mod config;

pub use config::ServerConfig;

use std::sync::Arc;

use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};
use mockable::{Clock, DefaultClock};
use tracing::info;

#[cfg(debug_assertions)]
use todo_backend::doc::ApiDoc;
use todo_backend::domain::ports::TodoStore;
use todo_backend::domain::{TodoService, TodoServiceConfig};
use todo_backend::inbound::http::state::HttpState;
use todo_backend::inbound::http::todos;
use todo_backend::outbound::memory::InMemoryTodoStore;
use todo_backend::outbound::persistence::DieselTodoStore;
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

fn service_state<S>(store: S, clock: Arc<dyn Clock>, config: TodoServiceConfig) -> HttpState
where
    S: TodoStore + 'static,
{
    let service = Arc::new(TodoService::new(Arc::new(store), clock, config));
    HttpState::new(service.clone(), service)
}

/// Build the handler state, backed by PostgreSQL when a pool is configured
/// and by process memory otherwise.
fn build_http_state(config: &ServerConfig) -> HttpState {
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    match &config.db_pool {
        Some(pool) => {
            info!("using PostgreSQL todo store");
            service_state(DieselTodoStore::new(pool.clone()), clock, config.service)
        }
        None => {
            info!("no database configured; using in-memory todo store");
            let store = InMemoryTodoStore::new(clock.clone());
            service_state(store, clock, config.service)
        }
    }
}

fn build_app(
    http_state: web::Data<HttpState>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let app = App::new()
        .app_data(http_state)
        .service(web::scope("/api/v1").configure(todos::configure));

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

    app
}

/// Construct an Actix HTTP server for the given configuration.
///
/// # Errors
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(config: ServerConfig) -> std::io::Result<Server> {
    let http_state = web::Data::new(build_http_state(&config));
    let server = HttpServer::new(move || build_app(http_state.clone()))
        .bind(config.bind_addr)?
        .run();
    Ok(server)
}
