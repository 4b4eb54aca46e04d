//! EventForms API
//!
//! HTTP collaborator of the form builder: accepts submitted forms and user
//! sign-ups and stores them as untyped documents.
//!
//! ```text
//! POST /api/form/submit-form   {form, eventName} -> 201 stored document
//! GET  /api/form/              -> all stored documents
//! POST /api/users/             {name, email, password} -> 201 user
//! GET  /api/users/             -> all users
//! ```

pub mod config;
pub mod error;
pub mod models;
pub mod routes;
pub mod store;

use axum::{routing::get, Json, Router};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;

pub use config::ServerConfig;
pub use error::ApiError;
pub use models::*;
pub use store::{FormRepository, InMemoryFormRepository, InMemoryUserRepository, UserRepository};

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub forms: Arc<dyn FormRepository>,
    pub users: Arc<dyn UserRepository>,
}

impl AppState {
    pub fn in_memory() -> Self {
        Self {
            forms: Arc::new(InMemoryFormRepository::new()),
            users: Arc::new(InMemoryUserRepository::new()),
        }
    }
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    info(
        title = "EventForms API",
        version = "1.0.0",
        description = "Stores forms submitted from the event form builder",
        license(name = "Apache-2.0")
    ),
    paths(
        routes::health::health_check,
        routes::forms::submit_form,
        routes::forms::list_forms,
        routes::users::create_user,
        routes::users::list_users,
    ),
    components(schemas(ErrorBody, FormDocument, SubmitFormBody, User, CreateUser, routes::health::HealthResponse)),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "forms", description = "Submitted forms"),
        (name = "users", description = "User records")
    )
)]
pub struct ApiDoc;

/// Build the API router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(routes::health::health_check))
        .route("/api-docs/openapi.json", get(|| async { Json(ApiDoc::openapi()) }))
        .merge(routes::forms::router())
        .merge(routes::users::router())
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
