//! Form submission endpoints

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::error::ApiError;
use crate::models::{FormDocument, SubmitFormBody};
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/form/submit-form", post(submit_form))
        .route("/api/form", get(list_forms))
        .route("/api/form/", get(list_forms))
}

/// Store a submitted form
#[utoipa::path(
    post,
    path = "/api/form/submit-form",
    request_body = SubmitFormBody,
    responses(
        (status = 201, description = "Form stored", body = FormDocument),
        (status = 400, description = "Body does not match the document schema", body = ErrorBody)
    ),
    tag = "forms"
)]
pub async fn submit_form(
    State(state): State<AppState>,
    body: Result<Json<SubmitFormBody>, JsonRejection>,
) -> Result<(StatusCode, Json<FormDocument>), ApiError> {
    let Json(body) = body?;
    body.validate().map_err(ApiError::BadRequest)?;

    let document = state.forms.insert(FormDocument::new(body)).await?;
    tracing::info!(id = %document.id, event = %document.event_name, fields = document.form.len(), "form stored");
    Ok((StatusCode::CREATED, Json(document)))
}

/// List stored forms
#[utoipa::path(
    get,
    path = "/api/form/",
    responses(
        (status = 200, description = "All stored forms", body = [FormDocument])
    ),
    tag = "forms"
)]
pub async fn list_forms(State(state): State<AppState>) -> Result<Json<Vec<FormDocument>>, ApiError> {
    Ok(Json(state.forms.list().await?))
}
