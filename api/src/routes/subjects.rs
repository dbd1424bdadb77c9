//! `/subjects`: the subject catalogue.
//!
//! Anyone may read it; only an admin may change it.

use axum::{
    Extension, Json, Router,
    extract::{Path, State},
    middleware::from_fn,
    routing::{delete, post},
};
use db::models::subject;
use services::subject_service::{CreateSubject, SubjectService};

use crate::auth::AuthUser;
use crate::auth::guards::allow_admin;
use crate::response::{ApiResult, created, ok};
use crate::state::AppState;

/// Builds the `/subjects` route group.
///
/// - `GET /subjects` → `list_subjects` (public)
/// - `POST /subjects` → `create_subject` (admin only)
/// - `DELETE /subjects/{name}` → `delete_subject` (admin only)
pub fn subjects_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            post(create_subject)
                .layer(from_fn(allow_admin))
                .get(list_subjects),
        )
        .route("/{name}", delete(delete_subject).layer(from_fn(allow_admin)))
}

pub async fn list_subjects(State(app_state): State<AppState>) -> ApiResult<Vec<subject::Model>> {
    let session = app_state.session().await;
    let subjects = SubjectService::list(&session).await?;
    ok(subjects, "Subjects retrieved successfully")
}

/// POST /subjects
///
/// ```json
/// { "name": "Front-end" }
/// ```
///
/// ### Responses
/// - `201 Created`
/// - `400 Bad Request` (empty name)
/// - `409 Conflict` (name already in the catalogue)
pub async fn create_subject(
    State(app_state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(req): Json<CreateSubject>,
) -> ApiResult<subject::Model> {
    let session = app_state.session().await;
    let subject = SubjectService::create(&session, &user.actor(), req).await?;
    created(subject, "Subject created successfully")
}

/// DELETE /subjects/{name}
pub async fn delete_subject(
    State(app_state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(name): Path<String>,
) -> ApiResult<()> {
    let session = app_state.session().await;
    SubjectService::delete(&session, &user.actor(), &name).await?;
    ok((), "Subject deleted successfully")
}
