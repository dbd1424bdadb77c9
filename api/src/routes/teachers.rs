//! `/teachers`: staff accounts.
//!
//! Creating, listing and deleting accounts is admin-only. A teacher may read
//! and edit their own profile.

use axum::{
    Extension, Json, Router,
    extract::{Path, State},
    middleware::from_fn,
    routing::{delete, get},
};
use db::models::teacher;
use services::teacher_service::{CascadeReport, CreateTeacher, TeacherService, UpdateTeacher};

use crate::auth::AuthUser;
use crate::auth::guards::allow_admin;
use crate::response::{ApiResult, created, ok};
use crate::state::AppState;

/// Builds the `/teachers` route group.
///
/// - `GET /teachers` → `list_teachers` (admin only)
/// - `POST /teachers` → `create_teacher` (admin only)
/// - `GET /teachers/{teacher_id}` → `get_teacher`
/// - `PUT /teachers/{teacher_id}` → `update_teacher`
/// - `DELETE /teachers/{teacher_id}` → `delete_teacher` (admin only)
pub fn teachers_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(list_teachers)
                .post(create_teacher)
                .layer(from_fn(allow_admin)),
        )
        .route(
            "/{teacher_id}",
            delete(delete_teacher)
                .layer(from_fn(allow_admin))
                .get(get_teacher)
                .put(update_teacher),
        )
}

pub async fn list_teachers(
    State(app_state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> ApiResult<Vec<teacher::Model>> {
    let session = app_state.session().await;
    let teachers = TeacherService::list(&session, &user.actor()).await?;
    ok(teachers, "Teachers retrieved successfully")
}

/// POST /teachers
///
/// ### Request Body
/// ```json
/// { "name": "Ms Frizzle", "email": "frizzle@school.test", "subject": "Math", "role": "teacher" }
/// ```
///
/// ### Responses
/// - `201 Created`
/// - `400 Bad Request` (empty name, invalid email)
/// - `409 Conflict` (email already used)
pub async fn create_teacher(
    State(app_state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(req): Json<CreateTeacher>,
) -> ApiResult<teacher::Model> {
    let session = app_state.session().await;
    let teacher = TeacherService::create(&session, &user.actor(), req).await?;
    created(teacher, "Teacher created successfully")
}

pub async fn get_teacher(
    State(app_state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(teacher_id): Path<i64>,
) -> ApiResult<teacher::Model> {
    let session = app_state.session().await;
    let teacher = TeacherService::get(&session, &user.actor(), teacher_id).await?;
    ok(teacher, "Teacher retrieved successfully")
}

/// PUT /teachers/{teacher_id}
///
/// Only an admin may change a role.
pub async fn update_teacher(
    State(app_state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(teacher_id): Path<i64>,
    Json(req): Json<UpdateTeacher>,
) -> ApiResult<teacher::Model> {
    let session = app_state.session().await;
    let teacher = TeacherService::update(&session, &user.actor(), teacher_id, req).await?;
    ok(teacher, "Teacher updated successfully")
}

/// DELETE /teachers/{teacher_id}
///
/// Deletes the teacher with everything they own: students, tests, groups,
/// tasks and questions. Students of other teachers that sat in a removed group
/// are detached from it.
///
/// ### Response
/// ```json
/// {
///   "success": true,
///   "data": { "students": 2, "tests": 1, "groups": 1, "tasks": 0, "questions": 5, "students_detached": 0 },
///   "message": "Teacher and related data deleted successfully"
/// }
/// ```
pub async fn delete_teacher(
    State(app_state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(teacher_id): Path<i64>,
) -> ApiResult<CascadeReport> {
    let session = app_state.session().await;
    let report = TeacherService::delete(&session, &user.actor(), teacher_id).await?;
    ok(report, "Teacher and related data deleted successfully")
}
