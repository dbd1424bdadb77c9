use axum::{
    Extension, Json,
    extract::{Path, State},
};
use db::models::student;
use services::student_service::{StudentService, UpdateStudent};

use crate::auth::AuthUser;
use crate::response::{ApiResult, ok};
use crate::state::AppState;

/// PUT /students/{student_id}
///
/// Updates profile fields. Moving the student to another group resets their
/// attempt.
pub async fn update_student(
    State(app_state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(student_id): Path<i64>,
    Json(req): Json<UpdateStudent>,
) -> ApiResult<student::Model> {
    let session = app_state.session().await;
    let student = StudentService::update(&session, &user.actor(), student_id, req).await?;
    ok(student, "Student updated successfully")
}
