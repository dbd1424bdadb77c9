use axum::{
    Extension,
    extract::{Path, State},
};

use services::student_service::StudentService;

use crate::auth::AuthUser;
use crate::response::{ApiResult, ok};
use crate::state::AppState;

/// DELETE /students/{student_id}
///
/// Deletes the student and removes them from every test's participant list.
pub async fn delete_student(
    State(app_state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(student_id): Path<i64>,
) -> ApiResult<()> {
    let session = app_state.session().await;
    StudentService::delete(&session, &user.actor(), student_id).await?;
    ok((), "Student deleted successfully")
}
