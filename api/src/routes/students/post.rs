use axum::{Extension, Json, extract::State};
use db::models::student;
use services::student_service::{CreateStudent, StudentService};

use crate::auth::AuthUser;
use crate::response::{ApiResult, created};
use crate::state::AppState;

/// POST /students
///
/// Registers a student in one of the caller's groups and hands out a fresh
/// 4-digit login code.
///
/// ### Request Body
/// ```json
/// { "full_name": "Ann Lee", "phone_number": "+27 82 000 0000", "group_id": 2 }
/// ```
///
/// ### Responses
/// - `201 Created` with the student, including `login_code`
/// - `400 Bad Request` (empty name)
/// - `403 Forbidden` (someone else's group)
/// - `404 Not Found` (group)
/// - `409 Conflict` (login codes exhausted)
pub async fn create_student(
    State(app_state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(req): Json<CreateStudent>,
) -> ApiResult<student::Model> {
    let session = app_state.session().await;
    let student = StudentService::create(&session, &user.actor(), req).await?;
    created(student, "Student created successfully")
}
