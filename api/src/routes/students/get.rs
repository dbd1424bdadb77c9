use axum::{
    Extension,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use services::population::StudentView;
use services::student_service::StudentService;

use crate::auth::AuthUser;
use crate::response::{ApiResult, ok};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ListStudentsQuery {
    pub group_id: Option<i64>,
    pub subject: Option<String>,
}

/// GET /students
///
/// Lists the caller's students (all students for an admin), each with its group
/// name, test topic and answered questions. `?group_id=` narrows the list to one
/// group; otherwise `?subject=` narrows it to students who chose that subject.
pub async fn list_students(
    State(app_state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Query(query): Query<ListStudentsQuery>,
) -> ApiResult<Vec<StudentView>> {
    let session = app_state.session().await;
    let students = match (query.group_id, query.subject) {
        (Some(group_id), _) => StudentService::list_by_group(&session, &user.actor(), group_id).await?,
        (None, Some(subject)) => StudentService::list_by_subject(&session, &user.actor(), &subject).await?,
        (None, None) => StudentService::list(&session, &user.actor()).await?,
    };
    ok(students, "Students retrieved successfully")
}

/// GET /students/{student_id}
pub async fn get_student(
    State(app_state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(student_id): Path<i64>,
) -> ApiResult<StudentView> {
    let session = app_state.session().await;
    let student = StudentService::get(&session, &user.actor(), student_id).await?;
    ok(student, "Student retrieved successfully")
}
