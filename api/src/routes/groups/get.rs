use axum::{
    Extension,
    extract::{Path, State},
};
use services::assignment_graph::AssignmentGraph;
use services::population::{GroupView, StudentView};
use services::student_service::StudentService;

use crate::auth::AuthUser;
use crate::response::{ApiResult, ok};
use crate::state::AppState;

/// GET /groups
///
/// Lists the caller's groups (all groups for an admin) with the owning
/// teacher's name, a summary of the assigned test and the member count.
///
/// ### Response
/// ```json
/// {
///   "success": true,
///   "data": [{
///     "id": 2, "name": "7A", "subject": "Math", "teacher_id": 1,
///     "assigned_test_id": 1, "assignment_version": 3,
///     "teacher_name": "Ms Frizzle",
///     "assigned_test": { "id": 1, "subject": "Math", "topic": "Fractions", "access_code": "0412", "question_count": 5 },
///     "student_count": 24
///   }],
///   "message": "Groups retrieved successfully"
/// }
/// ```
pub async fn list_groups(
    State(app_state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> ApiResult<Vec<GroupView>> {
    let session = app_state.session().await;
    let groups = AssignmentGraph::list_groups(&session, &user.actor()).await?;
    ok(groups, "Groups retrieved successfully")
}

/// GET /groups/{group_id}
pub async fn get_group(
    State(app_state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(group_id): Path<i64>,
) -> ApiResult<GroupView> {
    let session = app_state.session().await;
    let group = AssignmentGraph::get_group(&session, &user.actor(), group_id).await?;
    ok(group, "Group retrieved successfully")
}

/// GET /groups/{group_id}/students
pub async fn list_group_students(
    State(app_state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(group_id): Path<i64>,
) -> ApiResult<Vec<StudentView>> {
    let session = app_state.session().await;
    let students = StudentService::list_by_group(&session, &user.actor(), group_id).await?;
    ok(students, "Students retrieved successfully")
}
