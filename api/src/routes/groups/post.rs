use axum::{Extension, Json, extract::State};
use db::models::group;
use services::assignment_graph::{AssignmentGraph, CreateGroup};

use crate::auth::AuthUser;
use crate::response::{ApiResult, created};
use crate::state::AppState;

/// POST /groups
///
/// Creates a group. The subject defaults to the teacher's; an admin may create
/// a group on behalf of a teacher through `teacher_id`.
///
/// ### Request Body
/// ```json
/// { "name": "7A", "subject": "Math" }
/// ```
pub async fn create_group(
    State(app_state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(req): Json<CreateGroup>,
) -> ApiResult<group::Model> {
    let session = app_state.session().await;
    let group = AssignmentGraph::create_group(&session, &user.actor(), req).await?;
    created(group, "Group created successfully")
}
