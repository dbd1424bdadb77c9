use axum::{
    Extension, Json,
    extract::{Path, State},
};
use db::models::group;
use serde::Deserialize;
use services::assignment_graph::{AssignmentGraph, RenameGroup};

use crate::auth::AuthUser;
use crate::response::{ApiResult, ok};
use crate::state::AppState;

/// PUT /groups/{group_id}
pub async fn rename_group(
    State(app_state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(group_id): Path<i64>,
    Json(req): Json<RenameGroup>,
) -> ApiResult<group::Model> {
    let session = app_state.session().await;
    let group = AssignmentGraph::rename_group(&session, &user.actor(), group_id, req).await?;
    ok(group, "Group updated successfully")
}

#[derive(Debug, Deserialize)]
pub struct AssignTestRequest {
    pub test_id: i64,
}

/// PUT /groups/{group_id}/assign-test
///
/// Assigns a test to the group and resets every member's attempt (status,
/// score, answers). The group's `assignment_version` goes up by one, which
/// invalidates attempts started before the change.
///
/// ### Request Body
/// ```json
/// { "test_id": 4 }
/// ```
///
/// ### Responses
/// - `200 OK` with the updated group
/// - `400 Bad Request` (test of another teacher)
/// - `403 Forbidden` (someone else's group)
/// - `404 Not Found` (group or test)
/// - `409 Conflict` (inactive test)
pub async fn assign_test(
    State(app_state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(group_id): Path<i64>,
    Json(req): Json<AssignTestRequest>,
) -> ApiResult<group::Model> {
    let session = app_state.session().await;
    let group = AssignmentGraph::assign_test(&session, &user.actor(), group_id, req.test_id).await?;
    ok(group, "Test assigned successfully")
}
