use axum::{
    Extension,
    extract::{Path, State},
};
use services::assignment_graph::AssignmentGraph;

use crate::auth::AuthUser;
use crate::response::{ApiResult, ok};
use crate::state::AppState;

/// DELETE /groups/{group_id}
///
/// Deletes the group. Its students stay, detached and with their attempt reset.
pub async fn delete_group(
    State(app_state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(group_id): Path<i64>,
) -> ApiResult<()> {
    let session = app_state.session().await;
    AssignmentGraph::delete_group(&session, &user.actor(), group_id).await?;
    ok((), "Group deleted successfully")
}
