use axum::{
    Extension, Json,
    extract::{Path, State},
};
use db::models::student;
use serde::Deserialize;
use services::access_gate::AccessGate;

use crate::auth::AuthUser;
use crate::response::{ApiResult, ok};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct DecisionRequest {
    pub approved: bool,
}

/// POST /students/{student_id}/early-access
///
/// Approves or denies an open early access request. The owning teacher or an
/// admin may decide, and may revise the decision until the approval is used.
///
/// ### Request Body
/// ```json
/// { "approved": true }
/// ```
///
/// ### Responses
/// - `200 OK` with the updated student
/// - `403 Forbidden` (not the student's teacher)
/// - `404 Not Found`
/// - `409 Conflict` (no open request)
pub async fn decide_early_access(
    State(app_state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(student_id): Path<i64>,
    Json(req): Json<DecisionRequest>,
) -> ApiResult<student::Model> {
    let session = app_state.session().await;
    let student =
        AccessGate::decide_early_access(&session, &user.actor(), student_id, req.approved).await?;
    let message = if req.approved {
        "Early access approved"
    } else {
        "Early access denied"
    };
    ok(student, message)
}

/// GET /students/pending-approvals
///
/// Students waiting for an early access decision: the caller's own students
/// and members of the caller's groups, or everyone for an admin.
pub async fn pending_approvals(
    State(app_state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> ApiResult<Vec<student::Model>> {
    let session = app_state.session().await;
    let students = AccessGate::pending_approvals(&session, &user.actor()).await?;
    ok(students, "Pending approvals retrieved")
}
