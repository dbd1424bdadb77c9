//! # Students Routes Module
//!
//! ## Structure
//! - `attempt.rs`: the attempt flow driven by a login code (public)
//! - `early_access.rs`: early access decisions and the approval queue
//! - `get.rs`, `post.rs`, `put.rs`, `delete.rs`: student management
//!
//! ## Middleware
//! Only the attempt flow is public; everything else sits behind
//! `allow_authenticated`.

use axum::{
    Router,
    middleware::from_fn,
    routing::{get, post},
};

use crate::auth::guards::allow_authenticated;
use crate::state::AppState;
use attempt::{request_early_access, start_attempt, submit_attempt};
use delete::delete_student;
use early_access::{decide_early_access, pending_approvals};
use get::{get_student, list_students};
use post::create_student;
use put::update_student;

pub mod attempt;
pub mod delete;
pub mod early_access;
pub mod get;
pub mod post;
pub mod put;

/// Builds the `/students` route group.
///
/// - `POST /students/start` → `start_attempt` (public)
/// - `POST /students/submit` → `submit_attempt` (public)
/// - `POST /students/request-early-access` → `request_early_access` (public)
/// - `GET /students` → `list_students`
/// - `POST /students` → `create_student`
/// - `GET /students/pending-approvals` → `pending_approvals`
/// - `GET /students/{student_id}` → `get_student`
/// - `PUT /students/{student_id}` → `update_student`
/// - `DELETE /students/{student_id}` → `delete_student`
/// - `POST /students/{student_id}/early-access` → `decide_early_access`
pub fn students_routes() -> Router<AppState> {
    let attempt = Router::new()
        .route("/start", post(start_attempt))
        .route("/submit", post(submit_attempt))
        .route("/request-early-access", post(request_early_access));

    let staff = Router::new()
        .route("/", get(list_students).post(create_student))
        .route("/pending-approvals", get(pending_approvals))
        .route(
            "/{student_id}",
            get(get_student).put(update_student).delete(delete_student),
        )
        .route("/{student_id}/early-access", post(decide_early_access))
        .route_layer(from_fn(allow_authenticated));

    attempt.merge(staff)
}
