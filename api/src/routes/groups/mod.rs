//! # Groups Routes Module
//!
//! Groups, their members and the test assigned to them. Reassigning a test
//! resets every member's attempt.

use axum::{
    Router,
    routing::{get, put},
};

use crate::state::AppState;
use get::{get_group, list_group_students, list_groups};
use post::create_group;
use put::{assign_test, rename_group};
use delete::delete_group;

pub mod delete;
pub mod get;
pub mod post;
pub mod put;

/// Builds the `/groups` route group.
///
/// - `GET /groups` → `list_groups`
/// - `POST /groups` → `create_group`
/// - `GET /groups/{group_id}` → `get_group`
/// - `PUT /groups/{group_id}` → `rename_group`
/// - `DELETE /groups/{group_id}` → `delete_group`
/// - `PUT /groups/{group_id}/assign-test` → `assign_test`
/// - `GET /groups/{group_id}/students` → `list_group_students`
pub fn groups_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_groups).post(create_group))
        .route(
            "/{group_id}",
            get(get_group).put(rename_group).delete(delete_group),
        )
        .route("/{group_id}/assign-test", put(assign_test))
        .route("/{group_id}/students", get(list_group_students))
}
