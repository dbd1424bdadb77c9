//! HTTP route entry point for `/api/...`.
//!
//! Route groups include:
//! - `/health` → Health check reporting the active backend (public)
//! - `/students` → Attempt flow by login code (public) and student management (authenticated)
//! - `/groups` → Groups and test assignment (authenticated)
//! - `/tests` → Tests and their questions (authenticated)
//! - `/questions` → The question bank (authenticated)
//! - `/subjects` → The subject catalogue (public read, admin write)
//! - `/teachers` → Staff accounts, deletion cascades (authenticated, partly admin-only)
//! - `/tasks` → Admin-to-teacher tasks (authenticated)

use axum::{Router, middleware::from_fn};

use crate::auth::guards::allow_authenticated;
use crate::routes::{
    groups::groups_routes, health::health_routes, questions::questions_routes,
    students::students_routes, subjects::subjects_routes, tasks::tasks_routes, teachers::teachers_routes,
    tests::tests_routes,
};
use crate::state::AppState;

pub mod groups;
pub mod health;
pub mod questions;
pub mod students;
pub mod subjects;
pub mod tasks;
pub mod teachers;

/// Builds the complete application router for all HTTP endpoints, ready to be
/// nested under `/api`.
pub fn routes(app_state: AppState) -> Router {
    Router::new()
        .nest("/health", health_routes())
        .nest("/students", students_routes())
        .nest("/groups", groups_routes().route_layer(from_fn(allow_authenticated)))
        .nest("/tests", tests_routes().route_layer(from_fn(allow_authenticated)))
        .nest("/questions", questions_routes().route_layer(from_fn(allow_authenticated)))
        .nest("/subjects", subjects_routes())
        .nest("/teachers", teachers_routes().route_layer(from_fn(allow_authenticated)))
        .nest("/tasks", tasks_routes().route_layer(from_fn(allow_authenticated)))
        .with_state(app_state)
}
