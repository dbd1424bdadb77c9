//! `/tasks`: work items an admin hands to a teacher.

use axum::{
    Extension, Json, Router,
    extract::{Path, State},
    middleware::from_fn,
    routing::{delete, get, put},
};
use db::models::task::{self, TaskStatus};
use serde::Deserialize;
use services::task_service::{CreateTask, TaskService};

use crate::auth::AuthUser;
use crate::auth::guards::allow_admin;
use crate::response::{ApiResult, created, ok};
use crate::state::AppState;

pub fn tasks_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_tasks).post(create_task))
        .route("/{task_id}", delete(delete_task).layer(from_fn(allow_admin)))
        .route("/{task_id}/status", put(set_task_status))
}

/// GET /tasks
///
/// The caller's tasks, or every task for an admin.
pub async fn list_tasks(
    State(app_state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> ApiResult<Vec<task::Model>> {
    let session = app_state.session().await;
    let tasks = TaskService::list(&session, &user.actor()).await?;
    ok(tasks, "Tasks retrieved successfully")
}

/// POST /tasks (admin only)
///
/// ```json
/// { "teacher_id": 3, "title": "Enter term marks" }
/// ```
pub async fn create_task(
    State(app_state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(req): Json<CreateTask>,
) -> ApiResult<task::Model> {
    let session = app_state.session().await;
    let task = TaskService::create(&session, &user.actor(), req).await?;
    created(task, "Task created successfully")
}

#[derive(Debug, Deserialize)]
pub struct TaskStatusRequest {
    pub status: TaskStatus,
}

/// PUT /tasks/{task_id}/status
///
/// ```json
/// { "status": "in_progress" }
/// ```
pub async fn set_task_status(
    State(app_state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(task_id): Path<i64>,
    Json(req): Json<TaskStatusRequest>,
) -> ApiResult<task::Model> {
    let session = app_state.session().await;
    let task = TaskService::set_status(&session, &user.actor(), task_id, req.status).await?;
    ok(task, "Task updated successfully")
}

/// DELETE /tasks/{task_id} (admin only)
pub async fn delete_task(
    State(app_state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(task_id): Path<i64>,
) -> ApiResult<()> {
    let session = app_state.session().await;
    TaskService::delete(&session, &user.actor(), task_id).await?;
    ok((), "Task deleted successfully")
}
