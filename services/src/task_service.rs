use chrono::Utc;
use db::Store;
use db::models::task::{self, TaskStatus};
use db::models::teacher;
use serde::Deserialize;
use tracing::info;
use util::filters::FilterParam;
use validator::Validate;

use crate::error::{ServiceResult, not_found};
use crate::session::{Actor, Session};

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateTask {
    pub teacher_id: i64,

    #[validate(length(min = 1, message = "Title cannot be empty"))]
    pub title: String,
}

pub struct TaskService;

impl TaskService {
    pub async fn create<S: Store>(session: &Session<S>, actor: &Actor, req: CreateTask) -> ServiceResult<task::Model> {
        actor.ensure_admin()?;
        req.validate()?;
        session.store.get::<teacher::Model>(req.teacher_id).await?;

        let now = Utc::now();
        let task = session
            .store
            .insert(task::Model {
                id: 0,
                teacher_id: req.teacher_id,
                admin_id: Some(actor.id),
                title: req.title.trim().to_string(),
                status: TaskStatus::Pending,
                created_at: now,
                updated_at: now,
            })
            .await?;
        info!(task_id = task.id, teacher_id = task.teacher_id, "task created");
        Ok(task)
    }

    pub async fn list<S: Store>(session: &Session<S>, actor: &Actor) -> ServiceResult<Vec<task::Model>> {
        let filters = if actor.is_admin() {
            vec![]
        } else {
            vec![FilterParam::eq("teacher_id", actor.id)]
        };
        Ok(session.store.find_all(&filters).await?)
    }

    pub async fn set_status<S: Store>(
        session: &Session<S>,
        actor: &Actor,
        task_id: i64,
        status: TaskStatus,
    ) -> ServiceResult<task::Model> {
        let mut task: task::Model = session.store.get(task_id).await?;
        actor.ensure_manages(task.teacher_id, "task")?;
        task.status = status;
        task.updated_at = Utc::now();
        Ok(session.store.update(task).await?)
    }

    /// Admin only.
    pub async fn delete<S: Store>(session: &Session<S>, actor: &Actor, task_id: i64) -> ServiceResult<()> {
        actor.ensure_admin()?;
        if !session.store.delete_by_id::<task::Model>(task_id).await? {
            return Err(not_found("Task", task_id));
        }
        info!(task_id, "task deleted");
        Ok(())
    }
}
