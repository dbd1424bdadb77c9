//! The subject catalogue.

use chrono::Utc;
use db::Store;
use db::models::subject;
use serde::Deserialize;
use tracing::info;
use util::filters::FilterParam;
use util::locks::LockKey;
use validator::Validate;

use crate::error::{ServiceError, ServiceResult};
use crate::session::{Actor, Session};

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateSubject {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
}

pub struct SubjectService;

impl SubjectService {
    /// Every catalogue entry, oldest first.
    pub async fn list<S: Store>(session: &Session<S>) -> ServiceResult<Vec<subject::Model>> {
        Ok(session.store.find_all(&[]).await?)
    }

    pub async fn create<S: Store>(
        session: &Session<S>,
        actor: &Actor,
        mut req: CreateSubject,
    ) -> ServiceResult<subject::Model> {
        actor.ensure_admin()?;
        req.name = req.name.trim().to_string();
        req.validate()?;
        let name = req.name;

        let _locks = session.lock(vec![LockKey::Keyspace("subjects")]).await;
        let taken = session
            .store
            .exists::<subject::Model>(&[FilterParam::eq("name", name.as_str())])
            .await?;
        if taken {
            return Err(ServiceError::Conflict(format!("Subject '{}' already exists", name)));
        }

        let subject = session
            .store
            .insert(subject::Model {
                id: 0,
                name,
                created_at: Utc::now(),
            })
            .await?;
        info!(subject_id = subject.id, name = %subject.name, "subject created");
        Ok(subject)
    }

    /// Removes a catalogue entry by name. Records that name the subject keep it.
    pub async fn delete<S: Store>(session: &Session<S>, actor: &Actor, name: &str) -> ServiceResult<()> {
        actor.ensure_admin()?;
        let _locks = session.lock(vec![LockKey::Keyspace("subjects")]).await;
        let found = session
            .store
            .find_one::<subject::Model>(&[FilterParam::eq("name", name.trim())])
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Subject '{}' not found", name.trim())))?;

        session.store.delete_by_id::<subject::Model>(found.id).await?;
        info!(subject_id = found.id, name = %found.name, "subject deleted");
        Ok(())
    }
}
