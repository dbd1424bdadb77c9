//! Group → Test and Student → Group relationships.
//!
//! Every change of a group's assigned test bumps its `assignment_version` and
//! resets the attempt state of all its members in one batch, under the group's
//! lock and the locks of all its members. Submissions take the same group lock,
//! so a reset and a grading never interleave.

use chrono::Utc;
use db::Store;
use db::models::{group, student, teacher, test};
use serde::Deserialize;
use tracing::info;
use util::filters::FilterParam;
use util::locks::LockKey;
use validator::Validate;

use crate::error::{ServiceError, ServiceResult};
use crate::population::{GroupView, populate_groups};
use crate::session::{Actor, Session};

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateGroup {
    #[validate(length(min = 1, message = "Group name cannot be empty"))]
    pub name: String,
    /// Defaults to the teacher's subject.
    pub subject: Option<String>,
    /// Owner when an admin creates a group on a teacher's behalf.
    pub teacher_id: Option<i64>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RenameGroup {
    #[validate(length(min = 1, message = "Group name cannot be empty"))]
    pub name: String,
}

pub struct AssignmentGraph;

impl AssignmentGraph {
    pub async fn create_group<S: Store>(
        session: &Session<S>,
        actor: &Actor,
        req: CreateGroup,
    ) -> ServiceResult<group::Model> {
        req.validate()?;
        let owner_id = match req.teacher_id {
            Some(id) if id != actor.id => {
                actor.ensure_admin()?;
                id
            }
            _ => actor.id,
        };
        let owner: teacher::Model = session.store.get(owner_id).await?;

        let subject = req
            .subject
            .filter(|s| !s.trim().is_empty())
            .or(owner.subject)
            .ok_or_else(|| ServiceError::Validation("Group subject is required".into()))?;

        let now = Utc::now();
        let group = session
            .store
            .insert(group::Model {
                id: 0,
                name: req.name.trim().to_string(),
                subject,
                teacher_id: owner_id,
                assigned_test_id: None,
                assignment_version: 0,
                created_at: now,
                updated_at: now,
            })
            .await?;
        info!(group_id = group.id, teacher_id = owner_id, "group created");
        Ok(group)
    }

    /// Own groups for a teacher, every group for an admin.
    pub async fn list_groups<S: Store>(session: &Session<S>, actor: &Actor) -> ServiceResult<Vec<GroupView>> {
        let filters = if actor.is_admin() {
            vec![]
        } else {
            vec![FilterParam::eq("teacher_id", actor.id)]
        };
        let groups = session.store.find_all::<group::Model>(&filters).await?;
        populate_groups(&session.store, groups).await
    }

    pub async fn get_group<S: Store>(session: &Session<S>, actor: &Actor, group_id: i64) -> ServiceResult<GroupView> {
        let group: group::Model = session.store.get(group_id).await?;
        actor.ensure_manages(group.teacher_id, "group")?;
        let mut views = populate_groups(&session.store, vec![group]).await?;
        views
            .pop()
            .ok_or_else(|| crate::error::not_found("Group", group_id))
    }

    pub async fn rename_group<S: Store>(
        session: &Session<S>,
        actor: &Actor,
        group_id: i64,
        req: RenameGroup,
    ) -> ServiceResult<group::Model> {
        req.validate()?;
        let _locks = session.lock(vec![LockKey::Group(group_id)]).await;
        let mut group: group::Model = session.store.get(group_id).await?;
        actor.ensure_manages(group.teacher_id, "group")?;

        group.name = req.name.trim().to_string();
        group.updated_at = Utc::now();
        Ok(session.store.update(group).await?)
    }

    /// Assigns `test_id` to the group and resets every member's attempt.
    ///
    /// Reassigning the test already assigned starts a new cycle as well.
    pub async fn assign_test<S: Store>(
        session: &Session<S>,
        actor: &Actor,
        group_id: i64,
        test_id: i64,
    ) -> ServiceResult<group::Model> {
        let store = &session.store;
        let _locks = session
            .lock_planned(move || async move {
                let mut keys = vec![LockKey::Group(group_id), LockKey::Test(test_id)];
                keys.extend(member_keys(store, group_id).await?);
                Ok(keys)
            })
            .await?;

        let mut group: group::Model = store.get(group_id).await?;
        actor.ensure_manages(group.teacher_id, "group")?;

        let test: test::Model = store.get(test_id).await?;
        if test.teacher_id != group.teacher_id {
            return Err(ServiceError::Validation(
                "A group can only be assigned tests of its own teacher".into(),
            ));
        }
        if !test.is_active {
            return Err(ServiceError::Conflict("Test is not active".into()));
        }

        group.assigned_test_id = Some(test.id);
        group.assignment_version += 1;
        group.updated_at = Utc::now();
        let group = store.update(group).await?;

        let reset = Self::reset_members(store, group.id).await?;
        info!(
            group_id = group.id,
            test_id = test.id,
            version = group.assignment_version,
            students_reset = reset,
            "test assigned"
        );
        Ok(group)
    }

    /// Clears the assignment of every group that has `test_id` assigned and
    /// resets their members. Callers hold the locks of those groups and members.
    pub(crate) async fn unassign_test<S: Store>(store: &S, test_id: i64) -> ServiceResult<Vec<i64>> {
        let groups = store
            .find_all::<group::Model>(&[FilterParam::eq("assigned_test_id", test_id)])
            .await?;
        let now = Utc::now();
        let mut touched = Vec::with_capacity(groups.len());
        for mut group in groups {
            group.assigned_test_id = None;
            group.assignment_version += 1;
            group.updated_at = now;
            let group = store.update(group).await?;
            Self::reset_members(store, group.id).await?;
            touched.push(group.id);
        }
        Ok(touched)
    }

    /// Resets the attempt state of all students in the group in one batch.
    pub(crate) async fn reset_members<S: Store>(store: &S, group_id: i64) -> ServiceResult<usize> {
        let now = Utc::now();
        let members: Vec<student::Model> = store
            .find_all::<student::Model>(&[FilterParam::eq("group_id", group_id)])
            .await?
            .into_iter()
            .map(|mut s| {
                s.reset_attempt();
                s.updated_at = now;
                s
            })
            .collect();
        let count = members.len();
        store.update_batch(members).await?;
        Ok(count)
    }

    /// Deletes the group. Members stay, detached from it with their attempt reset.
    pub async fn delete_group<S: Store>(session: &Session<S>, actor: &Actor, group_id: i64) -> ServiceResult<()> {
        let store = &session.store;
        let _locks = session
            .lock_planned(move || async move {
                let mut keys = vec![LockKey::Group(group_id)];
                keys.extend(member_keys(store, group_id).await?);
                Ok(keys)
            })
            .await?;

        let group: group::Model = store.get(group_id).await?;
        actor.ensure_manages(group.teacher_id, "group")?;

        let now = Utc::now();
        let detached: Vec<student::Model> = store
            .find_all::<student::Model>(&[FilterParam::eq("group_id", group_id)])
            .await?
            .into_iter()
            .map(|mut s| {
                s.group_id = None;
                s.reset_attempt();
                s.updated_at = now;
                s
            })
            .collect();
        let count = detached.len();
        store.update_batch(detached).await?;
        store.delete_by_id::<group::Model>(group_id).await?;

        info!(group_id, students_detached = count, "group deleted");
        Ok(())
    }
}

/// Lock keys of every current member of the group.
pub(crate) async fn member_keys<S: Store>(store: &S, group_id: i64) -> ServiceResult<Vec<LockKey>> {
    Ok(store
        .find_all::<student::Model>(&[FilterParam::eq("group_id", group_id)])
        .await?
        .into_iter()
        .map(|s| LockKey::Student(s.id))
        .collect())
}
