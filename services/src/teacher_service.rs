//! Teacher accounts and the cascade run when one is deleted.

use chrono::Utc;
use db::Store;
use db::models::teacher::{self, Role};
use db::models::{group, question, student, task, test};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::info;
use util::filters::FilterParam;
use util::locks::LockKey;
use validator::Validate;

use crate::assignment_graph::AssignmentGraph;
use crate::error::{ServiceError, ServiceResult};
use crate::session::{Actor, Session};

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateTeacher {
    #[validate(length(min = 1, message = "Name cannot be empty"))]
    pub name: String,

    #[validate(email(message = "Invalid email address"))]
    pub email: String,

    pub subject: Option<String>,

    #[serde(default = "default_role")]
    pub role: Role,
}

fn default_role() -> Role {
    Role::Teacher
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateTeacher {
    #[validate(length(min = 1, message = "Name cannot be empty"))]
    pub name: Option<String>,

    #[validate(email(message = "Invalid email address"))]
    pub email: Option<String>,

    pub subject: Option<String>,

    pub role: Option<Role>,
}

/// What a teacher deletion removed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CascadeReport {
    pub students: u64,
    pub tests: u64,
    pub groups: u64,
    pub tasks: u64,
    pub questions: u64,
    pub students_detached: usize,
}

pub struct TeacherService;

impl TeacherService {
    /// Creates an account. Seeding the first admin goes through `insert_teacher`.
    pub async fn create<S: Store>(
        session: &Session<S>,
        actor: &Actor,
        req: CreateTeacher,
    ) -> ServiceResult<teacher::Model> {
        actor.ensure_admin()?;
        Self::insert_teacher(&session.store, req).await
    }

    pub async fn insert_teacher<S: Store>(store: &S, req: CreateTeacher) -> ServiceResult<teacher::Model> {
        req.validate()?;
        let now = Utc::now();
        let teacher = store
            .insert(teacher::Model {
                id: 0,
                name: req.name.trim().to_string(),
                email: req.email.trim().to_lowercase(),
                subject: req.subject.filter(|s| !s.trim().is_empty()),
                role: req.role,
                created_at: now,
                updated_at: now,
            })
            .await?;
        info!(teacher_id = teacher.id, role = %teacher.role, "teacher created");
        Ok(teacher)
    }

    pub async fn list<S: Store>(session: &Session<S>, actor: &Actor) -> ServiceResult<Vec<teacher::Model>> {
        actor.ensure_admin()?;
        Ok(session.store.find_all(&[]).await?)
    }

    pub async fn get<S: Store>(session: &Session<S>, actor: &Actor, teacher_id: i64) -> ServiceResult<teacher::Model> {
        actor.ensure_manages(teacher_id, "teacher")?;
        Ok(session.store.get(teacher_id).await?)
    }

    /// Teachers edit their own profile; only admins change roles.
    pub async fn update<S: Store>(
        session: &Session<S>,
        actor: &Actor,
        teacher_id: i64,
        req: UpdateTeacher,
    ) -> ServiceResult<teacher::Model> {
        req.validate()?;
        actor.ensure_manages(teacher_id, "teacher")?;
        if req.role.is_some() {
            actor.ensure_admin()?;
        }

        let mut teacher: teacher::Model = session.store.get(teacher_id).await?;
        if let Some(name) = req.name {
            teacher.name = name.trim().to_string();
        }
        if let Some(email) = req.email {
            teacher.email = email.trim().to_lowercase();
        }
        if let Some(subject) = req.subject {
            teacher.subject = Some(subject).filter(|s| !s.trim().is_empty());
        }
        if let Some(role) = req.role {
            teacher.role = role;
        }
        teacher.updated_at = Utc::now();
        Ok(session.store.update(teacher).await?)
    }

    /// Deletes a teacher with everything they own.
    ///
    /// Removes the teacher's students, tests, groups, tasks and questions, in
    /// that order, with the same store calls on either backend. Records that
    /// survive but pointed at removed ones are repaired first: students of other
    /// teachers placed in a removed group are detached, groups assigned a removed
    /// test are unassigned, and removed students leave every participant list.
    pub async fn delete<S: Store>(session: &Session<S>, actor: &Actor, teacher_id: i64) -> ServiceResult<CascadeReport> {
        actor.ensure_admin()?;
        let store = &session.store;
        session.store.get::<teacher::Model>(teacher_id).await?;

        let _locks = session
            .lock_planned(move || async move { cascade_keys(store, teacher_id).await })
            .await?;

        let owned = [FilterParam::eq("teacher_id", teacher_id)];
        let now = Utc::now();

        let removed_students: HashSet<i64> = store
            .find_all::<student::Model>(&owned)
            .await?
            .into_iter()
            .map(|s| s.id)
            .collect();
        let removed_groups: Vec<i64> = store
            .find_all::<group::Model>(&owned)
            .await?
            .into_iter()
            .map(|g| g.id)
            .collect();
        let removed_tests: Vec<i64> = store
            .find_all::<test::Model>(&owned)
            .await?
            .into_iter()
            .map(|t| t.id)
            .collect();

        let mut report = CascadeReport::default();

        if !removed_groups.is_empty() {
            let detached: Vec<student::Model> = store
                .find_all::<student::Model>(&[
                    FilterParam::eq("group_id", removed_groups.clone()),
                    FilterParam::ne("teacher_id", teacher_id),
                ])
                .await?
                .into_iter()
                .map(|mut s| {
                    s.group_id = None;
                    s.reset_attempt();
                    s.updated_at = now;
                    s
                })
                .collect();
            report.students_detached = detached.len();
            store.update_batch(detached).await?;
        }

        for &test_id in &removed_tests {
            AssignmentGraph::unassign_test(store, test_id).await?;
        }

        let surviving_tests: Vec<test::Model> = store
            .find_all::<test::Model>(&[FilterParam::ne("teacher_id", teacher_id)])
            .await?
            .into_iter()
            .filter_map(|mut t| {
                let before = t.participant_ids.len();
                t.participant_ids.0.retain(|id| !removed_students.contains(id));
                (t.participant_ids.len() != before).then(|| {
                    t.updated_at = now;
                    t
                })
            })
            .collect();
        store.update_batch(surviving_tests).await?;

        report.students = store.delete_where::<student::Model>(&owned).await?;
        report.tests = store.delete_where::<test::Model>(&owned).await?;
        report.groups = store.delete_where::<group::Model>(&owned).await?;
        report.tasks = store.delete_where::<task::Model>(&owned).await?;
        report.questions = store.delete_where::<question::Model>(&owned).await?;
        store.delete_by_id::<teacher::Model>(teacher_id).await?;

        info!(teacher_id, ?report, backend = ?store.backend(), "teacher deleted with cascade");
        Ok(report)
    }
}

/// Every record the cascade of `teacher_id` writes or deletes.
async fn cascade_keys<S: Store>(store: &S, teacher_id: i64) -> ServiceResult<Vec<LockKey>> {
    let owned = [FilterParam::eq("teacher_id", teacher_id)];
    let groups: Vec<i64> = store
        .find_all::<group::Model>(&owned)
        .await?
        .into_iter()
        .map(|g| g.id)
        .collect();
    let tests: Vec<i64> = store
        .find_all::<test::Model>(&owned)
        .await?
        .into_iter()
        .map(|t| t.id)
        .collect();
    let students: Vec<i64> = store
        .find_all::<student::Model>(&owned)
        .await?
        .into_iter()
        .map(|s| s.id)
        .collect();

    let mut keys: Vec<LockKey> = Vec::new();
    keys.extend(groups.iter().map(|&id| LockKey::Group(id)));
    keys.extend(students.iter().map(|&id| LockKey::Student(id)));
    keys.extend(tests.iter().map(|&id| LockKey::Test(id)));

    if !groups.is_empty() {
        for s in store
            .find_all::<student::Model>(&[FilterParam::eq("group_id", groups)])
            .await?
        {
            keys.push(LockKey::Student(s.id));
        }
    }
    if !tests.is_empty() {
        for g in store
            .find_all::<group::Model>(&[FilterParam::eq("assigned_test_id", tests)])
            .await?
        {
            keys.push(LockKey::Group(g.id));
            for s in store
                .find_all::<student::Model>(&[FilterParam::eq("group_id", g.id)])
                .await?
            {
                keys.push(LockKey::Student(s.id));
            }
        }
    }
    for t in store.find_all::<test::Model>(&[]).await? {
        if students.iter().any(|id| t.participant_ids.contains(*id)) {
            keys.push(LockKey::Test(t.id));
        }
    }
    Ok(keys)
}
