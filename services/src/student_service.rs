use chrono::Utc;
use db::Store;
use db::models::student::{self, AnswerList, EarlyAccess, StudentStatus};
use db::models::{group, test};
use serde::Deserialize;
use tracing::info;
use util::filters::FilterParam;
use util::locks::LockKey;
use validator::Validate;

use crate::error::{ServiceError, ServiceResult};
use crate::identity_allocator::{CodeKind, IdentityAllocator};
use crate::population::{StudentView, populate_students};
use crate::session::{Actor, Session};

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateStudent {
    #[validate(length(min = 1, message = "Full name cannot be empty"))]
    pub full_name: String,

    pub phone_number: Option<String>,

    pub group_id: i64,

    /// Defaults to the group's subject.
    pub chosen_subject: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateStudent {
    #[validate(length(min = 1, message = "Full name cannot be empty"))]
    pub full_name: Option<String>,

    pub phone_number: Option<String>,

    pub chosen_subject: Option<String>,

    /// Moving a student to another group resets their attempt.
    pub group_id: Option<i64>,
}

pub struct StudentService;

impl StudentService {
    /// Creates a pending student in a group, with a fresh login code.
    pub async fn create<S: Store>(
        session: &Session<S>,
        actor: &Actor,
        req: CreateStudent,
    ) -> ServiceResult<student::Model> {
        req.validate()?;
        let store = &session.store;
        let _locks = session
            .lock(vec![CodeKind::StudentLogin.lock_key(), LockKey::Group(req.group_id)])
            .await;

        let group: group::Model = store.get(req.group_id).await?;
        actor.ensure_manages(group.teacher_id, "group")?;

        let login_code = IdentityAllocator::allocate(store, CodeKind::StudentLogin).await?;
        let now = Utc::now();
        let student = store
            .insert(student::Model {
                id: 0,
                full_name: req.full_name.trim().to_string(),
                login_code,
                phone_number: req.phone_number.filter(|p| !p.trim().is_empty()),
                chosen_subject: req
                    .chosen_subject
                    .filter(|s| !s.trim().is_empty())
                    .unwrap_or_else(|| group.subject.clone()),
                group_id: Some(group.id),
                teacher_id: group.teacher_id,
                status: StudentStatus::Pending,
                score: 0,
                correct_count: 0,
                wrong_count: 0,
                time_spent: 0,
                answers: AnswerList::default(),
                test_id: None,
                last_access_date: None,
                early_access: EarlyAccess::default(),
                created_at: now,
                updated_at: now,
            })
            .await?;
        info!(student_id = student.id, group_id = group.id, "student created");
        Ok(student)
    }

    /// Own students for a teacher, everyone for an admin, with group, teacher,
    /// test and answered questions attached.
    pub async fn list<S: Store>(session: &Session<S>, actor: &Actor) -> ServiceResult<Vec<StudentView>> {
        let filters = if actor.is_admin() {
            vec![]
        } else {
            vec![FilterParam::eq("teacher_id", actor.id)]
        };
        let students = session.store.find_all::<student::Model>(&filters).await?;
        populate_students(&session.store, students).await
    }

    /// Students who chose `subject`, scoped like [`StudentService::list`].
    pub async fn list_by_subject<S: Store>(
        session: &Session<S>,
        actor: &Actor,
        subject: &str,
    ) -> ServiceResult<Vec<StudentView>> {
        let mut filters = vec![FilterParam::eq("chosen_subject", subject.trim())];
        if !actor.is_admin() {
            filters.push(FilterParam::eq("teacher_id", actor.id));
        }
        let students = session.store.find_all::<student::Model>(&filters).await?;
        populate_students(&session.store, students).await
    }

    pub async fn list_by_group<S: Store>(
        session: &Session<S>,
        actor: &Actor,
        group_id: i64,
    ) -> ServiceResult<Vec<StudentView>> {
        let group: group::Model = session.store.get(group_id).await?;
        actor.ensure_manages(group.teacher_id, "group")?;
        let students = session
            .store
            .find_all::<student::Model>(&[FilterParam::eq("group_id", group_id)])
            .await?;
        populate_students(&session.store, students).await
    }

    pub async fn get<S: Store>(session: &Session<S>, actor: &Actor, student_id: i64) -> ServiceResult<StudentView> {
        let student: student::Model = session.store.get(student_id).await?;
        actor.ensure_manages(student.teacher_id, "student")?;
        populate_students(&session.store, vec![student])
            .await?
            .pop()
            .ok_or_else(|| crate::error::not_found("Student", student_id))
    }

    pub async fn update<S: Store>(
        session: &Session<S>,
        actor: &Actor,
        student_id: i64,
        req: UpdateStudent,
    ) -> ServiceResult<student::Model> {
        req.validate()?;
        let store = &session.store;
        let current: student::Model = store.get(student_id).await?;

        let mut keys = vec![LockKey::Student(student_id)];
        keys.extend(current.group_id.map(LockKey::Group));
        keys.extend(req.group_id.map(LockKey::Group));
        let _locks = session.lock(keys).await;

        let mut student: student::Model = store.get(student_id).await?;
        actor.ensure_manages(student.teacher_id, "student")?;

        if let Some(name) = req.full_name {
            student.full_name = name.trim().to_string();
        }
        if let Some(phone) = req.phone_number {
            student.phone_number = Some(phone).filter(|p| !p.trim().is_empty());
        }
        if let Some(subject) = req.chosen_subject.filter(|s| !s.trim().is_empty()) {
            student.chosen_subject = subject;
        }
        if let Some(gid) = req.group_id.filter(|gid| student.group_id != Some(*gid)) {
            if student.group_id != current.group_id {
                return Err(ServiceError::Conflict(
                    "Student changed group meanwhile, please retry".into(),
                ));
            }
            let target: group::Model = store.get(gid).await?;
            actor.ensure_manages(target.teacher_id, "group")?;
            student.group_id = Some(gid);
            student.reset_attempt();
        }
        student.updated_at = Utc::now();
        Ok(store.update(student).await?)
    }

    /// Deletes a student and removes them from every test's participant list.
    pub async fn delete<S: Store>(session: &Session<S>, actor: &Actor, student_id: i64) -> ServiceResult<()> {
        let store = &session.store;
        let _locks = session
            .lock_planned(move || async move {
                let mut keys = vec![LockKey::Student(student_id)];
                keys.extend(
                    participating_tests(store, student_id)
                        .await?
                        .iter()
                        .map(|t| LockKey::Test(t.id)),
                );
                Ok(keys)
            })
            .await?;

        let student: student::Model = store.get(student_id).await?;
        actor.ensure_manages(student.teacher_id, "student")?;

        let now = Utc::now();
        let tests: Vec<test::Model> = participating_tests(store, student_id)
            .await?
            .into_iter()
            .map(|mut t| {
                t.participant_ids.remove(student_id);
                t.updated_at = now;
                t
            })
            .collect();
        let cleaned = tests.len();
        store.update_batch(tests).await?;
        store.delete_by_id::<student::Model>(student_id).await?;

        info!(student_id, tests_cleaned = cleaned, "student deleted");
        Ok(())
    }
}

async fn participating_tests<S: Store>(store: &S, student_id: i64) -> ServiceResult<Vec<test::Model>> {
    Ok(store
        .find_all::<test::Model>(&[])
        .await?
        .into_iter()
        .filter(|t| t.participant_ids.contains(student_id))
        .collect())
}
