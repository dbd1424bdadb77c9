use chrono::Utc;
use db::Store;
use db::models::types::IdList;
use db::models::{group, question, student, test};
use rand::seq::IndexedRandom;
use serde::Deserialize;
use std::collections::HashSet;
use tracing::info;
use util::filters::FilterParam;
use util::locks::LockKey;
use validator::Validate;

use crate::assignment_graph::{AssignmentGraph, member_keys};
use crate::error::{ServiceError, ServiceResult};
use crate::identity_allocator::{CodeKind, IdentityAllocator};
use crate::population::{TestView, by_ids, populate_test};
use crate::session::{Actor, Session};

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateTest {
    #[validate(length(min = 1, message = "Topic cannot be empty"))]
    pub topic: String,

    pub subject: Option<String>,

    /// Explicit question set, in order.
    pub question_ids: Option<Vec<i64>>,

    /// Number of questions to draw at random from the teacher's bank when no
    /// explicit set is given.
    #[validate(range(min = 1, message = "count must be at least 1"))]
    pub count: Option<usize>,
}

pub struct TestService;

impl TestService {
    pub async fn create<S: Store>(session: &Session<S>, actor: &Actor, req: CreateTest) -> ServiceResult<test::Model> {
        req.validate()?;
        let store = &session.store;

        let (subject, question_ids) = match (req.question_ids, req.count) {
            (Some(ids), _) => {
                let ids = dedup(ids);
                let found = by_ids::<S, question::Model>(store, ids.iter().copied()).await?;
                if let Some(missing) = ids.iter().find(|id| !found.contains_key(*id)) {
                    return Err(crate::error::not_found("Question", *missing));
                }
                if found.values().any(|q| q.teacher_id != actor.id) {
                    return Err(ServiceError::Forbidden(
                        "A test can only use your own questions".into(),
                    ));
                }
                let subject = req
                    .subject
                    .or_else(|| ids.first().and_then(|id| found.get(id)).map(|q| q.subject.clone()))
                    .ok_or_else(|| ServiceError::Validation("A test needs at least one question".into()))?;
                (subject, ids)
            }
            (None, Some(count)) => {
                let subject = match req.subject {
                    Some(s) => s,
                    None => store
                        .get::<db::models::teacher::Model>(actor.id)
                        .await?
                        .subject
                        .ok_or_else(|| ServiceError::Validation("Test subject is required".into()))?,
                };
                let bank = store
                    .find_all::<question::Model>(&[
                        FilterParam::eq("teacher_id", actor.id),
                        FilterParam::eq("subject", subject.clone()),
                    ])
                    .await?;
                if bank.len() < count {
                    return Err(ServiceError::Validation(format!(
                        "Only {} {} question(s) available, {} requested",
                        bank.len(),
                        subject,
                        count
                    )));
                }
                let ids: Vec<i64> = bank
                    .choose_multiple(&mut rand::rng(), count)
                    .map(|q| q.id)
                    .collect();
                (subject, ids)
            }
            (None, None) => {
                return Err(ServiceError::Validation(
                    "Provide question_ids or a question count".into(),
                ));
            }
        };

        if question_ids.is_empty() {
            return Err(ServiceError::Validation("A test needs at least one question".into()));
        }

        let _locks = session.lock(vec![CodeKind::TestAccess.lock_key()]).await;
        let access_code = IdentityAllocator::allocate(store, CodeKind::TestAccess).await?;
        let now = Utc::now();
        let test = store
            .insert(test::Model {
                id: 0,
                teacher_id: actor.id,
                subject,
                topic: req.topic.trim().to_string(),
                question_count: question_ids.len() as i32,
                question_ids: IdList(question_ids),
                access_code,
                is_active: true,
                participant_ids: IdList::default(),
                created_at: now,
                updated_at: now,
            })
            .await?;
        info!(test_id = test.id, teacher_id = actor.id, questions = test.question_count, "test created");
        Ok(test)
    }

    /// Active tests: the teacher's own, or all of them for an admin.
    pub async fn list<S: Store>(session: &Session<S>, actor: &Actor) -> ServiceResult<Vec<test::Model>> {
        let mut filters = vec![FilterParam::eq("is_active", true)];
        if !actor.is_admin() {
            filters.push(FilterParam::eq("teacher_id", actor.id));
        }
        Ok(session.store.find_all(&filters).await?)
    }

    pub async fn get<S: Store>(session: &Session<S>, actor: &Actor, test_id: i64) -> ServiceResult<TestView> {
        let test: test::Model = session.store.get(test_id).await?;
        actor.ensure_manages(test.teacher_id, "test")?;
        populate_test(&session.store, test).await
    }

    /// Appends questions not yet in the test and recomputes the count.
    pub async fn add_questions<S: Store>(
        session: &Session<S>,
        actor: &Actor,
        test_id: i64,
        question_ids: Vec<i64>,
    ) -> ServiceResult<test::Model> {
        let store = &session.store;
        let _locks = session.lock(vec![LockKey::Test(test_id)]).await;
        let mut test: test::Model = store.get(test_id).await?;
        actor.ensure_manages(test.teacher_id, "test")?;

        let found = by_ids::<S, question::Model>(store, question_ids.iter().copied()).await?;
        if let Some(missing) = question_ids.iter().find(|id| !found.contains_key(*id)) {
            return Err(crate::error::not_found("Question", *missing));
        }
        if found.values().any(|q| q.teacher_id != test.teacher_id) {
            return Err(ServiceError::Forbidden(
                "A test can only use its teacher's questions".into(),
            ));
        }

        for id in question_ids {
            test.question_ids.insert(id);
        }
        test.question_count = test.question_ids.len() as i32;
        test.updated_at = Utc::now();
        Ok(store.update(test).await?)
    }

    /// Deletes a test. Groups that had it assigned lose the assignment and their
    /// members' attempts are reset; students graded on it lose that grade.
    pub async fn delete<S: Store>(session: &Session<S>, actor: &Actor, test_id: i64) -> ServiceResult<()> {
        let store = &session.store;
        let _locks = session
            .lock_planned(move || async move {
                let mut keys = vec![LockKey::Test(test_id)];
                for g in store
                    .find_all::<group::Model>(&[FilterParam::eq("assigned_test_id", test_id)])
                    .await?
                {
                    keys.push(LockKey::Group(g.id));
                    keys.extend(member_keys(store, g.id).await?);
                }
                for s in store
                    .find_all::<student::Model>(&[FilterParam::eq("test_id", test_id)])
                    .await?
                {
                    keys.push(LockKey::Student(s.id));
                }
                Ok(keys)
            })
            .await?;

        let test: test::Model = store.get(test_id).await?;
        actor.ensure_manages(test.teacher_id, "test")?;

        let groups = AssignmentGraph::unassign_test(store, test_id).await?;

        let now = Utc::now();
        let graded: Vec<student::Model> = store
            .find_all::<student::Model>(&[FilterParam::eq("test_id", test_id)])
            .await?
            .into_iter()
            .map(|mut s| {
                s.reset_attempt();
                s.updated_at = now;
                s
            })
            .collect();
        store.update_batch(graded).await?;
        store.delete_by_id::<test::Model>(test_id).await?;

        info!(test_id, groups_unassigned = groups.len(), "test deleted");
        Ok(())
    }
}

fn dedup(ids: Vec<i64>) -> Vec<i64> {
    let mut seen = HashSet::new();
    ids.into_iter().filter(|id| seen.insert(*id)).collect()
}
