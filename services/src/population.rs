//! Manual joins.
//!
//! Neither backend is asked to join: related records are fetched by id list and
//! stitched together here, so both stores produce identical views.

use db::models::{group, question, student, teacher, test};
use db::{Record, Store};
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use util::filters::FilterParam;

use crate::error::ServiceResult;

/// Fetches the records with the given ids, keyed by id.
pub async fn by_ids<S, R>(store: &S, ids: impl IntoIterator<Item = i64>) -> ServiceResult<HashMap<i64, R>>
where
    S: Store,
    R: Record,
{
    let ids: Vec<i64> = ids.into_iter().collect::<HashSet<_>>().into_iter().collect();
    if ids.is_empty() {
        return Ok(HashMap::new());
    }
    let records = store.find_all::<R>(&[FilterParam::eq("id", ids)]).await?;
    Ok(records.into_iter().map(|r| (r.id(), r)).collect())
}

#[derive(Debug, Clone, Serialize)]
pub struct TestSummary {
    pub id: i64,
    pub subject: String,
    pub topic: String,
    pub access_code: String,
    pub question_count: i32,
}

impl From<&test::Model> for TestSummary {
    fn from(t: &test::Model) -> Self {
        Self {
            id: t.id,
            subject: t.subject.clone(),
            topic: t.topic.clone(),
            access_code: t.access_code.clone(),
            question_count: t.question_count,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct GroupView {
    #[serde(flatten)]
    pub group: group::Model,
    pub teacher_name: Option<String>,
    pub assigned_test: Option<TestSummary>,
    pub student_count: usize,
}

/// A question as shown to a student taking a test: no correct option.
#[derive(Debug, Clone, Serialize)]
pub struct QuestionView {
    pub id: i64,
    pub question_text: String,
    pub options: Vec<String>,
}

impl From<&question::Model> for QuestionView {
    fn from(q: &question::Model) -> Self {
        Self {
            id: q.id,
            question_text: q.question_text.clone(),
            options: q.options.0.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AnsweredQuestion {
    pub question_id: i64,
    pub question_text: Option<String>,
    pub selected_option: i32,
    pub option_text: Option<String>,
    pub correct_option: Option<i32>,
    pub is_correct: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct StudentView {
    #[serde(flatten)]
    pub student: student::Model,
    pub group_name: Option<String>,
    pub teacher_name: Option<String>,
    pub test_topic: Option<String>,
    pub answered: Vec<AnsweredQuestion>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TestView {
    #[serde(flatten)]
    pub test: test::Model,
    pub questions: Vec<question::Model>,
}

/// Questions of `test` in the test's order. Ids without a record are skipped.
pub async fn test_questions<S: Store>(store: &S, test: &test::Model) -> ServiceResult<Vec<question::Model>> {
    let mut found = by_ids::<S, question::Model>(store, test.question_ids.iter().copied()).await?;
    Ok(test
        .question_ids
        .iter()
        .filter_map(|id| found.remove(id))
        .collect())
}

pub async fn populate_test<S: Store>(store: &S, test: test::Model) -> ServiceResult<TestView> {
    let questions = test_questions(store, &test).await?;
    Ok(TestView { test, questions })
}

pub async fn populate_groups<S: Store>(store: &S, groups: Vec<group::Model>) -> ServiceResult<Vec<GroupView>> {
    let teachers = by_ids::<S, teacher::Model>(store, groups.iter().map(|g| g.teacher_id)).await?;
    let tests = by_ids::<S, test::Model>(store, groups.iter().filter_map(|g| g.assigned_test_id)).await?;

    let group_ids: Vec<i64> = groups.iter().map(|g| g.id).collect();
    let mut counts: HashMap<i64, usize> = HashMap::new();
    if !group_ids.is_empty() {
        let members = store
            .find_all::<student::Model>(&[FilterParam::eq("group_id", group_ids)])
            .await?;
        for m in members {
            if let Some(gid) = m.group_id {
                *counts.entry(gid).or_default() += 1;
            }
        }
    }

    Ok(groups
        .into_iter()
        .map(|group| GroupView {
            teacher_name: teachers.get(&group.teacher_id).map(|t| t.name.clone()),
            assigned_test: group
                .assigned_test_id
                .and_then(|id| tests.get(&id))
                .map(TestSummary::from),
            student_count: counts.get(&group.id).copied().unwrap_or(0),
            group,
        })
        .collect())
}

pub async fn populate_students<S: Store>(
    store: &S,
    students: Vec<student::Model>,
) -> ServiceResult<Vec<StudentView>> {
    let groups = by_ids::<S, group::Model>(store, students.iter().filter_map(|s| s.group_id)).await?;
    let teachers = by_ids::<S, teacher::Model>(store, students.iter().map(|s| s.teacher_id)).await?;
    let tests = by_ids::<S, test::Model>(store, students.iter().filter_map(|s| s.test_id)).await?;
    let questions = by_ids::<S, question::Model>(
        store,
        students
            .iter()
            .flat_map(|s| s.answers.iter().map(|a| a.question_id))
            .collect::<Vec<_>>(),
    )
    .await?;

    Ok(students
        .into_iter()
        .map(|student| {
            let answered = student
                .answers
                .iter()
                .map(|a| {
                    let q = questions.get(&a.question_id);
                    AnsweredQuestion {
                        question_id: a.question_id,
                        question_text: q.map(|q| q.question_text.clone()),
                        selected_option: a.selected_option,
                        option_text: a.option_text.clone(),
                        correct_option: q.map(|q| q.correct_option),
                        is_correct: q.is_some_and(|q| q.is_correct(a.selected_option)),
                    }
                })
                .collect();
            StudentView {
                group_name: student
                    .group_id
                    .and_then(|id| groups.get(&id))
                    .map(|g| g.name.clone()),
                teacher_name: teachers.get(&student.teacher_id).map(|t| t.name.clone()),
                test_topic: student
                    .test_id
                    .and_then(|id| tests.get(&id))
                    .map(|t| t.topic.clone()),
                answered,
                student,
            }
        })
        .collect())
}
