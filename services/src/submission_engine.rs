//! Grades attempts and records the terminal state.

use chrono::Utc;
use db::Store;
use db::models::question::{self, OPTION_COUNT};
use db::models::student::{
    self, ActorKind, Answer, AnswerList, EarlyAccess, EarlyAccessEntry, EarlyAccessState,
    EarlyAccessTransition, StudentStatus,
};
use db::models::{group, test};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use tracing::info;
use util::locks::LockKey;

use crate::access_gate::{AccessGate, GateState};
use crate::error::{ServiceError, ServiceResult};
use crate::population::test_questions;
use crate::session::Session;

/// A completed attempt as sent by the student.
#[derive(Debug, Clone, Deserialize)]
pub struct Submission {
    pub student_id: i64,
    pub test_id: i64,
    pub answers: Vec<SubmittedAnswer>,
    /// Seconds.
    #[serde(default)]
    pub time_spent: i64,
    /// The version handed out by `start`. When present it must still be current.
    #[serde(default)]
    pub assignment_version: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SubmittedAnswer {
    pub question_id: i64,
    pub selected_option: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Grade {
    pub correct: i32,
    pub wrong: i32,
}

impl Grade {
    pub fn answered(&self) -> i32 {
        self.correct + self.wrong
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SubmissionResult {
    pub score: i32,
    pub correct_count: i32,
    pub wrong_count: i32,
    pub question_count: i32,
}

pub struct SubmissionEngine;

impl SubmissionEngine {
    /// Grades by option index.
    ///
    /// Only questions of the test count, each at most once (first answer wins).
    /// Unanswered questions count neither as correct nor as wrong. Returns the
    /// grade and the answers that were graded, with their option text.
    pub fn grade(test: &test::Model, questions: &[question::Model], answers: &[SubmittedAnswer]) -> (Grade, Vec<Answer>) {
        let by_id: HashMap<i64, &question::Model> = questions
            .iter()
            .filter(|q| test.question_ids.contains(q.id))
            .map(|q| (q.id, q))
            .collect();

        let mut seen = HashSet::new();
        let mut grade = Grade { correct: 0, wrong: 0 };
        let mut graded = Vec::new();
        for a in answers {
            let Some(q) = by_id.get(&a.question_id) else {
                continue;
            };
            if !seen.insert(a.question_id) {
                continue;
            }
            if q.is_correct(a.selected_option) {
                grade.correct += 1;
            } else {
                grade.wrong += 1;
            }
            graded.push(Answer {
                question_id: a.question_id,
                selected_option: a.selected_option,
                option_text: usize::try_from(a.selected_option)
                    .ok()
                    .and_then(|i| q.options.get(i))
                    .cloned(),
            });
        }
        (grade, graded)
    }

    /// Grades and stores an attempt.
    ///
    /// Runs under the locks of the student's group, the student and the test,
    /// so it cannot interleave with a reassignment of the group or with a
    /// duplicate submission. The gate is evaluated again here; passing it at
    /// `start` is not enough.
    pub async fn submit<S: Store>(session: &Session<S>, submission: Submission) -> ServiceResult<SubmissionResult> {
        validate(&submission)?;
        let store = &session.store;
        let student_id = submission.student_id;
        let test_id = submission.test_id;

        let _locks = session
            .lock_planned(move || async move {
                let student: student::Model = store.get(student_id).await?;
                let mut keys = vec![LockKey::Student(student_id), LockKey::Test(test_id)];
                if let Some(gid) = student.group_id {
                    keys.push(LockKey::Group(gid));
                }
                Ok(keys)
            })
            .await?;

        let mut student: student::Model = store.get(student_id).await?;
        let group_id = student
            .group_id
            .ok_or_else(|| ServiceError::Conflict("Student is not in a group".into()))?;
        let group: group::Model = store.get(group_id).await?;

        if group.assigned_test_id != Some(test_id) {
            return Err(ServiceError::Conflict(
                "This test is no longer assigned to your group".into(),
            ));
        }
        if submission
            .assignment_version
            .is_some_and(|v| v != group.assignment_version)
        {
            return Err(ServiceError::Conflict(
                "The assignment changed since the attempt started".into(),
            ));
        }

        // A graded attempt on this assignment is a duplicate whatever the cooldown says.
        let approved = student.early_access.is_approved();
        if !approved && student.is_checked() && student.test_id == Some(test_id) {
            return Err(ServiceError::Conflict("You have already submitted this test".into()));
        }

        let now = Utc::now();
        match AccessGate::evaluate(&student, group.assigned_test_id, now) {
            GateState::AlreadySubmitted => {
                return Err(ServiceError::Conflict("You have already submitted this test".into()));
            }
            state if !state.may_start() => {
                let message = AccessGate::blocked(state, &student)
                    .map(|b| b.message)
                    .unwrap_or_else(|| "Attempt is not allowed yet".into());
                return Err(ServiceError::Forbidden(message));
            }
            _ => {}
        }

        let mut test: test::Model = store.get(test_id).await?;
        let questions = test_questions(store, &test).await?;
        let (grade, graded) = Self::grade(&test, &questions, &submission.answers);

        // Participation first: if the student write below fails, a retry finds
        // the student still pending and the participant entry already present.
        if test.participant_ids.insert(student.id) {
            test.updated_at = now;
            store.update(test.clone()).await?;
        }

        student.status = StudentStatus::Checked;
        student.score = grade.correct;
        student.correct_count = grade.correct;
        student.wrong_count = grade.wrong;
        student.time_spent = submission.time_spent;
        student.answers = AnswerList(graded);
        student.test_id = Some(test_id);
        student.last_access_date = Some(now);
        consume_early_access(&mut student.early_access, student.id, now);
        student.updated_at = now;
        let student = store.update(student).await?;

        info!(
            student_id = student.id,
            test_id,
            score = grade.correct,
            answered = grade.answered(),
            "attempt graded"
        );

        Ok(SubmissionResult {
            score: student.score,
            correct_count: student.correct_count,
            wrong_count: student.wrong_count,
            question_count: test.question_count,
        })
    }
}

fn validate(submission: &Submission) -> ServiceResult<()> {
    if submission.time_spent < 0 {
        return Err(ServiceError::Validation("time_spent cannot be negative".into()));
    }
    let max = OPTION_COUNT as i32;
    if let Some(bad) = submission
        .answers
        .iter()
        .find(|a| a.selected_option < 0 || a.selected_option >= max)
    {
        return Err(ServiceError::Validation(format!(
            "selected_option for question {} must be between 0 and {}",
            bad.question_id,
            max - 1
        )));
    }
    Ok(())
}

/// Returns the request to its empty form; an approval is logged as spent.
fn consume_early_access(ea: &mut EarlyAccess, student_id: i64, now: chrono::DateTime<Utc>) {
    if ea.state == EarlyAccessState::Approved {
        ea.history.push(EarlyAccessEntry {
            transition: EarlyAccessTransition::Consumed,
            actor_id: Some(student_id),
            actor_role: ActorKind::Student,
            at: now,
        });
    }
    ea.state = EarlyAccessState::None;
    ea.requested_at = None;
    ea.decided_at = None;
    ea.decided_by = None;
    ea.decided_role = None;
}
