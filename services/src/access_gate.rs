//! Cooldown and early-access approval.
//!
//! The gate state is derived from the student record, never stored:
//!
//! | state                                  | may start |
//! |----------------------------------------|-----------|
//! | `Eligible`                             | yes       |
//! | `CooldownBlocked`                      | no, may request early access |
//! | `CooldownBlockedWithPendingRequest`    | no, awaiting a decision |
//! | `CooldownBlockedApproved`              | yes, the approval overrides the cooldown |
//! | `AlreadySubmitted`                     | no, the current assignment is graded |
//!
//! An approval is spent by the next successful submission.

use chrono::{DateTime, Duration, Utc};
use db::Store;
use db::models::student::{
    self, ActorKind, EarlyAccess, EarlyAccessEntry, EarlyAccessState, EarlyAccessTransition,
};
use db::models::{group, test};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::info;
use util::filters::FilterParam;
use util::locks::LockKey;

use crate::error::{ServiceError, ServiceResult};
use crate::population::{QuestionView, test_questions};
use crate::session::{Actor, Session};

pub const COOLDOWN_DAYS: i64 = 7;

const DAY_MS: i64 = 24 * 60 * 60 * 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateState {
    Eligible,
    CooldownBlocked { days_remaining: i64 },
    CooldownBlockedWithPendingRequest { days_remaining: i64 },
    CooldownBlockedApproved,
    AlreadySubmitted,
}

impl GateState {
    pub fn may_start(&self) -> bool {
        matches!(self, GateState::Eligible | GateState::CooldownBlockedApproved)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockReason {
    Cooldown,
    AwaitingApproval,
    AlreadySubmitted,
}

/// What a blocked student is told, with enough detail to offer the next step.
#[derive(Debug, Clone, Serialize)]
pub struct Blocked {
    pub reason: BlockReason,
    pub message: String,
    pub can_request_early_access: bool,
    pub days_remaining: Option<i64>,
    pub early_access_request: Option<EarlyAccess>,
}

/// Payload of an accepted `start`.
#[derive(Debug, Clone, Serialize)]
pub struct StartedAttempt {
    pub student_id: i64,
    pub full_name: String,
    pub chosen_subject: String,
    pub test_id: i64,
    pub topic: String,
    pub assignment_version: i64,
    pub questions: Vec<QuestionView>,
}

#[derive(Debug, Clone)]
pub enum StartOutcome {
    Started(StartedAttempt),
    Blocked(Blocked),
}

pub struct AccessGate;

impl AccessGate {
    /// Derives the gate state of `student` against the test currently assigned to
    /// their group.
    ///
    /// The cooldown is checked first. The duplicate-attempt guard applies only
    /// to a student the cooldown lets through. An approval bypasses both.
    pub fn evaluate(student: &student::Model, assigned_test_id: Option<i64>, now: DateTime<Utc>) -> GateState {
        let approved = student.early_access.is_approved();

        if let Some(last) = student.last_access_date {
            let remaining = Duration::days(COOLDOWN_DAYS) - (now - last);
            if remaining > Duration::zero() {
                let days_remaining = ceil_days(remaining);
                return if approved {
                    GateState::CooldownBlockedApproved
                } else if student.early_access.is_requested() {
                    GateState::CooldownBlockedWithPendingRequest { days_remaining }
                } else {
                    GateState::CooldownBlocked { days_remaining }
                };
            }
        }

        if !approved
            && student.is_checked()
            && assigned_test_id.is_some()
            && student.test_id == assigned_test_id
        {
            return GateState::AlreadySubmitted;
        }

        GateState::Eligible
    }

    pub fn blocked(state: GateState, student: &student::Model) -> Option<Blocked> {
        let requested = student.early_access.is_requested();
        let blocked = match state {
            GateState::Eligible | GateState::CooldownBlockedApproved => return None,
            GateState::CooldownBlocked { days_remaining } => Blocked {
                reason: BlockReason::Cooldown,
                message: format!(
                    "You can take the test again in {} day(s). You may ask your teacher for early access.",
                    days_remaining
                ),
                can_request_early_access: true,
                days_remaining: Some(days_remaining),
                early_access_request: None,
            },
            GateState::CooldownBlockedWithPendingRequest { days_remaining } => Blocked {
                reason: BlockReason::AwaitingApproval,
                message: "Your early access request is awaiting approval.".into(),
                can_request_early_access: false,
                days_remaining: Some(days_remaining),
                early_access_request: Some(student.early_access.clone()),
            },
            GateState::AlreadySubmitted => Blocked {
                reason: BlockReason::AlreadySubmitted,
                message: "You have already submitted this test.".into(),
                can_request_early_access: !requested,
                days_remaining: None,
                early_access_request: requested.then(|| student.early_access.clone()),
            },
        };
        Some(blocked)
    }

    /// Resolves the login code and, if the gate allows it, hands out the
    /// questions of the group's current test without their correct options.
    pub async fn start<S: Store>(session: &Session<S>, login_code: &str) -> ServiceResult<StartOutcome> {
        let store = &session.store;
        let student = find_by_login(store, login_code).await?;

        let group_id = student
            .group_id
            .ok_or_else(|| ServiceError::Conflict("Student is not in a group".into()))?;
        let group: group::Model = store.get(group_id).await?;
        let test_id = group
            .assigned_test_id
            .ok_or_else(|| ServiceError::NotFound("No test is assigned to your group".into()))?;

        let state = Self::evaluate(&student, Some(test_id), Utc::now());
        if let Some(blocked) = Self::blocked(state, &student) {
            info!(student_id = student.id, reason = ?blocked.reason, "start blocked");
            return Ok(StartOutcome::Blocked(blocked));
        }

        let test: test::Model = store.get(test_id).await?;
        let questions = test_questions(store, &test).await?;
        info!(student_id = student.id, test_id, "attempt started");

        Ok(StartOutcome::Started(StartedAttempt {
            student_id: student.id,
            full_name: student.full_name,
            chosen_subject: student.chosen_subject,
            test_id,
            topic: test.topic,
            assignment_version: group.assignment_version,
            questions: questions.iter().map(QuestionView::from).collect(),
        }))
    }

    /// Opens (or reopens) an early-access request, discarding any earlier decision.
    pub async fn request_early_access<S: Store>(
        session: &Session<S>,
        login_code: &str,
    ) -> ServiceResult<student::Model> {
        let store = &session.store;
        let found = find_by_login(store, login_code).await?;
        let _locks = session.lock(vec![LockKey::Student(found.id)]).await;

        let mut student: student::Model = store.get(found.id).await?;
        let now = Utc::now();
        let ea = &mut student.early_access;
        ea.state = EarlyAccessState::Requested;
        ea.requested_at = Some(now);
        ea.decided_at = None;
        ea.decided_by = None;
        ea.decided_role = None;
        ea.history.push(EarlyAccessEntry {
            transition: EarlyAccessTransition::Requested,
            actor_id: Some(student.id),
            actor_role: ActorKind::Student,
            at: now,
        });
        student.updated_at = now;

        let student = store.update(student).await?;
        info!(student_id = student.id, "early access requested");
        Ok(student)
    }

    /// Approves or denies an open request. A single decision by the owning
    /// teacher or an admin is enough, and may be revised until the approval is
    /// spent.
    pub async fn decide_early_access<S: Store>(
        session: &Session<S>,
        actor: &Actor,
        student_id: i64,
        approved: bool,
    ) -> ServiceResult<student::Model> {
        let store = &session.store;
        let _locks = session.lock(vec![LockKey::Student(student_id)]).await;

        let mut student: student::Model = store.get(student_id).await?;
        if !actor.is_admin() && !teaches(store, actor, &student).await? {
            return Err(ServiceError::Forbidden(
                "You can only decide requests of your own students".into(),
            ));
        }
        if student.early_access.state == EarlyAccessState::None {
            return Err(ServiceError::Conflict(
                "Student has no open early access request".into(),
            ));
        }

        let now = Utc::now();
        let role = if actor.is_admin() {
            ActorKind::Admin
        } else {
            ActorKind::Teacher
        };
        let (state, transition) = if approved {
            (EarlyAccessState::Approved, EarlyAccessTransition::Approved)
        } else {
            (EarlyAccessState::Denied, EarlyAccessTransition::Denied)
        };
        let ea = &mut student.early_access;
        ea.state = state;
        ea.decided_at = Some(now);
        ea.decided_by = Some(actor.id);
        ea.decided_role = Some(role);
        ea.history.push(EarlyAccessEntry {
            transition,
            actor_id: Some(actor.id),
            actor_role: role,
            at: now,
        });
        student.updated_at = now;

        let student = store.update(student).await?;
        info!(student_id, approver = actor.id, approved, "early access decided");
        Ok(student)
    }

    /// Students with an open request: the teacher's own students and members of
    /// the teacher's groups, or everyone for an admin.
    pub async fn pending_approvals<S: Store>(session: &Session<S>, actor: &Actor) -> ServiceResult<Vec<student::Model>> {
        let store = &session.store;
        let candidates: Vec<student::Model> = if actor.is_admin() {
            store.find_all(&[]).await?
        } else {
            let group_ids: Vec<i64> = store
                .find_all::<group::Model>(&[FilterParam::eq("teacher_id", actor.id)])
                .await?
                .into_iter()
                .map(|g| g.id)
                .collect();
            let mut by_id: BTreeMap<i64, student::Model> = store
                .find_all::<student::Model>(&[FilterParam::eq("teacher_id", actor.id)])
                .await?
                .into_iter()
                .map(|s| (s.id, s))
                .collect();
            if !group_ids.is_empty() {
                for s in store
                    .find_all::<student::Model>(&[FilterParam::eq("group_id", group_ids)])
                    .await?
                {
                    by_id.entry(s.id).or_insert(s);
                }
            }
            by_id.into_values().collect()
        };

        Ok(candidates
            .into_iter()
            .filter(|s| s.early_access.is_requested())
            .collect())
    }
}

fn ceil_days(remaining: Duration) -> i64 {
    let ms = remaining.num_milliseconds();
    (ms + DAY_MS - 1).div_euclid(DAY_MS)
}

pub(crate) async fn find_by_login<S: Store>(store: &S, login_code: &str) -> ServiceResult<student::Model> {
    store
        .find_one::<student::Model>(&[FilterParam::eq("login_code", login_code.trim())])
        .await?
        .ok_or_else(|| ServiceError::NotFound("No student with this login code".into()))
}

/// Whether `actor` owns the student directly or through the student's group.
async fn teaches<S: Store>(store: &S, actor: &Actor, student: &student::Model) -> ServiceResult<bool> {
    if student.teacher_id == actor.id {
        return Ok(true);
    }
    match student.group_id {
        Some(gid) => Ok(store
            .find_by_id::<group::Model>(gid)
            .await?
            .is_some_and(|g| g.teacher_id == actor.id)),
        None => Ok(false),
    }
}
