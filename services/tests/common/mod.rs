#![allow(dead_code)]

use chrono::{Duration, Utc};
use db::Store;
use db::models::teacher::Role;
use db::models::{group, question, student, test};
use services::assignment_graph::{AssignmentGraph, CreateGroup};
use services::question_service::{CreateQuestion, QuestionService};
use services::student_service::{CreateStudent, StudentService};
use services::submission_engine::{Submission, SubmittedAnswer};
use services::teacher_service::{CreateTeacher, TeacherService};
use services::test_service::{CreateTest, TestService};
use services::{Actor, Session};
use util::locks::KeyedLocks;

/// Runs each named check once against an in-memory primary store and once
/// against a fallback store in a temporary directory.
macro_rules! both_backends {
    ($($check:ident),* $(,)?) => {
        mod primary {
            $(
                #[tokio::test]
                async fn $check() {
                    super::$check(db::test_utils::setup_sql_store().await).await;
                }
            )*
        }

        mod fallback {
            $(
                #[tokio::test]
                async fn $check() {
                    let dir = tempfile::TempDir::new().unwrap();
                    super::$check(db::FileStore::new(dir.path())).await;
                }
            )*
        }
    };
}

/// An admin, a Math teacher with five questions (correct option 1), a test over
/// them and a group with that test assigned.
pub struct World<S: Store> {
    pub session: Session<S>,
    pub admin: Actor,
    pub teacher: Actor,
    pub questions: Vec<question::Model>,
    pub test: test::Model,
    pub group: group::Model,
}

pub async fn world<S: Store>(store: S) -> World<S> {
    let session = Session::new(store, KeyedLocks::new());

    let admin = TeacherService::insert_teacher(
        &session.store,
        CreateTeacher {
            name: "Head".into(),
            email: "head@school.test".into(),
            subject: None,
            role: Role::Admin,
        },
    )
    .await
    .unwrap();
    let admin = Actor::new(admin.id, Role::Admin);

    let teacher = TeacherService::create(
        &session,
        &admin,
        CreateTeacher {
            name: "Ms Frizzle".into(),
            email: "frizzle@school.test".into(),
            subject: Some("Math".into()),
            role: Role::Teacher,
        },
    )
    .await
    .unwrap();
    let teacher = Actor::new(teacher.id, Role::Teacher);

    let questions = add_questions(&session, &teacher, 5).await;
    let test = make_test(&session, &teacher, &questions, "Fractions").await;

    let group = AssignmentGraph::create_group(
        &session,
        &teacher,
        CreateGroup {
            name: "7A".into(),
            subject: None,
            teacher_id: None,
        },
    )
    .await
    .unwrap();
    let group = AssignmentGraph::assign_test(&session, &teacher, group.id, test.id)
        .await
        .unwrap();

    World {
        session,
        admin,
        teacher,
        questions,
        test,
        group,
    }
}

pub async fn add_questions<S: Store>(session: &Session<S>, teacher: &Actor, n: usize) -> Vec<question::Model> {
    let mut out = Vec::with_capacity(n);
    for i in 0..n {
        out.push(
            QuestionService::create(
                session,
                teacher,
                CreateQuestion {
                    question_text: format!("What is {i} + 1?"),
                    options: vec!["0".into(), "right".into(), "2".into(), "3".into()],
                    correct_option: 1,
                    subject: None,
                },
            )
            .await
            .unwrap(),
        );
    }
    out
}

pub async fn make_test<S: Store>(
    session: &Session<S>,
    teacher: &Actor,
    questions: &[question::Model],
    topic: &str,
) -> test::Model {
    TestService::create(
        session,
        teacher,
        CreateTest {
            topic: topic.into(),
            subject: None,
            question_ids: Some(questions.iter().map(|q| q.id).collect()),
            count: None,
        },
    )
    .await
    .unwrap()
}

impl<S: Store> World<S> {
    pub async fn student(&self, name: &str) -> student::Model {
        StudentService::create(
            &self.session,
            &self.teacher,
            CreateStudent {
                full_name: name.into(),
                phone_number: None,
                group_id: self.group.id,
                chosen_subject: None,
            },
        )
        .await
        .unwrap()
    }

    pub async fn reload(&self, student_id: i64) -> student::Model {
        self.session.store.get(student_id).await.unwrap()
    }

    /// Moves the student's last completed attempt `days` into the past.
    pub async fn age_last_attempt(&self, student_id: i64, days: i64) -> student::Model {
        let mut s = self.reload(student_id).await;
        s.last_access_date = Some(Utc::now() - Duration::days(days));
        self.session.store.update(s).await.unwrap()
    }

    /// A submission answering the first `answered` questions, the first
    /// `correct` of them correctly.
    pub fn submission(&self, student_id: i64, answered: usize, correct: usize) -> Submission {
        Submission {
            student_id,
            test_id: self.test.id,
            answers: self
                .questions
                .iter()
                .take(answered)
                .enumerate()
                .map(|(i, q)| SubmittedAnswer {
                    question_id: q.id,
                    selected_option: if i < correct { 1 } else { 3 },
                })
                .collect(),
            time_spent: 300,
            assignment_version: None,
        }
    }
}
