#[macro_use]
mod common;

use common::{add_questions, make_test, world};
use db::Store;
use db::models::student::{self, EarlyAccessState, EarlyAccessTransition, StudentStatus};
use db::models::{group, question, subject, task, teacher, test};
use services::ServiceError;
use services::access_gate::{AccessGate, BlockReason, StartOutcome};
use services::assignment_graph::AssignmentGraph;
use services::identity_allocator::{CodeKind, IdentityAllocator};
use services::question_service::{QuestionService, UpdateQuestion};
use services::student_service::{CreateStudent, StudentService};
use services::subject_service::{CreateSubject, SubjectService};
use services::submission_engine::SubmissionEngine;
use services::task_service::{CreateTask, TaskService};
use services::teacher_service::TeacherService;
use services::test_service::TestService;
use std::collections::HashSet;

async fn login_codes_are_unique<S: Store>(store: S) {
    let w = world(store).await;
    let mut codes = HashSet::new();
    for i in 0..25 {
        let s = w.student(&format!("Student {i}")).await;
        assert_eq!(s.login_code.len(), 4);
        assert!(s.login_code.chars().all(|c| c.is_ascii_digit()));
        assert!(codes.insert(s.login_code), "duplicate login code");
    }
}

async fn concurrent_creation_never_duplicates_codes<S: Store>(store: S) {
    let w = world(store).await;
    let mut handles = Vec::new();
    for i in 0..12 {
        let session = w.session.clone();
        let teacher = w.teacher;
        let group_id = w.group.id;
        handles.push(tokio::spawn(async move {
            StudentService::create(
                &session,
                &teacher,
                services::student_service::CreateStudent {
                    full_name: format!("Racer {i}"),
                    phone_number: None,
                    group_id,
                    chosen_subject: None,
                },
            )
            .await
        }));
    }
    let mut codes = HashSet::new();
    for h in handles {
        let s = h.await.unwrap().unwrap();
        assert!(codes.insert(s.login_code));
    }
}

async fn exhausted_code_space_is_a_conflict<S: Store>(store: S) {
    let w = world(store).await;
    let mut s = w.student("Ann").await;
    s.login_code = "1234".into();
    w.session.store.update(s).await.unwrap();

    let err = IdentityAllocator::allocate_with(&w.session.store, CodeKind::StudentLogin, || 1234)
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Conflict(_)));
}

async fn reassignment_resets_members<S: Store>(store: S) {
    let w = world(store).await;
    let ann = w.student("Ann").await;
    let bob = w.student("Bob").await;
    SubmissionEngine::submit(&w.session, w.submission(ann.id, 5, 4)).await.unwrap();

    let second = make_test(&w.session, &w.teacher, &w.questions[..2], "Decimals").await;
    let group = AssignmentGraph::assign_test(&w.session, &w.teacher, w.group.id, second.id)
        .await
        .unwrap();
    assert_eq!(group.assigned_test_id, Some(second.id));
    assert_eq!(group.assignment_version, w.group.assignment_version + 1);

    for id in [ann.id, bob.id] {
        let s = w.reload(id).await;
        assert_eq!(s.status, StudentStatus::Pending);
        assert_eq!(s.score, 0);
        assert!(s.answers.is_empty());
        assert_eq!(s.test_id, None);
    }
    // The cooldown still follows the last completed attempt.
    assert!(w.reload(ann.id).await.last_access_date.is_some());
}

async fn second_submission_is_a_conflict<S: Store>(store: S) {
    let w = world(store).await;
    let ann = w.student("Ann").await;

    let first = SubmissionEngine::submit(&w.session, w.submission(ann.id, 5, 3)).await.unwrap();
    assert_eq!(first.score, 3);

    let err = SubmissionEngine::submit(&w.session, w.submission(ann.id, 5, 5)).await.unwrap_err();
    assert!(matches!(err, ServiceError::Conflict(_)), "got {err:?}");

    let s = w.reload(ann.id).await;
    assert_eq!(s.status, StudentStatus::Checked);
    assert_eq!(s.score, 3);
}

async fn racing_duplicate_submissions_grade_once<S: Store>(store: S) {
    let w = world(store).await;
    let ann = w.student("Ann").await;

    let a = {
        let session = w.session.clone();
        let sub = w.submission(ann.id, 5, 2);
        tokio::spawn(async move { SubmissionEngine::submit(&session, sub).await })
    };
    let b = {
        let session = w.session.clone();
        let sub = w.submission(ann.id, 5, 4);
        tokio::spawn(async move { SubmissionEngine::submit(&session, sub).await })
    };
    let results = [a.await.unwrap(), b.await.unwrap()];

    let ok: Vec<_> = results.iter().filter_map(|r| r.as_ref().ok()).collect();
    assert_eq!(ok.len(), 1);
    assert!(results
        .iter()
        .any(|r| matches!(r, Err(ServiceError::Conflict(_)))));
    assert_eq!(w.reload(ann.id).await.score, ok[0].score);
}

async fn reassignment_racing_submission_leaves_no_stale_grade<S: Store>(store: S) {
    let w = world(store).await;
    let ann = w.student("Ann").await;
    let second = make_test(&w.session, &w.teacher, &w.questions[..3], "Decimals").await;

    let submit = {
        let session = w.session.clone();
        let sub = w.submission(ann.id, 5, 5);
        tokio::spawn(async move { SubmissionEngine::submit(&session, sub).await })
    };
    let assign = {
        let session = w.session.clone();
        let teacher = w.teacher;
        let group_id = w.group.id;
        tokio::spawn(async move { AssignmentGraph::assign_test(&session, &teacher, group_id, second.id).await })
    };

    let submitted = submit.await.unwrap();
    assign.await.unwrap().unwrap();
    assert!(matches!(submitted, Ok(_) | Err(ServiceError::Conflict(_))));

    // Whichever ran first, the reassignment wins.
    let s = w.reload(ann.id).await;
    assert_eq!(s.status, StudentStatus::Pending);
    assert_eq!(s.test_id, None);
}

async fn stale_assignment_version_is_refused<S: Store>(store: S) {
    let w = world(store).await;
    let ann = w.student("Ann").await;

    let mut sub = w.submission(ann.id, 5, 5);
    sub.assignment_version = Some(w.group.assignment_version);
    AssignmentGraph::assign_test(&w.session, &w.teacher, w.group.id, w.test.id)
        .await
        .unwrap();

    let err = SubmissionEngine::submit(&w.session, sub).await.unwrap_err();
    assert!(matches!(err, ServiceError::Conflict(_)));
    assert_eq!(w.reload(ann.id).await.status, StudentStatus::Pending);
}

async fn cooldown_blocks_with_days_remaining<S: Store>(store: S) {
    let w = world(store).await;
    let ann = w.student("Ann").await;
    w.age_last_attempt(ann.id, 3).await;

    match AccessGate::start(&w.session, &ann.login_code).await.unwrap() {
        StartOutcome::Blocked(b) => {
            assert_eq!(b.reason, BlockReason::Cooldown);
            assert_eq!(b.days_remaining, Some(4));
            assert!(b.can_request_early_access);
        }
        StartOutcome::Started(_) => panic!("cooldown should block"),
    }
}

async fn approval_bypasses_cooldown<S: Store>(store: S) {
    let w = world(store).await;
    let ann = w.student("Ann").await;
    w.age_last_attempt(ann.id, 3).await;

    AccessGate::request_early_access(&w.session, &ann.login_code).await.unwrap();
    match AccessGate::start(&w.session, &ann.login_code).await.unwrap() {
        StartOutcome::Blocked(b) => {
            assert_eq!(b.reason, BlockReason::AwaitingApproval);
            assert!(!b.can_request_early_access);
        }
        StartOutcome::Started(_) => panic!("request alone should not unblock"),
    }

    AccessGate::decide_early_access(&w.session, &w.teacher, ann.id, true).await.unwrap();
    match AccessGate::start(&w.session, &ann.login_code).await.unwrap() {
        StartOutcome::Started(started) => {
            assert_eq!(started.test_id, w.test.id);
            assert_eq!(started.questions.len(), 5);
        }
        StartOutcome::Blocked(b) => panic!("approval should unblock: {}", b.message),
    }
}

async fn approval_is_single_use<S: Store>(store: S) {
    let w = world(store).await;
    let ann = w.student("Ann").await;
    SubmissionEngine::submit(&w.session, w.submission(ann.id, 5, 1)).await.unwrap();

    AccessGate::request_early_access(&w.session, &ann.login_code).await.unwrap();
    AccessGate::decide_early_access(&w.session, &w.admin, ann.id, true).await.unwrap();
    let retry = SubmissionEngine::submit(&w.session, w.submission(ann.id, 5, 5)).await.unwrap();
    assert_eq!(retry.score, 5);

    let s = w.reload(ann.id).await;
    assert_eq!(s.early_access.state, EarlyAccessState::None);
    assert_eq!(
        s.early_access.history.last().map(|e| e.transition),
        Some(EarlyAccessTransition::Consumed)
    );

    let err = SubmissionEngine::submit(&w.session, w.submission(ann.id, 5, 5)).await.unwrap_err();
    assert!(matches!(err, ServiceError::Conflict(_)), "approval is spent: {err:?}");
}

async fn cooldown_survives_reassignment<S: Store>(store: S) {
    let w = world(store).await;
    let ann = w.student("Ann").await;
    SubmissionEngine::submit(&w.session, w.submission(ann.id, 5, 5)).await.unwrap();

    let second = make_test(&w.session, &w.teacher, &w.questions, "Decimals").await;
    AssignmentGraph::assign_test(&w.session, &w.teacher, w.group.id, second.id)
        .await
        .unwrap();

    let mut retry = w.submission(ann.id, 5, 5);
    retry.test_id = second.id;
    let err = SubmissionEngine::submit(&w.session, retry).await.unwrap_err();
    assert!(matches!(err, ServiceError::Forbidden(_)), "got {err:?}");
}

async fn early_access_decisions<S: Store>(store: S) {
    let w = world(store).await;
    let ann = w.student("Ann").await;

    let err = AccessGate::decide_early_access(&w.session, &w.teacher, ann.id, true)
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Conflict(_)));

    AccessGate::request_early_access(&w.session, &ann.login_code).await.unwrap();
    let pending = AccessGate::pending_approvals(&w.session, &w.teacher).await.unwrap();
    assert_eq!(pending.iter().map(|s| s.id).collect::<Vec<_>>(), vec![ann.id]);

    let denied = AccessGate::decide_early_access(&w.session, &w.teacher, ann.id, false)
        .await
        .unwrap();
    assert_eq!(denied.early_access.state, EarlyAccessState::Denied);
    assert!(AccessGate::pending_approvals(&w.session, &w.admin).await.unwrap().is_empty());

    let reopened = AccessGate::request_early_access(&w.session, &ann.login_code).await.unwrap();
    assert_eq!(reopened.early_access.state, EarlyAccessState::Requested);
    assert_eq!(reopened.early_access.decided_by, None);
    assert_eq!(reopened.early_access.history.len(), 3);

    let stranger = TeacherService::create(
        &w.session,
        &w.admin,
        services::teacher_service::CreateTeacher {
            name: "Other".into(),
            email: "other@school.test".into(),
            subject: Some("Art".into()),
            role: db::models::teacher::Role::Teacher,
        },
    )
    .await
    .unwrap();
    let stranger = services::Actor::new(stranger.id, stranger.role);
    let err = AccessGate::decide_early_access(&w.session, &stranger, ann.id, true)
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Forbidden(_)));
}

async fn grading_excludes_unanswered<S: Store>(store: S) {
    let w = world(store).await;
    let ann = w.student("Ann").await;

    let result = SubmissionEngine::submit(&w.session, w.submission(ann.id, 3, 2)).await.unwrap();
    assert_eq!(result.score, 2);
    assert_eq!(result.correct_count, 2);
    assert_eq!(result.wrong_count, 1);
    assert_eq!(result.question_count, 5);

    let s = w.reload(ann.id).await;
    assert_eq!((s.score, s.correct_count, s.wrong_count), (2, 2, 1));
    assert_eq!(s.answers.len(), 3);
    assert_eq!(s.test_id, Some(w.test.id));
    assert!(s.last_access_date.is_some());

    let t: test::Model = w.session.store.get(w.test.id).await.unwrap();
    assert_eq!(t.participant_ids.0, vec![ann.id]);
}

async fn start_hides_correct_options<S: Store>(store: S) {
    let w = world(store).await;
    let ann = w.student("Ann").await;

    let StartOutcome::Started(started) = AccessGate::start(&w.session, &ann.login_code).await.unwrap() else {
        panic!("fresh student should start");
    };
    assert_eq!(started.assignment_version, w.group.assignment_version);
    let json = serde_json::to_value(&started).unwrap();
    for q in json["questions"].as_array().unwrap() {
        assert!(q.get("correct_option").is_none());
        assert_eq!(q["options"].as_array().unwrap().len(), 4);
    }

    let err = AccessGate::start(&w.session, "0000").await.unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(_)));
}

async fn teacher_cascade_is_complete<S: Store>(store: S) {
    let w = world(store).await;
    let ann = w.student("Ann").await;
    let bob = w.student("Bob").await;
    TaskService::create(
        &w.session,
        &w.admin,
        CreateTask {
            teacher_id: w.teacher.id,
            title: "Print reports".into(),
        },
    )
    .await
    .unwrap();

    TeacherService::delete(&w.session, &w.admin, w.teacher.id).await.unwrap();

    let store = &w.session.store;
    for id in [ann.id, bob.id] {
        assert!(store.find_by_id::<student::Model>(id).await.unwrap().is_none());
    }
    assert!(store.find_by_id::<test::Model>(w.test.id).await.unwrap().is_none());
    assert!(store.find_by_id::<group::Model>(w.group.id).await.unwrap().is_none());
    assert!(store.find_by_id::<teacher::Model>(w.teacher.id).await.unwrap().is_none());
    assert!(store.find_all::<task::Model>(&[]).await.unwrap().is_empty());
    assert!(store.find_all::<question::Model>(&[]).await.unwrap().is_empty());

    let err = StudentService::get(&w.session, &w.admin, ann.id).await.unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(_)));
    // The admin survives.
    assert!(store.find_by_id::<teacher::Model>(w.admin.id).await.unwrap().is_some());
}

async fn deleting_a_student_cleans_participants<S: Store>(store: S) {
    let w = world(store).await;
    let ann = w.student("Ann").await;
    let bob = w.student("Bob").await;
    SubmissionEngine::submit(&w.session, w.submission(ann.id, 5, 5)).await.unwrap();
    SubmissionEngine::submit(&w.session, w.submission(bob.id, 5, 5)).await.unwrap();

    StudentService::delete(&w.session, &w.teacher, ann.id).await.unwrap();
    let t: test::Model = w.session.store.get(w.test.id).await.unwrap();
    assert_eq!(t.participant_ids.0, vec![bob.id]);
}

async fn referenced_questions_are_protected<S: Store>(store: S) {
    let w = world(store).await;
    let used = w.questions[0].id;

    let err = QuestionService::delete(&w.session, &w.teacher, used).await.unwrap_err();
    assert!(matches!(err, ServiceError::Conflict(_)));

    let err = QuestionService::update(
        &w.session,
        &w.teacher,
        used,
        UpdateQuestion {
            correct_option: Some(2),
            ..Default::default()
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, ServiceError::Conflict(_)));

    let err = QuestionService::update(
        &w.session,
        &w.teacher,
        used,
        UpdateQuestion {
            options: Some(vec!["a".into(), "b".into()]),
            ..Default::default()
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, ServiceError::Validation(_)));

    let spare = add_questions(&w.session, &w.teacher, 1).await;
    QuestionService::delete(&w.session, &w.teacher, spare[0].id).await.unwrap();
}

async fn deleting_a_test_unassigns_groups<S: Store>(store: S) {
    let w = world(store).await;
    let ann = w.student("Ann").await;
    SubmissionEngine::submit(&w.session, w.submission(ann.id, 5, 5)).await.unwrap();

    TestService::delete(&w.session, &w.teacher, w.test.id).await.unwrap();

    let g: group::Model = w.session.store.get(w.group.id).await.unwrap();
    assert_eq!(g.assigned_test_id, None);
    assert!(g.assignment_version > w.group.assignment_version);
    let s = w.reload(ann.id).await;
    assert_eq!((s.status, s.test_id), (StudentStatus::Pending, None));
}

async fn deleting_a_group_detaches_members<S: Store>(store: S) {
    let w = world(store).await;
    let ann = w.student("Ann").await;

    AssignmentGraph::delete_group(&w.session, &w.teacher, w.group.id).await.unwrap();
    let s = w.reload(ann.id).await;
    assert_eq!(s.group_id, None);

    let err = AccessGate::start(&w.session, &ann.login_code).await.unwrap_err();
    assert!(matches!(err, ServiceError::Conflict(_)));
}

async fn random_test_draws_from_the_bank<S: Store>(store: S) {
    let w = world(store).await;
    let t = TestService::create(
        &w.session,
        &w.teacher,
        services::test_service::CreateTest {
            topic: "Quiz".into(),
            subject: None,
            question_ids: None,
            count: Some(3),
        },
    )
    .await
    .unwrap();
    assert_eq!(t.question_count, 3);
    assert_eq!(t.question_ids.iter().collect::<HashSet<_>>().len(), 3);
    assert_ne!(t.access_code, w.test.access_code);

    let grown = TestService::add_questions(&w.session, &w.teacher, t.id, w.questions.iter().map(|q| q.id).collect())
        .await
        .unwrap();
    assert_eq!(grown.question_count, 5);

    let err = TestService::create(
        &w.session,
        &w.teacher,
        services::test_service::CreateTest {
            topic: "Too big".into(),
            subject: None,
            question_ids: None,
            count: Some(50),
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, ServiceError::Validation(_)));
}

async fn subject_catalogue_is_admin_managed<S: Store>(store: S) {
    let w = world(store).await;
    let subject = |name: &str| CreateSubject { name: name.into() };

    let front = SubjectService::create(&w.session, &w.admin, subject("  Front-end ")).await.unwrap();
    assert_eq!(front.name, "Front-end");
    SubjectService::create(&w.session, &w.admin, subject("Design")).await.unwrap();

    let err = SubjectService::create(&w.session, &w.admin, subject("Front-end")).await.unwrap_err();
    assert!(matches!(err, ServiceError::Conflict(_)), "got {err:?}");
    let err = SubjectService::create(&w.session, &w.admin, subject("   ")).await.unwrap_err();
    assert!(matches!(err, ServiceError::Validation(_)));
    let err = SubjectService::create(&w.session, &w.teacher, subject("History")).await.unwrap_err();
    assert!(matches!(err, ServiceError::Forbidden(_)));

    let names: Vec<_> = SubjectService::list(&w.session)
        .await
        .unwrap()
        .into_iter()
        .map(|s| s.name)
        .collect();
    assert_eq!(names, vec!["Front-end", "Design"]);

    SubjectService::delete(&w.session, &w.admin, "Front-end").await.unwrap();
    let err = SubjectService::delete(&w.session, &w.admin, "Front-end").await.unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(_)));

    // The name is free again, under a new id.
    let again = SubjectService::create(&w.session, &w.admin, subject("Front-end")).await.unwrap();
    assert!(again.id > front.id);
    let stored: Vec<subject::Model> = w.session.store.find_all(&[]).await.unwrap();
    assert_eq!(stored.len(), 2);
}

async fn only_an_admin_deletes_tasks<S: Store>(store: S) {
    let w = world(store).await;
    let task = TaskService::create(
        &w.session,
        &w.admin,
        CreateTask {
            teacher_id: w.teacher.id,
            title: "Enter term marks".into(),
        },
    )
    .await
    .unwrap();

    let err = TaskService::delete(&w.session, &w.teacher, task.id).await.unwrap_err();
    assert!(matches!(err, ServiceError::Forbidden(_)));

    TaskService::delete(&w.session, &w.admin, task.id).await.unwrap();
    assert!(TaskService::list(&w.session, &w.admin).await.unwrap().is_empty());

    let err = TaskService::delete(&w.session, &w.admin, task.id).await.unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(_)));
}

async fn students_are_listed_by_subject<S: Store>(store: S) {
    let w = world(store).await;
    w.student("Ann").await;
    StudentService::create(
        &w.session,
        &w.teacher,
        CreateStudent {
            full_name: "Bob".into(),
            phone_number: None,
            group_id: w.group.id,
            chosen_subject: Some("Physics".into()),
        },
    )
    .await
    .unwrap();

    let math = StudentService::list_by_subject(&w.session, &w.teacher, "Math").await.unwrap();
    let names: Vec<_> = math.iter().map(|v| v.student.full_name.as_str()).collect();
    assert_eq!(names, vec!["Ann"]);
    assert_eq!(math[0].group_name.as_deref(), Some("7A"));

    let physics = StudentService::list_by_subject(&w.session, &w.admin, "Physics").await.unwrap();
    assert_eq!(physics.len(), 1);
    assert_eq!(physics[0].student.full_name, "Bob");

    // Another teacher sees none of them.
    let other = TeacherService::create(
        &w.session,
        &w.admin,
        services::teacher_service::CreateTeacher {
            name: "Mr Other".into(),
            email: "other@school.test".into(),
            subject: Some("Math".into()),
            role: teacher::Role::Teacher,
        },
    )
    .await
    .unwrap();
    let other = services::Actor::new(other.id, teacher::Role::Teacher);
    assert!(StudentService::list_by_subject(&w.session, &other, "Math").await.unwrap().is_empty());
}

/// Observable state after a fixed script, without timestamps and random codes.
async fn scripted_snapshot<S: Store>(store: S) -> serde_json::Value {
    let w = world(store).await;
    let ann = w.student("Ann").await;
    let bob = w.student("Bob").await;
    let cid = w.student("Cid").await;

    SubmissionEngine::submit(&w.session, w.submission(ann.id, 4, 3)).await.unwrap();
    SubmissionEngine::submit(&w.session, w.submission(bob.id, 2, 0)).await.unwrap();
    AccessGate::request_early_access(&w.session, &ann.login_code).await.unwrap();
    AccessGate::decide_early_access(&w.session, &w.teacher, ann.id, false).await.unwrap();
    StudentService::delete(&w.session, &w.teacher, cid.id).await.unwrap();
    // Cid held the highest student id; the next student must not inherit it.
    let dee = w.student("Dee").await;
    assert_ne!(dee.id, cid.id);

    let store = &w.session.store;
    let students: Vec<student::Model> = store.find_all(&[]).await.unwrap();
    let tests: Vec<test::Model> = store.find_all(&[]).await.unwrap();
    let groups: Vec<group::Model> = store.find_all(&[]).await.unwrap();

    serde_json::json!({
        "students": students.iter().map(|s| serde_json::json!({
            "id": s.id, "group_id": s.group_id, "status": s.status, "score": s.score,
            "correct": s.correct_count, "wrong": s.wrong_count, "test_id": s.test_id,
            "answers": s.answers, "early_access": s.early_access.state,
        })).collect::<Vec<_>>(),
        "tests": tests.iter().map(|t| serde_json::json!({
            "id": t.id, "questions": t.question_ids, "participants": t.participant_ids,
        })).collect::<Vec<_>>(),
        "groups": groups.iter().map(|g| serde_json::json!({
            "id": g.id, "test": g.assigned_test_id, "version": g.assignment_version,
        })).collect::<Vec<_>>(),
    })
}

#[tokio::test]
async fn both_backends_end_in_the_same_state() {
    let dir = tempfile::TempDir::new().unwrap();
    let primary = scripted_snapshot(db::test_utils::setup_sql_store().await).await;
    let fallback = scripted_snapshot(db::FileStore::new(dir.path())).await;
    assert_eq!(primary, fallback);
}

both_backends!(
    login_codes_are_unique,
    concurrent_creation_never_duplicates_codes,
    exhausted_code_space_is_a_conflict,
    reassignment_resets_members,
    second_submission_is_a_conflict,
    racing_duplicate_submissions_grade_once,
    reassignment_racing_submission_leaves_no_stale_grade,
    stale_assignment_version_is_refused,
    cooldown_blocks_with_days_remaining,
    approval_bypasses_cooldown,
    approval_is_single_use,
    cooldown_survives_reassignment,
    early_access_decisions,
    grading_excludes_unanswered,
    start_hides_correct_options,
    teacher_cascade_is_complete,
    deleting_a_student_cleans_participants,
    referenced_questions_are_protected,
    deleting_a_test_unassigns_groups,
    deleting_a_group_detaches_members,
    random_test_draws_from_the_bank,
    subject_catalogue_is_admin_managed,
    only_an_admin_deletes_tasks,
    students_are_listed_by_subject,
);
