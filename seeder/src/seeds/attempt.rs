use crate::seed::Seeder;
use db::Store;
use db::models::student;
use services::access_gate::{AccessGate, StartOutcome};
use services::submission_engine::{Submission, SubmissionEngine, SubmittedAnswer};
use services::{ServiceResult, Session};
use std::future::Future;
use std::pin::Pin;

/// Lets about half of the students take their test with random answers, and
/// has one of them ask for early access afterwards.
pub struct AttemptSeeder;

impl Seeder for AttemptSeeder {
    fn seed<'a>(&'a self, session: &'a Session) -> Pin<Box<dyn Future<Output = ServiceResult<()>> + Send + 'a>> {
        Box::pin(async move {
            let students: Vec<student::Model> = session.store.find_all(&[]).await?;
            let mut requested = false;

            for s in students.iter().filter(|_| fastrand::bool()) {
                let StartOutcome::Started(attempt) = AccessGate::start(session, &s.login_code).await? else {
                    continue;
                };

                let answers = attempt
                    .questions
                    .iter()
                    .filter(|_| fastrand::u8(..10) < 9)
                    .map(|q| SubmittedAnswer {
                        question_id: q.id,
                        selected_option: fastrand::i32(0..4),
                    })
                    .collect();

                SubmissionEngine::submit(
                    session,
                    Submission {
                        student_id: attempt.student_id,
                        test_id: attempt.test_id,
                        answers,
                        time_spent: fastrand::i64(120..1800),
                        assignment_version: Some(attempt.assignment_version),
                    },
                )
                .await?;

                if !requested {
                    AccessGate::request_early_access(session, &s.login_code).await?;
                    requested = true;
                }
            }
            Ok(())
        })
    }
}
