use crate::seed::{Seeder, teachers};
use services::question_service::{CreateQuestion, QuestionService};
use services::{ServiceResult, Session};
use std::future::Future;
use std::pin::Pin;

pub struct QuestionSeeder;

const PER_TEACHER: usize = 12;

impl Seeder for QuestionSeeder {
    fn seed<'a>(&'a self, session: &'a Session) -> Pin<Box<dyn Future<Output = ServiceResult<()>> + Send + 'a>> {
        Box::pin(async move {
            for (teacher, actor) in teachers(session).await? {
                let subject = teacher.subject.clone().unwrap_or_else(|| "General".into());
                for _ in 0..PER_TEACHER {
                    let a = fastrand::i32(2..50);
                    let b = fastrand::i32(2..50);
                    let answer = a + b;
                    let correct = fastrand::usize(..4);

                    // Distinct distractors around the answer.
                    let mut options: Vec<String> = (1..4).map(|d| (answer + d * 3).to_string()).collect();
                    options.insert(correct, answer.to_string());

                    QuestionService::create(
                        session,
                        &actor,
                        CreateQuestion {
                            question_text: format!("{} + {} = ?", a, b),
                            options,
                            correct_option: correct as i32,
                            subject: Some(subject.clone()),
                        },
                    )
                    .await?;
                }
            }
            Ok(())
        })
    }
}
