use crate::seed::{Seeder, teachers};
use services::assignment_graph::{AssignmentGraph, CreateGroup};
use services::test_service::TestService;
use services::{ServiceResult, Session};
use std::future::Future;
use std::pin::Pin;

pub struct GroupSeeder;

const GROUPS_PER_TEACHER: usize = 2;

impl Seeder for GroupSeeder {
    fn seed<'a>(&'a self, session: &'a Session) -> Pin<Box<dyn Future<Output = ServiceResult<()>> + Send + 'a>> {
        Box::pin(async move {
            for (teacher, actor) in teachers(session).await? {
                let tests = TestService::list(session, &actor).await?;
                for n in 0..GROUPS_PER_TEACHER {
                    let group = AssignmentGraph::create_group(
                        session,
                        &actor,
                        CreateGroup {
                            name: format!("{} {}", teacher.subject.as_deref().unwrap_or("Class"), n + 7),
                            subject: None,
                            teacher_id: None,
                        },
                    )
                    .await?;

                    // Each group gets one of the teacher's tests.
                    if let Some(test) = tests.get(n % tests.len().max(1)) {
                        AssignmentGraph::assign_test(session, &actor, group.id, test.id).await?;
                    }
                }
            }
            Ok(())
        })
    }
}
