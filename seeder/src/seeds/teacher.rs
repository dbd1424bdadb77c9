use crate::seed::Seeder;
use db::models::teacher::Role;
use fake::{Fake, faker::name::en::Name};
use services::teacher_service::{CreateTeacher, TeacherService};
use services::{Actor, ServiceResult, Session};
use std::future::Future;
use std::pin::Pin;

pub struct TeacherSeeder;

pub const SUBJECTS: [&str; 3] = ["Math", "Science", "English"];

impl Seeder for TeacherSeeder {
    fn seed<'a>(&'a self, session: &'a Session) -> Pin<Box<dyn Future<Output = ServiceResult<()>> + Send + 'a>> {
        Box::pin(async move {
            // Fixed admin
            let admin = TeacherService::insert_teacher(
                &session.store,
                CreateTeacher {
                    name: "School Admin".into(),
                    email: "admin@school.test".into(),
                    subject: None,
                    role: Role::Admin,
                },
            )
            .await?;
            let admin = Actor::new(admin.id, admin.role);

            for (i, subject) in SUBJECTS.iter().enumerate() {
                let name: String = Name().fake();
                TeacherService::create(
                    session,
                    &admin,
                    CreateTeacher {
                        name,
                        email: format!("teacher{}@school.test", i + 1),
                        subject: Some(subject.to_string()),
                        role: Role::Teacher,
                    },
                )
                .await?;
            }
            Ok(())
        })
    }
}
