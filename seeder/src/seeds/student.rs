use crate::seed::{Seeder, teachers};
use db::Store;
use db::models::group;
use fake::{
    Fake,
    faker::{name::en::Name, phone_number::en::PhoneNumber},
};
use services::student_service::{CreateStudent, StudentService};
use services::{ServiceResult, Session};
use std::future::Future;
use std::pin::Pin;
use util::filters::FilterParam;

pub struct StudentSeeder;

const PER_GROUP: usize = 6;

impl Seeder for StudentSeeder {
    fn seed<'a>(&'a self, session: &'a Session) -> Pin<Box<dyn Future<Output = ServiceResult<()>> + Send + 'a>> {
        Box::pin(async move {
            for (teacher, actor) in teachers(session).await? {
                let groups: Vec<group::Model> = session
                    .store
                    .find_all(&[FilterParam::eq("teacher_id", teacher.id)])
                    .await?;
                for group in groups {
                    for _ in 0..PER_GROUP {
                        StudentService::create(
                            session,
                            &actor,
                            CreateStudent {
                                full_name: Name().fake(),
                                phone_number: Some(PhoneNumber().fake()),
                                group_id: group.id,
                                chosen_subject: None,
                            },
                        )
                        .await?;
                    }
                }
            }
            Ok(())
        })
    }
}
