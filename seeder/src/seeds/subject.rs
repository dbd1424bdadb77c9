use crate::seed::Seeder;
use crate::seeds::teacher::SUBJECTS;
use db::Store;
use db::models::teacher::{self, Role};
use services::subject_service::{CreateSubject, SubjectService};
use services::{Actor, ServiceError, ServiceResult, Session};
use std::future::Future;
use std::pin::Pin;
use util::filters::FilterParam;

pub struct SubjectSeeder;

/// Catalogue entries nobody teaches yet.
const EXTRA: [&str; 2] = ["History", "Design"];

impl Seeder for SubjectSeeder {
    fn seed<'a>(&'a self, session: &'a Session) -> Pin<Box<dyn Future<Output = ServiceResult<()>> + Send + 'a>> {
        Box::pin(async move {
            let admin = session
                .store
                .find_one::<teacher::Model>(&[FilterParam::eq("role", Role::Admin.to_string())])
                .await?
                .ok_or_else(|| ServiceError::NotFound("No admin to own the catalogue".into()))?;
            let admin = Actor::new(admin.id, admin.role);

            for name in SUBJECTS.iter().chain(EXTRA.iter()) {
                SubjectService::create(session, &admin, CreateSubject { name: name.to_string() }).await?;
            }
            Ok(())
        })
    }
}
