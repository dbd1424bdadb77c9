use crate::seed::run_seeder;
use crate::seed::Seeder;
use crate::seeds::{
    attempt::AttemptSeeder, group::GroupSeeder, question::QuestionSeeder,
    student::StudentSeeder, subject::SubjectSeeder, teacher::TeacherSeeder, test::TestSeeder,
};
use db::Store;
use services::Session;
use util::locks::KeyedLocks;

mod seed;
mod seeds;

#[tokio::main]
async fn main() {
    let gateway = db::open_gateway().await;
    let session = Session::new(gateway.select().await, KeyedLocks::new());
    println!("Seeding the {:?} store", session.store.backend());

    for (seeder, name) in [
        (Box::new(TeacherSeeder) as Box<dyn Seeder + Send + Sync>, "Teacher"),
        (Box::new(SubjectSeeder), "Subject"),
        (Box::new(QuestionSeeder), "Question"),
        (Box::new(TestSeeder), "Test"),
        (Box::new(GroupSeeder), "Group"),
        (Box::new(StudentSeeder), "Student"),
        (Box::new(AttemptSeeder), "Attempt"),
    ] {
        run_seeder(&*seeder, name, &session).await;
    }
}
