use colored::*;
use db::Store;
use db::models::teacher::{self, Role};
use services::{Actor, ServiceResult, Session};
use std::future::Future;
use std::io::{self, Write};
use std::pin::Pin;
use std::time::Instant;
use util::filters::FilterParam;

const STATUS_COLUMN: usize = 80;

pub trait Seeder {
    fn seed<'a>(&'a self, session: &'a Session) -> Pin<Box<dyn Future<Output = ServiceResult<()>> + Send + 'a>>;
}

pub async fn run_seeder<S: Seeder + ?Sized>(seeder: &S, name: &str, session: &Session) {
    let base_msg = format!("Seeding {}", name.bold());
    let dots = ".".repeat(STATUS_COLUMN.saturating_sub(base_msg.len()));
    print!("{}{} ", base_msg, dots);
    io::stdout().flush().ok();

    let start = Instant::now();
    match seeder.seed(session).await {
        Ok(()) => {
            let time_str = format!("({:.2?})", start.elapsed()).dimmed();
            println!("{} {}", "done".green(), time_str);
        }
        Err(e) => {
            println!("{}", "failed".red());
            eprintln!("  {}", e);
            std::process::exit(1);
        }
    }
}

/// Every non-admin teacher, as the actor that owns their records.
pub async fn teachers(session: &Session) -> ServiceResult<Vec<(teacher::Model, Actor)>> {
    let teachers: Vec<teacher::Model> = session
        .store
        .find_all(&[FilterParam::eq("role", Role::Teacher.to_string())])
        .await?;
    Ok(teachers
        .into_iter()
        .map(|t| {
            let actor = Actor::new(t.id, t.role);
            (t, actor)
        })
        .collect())
}
