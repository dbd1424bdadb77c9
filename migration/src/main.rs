use std::{env, fs, path::Path};
use util::{config, paths};

mod runner;

#[tokio::main]
async fn main() {
    let db_path = config::database_path();
    if db_path.is_empty() {
        eprintln!("DATABASE_PATH is empty; the primary store is disabled, nothing to migrate");
        std::process::exit(1);
    }

    let url = if db_path.starts_with("sqlite:") {
        db_path.clone()
    } else {
        format!("sqlite://{}?mode=rwc", db_path)
    };
    let args: Vec<String> = env::args().collect();

    match args.get(1).map(|s| s.as_str()) {
        Some("clean") => {
            remove_db_file(&db_path);
            remove_fallback_dir();
        }
        Some("fresh") => {
            remove_db_file(&db_path);
            remove_fallback_dir();
            create_db_dir(&db_path);
            runner::run_all_migrations(&url).await;
        }
        _ => {
            create_db_dir(&db_path);
            runner::run_all_migrations(&url).await;
        }
    }
}

fn remove_db_file(path: &str) {
    let db_path = Path::new(path);
    if db_path.exists() {
        fs::remove_file(db_path).expect("Failed to delete DB file");
        println!("Deleted DB: {}", db_path.display());
    } else {
        println!("DB file does not exist: {}", db_path.display());
    }
}

fn remove_fallback_dir() {
    let root = paths::fallback_root();
    if root.exists() {
        fs::remove_dir_all(&root).expect("Failed to delete fallback collections");
        println!("Deleted fallback collections: {}", root.display());
    } else {
        println!("Fallback directory does not exist: {}", root.display());
    }
}

fn create_db_dir(path: &str) {
    paths::ensure_parent_dir(Path::new(path)).expect("Failed to create DB directory");
}
