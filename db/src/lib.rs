pub mod models;
pub mod store;
pub mod test_utils;

use migration::Migrator;
use sea_orm::{Database, DatabaseConnection, DbErr};
use sea_orm_migration::MigratorTrait;
use tracing::{info, warn};
use util::{config, paths};

pub use store::{ActiveStore, Backend, FileStore, Gateway, Record, SqlStore, Store, StoreError};

/// Connects to the primary store named by `DATABASE_PATH`.
pub async fn connect() -> Result<DatabaseConnection, DbErr> {
    let path_or_url = config::database_path();
    // If it's already a DSN, use it as-is; otherwise treat it as a SQLite file path.
    let url = if path_or_url.starts_with("sqlite:") {
        path_or_url
    } else {
        // SQLite won't create intermediate dirs.
        let _ = paths::ensure_parent_dir(&path_or_url);
        format!("sqlite://{path_or_url}?mode=rwc")
    };

    Database::connect(&url).await
}

/// Builds the gateway from configuration.
///
/// The primary store is brought up to the latest schema. When it is disabled
/// (`DATABASE_PATH` empty) or cannot be opened, every request is served by the
/// fallback store under `FALLBACK_DATA_DIR`.
pub async fn open_gateway() -> Gateway {
    let fallback = FileStore::new(paths::fallback_root());

    if config::database_path().is_empty() {
        info!(root = %fallback.root().display(), "primary store disabled, using fallback only");
        return Gateway::new(None, fallback);
    }

    let primary = match connect().await {
        Ok(db) => match Migrator::up(&db, None).await {
            Ok(()) => Some(SqlStore::new(db)),
            Err(e) => {
                warn!(error = %e, "primary store migration failed, using fallback only");
                None
            }
        },
        Err(e) => {
            warn!(error = %e, "primary store connection failed, using fallback only");
            None
        }
    };

    Gateway::new(primary, fallback)
}
