//! Persistence contract and its two adapters.
//!
//! `SqlStore` is the primary store (sea-orm over SQLite). `FileStore` keeps one
//! JSON array per collection on disk and is used whenever the primary store cannot
//! be reached. `Gateway` picks one of them per request. Domain rules (cascades,
//! identifier uniqueness, joins) live in the services crate and only see `Store`.

mod error;
mod file;
mod gateway;
mod record;
mod sql;

pub use error::StoreError;
pub use file::FileStore;
pub use gateway::{ActiveStore, Backend, Gateway};
pub use record::{Record, Store};
pub use sql::SqlStore;
