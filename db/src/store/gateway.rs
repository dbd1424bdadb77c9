use async_trait::async_trait;
use serde::Serialize;
use tracing::warn;
use util::filters::FilterParam;

use super::{FileStore, Record, SqlStore, Store, StoreError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    Primary,
    Fallback,
}

/// The store chosen for one request. Every sub-operation of that request goes
/// through it; there is no failover in the middle of a compound operation.
#[derive(Clone, Debug)]
pub enum ActiveStore {
    Primary(SqlStore),
    Fallback(FileStore),
}

/// Owns both adapters and decides, per request, which one serves it.
#[derive(Clone, Debug)]
pub struct Gateway {
    primary: Option<SqlStore>,
    fallback: FileStore,
}

impl Gateway {
    /// `primary` is `None` when the structured store is disabled by configuration.
    pub fn new(primary: Option<SqlStore>, fallback: FileStore) -> Self {
        Self { primary, fallback }
    }

    pub fn primary(&self) -> Option<&SqlStore> {
        self.primary.as_ref()
    }

    pub fn fallback(&self) -> &FileStore {
        &self.fallback
    }

    /// Probes the primary store once and returns the backend for this request.
    pub async fn select(&self) -> ActiveStore {
        if let Some(primary) = &self.primary {
            match primary.ping().await {
                Ok(()) => return ActiveStore::Primary(primary.clone()),
                Err(e) => warn!(error = %e, "primary store unreachable, serving from fallback"),
            }
        }
        ActiveStore::Fallback(self.fallback.clone())
    }
}

/// Connectivity failures after selection are reported as retryable instead of
/// being replayed against the other backend.
fn settle<T>(result: Result<T, StoreError>) -> Result<T, StoreError> {
    result.map_err(|e| match e {
        StoreError::Io(io) => StoreError::Unavailable(io.to_string()),
        other => other,
    })
}

#[async_trait]
impl Store for ActiveStore {
    fn backend(&self) -> Backend {
        match self {
            ActiveStore::Primary(s) => s.backend(),
            ActiveStore::Fallback(s) => s.backend(),
        }
    }

    async fn ping(&self) -> Result<(), StoreError> {
        match self {
            ActiveStore::Primary(s) => settle(s.ping().await),
            ActiveStore::Fallback(s) => settle(s.ping().await),
        }
    }

    async fn insert<R: Record>(&self, record: R) -> Result<R, StoreError> {
        match self {
            ActiveStore::Primary(s) => settle(s.insert(record).await),
            ActiveStore::Fallback(s) => settle(s.insert(record).await),
        }
    }

    async fn update<R: Record>(&self, record: R) -> Result<R, StoreError> {
        match self {
            ActiveStore::Primary(s) => settle(s.update(record).await),
            ActiveStore::Fallback(s) => settle(s.update(record).await),
        }
    }

    async fn find_by_id<R: Record>(&self, id: i64) -> Result<Option<R>, StoreError> {
        match self {
            ActiveStore::Primary(s) => settle(s.find_by_id(id).await),
            ActiveStore::Fallback(s) => settle(s.find_by_id(id).await),
        }
    }

    async fn find_all<R: Record>(&self, filters: &[FilterParam]) -> Result<Vec<R>, StoreError> {
        match self {
            ActiveStore::Primary(s) => settle(s.find_all(filters).await),
            ActiveStore::Fallback(s) => settle(s.find_all(filters).await),
        }
    }

    async fn find_one<R: Record>(&self, filters: &[FilterParam]) -> Result<Option<R>, StoreError> {
        match self {
            ActiveStore::Primary(s) => settle(s.find_one(filters).await),
            ActiveStore::Fallback(s) => settle(s.find_one(filters).await),
        }
    }

    async fn exists<R: Record>(&self, filters: &[FilterParam]) -> Result<bool, StoreError> {
        match self {
            ActiveStore::Primary(s) => settle(s.exists::<R>(filters).await),
            ActiveStore::Fallback(s) => settle(s.exists::<R>(filters).await),
        }
    }

    async fn delete_by_id<R: Record>(&self, id: i64) -> Result<bool, StoreError> {
        match self {
            ActiveStore::Primary(s) => settle(s.delete_by_id::<R>(id).await),
            ActiveStore::Fallback(s) => settle(s.delete_by_id::<R>(id).await),
        }
    }

    async fn delete_where<R: Record>(&self, filters: &[FilterParam]) -> Result<u64, StoreError> {
        match self {
            ActiveStore::Primary(s) => settle(s.delete_where::<R>(filters).await),
            ActiveStore::Fallback(s) => settle(s.delete_where::<R>(filters).await),
        }
    }

    async fn update_batch<R: Record>(&self, records: Vec<R>) -> Result<(), StoreError> {
        match self {
            ActiveStore::Primary(s) => settle(s.update_batch(records).await),
            ActiveStore::Fallback(s) => settle(s.update_batch(records).await),
        }
    }
}
