use async_trait::async_trait;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;
use util::filters::FilterParam;
use util::locks::{KeyedLocks, LockKey};
use util::paths::{collection_file, collection_seq_file, collection_tmp_file};

use super::{Backend, Record, Store, StoreError};

/// Fallback store: one JSON array per collection under `root`.
///
/// Every operation on a collection runs under that collection's mutex. Writes go
/// to a scratch file that is then renamed over the collection file, so readers
/// never observe a half-written array. Next to each array a `<collection>.seq`
/// file holds the highest id ever assigned, so deleted ids are never reused.
#[derive(Clone, Debug)]
pub struct FileStore {
    root: PathBuf,
    locks: KeyedLocks,
}

impl FileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            locks: KeyedLocks::new(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    async fn load_raw<R: Record>(&self) -> Result<Vec<Value>, StoreError> {
        let path = collection_file(&self.root, R::COLLECTION);
        let bytes = match fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(StoreError::Io(e)),
        };
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Vec::new());
        }
        serde_json::from_slice(&bytes).map_err(|e| StoreError::Corrupt {
            path: path.display().to_string(),
            reason: e.to_string(),
        })
    }

    fn decode<R: Record>(&self, raw: Value) -> Result<R, StoreError> {
        serde_json::from_value(raw).map_err(|e| StoreError::Corrupt {
            path: collection_file(&self.root, R::COLLECTION).display().to_string(),
            reason: e.to_string(),
        })
    }

    async fn load<R: Record>(&self) -> Result<Vec<R>, StoreError> {
        self.load_raw::<R>()
            .await?
            .into_iter()
            .map(|raw| self.decode(raw))
            .collect()
    }

    /// Writes `bytes` to `tmp`, then renames it over `path`.
    async fn replace(&self, path: &Path, tmp: &Path, bytes: Vec<u8>) -> Result<(), StoreError> {
        fs::create_dir_all(&self.root).await?;
        fs::write(tmp, bytes).await?;
        fs::rename(tmp, path).await?;
        Ok(())
    }

    async fn save<R: Record>(&self, records: &[R]) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec_pretty(records)?;
        self.replace(
            &collection_file(&self.root, R::COLLECTION),
            &collection_tmp_file(&self.root, R::COLLECTION),
            bytes,
        )
        .await
    }

    /// Highest id ever assigned in the collection; 0 before the first insert.
    async fn load_seq<R: Record>(&self) -> Result<i64, StoreError> {
        let path = collection_seq_file(&self.root, R::COLLECTION);
        let text = match fs::read_to_string(&path).await {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(0),
            Err(e) => return Err(StoreError::Io(e)),
        };
        text.trim().parse::<i64>().map_err(|e| StoreError::Corrupt {
            path: path.display().to_string(),
            reason: e.to_string(),
        })
    }

    async fn save_seq<R: Record>(&self, seq: i64) -> Result<(), StoreError> {
        let path = collection_seq_file(&self.root, R::COLLECTION);
        let tmp = self.root.join(format!(".{}.seq.tmp", R::COLLECTION));
        self.replace(&path, &tmp, seq.to_string().into_bytes()).await
    }

    /// Rejects `candidate` when another record already holds its unique value.
    fn check_unique<R: Record>(records: &[R], candidate: &R) -> Result<(), StoreError> {
        let Some((field, value)) = candidate.unique_key() else {
            return Ok(());
        };
        let taken = records.iter().any(|r| {
            r.id() != candidate.id() && r.unique_key().is_some_and(|(_, v)| v == value)
        });
        if taken {
            return Err(StoreError::Duplicate {
                collection: R::COLLECTION,
                field,
                value,
            });
        }
        Ok(())
    }

    fn position<R: Record>(records: &[R], id: i64) -> Result<usize, StoreError> {
        records
            .iter()
            .position(|r| r.id() == id)
            .ok_or(StoreError::NotFound {
                collection: R::COLLECTION,
                id,
            })
    }
}

#[async_trait]
impl Store for FileStore {
    fn backend(&self) -> Backend {
        Backend::Fallback
    }

    async fn ping(&self) -> Result<(), StoreError> {
        fs::create_dir_all(&self.root).await?;
        Ok(())
    }

    async fn insert<R: Record>(&self, mut record: R) -> Result<R, StoreError> {
        let _guard = self.locks.acquire(LockKey::Collection(R::COLLECTION)).await;
        let mut records = self.load::<R>().await?;

        let highest = records.iter().map(Record::id).max().unwrap_or(0);
        let next_id = highest.max(self.load_seq::<R>().await?) + 1;
        record.set_id(next_id);
        Self::check_unique(&records, &record)?;

        // The mark goes first: a crash before the array write leaves a gap, never a reused id.
        self.save_seq::<R>(next_id).await?;
        records.push(record.clone());
        self.save(&records).await?;
        debug!(collection = R::COLLECTION, id = next_id, "inserted record");
        Ok(record)
    }

    async fn update<R: Record>(&self, record: R) -> Result<R, StoreError> {
        let _guard = self.locks.acquire(LockKey::Collection(R::COLLECTION)).await;
        let mut records = self.load::<R>().await?;

        let at = Self::position(&records, record.id())?;
        Self::check_unique(&records, &record)?;

        records[at] = record.clone();
        self.save(&records).await?;
        Ok(record)
    }

    async fn find_by_id<R: Record>(&self, id: i64) -> Result<Option<R>, StoreError> {
        let _guard = self.locks.acquire(LockKey::Collection(R::COLLECTION)).await;
        Ok(self.load::<R>().await?.into_iter().find(|r| r.id() == id))
    }

    async fn find_all<R: Record>(&self, filters: &[FilterParam]) -> Result<Vec<R>, StoreError> {
        let _guard = self.locks.acquire(LockKey::Collection(R::COLLECTION)).await;
        let mut found = self
            .load_raw::<R>()
            .await?
            .into_iter()
            .filter(|raw| filters.iter().all(|f| f.matches_json(raw)))
            .map(|raw| self.decode::<R>(raw))
            .collect::<Result<Vec<_>, _>>()?;
        found.sort_by_key(Record::id);
        Ok(found)
    }

    async fn delete_by_id<R: Record>(&self, id: i64) -> Result<bool, StoreError> {
        let _guard = self.locks.acquire(LockKey::Collection(R::COLLECTION)).await;
        let mut records = self.load::<R>().await?;
        let before = records.len();
        records.retain(|r| r.id() != id);
        if records.len() == before {
            return Ok(false);
        }
        self.save(&records).await?;
        Ok(true)
    }

    async fn delete_where<R: Record>(&self, filters: &[FilterParam]) -> Result<u64, StoreError> {
        if filters.is_empty() {
            return Err(StoreError::Invalid(
                "Refusing to delete without filters".to_string(),
            ));
        }
        let _guard = self.locks.acquire(LockKey::Collection(R::COLLECTION)).await;
        let raw = self.load_raw::<R>().await?;
        let before = raw.len();
        let kept: Vec<R> = raw
            .into_iter()
            .filter(|r| !filters.iter().all(|f| f.matches_json(r)))
            .map(|r| self.decode::<R>(r))
            .collect::<Result<_, _>>()?;

        let removed = (before - kept.len()) as u64;
        if removed > 0 {
            self.save(&kept).await?;
        }
        debug!(collection = R::COLLECTION, rows = removed, "deleted records");
        Ok(removed)
    }

    async fn update_batch<R: Record>(&self, batch: Vec<R>) -> Result<(), StoreError> {
        if batch.is_empty() {
            return Ok(());
        }
        let _guard = self.locks.acquire(LockKey::Collection(R::COLLECTION)).await;
        let mut records = self.load::<R>().await?;

        // Validate the whole batch before the single rewrite.
        for record in batch {
            let at = Self::position(&records, record.id())?;
            Self::check_unique(&records, &record)?;
            records[at] = record;
        }
        self.save(&records).await
    }
}
