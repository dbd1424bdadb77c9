//! In-process single-writer serialization keyed by record identity.
//!
//! Compound operations (allocate-and-insert, reassign-and-reset, submit-and-mark)
//! take the locks of every key they touch through [`KeyedLocks::acquire_all`],
//! which always acquires in the order keyspace, group, student, test.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

/// Identity of a lockable resource. The variant order is the acquisition order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LockKey {
    /// The unique-value space of a collection (codes of `students` and `tests`, names of `subjects`).
    Keyspace(&'static str),
    Group(i64),
    Student(i64),
    Test(i64),
    /// A whole stored collection (fallback file).
    Collection(&'static str),
}

type Registry = Arc<Mutex<HashMap<LockKey, Arc<AsyncMutex<()>>>>>;

/// Registry of async mutexes, created on first use and shared by clones.
///
/// An entry lives only while some caller holds or waits for it, so the map is
/// bounded by the number of keys in use, not by every id ever locked.
#[derive(Clone, Debug, Default)]
pub struct KeyedLocks {
    inner: Registry,
}

/// Exclusive access to one key. Dropping it releases the key and forgets the
/// registry entry when nobody else is waiting on it.
#[derive(Debug)]
pub struct KeyGuard {
    guard: Option<OwnedMutexGuard<()>>,
    key: LockKey,
    registry: Registry,
}

impl Drop for KeyGuard {
    fn drop(&mut self) {
        self.guard.take();
        let mut map = lock_registry(&self.registry);
        // The map's own reference is the last one: no holder, no waiter.
        if map.get(&self.key).is_some_and(|slot| Arc::strong_count(slot) == 1) {
            map.remove(&self.key);
        }
    }
}

fn lock_registry(registry: &Registry) -> MutexGuard<'_, HashMap<LockKey, Arc<AsyncMutex<()>>>> {
    match registry.lock() {
        Ok(map) => map,
        Err(poisoned) => poisoned.into_inner(),
    }
}

impl KeyedLocks {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&self, key: LockKey) -> Arc<AsyncMutex<()>> {
        lock_registry(&self.inner).entry(key).or_default().clone()
    }

    /// Number of keys currently held or awaited.
    pub fn len(&self) -> usize {
        lock_registry(&self.inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Waits for exclusive access to `key`. The guard releases it on drop.
    pub async fn acquire(&self, key: LockKey) -> KeyGuard {
        let guard = self.slot(key.clone()).lock_owned().await;
        KeyGuard {
            guard: Some(guard),
            key,
            registry: self.inner.clone(),
        }
    }

    /// Acquires every key, sorted and deduplicated, so that two callers with
    /// overlapping key sets can never deadlock.
    pub async fn acquire_all(&self, mut keys: Vec<LockKey>) -> Vec<KeyGuard> {
        keys.sort();
        keys.dedup();
        let mut guards = Vec::with_capacity(keys.len());
        for key in keys {
            guards.push(self.acquire(key).await);
        }
        guards
    }
}
