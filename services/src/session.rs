use db::models::teacher::Role;
use db::{ActiveStore, Store};
use std::future::Future;
use util::locks::{KeyGuard, KeyedLocks, LockKey};

use crate::error::{ServiceError, ServiceResult};

/// How often a compound operation re-plans its lock set before giving up.
const LOCK_PLAN_ATTEMPTS: usize = 5;

/// The authenticated caller of a staff operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    pub id: i64,
    pub role: Role,
}

impl Actor {
    pub fn new(id: i64, role: Role) -> Self {
        Self { id, role }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Admins manage everything; teachers manage what they own.
    pub fn can_manage(&self, owner_id: i64) -> bool {
        self.is_admin() || self.id == owner_id
    }

    pub fn ensure_manages(&self, owner_id: i64, what: &str) -> ServiceResult<()> {
        if self.can_manage(owner_id) {
            Ok(())
        } else {
            Err(ServiceError::Forbidden(format!(
                "You do not have access to this {}",
                what
            )))
        }
    }

    pub fn ensure_admin(&self) -> ServiceResult<()> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(ServiceError::Forbidden("Admin access required".into()))
        }
    }
}

/// Guards held for the duration of a compound operation.
pub struct LockSet {
    _guards: Vec<KeyGuard>,
}

/// One request's view of the system: the store selected for it and the
/// process-wide lock registry.
#[derive(Clone, Debug)]
pub struct Session<S: Store = ActiveStore> {
    pub store: S,
    pub locks: KeyedLocks,
}

impl<S: Store> Session<S> {
    pub fn new(store: S, locks: KeyedLocks) -> Self {
        Self { store, locks }
    }

    /// Locks every key `plan` names.
    ///
    /// `plan` reads the records an operation is about to touch and names their
    /// keys. It runs again once the locks are held; if it now names a key outside
    /// the held set (a record joined a group meanwhile, say), everything is
    /// released and planning starts over.
    pub async fn lock_planned<F, Fut>(&self, mut plan: F) -> ServiceResult<LockSet>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = ServiceResult<Vec<LockKey>>>,
    {
        for _ in 0..LOCK_PLAN_ATTEMPTS {
            let keys = plan().await?;
            let guards = self.locks.acquire_all(keys.clone()).await;
            let needed = plan().await?;
            if needed.iter().all(|k| keys.contains(k)) {
                return Ok(LockSet { _guards: guards });
            }
        }
        Err(ServiceError::Conflict(
            "Records changed while the operation was starting, please retry".into(),
        ))
    }

    pub async fn lock(&self, keys: Vec<LockKey>) -> LockSet {
        LockSet {
            _guards: self.locks.acquire_all(keys).await,
        }
    }
}
