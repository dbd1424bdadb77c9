//! Short numeric identifiers for humans to type: student login codes and test
//! access codes.

use db::Store;
use db::models::{student, test};
use rand::Rng;
use tracing::warn;
use util::config;
use util::filters::FilterParam;
use util::locks::LockKey;

use crate::error::{ServiceError, ServiceResult};

pub const CODE_MIN: u16 = 1000;
pub const CODE_MAX: u16 = 9999;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodeKind {
    StudentLogin,
    TestAccess,
}

impl CodeKind {
    /// Lock guarding allocate-then-insert for this kind.
    pub fn lock_key(self) -> LockKey {
        match self {
            CodeKind::StudentLogin => LockKey::Keyspace("students"),
            CodeKind::TestAccess => LockKey::Keyspace("tests"),
        }
    }

    fn field(self) -> &'static str {
        match self {
            CodeKind::StudentLogin => "login_code",
            CodeKind::TestAccess => "access_code",
        }
    }
}

pub struct IdentityAllocator;

impl IdentityAllocator {
    /// Returns a random 4-digit code not yet used by any record of `kind`.
    ///
    /// The caller must hold `kind.lock_key()` until the record carrying the code
    /// is inserted; otherwise two allocations may return the same free code.
    pub async fn allocate<S: Store>(store: &S, kind: CodeKind) -> ServiceResult<String> {
        Self::allocate_with(store, kind, || rand::rng().random_range(CODE_MIN..=CODE_MAX)).await
    }

    /// `allocate` with an explicit sampler. Gives up after
    /// `CODE_ALLOCATION_MAX_ATTEMPTS` collisions.
    pub async fn allocate_with<S, F>(store: &S, kind: CodeKind, mut sample: F) -> ServiceResult<String>
    where
        S: Store,
        F: FnMut() -> u16 + Send,
    {
        let attempts = config::code_allocation_max_attempts().max(1);
        for _ in 0..attempts {
            let code = format!("{:04}", sample());
            if !Self::is_taken(store, kind, &code).await? {
                return Ok(code);
            }
        }
        warn!(?kind, attempts, "identifier space exhausted");
        Err(ServiceError::Conflict(
            "Identifier space exhausted, could not allocate a unique code".into(),
        ))
    }

    async fn is_taken<S: Store>(store: &S, kind: CodeKind, code: &str) -> ServiceResult<bool> {
        let filter = [FilterParam::eq(kind.field(), code)];
        let taken = match kind {
            CodeKind::StudentLogin => store.exists::<student::Model>(&filter).await?,
            CodeKind::TestAccess => store.exists::<test::Model>(&filter).await?,
        };
        Ok(taken)
    }
}
