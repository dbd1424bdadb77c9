use db::{Backend, Gateway, Store};
use services::Session;
use util::locks::KeyedLocks;

/// Shared by every handler: the persistence gateway and the process-wide lock
/// registry that serialises compound operations.
#[derive(Clone, Debug)]
pub struct AppState {
    gateway: Gateway,
    locks: KeyedLocks,
}

impl AppState {
    pub fn new(gateway: Gateway) -> Self {
        Self {
            gateway,
            locks: KeyedLocks::new(),
        }
    }

    /// Opens the gateway described by the configuration.
    pub async fn init() -> Self {
        Self::new(db::open_gateway().await)
    }

    pub fn gateway(&self) -> &Gateway {
        &self.gateway
    }

    /// Selects the backend for one request.
    pub async fn session(&self) -> Session {
        Session::new(self.gateway.select().await, self.locks.clone())
    }

    /// The backend a request arriving now would be served by.
    pub async fn backend(&self) -> Backend {
        self.gateway.select().await.backend()
    }
}
