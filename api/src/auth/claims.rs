use db::models::teacher::Role;
use serde::{Deserialize, Serialize};
use services::Actor;

/// The verified `{subject, role}` pair carried by a staff token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: i64,
    pub exp: usize,
    pub role: Role,
}

#[derive(Debug, Clone)]
pub struct AuthUser(pub Claims);

impl AuthUser {
    /// The caller as the services layer sees it.
    pub fn actor(&self) -> Actor {
        Actor::new(self.0.sub, self.0.role)
    }

    pub fn is_admin(&self) -> bool {
        self.0.role == Role::Admin
    }
}
