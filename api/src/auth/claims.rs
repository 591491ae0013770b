use db::models::profile::Role;
use db::repositories::Actor;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: i64,
    pub role: Role,
    pub exp: usize,
}

#[derive(Debug, Clone)]
pub struct AuthUser(pub Claims);

impl AuthUser {
    pub fn actor(&self) -> Actor {
        Actor::new(self.0.sub, self.0.role)
    }

    pub fn is_employee(&self) -> bool {
        self.0.role == Role::Employee
    }
}
