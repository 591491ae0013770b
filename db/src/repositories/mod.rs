pub mod profile_repository;
pub mod ticket_repository;

use crate::models::profile::{Model as ProfileModel, Role};

/// The identity on whose behalf a query is scoped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    pub id: i64,
    pub role: Role,
}

impl Actor {
    pub fn new(id: i64, role: Role) -> Self {
        Self { id, role }
    }

    pub fn is_employee(&self) -> bool {
        self.role == Role::Employee
    }
}

impl From<&ProfileModel> for Actor {
    fn from(profile: &ProfileModel) -> Self {
        Self::new(profile.id, profile.role)
    }
}
