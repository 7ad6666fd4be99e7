use serde::{Deserialize, Serialize};
use super::user::Role;
use crate::errors::{AppError, AppResult};

/// Identity of the logged-in caller, stored in the cookie session and handed to every service call.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct SessionContext {
    pub username: String,
    pub role: Role,
}

impl SessionContext {
    pub fn new(username: impl Into<String>, role: Role) -> Self {
        Self { username: username.into(), role }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    pub fn require_admin(&self) -> AppResult<()> {
        if self.is_admin() {
            Ok(())
        } else {
            tracing::warn!("User {} attempted an admin-only operation", self.username);
            Err(AppError::Forbidden("Admin role required".into()))
        }
    }
}
