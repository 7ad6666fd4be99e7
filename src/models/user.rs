use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use std::fmt;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    User,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Admin => f.write_str("admin"),
            Role::User => f.write_str("user"),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct User {
    pub username: String,
    pub password_hash: String,        // bcrypt, never plain text
    pub role: Role,
    pub project_access: Vec<String>,  // Project IDs; empty means unrestricted
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub created_by: String,
    pub updated_at: Option<DateTime<Utc>>,
    pub deactivated_at: Option<DateTime<Utc>>,
}

impl User {
    /// Whether this user's allow-list admits the project. An empty list admits everything.
    pub fn allows(&self, project_id: &str) -> bool {
        self.project_access.is_empty() || self.project_access.iter().any(|p| p == project_id)
    }

    /// Adds the project to the allow-list. Returns false if it was already there.
    pub fn grant(&mut self, project_id: &str) -> bool {
        if self.project_access.iter().any(|p| p == project_id) {
            return false;
        }
        self.project_access.push(project_id.to_string());
        true
    }

    /// Removes the project from the allow-list. Returns false if it was not there.
    pub fn revoke(&mut self, project_id: &str) -> bool {
        let before = self.project_access.len();
        self.project_access.retain(|p| p != project_id);
        self.project_access.len() != before
    }
}

// What the API hands out about a user; the password hash stays in the store
#[derive(Debug, Serialize, Clone)]
pub struct UserSummary {
    pub username: String,
    pub role: Role,
    pub project_access: Vec<String>,
    pub unrestricted: bool,
    pub created_at: DateTime<Utc>,
    pub created_by: String,
}

impl From<&User> for UserSummary {
    fn from(user: &User) -> Self {
        Self {
            username: user.username.clone(),
            role: user.role,
            project_access: user.project_access.clone(),
            unrestricted: user.project_access.is_empty(),
            created_at: user.created_at,
            created_by: user.created_by.clone(),
        }
    }
}
