use serde::{Deserialize, Serialize};
use chrono::{DateTime, NaiveDate, Utc};
use super::user::Role;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    InProgress,
    Done,
    Paused,
    Cancelled,
}

/// Whose turn it is to respond on a project's comment thread.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum NextActor {
    Admin,
    User,
}

impl NextActor {
    pub fn flipped(self) -> Self {
        match self {
            NextActor::Admin => NextActor::User,
            NextActor::User => NextActor::Admin,
        }
    }

    /// State after a comment by an author with the given role.
    /// Non-admin comments flip the flag, admin comments leave it alone.
    pub fn after_comment(self, author_role: Role) -> Self {
        match author_role {
            Role::Admin => self,
            Role::User => self.flipped(),
        }
    }

    pub fn is_turn_of(self, role: Role) -> bool {
        matches!(
            (self, role),
            (NextActor::Admin, Role::Admin) | (NextActor::User, Role::User)
        )
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Project {
    pub id: String,
    pub name: String,
    pub description: String,
    pub owner: String,
    pub deadline: NaiveDate,
    pub status: ProjectStatus,
    pub next_actor: NextActor,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub created_by: String,
    pub updated_at: Option<DateTime<Utc>>,
    pub deactivated_at: Option<DateTime<Utc>>,
}

// A project together with the users explicitly granted access to it
#[derive(Serialize, Debug, Clone)]
pub struct ProjectView {
    #[serde(flatten)]
    pub project: Project,
    pub allowed_users: Vec<String>,
    // Users whose allow-list this request emptied; they now see every project
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub now_unrestricted: Vec<String>,
}

impl ProjectView {
    pub fn new(project: Project, allowed_users: Vec<String>) -> Self {
        Self { project, allowed_users, now_unrestricted: Vec::new() }
    }
}
