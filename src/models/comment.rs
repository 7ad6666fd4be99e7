use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use super::project::NextActor;
use super::user::Role;

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Comment {
    pub id: String,
    pub project_id: String,
    pub text: String,
    pub author: String,
    pub author_role: Role,
    pub created_at: DateTime<Utc>,
    pub active: bool,
}

#[derive(Serialize, Debug, Clone)]
pub struct CommentPosted {
    pub comment: Comment,
    pub next_actor: NextActor,
}
