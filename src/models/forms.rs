use serde::Deserialize;
use chrono::NaiveDate;
use super::project::ProjectStatus;
use super::user::Role;

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateProjectForm {
    pub name: String,
    pub description: String,
    pub owner: String,
    pub deadline: NaiveDate,
    #[serde(default)]
    pub allowed_users: Vec<String>,
}

// Only the fields present are changed
#[derive(Debug, Deserialize, Default)]
pub struct UpdateProjectForm {
    pub name: Option<String>,
    pub description: Option<String>,
    pub owner: Option<String>,
    pub deadline: Option<NaiveDate>,
    pub status: Option<ProjectStatus>,
    pub allowed_users: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
pub struct CommentForm {
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateUserForm {
    pub username: String,
    pub password: String,
    pub role: Role,
    #[serde(default)]
    pub project_access: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct AccessForm {
    pub project_ids: Vec<String>,
}
