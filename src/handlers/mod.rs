mod auth;
mod extract;
mod projects;
mod users;
mod dashboard;

pub use auth::{health, handle_login, handle_logout, whoami};
pub use projects::{
    list_projects, create_project, get_project, update_project, delete_project,
    project_access, list_comments, add_comment,
};
pub use users::{list_users, create_user, deactivate_user, set_access, grant_access, revoke_access};
pub use dashboard::serve_dashboard;
