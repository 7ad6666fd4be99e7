mod user;
mod forms;
mod project;
mod comment;
mod session;

pub use user::{Role, User, UserSummary};
pub use forms::{LoginForm, CreateProjectForm, UpdateProjectForm, CommentForm, CreateUserForm, AccessForm};
pub use project::{Project, ProjectStatus, ProjectView, NextActor};
pub use comment::{Comment, CommentPosted};
pub use session::SessionContext;
