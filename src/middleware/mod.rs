mod auth;

pub use auth::{current_user, require_auth, SESSION_KEY};
