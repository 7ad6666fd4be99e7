use bcrypt::verify;
use crate::errors::{AppError, AppResult};
use crate::models::{LoginForm, SessionContext};
use crate::state::AppState;

const INVALID_CREDENTIALS: &str = "Invalid username or password";

/// Checks the credentials against the built-in accounts first, then the user store.
pub async fn authenticate(state: &AppState, form: &LoginForm) -> AppResult<SessionContext> {
    let username = form.username.trim();
    if username.is_empty() || form.password.is_empty() {
        return Err(AppError::Validation("Username and password are required".into()));
    }

    if let Some(account) = state.config.auth.builtin(username) {
        if account.password == form.password {
            tracing::info!("Built-in account {} logged in", username);
            return Ok(SessionContext::new(username, account.role));
        }
    }

    let user = match state.store.get_user(username).await? {
        Some(user) if user.active => user,
        _ => {
            tracing::warn!("Login rejected for unknown or inactive user: {}", username);
            return Err(AppError::Auth(INVALID_CREDENTIALS.into()));
        }
    };

    if !verify(&form.password, &user.password_hash)? {
        tracing::warn!("Invalid password for user: {}", username);
        return Err(AppError::Auth(INVALID_CREDENTIALS.into()));
    }

    tracing::info!("User {} logged in", username);
    Ok(SessionContext::new(user.username, user.role))
}
