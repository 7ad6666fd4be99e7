use axum::{
    middleware::Next,
    response::{IntoResponse, Response},
    extract::{Request, State},
    body::Body,
};
use tower_sessions::Session;
use crate::errors::{AppError, AppResult};
use crate::models::SessionContext;
use crate::state::AppState;

pub const SESSION_KEY: &str = "user_session";

/// Resolves the caller from the cookie session against the current account state.
///
/// The cookie only names the user. Built-in accounts take their role from the
/// configuration; everyone else must still have an active stored record, whose
/// role wins over whatever the session was opened with.
pub async fn current_user(state: &AppState, session: &Session) -> AppResult<SessionContext> {
    let ctx = session
        .get::<SessionContext>(SESSION_KEY)
        .await
        .map_err(|e| AppError::Session(e.to_string()))?
        .ok_or_else(|| AppError::Auth("Not authenticated".into()))?;

    if let Some(account) = state.config.auth.builtin(&ctx.username) {
        return Ok(SessionContext::new(ctx.username, account.role));
    }

    match state.store.get_user(&ctx.username).await? {
        Some(user) if user.active => Ok(SessionContext::new(user.username, user.role)),
        _ => {
            tracing::warn!("Session for {} rejected: account missing or deactivated", ctx.username);
            Err(AppError::Auth("Account is no longer active".into()))
        }
    }
}

pub async fn require_auth(
    State(state): State<AppState>,
    session: Session,
    req: Request<Body>,
    next: Next,
) -> Response {
    let path = req.uri().path();

    if path == "/health" || path == "/login" {
        return next.run(req).await;
    }

    match current_user(&state, &session).await {
        Ok(_) => next.run(req).await,
        Err(e) => e.into_response(),
    }
}
