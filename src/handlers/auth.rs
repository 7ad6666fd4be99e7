use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
};
use tower_sessions::Session;
use crate::errors::{AppError, AppResult};
use crate::middleware::{current_user, SESSION_KEY};
use crate::models::{LoginForm, SessionContext};
use crate::services::auth;
use crate::state::AppState;
use super::extract::AppForm;

pub async fn health() -> &'static str {
    "ok"
}

#[axum::debug_handler]
pub async fn handle_login(
    State(state): State<AppState>,
    session: Session,
    AppForm(login_form): AppForm<LoginForm>,
) -> AppResult<Json<SessionContext>> {
    tracing::info!("Login attempt for user: {}", login_form.username);

    let ctx = auth::authenticate(&state, &login_form).await?;

    // Fresh session id on every login
    session
        .cycle_id()
        .await
        .map_err(|e| AppError::Session(e.to_string()))?;
    session
        .insert(SESSION_KEY, &ctx)
        .await
        .map_err(|e| AppError::Session(e.to_string()))?;

    Ok(Json(ctx))
}

pub async fn handle_logout(session: Session) -> AppResult<StatusCode> {
    if let Some(ctx) = session
        .remove::<SessionContext>(SESSION_KEY)
        .await
        .map_err(|e| AppError::Session(e.to_string()))?
    {
        tracing::info!("User {} logged out", ctx.username);
    }
    Ok(StatusCode::NO_CONTENT)
}

pub async fn whoami(
    State(state): State<AppState>,
    session: Session,
) -> AppResult<Json<SessionContext>> {
    Ok(Json(current_user(&state, &session).await?))
}
