use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use tower_sessions::Session;
use crate::errors::AppResult;
use crate::middleware::current_user;
use super::extract::AppJson;
use crate::models::{AccessForm, CreateUserForm, UserSummary};
use crate::services::users;
use crate::state::AppState;

pub async fn list_users(
    State(state): State<AppState>,
    session: Session,
) -> AppResult<Json<Vec<UserSummary>>> {
    let ctx = current_user(&state, &session).await?;
    Ok(Json(users::list_users(&state, &ctx).await?))
}

pub async fn create_user(
    State(state): State<AppState>,
    session: Session,
    AppJson(form): AppJson<CreateUserForm>,
) -> AppResult<(StatusCode, Json<UserSummary>)> {
    let ctx = current_user(&state, &session).await?;
    let summary = users::create_user(&state, &ctx, form).await?;
    Ok((StatusCode::CREATED, Json(summary)))
}

pub async fn deactivate_user(
    State(state): State<AppState>,
    session: Session,
    Path(username): Path<String>,
) -> AppResult<StatusCode> {
    let ctx = current_user(&state, &session).await?;
    users::deactivate_user(&state, &ctx, &username).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn set_access(
    State(state): State<AppState>,
    session: Session,
    Path(username): Path<String>,
    AppJson(form): AppJson<AccessForm>,
) -> AppResult<Json<UserSummary>> {
    let ctx = current_user(&state, &session).await?;
    Ok(Json(users::set_access(&state, &ctx, &username, &form.project_ids).await?))
}

pub async fn grant_access(
    State(state): State<AppState>,
    session: Session,
    Path((username, project_id)): Path<(String, String)>,
) -> AppResult<Json<UserSummary>> {
    let ctx = current_user(&state, &session).await?;
    Ok(Json(users::grant_access(&state, &ctx, &username, &project_id).await?))
}

pub async fn revoke_access(
    State(state): State<AppState>,
    session: Session,
    Path((username, project_id)): Path<(String, String)>,
) -> AppResult<Json<UserSummary>> {
    let ctx = current_user(&state, &session).await?;
    Ok(Json(users::revoke_access(&state, &ctx, &username, &project_id).await?))
}
