use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use tower_sessions::Session;
use crate::errors::AppResult;
use crate::middleware::current_user;
use super::extract::AppJson;
use crate::models::{Comment, CommentForm, CommentPosted, CreateProjectForm, ProjectView, UpdateProjectForm};
use crate::services::{comments, projects};
use crate::state::AppState;

pub async fn list_projects(
    State(state): State<AppState>,
    session: Session,
) -> AppResult<Json<Vec<ProjectView>>> {
    let ctx = current_user(&state, &session).await?;
    Ok(Json(projects::list_projects(&state, &ctx).await?))
}

pub async fn create_project(
    State(state): State<AppState>,
    session: Session,
    AppJson(form): AppJson<CreateProjectForm>,
) -> AppResult<(StatusCode, Json<ProjectView>)> {
    let ctx = current_user(&state, &session).await?;
    let view = projects::create_project(&state, &ctx, form).await?;
    Ok((StatusCode::CREATED, Json(view)))
}

pub async fn get_project(
    State(state): State<AppState>,
    session: Session,
    Path(project_id): Path<String>,
) -> AppResult<Json<ProjectView>> {
    let ctx = current_user(&state, &session).await?;
    Ok(Json(projects::get_project(&state, &ctx, &project_id).await?))
}

pub async fn update_project(
    State(state): State<AppState>,
    session: Session,
    Path(project_id): Path<String>,
    AppJson(form): AppJson<UpdateProjectForm>,
) -> AppResult<Json<ProjectView>> {
    let ctx = current_user(&state, &session).await?;
    Ok(Json(projects::update_project(&state, &ctx, &project_id, form).await?))
}

pub async fn delete_project(
    State(state): State<AppState>,
    session: Session,
    Path(project_id): Path<String>,
) -> AppResult<StatusCode> {
    let ctx = current_user(&state, &session).await?;
    projects::deactivate_project(&state, &ctx, &project_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn project_access(
    State(state): State<AppState>,
    session: Session,
    Path(project_id): Path<String>,
) -> AppResult<Json<Vec<String>>> {
    let ctx = current_user(&state, &session).await?;
    Ok(Json(projects::project_access(&state, &ctx, &project_id).await?))
}

pub async fn list_comments(
    State(state): State<AppState>,
    session: Session,
    Path(project_id): Path<String>,
) -> AppResult<Json<Vec<Comment>>> {
    let ctx = current_user(&state, &session).await?;
    Ok(Json(comments::list_comments(&state, &ctx, &project_id).await?))
}

pub async fn add_comment(
    State(state): State<AppState>,
    session: Session,
    Path(project_id): Path<String>,
    AppJson(form): AppJson<CommentForm>,
) -> AppResult<(StatusCode, Json<CommentPosted>)> {
    let ctx = current_user(&state, &session).await?;
    let posted = comments::add_comment(&state, &ctx, &project_id, form).await?;
    Ok((StatusCode::CREATED, Json(posted)))
}
