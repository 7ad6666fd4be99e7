use bcrypt::hash;
use chrono::Utc;
use crate::errors::{AppError, AppResult};
use crate::models::{CreateUserForm, SessionContext, User, UserSummary};
use crate::state::AppState;

pub(crate) async fn find_active(state: &AppState, username: &str) -> AppResult<Option<User>> {
    Ok(state.store.get_user(username).await?.filter(|u| u.active))
}

async fn require_active(state: &AppState, username: &str) -> AppResult<User> {
    find_active(state, username)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {} not found", username)))
}

// Every id must name an active project; duplicates are dropped
async fn checked_project_ids(state: &AppState, ids: &[String]) -> AppResult<Vec<String>> {
    let mut checked: Vec<String> = Vec::with_capacity(ids.len());
    for id in ids {
        let id = id.trim();
        let exists = state.store.get_project(id).await?.map_or(false, |p| p.active);
        if !exists {
            return Err(AppError::Validation(format!("Unknown project: {}", id)));
        }
        if !checked.iter().any(|c| c == id) {
            checked.push(id.to_string());
        }
    }
    Ok(checked)
}

pub async fn create_user(
    state: &AppState,
    ctx: &SessionContext,
    form: CreateUserForm,
) -> AppResult<UserSummary> {
    ctx.require_admin()?;

    let username = form.username.trim().to_string();
    if username.is_empty() || form.password.is_empty() {
        return Err(AppError::Validation("Username and password are required".into()));
    }

    // Deactivated records still hold the name
    if state.config.auth.is_builtin(&username) || state.store.get_user(&username).await?.is_some() {
        tracing::warn!("Rejected duplicate username: {}", username);
        return Err(AppError::Conflict(format!("User {} already exists", username)));
    }

    let project_access = checked_project_ids(state, &form.project_access).await?;
    let password_hash = hash(form.password.as_bytes(), state.config.auth.bcrypt_cost)?;

    let user = User {
        username,
        password_hash,
        role: form.role,
        project_access,
        active: true,
        created_at: Utc::now(),
        created_by: ctx.username.clone(),
        updated_at: None,
        deactivated_at: None,
    };
    state.store.save_user(&user).await?;

    tracing::info!("User {} created by {} with role {}", user.username, ctx.username, user.role);
    Ok(UserSummary::from(&user))
}

/// Active users sorted by username.
pub async fn list_users(state: &AppState, ctx: &SessionContext) -> AppResult<Vec<UserSummary>> {
    ctx.require_admin()?;

    let mut users: Vec<User> = state
        .store
        .list_users()
        .await?
        .into_iter()
        .filter(|u| u.active)
        .collect();
    users.sort_by(|a, b| a.username.cmp(&b.username));

    Ok(users.iter().map(UserSummary::from).collect())
}

pub async fn deactivate_user(state: &AppState, ctx: &SessionContext, username: &str) -> AppResult<()> {
    ctx.require_admin()?;

    if state.config.auth.is_builtin(username) {
        return Err(AppError::Forbidden("Built-in accounts cannot be deactivated".into()));
    }
    if ctx.username == username {
        return Err(AppError::Forbidden("You cannot deactivate your own account".into()));
    }

    let mut user = require_active(state, username).await?;
    let now = Utc::now();
    user.active = false;
    user.updated_at = Some(now);
    user.deactivated_at = Some(now);
    state.store.save_user(&user).await?;

    tracing::info!("User {} deactivated by {}", username, ctx.username);
    Ok(())
}

pub async fn grant_access(
    state: &AppState,
    ctx: &SessionContext,
    username: &str,
    project_id: &str,
) -> AppResult<UserSummary> {
    ctx.require_admin()?;

    let project_ids = checked_project_ids(state, &[project_id.to_string()]).await?;
    let mut user = require_active(state, username).await?;
    if user.grant(&project_ids[0]) {
        user.updated_at = Some(Utc::now());
        state.store.save_user(&user).await?;
        tracing::info!("Granted {} access to project {}", username, project_id);
    }
    Ok(UserSummary::from(&user))
}

pub async fn revoke_access(
    state: &AppState,
    ctx: &SessionContext,
    username: &str,
    project_id: &str,
) -> AppResult<UserSummary> {
    ctx.require_admin()?;

    let mut user = require_active(state, username).await?;
    if user.revoke(project_id) {
        user.updated_at = Some(Utc::now());
        state.store.save_user(&user).await?;
        tracing::info!("Revoked {} access to project {}", username, project_id);
        if user.project_access.is_empty() {
            tracing::warn!("User {} has an empty allow-list and now sees every project", username);
        }
    }
    Ok(UserSummary::from(&user))
}

/// Replaces the user's allow-list. An empty list lifts all restrictions.
pub async fn set_access(
    state: &AppState,
    ctx: &SessionContext,
    username: &str,
    project_ids: &[String],
) -> AppResult<UserSummary> {
    ctx.require_admin()?;

    let project_access = checked_project_ids(state, project_ids).await?;
    let mut user = require_active(state, username).await?;
    user.project_access = project_access;
    user.updated_at = Some(Utc::now());
    state.store.save_user(&user).await?;

    tracing::info!("Allow-list of {} set to {:?}", username, user.project_access);
    Ok(UserSummary::from(&user))
}
