use chrono::Utc;
use uuid::Uuid;
use crate::errors::{AppError, AppResult};
use crate::models::{
    CreateProjectForm, NextActor, Project, ProjectStatus, ProjectView, SessionContext,
    UpdateProjectForm, User,
};
use crate::state::AppState;
use super::access::{can_access, has_access};
use super::users::find_active;

fn required(field: &str, value: &str) -> AppResult<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(AppError::Validation(format!("Field '{}' is required", field)));
    }
    Ok(value.to_string())
}

// Allowed users are derived from the users' own allow-lists
fn derive_allowed(users: &[User], project_id: &str) -> Vec<String> {
    let mut allowed: Vec<String> = users
        .iter()
        .filter(|u| u.active && u.project_access.iter().any(|p| p == project_id))
        .map(|u| u.username.clone())
        .collect();
    allowed.sort();
    allowed
}

// Resolves a list of usernames to active stored users, rejecting unknown names
async fn resolve_users(state: &AppState, usernames: &[String]) -> AppResult<Vec<User>> {
    let mut users: Vec<User> = Vec::with_capacity(usernames.len());
    for name in usernames {
        let name = name.trim();
        let user = find_active(state, name)
            .await?
            .ok_or_else(|| AppError::Validation(format!("Unknown user: {}", name)))?;
        if !users.iter().any(|u| u.username == user.username) {
            users.push(user);
        }
    }
    Ok(users)
}

pub(crate) async fn load_active(state: &AppState, project_id: &str) -> AppResult<Project> {
    state
        .store
        .get_project(project_id)
        .await?
        .filter(|p| p.active)
        .ok_or_else(|| AppError::NotFound(format!("Project {} not found", project_id)))
}

/// Active project the caller may see. Inaccessible projects read as missing.
pub(crate) async fn load_accessible(
    state: &AppState,
    ctx: &SessionContext,
    project_id: &str,
) -> AppResult<Project> {
    let project = load_active(state, project_id).await?;
    if !can_access(state, ctx, project_id).await? {
        tracing::warn!("User {} denied access to project {}", ctx.username, project_id);
        return Err(AppError::NotFound(format!("Project {} not found", project_id)));
    }
    Ok(project)
}

async fn view(state: &AppState, project: Project) -> AppResult<ProjectView> {
    let users = state.store.list_users().await?;
    let allowed_users = derive_allowed(&users, &project.id);
    Ok(ProjectView::new(project, allowed_users))
}

pub async fn create_project(
    state: &AppState,
    ctx: &SessionContext,
    form: CreateProjectForm,
) -> AppResult<ProjectView> {
    ctx.require_admin()?;

    let name = required("name", &form.name)?;
    let description = required("description", &form.description)?;
    let owner = required("owner", &form.owner)?;
    if form.deadline < Utc::now().date_naive() {
        return Err(AppError::Validation("Deadline cannot be in the past".into()));
    }
    let granted = resolve_users(state, &form.allowed_users).await?;

    let project = Project {
        id: Uuid::new_v4().to_string(),
        name,
        description,
        owner,
        deadline: form.deadline,
        status: ProjectStatus::InProgress,
        next_actor: NextActor::Admin,
        active: true,
        created_at: Utc::now(),
        created_by: ctx.username.clone(),
        updated_at: None,
        deactivated_at: None,
    };
    state.store.save_project(&project).await?;

    for mut user in granted {
        if user.grant(&project.id) {
            user.updated_at = Some(Utc::now());
            state.store.save_user(&user).await?;
        }
    }

    tracing::info!("Project {} ({}) created by {}", project.name, project.id, ctx.username);
    view(state, project).await
}

/// Active projects the caller can access, newest first.
pub async fn list_projects(state: &AppState, ctx: &SessionContext) -> AppResult<Vec<ProjectView>> {
    let users = state.store.list_users().await?;
    let record = users.iter().find(|u| u.username == ctx.username);
    let privileged = &state.config.auth.privileged_users;

    let mut projects: Vec<Project> = state
        .store
        .list_projects()
        .await?
        .into_iter()
        .filter(|p| p.active && has_access(privileged, &ctx.username, record, &p.id))
        .collect();
    projects.sort_by(|a, b| b.created_at.cmp(&a.created_at));

    tracing::debug!("Listing {} projects for {}", projects.len(), ctx.username);
    Ok(projects
        .into_iter()
        .map(|project| {
            let allowed_users = derive_allowed(&users, &project.id);
            ProjectView::new(project, allowed_users)
        })
        .collect())
}

pub async fn get_project(state: &AppState, ctx: &SessionContext, project_id: &str) -> AppResult<ProjectView> {
    let project = load_accessible(state, ctx, project_id).await?;
    view(state, project).await
}

pub async fn project_access(state: &AppState, ctx: &SessionContext, project_id: &str) -> AppResult<Vec<String>> {
    let project = load_accessible(state, ctx, project_id).await?;
    Ok(view(state, project).await?.allowed_users)
}

pub async fn update_project(
    state: &AppState,
    ctx: &SessionContext,
    project_id: &str,
    form: UpdateProjectForm,
) -> AppResult<ProjectView> {
    ctx.require_admin()?;

    let mut project = load_active(state, project_id).await?;

    // Validate everything before touching the store
    let name = form.name.as_deref().map(|v| required("name", v)).transpose()?;
    let description = form.description.as_deref().map(|v| required("description", v)).transpose()?;
    let owner = form.owner.as_deref().map(|v| required("owner", v)).transpose()?;
    let granted = match &form.allowed_users {
        Some(usernames) => Some(resolve_users(state, usernames).await?),
        None => None,
    };

    if let Some(name) = name {
        project.name = name;
    }
    if let Some(description) = description {
        project.description = description;
    }
    if let Some(owner) = owner {
        project.owner = owner;
    }
    if let Some(deadline) = form.deadline {
        project.deadline = deadline;
    }
    if let Some(status) = form.status {
        project.status = status;
    }
    project.updated_at = Some(Utc::now());
    state.store.save_project(&project).await?;

    let now_unrestricted = match granted {
        Some(granted) => sync_allowed_users(state, &project.id, &granted).await?,
        None => Vec::new(),
    };

    tracing::info!("Project {} updated by {}", project.id, ctx.username);
    let mut view = view(state, project).await?;
    view.now_unrestricted = now_unrestricted;
    Ok(view)
}

// Grants the project to `granted` and revokes it from every other active user.
// Returns the users left with an empty allow-list.
async fn sync_allowed_users(state: &AppState, project_id: &str, granted: &[User]) -> AppResult<Vec<String>> {
    let mut emptied = Vec::new();
    for mut user in state.store.list_users().await?.into_iter().filter(|u| u.active) {
        let wanted = granted.iter().any(|g| g.username == user.username);
        let changed = if wanted { user.grant(project_id) } else { user.revoke(project_id) };
        if !changed {
            continue;
        }
        if user.project_access.is_empty() {
            tracing::warn!("User {} has an empty allow-list and now sees every project", user.username);
            emptied.push(user.username.clone());
        }
        user.updated_at = Some(Utc::now());
        state.store.save_user(&user).await?;
    }
    emptied.sort();
    Ok(emptied)
}

/// Soft delete. Comments stay in the store.
pub async fn deactivate_project(state: &AppState, ctx: &SessionContext, project_id: &str) -> AppResult<()> {
    ctx.require_admin()?;

    let mut project = load_active(state, project_id).await?;
    let now = Utc::now();
    project.active = false;
    project.updated_at = Some(now);
    project.deactivated_at = Some(now);
    state.store.save_project(&project).await?;

    tracing::info!("Project {} deactivated by {}", project_id, ctx.username);
    Ok(())
}
