use crate::errors::AppResult;
use crate::models::{SessionContext, User};
use crate::state::AppState;

/// Decides whether `username` may view and act on `project_id`.
///
/// Privileged usernames bypass every check. Anyone else needs an active stored
/// record (`record`); without one access is denied. An empty allow-list on the
/// record means unrestricted access, otherwise the project id must be listed.
pub fn has_access(
    privileged: &[String],
    username: &str,
    record: Option<&User>,
    project_id: &str,
) -> bool {
    if privileged.iter().any(|p| p == username) {
        return true;
    }

    match record {
        Some(user) if user.active => user.allows(project_id),
        _ => false,
    }
}

/// Access check against the store. Re-reads the user record on every call.
pub async fn can_access(state: &AppState, ctx: &SessionContext, project_id: &str) -> AppResult<bool> {
    let privileged = &state.config.auth.privileged_users;
    if privileged.iter().any(|p| p == &ctx.username) {
        return Ok(true);
    }

    let record = state.store.get_user(&ctx.username).await?;
    Ok(has_access(privileged, &ctx.username, record.as_ref(), project_id))
}
