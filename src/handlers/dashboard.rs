use axum::{extract::State, response::Json};
use tower_sessions::Session;
use crate::errors::AppResult;
use crate::middleware::current_user;
use crate::services::dashboard::{self, DashboardSummary};
use crate::state::AppState;

pub async fn serve_dashboard(
    State(state): State<AppState>,
    session: Session,
) -> AppResult<Json<DashboardSummary>> {
    let ctx = current_user(&state, &session).await?;
    tracing::debug!("Building dashboard for {}", ctx.username);
    Ok(Json(dashboard::summary(&state, &ctx).await?))
}
