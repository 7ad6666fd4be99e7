use std::collections::BTreeMap;
use chrono::NaiveDate;
use serde::Serialize;
use crate::errors::AppResult;
use crate::models::{ProjectStatus, SessionContext};
use crate::state::AppState;
use super::projects::list_projects;

#[derive(Serialize, Debug)]
pub struct AttentionItem {
    pub id: String,
    pub name: String,
    pub deadline: NaiveDate,
    pub status: ProjectStatus,
}

#[derive(Serialize, Debug)]
pub struct DashboardSummary {
    pub total: usize,
    pub in_progress: usize,
    pub done: usize,
    pub my_turn: usize,
    pub by_status: BTreeMap<ProjectStatus, usize>,
    pub attention: Vec<AttentionItem>,  // Projects waiting on the caller, earliest deadline first
}

pub async fn summary(state: &AppState, ctx: &SessionContext) -> AppResult<DashboardSummary> {
    let projects = list_projects(state, ctx).await?;

    let mut by_status = BTreeMap::new();
    for view in &projects {
        *by_status.entry(view.project.status).or_insert(0) += 1;
    }

    let mut attention: Vec<AttentionItem> = projects
        .iter()
        .filter(|v| v.project.next_actor.is_turn_of(ctx.role))
        .map(|v| AttentionItem {
            id: v.project.id.clone(),
            name: v.project.name.clone(),
            deadline: v.project.deadline,
            status: v.project.status,
        })
        .collect();
    attention.sort_by(|a, b| a.deadline.cmp(&b.deadline));

    Ok(DashboardSummary {
        total: projects.len(),
        in_progress: by_status.get(&ProjectStatus::InProgress).copied().unwrap_or(0),
        done: by_status.get(&ProjectStatus::Done).copied().unwrap_or(0),
        my_turn: attention.len(),
        by_status,
        attention,
    })
}
