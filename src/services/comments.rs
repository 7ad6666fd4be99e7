use chrono::Utc;
use uuid::Uuid;
use crate::errors::{AppError, AppResult};
use crate::models::{Comment, CommentForm, CommentPosted, NextActor, Role, SessionContext};
use crate::state::AppState;
use super::projects::{load_accessible, load_active};

/// Active comments on a project the caller can access, oldest first.
pub async fn list_comments(state: &AppState, ctx: &SessionContext, project_id: &str) -> AppResult<Vec<Comment>> {
    load_accessible(state, ctx, project_id).await?;

    let mut comments: Vec<Comment> = state
        .store
        .list_comments(project_id)
        .await?
        .into_iter()
        .filter(|c| c.active)
        .collect();
    comments.sort_by(|a, b| a.created_at.cmp(&b.created_at));
    Ok(comments)
}

// Reloads the project immediately before writing so only the flag and its
// timestamp change; edits saved since the access check survive.
async fn advance_turn(state: &AppState, project_id: &str, author_role: Role) -> AppResult<NextActor> {
    let mut project = load_active(state, project_id).await?;
    let next_actor = project.next_actor.after_comment(author_role);
    if next_actor != project.next_actor {
        project.next_actor = next_actor;
        project.updated_at = Some(Utc::now());
        state.store.save_project(&project).await?;
    }
    Ok(next_actor)
}

/// Appends a comment and advances the project's next-actor flag.
pub async fn add_comment(
    state: &AppState,
    ctx: &SessionContext,
    project_id: &str,
    form: CommentForm,
) -> AppResult<CommentPosted> {
    let text = form.text.trim();
    if text.is_empty() {
        return Err(AppError::Validation("Comment text is required".into()));
    }

    let project = load_accessible(state, ctx, project_id).await?;

    let comment = Comment {
        id: Uuid::new_v4().to_string(),
        project_id: project.id.clone(),
        text: text.to_string(),
        author: ctx.username.clone(),
        author_role: ctx.role,
        created_at: Utc::now(),
        active: true,
    };
    state.store.save_comment(&comment).await?;

    let next_actor = advance_turn(state, &project.id, ctx.role).await?;

    tracing::info!(
        "Comment {} added to project {} by {}; next actor is {:?}",
        comment.id, project.id, ctx.username, next_actor
    );
    Ok(CommentPosted { comment, next_actor })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ProjectStatus, UpdateProjectForm};
    use crate::services::projects::update_project;
    use crate::services::projects::tests::{admin, create_test_project, create_test_user};

    fn text(t: &str) -> CommentForm {
        CommentForm { text: t.into() }
    }

    #[tokio::test]
    async fn test_comments_ordered_and_attributed() {
        let state = AppState::for_tests();
        let project = create_test_project(&state, "Alpha").await;
        let ana = create_test_user(&state, "ana", Vec::new()).await;

        add_comment(&state, &admin(), &project.id, text("first")).await.unwrap();
        add_comment(&state, &ana, &project.id, text("  second  ")).await.unwrap();

        let comments = list_comments(&state, &ana, &project.id).await.unwrap();
        let texts: Vec<_> = comments.iter().map(|c| c.text.as_str()).collect();
        assert_eq!(texts, vec!["first", "second"]);
        assert_eq!(comments[1].author, "ana");
        assert_eq!(comments[1].author_role, Role::User);
    }

    #[tokio::test]
    async fn test_two_user_comments_restore_flag() {
        let state = AppState::for_tests();
        let project = create_test_project(&state, "Alpha").await;
        let ana = create_test_user(&state, "ana", Vec::new()).await;

        let first = add_comment(&state, &ana, &project.id, text("one")).await.unwrap();
        assert_eq!(first.next_actor, NextActor::User);
        let second = add_comment(&state, &ana, &project.id, text("two")).await.unwrap();
        assert_eq!(second.next_actor, NextActor::Admin);

        let stored = state.store.get_project(&project.id).await.unwrap().unwrap();
        assert_eq!(stored.next_actor, NextActor::Admin);
    }

    #[tokio::test]
    async fn test_admin_creates_user_comments_admin_replies() {
        let state = AppState::for_tests();
        let project = create_test_project(&state, "Alpha").await;
        let bia = create_test_user(&state, "bia", vec![project.id.clone()]).await;
        assert_eq!(project.next_actor, NextActor::Admin);

        let posted = add_comment(&state, &bia, &project.id, text("ready for review")).await.unwrap();
        assert_eq!(posted.next_actor, NextActor::User);

        // Admin replies never move the flag
        let reply = add_comment(&state, &admin(), &project.id, text("looks good")).await.unwrap();
        assert_eq!(reply.next_actor, NextActor::User);

        let stored = state.store.get_project(&project.id).await.unwrap().unwrap();
        assert_eq!(stored.next_actor, NextActor::User);
        assert_eq!(list_comments(&state, &bia, &project.id).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_rejections() {
        let state = AppState::for_tests();
        let alpha = create_test_project(&state, "Alpha").await;
        let beta = create_test_project(&state, "Beta").await;
        let bia = create_test_user(&state, "bia", vec![alpha.id.clone()]).await;

        assert!(matches!(
            add_comment(&state, &bia, &alpha.id, text("   ")).await,
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            add_comment(&state, &bia, &beta.id, text("hi")).await,
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            list_comments(&state, &bia, &beta.id).await,
            Err(AppError::NotFound(_))
        ));
        assert!(state.store.list_comments(&beta.id).await.unwrap().is_empty());

        let stored = state.store.get_project(&beta.id).await.unwrap().unwrap();
        assert_eq!(stored.next_actor, NextActor::Admin);
    }

    #[tokio::test]
    async fn test_turn_write_keeps_edits_made_after_the_read() {
        let state = AppState::for_tests();
        let project = create_test_project(&state, "Alpha").await;

        // The caller checked access on `project`; an admin edit lands before the flag is written
        let seen = load_active(&state, &project.id).await.unwrap();
        update_project(&state, &admin(), &project.id, UpdateProjectForm {
            name: Some("Alpha (renamed)".into()),
            status: Some(ProjectStatus::Paused),
            ..Default::default()
        }).await.unwrap();

        let next = advance_turn(&state, &seen.id, Role::User).await.unwrap();
        assert_eq!(next, NextActor::User);

        let stored = state.store.get_project(&project.id).await.unwrap().unwrap();
        assert_eq!(stored.next_actor, NextActor::User);
        assert_eq!(stored.name, "Alpha (renamed)");
        assert_eq!(stored.status, ProjectStatus::Paused);
    }
}
