//! Follow feed and follow / unfollow actions.

use axum::extract::{Path, Query, State};
use axum::response::{Html, Redirect};
use quill_core::error::CoreError;
use quill_db::models::post::PostFilter;
use quill_db::repositories::FollowRepo;

use super::{find_author, load_posts_page};
use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::query::PageParams;
use crate::state::AppState;
use crate::templates::posts::follow_page;
use crate::templates::profile_url;

/// GET /follow/
///
/// Posts by every author the viewer follows.
pub async fn follow_index(
    State(state): State<AppState>,
    user: AuthUser,
    Query(params): Query<PageParams>,
) -> AppResult<Html<String>> {
    let (page, posts) = load_posts_page(
        &state.pool,
        PostFilter::FollowedBy(user.user_id),
        params.page.as_deref(),
    )
    .await?;
    Ok(Html(follow_page(Some(&user), &page, &posts)))
}

/// GET|POST /{username}/follow/
///
/// Following yourself is a no-op; repeating a follow does not duplicate it.
pub async fn profile_follow(
    State(state): State<AppState>,
    user: AuthUser,
    Path(username): Path<String>,
) -> AppResult<Redirect> {
    let author = find_author(&state.pool, &username).await?;

    if author.id != user.user_id {
        let created = FollowRepo::get_or_create(&state.pool, user.user_id, author.id).await?;
        if created {
            tracing::info!(user_id = user.user_id, author_id = author.id, "Follow created");
        }
    }

    Ok(Redirect::to(&profile_url(&username)))
}

/// GET|POST /{username}/unfollow/
///
/// 404 when the viewer does not follow the author.
pub async fn profile_unfollow(
    State(state): State<AppState>,
    user: AuthUser,
    Path(username): Path<String>,
) -> AppResult<Redirect> {
    let author = find_author(&state.pool, &username).await?;
    let follow = FollowRepo::find(&state.pool, user.user_id, author.id)
        .await?
        .ok_or_else(|| CoreError::not_found("Follow", format!("{}->{}", user.user_id, author.id)))?;

    FollowRepo::delete(&state.pool, follow.id).await?;
    tracing::info!(user_id = user.user_id, author_id = author.id, "Follow removed");

    Ok(Redirect::to(&profile_url(&username)))
}
