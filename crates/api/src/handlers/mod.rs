//! Request handlers.
//!
//! Page handlers return HTML or redirects; [`admin`] serves the JSON
//! administration API.

pub mod admin;
pub mod auth;
pub mod errors;
pub mod follows;
pub mod posts;

use quill_core::error::CoreError;
use quill_core::pagination::{Page, Paginator, PAGE_SIZE};
use quill_core::types::DbId;
use quill_db::models::post::{PostFilter, PostView};
use quill_db::models::user::User;
use quill_db::repositories::{PostRepo, UserRepo};
use quill_db::DbPool;

use crate::error::AppResult;

/// One page of posts for a listing; bad page numbers are normalised.
pub(crate) async fn load_posts_page(
    pool: &DbPool,
    filter: PostFilter,
    raw_page: Option<&str>,
) -> AppResult<(Page, Vec<PostView>)> {
    let count = PostRepo::count(pool, filter).await?;
    let page = Paginator::new(count, PAGE_SIZE).get_page(raw_page);
    let posts = PostRepo::list(pool, filter, page.limit, page.offset).await?;
    Ok((page, posts))
}

/// The user named in the URL, or 404.
pub(crate) async fn find_author(pool: &DbPool, username: &str) -> AppResult<User> {
    UserRepo::find_by_username(pool, username)
        .await?
        .ok_or_else(|| CoreError::not_found("User", username).into())
}

/// A `post_id` path segment; anything non-numeric is a missing post.
pub(crate) fn parse_post_id(raw: &str) -> AppResult<DbId> {
    raw.parse::<DbId>()
        .map_err(|_| CoreError::not_found("Post", raw).into())
}
