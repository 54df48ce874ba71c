//! Post model, joined list rows and DTOs.

use quill_core::admin::DateFilter;
use quill_core::types::{DbId, Timestamp};
use quill_core::users::display_name;
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `posts` table. `created_at` is the publication date.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct Post {
    pub id: DbId,
    pub text: String,
    pub author_id: DbId,
    pub group_id: Option<DbId>,
    /// Path relative to the media root, e.g. `posts/<uuid>.png`.
    pub image: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Post joined with author, group and comment count for rendering.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PostView {
    pub id: DbId,
    pub text: String,
    pub image: Option<String>,
    pub author_id: DbId,
    pub author_username: String,
    pub author_first_name: String,
    pub author_last_name: String,
    pub group_id: Option<DbId>,
    pub group_title: Option<String>,
    pub group_slug: Option<String>,
    pub comment_count: i64,
    pub created_at: Timestamp,
}

impl PostView {
    pub fn author_name(&self) -> String {
        display_name(
            &self.author_first_name,
            &self.author_last_name,
            &self.author_username,
        )
    }
}

pub struct CreatePost {
    pub author_id: DbId,
    pub text: String,
    pub group_id: Option<DbId>,
    pub image: Option<String>,
}

/// Full replacement of the editable fields; `created_at` is never touched.
pub struct UpdatePost {
    pub text: String,
    pub group_id: Option<DbId>,
    pub image: Option<String>,
}

/// Which posts a listing shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostFilter {
    All,
    Group(DbId),
    Author(DbId),
    /// Posts by every author the given user follows.
    FollowedBy(DbId),
}

/// Search parameters for the admin post list.
#[derive(Debug, Clone, Default)]
pub struct PostSearch {
    pub query: Option<String>,
    pub since: Option<DateFilter>,
    pub limit: i64,
    pub offset: i64,
}

/// Admin list row (`pk, text, pub_date, author, group`).
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AdminPostRow {
    pub id: DbId,
    pub text: String,
    pub pub_date: Timestamp,
    pub author: String,
    pub group: Option<String>,
}
