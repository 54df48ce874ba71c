//! Comment model and DTOs.

use quill_core::types::{DbId, Timestamp};
use quill_core::users::display_name;
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `comments` table.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct Comment {
    pub id: DbId,
    pub post_id: DbId,
    pub author_id: DbId,
    pub text: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Comment joined with its author, as listed under a post.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CommentView {
    pub id: DbId,
    pub post_id: DbId,
    pub author_id: DbId,
    pub author_username: String,
    pub author_first_name: String,
    pub author_last_name: String,
    pub text: String,
    pub created_at: Timestamp,
}

impl CommentView {
    pub fn author_name(&self) -> String {
        display_name(
            &self.author_first_name,
            &self.author_last_name,
            &self.author_username,
        )
    }
}

pub struct CreateComment {
    pub post_id: DbId,
    pub author_id: DbId,
    pub text: String,
}

/// Search parameters for the admin comment list.
#[derive(Debug, Clone, Default)]
pub struct CommentSearch {
    pub query: Option<String>,
    pub limit: i64,
    pub offset: i64,
}

/// Admin list row (`text, created, author`).
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AdminCommentRow {
    pub id: DbId,
    pub post_id: DbId,
    pub text: String,
    pub created: Timestamp,
    pub author: String,
}
