//! Repository for the `comments` table.

use quill_core::admin::search_pattern;
use quill_core::types::DbId;
use sqlx::PgPool;

use crate::models::comment::{AdminCommentRow, Comment, CommentSearch, CommentView, CreateComment};

const COLUMNS: &str = "id, post_id, author_id, text, created_at, updated_at";

/// Provides CRUD operations for comments.
pub struct CommentRepo;

impl CommentRepo {
    /// Insert a new comment, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateComment) -> Result<Comment, sqlx::Error> {
        let query = format!(
            "INSERT INTO comments (post_id, author_id, text)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Comment>(&query)
            .bind(input.post_id)
            .bind(input.author_id)
            .bind(&input.text)
            .fetch_one(pool)
            .await
    }

    /// Comments on a post with their authors, newest first.
    pub async fn list_for_post(
        pool: &PgPool,
        post_id: DbId,
    ) -> Result<Vec<CommentView>, sqlx::Error> {
        sqlx::query_as::<_, CommentView>(
            "SELECT c.id, c.post_id, c.author_id,
                    u.username AS author_username,
                    u.first_name AS author_first_name,
                    u.last_name AS author_last_name,
                    c.text, c.created_at
             FROM comments c
             JOIN users u ON u.id = c.author_id
             WHERE c.post_id = $1
             ORDER BY c.created_at DESC, c.id DESC",
        )
        .bind(post_id)
        .fetch_all(pool)
        .await
    }

    /// Admin list; the search term matches the text or the author's username.
    pub async fn admin_search(
        pool: &PgPool,
        search: &CommentSearch,
    ) -> Result<Vec<AdminCommentRow>, sqlx::Error> {
        let pattern = search_pattern(search.query.as_deref());
        sqlx::query_as::<_, AdminCommentRow>(
            "SELECT c.id, c.post_id, c.text, c.created_at AS created, u.username AS author
             FROM comments c
             JOIN users u ON u.id = c.author_id
             WHERE ($1::TEXT IS NULL OR c.text ILIKE $1 OR u.username ILIKE $1)
             ORDER BY c.created_at DESC, c.id DESC
             LIMIT $2 OFFSET $3",
        )
        .bind(pattern)
        .bind(search.limit)
        .bind(search.offset)
        .fetch_all(pool)
        .await
    }

    /// Returns `true` if a row was deleted.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM comments WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
