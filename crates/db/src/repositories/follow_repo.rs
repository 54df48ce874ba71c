//! Repository for the `follows` table.

use quill_core::types::DbId;
use sqlx::PgPool;

use crate::models::follow::Follow;

const COLUMNS: &str = "id, user_id, author_id, created_at, updated_at";

/// Provides operations on follow edges.
pub struct FollowRepo;

impl FollowRepo {
    /// Create the edge `user_id -> author_id` unless it already exists.
    ///
    /// Returns `true` when a new row was inserted. Self-follows are rejected
    /// by the `ck_follows_not_self` constraint, so callers check first.
    pub async fn get_or_create(
        pool: &PgPool,
        user_id: DbId,
        author_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "INSERT INTO follows (user_id, author_id)
             VALUES ($1, $2)
             ON CONFLICT ON CONSTRAINT uq_follows_user_author DO NOTHING",
        )
        .bind(user_id)
        .bind(author_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn find(
        pool: &PgPool,
        user_id: DbId,
        author_id: DbId,
    ) -> Result<Option<Follow>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM follows WHERE user_id = $1 AND author_id = $2");
        sqlx::query_as::<_, Follow>(&query)
            .bind(user_id)
            .bind(author_id)
            .fetch_optional(pool)
            .await
    }

    pub async fn exists(pool: &PgPool, user_id: DbId, author_id: DbId) -> Result<bool, sqlx::Error> {
        let (exists,): (bool,) = sqlx::query_as(
            "SELECT EXISTS(SELECT 1 FROM follows WHERE user_id = $1 AND author_id = $2)",
        )
        .bind(user_id)
        .bind(author_id)
        .fetch_one(pool)
        .await?;
        Ok(exists)
    }

    /// Delete a follow edge by id. Returns `true` if a row was deleted.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM follows WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
