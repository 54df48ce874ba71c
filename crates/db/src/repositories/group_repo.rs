//! Repository for the `groups` table.

use quill_core::admin::search_pattern;
use quill_core::types::DbId;
use sqlx::PgPool;

use crate::models::group::{CreateGroup, Group, GroupChoice, UpdateGroup};

const COLUMNS: &str = "id, title, slug, description, created_at, updated_at";

/// Provides CRUD operations for groups.
pub struct GroupRepo;

impl GroupRepo {
    /// Insert a new group. A duplicate slug fails on `uq_groups_slug`.
    pub async fn create(pool: &PgPool, input: &CreateGroup) -> Result<Group, sqlx::Error> {
        let query = format!(
            "INSERT INTO groups (title, slug, description)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Group>(&query)
            .bind(&input.title)
            .bind(&input.slug)
            .bind(&input.description)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Group>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM groups WHERE id = $1");
        sqlx::query_as::<_, Group>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_slug(pool: &PgPool, slug: &str) -> Result<Option<Group>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM groups WHERE slug = $1");
        sqlx::query_as::<_, Group>(&query)
            .bind(slug)
            .fetch_optional(pool)
            .await
    }

    /// Whether a group with this id exists (post form choice validation).
    pub async fn exists(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let (exists,): (bool,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM groups WHERE id = $1)")
            .bind(id)
            .fetch_one(pool)
            .await?;
        Ok(exists)
    }

    /// All groups ordered by title, for the post form.
    pub async fn list_choices(pool: &PgPool) -> Result<Vec<GroupChoice>, sqlx::Error> {
        sqlx::query_as::<_, GroupChoice>("SELECT id, title FROM groups ORDER BY title, id")
            .fetch_all(pool)
            .await
    }

    /// Admin list with case-insensitive substring search on the title.
    pub async fn search(
        pool: &PgPool,
        query: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Group>, sqlx::Error> {
        let pattern = search_pattern(query);
        let sql = format!(
            "SELECT {COLUMNS} FROM groups
             WHERE ($1::TEXT IS NULL OR title ILIKE $1)
             ORDER BY title, id
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, Group>(&sql)
            .bind(pattern)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Update a group. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateGroup,
    ) -> Result<Option<Group>, sqlx::Error> {
        let query = format!(
            "UPDATE groups SET
                title = COALESCE($2, title),
                slug = COALESCE($3, slug),
                description = COALESCE($4, description)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Group>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.slug)
            .bind(&input.description)
            .fetch_optional(pool)
            .await
    }

    /// Delete a group; its posts stay with `group_id` cleared.
    ///
    /// Returns `true` if a row was deleted.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM groups WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
