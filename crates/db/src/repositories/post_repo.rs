//! Repository for the `posts` table.

use quill_core::admin::search_pattern;
use quill_core::types::DbId;
use sqlx::PgPool;

use crate::models::post::{
    AdminPostRow, CreatePost, Post, PostFilter, PostSearch, PostView, UpdatePost,
};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, text, author_id, group_id, image, created_at, updated_at";

/// Joined select producing [`PostView`] rows (alias `p` for posts).
const VIEW_SELECT: &str = "SELECT p.id, p.text, p.image,
        p.author_id, u.username AS author_username,
        u.first_name AS author_first_name, u.last_name AS author_last_name,
        p.group_id, g.title AS group_title, g.slug AS group_slug,
        (SELECT COUNT(*) FROM comments c WHERE c.post_id = p.id) AS comment_count,
        p.created_at
     FROM posts p
     JOIN users u ON u.id = p.author_id
     LEFT JOIN groups g ON g.id = p.group_id";

/// Newest first; id breaks ties between posts created in the same instant.
const ORDER: &str = "ORDER BY p.created_at DESC, p.id DESC";

impl PostFilter {
    /// `WHERE` condition using `$1` for the bound id, if any.
    fn condition(&self) -> Option<&'static str> {
        match self {
            PostFilter::All => None,
            PostFilter::Group(_) => Some("p.group_id = $1"),
            PostFilter::Author(_) => Some("p.author_id = $1"),
            PostFilter::FollowedBy(_) => {
                Some("p.author_id IN (SELECT f.author_id FROM follows f WHERE f.user_id = $1)")
            }
        }
    }

    fn bound_id(&self) -> Option<DbId> {
        match *self {
            PostFilter::All => None,
            PostFilter::Group(id) | PostFilter::Author(id) | PostFilter::FollowedBy(id) => {
                Some(id)
            }
        }
    }
}

/// Provides CRUD and listing operations for posts.
pub struct PostRepo;

impl PostRepo {
    /// Insert a new post, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreatePost) -> Result<Post, sqlx::Error> {
        let query = format!(
            "INSERT INTO posts (text, author_id, group_id, image)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Post>(&query)
            .bind(&input.text)
            .bind(input.author_id)
            .bind(input.group_id)
            .bind(&input.image)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Post>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM posts WHERE id = $1");
        sqlx::query_as::<_, Post>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a post by id, only if it was written by `author_id`.
    pub async fn find_view(
        pool: &PgPool,
        author_id: DbId,
        id: DbId,
    ) -> Result<Option<PostView>, sqlx::Error> {
        let query = format!("{VIEW_SELECT} WHERE p.id = $1 AND p.author_id = $2");
        sqlx::query_as::<_, PostView>(&query)
            .bind(id)
            .bind(author_id)
            .fetch_optional(pool)
            .await
    }

    /// Number of posts matching `filter`.
    pub async fn count(pool: &PgPool, filter: PostFilter) -> Result<i64, sqlx::Error> {
        let query = match filter.condition() {
            Some(cond) => format!("SELECT COUNT(*) FROM posts p WHERE {cond}"),
            None => "SELECT COUNT(*) FROM posts p".to_string(),
        };
        let mut q = sqlx::query_as::<_, (i64,)>(&query);
        if let Some(id) = filter.bound_id() {
            q = q.bind(id);
        }
        let (count,) = q.fetch_one(pool).await?;
        Ok(count)
    }

    /// One page of posts matching `filter`, newest first.
    pub async fn list(
        pool: &PgPool,
        filter: PostFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<PostView>, sqlx::Error> {
        let query = match filter.condition() {
            Some(cond) => format!("{VIEW_SELECT} WHERE {cond} {ORDER} LIMIT $2 OFFSET $3"),
            None => format!("{VIEW_SELECT} {ORDER} LIMIT $1 OFFSET $2"),
        };
        let mut q = sqlx::query_as::<_, PostView>(&query);
        if let Some(id) = filter.bound_id() {
            q = q.bind(id);
        }
        q.bind(limit).bind(offset).fetch_all(pool).await
    }

    /// Replace the editable fields of a post. `created_at` is left as is.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdatePost,
    ) -> Result<Option<Post>, sqlx::Error> {
        let query = format!(
            "UPDATE posts SET text = $2, group_id = $3, image = $4
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Post>(&query)
            .bind(id)
            .bind(&input.text)
            .bind(input.group_id)
            .bind(&input.image)
            .fetch_optional(pool)
            .await
    }

    /// Delete a post and, by cascade, its comments. Returns `true` if deleted.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Admin list with substring search on the text and a publication-date filter.
    pub async fn admin_search(
        pool: &PgPool,
        search: &PostSearch,
    ) -> Result<Vec<AdminPostRow>, sqlx::Error> {
        let pattern = search_pattern(search.query.as_deref());
        let since = search.since.map(|f| f.since(chrono::Utc::now()));
        sqlx::query_as::<_, AdminPostRow>(
            "SELECT p.id, p.text, p.created_at AS pub_date,
                    u.username AS author, g.title AS \"group\"
             FROM posts p
             JOIN users u ON u.id = p.author_id
             LEFT JOIN groups g ON g.id = p.group_id
             WHERE ($1::TEXT IS NULL OR p.text ILIKE $1)
               AND ($2::TIMESTAMPTZ IS NULL OR p.created_at >= $2)
             ORDER BY p.created_at DESC, p.id DESC
             LIMIT $3 OFFSET $4",
        )
        .bind(pattern)
        .bind(since)
        .bind(search.limit)
        .bind(search.offset)
        .fetch_all(pool)
        .await
    }
}
