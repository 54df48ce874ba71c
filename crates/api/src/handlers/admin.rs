//! Staff administration API for posts, groups and comments.
//!
//! All handlers require [`RequireStaff`] and answer in the `{ "data": ... }`
//! envelope.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{DateTime, Utc};
use quill_core::admin::{
    clamp_limit, clamp_offset, DEFAULT_LIST_LIMIT, EMPTY_VALUE_DISPLAY, MAX_LIST_LIMIT,
};
use quill_core::error::CoreError;
use quill_core::forms::{collect_errors, GroupForm};
use quill_core::slug::slugify;
use quill_core::types::DbId;
use quill_db::models::comment::{AdminCommentRow, CommentSearch};
use quill_db::models::group::{CreateGroup, Group, UpdateGroup};
use quill_db::models::post::{AdminPostRow, PostSearch};
use quill_db::repositories::{CommentRepo, GroupRepo, PostRepo};
use serde::{Deserialize, Serialize};

use crate::error::ApiResult;
use crate::middleware::rbac::RequireStaff;
use crate::query::{PostSearchParams, SearchParams};
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Row of the admin post list (`pk, text, pub_date, author, group`).
#[derive(Debug, Serialize)]
pub struct AdminPostItem {
    pub pk: DbId,
    pub text: String,
    pub pub_date: DateTime<Utc>,
    pub author: String,
    /// Group title, or `-пусто-` when the post has none.
    pub group: String,
}

impl From<AdminPostRow> for AdminPostItem {
    fn from(row: AdminPostRow) -> Self {
        Self {
            pk: row.id,
            text: row.text,
            pub_date: row.pub_date,
            author: row.author,
            group: row
                .group
                .unwrap_or_else(|| EMPTY_VALUE_DISPLAY.to_string()),
        }
    }
}

/// Request body for `POST /admin/groups`. The slug defaults to one derived
/// from the title.
#[derive(Debug, Deserialize)]
pub struct CreateGroupRequest {
    pub title: String,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub description: String,
}

fn validate_group(form: &GroupForm) -> Result<(), CoreError> {
    let errors = collect_errors(form);
    if errors.is_empty() {
        Ok(())
    } else {
        Err(CoreError::Validation(errors.summary()))
    }
}

fn not_found(entity: &'static str, id: DbId) -> CoreError {
    CoreError::not_found(entity, id)
}

// ---------------------------------------------------------------------------
// Posts
// ---------------------------------------------------------------------------

/// GET /admin/posts?q=&pub_date=&limit=&offset=
pub async fn list_posts(
    RequireStaff(_admin): RequireStaff,
    State(state): State<AppState>,
    Query(params): Query<PostSearchParams>,
) -> ApiResult<Json<DataResponse<Vec<AdminPostItem>>>> {
    let search = PostSearch {
        query: params.q,
        since: params.pub_date,
        limit: clamp_limit(params.limit, DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT),
        offset: clamp_offset(params.offset),
    };
    let rows = PostRepo::admin_search(&state.pool, &search).await?;
    let data = rows.into_iter().map(AdminPostItem::from).collect();
    Ok(Json(DataResponse { data }))
}

/// DELETE /admin/posts/{id}
pub async fn delete_post(
    RequireStaff(admin): RequireStaff,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> ApiResult<StatusCode> {
    if !PostRepo::delete(&state.pool, id).await? {
        return Err(not_found("Post", id).into());
    }
    tracing::info!(post_id = id, admin_id = admin.user_id, "Post deleted by staff");
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Groups
// ---------------------------------------------------------------------------

/// GET /admin/groups?q=&limit=&offset=
pub async fn list_groups(
    RequireStaff(_admin): RequireStaff,
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> ApiResult<Json<DataResponse<Vec<Group>>>> {
    let groups = GroupRepo::search(
        &state.pool,
        params.q.as_deref(),
        clamp_limit(params.limit, DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT),
        clamp_offset(params.offset),
    )
    .await?;
    Ok(Json(DataResponse { data: groups }))
}

/// POST /admin/groups
///
/// Duplicate slugs are rejected with 409 by the `uq_groups_slug` constraint.
pub async fn create_group(
    RequireStaff(admin): RequireStaff,
    State(state): State<AppState>,
    Json(input): Json<CreateGroupRequest>,
) -> ApiResult<(StatusCode, Json<DataResponse<Group>>)> {
    let title = input.title.trim().to_string();
    let slug = match input.slug.as_deref().map(str::trim) {
        Some(slug) if !slug.is_empty() => slug.to_string(),
        _ => slugify(&title),
    };
    let form = GroupForm {
        title,
        slug,
        description: input.description,
    };
    validate_group(&form)?;

    let group = GroupRepo::create(
        &state.pool,
        &CreateGroup {
            title: form.title,
            slug: form.slug,
            description: form.description,
        },
    )
    .await?;

    tracing::info!(group_id = group.id, slug = %group.slug, admin_id = admin.user_id, "Group created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: group })))
}

/// PUT /admin/groups/{id}
///
/// Fields left out of the body keep their current values.
pub async fn update_group(
    RequireStaff(_admin): RequireStaff,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateGroup>,
) -> ApiResult<Json<DataResponse<Group>>> {
    let existing = GroupRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found("Group", id))?;

    let merged = GroupForm {
        title: input.title.clone().unwrap_or(existing.title),
        slug: input.slug.clone().unwrap_or(existing.slug),
        description: input.description.clone().unwrap_or(existing.description),
    };
    validate_group(&merged)?;

    let group = GroupRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| not_found("Group", id))?;
    Ok(Json(DataResponse { data: group }))
}

/// DELETE /admin/groups/{id}
///
/// Posts in the group remain, with their group cleared.
pub async fn delete_group(
    RequireStaff(admin): RequireStaff,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> ApiResult<StatusCode> {
    if !GroupRepo::delete(&state.pool, id).await? {
        return Err(not_found("Group", id).into());
    }
    tracing::info!(group_id = id, admin_id = admin.user_id, "Group deleted");
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Comments
// ---------------------------------------------------------------------------

/// GET /admin/comments?q=&limit=&offset=
///
/// The search term matches comment text or the author's username.
pub async fn list_comments(
    RequireStaff(_admin): RequireStaff,
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> ApiResult<Json<DataResponse<Vec<AdminCommentRow>>>> {
    let search = CommentSearch {
        query: params.q,
        limit: clamp_limit(params.limit, DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT),
        offset: clamp_offset(params.offset),
    };
    let rows = CommentRepo::admin_search(&state.pool, &search).await?;
    Ok(Json(DataResponse { data: rows }))
}

/// DELETE /admin/comments/{id}
pub async fn delete_comment(
    RequireStaff(admin): RequireStaff,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> ApiResult<StatusCode> {
    if !CommentRepo::delete(&state.pool, id).await? {
        return Err(not_found("Comment", id).into());
    }
    tracing::info!(comment_id = id, admin_id = admin.user_id, "Comment deleted by staff");
    Ok(StatusCode::NO_CONTENT)
}
