//! Page handlers for posts: listings, the single-post page, create / edit and
//! comments.

use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::http::Uri;
use axum::response::{Html, IntoResponse, Redirect, Response};
use quill_core::error::CoreError;
use quill_core::forms::{
    checkbox, collect_errors, parse_choice, CommentForm, FormErrors, PostForm, MSG_INVALID_CHOICE,
    MSG_UPLOAD_AND_CLEAR,
};
use quill_core::media::{validate_image, ImageKind};
use quill_db::models::comment::CreateComment;
use quill_db::models::post::{CreatePost, PostFilter, UpdatePost};
use quill_db::repositories::{CommentRepo, FollowRepo, GroupRepo, PostRepo, UserRepo};
use quill_db::DbPool;

use super::{find_author, load_posts_page, parse_post_id};
use crate::cache::{PageCache, INDEX_PAGE_PREFIX};
use crate::error::AppResult;
use crate::extract::FormData;
use crate::middleware::auth::{AuthUser, CurrentUser};
use crate::query::PageParams;
use crate::state::AppState;
use crate::templates::post_url;
use crate::templates::posts::{
    comment_form_page, group_page, index_page, post_form_page, post_page, profile_page,
    PostFormValues,
};

// ---------------------------------------------------------------------------
// Listings
// ---------------------------------------------------------------------------

/// GET /
///
/// Served from the page cache while a rendered copy is fresh.
pub async fn index(
    State(state): State<AppState>,
    CurrentUser(viewer): CurrentUser,
    uri: Uri,
    Query(params): Query<PageParams>,
) -> AppResult<Html<String>> {
    let path_and_query = uri.path_and_query().map(|pq| pq.as_str()).unwrap_or("/");
    let key = PageCache::key(
        INDEX_PAGE_PREFIX,
        viewer.as_ref().map(|u| u.user_id),
        path_and_query,
    );

    if let Some(html) = state.page_cache.get(&key).await {
        return Ok(Html(html));
    }

    let (page, posts) =
        load_posts_page(&state.pool, PostFilter::All, params.page.as_deref()).await?;
    let html = index_page(viewer.as_ref(), &page, &posts);
    state.page_cache.insert(key, html.clone()).await;
    Ok(Html(html))
}

/// GET /group/{slug}/
pub async fn group_posts(
    State(state): State<AppState>,
    CurrentUser(viewer): CurrentUser,
    Path(slug): Path<String>,
    Query(params): Query<PageParams>,
) -> AppResult<Html<String>> {
    let group = GroupRepo::find_by_slug(&state.pool, &slug)
        .await?
        .ok_or_else(|| CoreError::not_found("Group", &slug))?;

    let (page, posts) =
        load_posts_page(&state.pool, PostFilter::Group(group.id), params.page.as_deref()).await?;
    Ok(Html(group_page(viewer.as_ref(), &group, &page, &posts)))
}

/// GET /{username}/
pub async fn profile(
    State(state): State<AppState>,
    CurrentUser(viewer): CurrentUser,
    Path(username): Path<String>,
    Query(params): Query<PageParams>,
) -> AppResult<Html<String>> {
    let author = find_author(&state.pool, &username).await?;
    let stats = UserRepo::stats(&state.pool, author.id).await?;

    let following = match &viewer {
        Some(user) if user.user_id != author.id => Some(
            FollowRepo::exists(&state.pool, user.user_id, author.id).await?,
        ),
        _ => None,
    };

    let (page, posts) =
        load_posts_page(&state.pool, PostFilter::Author(author.id), params.page.as_deref())
            .await?;
    Ok(Html(profile_page(
        viewer.as_ref(),
        &author,
        &stats,
        following,
        &page,
        &posts,
    )))
}

/// GET /{username}/{post_id}/
pub async fn post_view(
    State(state): State<AppState>,
    CurrentUser(viewer): CurrentUser,
    Path((username, post_id)): Path<(String, String)>,
) -> AppResult<Html<String>> {
    let author = find_author(&state.pool, &username).await?;
    let id = parse_post_id(&post_id)?;
    let post = PostRepo::find_view(&state.pool, author.id, id)
        .await?
        .ok_or_else(|| CoreError::not_found("Post", id))?;

    let stats = UserRepo::stats(&state.pool, author.id).await?;
    let comments = CommentRepo::list_for_post(&state.pool, post.id).await?;

    Ok(Html(post_page(
        viewer.as_ref(),
        &author,
        &stats,
        &post,
        &comments,
    )))
}

// ---------------------------------------------------------------------------
// Post form
// ---------------------------------------------------------------------------

/// A decoded image upload ready to be stored.
struct ImageUpload {
    bytes: Bytes,
    kind: ImageKind,
}

/// Result of reading the post form; `errors` is empty when it may be saved.
struct SubmittedPost {
    form: PostForm,
    image: Option<ImageUpload>,
    clear_image: bool,
    errors: FormErrors,
}

/// Validate the submitted post fields, the group choice and any upload.
async fn read_post_form(pool: &DbPool, data: &FormData) -> AppResult<SubmittedPost> {
    let (group, group_valid) = match parse_choice(data.text("group")) {
        Ok(None) => (None, true),
        Ok(Some(id)) => {
            if GroupRepo::exists(pool, id).await? {
                (Some(id), true)
            } else {
                (None, false)
            }
        }
        Err(()) => (None, false),
    };

    let form = PostForm {
        text: data.value("text").trim().to_string(),
        group,
    };
    let mut errors = collect_errors(&form);
    if !group_valid {
        errors.add("group", MSG_INVALID_CHOICE);
    }

    let image = match data.file("image") {
        Some(upload) => match validate_image(&upload.bytes) {
            Ok(kind) => Some(ImageUpload {
                bytes: upload.bytes.clone(),
                kind,
            }),
            Err(CoreError::Validation(msg)) => {
                tracing::debug!(file_name = %upload.file_name, "Rejected post image");
                errors.add("image", msg);
                None
            }
            Err(e) => return Err(e.into()),
        },
        None => None,
    };

    let clear_image = checkbox(data.text("image-clear"));
    if clear_image && data.file("image").is_some() {
        errors.add("image", MSG_UPLOAD_AND_CLEAR);
    }

    Ok(SubmittedPost {
        form,
        image,
        clear_image,
        errors,
    })
}

async fn store_image(state: &AppState, image: Option<ImageUpload>) -> AppResult<Option<String>> {
    match image {
        Some(img) => Ok(Some(state.media.save_post_image(&img.bytes, img.kind).await?)),
        None => Ok(None),
    }
}

/// Remove a just-stored image whose post was not saved.
async fn discard_image(state: &AppState, image: Option<&str>) {
    if let Some(path) = image {
        state.media.remove_post_image(path).await;
    }
}

/// GET /new/
pub async fn new_post_form(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Html<String>> {
    let groups = GroupRepo::list_choices(&state.pool).await?;
    Ok(Html(post_form_page(
        Some(&user),
        &PostFormValues::default(),
        &FormErrors::new(),
        &groups,
        None,
    )))
}

/// POST /new/
///
/// Invalid input re-renders the form with field errors; a saved post
/// redirects to the index.
pub async fn new_post(
    State(state): State<AppState>,
    user: AuthUser,
    data: FormData,
) -> AppResult<Response> {
    let submitted = read_post_form(&state.pool, &data).await?;

    if !submitted.errors.is_empty() {
        let groups = GroupRepo::list_choices(&state.pool).await?;
        let values = PostFormValues {
            text: &submitted.form.text,
            group: submitted.form.group,
            image: None,
        };
        let html = post_form_page(Some(&user), &values, &submitted.errors, &groups, None);
        return Ok(Html(html).into_response());
    }

    let image = store_image(&state, submitted.image).await?;
    let created = PostRepo::create(
        &state.pool,
        &CreatePost {
            author_id: user.user_id,
            text: submitted.form.text,
            group_id: submitted.form.group,
            image: image.clone(),
        },
    )
    .await;
    let post = match created {
        Ok(post) => post,
        Err(e) => {
            discard_image(&state, image.as_deref()).await;
            return Err(e.into());
        }
    };

    tracing::info!(post_id = post.id, author_id = user.user_id, "Post created");
    Ok(Redirect::to("/").into_response())
}

/// GET /{username}/{post_id}/edit/
///
/// Anyone other than the author is sent back to the post.
pub async fn post_edit_form(
    State(state): State<AppState>,
    CurrentUser(viewer): CurrentUser,
    Path((username, post_id)): Path<(String, String)>,
) -> AppResult<Response> {
    let id = parse_post_id(&post_id)?;
    let post = PostRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| CoreError::not_found("Post", id))?;

    let Some(user) = viewer.filter(|v| v.user_id == post.author_id) else {
        return Ok(Redirect::to(&post_url(&username, id)).into_response());
    };

    let groups = GroupRepo::list_choices(&state.pool).await?;
    let values = PostFormValues {
        text: &post.text,
        group: post.group_id,
        image: post.image.as_deref(),
    };
    let html = post_form_page(
        Some(&user),
        &values,
        &FormErrors::new(),
        &groups,
        Some((username.as_str(), id)),
    );
    Ok(Html(html).into_response())
}

/// POST /{username}/{post_id}/edit/
///
/// Updates the post in place. The current image is kept unless a new one is
/// uploaded or `image-clear` is ticked.
pub async fn post_edit(
    State(state): State<AppState>,
    CurrentUser(viewer): CurrentUser,
    Path((username, post_id)): Path<(String, String)>,
    data: FormData,
) -> AppResult<Response> {
    let id = parse_post_id(&post_id)?;
    let post = PostRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| CoreError::not_found("Post", id))?;

    let Some(user) = viewer.filter(|v| v.user_id == post.author_id) else {
        tracing::debug!(post_id = id, "Edit by non-author ignored");
        return Ok(Redirect::to(&post_url(&username, id)).into_response());
    };

    let submitted = read_post_form(&state.pool, &data).await?;

    if !submitted.errors.is_empty() {
        let groups = GroupRepo::list_choices(&state.pool).await?;
        let values = PostFormValues {
            text: &submitted.form.text,
            group: submitted.form.group,
            image: post.image.as_deref(),
        };
        let html = post_form_page(
            Some(&user),
            &values,
            &submitted.errors,
            &groups,
            Some((username.as_str(), id)),
        );
        return Ok(Html(html).into_response());
    }

    let uploaded = store_image(&state, submitted.image).await?;
    let image = match &uploaded {
        Some(path) => Some(path.clone()),
        None if submitted.clear_image => None,
        None => post.image,
    };

    let updated = PostRepo::update(
        &state.pool,
        id,
        &UpdatePost {
            text: submitted.form.text,
            group_id: submitted.form.group,
            image,
        },
    )
    .await;
    match updated {
        Ok(Some(_)) => {}
        Ok(None) => {
            discard_image(&state, uploaded.as_deref()).await;
            return Err(CoreError::not_found("Post", id).into());
        }
        Err(e) => {
            discard_image(&state, uploaded.as_deref()).await;
            return Err(e.into());
        }
    }

    tracing::info!(post_id = id, author_id = user.user_id, "Post updated");
    Ok(Redirect::to(&post_url(&username, id)).into_response())
}

// ---------------------------------------------------------------------------
// Comments
// ---------------------------------------------------------------------------

/// GET /{username}/{post_id}/comment/
pub async fn add_comment_form(
    State(state): State<AppState>,
    user: AuthUser,
    Path((username, post_id)): Path<(String, String)>,
) -> AppResult<Html<String>> {
    let author = find_author(&state.pool, &username).await?;
    let id = parse_post_id(&post_id)?;
    let post = PostRepo::find_view(&state.pool, author.id, id)
        .await?
        .ok_or_else(|| CoreError::not_found("Post", id))?;

    Ok(Html(comment_form_page(
        Some(&user),
        &post,
        "",
        &FormErrors::new(),
    )))
}

/// POST /{username}/{post_id}/comment/
pub async fn add_comment(
    State(state): State<AppState>,
    user: AuthUser,
    Path((username, post_id)): Path<(String, String)>,
    data: FormData,
) -> AppResult<Response> {
    let author = find_author(&state.pool, &username).await?;
    let id = parse_post_id(&post_id)?;
    let post = PostRepo::find_view(&state.pool, author.id, id)
        .await?
        .ok_or_else(|| CoreError::not_found("Post", id))?;

    let form = CommentForm {
        text: data.value("text").trim().to_string(),
    };
    let errors = collect_errors(&form);
    if !errors.is_empty() {
        let html = comment_form_page(Some(&user), &post, &form.text, &errors);
        return Ok(Html(html).into_response());
    }

    let comment = CommentRepo::create(
        &state.pool,
        &CreateComment {
            post_id: post.id,
            author_id: user.user_id,
            text: form.text,
        },
    )
    .await?;

    tracing::info!(comment_id = comment.id, post_id = post.id, "Comment added");
    Ok(Redirect::to(&post_url(&username, id)).into_response())
}
