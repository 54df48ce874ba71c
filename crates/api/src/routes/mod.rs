pub mod admin;
pub mod health;

use std::path::Path;

use axum::extract::DefaultBodyLimit;
use axum::routing::get;
use axum::Router;
use quill_core::media::MAX_IMAGE_BYTES;
use tower_http::services::ServeDir;

use crate::handlers::{auth, errors, follows, posts};
use crate::media::MEDIA_URL;
use crate::state::AppState;

/// Room for the text fields next to the largest accepted image.
const UPLOAD_BODY_LIMIT: usize = MAX_IMAGE_BYTES + 1024 * 1024;

/// Build the HTML page route tree.
///
/// Route hierarchy:
///
/// ```text
/// /                                   index (cached)
/// /new/                               new post form / submit (auth)
/// /follow/                            followed authors' posts (auth)
/// /group/{slug}/                      group posts
///
/// /auth/signup/                       signup form / submit
/// /auth/login/                        login form / submit
/// /auth/logout/                       logout
///
/// /{username}/                        profile
/// /{username}/follow/                 follow author (auth)
/// /{username}/unfollow/               unfollow author (auth)
/// /{username}/{post_id}/              single post with comments
/// /{username}/{post_id}/edit/         edit post (author only)
/// /{username}/{post_id}/comment/      add comment (auth)
/// ```
pub fn page_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(posts::index))
        .route("/new/", get(posts::new_post_form).post(posts::new_post))
        .route("/follow/", get(follows::follow_index))
        .route("/group/{slug}/", get(posts::group_posts))
        .route("/auth/signup/", get(auth::signup_form).post(auth::signup))
        .route("/auth/login/", get(auth::login_form).post(auth::login))
        .route("/auth/logout/", get(auth::logout).post(auth::logout))
        .route("/{username}/", get(posts::profile))
        .route(
            "/{username}/follow/",
            get(follows::profile_follow).post(follows::profile_follow),
        )
        .route(
            "/{username}/unfollow/",
            get(follows::profile_unfollow).post(follows::profile_unfollow),
        )
        .route("/{username}/{post_id}/", get(posts::post_view))
        .route(
            "/{username}/{post_id}/edit/",
            get(posts::post_edit_form).post(posts::post_edit),
        )
        .route(
            "/{username}/{post_id}/comment/",
            get(posts::add_comment_form).post(posts::add_comment),
        )
}

/// Every route of the application: health, pages, the admin API, media files
/// and the 404 fallback.
pub fn app_routes(media_root: &Path) -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .merge(page_routes())
        .nest("/admin", admin::router())
        .nest_service(MEDIA_URL, ServeDir::new(media_root))
        .fallback(errors::page_not_found)
        .layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT))
}
