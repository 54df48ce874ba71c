use axum::routing::{delete, get, put};
use axum::Router;

use crate::handlers::admin;
use crate::state::AppState;

/// Routes mounted at `/admin` (staff only).
///
/// ```text
/// GET    /posts            list_posts (?q, pub_date, limit, offset)
/// DELETE /posts/{id}       delete_post
///
/// GET    /groups           list_groups (?q, limit, offset)
/// POST   /groups           create_group
/// PUT    /groups/{id}      update_group
/// DELETE /groups/{id}      delete_group
///
/// GET    /comments         list_comments (?q, limit, offset)
/// DELETE /comments/{id}    delete_comment
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/posts", get(admin::list_posts))
        .route("/posts/{id}", delete(admin::delete_post))
        .route("/groups", get(admin::list_groups).post(admin::create_group))
        .route(
            "/groups/{id}",
            put(admin::update_group).delete(admin::delete_group),
        )
        .route("/comments", get(admin::list_comments))
        .route("/comments/{id}", delete(admin::delete_comment))
}
