//! Fallback and panic handlers rendering the error pages.

use std::any::Any;

use axum::http::{StatusCode, Uri};
use axum::response::{Html, IntoResponse, Response};

use crate::templates::errors::{not_found_page, server_error_page};

/// Router fallback: 404 page naming the requested path.
pub async fn page_not_found(uri: Uri) -> (StatusCode, Html<String>) {
    tracing::debug!(path = %uri.path(), "No route");
    (StatusCode::NOT_FOUND, Html(not_found_page(Some(uri.path()))))
}

/// Response for `CatchPanicLayer`: logs the panic and renders the 500 page.
pub fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        (*s).to_string()
    } else {
        "unknown panic".to_string()
    };
    tracing::error!(panic = %detail, "Handler panicked");

    (StatusCode::INTERNAL_SERVER_ERROR, Html(server_error_page())).into_response()
}
