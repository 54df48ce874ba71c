#![allow(dead_code)]

use std::io::Cursor;
use std::path::PathBuf;
use std::time::Duration;

use axum::body::Body;
use axum::http::{HeaderName, Method, Request, Response, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use image::{DynamicImage, ImageFormat, RgbImage};
use sqlx::PgPool;
use tempfile::TempDir;
use tower::ServiceExt;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use quill_api::auth::jwt::{generate_token, JwtConfig};
use quill_api::auth::password::hash_password;
use quill_api::config::ServerConfig;
use quill_api::handlers::errors::handle_panic;
use quill_api::routes;
use quill_api::state::AppState;
use quill_db::models::user::{CreateUser, User};
use quill_db::repositories::UserRepo;

/// Password given to every user made with [`create_user`].
pub const PASSWORD: &str = "test-password-123";

const BOUNDARY: &str = "quill-test-boundary";

/// Build a test `ServerConfig` with safe defaults and the given media root.
pub fn test_config(media_root: PathBuf) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        request_timeout_secs: 30,
        media_root,
        index_cache_ttl_secs: 20,
        password_min_length: 8,
        session_cookie_secure: false,
        staff_usernames: Vec::new(),
        jwt: JwtConfig {
            secret: "test-secret-that-is-long-enough-for-hmac".to_string(),
            expiry_mins: 60,
        },
    }
}

/// State over `pool` with media written to a fresh temporary directory.
///
/// Keep the returned `TempDir` alive for as long as the state is used.
pub fn test_state(pool: PgPool) -> (AppState, TempDir) {
    let media = tempfile::tempdir().expect("tempdir");
    let state = AppState::new(pool, test_config(media.path().to_path_buf()));
    (state, media)
}

/// Build the full application router with all middleware layers.
///
/// This mirrors the router construction in `main.rs` so integration tests
/// exercise the same middleware stack that production uses.
pub fn build_test_app(state: AppState) -> Router {
    let request_id_header = HeaderName::from_static("x-request-id");
    let media_root = state.config.media_root.clone();

    routes::app_routes(&media_root)
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(30),
        ))
        .layer(PropagateRequestIdLayer::new(request_id_header.clone()))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(SetRequestIdLayer::new(request_id_header, MakeRequestUuid))
        .with_state(state)
}

/// Shorthand: state plus router over `pool`.
pub fn app(pool: PgPool) -> (Router, AppState, TempDir) {
    let (state, media) = test_state(pool);
    (build_test_app(state.clone()), state, media)
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

pub async fn create_user(pool: &PgPool, username: &str, is_staff: bool) -> User {
    UserRepo::create(
        pool,
        &CreateUser {
            username: username.to_string(),
            email: format!("{username}@test.com"),
            first_name: String::new(),
            last_name: String::new(),
            password_hash: hash_password(PASSWORD).expect("hashing should succeed"),
            is_staff,
        },
    )
    .await
    .expect("user creation should succeed")
}

/// A session token for `user`, as issued at login.
pub fn token_for(state: &AppState, user: &User) -> String {
    generate_token(user.id, &user.username, user.is_staff, &state.config.jwt)
        .expect("token generation should succeed")
}

/// A small valid PNG.
pub fn png_bytes() -> Vec<u8> {
    let mut buf = Cursor::new(Vec::new());
    DynamicImage::ImageRgb8(RgbImage::new(2, 2))
        .write_to(&mut buf, ImageFormat::Png)
        .expect("encoding should succeed");
    buf.into_inner()
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

fn request(method: Method, uri: &str, token: Option<&str>) -> axum::http::request::Builder {
    let builder = Request::builder().method(method).uri(uri);
    match token {
        Some(token) => builder.header("authorization", format!("Bearer {token}")),
        None => builder,
    }
}

pub async fn send(app: Router, request: Request<Body>) -> Response<Body> {
    app.oneshot(request).await.expect("request should complete")
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    get_as(app, uri, None).await
}

pub async fn get_as(app: Router, uri: &str, token: Option<&str>) -> Response<Body> {
    let req = request(Method::GET, uri, token)
        .body(Body::empty())
        .unwrap();
    send(app, req).await
}

/// `application/x-www-form-urlencoded` POST.
pub async fn post_form(
    app: Router,
    uri: &str,
    token: Option<&str>,
    fields: &[(&str, &str)],
) -> Response<Body> {
    let body = fields
        .iter()
        .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&");
    let req = request(Method::POST, uri, token)
        .header("content-type", "application/x-www-form-urlencoded")
        .body(Body::from(body))
        .unwrap();
    send(app, req).await
}

/// `multipart/form-data` POST with text fields and an optional
/// `(field, file name, bytes)` upload.
pub async fn post_multipart(
    app: Router,
    uri: &str,
    token: Option<&str>,
    fields: &[(&str, &str)],
    file: Option<(&str, &str, &[u8])>,
) -> Response<Body> {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    if let Some((name, file_name, bytes)) = file {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

    let req = request(Method::POST, uri, token)
        .header(
            "content-type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap();
    send(app, req).await
}

/// JSON request with any method.
pub async fn send_json(
    app: Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    json: serde_json::Value,
) -> Response<Body> {
    let req = request(method, uri, token)
        .header("content-type", "application/json")
        .body(Body::from(json.to_string()))
        .unwrap();
    send(app, req).await
}

pub async fn delete_as(app: Router, uri: &str, token: Option<&str>) -> Response<Body> {
    let req = request(Method::DELETE, uri, token)
        .body(Body::empty())
        .unwrap();
    send(app, req).await
}

// ---------------------------------------------------------------------------
// Responses
// ---------------------------------------------------------------------------

pub async fn body_text(response: Response<Body>) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).expect("body should be UTF-8")
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).expect("body should be JSON")
}

/// `Location` of a redirect response.
pub fn location(response: &Response<Body>) -> String {
    response
        .headers()
        .get("location")
        .expect("response should have a Location header")
        .to_str()
        .unwrap()
        .to_string()
}

pub async fn count(pool: &PgPool, table: &str) -> i64 {
    let (n,): (i64,) = sqlx::query_as(&format!("SELECT COUNT(*) FROM {table}"))
        .fetch_one(pool)
        .await
        .unwrap();
    n
}
