//! Session extractors for Axum handlers.
//!
//! The session token is read from an `Authorization: Bearer` header when
//! present, otherwise from the session cookie.

use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::HeaderMap;
use axum::response::{IntoResponse, Redirect, Response};
use axum_extra::extract::cookie::CookieJar;
use quill_core::types::DbId;
use quill_db::repositories::UserRepo;

use crate::auth::jwt::validate_token;
use crate::auth::session::SESSION_COOKIE;
use crate::error::AppError;
use crate::state::AppState;

pub const LOGIN_PATH: &str = "/auth/login/";

/// Authenticated user taken from a valid session token.
///
/// Use this as an extractor parameter in any page handler that requires a
/// signed-in user. Anonymous requests are answered with a redirect to the
/// login page that returns to the original address afterwards.
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// The user's internal database id (from `claims.sub`).
    pub user_id: DbId,
    pub username: String,
    pub is_staff: bool,
}

/// Token from `Authorization: Bearer <token>` or the session cookie.
fn session_token(headers: &HeaderMap) -> Option<String> {
    let bearer = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::to_string);

    bearer.or_else(|| {
        CookieJar::from_headers(headers)
            .get(SESSION_COOKIE)
            .map(|c| c.value().to_string())
    })
}

/// The active account behind the request's session token.
///
/// The token must validate and name an account that still exists and is
/// active; the staff flag is taken from the account row. A failed account
/// lookup is an error, not an anonymous request.
pub(crate) async fn authenticate(
    parts: &Parts,
    state: &AppState,
) -> Result<Option<AuthUser>, AppError> {
    let Some(token) = session_token(&parts.headers) else {
        return Ok(None);
    };
    let claims = match validate_token(&token, &state.config.jwt) {
        Ok(claims) => claims,
        Err(e) => {
            tracing::debug!(error = %e, "Ignoring invalid session token");
            return Ok(None);
        }
    };

    match UserRepo::find_by_id(&state.pool, claims.sub).await? {
        Some(user) if user.is_active => Ok(Some(AuthUser {
            user_id: user.id,
            username: user.username,
            is_staff: user.is_staff,
        })),
        _ => {
            tracing::debug!(user_id = claims.sub, "Session for missing or inactive account");
            Ok(None)
        }
    }
}

/// Login page address returning to `next` afterwards.
pub fn login_url(next: &str) -> String {
    // Slashes stay readable, as in `/auth/login/?next=/new/`.
    let next = urlencoding::encode(next).replace("%2F", "/");
    format!("{LOGIN_PATH}?next={next}")
}

/// Rejection for [`AuthUser`].
#[derive(Debug)]
pub enum AuthRejection {
    /// Anonymous request: `303 See Other` to the login page, returning to `next`.
    Login { next: String },
    /// The session could not be checked.
    Error(AppError),
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        match self {
            AuthRejection::Login { next } => Redirect::to(&login_url(&next)).into_response(),
            AuthRejection::Error(err) => err.into_response(),
        }
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AuthRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        match authenticate(parts, state).await {
            Ok(Some(user)) => Ok(user),
            Ok(None) => Err(AuthRejection::Login {
                next: parts
                    .uri
                    .path_and_query()
                    .map(|pq| pq.as_str().to_string())
                    .unwrap_or_else(|| parts.uri.path().to_string()),
            }),
            Err(err) => Err(AuthRejection::Error(err)),
        }
    }
}

/// The signed-in user, or `None` for anonymous requests.
///
/// Public pages stay readable when the session cannot be checked; the viewer
/// is then treated as anonymous.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub Option<AuthUser>);

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        match authenticate(parts, state).await {
            Ok(user) => Ok(CurrentUser(user)),
            Err(err) => {
                tracing::warn!(error = %err, "Session lookup failed; treating viewer as anonymous");
                Ok(CurrentUser(None))
            }
        }
    }
}
