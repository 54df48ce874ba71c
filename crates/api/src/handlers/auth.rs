//! Handlers for `/auth` (signup, login, logout).

use axum::extract::{Query, State};
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum_extra::extract::cookie::CookieJar;
use quill_core::forms::{
    collect_errors, FormErrors, LoginForm, SignupForm, MSG_BAD_CREDENTIALS, MSG_USERNAME_TAKEN,
};
use quill_db::models::user::CreateUser;
use quill_db::repositories::UserRepo;

use crate::auth::jwt::generate_token;
use crate::auth::password::{hash_password, validate_password_strength, verify_password};
use crate::auth::session::{expired_session_cookie, session_cookie};
use crate::error::{AppError, AppResult};
use crate::extract::FormData;
use crate::middleware::auth::LOGIN_PATH;
use crate::query::NextParams;
use crate::state::AppState;
use crate::templates::auth::{login_page, signup_page, SignupValues};

/// Redirect target after login: a local absolute path, otherwise `/`.
pub fn safe_next(next: Option<&str>) -> String {
    match next.map(str::trim) {
        Some(path)
            if path.starts_with('/')
                && !path.starts_with("//")
                && !path.starts_with("/\\")
                && !path.chars().any(char::is_control) =>
        {
            path.to_string()
        }
        _ => "/".to_string(),
    }
}

// ---------------------------------------------------------------------------
// Signup
// ---------------------------------------------------------------------------

/// GET /auth/signup/
pub async fn signup_form() -> Html<String> {
    Html(signup_page(&SignupValues::default(), &FormErrors::new()))
}

/// POST /auth/signup/
///
/// A created account is sent to the login page; errors re-render the form.
pub async fn signup(State(state): State<AppState>, data: FormData) -> AppResult<Response> {
    let form = SignupForm {
        first_name: data.value("first_name").trim().to_string(),
        last_name: data.value("last_name").trim().to_string(),
        username: data.value("username").trim().to_string(),
        email: data.value("email").trim().to_string(),
        password: data.value("password"),
    };

    let mut errors = collect_errors(&form);
    if !errors.has("password") {
        if let Err(msg) = validate_password_strength(&form.password, state.config.password_min_length)
        {
            errors.add("password", msg);
        }
    }
    if !errors.has("username")
        && UserRepo::find_by_username(&state.pool, &form.username)
            .await?
            .is_some()
    {
        errors.add("username", MSG_USERNAME_TAKEN);
    }

    if !errors.is_empty() {
        let values = SignupValues {
            first_name: &form.first_name,
            last_name: &form.last_name,
            username: &form.username,
            email: &form.email,
        };
        return Ok(Html(signup_page(&values, &errors)).into_response());
    }

    let password_hash = hash_password(&form.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let user = UserRepo::create(
        &state.pool,
        &CreateUser {
            username: form.username,
            email: form.email,
            first_name: form.first_name,
            last_name: form.last_name,
            password_hash,
            is_staff: false,
        },
    )
    .await?;

    tracing::info!(user_id = user.id, username = %user.username, "User signed up");
    Ok(Redirect::to(LOGIN_PATH).into_response())
}

// ---------------------------------------------------------------------------
// Login / logout
// ---------------------------------------------------------------------------

/// GET /auth/login/
pub async fn login_form(Query(params): Query<NextParams>) -> Html<String> {
    Html(login_page("", params.next.as_deref(), &FormErrors::new()))
}

/// POST /auth/login/
///
/// Sets the session cookie and redirects to `next` on success.
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    data: FormData,
) -> AppResult<Response> {
    let form = LoginForm {
        username: data.value("username").trim().to_string(),
        password: data.value("password"),
    };
    let next = data.text("next");

    let mut errors = collect_errors(&form);
    if !errors.is_empty() {
        return Ok(Html(login_page(&form.username, next, &errors)).into_response());
    }

    let user = UserRepo::find_by_username(&state.pool, &form.username).await?;
    let authenticated = match &user {
        Some(user) if user.is_active => verify_password(&form.password, &user.password_hash)
            .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?,
        _ => false,
    };

    let Some(user) = user.filter(|_| authenticated) else {
        tracing::debug!(username = %form.username, "Failed login");
        errors.add(FormErrors::NON_FIELD, MSG_BAD_CREDENTIALS);
        return Ok(Html(login_page(&form.username, next, &errors)).into_response());
    };

    UserRepo::record_login(&state.pool, user.id).await?;

    let token = generate_token(user.id, &user.username, user.is_staff, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;
    let jar = jar.add(session_cookie(token, state.config.session_cookie_secure));

    tracing::info!(user_id = user.id, "User logged in");
    Ok((jar, Redirect::to(&safe_next(next))).into_response())
}

/// GET|POST /auth/logout/
pub async fn logout(jar: CookieJar) -> (CookieJar, Redirect) {
    (jar.remove(expired_session_cookie()), Redirect::to("/"))
}
