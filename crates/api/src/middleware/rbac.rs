//! Staff-only access control for the admin API.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use quill_core::error::CoreError;

use super::auth::{authenticate, AuthUser};
use crate::error::ApiError;
use crate::state::AppState;

/// Requires a staff user. Rejects with 401 when anonymous and 403 otherwise.
///
/// Rejections are JSON, matching the rest of the admin API.
pub struct RequireStaff(pub AuthUser);

impl FromRequestParts<AppState> for RequireStaff {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = authenticate(parts, state).await?.ok_or_else(|| {
            ApiError::from(CoreError::Unauthorized("Authentication required".into()))
        })?;
        if !user.is_staff {
            return Err(CoreError::Forbidden("Staff access required".into()).into());
        }
        Ok(RequireStaff(user))
    }
}
