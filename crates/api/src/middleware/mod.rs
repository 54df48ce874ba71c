//! Authentication and authorization extractors.
//!
//! - [`auth::AuthUser`] -- The signed-in user; anonymous page requests are redirected to login.
//! - [`auth::CurrentUser`] -- The signed-in user, if any; never rejects.
//! - [`rbac::RequireStaff`] -- Staff-only access for the admin API.

pub mod auth;
pub mod rbac;
