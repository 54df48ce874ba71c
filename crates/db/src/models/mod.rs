//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - Joined "view" rows used by the list pages
//! - Create / update DTOs consumed by the repositories

pub mod comment;
pub mod follow;
pub mod group;
pub mod post;
pub mod user;
