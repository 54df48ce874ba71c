//! Group (community) model and DTOs.

use quill_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `groups` table.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct Group {
    pub id: DbId,
    pub title: String,
    pub slug: String,
    pub description: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Lightweight row used to fill the group `<select>` on the post form.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct GroupChoice {
    pub id: DbId,
    pub title: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateGroup {
    pub title: String,
    pub slug: String,
    pub description: String,
}

/// Partial update; `None` fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateGroup {
    pub title: Option<String>,
    pub slug: Option<String>,
    pub description: Option<String>,
}
