//! Shared query parameter types for handlers.

use quill_core::admin::DateFilter;
use serde::Deserialize;

/// `?page=` on paginated pages. Kept as a string: bad values fall back to page 1.
#[derive(Debug, Default, Deserialize)]
pub struct PageParams {
    pub page: Option<String>,
}

/// `?next=` on the login page.
#[derive(Debug, Default, Deserialize)]
pub struct NextParams {
    pub next: Option<String>,
}

/// Admin list parameters (`?q=&limit=&offset=`).
///
/// Values are clamped in the handler via `clamp_limit` / `clamp_offset`.
#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Admin post list parameters; adds the publication-date filter.
#[derive(Debug, Default, Deserialize)]
pub struct PostSearchParams {
    pub q: Option<String>,
    pub pub_date: Option<DateFilter>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}
