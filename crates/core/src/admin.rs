//! Listing helpers for the staff administration API: search patterns,
//! publication-date filters and limit/offset clamping.

use chrono::{Datelike, Duration, TimeZone, Utc};
use serde::Deserialize;

use crate::types::Timestamp;

/// Shown in admin listings where an optional value (e.g. a post's group) is unset.
pub const EMPTY_VALUE_DISPLAY: &str = "-пусто-";

pub const DEFAULT_LIST_LIMIT: i64 = 100;
pub const MAX_LIST_LIMIT: i64 = 500;

/// Publication-date filter offered on the admin post list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateFilter {
    Today,
    Past7Days,
    ThisMonth,
    ThisYear,
}

impl DateFilter {
    /// Inclusive lower bound for the filter, evaluated at `now` (UTC).
    pub fn since(&self, now: Timestamp) -> Timestamp {
        let midnight = |y: i32, m: u32, d: u32| {
            Utc.with_ymd_and_hms(y, m, d, 0, 0, 0)
                .single()
                .unwrap_or(now)
        };
        match self {
            Self::Today => midnight(now.year(), now.month(), now.day()),
            Self::Past7Days => midnight(now.year(), now.month(), now.day()) - Duration::days(7),
            Self::ThisMonth => midnight(now.year(), now.month(), 1),
            Self::ThisYear => midnight(now.year(), 1, 1),
        }
    }
}

/// Build an `ILIKE` pattern matching `term` anywhere, with wildcards escaped.
///
/// Returns `None` for an empty or whitespace-only term (no filtering).
pub fn search_pattern(term: Option<&str>) -> Option<String> {
    let term = term.map(str::trim).filter(|t| !t.is_empty())?;
    let escaped = term
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    Some(format!("%{escaped}%"))
}

/// Clamp a user-provided limit to `[1, max]`, using `default` when absent.
pub fn clamp_limit(limit: Option<i64>, default: i64, max: i64) -> i64 {
    limit.unwrap_or(default).max(1).min(max)
}

/// Clamp a user-provided offset to non-negative.
pub fn clamp_offset(offset: Option<i64>) -> i64 {
    offset.unwrap_or(0).max(0)
}
