//! Short-lived cache of rendered HTML pages.
//!
//! Entries expire a fixed time after insertion, so a cached page can lag
//! behind the database by at most the configured TTL.

use std::time::Duration;

use moka::future::Cache;
use quill_core::types::DbId;

/// Key prefix for the cached index page.
pub const INDEX_PAGE_PREFIX: &str = "index_page";

const MAX_ENTRIES: u64 = 10_000;

#[derive(Clone)]
pub struct PageCache {
    inner: Cache<String, String>,
}

impl PageCache {
    pub fn new(ttl: Duration) -> Self {
        let inner = Cache::builder()
            .max_capacity(MAX_ENTRIES)
            .time_to_live(ttl)
            .build();
        Self { inner }
    }

    /// Cache key for a page as seen by `viewer` (`anon` when logged out).
    pub fn key(prefix: &str, viewer: Option<DbId>, path_and_query: &str) -> String {
        match viewer {
            Some(id) => format!("{prefix}:{id}:{path_and_query}"),
            None => format!("{prefix}:anon:{path_and_query}"),
        }
    }

    pub async fn get(&self, key: &str) -> Option<String> {
        self.inner.get(key).await
    }

    pub async fn insert(&self, key: String, html: String) {
        self.inner.insert(key, html).await;
    }

    /// Drop every cached page.
    pub fn clear(&self) {
        self.inner.invalidate_all();
    }
}
