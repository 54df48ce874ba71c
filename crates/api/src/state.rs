use std::sync::Arc;

use crate::cache::PageCache;
use crate::config::ServerConfig;
use crate::media::MediaStore;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: quill_db::DbPool,
    pub config: Arc<ServerConfig>,
    /// Rendered pages kept for a short time (the index page).
    pub page_cache: PageCache,
    /// Where uploaded post images are written.
    pub media: MediaStore,
}

impl AppState {
    pub fn new(pool: quill_db::DbPool, config: ServerConfig) -> Self {
        let page_cache = PageCache::new(std::time::Duration::from_secs(config.index_cache_ttl_secs));
        let media = MediaStore::new(config.media_root.clone());
        Self {
            pool,
            config: Arc::new(config),
            page_cache,
            media,
        }
    }
}
