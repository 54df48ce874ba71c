//! Page-number pagination for list views.
//!
//! Lists are sliced into fixed-size pages addressed by a 1-based `?page=`
//! query value. Lookup is forgiving: a missing or malformed value shows the
//! first page and an out-of-range number shows the last one, so a stale
//! link never produces an error page.

use serde::Serialize;

/// Number of posts shown on every paginated list.
pub const PAGE_SIZE: i64 = 10;

/// Slices a collection of `count` items into pages of `per_page` items.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paginator {
    count: i64,
    per_page: i64,
}

/// One resolved page of a [`Paginator`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Page {
    /// 1-based page number.
    pub number: i64,
    pub num_pages: i64,
    /// Total number of items across all pages.
    pub count: i64,
    /// SQL `OFFSET` for this page.
    pub offset: i64,
    /// SQL `LIMIT` for this page.
    pub limit: i64,
}

impl Paginator {
    /// Build a paginator. `per_page` values below 1 are treated as 1.
    pub fn new(count: i64, per_page: i64) -> Self {
        Self {
            count: count.max(0),
            per_page: per_page.max(1),
        }
    }

    /// Number of pages; an empty collection still has one (empty) page.
    pub fn num_pages(&self) -> i64 {
        if self.count == 0 {
            1
        } else {
            (self.count + self.per_page - 1) / self.per_page
        }
    }

    /// Resolve a raw `page` query value to a concrete page.
    pub fn get_page(&self, raw: Option<&str>) -> Page {
        let num_pages = self.num_pages();
        let number = match raw.map(str::trim).and_then(|r| r.parse::<i64>().ok()) {
            None => 1,
            Some(n) if (1..=num_pages).contains(&n) => n,
            Some(_) => num_pages,
        };
        self.page(number)
    }

    fn page(&self, number: i64) -> Page {
        Page {
            number,
            num_pages: self.num_pages(),
            count: self.count,
            offset: (number - 1) * self.per_page,
            limit: self.per_page,
        }
    }
}

impl Page {
    pub fn has_previous(&self) -> bool {
        self.number > 1
    }

    pub fn has_next(&self) -> bool {
        self.number < self.num_pages
    }

    pub fn has_other_pages(&self) -> bool {
        self.has_previous() || self.has_next()
    }

    pub fn previous_page_number(&self) -> Option<i64> {
        self.has_previous().then(|| self.number - 1)
    }

    pub fn next_page_number(&self) -> Option<i64> {
        self.has_next().then(|| self.number + 1)
    }

    /// 1-based index of the first item on this page, 0 for an empty page.
    pub fn start_index(&self) -> i64 {
        if self.count == 0 {
            0
        } else {
            self.offset + 1
        }
    }

    /// 1-based index of the last item on this page, 0 for an empty page.
    pub fn end_index(&self) -> i64 {
        (self.offset + self.limit).min(self.count)
    }
}
