//! Page/skip/limit bookkeeping.
//!
//! `skip` is always derived from `current_page`; it is never stored.

use serde::Serialize;

use crate::error::{FolioError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Pagination {
    current_page: u32,
    limit: u32,
    total: u64,
    /// Whether `total` has been reported by the server yet
    #[serde(skip)]
    total_known: bool,
}

impl Pagination {
    pub fn new(limit: u32) -> Result<Self> {
        if limit == 0 {
            return Err(FolioError::validation("page size", "must be at least 1"));
        }
        Ok(Self {
            current_page: 1,
            limit,
            total: 0,
            total_known: false,
        })
    }

    pub fn current_page(&self) -> u32 {
        self.current_page
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn is_total_known(&self) -> bool {
        self.total_known
    }

    /// `ceil(total / limit)`
    pub fn total_pages(&self) -> u64 {
        self.total.div_ceil(u64::from(self.limit))
    }

    /// Highest page that may be requested, never less than 1.
    pub fn max_page(&self) -> u32 {
        u32::try_from(self.total_pages().max(1)).unwrap_or(u32::MAX)
    }

    /// Offset of the first record on the current page.
    pub fn skip(&self) -> u64 {
        u64::from(self.current_page - 1) * u64::from(self.limit)
    }

    pub fn has_prev(&self) -> bool {
        self.current_page > 1
    }

    pub fn has_next(&self) -> bool {
        !self.total_known || u64::from(self.current_page) < self.total_pages()
    }

    /// Clamp `page` into `[1, max_page]`. The upper bound only applies once
    /// the server has reported a total.
    pub fn clamp_page(&self, page: u32) -> u32 {
        let page = page.max(1);
        if self.total_known {
            page.min(self.max_page())
        } else {
            page
        }
    }

    /// Move to `page` (clamped) and return the page actually selected.
    pub(crate) fn set_page(&mut self, page: u32) -> u32 {
        self.current_page = self.clamp_page(page);
        self.current_page
    }

    /// Record a server total. Returns `Some(last_page)` when the current page
    /// now lies past the end of the collection.
    pub(crate) fn set_total(&mut self, total: u64) -> Option<u32> {
        self.total = total;
        self.total_known = true;
        let max_page = self.max_page();
        (self.current_page > max_page).then_some(max_page)
    }
}
