//! Page-number pagination over an in-memory result list
//!
//! Pages are 1-indexed. Out-of-range requests yield an empty page instead of
//! an error, so a stale page number after a filter change degrades to "no
//! results" rather than failing.
//!
//! # Usage
//!
//! ```rust
//! use resource_finder::pagination::{paginate, total_pages, page_window, PageLink};
//!
//! let items: Vec<u32> = (1..=40).collect();
//! assert_eq!(total_pages(items.len(), 18), 3);
//! assert_eq!(paginate(&items, 18, 3), &[37, 38, 39, 40]);
//! assert_eq!(
//!     page_window(1, 3),
//!     vec![PageLink::Page(1), PageLink::Page(2), PageLink::Page(3)]
//! );
//! ```

use serde::Serialize;

/// Page size used by the list and map views.
pub const DEFAULT_PAGE_SIZE: usize = 18;

// ============================================================================
// Slicing
// ============================================================================

/// Number of pages needed for `len` items; 0 for no items or a zero page size.
pub fn total_pages(len: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 0;
    }
    len.div_ceil(page_size)
}

/// The `page`-th slice of `items` (1-indexed).
///
/// Returns an empty slice when `page` is 0, past the last page, or when
/// `page_size` is 0.
pub fn paginate<T>(items: &[T], page_size: usize, page: usize) -> &[T] {
    if page == 0 || page > total_pages(items.len(), page_size) {
        return &[];
    }
    let start = (page - 1) * page_size;
    let end = (start + page_size).min(items.len());
    &items[start..end]
}

// ============================================================================
// Page controls
// ============================================================================

/// One entry in the numbered pagination control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "page", rename_all = "lowercase")]
pub enum PageLink {
    /// A clickable page number.
    Page(usize),
    /// An ellipsis standing in for skipped pages.
    Gap,
}

/// Numbered links around `current`: its neighbours, plus the first and last
/// page with ellipses where pages are skipped.
///
/// ```text
/// current 5 of 10  ->  1 … 4 5 6 … 10
/// current 1 of 10  ->  1 2 … 10
/// current 3 of 4   ->  1 2 3 4
/// ```
pub fn page_window(current: usize, total: usize) -> Vec<PageLink> {
    if total == 0 {
        return Vec::new();
    }
    let current = current.clamp(1, total);
    let start = current.saturating_sub(1).max(1);
    let end = (current + 1).min(total);

    let mut links = Vec::with_capacity(end - start + 5);
    if start > 1 {
        links.push(PageLink::Page(1));
        if start > 2 {
            links.push(PageLink::Gap);
        }
    }
    links.extend((start..=end).map(PageLink::Page));
    if end < total {
        if end < total - 1 {
            links.push(PageLink::Gap);
        }
        links.push(PageLink::Page(total));
    }
    links
}

/// Enabled state of the first/previous/next/last buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageControls {
    pub current: usize,
    pub total: usize,
    pub has_previous: bool,
    pub has_next: bool,
}

impl PageControls {
    pub fn new(current: usize, total: usize) -> Self {
        Self {
            current,
            total,
            has_previous: current > 1,
            has_next: current < total,
        }
    }

    /// Target of the "previous" button, if enabled.
    pub fn previous(&self) -> Option<usize> {
        self.has_previous.then(|| self.current - 1)
    }

    /// Target of the "next" button, if enabled.
    pub fn next(&self) -> Option<usize> {
        self.has_next.then(|| self.current + 1)
    }
}
