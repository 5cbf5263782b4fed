//! Fixed-size paging over a ranked result list

use std::ops::{Range, RangeInclusive};

use serde::Serialize;

pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Page navigation state
///
/// Pages are 1-based. `current_page` always stays within
/// `1..=max(total_pages, 1)`; navigation past either end clamps instead of
/// failing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Paginator {
    page_size: usize,
    total_items: usize,
    current_page: usize,
}

impl Paginator {
    #[cfg(test)]
    pub fn new(total_items: usize) -> Self {
        Self::with_page_size(total_items, DEFAULT_PAGE_SIZE)
    }

    /// A page size of zero is treated as one
    pub fn with_page_size(total_items: usize, page_size: usize) -> Self {
        Self {
            page_size: page_size.max(1),
            total_items,
            current_page: 1,
        }
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn total_pages(&self) -> usize {
        self.total_items.div_ceil(self.page_size)
    }

    fn last_page(&self) -> usize {
        self.total_pages().max(1)
    }

    /// Advance one page; no-op on the last page
    pub fn next(&mut self) -> usize {
        if self.current_page < self.last_page() {
            self.current_page += 1;
        }
        self.current_page
    }

    /// Go back one page; no-op on page 1
    pub fn previous(&mut self) -> usize {
        if self.current_page > 1 {
            self.current_page -= 1;
        }
        self.current_page
    }

    /// Jump to `page`, clamped into range
    pub fn go_to(&mut self, page: usize) -> usize {
        self.current_page = page.clamp(1, self.last_page());
        self.current_page
    }

    pub fn has_next(&self) -> bool {
        self.current_page < self.last_page()
    }

    pub fn has_previous(&self) -> bool {
        self.current_page > 1
    }

    /// Whether page controls should be shown at all
    pub fn show_controls(&self) -> bool {
        self.total_items >= self.page_size
    }

    /// Item indices covered by the current page
    pub fn page_range(&self) -> Range<usize> {
        let start = ((self.current_page - 1) * self.page_size).min(self.total_items);
        let end = (start + self.page_size).min(self.total_items);
        start..end
    }

    /// Page numbers to offer as direct links
    pub fn page_numbers(&self) -> RangeInclusive<usize> {
        1..=self.total_pages()
    }

    /// The current page's slice of `items`
    pub fn slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        let range = self.page_range();
        let end = range.end.min(items.len());
        &items[range.start.min(end)..end]
    }
}
