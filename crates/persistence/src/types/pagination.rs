//! Page-number pagination for list results.

use serde::{Deserialize, Serialize};

/// A request for one page of results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    /// 1-based page number.
    pub page: u32,
    /// Number of results per page.
    pub page_size: u32,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: 20,
        }
    }
}

impl Pagination {
    /// Creates a page request.
    pub fn new(page: u32, page_size: u32) -> Self {
        Self { page, page_size }
    }

    /// Returns the number of rows to skip.
    pub fn offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.page_size)
    }

    /// Returns the row limit.
    pub fn limit(&self) -> u64 {
        u64::from(self.page_size)
    }
}

/// One page of results and the total number of matches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    /// Items on this page.
    pub items: Vec<T>,
    /// Total number of matching items across all pages.
    pub total: u64,
    /// The page request that produced this page.
    pub pagination: Pagination,
}

impl<T> Page<T> {
    /// Creates a page.
    pub fn new(items: Vec<T>, total: u64, pagination: Pagination) -> Self {
        Self {
            items,
            total,
            pagination,
        }
    }

    /// Returns true if a later page exists.
    pub fn has_next(&self) -> bool {
        self.pagination.offset() + (self.items.len() as u64) < self.total
    }

    /// Returns true if an earlier page exists.
    pub fn has_previous(&self) -> bool {
        self.pagination.page > 1
    }

    /// Maps the items, keeping the counts.
    pub fn map<U, F>(self, f: F) -> Page<U>
    where
        F: FnMut(T) -> U,
    {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            pagination: self.pagination,
        }
    }

    /// Replaces the items, keeping the counts.
    pub fn with_items<U>(self, items: Vec<U>) -> Page<U> {
        Page {
            items,
            total: self.total,
            pagination: self.pagination,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset_and_limit() {
        let p = Pagination::new(3, 25);
        assert_eq!(p.offset(), 50);
        assert_eq!(p.limit(), 25);
        assert_eq!(Pagination::new(0, 10).offset(), 0);
    }

    #[test]
    fn test_page_links() {
        let page = Page::new(vec![1, 2], 5, Pagination::new(1, 2));
        assert!(page.has_next());
        assert!(!page.has_previous());

        let last = Page::new(vec![5], 5, Pagination::new(3, 2));
        assert!(!last.has_next());
        assert!(last.has_previous());
    }
}
