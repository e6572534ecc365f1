//! Page windows and the descriptor returned alongside every paginated list.

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

pub const DEFAULT_PAGE: u64 = 1;
pub const DEFAULT_PAGE_SIZE: u64 = 10;

const MAX_WINDOW: u64 = i64::MAX as u64;

/// A validated page request. `page` is 1-based and `page_size` is never zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u64,
    page_size: u64,
}

impl PageRequest {
    /// Build a request from raw query values. Page 0 is treated as page 1.
    ///
    /// The resulting offset and limit must both fit a signed 64-bit SQL
    /// parameter.
    pub fn new(page: u64, page_size: u64) -> Result<Self, DomainError> {
        if page_size == 0 {
            return Err(DomainError::validation("limit must be greater than zero"));
        }
        if page_size > MAX_WINDOW {
            return Err(DomainError::validation("limit is too large"));
        }

        let page = page.max(1);
        match (page - 1).checked_mul(page_size) {
            Some(offset) if offset <= MAX_WINDOW => Ok(Self { page, page_size }),
            _ => Err(DomainError::validation("page is out of range")),
        }
    }

    pub fn from_query(page: Option<u64>, limit: Option<u64>) -> Result<Self, DomainError> {
        Self::new(
            page.unwrap_or(DEFAULT_PAGE),
            limit.unwrap_or(DEFAULT_PAGE_SIZE),
        )
    }

    pub fn page(&self) -> u64 {
        self.page
    }

    pub fn page_size(&self) -> u64 {
        self.page_size
    }

    /// Number of rows to skip before this page starts.
    pub fn offset(&self) -> u64 {
        (self.page - 1) * self.page_size
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// Pagination descriptor reconciling a page request with the matching total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub page: u64,
    pub page_size: u64,
    pub total: u64,
    pub total_pages: u64,
    pub has_next: bool,
    pub has_previous: bool,
    pub next_page: u64,
    pub previous_page: u64,
}

impl Pagination {
    pub fn calculate(total: u64, page_size: u64, page: u64) -> Self {
        let mut page = page.max(1);
        let total_pages = if page_size == 0 {
            0
        } else {
            total.div_ceil(page_size)
        };

        if total_pages > 0 && page > total_pages {
            page = total_pages;
        }

        let has_next = page < total_pages;
        let has_previous = page > 1;

        Self {
            page,
            page_size,
            total,
            total_pages,
            has_next,
            has_previous,
            next_page: if has_next { page + 1 } else { page },
            previous_page: if has_previous { page - 1 } else { 1 },
        }
    }

    pub fn for_request(request: PageRequest, total: u64) -> Self {
        Self::calculate(total, request.page_size(), request.page())
    }
}

/// One window of results plus its descriptor.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub pagination: Pagination,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, request: PageRequest, total: u64) -> Self {
        Self {
            items,
            pagination: Pagination::for_request(request, total),
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            pagination: self.pagination,
        }
    }

    pub fn try_map<U, E>(self, f: impl FnMut(T) -> Result<U, E>) -> Result<Page<U>, E> {
        Ok(Page {
            items: self.items.into_iter().map(f).collect::<Result<_, _>>()?,
            pagination: self.pagination,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn middle_page_has_both_neighbours() {
        let p = Pagination::calculate(12, 5, 2);
        assert_eq!(p.total_pages, 3);
        assert!(p.has_next);
        assert!(p.has_previous);
        assert_eq!(p.previous_page, 1);
        assert_eq!(p.next_page, 3);
    }

    #[test]
    fn empty_result_has_no_pages() {
        let p = Pagination::calculate(0, 10, 1);
        assert_eq!(p.total_pages, 0);
        assert_eq!(p.page, 1);
        assert!(!p.has_next);
        assert!(!p.has_previous);
        assert_eq!(p.next_page, 1);
        assert_eq!(p.previous_page, 1);
    }

    #[test]
    fn page_past_the_end_is_clamped() {
        let p = Pagination::calculate(21, 10, 9);
        assert_eq!(p.total_pages, 3);
        assert_eq!(p.page, 3);
        assert!(!p.has_next);
        assert_eq!(p.next_page, 3);
        assert_eq!(p.previous_page, 2);
    }

    #[test]
    fn page_zero_becomes_first_page() {
        let p = Pagination::calculate(5, 10, 0);
        assert_eq!(p.page, 1);

        let req = PageRequest::new(0, 10).unwrap();
        assert_eq!(req.page(), 1);
        assert_eq!(req.offset(), 0);
    }

    #[test]
    fn total_pages_rounds_up() {
        for (total, size, pages) in [(1, 10, 1), (10, 10, 1), (11, 10, 2), (30, 7, 5)] {
            assert_eq!(Pagination::calculate(total, size, 1).total_pages, pages);
        }
    }

    #[test]
    fn offset_skips_previous_pages() {
        let req = PageRequest::new(3, 25).unwrap();
        assert_eq!(req.offset(), 50);
    }

    #[test]
    fn zero_limit_is_invalid() {
        let err = PageRequest::new(1, 0).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Invalid);
    }

    #[test]
    fn overflowing_offset_is_invalid() {
        let err = PageRequest::from_query(Some(u64::MAX), Some(10)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Invalid);

        let err = PageRequest::new(2, i64::MAX as u64).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Invalid);

        let err = PageRequest::new(1, u64::MAX).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Invalid);

        let req = PageRequest::new(1, i64::MAX as u64).unwrap();
        assert_eq!(req.offset(), 0);
    }

    #[test]
    fn query_defaults() {
        let req = PageRequest::from_query(None, None).unwrap();
        assert_eq!(req, PageRequest::default());
        assert_eq!(req.page_size(), 10);
    }
}
