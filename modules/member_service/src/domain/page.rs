//! Pagination engine: windows, page requests, pages and slices
//!
//! A [`Page`] carries a total element count computed by a separate count
//! over the same predicate. A [`Slice`] never counts; it over-fetches one row
//! to learn whether a next window exists.

use super::query::Sort;
use thiserror::Error;

/// Invalid paging configuration
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PageError {
    #[error("page size must be greater than zero")]
    ZeroSize,

    #[error("window limit must be greater than zero")]
    ZeroLimit,

    #[error("page {page} with size {size} overflows the offset range")]
    OffsetOverflow { page: u64, size: u64 },
}

/// Bounded result window; the limit is always greater than zero
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Window {
    offset: u64,
    limit: u64,
}

impl Window {
    pub fn new(offset: u64, limit: u64) -> Result<Self, PageError> {
        if limit == 0 {
            return Err(PageError::ZeroLimit);
        }
        Ok(Self { offset, limit })
    }

    pub fn offset(&self) -> u64 {
        self.offset
    }

    pub fn limit(&self) -> u64 {
        self.limit
    }

    /// The same window widened by one row, used for slice over-fetch
    pub fn overfetch(self) -> Self {
        Self {
            offset: self.offset,
            limit: self.limit.saturating_add(1),
        }
    }

    /// Apply to an already filtered and sorted row set
    pub fn apply<T>(self, rows: impl IntoIterator<Item = T>) -> Vec<T> {
        rows.into_iter()
            .skip(usize::try_from(self.offset).unwrap_or(usize::MAX))
            .take(usize::try_from(self.limit).unwrap_or(usize::MAX))
            .collect()
    }
}

/// Zero-based page request with optional sort
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    page: u64,
    size: u64,
    sort: Sort,
}

impl PageRequest {
    /// Unsorted request for `page` (0-based) of `size` rows
    pub fn of(page: u64, size: u64) -> Result<Self, PageError> {
        Self::sorted(page, size, Sort::unsorted())
    }

    pub fn sorted(page: u64, size: u64, sort: Sort) -> Result<Self, PageError> {
        if size == 0 {
            return Err(PageError::ZeroSize);
        }
        if page.checked_mul(size).is_none() {
            return Err(PageError::OffsetOverflow { page, size });
        }
        Ok(Self { page, size, sort })
    }

    pub fn page(&self) -> u64 {
        self.page
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn sort(&self) -> &Sort {
        &self.sort
    }

    pub fn offset(&self) -> u64 {
        // checked in the constructor
        self.page * self.size
    }

    pub fn window(&self) -> Window {
        Window {
            offset: self.offset(),
            limit: self.size,
        }
    }

    pub fn first(&self) -> Self {
        Self {
            page: 0,
            ..self.clone()
        }
    }

    /// Request for the following page; `None` if its offset would overflow
    pub fn next(&self) -> Option<Self> {
        let page = self.page.checked_add(1)?;
        page.checked_mul(self.size)?;
        Some(Self {
            page,
            ..self.clone()
        })
    }

    pub fn previous_or_first(&self) -> Self {
        Self {
            page: self.page.saturating_sub(1),
            ..self.clone()
        }
    }

    pub fn has_previous(&self) -> bool {
        self.page > 0
    }
}

/// Bounded content plus an independently counted total
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    content: Vec<T>,
    total_elements: u64,
    request: PageRequest,
}

impl<T> Page<T> {
    /// Assemble a page from windowed content and the total count for the same
    /// predicate
    pub fn new(content: Vec<T>, request: PageRequest, total_elements: u64) -> Self {
        Self {
            content,
            total_elements,
            request,
        }
    }

    pub fn content(&self) -> &[T] {
        &self.content
    }

    pub fn into_content(self) -> Vec<T> {
        self.content
    }

    pub fn total_elements(&self) -> u64 {
        self.total_elements
    }

    pub fn total_pages(&self) -> u64 {
        self.total_elements.div_ceil(self.request.size)
    }

    /// Current page number (0-based)
    pub fn number(&self) -> u64 {
        self.request.page
    }

    pub fn size(&self) -> u64 {
        self.request.size
    }

    pub fn number_of_elements(&self) -> usize {
        self.content.len()
    }

    pub fn has_content(&self) -> bool {
        !self.content.is_empty()
    }

    pub fn is_first(&self) -> bool {
        !self.has_previous()
    }

    pub fn is_last(&self) -> bool {
        !self.has_next()
    }

    pub fn has_next(&self) -> bool {
        self.number().saturating_add(1) < self.total_pages()
    }

    pub fn has_previous(&self) -> bool {
        self.request.has_previous()
    }

    pub fn request(&self) -> &PageRequest {
        &self.request
    }

    pub fn next_pageable(&self) -> Option<PageRequest> {
        if self.has_next() {
            self.request.next()
        } else {
            None
        }
    }

    pub fn previous_pageable(&self) -> Option<PageRequest> {
        self.has_previous().then(|| self.request.previous_or_first())
    }

    /// Convert the content, keeping totals and request
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            content: self.content.into_iter().map(f).collect(),
            total_elements: self.total_elements,
            request: self.request,
        }
    }
}

/// Bounded content with next-page existence inferred by over-fetching
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slice<T> {
    content: Vec<T>,
    has_next: bool,
    request: PageRequest,
}

impl<T> Slice<T> {
    /// Build from rows fetched with `request.window().overfetch()`; the extra
    /// row, if present, is dropped
    pub fn from_overfetch(mut rows: Vec<T>, request: PageRequest) -> Self {
        let limit = usize::try_from(request.size).unwrap_or(usize::MAX);
        let has_next = rows.len() > limit;
        rows.truncate(limit);
        Self {
            content: rows,
            has_next,
            request,
        }
    }

    pub fn content(&self) -> &[T] {
        &self.content
    }

    pub fn into_content(self) -> Vec<T> {
        self.content
    }

    pub fn number(&self) -> u64 {
        self.request.page
    }

    pub fn size(&self) -> u64 {
        self.request.size
    }

    pub fn number_of_elements(&self) -> usize {
        self.content.len()
    }

    pub fn has_content(&self) -> bool {
        !self.content.is_empty()
    }

    pub fn has_next(&self) -> bool {
        self.has_next
    }

    pub fn has_previous(&self) -> bool {
        self.request.has_previous()
    }

    pub fn is_first(&self) -> bool {
        !self.has_previous()
    }

    pub fn is_last(&self) -> bool {
        !self.has_next
    }

    pub fn request(&self) -> &PageRequest {
        &self.request
    }

    pub fn next_pageable(&self) -> Option<PageRequest> {
        if self.has_next {
            self.request.next()
        } else {
            None
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Slice<U> {
        Slice {
            content: self.content.into_iter().map(f).collect(),
            has_next: self.has_next,
            request: self.request,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_size_and_zero_limit_are_rejected() {
        assert_eq!(PageRequest::of(0, 0).unwrap_err(), PageError::ZeroSize);
        assert_eq!(Window::new(3, 0).unwrap_err(), PageError::ZeroLimit);
    }

    #[test]
    fn page_arithmetic() {
        let req = PageRequest::of(1, 3).unwrap();
        assert_eq!(req.window(), Window { offset: 3, limit: 3 });

        let page = Page::new(vec![4, 5, 6], req, 7);
        assert_eq!(page.total_pages(), 3);
        assert!(page.has_next());
        assert!(page.has_previous());
        assert!(!page.is_first());
        assert_eq!(page.next_pageable().map(|r| r.page()), Some(2));
        assert_eq!(page.previous_pageable().map(|r| r.page()), Some(0));
    }

    #[test]
    fn empty_page_beyond_end_keeps_total() {
        let page: Page<u32> = Page::new(vec![], PageRequest::of(10, 3).unwrap(), 6);
        assert_eq!(page.total_elements(), 6);
        assert_eq!(page.total_pages(), 2);
        assert!(!page.has_content());
        assert!(page.is_last());
    }

    #[test]
    fn slice_drops_overfetched_row() {
        let req = PageRequest::of(0, 3).unwrap();
        let slice = Slice::from_overfetch(vec![1, 2, 3, 4], req.clone());
        assert!(slice.has_next());
        assert_eq!(slice.content(), &[1, 2, 3]);

        let last = Slice::from_overfetch(vec![1, 2, 3], req);
        assert!(!last.has_next());
        assert_eq!(last.number_of_elements(), 3);
    }

    #[test]
    fn window_apply_skips_and_takes() {
        let w = Window::new(2, 2).unwrap();
        assert_eq!(w.apply(1..=5), vec![3, 4]);
        assert_eq!(w.overfetch().apply(1..=5), vec![3, 4, 5]);
        assert!(Window::new(9, 2).unwrap().apply(1..=5).is_empty());
    }
}
