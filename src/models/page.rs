//! Pagination for list operations

use serde::Serialize;

/// Page sizes a caller may request
pub const ALLOWED_PAGE_SIZES: [usize; 3] = [10, 25, 50];

/// Page size used when the requested one is not allowed
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Search and paging parameters for list operations
#[derive(Debug, Clone, Default)]
pub struct ListQuery {
    /// Case-insensitive substring filter
    pub search: Option<String>,
    /// 1-based page number; 0 is treated as 1
    pub page: usize,
    /// One of `ALLOWED_PAGE_SIZES`; anything else falls back to the default
    pub page_size: usize,
}

impl ListQuery {
    /// Query for the given page with the default size
    pub fn page(page: usize) -> Self {
        Self {
            search: None,
            page,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    /// Add a search filter
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    /// Set the page size
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    /// The page number, clamped to at least 1
    pub fn effective_page(&self) -> usize {
        self.page.max(1)
    }

    /// The page size, forced into the allowed set
    pub fn effective_page_size(&self) -> usize {
        if ALLOWED_PAGE_SIZES.contains(&self.page_size) {
            self.page_size
        } else {
            DEFAULT_PAGE_SIZE
        }
    }

    /// Trimmed search term, `None` when blank
    pub fn search_term(&self) -> Option<&str> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    /// Cut one page out of an already filtered and ordered list
    pub fn paginate<T>(&self, items: Vec<T>) -> Page<T> {
        let page = self.effective_page();
        let page_size = self.effective_page_size();
        let total = items.len();
        let total_pages = total.div_ceil(page_size);

        let items = items
            .into_iter()
            .skip((page - 1).saturating_mul(page_size))
            .take(page_size)
            .collect();

        Page {
            items,
            total,
            page,
            page_size,
            total_pages,
        }
    }
}

/// One page of results
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: usize,
    pub page: usize,
    pub page_size: usize,
    pub total_pages: usize,
}

impl<T> Page<T> {
    /// Transform the items while keeping the paging metadata
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            page: self.page,
            page_size: self.page_size,
            total_pages: self.total_pages,
        }
    }

    /// Like `map`, stopping at the first error
    pub fn try_map<U, E>(self, f: impl FnMut(T) -> Result<U, E>) -> Result<Page<U>, E> {
        Ok(Page {
            items: self.items.into_iter().map(f).collect::<Result<_, E>>()?,
            total: self.total,
            page: self.page,
            page_size: self.page_size,
            total_pages: self.total_pages,
        })
    }
}
