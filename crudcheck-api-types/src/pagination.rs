/// Pagination shapes returned by list endpoints
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One page of a paginated list response
///
/// Field names follow the backend's camelCase wire format. Extra pagination
/// fields the backend may send (`pageable`, `numberOfElements`, ...) are
/// ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    /// Items on this page, in server-defined order
    pub content: Vec<T>,
    /// Zero-based page index
    pub number: u32,
    /// Requested page size
    pub size: u32,
    /// Total number of items across all pages
    pub total_elements: u64,
    /// Total number of pages
    pub total_pages: u32,
    pub first: bool,
    pub last: bool,
}

impl<T> Page<T> {
    /// Check the structural invariants every page must satisfy
    pub fn check_invariants(&self) -> Result<(), PageInvariantError> {
        if self.size == 0 {
            return Err(PageInvariantError::ZeroSize);
        }

        if self.content.len() > self.size as usize {
            return Err(PageInvariantError::ContentExceedsSize {
                len: self.content.len(),
                size: self.size,
            });
        }

        if self.first != (self.number == 0) {
            return Err(PageInvariantError::FirstMismatch {
                number: self.number,
                first: self.first,
            });
        }

        if self.last && self.number.saturating_add(1) < self.total_pages {
            return Err(PageInvariantError::LastWithRemainingPages {
                number: self.number,
                total_pages: self.total_pages,
            });
        }

        Ok(())
    }

    pub fn len(&self) -> usize {
        self.content.len()
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    pub fn has_next(&self) -> bool {
        !self.last
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.content.iter()
    }
}

impl<T> IntoIterator for Page<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.content.into_iter()
    }
}

/// Violations found by [`Page::check_invariants`]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PageInvariantError {
    #[error("page size must be greater than 0")]
    ZeroSize,

    #[error("page holds {len} items but size is {size}")]
    ContentExceedsSize { len: usize, size: u32 },

    #[error("page {number} reports first={first}")]
    FirstMismatch { number: u32, first: bool },

    #[error("page {number} reports last=true but total_pages is {total_pages}")]
    LastWithRemainingPages { number: u32, total_pages: u32 },
}

/// Page/size/sort query for list endpoints
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageQuery {
    /// Zero-based page index
    pub page: Option<u32>,
    /// Items per page
    pub size: Option<u32>,
    /// Sort expression, e.g. `name,asc`
    pub sort: Option<String>,
}

impl PageQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    pub fn size(mut self, size: u32) -> Self {
        self.size = Some(size);
        self
    }

    pub fn sort(mut self, sort: impl Into<String>) -> Self {
        self.sort = Some(sort.into());
        self
    }

    /// Render the set fields as query parameters
    pub fn to_query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        if let Some(page) = self.page {
            pairs.push(("page".to_string(), page.to_string()));
        }
        if let Some(size) = self.size {
            pairs.push(("size".to_string(), size.to_string()));
        }
        if let Some(ref sort) = self.sort {
            pairs.push(("sort".to_string(), sort.clone()));
        }
        pairs
    }
}
