//! Offset pagination primitives shared by backend list endpoints.
//!
//! A [`PageRequest`] is validated when it is built: both the page size and the
//! 1-based page number are non-zero, so the offset and page-count arithmetic
//! below never divides by zero. [`Page`] is the envelope handed back to
//! callers once a store has counted and sliced the matching rows.
//!
//! # Examples
//! ```
//! use pagination::{Page, PageRequest};
//!
//! let request = PageRequest::try_new(2, 2).expect("valid request");
//! assert_eq!(request.offset(), 2);
//!
//! let page = Page::new(request, vec!["c", "d"], 5);
//! assert_eq!(page.total_pages(), 3);
//! ```

use std::num::NonZeroU32;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised when a [`PageRequest`] is built from raw integers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PageRequestError {
    /// The requested page size was zero.
    #[error("page size must be greater than zero")]
    ZeroPageSize,
    /// The requested page number was zero; pages are numbered from 1.
    #[error("page number must be greater than zero")]
    ZeroPageNumber,
}

/// A validated request for one page of an ordered result set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PageRequest {
    page_size: NonZeroU32,
    page_number: NonZeroU32,
}

impl PageRequest {
    /// Build a request from already validated parts.
    #[must_use]
    pub const fn new(page_size: NonZeroU32, page_number: NonZeroU32) -> Self {
        Self {
            page_size,
            page_number,
        }
    }

    /// Request the first page with the given size.
    #[must_use]
    pub const fn first(page_size: NonZeroU32) -> Self {
        Self::new(page_size, NonZeroU32::MIN)
    }

    /// Validate raw integers and build a request.
    ///
    /// # Errors
    ///
    /// Returns [`PageRequestError::ZeroPageSize`] or
    /// [`PageRequestError::ZeroPageNumber`] when either value is zero.
    pub fn try_new(page_size: u32, page_number: u32) -> Result<Self, PageRequestError> {
        let size = NonZeroU32::new(page_size).ok_or(PageRequestError::ZeroPageSize)?;
        let number = NonZeroU32::new(page_number).ok_or(PageRequestError::ZeroPageNumber)?;
        Ok(Self::new(size, number))
    }

    /// Maximum number of rows on the page.
    #[must_use]
    pub const fn page_size(&self) -> NonZeroU32 {
        self.page_size
    }

    /// 1-based page number.
    #[must_use]
    pub const fn page_number(&self) -> NonZeroU32 {
        self.page_number
    }

    /// Row limit for the page query.
    #[must_use]
    pub fn limit(&self) -> u64 {
        u64::from(self.page_size.get())
    }

    /// Rows to skip before the page starts: `(page_number - 1) * page_size`.
    #[must_use]
    pub fn offset(&self) -> u64 {
        u64::from(self.page_number.get() - 1) * u64::from(self.page_size.get())
    }
}

/// Number of pages needed to hold `total_rows` rows, rounding up.
///
/// # Examples
/// ```
/// use std::num::NonZeroU32;
///
/// let size = NonZeroU32::new(20).expect("non-zero");
/// assert_eq!(pagination::total_pages(0, size), 0);
/// assert_eq!(pagination::total_pages(41, size), 3);
/// ```
#[must_use]
pub fn total_pages(total_rows: u64, page_size: NonZeroU32) -> u64 {
    total_rows.div_ceil(u64::from(page_size.get()))
}

/// One page of results plus the metadata describing the whole result set.
///
/// ## Invariants
/// - `data.len() <= page_size`.
/// - `total_pages == ceil(total_rows / page_size)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    data: Vec<T>,
    page_number: u32,
    page_size: u32,
    total_rows: u64,
    total_pages: u64,
}

impl<T> Page<T> {
    /// Assemble a page from the request that produced it.
    ///
    /// Rows beyond the requested page size are dropped so the length
    /// invariant holds even if a store over-fetches.
    #[must_use]
    pub fn new(request: PageRequest, mut data: Vec<T>, total_rows: u64) -> Self {
        let limit = usize::try_from(request.page_size.get()).unwrap_or(usize::MAX);
        data.truncate(limit);
        Self {
            data,
            page_number: request.page_number.get(),
            page_size: request.page_size.get(),
            total_rows,
            total_pages: total_pages(total_rows, request.page_size),
        }
    }

    /// Rows on this page, in store order.
    #[must_use]
    pub fn data(&self) -> &[T] {
        &self.data
    }

    /// Consume the page and return its rows.
    #[must_use]
    pub fn into_data(self) -> Vec<T> {
        self.data
    }

    /// 1-based page number.
    #[must_use]
    pub const fn page_number(&self) -> u32 {
        self.page_number
    }

    /// Requested page size.
    #[must_use]
    pub const fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Total rows matching the query across all pages.
    #[must_use]
    pub const fn total_rows(&self) -> u64 {
        self.total_rows
    }

    /// Total pages for the query at this page size.
    #[must_use]
    pub const fn total_pages(&self) -> u64 {
        self.total_pages
    }

    /// Metadata without the rows.
    #[must_use]
    pub const fn metadata(&self) -> PageMetadata {
        PageMetadata {
            page: self.page_number,
            page_size: self.page_size,
            total_pages: self.total_pages,
            total_rows: self.total_rows,
        }
    }

    /// Convert every row, keeping the metadata.
    #[must_use]
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            data: self.data.into_iter().map(f).collect(),
            page_number: self.page_number,
            page_size: self.page_size,
            total_rows: self.total_rows,
            total_pages: self.total_pages,
        }
    }
}

/// Pagination metadata as exposed to API clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMetadata {
    /// 1-based page number.
    pub page: u32,
    /// Requested page size.
    pub page_size: u32,
    /// Total pages at this page size.
    pub total_pages: u64,
    /// Total matching rows.
    pub total_rows: u64,
}
