//! Pagination types for list queries.

use serde::{Deserialize, Serialize};

/// Request parameters for paginated queries.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PageRequest {
    /// Page number (1-indexed).
    #[serde(default = "default_page")]
    pub page: u32,
    /// Number of items per page.
    #[serde(default = "default_per_page")]
    pub per_page: u32,
}

fn default_page() -> u32 {
    1
}

fn default_per_page() -> u32 {
    20
}

/// Upper bound on `per_page` so one request cannot drag the whole table.
pub const MAX_PER_PAGE: u32 = 200;

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: default_page(),
            per_page: default_per_page(),
        }
    }
}

impl PageRequest {
    /// Returns a copy with `page` floored at 1 and `per_page` clamped to
    /// `1..=MAX_PER_PAGE`.
    #[must_use]
    pub fn clamped(self) -> Self {
        Self {
            page: self.page.max(1),
            per_page: self.per_page.clamp(1, MAX_PER_PAGE),
        }
    }

    /// Calculates the offset for database queries.
    #[must_use]
    pub fn offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.per_page)
    }

    /// Returns the limit for database queries.
    #[must_use]
    pub fn limit(&self) -> u64 {
        u64::from(self.per_page)
    }
}

/// Response wrapper for paginated data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageResponse<T> {
    /// The items in the current page.
    pub data: Vec<T>,
    /// Pagination metadata.
    pub meta: PageMeta,
}

/// Pagination metadata.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PageMeta {
    /// Current page number.
    pub page: u32,
    /// Items per page.
    pub per_page: u32,
    /// Total number of items across all pages.
    pub total: u64,
    /// Total number of pages.
    pub total_pages: u32,
}

impl PageMeta {
    /// Builds metadata for a page of `total` items.
    #[must_use]
    pub fn new(page: u32, per_page: u32, total: u64) -> Self {
        let total_pages = if total == 0 {
            1
        } else {
            u32::try_from(total.div_ceil(u64::from(per_page.max(1)))).unwrap_or(u32::MAX)
        };

        Self {
            page,
            per_page,
            total,
            total_pages,
        }
    }
}

impl<T> PageResponse<T> {
    /// Creates a new paginated response.
    #[must_use]
    pub fn new(data: Vec<T>, page: u32, per_page: u32, total: u64) -> Self {
        Self {
            data,
            meta: PageMeta::new(page, per_page, total),
        }
    }
}
