//! Pagination types for list endpoints.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::config::{DEFAULT_OFFSET, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use crate::domain::{OrderItemOut, OrderOut, ProductOut, UserOut};

/// Offset/limit query parameters shared by every list endpoint
#[derive(Debug, Clone, Copy, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PaginationParams {
    /// Number of records to skip
    #[serde(default = "default_offset")]
    #[param(minimum = 0, default = 0)]
    pub offset: u64,
    /// Page size, clamped to 1..=100
    #[serde(default = "default_limit")]
    #[param(minimum = 1, maximum = 100, default = 100)]
    pub limit: u64,
}

fn default_offset() -> u64 {
    DEFAULT_OFFSET
}

fn default_limit() -> u64 {
    DEFAULT_PAGE_SIZE
}

impl PaginationParams {
    pub fn new(offset: u64, limit: u64) -> Self {
        Self { offset, limit }
    }

    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Limit clamped so it is never zero and never above the maximum
    pub fn limit(&self) -> u64 {
        self.limit.clamp(1, MAX_PAGE_SIZE)
    }
}

impl Default for PaginationParams {
    fn default() -> Self {
        Self::new(DEFAULT_OFFSET, DEFAULT_PAGE_SIZE)
    }
}

/// Paginated list envelope
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[aliases(
    UserPage = Paginated<UserOut>,
    ProductPage = Paginated<ProductOut>,
    OrderPage = Paginated<OrderOut>,
    OrderItemPage = Paginated<OrderItemOut>
)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub pagination: PaginationMeta,
}

/// Pagination metadata
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PaginationMeta {
    pub offset: u64,
    pub limit: u64,
    pub total_count: u64,
    pub total_pages: u64,
    /// 1-based page number derived from offset and limit
    pub page: u64,
}

impl PaginationMeta {
    pub fn new(offset: u64, limit: u64, total_count: u64) -> Self {
        let (total_pages, page) = if limit > 0 {
            (total_count.div_ceil(limit), offset / limit + 1)
        } else {
            (0, 1)
        };

        Self {
            offset,
            limit,
            total_count,
            total_pages,
            page,
        }
    }
}

impl<T> Paginated<T> {
    pub fn new(items: Vec<T>, offset: u64, limit: u64, total_count: u64) -> Self {
        Self {
            items,
            pagination: PaginationMeta::new(offset, limit, total_count),
        }
    }

    /// Convert every item, keeping the metadata
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Paginated<U> {
        Paginated {
            items: self.items.into_iter().map(f).collect(),
            pagination: self.pagination,
        }
    }
}
