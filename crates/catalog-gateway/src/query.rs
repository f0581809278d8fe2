//! Total parsing of query parameters.
//!
//! Nothing here panics or errors: unparseable input falls back to a default.

use crate::dispatch::RouteRequest;

/// Page used when `page` is missing or invalid.
pub const DEFAULT_PAGE: usize = 1;

/// Page size used when `limit` is missing or invalid.
pub const DEFAULT_LIMIT: usize = 2;

/// Parse a strictly positive integer. Anything else yields `None`.
#[must_use]
pub fn parse_positive(raw: Option<&str>) -> Option<usize> {
    raw.and_then(|value| value.trim().parse::<usize>().ok())
        .filter(|&value| value > 0)
}

/// Page-based pagination window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    /// One-based page number.
    pub page: usize,
    /// Items per page, always at least one.
    pub limit: usize,
}

impl Pagination {
    /// Read `page` and `limit` from the query string.
    #[must_use]
    pub fn from_request(request: &RouteRequest) -> Self {
        Self {
            page: parse_positive(request.query_param("page")).unwrap_or(DEFAULT_PAGE),
            limit: parse_positive(request.query_param("limit")).unwrap_or(DEFAULT_LIMIT),
        }
    }

    /// Number of pages needed for `total_items`.
    #[must_use]
    pub const fn total_pages(&self, total_items: usize) -> usize {
        total_items.div_ceil(self.limit)
    }

    /// The slice `[(page - 1) * limit, page * limit)` of `items`, clamped to its bounds.
    #[must_use]
    pub fn window<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        let start = self.page.saturating_sub(1).saturating_mul(self.limit).min(items.len());
        let end = start.saturating_add(self.limit).min(items.len());
        &items[start..end]
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }
}
