//! Pagination bounds shared by list endpoints.

/// Default page size for reviewer queues.
pub const DEFAULT_PAGE_SIZE: i64 = 20;

/// Upper bound on any requested page size.
pub const MAX_PAGE_SIZE: i64 = 100;

/// Clamp a user-provided limit to valid bounds.
pub fn clamp_limit(limit: Option<i64>, default: i64, max: i64) -> i64 {
    limit.unwrap_or(default).max(1).min(max)
}

/// Clamp a user-provided offset to non-negative.
pub fn clamp_offset(offset: Option<i64>) -> i64 {
    offset.unwrap_or(0).max(0)
}

/// Resolve a 1-based page number and page size into `(page, page_size, offset)`.
pub fn page_window(page: Option<i64>, page_size: Option<i64>) -> (i64, i64, i64) {
    let page = page.unwrap_or(1).max(1);
    let page_size = clamp_limit(page_size, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE);
    (page, page_size, (page - 1).saturating_mul(page_size))
}
