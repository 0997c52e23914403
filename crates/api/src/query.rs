//! Shared query parameter types for API handlers.

use serde::Deserialize;

/// Query parameters for `GET /certificates/queue`.
#[derive(Debug, Default, Deserialize)]
pub struct QueueParams {
    /// A workflow stage, or `all`. Absent means "stages I can act on".
    pub status: Option<String>,
    /// Substring of the student's name or registration number.
    pub search: Option<String>,
    /// 1-based page number.
    pub page: Option<i64>,
    pub page_size: Option<i64>,
}
