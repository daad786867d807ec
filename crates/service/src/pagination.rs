//! Pagination utilities for service layer
//!
//! Offset based and stateless: no total count, no cursor.

use crate::errors::ServiceError;

pub const DEFAULT_LIMIT: u64 = 20;
pub const MAX_LIMIT: u64 = 100;
/// SQLite binds offsets as signed 64-bit integers.
pub const MAX_OFFSET: u64 = i64::MAX as u64;

/// Pagination parameters
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Pagination {
    /// items per page, 1..=100
    pub limit: u64,
    /// rows skipped before the page starts
    pub offset: u64,
}

impl Pagination {
    /// Validate raw query values, filling in defaults for absent ones.
    /// Out-of-range limits are rejected rather than clamped.
    pub fn new(limit: Option<u64>, offset: Option<u64>) -> Result<Self, ServiceError> {
        let limit = limit.unwrap_or(DEFAULT_LIMIT);
        if !(1..=MAX_LIMIT).contains(&limit) {
            return Err(ServiceError::invalid("limit", format!("limit must be between 1 and {MAX_LIMIT}")));
        }
        let offset = offset.unwrap_or(0);
        if offset > MAX_OFFSET {
            return Err(ServiceError::invalid("offset", format!("offset must be at most {MAX_OFFSET}")));
        }
        Ok(Self { limit, offset })
    }
}

impl Default for Pagination {
    fn default() -> Self { Self { limit: DEFAULT_LIMIT, offset: 0 } }
}
