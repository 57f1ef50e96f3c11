use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

/// Default page size when the caller does not ask for one
pub const DEFAULT_LIMIT: u64 = 20;
/// Hard cap on page size
pub const MAX_LIMIT: u64 = 1000;

/// Raw pagination query parameters as they arrive on the wire. `offset` is
/// signed so that junk negative input can be clamped instead of rejected.
#[derive(Debug, Default, Clone, Deserialize, Serialize, IntoParams)]
pub struct PaginationParams {
    pub page: Option<u64>,
    pub limit: Option<u64>,
    pub offset: Option<i64>,
}

/// Canonical pagination request produced by [`PaginationParams::normalize`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u64,
    pub limit: u64,
    pub offset: u64,
}

impl PaginationParams {
    /// Normalizes the raw parameters:
    /// - `limit` defaults to [`DEFAULT_LIMIT`] and is clamped to
    ///   `1..=MAX_LIMIT`
    /// - `offset` is clamped to `>= 0`
    /// - a present `page` is floored to 1 and recomputes `offset` as
    ///   `(page - 1) * limit`, overriding any explicit offset. Page-based
    ///   navigation is the primary path; raw offset is an escape hatch for
    ///   internal tooling.
    pub fn normalize(&self) -> PageRequest {
        let limit = self.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
        match self.page {
            Some(page) => {
                let page = page.max(1);
                PageRequest {
                    page,
                    limit,
                    offset: (page - 1) * limit,
                }
            }
            None => {
                let offset = self.offset.unwrap_or(0).max(0) as u64;
                PageRequest {
                    page: offset / limit + 1,
                    limit,
                    offset,
                }
            }
        }
    }
}

/// Pagination block of the response envelope.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PaginationMeta {
    pub page: u64,
    pub limit: u64,
    pub total: u64,
    pub total_pages: u64,
}

impl PaginationMeta {
    pub fn new(page: &PageRequest, total: u64) -> Self {
        let total_pages = if total == 0 {
            0
        } else {
            total.div_ceil(page.limit)
        };
        Self {
            page: page.page,
            limit: page.limit,
            total,
            total_pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(page: Option<u64>, limit: Option<u64>, offset: Option<i64>) -> PaginationParams {
        PaginationParams {
            page,
            limit,
            offset,
        }
    }

    #[test]
    fn defaults_apply_when_nothing_requested() {
        let req = params(None, None, None).normalize();
        assert_eq!(req.limit, DEFAULT_LIMIT);
        assert_eq!(req.offset, 0);
        assert_eq!(req.page, 1);
    }

    #[test]
    fn limit_is_capped() {
        let req = params(None, Some(5000), None).normalize();
        assert_eq!(req.limit, MAX_LIMIT);
    }

    #[test]
    fn zero_limit_is_floored_to_one() {
        let req = params(None, Some(0), None).normalize();
        assert_eq!(req.limit, 1);
    }

    #[test]
    fn negative_offset_is_clamped() {
        let req = params(None, None, Some(-25)).normalize();
        assert_eq!(req.offset, 0);
    }

    #[test]
    fn page_overrides_explicit_offset() {
        let req = params(Some(3), Some(10), Some(7)).normalize();
        assert_eq!(req.offset, 20);
        assert_eq!(req.page, 3);
    }

    #[test]
    fn page_is_floored_to_one() {
        let req = params(Some(0), Some(10), None).normalize();
        assert_eq!(req.page, 1);
        assert_eq!(req.offset, 0);
    }

    #[test]
    fn raw_offset_survives_when_no_page_given() {
        let req = params(None, Some(10), Some(35)).normalize();
        assert_eq!(req.offset, 35);
        assert_eq!(req.page, 4);
    }

    #[test]
    fn total_pages_rounds_up() {
        let req = params(Some(3), Some(10), None).normalize();
        let meta = PaginationMeta::new(&req, 25);
        assert_eq!(meta.total_pages, 3);
        assert_eq!(meta.total, 25);
        assert_eq!(meta.page, 3);

        let empty = PaginationMeta::new(&req, 0);
        assert_eq!(empty.total_pages, 0);
    }
}
