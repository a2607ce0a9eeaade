//! Page-number pagination helpers.

use serde::{Deserialize, Serialize};

/// Default page size for admin listings.
pub const DEFAULT_PAGE_SIZE: i64 = 20;

/// Upper bound on requested page sizes.
pub const MAX_PAGE_SIZE: i64 = 100;

/// Query parameters for page-number pagination.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct PageParams {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

impl PageParams {
    /// Resolves the requested page against a default page size, clamping
    /// out-of-range values instead of rejecting them.
    pub fn resolve(&self, default_per_page: i64) -> Page {
        let page = self.page.unwrap_or(1).max(1);
        let per_page = self
            .per_page
            .unwrap_or(default_per_page)
            .clamp(1, MAX_PAGE_SIZE);
        Page { page, per_page }
    }
}

/// A resolved page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub page: i64,
    pub per_page: i64,
}

impl Page {
    /// SQL OFFSET for this page.
    pub fn offset(&self) -> i64 {
        (self.page - 1) * self.per_page
    }

    /// SQL LIMIT for this page.
    pub fn limit(&self) -> i64 {
        self.per_page
    }

    /// Builds response metadata from a total row count.
    pub fn meta(&self, total: i64) -> PageMeta {
        PageMeta {
            page: self.page,
            per_page: self.per_page,
            total,
            total_pages: total_pages(total, self.per_page),
        }
    }
}

/// Pagination metadata included in list responses.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    pub page: i64,
    pub per_page: i64,
    pub total: i64,
    pub total_pages: i64,
}

/// Ceiling division of total rows by page size.
pub fn total_pages(total: i64, per_page: i64) -> i64 {
    if total <= 0 {
        0
    } else {
        (total + per_page - 1) / per_page
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_defaults() {
        let params = PageParams {
            page: None,
            per_page: None,
        };
        let page = params.resolve(DEFAULT_PAGE_SIZE);
        assert_eq!(page.page, 1);
        assert_eq!(page.per_page, DEFAULT_PAGE_SIZE);
        assert_eq!(page.offset(), 0);
    }

    #[test]
    fn test_resolve_clamps_page_to_one() {
        let params = PageParams {
            page: Some(0),
            per_page: None,
        };
        assert_eq!(params.resolve(20).page, 1);

        let params = PageParams {
            page: Some(-3),
            per_page: None,
        };
        assert_eq!(params.resolve(20).page, 1);
    }

    #[test]
    fn test_resolve_clamps_per_page() {
        let params = PageParams {
            page: None,
            per_page: Some(10_000),
        };
        assert_eq!(params.resolve(20).per_page, MAX_PAGE_SIZE);

        let params = PageParams {
            page: None,
            per_page: Some(0),
        };
        assert_eq!(params.resolve(20).per_page, 1);
    }

    #[test]
    fn test_offset_math() {
        let page = Page { page: 3, per_page: 9 };
        assert_eq!(page.offset(), 18);
        assert_eq!(page.limit(), 9);
    }

    #[test]
    fn test_total_pages() {
        assert_eq!(total_pages(0, 20), 0);
        assert_eq!(total_pages(1, 20), 1);
        assert_eq!(total_pages(20, 20), 1);
        assert_eq!(total_pages(21, 20), 2);
        assert_eq!(total_pages(45, 9), 5);
    }

    #[test]
    fn test_meta() {
        let page = Page {
            page: 2,
            per_page: 20,
        };
        let meta = page.meta(45);
        assert_eq!(meta.page, 2);
        assert_eq!(meta.per_page, 20);
        assert_eq!(meta.total, 45);
        assert_eq!(meta.total_pages, 3);
    }

    #[test]
    fn test_meta_serializes() {
        let meta = Page {
            page: 1,
            per_page: 9,
        }
        .meta(10);
        let json = serde_json::to_string(&meta).unwrap();
        assert!(json.contains("\"totalPages\":2"));
        assert!(json.contains("\"perPage\":9"));
    }
}
