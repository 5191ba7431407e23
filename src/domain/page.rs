//! Pagination parameters and metadata.

use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_LIMIT: u32 = 10;
pub const MAX_LIMIT: u32 = 100;

/// Raw query string values. Kept as strings so bad input falls back to the
/// defaults instead of rejecting the request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
}

/// Normalised page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
}

impl Pagination {
    pub fn new(page: u32, limit: u32) -> Self {
        Self {
            page: page.max(1),
            limit: limit.clamp(1, MAX_LIMIT),
        }
    }

    /// Rows to skip before this page.
    pub fn offset(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.limit)
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE, DEFAULT_LIMIT)
    }
}

impl From<PageQuery> for Pagination {
    fn from(query: PageQuery) -> Self {
        let page = parse_positive(query.page.as_deref()).unwrap_or(DEFAULT_PAGE);
        let limit = parse_positive(query.limit.as_deref()).unwrap_or(DEFAULT_LIMIT);
        Self::new(page, limit)
    }
}

fn parse_positive(raw: Option<&str>) -> Option<u32> {
    raw.and_then(|s| s.trim().parse::<u32>().ok()).filter(|n| *n > 0)
}

/// Pagination block returned alongside a page of results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub current_page: u32,
    pub total_pages: u64,
    pub total_items: u64,
    pub items_per_page: u32,
}

impl PageInfo {
    pub fn new(pagination: Pagination, total_items: u64) -> Self {
        Self {
            current_page: pagination.page,
            total_pages: total_items.div_ceil(u64::from(pagination.limit)),
            total_items,
            items_per_page: pagination.limit,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(page: Option<&str>, limit: Option<&str>) -> PageQuery {
        PageQuery {
            page: page.map(String::from),
            limit: limit.map(String::from),
        }
    }

    #[test]
    fn test_defaults() {
        let p = Pagination::from(PageQuery::default());
        assert_eq!(p, Pagination { page: 1, limit: 10 });
        assert_eq!(p.offset(), 0);
    }

    #[test]
    fn test_bad_values_fall_back() {
        let p = Pagination::from(query(Some("abc"), Some("0")));
        assert_eq!(p, Pagination { page: 1, limit: 10 });
        let p = Pagination::from(query(Some("-2"), Some("5000")));
        assert_eq!(p, Pagination { page: 1, limit: 100 });
    }

    #[test]
    fn test_offset() {
        let p = Pagination::from(query(Some("3"), Some("25")));
        assert_eq!(p.offset(), 50);
    }

    #[test]
    fn test_total_pages_is_ceiling() {
        let p = Pagination::new(1, 10);
        assert_eq!(PageInfo::new(p, 0).total_pages, 0);
        assert_eq!(PageInfo::new(p, 10).total_pages, 1);
        assert_eq!(PageInfo::new(p, 11).total_pages, 2);
        assert_eq!(PageInfo::new(p, 11).items_per_page, 10);
    }
}
