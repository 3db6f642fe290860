// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Page arithmetic for list endpoints.

use serde::Serialize;
use utoipa::ToSchema;

/// Default page size of the venue listing.
pub const VENUE_PAGE_SIZE: u64 = 25;
/// Default page size of every other listing.
pub const DEFAULT_PAGE_SIZE: u64 = 10;

/// A page reference used in `next`/`prev` links.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct PageCursor {
    pub page: u64,
    pub limit: u64,
}

/// Links to neighbouring pages. Serializes as `{}` on a lone page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct PageLinks {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next: Option<PageCursor>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prev: Option<PageCursor>,
}

/// Result of the page calculation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub skip: u64,
    pub limit: u64,
    pub links: PageLinks,
}

/// Compute skip/limit and neighbour links.
///
/// `page` and `limit` must be at least 1; request parsing guarantees it.
pub fn paginate(page: u64, limit: u64, total: u64) -> Pagination {
    let skip = page.saturating_sub(1).saturating_mul(limit);
    let end = page.saturating_mul(limit);

    let next = (end < total).then_some(PageCursor {
        page: page + 1,
        limit,
    });
    let prev = (skip > 0).then_some(PageCursor {
        page: page - 1,
        limit,
    });

    Pagination {
        skip,
        limit,
        links: PageLinks { next, prev },
    }
}

/// Page and limit as requested by the client, after defaulting and clamping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u64,
    pub limit: u64,
}

impl PageRequest {
    /// Parse raw `page`/`limit` values.
    ///
    /// Missing, unparsable or zero values fall back to page 1 and
    /// `default_limit`; `limit` is capped at `max_limit`.
    pub fn parse(
        page: Option<&str>,
        limit: Option<&str>,
        default_limit: u64,
        max_limit: u64,
    ) -> Self {
        let page = parse_positive(page).unwrap_or(1);
        let limit = parse_positive(limit)
            .unwrap_or(default_limit)
            .min(max_limit.max(1));
        Self { page, limit }
    }

    pub fn paginate(&self, total: u64) -> Pagination {
        paginate(self.page, self.limit, total)
    }
}

fn parse_positive(raw: Option<&str>) -> Option<u64> {
    raw.and_then(|value| value.trim().parse::<u64>().ok())
        .filter(|value| *value > 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn middle_page_has_both_links() {
        let result = paginate(2, 10, 25);
        assert_eq!(result.skip, 10);
        assert_eq!(result.limit, 10);
        assert_eq!(result.links.next, Some(PageCursor { page: 3, limit: 10 }));
        assert_eq!(result.links.prev, Some(PageCursor { page: 1, limit: 10 }));
    }

    #[test]
    fn single_page_has_no_links() {
        let result = paginate(1, 10, 5);
        assert_eq!(result.skip, 0);
        assert_eq!(result.links, PageLinks::default());
        assert_eq!(serde_json::to_string(&result.links).unwrap(), "{}");
    }

    #[test]
    fn exact_fit_has_no_next() {
        let result = paginate(2, 10, 20);
        assert!(result.links.next.is_none());
        assert!(result.links.prev.is_some());
    }

    #[test]
    fn empty_collection() {
        let result = paginate(1, 25, 0);
        assert_eq!(result.skip, 0);
        assert_eq!(result.links, PageLinks::default());
    }

    #[test]
    fn page_past_the_end_still_links_back() {
        let result = paginate(5, 10, 12);
        assert_eq!(result.skip, 40);
        assert!(result.links.next.is_none());
        assert_eq!(result.links.prev, Some(PageCursor { page: 4, limit: 10 }));
    }

    #[test]
    fn request_defaults_and_clamps() {
        let req = PageRequest::parse(None, None, VENUE_PAGE_SIZE, 100);
        assert_eq!(req, PageRequest { page: 1, limit: 25 });

        let req = PageRequest::parse(Some("3"), Some("5000"), DEFAULT_PAGE_SIZE, 100);
        assert_eq!(req, PageRequest { page: 3, limit: 100 });

        let req = PageRequest::parse(Some("0"), Some("abc"), DEFAULT_PAGE_SIZE, 100);
        assert_eq!(req, PageRequest { page: 1, limit: 10 });

        let req = PageRequest::parse(Some("-2"), Some("0"), DEFAULT_PAGE_SIZE, 100);
        assert_eq!(req, PageRequest { page: 1, limit: 10 });
    }
}
