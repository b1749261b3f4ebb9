//! Page/limit defaulting and page-count arithmetic shared by the list endpoints.

use thiserror::Error;

/// Raw `page`/`limit` query values after lenient parsing.
///
/// A value that is missing, not an integer, or zero counts as "not given":
/// `page` then becomes 1, and `limit` is left for the caller to default.
/// Negative values are kept as they are.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageParams {
    pub page: i64,
    pub limit: Option<i64>,
}

/// Rows to fetch for one page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub limit: u64,
    pub offset: u64,
}

/// A window the store would refuse. Messages match PostgreSQL's.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum WindowError {
    #[error("LIMIT must not be negative")]
    NegativeLimit,

    #[error("OFFSET must not be negative")]
    NegativeOffset,
}

impl PageParams {
    pub fn parse(page: Option<&str>, limit: Option<&str>) -> Self {
        Self {
            page: non_zero(page).unwrap_or(1),
            limit: non_zero(limit),
        }
    }

    /// `offset = (page - 1) * limit`, saturating at the `i64` bounds.
    pub fn window(&self, limit: i64) -> Result<PageWindow, WindowError> {
        if limit < 0 {
            return Err(WindowError::NegativeLimit);
        }
        let offset = self.page.saturating_sub(1).saturating_mul(limit);
        if offset < 0 {
            return Err(WindowError::NegativeOffset);
        }
        Ok(PageWindow {
            limit: limit as u64,
            offset: offset as u64,
        })
    }
}

fn non_zero(raw: Option<&str>) -> Option<i64> {
    raw?.parse::<i64>().ok().filter(|n| *n != 0)
}

/// `ceil(total / limit)`. A zero limit cannot hold any row, so it yields 0.
pub fn total_pages(total: u64, limit: u64) -> u64 {
    if limit == 0 {
        return 0;
    }
    total.div_ceil(limit)
}

/// Page count for the plain listing, which reports one (empty) page when
/// nothing matches.
pub fn total_pages_at_least_one(total: u64, limit: u64) -> u64 {
    if total == 0 {
        return 1;
    }
    total_pages(total, limit)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_zero_or_garbage_params_default() {
        assert_eq!(
            PageParams::parse(None, None),
            PageParams { page: 1, limit: None }
        );
        assert_eq!(
            PageParams::parse(Some(""), Some("ten")),
            PageParams { page: 1, limit: None }
        );
        assert_eq!(
            PageParams::parse(Some("0"), Some("0")),
            PageParams { page: 1, limit: None }
        );
        assert_eq!(
            PageParams::parse(Some("1.5"), Some(" 2")),
            PageParams { page: 1, limit: None }
        );
    }

    #[test]
    fn numeric_params_are_kept_even_when_negative() {
        assert_eq!(
            PageParams::parse(Some("3"), Some("20")),
            PageParams { page: 3, limit: Some(20) }
        );
        assert_eq!(
            PageParams::parse(Some("+2"), None),
            PageParams { page: 2, limit: None }
        );
        assert_eq!(
            PageParams::parse(Some("-3"), Some("-1")),
            PageParams { page: -3, limit: Some(-1) }
        );
    }

    #[test]
    fn window_offsets_by_whole_pages() {
        let params = PageParams::parse(Some("3"), None);
        assert_eq!(params.window(10), Ok(PageWindow { limit: 10, offset: 20 }));
        assert_eq!(params.window(0), Ok(PageWindow { limit: 0, offset: 0 }));

        let first = PageParams::parse(None, None);
        assert_eq!(first.window(7), Ok(PageWindow { limit: 7, offset: 0 }));
    }

    #[test]
    fn negative_limit_is_refused() {
        let params = PageParams::parse(None, Some("-4"));
        assert_eq!(params.window(-4), Err(WindowError::NegativeLimit));
        assert_eq!(
            WindowError::NegativeLimit.to_string(),
            "LIMIT must not be negative"
        );
    }

    #[test]
    fn negative_page_is_refused_unless_the_limit_is_zero() {
        let params = PageParams::parse(Some("-1"), None);
        assert_eq!(params.window(2), Err(WindowError::NegativeOffset));
        assert_eq!(params.window(0), Ok(PageWindow { limit: 0, offset: 0 }));
        assert_eq!(
            WindowError::NegativeOffset.to_string(),
            "OFFSET must not be negative"
        );
    }

    #[test]
    fn window_offset_saturates_for_huge_pages() {
        let params = PageParams::parse(Some(i64::MAX.to_string().as_str()), None);
        assert_eq!(params.window(1_000).map(|w| w.offset), Ok(i64::MAX as u64));

        let params = PageParams::parse(Some(i64::MIN.to_string().as_str()), None);
        assert_eq!(params.window(1_000), Err(WindowError::NegativeOffset));
    }

    #[test]
    fn total_pages_rounds_up() {
        assert_eq!(total_pages(0, 5), 0);
        assert_eq!(total_pages(1, 5), 1);
        assert_eq!(total_pages(5, 5), 1);
        assert_eq!(total_pages(6, 5), 2);
        assert_eq!(total_pages(11, 2), 6);
    }

    #[test]
    fn zero_limit_has_no_pages() {
        assert_eq!(total_pages(0, 0), 0);
        assert_eq!(total_pages(4, 0), 0);
    }

    #[test]
    fn plain_listing_always_reports_a_page() {
        assert_eq!(total_pages_at_least_one(0, 0), 1);
        assert_eq!(total_pages_at_least_one(0, 10), 1);
        assert_eq!(total_pages_at_least_one(7, 3), 3);
    }
}
