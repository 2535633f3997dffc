use serde::{Deserialize, Serialize};

/// Upper bound on candidates kept before pagination, for both discovery and
/// aggregated recommendations
pub const POOL_CAP: usize = 50;

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_LIMIT: u32 = 20;

/// Page envelope shared with the upstream API's list responses
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PaginatedResult<T> {
    #[serde(default)]
    pub page: u32,
    #[serde(default = "Vec::new")]
    pub results: Vec<T>,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub total_results: u32,
}

/// Raw `?page&limit` query parameters, kept as strings so that junk values
/// fall back to defaults instead of rejecting the request
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageParams {
    pub page: Option<String>,
    pub limit: Option<String>,
}

impl PageParams {
    pub fn to_request(&self) -> PageRequest {
        PageRequest::from_params(self.page.as_deref(), self.limit.as_deref())
    }
}

/// Sanitized page window. `page` is at least 1, `limit` is in `[1, POOL_CAP]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub limit: u32,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl PageRequest {
    pub fn from_params(page: Option<&str>, limit: Option<&str>) -> Self {
        Self {
            page: lenient_number(page, DEFAULT_PAGE).max(1),
            limit: lenient_number(limit, DEFAULT_LIMIT).clamp(1, POOL_CAP as u32),
        }
    }
}

/// Missing, unparsable or zero values take the default; negatives become 1.
fn lenient_number(raw: Option<&str>, default: u32) -> u32 {
    match raw.map(str::trim).and_then(|s| s.parse::<i64>().ok()) {
        None | Some(0) => default,
        Some(n) if n < 0 => 1,
        Some(n) => u32::try_from(n).unwrap_or(u32::MAX),
    }
}

/// Slices an already-capped pool into the requested window.
///
/// The page is clamped into `[1, total_pages]` (or to 1 for an empty pool), so
/// out-of-range requests land on the nearest valid page rather than on an
/// empty slice.
pub fn paginate<T>(pool: Vec<T>, request: PageRequest) -> PaginatedResult<T> {
    let total_results = pool.len();
    let limit = request.limit.max(1) as usize;
    let total_pages = total_results.div_ceil(limit);
    let page = (request.page as usize).clamp(1, total_pages.max(1));

    let results = pool
        .into_iter()
        .skip((page - 1) * limit)
        .take(limit)
        .collect();

    PaginatedResult {
        page: page as u32,
        results,
        total_pages: total_pages as u32,
        total_results: total_results as u32,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(page: u32, limit: u32) -> PageRequest {
        PageRequest { page, limit }
    }

    #[test]
    fn test_first_page() {
        let result = paginate((1..=45).collect::<Vec<_>>(), request(1, 20));
        assert_eq!(result.page, 1);
        assert_eq!(result.results, (1..=20).collect::<Vec<_>>());
        assert_eq!(result.total_pages, 3);
        assert_eq!(result.total_results, 45);
    }

    #[test]
    fn test_last_partial_page() {
        let result = paginate((1..=45).collect::<Vec<_>>(), request(3, 20));
        assert_eq!(result.results, (41..=45).collect::<Vec<_>>());
    }

    #[test]
    fn test_page_beyond_last_is_clamped() {
        let result = paginate((1..=45).collect::<Vec<_>>(), request(99, 20));
        assert_eq!(result.page, 3);
        assert_eq!(result.results.len(), 5);
    }

    #[test]
    fn test_empty_pool_reports_page_one() {
        let result = paginate(Vec::<u32>::new(), request(4, 20));
        assert_eq!(result.page, 1);
        assert_eq!(result.total_pages, 0);
        assert_eq!(result.total_results, 0);
        assert!(result.results.is_empty());
    }

    #[test]
    fn test_never_exceeds_limit() {
        for limit in 1..=POOL_CAP as u32 {
            for page in 0..=10 {
                let result = paginate((0..50).collect::<Vec<_>>(), request(page, limit));
                assert!(result.results.len() <= limit as usize);
                assert!(result.page >= 1 && result.page <= result.total_pages.max(1));
            }
        }
    }

    #[test]
    fn test_lenient_params() {
        assert_eq!(PageRequest::from_params(None, None), PageRequest::default());
        assert_eq!(PageRequest::from_params(Some("0"), Some("0")), request(1, 20));
        assert_eq!(PageRequest::from_params(Some("abc"), Some("x")), request(1, 20));
        assert_eq!(PageRequest::from_params(Some("-4"), Some("-1")), request(1, 1));
        assert_eq!(PageRequest::from_params(Some(" 3 "), Some("500")), request(3, 50));
    }
}
