use serde::Serialize;

use crate::error::DomainError;

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_LIMIT: u32 = 10;
pub const DEFAULT_MAX_LIMIT: u32 = 100;

/// A validated page window. `page` is 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub limit: u32,
}

impl PageRequest {
    /// Applies defaults, rejects non-positive values and clamps `limit` to `max_limit`.
    pub fn from_query(
        page: Option<i64>,
        limit: Option<i64>,
        max_limit: u32,
    ) -> Result<Self, DomainError> {
        let page = positive("page", page, DEFAULT_PAGE)?;
        let limit = positive("limit", limit, DEFAULT_LIMIT)?.min(max_limit.max(1));
        Ok(Self { page, limit })
    }

    pub fn offset(&self) -> i64 {
        (i64::from(self.page) - 1) * i64::from(self.limit)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }
}

fn positive(name: &str, value: Option<i64>, default: u32) -> Result<u32, DomainError> {
    match value {
        None => Ok(default),
        Some(v) if v >= 1 => Ok(u32::try_from(v).unwrap_or(u32::MAX)),
        Some(_) => Err(DomainError::validation(format!(
            "{name} must be greater than or equal to 1"
        ))),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
    pub total: u64,
    pub total_pages: u64,
}

impl Pagination {
    pub fn new(request: PageRequest, total: u64) -> Self {
        Self {
            page: request.page,
            limit: request.limit,
            total,
            total_pages: total.div_ceil(u64::from(request.limit)),
        }
    }
}

/// Slices an already ordered collection the way `LIMIT/OFFSET` would.
pub fn page_slice<T: Clone>(items: &[T], request: PageRequest) -> Vec<T> {
    let offset = usize::try_from(request.offset()).unwrap_or(usize::MAX);
    items
        .iter()
        .skip(offset)
        .take(request.limit as usize)
        .cloned()
        .collect()
}
