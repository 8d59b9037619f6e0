/// Pagination primitives
///
/// `PageRequest` normalizes the raw `page`/`size` query values and
/// `PageMetadata` is the `paging` member of list responses.

use serde::{Deserialize, Deserializer, Serialize};

/// Page size used when the caller omits `size` or sends a non-positive one
pub const DEFAULT_PAGE_SIZE: i64 = 10;

/// Largest page size served in a single response
pub const MAX_PAGE_SIZE: i64 = 100;

/// Normalized page selection (1-based page, bounded size)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: i64,
    size: i64,
}

impl PageRequest {
    /// Normalizes raw values: `page < 1` becomes 1, `size < 1` becomes
    /// [`DEFAULT_PAGE_SIZE`], and `size` is capped at [`MAX_PAGE_SIZE`].
    pub fn new(page: Option<i64>, size: Option<i64>) -> Self {
        let page = page.filter(|p| *p >= 1).unwrap_or(1);
        let size = size
            .filter(|s| *s >= 1)
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .min(MAX_PAGE_SIZE);

        Self { page, size }
    }

    pub fn page(&self) -> i64 {
        self.page
    }

    pub fn size(&self) -> i64 {
        self.size
    }

    /// SQL `LIMIT`
    pub fn limit(&self) -> i64 {
        self.size
    }

    /// SQL `OFFSET`
    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.size)
    }

    /// Builds the `paging` metadata for a result set of `total_item` rows
    pub fn metadata(&self, total_item: i64) -> PageMetadata {
        let total_item = total_item.max(0);
        PageMetadata {
            page: self.page,
            size: self.size,
            total_item,
            total_page: (total_item + self.size - 1) / self.size,
        }
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(None, None)
    }
}

/// Reads an optional `page`/`size` value, treating blank or non-numeric
/// input as absent so [`PageRequest::new`] applies its defaults.
///
/// Query strings deliver every value as text; JSON bodies may send numbers.
pub fn lenient_page_value<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(i64),
        Text(String),
    }

    Ok(match Option::<Raw>::deserialize(deserializer)? {
        Some(Raw::Number(n)) => Some(n),
        Some(Raw::Text(text)) => text.trim().parse().ok(),
        None => None,
    })
}

/// Paging metadata returned alongside list results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageMetadata {
    pub page: i64,
    pub size: i64,
    pub total_item: i64,
    pub total_page: i64,
}
