//! Page descriptor for listing calls.

use crate::config::PageConfig;
use crate::{Result, TetherError};
use serde::{Deserialize, Serialize};

/// Zero-based page index and page size.
///
/// The backend owns page semantics. [`Page::validate`] is available to
/// callers that want to check the size cap before sending, but controllers
/// pass pages through as given.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Page {
    pub page: u32,
    pub limit: u8,
}

impl Page {
    pub fn new(page: u32, limit: u8) -> Self {
        Self { page, limit }
    }

    /// First page with the given size.
    pub fn first(limit: u8) -> Self {
        Self::new(0, limit)
    }

    pub fn next(self) -> Self {
        Self::new(self.page.saturating_add(1), self.limit)
    }

    /// Previous page, staying on page 0.
    pub fn prev(self) -> Self {
        Self::new(self.page.saturating_sub(1), self.limit)
    }

    pub fn is_first(&self) -> bool {
        self.page == 0
    }

    /// Number of items before this page.
    pub fn offset(&self) -> u64 {
        u64::from(self.limit) * u64::from(self.page)
    }

    /// Check the page size against `PageConfig::MAX_LIMIT`.
    pub fn validate(&self) -> Result<()> {
        if self.limit > PageConfig::MAX_LIMIT {
            return Err(TetherError::Validation {
                field: "limit".to_string(),
                message: format!(
                    "page size {} exceeds maximum {}",
                    self.limit,
                    PageConfig::MAX_LIMIT
                ),
            });
        }
        Ok(())
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::first(PageConfig::DEFAULT_LIMIT)
    }
}
