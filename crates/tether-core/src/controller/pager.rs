//! Page-by-page walking over listing operations.

use crate::freeze::Frozen;
use crate::models::Page;
use crate::Result;
use tracing::debug;

/// A controller that can list one page of its entities.
#[async_trait::async_trait]
pub trait PagedList: Send + Sync {
    type Item: Send + Sync;

    async fn list_page(&self, page: Page) -> Result<Frozen<Vec<Self::Item>>>;
}

/// Cursor over a [`PagedList`].
///
/// Overrunning the last page steps back to the previous one instead of
/// showing an empty page.
#[derive(Debug, Clone)]
pub struct Pager<L> {
    source: L,
    page: Page,
}

impl<L: PagedList> Pager<L> {
    pub fn new(source: L, start: Page) -> Self {
        Self {
            source,
            page: start,
        }
    }

    /// The page the last fetch returned, or the next one to fetch.
    pub fn current(&self) -> Page {
        self.page
    }

    pub fn next(&mut self) {
        self.page = self.page.next();
    }

    pub fn prev(&mut self) {
        self.page = self.page.prev();
    }

    /// Fetch the current page.
    ///
    /// An empty page past the first one means the cursor ran off the end;
    /// the pager moves back one page and returns that page instead.
    pub async fn fetch(&mut self) -> Result<Frozen<Vec<L::Item>>> {
        let items = self.source.list_page(self.page).await?;
        if !items.is_empty() || self.page.is_first() {
            return Ok(items);
        }

        debug!("Page {} is empty, stepping back", self.page.page);
        self.prev();
        self.source.list_page(self.page).await
    }
}
