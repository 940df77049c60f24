//! Person controller.

use super::pager::PagedList;
use super::params::ListParams;
use super::Controller;
use crate::freeze::Frozen;
use crate::ipc::{ipc_invoke, Invoke};
use crate::models::{Page, Person, PersonForCreate, PersonForUpdate};
use crate::Result;
use std::ops::Deref;
use std::sync::Arc;

/// Controller for the `person` entity.
///
/// Derefs to the generic [`Controller`], so `get`, `create`, `update` and
/// `delete` are available directly.
#[derive(Debug, Clone)]
pub struct PersonController {
    inner: Controller<Person, PersonForCreate, PersonForUpdate>,
}

impl PersonController {
    pub const SUFFIX: &'static str = "person";

    pub fn new(invoker: Arc<dyn Invoke>) -> Self {
        Self {
            inner: Controller::new(invoker, Self::SUFFIX),
        }
    }

    /// Remote method name for listing, `list_persons`.
    pub fn list_method(&self) -> String {
        format!("list_{}s", self.suffix())
    }

    /// List one page of persons in backend order.
    ///
    /// `None` asks the backend for everything. An empty result means the
    /// page is past the end.
    pub async fn list(&self, page: Option<Page>) -> Result<Frozen<Vec<Person>>> {
        let params = serde_json::to_value(ListParams { page })?;
        ipc_invoke(self.invoker(), &self.list_method(), Some(params)).await
    }
}

impl Deref for PersonController {
    type Target = Controller<Person, PersonForCreate, PersonForUpdate>;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

#[async_trait::async_trait]
impl PagedList for PersonController {
    type Item = Person;

    async fn list_page(&self, page: Page) -> Result<Frozen<Vec<Person>>> {
        self.list(Some(page)).await
    }
}
