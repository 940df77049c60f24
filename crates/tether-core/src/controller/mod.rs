//! Typed CRUD controllers.
//!
//! A [`Controller`] is generic over an entity's read model, create payload
//! and update payload. It derives remote method names from the entity
//! suffix (`get_person`, `create_person`, ...) and routes every call through
//! [`ipc_invoke`], so results arrive frozen and failures arrive as
//! [`TetherError`](crate::TetherError).
//!
//! Entity-specific controllers such as [`PersonController`] wrap a
//! `Controller` with a fixed suffix, deref to it for the generic four
//! operations and add their own read operations.

mod pager;
mod params;
mod person;

pub use pager::{PagedList, Pager};
pub use person::PersonController;

use crate::freeze::Frozen;
use crate::ipc::{ipc_invoke, Invoke};
use crate::Result;
use params::{DataParams, IdParams, UpdateParams};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

/// Generic CRUD verbs with a fixed remote method name each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verb {
    Get,
    Create,
    Update,
    Delete,
}

impl Verb {
    pub fn as_str(&self) -> &'static str {
        match self {
            Verb::Get => "get",
            Verb::Create => "create",
            Verb::Update => "update",
            Verb::Delete => "delete",
        }
    }
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// CRUD controller for one entity type.
///
/// Holds only the injected invoker and the suffix, so it is cheap to clone
/// and every method can run concurrently with any other.
pub struct Controller<M, C, U> {
    invoker: Arc<dyn Invoke>,
    suffix: String,
    _entity: PhantomData<fn() -> (M, C, U)>,
}

impl<M, C, U> Controller<M, C, U>
where
    M: DeserializeOwned,
    C: Serialize + Sync,
    U: Serialize + Sync,
{
    pub fn new(invoker: Arc<dyn Invoke>, suffix: impl Into<String>) -> Self {
        Self {
            invoker,
            suffix: suffix.into(),
            _entity: PhantomData,
        }
    }

    pub fn suffix(&self) -> &str {
        &self.suffix
    }

    /// Remote method name for `verb`, e.g. `update_person`.
    pub fn method_name(&self, verb: Verb) -> String {
        format!("{}_{}", verb, self.suffix)
    }

    pub(crate) fn invoker(&self) -> &dyn Invoke {
        self.invoker.as_ref()
    }

    /// Fetch one entity by id.
    pub async fn get(&self, id: &str) -> Result<Frozen<M>> {
        let params = serde_json::to_value(IdParams { id })?;
        ipc_invoke(self.invoker(), &self.method_name(Verb::Get), Some(params)).await
    }

    /// Create an entity and return the id the backend assigned.
    pub async fn create(&self, data: &C) -> Result<String> {
        let params = serde_json::to_value(DataParams { data })?;
        ipc_invoke::<String>(self.invoker(), &self.method_name(Verb::Create), Some(params))
            .await
            .map(Frozen::into_owned)
    }

    /// Apply `data` to entity `id`; returns the backend's confirmation id.
    pub async fn update(&self, id: &str, data: &U) -> Result<String> {
        let params = serde_json::to_value(UpdateParams { id, data })?;
        ipc_invoke::<String>(self.invoker(), &self.method_name(Verb::Update), Some(params))
            .await
            .map(Frozen::into_owned)
    }

    /// Delete entity `id`; returns the backend's confirmation id.
    pub async fn delete(&self, id: &str) -> Result<String> {
        let params = serde_json::to_value(IdParams { id })?;
        ipc_invoke::<String>(self.invoker(), &self.method_name(Verb::Delete), Some(params))
            .await
            .map(Frozen::into_owned)
    }
}

impl<M, C, U> Clone for Controller<M, C, U> {
    fn clone(&self) -> Self {
        Self {
            invoker: Arc::clone(&self.invoker),
            suffix: self.suffix.clone(),
            _entity: PhantomData,
        }
    }
}

impl<M, C, U> fmt::Debug for Controller<M, C, U> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Controller")
            .field("suffix", &self.suffix)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ipc::testing::ScriptedInvoker;
    use crate::TetherError;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Clone, PartialEq, Deserialize)]
    struct Task {
        id: String,
        title: String,
    }

    #[derive(Serialize)]
    struct TaskForCreate {
        title: String,
    }

    #[derive(Serialize)]
    struct TaskForUpdate {
        done: bool,
    }

    type TaskController = Controller<Task, TaskForCreate, TaskForUpdate>;

    fn controller(invoker: &Arc<ScriptedInvoker>) -> TaskController {
        Controller::new(invoker.clone(), "task")
    }

    #[test]
    fn test_method_names_follow_suffix() {
        let invoker = Arc::new(ScriptedInvoker::new());
        let tasks = controller(&invoker);

        assert_eq!(tasks.method_name(Verb::Get), "get_task");
        assert_eq!(tasks.method_name(Verb::Create), "create_task");
        assert_eq!(tasks.method_name(Verb::Update), "update_task");
        assert_eq!(tasks.method_name(Verb::Delete), "delete_task");
    }

    #[tokio::test]
    async fn test_get_sends_id_and_returns_frozen_model() {
        let invoker = Arc::new(ScriptedInvoker::new());
        invoker.push_envelope(json!({"error": null, "result": {"id": "1", "title": "Mx"}}));

        let task = controller(&invoker).get("1").await.unwrap();

        assert_eq!(
            *task,
            Task {
                id: "1".to_string(),
                title: "Mx".to_string()
            }
        );
        assert_eq!(
            invoker.calls(),
            vec![("get_task".to_string(), json!({"params": {"id": "1"}}))]
        );
    }

    #[tokio::test]
    async fn test_create_sends_data_and_returns_id() {
        let invoker = Arc::new(ScriptedInvoker::new());
        invoker.push_envelope(json!({"result": "task:abc"}));

        let id = controller(&invoker)
            .create(&TaskForCreate {
                title: "write docs".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(id, "task:abc");
        assert_eq!(
            invoker.calls()[0],
            (
                "create_task".to_string(),
                json!({"params": {"data": {"title": "write docs"}}})
            )
        );
    }

    #[tokio::test]
    async fn test_update_sends_id_and_data() {
        let invoker = Arc::new(ScriptedInvoker::new());
        invoker.push_envelope(json!({"result": "task:abc"}));

        let id = controller(&invoker)
            .update("abc", &TaskForUpdate { done: true })
            .await
            .unwrap();

        assert_eq!(id, "task:abc");
        assert_eq!(
            invoker.calls()[0],
            (
                "update_task".to_string(),
                json!({"params": {"id": "abc", "data": {"done": true}}})
            )
        );
    }

    #[tokio::test]
    async fn test_delete_sends_id() {
        let invoker = Arc::new(ScriptedInvoker::new());
        invoker.push_envelope(json!({"result": "task:abc"}));

        let id = controller(&invoker).delete("abc").await.unwrap();

        assert_eq!(id, "task:abc");
        assert_eq!(
            invoker.calls()[0],
            ("delete_task".to_string(), json!({"params": {"id": "abc"}}))
        );
    }

    #[tokio::test]
    async fn test_get_not_found_rejects_with_backend_message() {
        let invoker = Arc::new(ScriptedInvoker::new());
        invoker.push_envelope(json!({"error": "not found", "result": null}));

        let err = controller(&invoker).get("99").await.unwrap_err();

        assert!(matches!(err, TetherError::Backend { .. }));
        assert_eq!(err.to_string(), "not found");
    }

    #[tokio::test]
    async fn test_clones_share_invoker() {
        let invoker = Arc::new(ScriptedInvoker::new());
        invoker.push_envelope(json!({"result": "task:1"}));
        invoker.push_envelope(json!({"result": "task:2"}));

        let tasks = controller(&invoker);
        let other = tasks.clone();

        assert_eq!(tasks.delete("1").await.unwrap(), "task:1");
        assert_eq!(other.delete("2").await.unwrap(), "task:2");
        assert_eq!(invoker.calls().len(), 2);
    }
}
