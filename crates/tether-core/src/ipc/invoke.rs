//! The invocation primitive and the wrapper every controller call goes
//! through.
//!
//! Controllers never talk to a transport directly. They receive an
//! `Arc<dyn Invoke>` and call [`ipc_invoke`], which turns the envelope into
//! either a frozen typed value or a [`TetherError`].

use super::protocol::Envelope;
use crate::freeze::{deep_freeze, Frozen};
use crate::{Result, TetherError};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::trace;

/// Performs one remote call by method name.
///
/// Errors returned here are transport or serialization failures and reach
/// the caller unchanged. Backend failures belong in the envelope.
#[async_trait::async_trait]
pub trait Invoke: Send + Sync {
    async fn invoke(&self, method: &str, args: Value) -> Result<Envelope>;
}

/// Call `method` and resolve with its frozen, typed result.
///
/// `params` is sent under the fixed `params` key; `None` sends an empty
/// argument object.
pub async fn ipc_invoke<T: DeserializeOwned>(
    invoker: &dyn Invoke,
    method: &str,
    params: Option<Value>,
) -> Result<Frozen<T>> {
    if method.is_empty() {
        return Err(TetherError::Validation {
            field: "method".to_string(),
            message: "IPC method name must not be empty".to_string(),
        });
    }

    let mut args = Map::new();
    if let Some(params) = params {
        args.insert("params".to_string(), params);
    }

    trace!("IPC invoke {}", method);

    let value = invoker
        .invoke(method, Value::Object(args))
        .await?
        .into_result(method)?;

    let typed: T =
        serde_json::from_value(value).map_err(|e| TetherError::UnexpectedPayload {
            method: method.to_string(),
            message: e.to_string(),
        })?;

    Ok(deep_freeze(typed))
}
