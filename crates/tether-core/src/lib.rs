//! Tether - typed CRUD controllers over a JSON IPC bridge.
//!
//! UI-side code talks to a backend process through controllers. A controller
//! names remote methods by convention (`get_person`, `list_persons`, ...),
//! sends the call through an injected invocation primitive, and hands back
//! either a frozen, typed value or a [`TetherError`].
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use tether_core::{IpcClient, Page, PersonController};
//!
//! #[tokio::main]
//! async fn main() -> tether_core::Result<()> {
//!     let client = IpcClient::connect("127.0.0.1:7431".parse().unwrap()).await?;
//!     let persons = PersonController::new(Arc::new(client));
//!
//!     let page = persons.list(Some(Page::first(10))).await?;
//!     println!("Found {} persons", page.len());
//!
//!     let person = persons.get(&page[0].id).await?;
//!     println!("{} {}", person.name.first, person.name.last);
//!
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod controller;
pub mod error;
pub mod freeze;
pub mod ipc;
pub mod models;

pub use controller::{Controller, PagedList, Pager, PersonController, Verb};
pub use error::{Result, TetherError};
pub use freeze::{deep_freeze, Frozen};
pub use ipc::{
    ipc_invoke, Call, Envelope, Invoke, IpcClient, IpcDispatch, IpcServer, IpcServerHandle,
};
pub use models::{Name, Page, Person, PersonForCreate, PersonForUpdate, RecordId};
