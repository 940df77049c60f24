//! IPC bridge between controllers and the backend process.
//!
//! # Architecture
//!
//! - **Invoke**: the injected invocation primitive; one call, one envelope
//! - **ipc_invoke**: normalizes envelopes into frozen values or errors
//! - **Client**: TCP implementation of `Invoke` using length-prefixed JSON-RPC 2.0
//! - **Server**: peer loop that unwraps calls for a backend and sends its
//!   envelopes back
//! - **Protocol**: shared envelope, JSON-RPC and framing types

pub mod client;
pub mod invoke;
pub mod protocol;
pub mod server;

#[cfg(test)]
pub(crate) mod testing;

pub use client::IpcClient;
pub use invoke::{ipc_invoke, Invoke};
pub use protocol::{Envelope, ErrorDescriptor, IpcRequest, IpcResponse};
pub use server::{Call, IpcDispatch, IpcServer, IpcServerHandle};
