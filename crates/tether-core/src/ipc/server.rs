//! Backend side of the IPC bridge.
//!
//! A backend implements [`IpcDispatch`] and hands it to [`IpcServer::start`].
//! Each request is unwrapped into a [`Call`] (method plus the payload the
//! caller put under `params`), and the [`Envelope`] the backend answers with
//! goes back to the caller as is. A backend can therefore report a failure as
//! a bare string, exactly like the envelopes `ipc_invoke` expects.
//!
//! Every connection is served by its own task in a `JoinSet`; a semaphore
//! caps how many are open at once.

use super::protocol::{read_frame, write_frame, Envelope, IpcRequest, IpcResponse};
use crate::config::IpcConfig;
use crate::{Result, TetherError};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{watch, Semaphore};
use tokio::task::{JoinHandle, JoinSet};
use tracing::{debug, error, info, trace, warn};

/// One incoming call, unwrapped from its request.
#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    method: String,
    params: Value,
}

impl Call {
    /// Build a call from the argument object a caller sent.
    ///
    /// The payload lives under `args["params"]`; a call sent without one has
    /// `Value::Null` params.
    pub fn new(method: impl Into<String>, args: Value) -> Self {
        let params = match args {
            Value::Object(mut map) => map.remove("params").unwrap_or(Value::Null),
            _ => Value::Null,
        };
        Self {
            method: method.into(),
            params,
        }
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    /// Split the method name at its first `_`: `get_person` routes to
    /// `("get", "person")`, `list_persons` to `("list", "persons")`.
    pub fn route(&self) -> Option<(&str, &str)> {
        self.method
            .split_once('_')
            .filter(|(verb, entity)| !verb.is_empty() && !entity.is_empty())
    }

    pub fn raw_params(&self) -> &Value {
        &self.params
    }

    /// Decode the payload into the shape this method expects.
    pub fn params<T: DeserializeOwned>(&self) -> Result<T> {
        T::deserialize(&self.params).map_err(|e| TetherError::InvalidParams {
            message: format!("{}: {}", self.method, e),
        })
    }
}

/// Answers calls on behalf of a backend.
///
/// `Envelope` implements `From<Result<Value>>`, so a dispatcher written
/// against `Result` can end with `.into()`.
#[async_trait::async_trait]
pub trait IpcDispatch: Send + Sync + 'static {
    async fn dispatch(&self, call: Call) -> Envelope;
}

/// Handle to a running server. Dropping it stops the server.
pub struct IpcServerHandle {
    addr: SocketAddr,
    stop: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl IpcServerHandle {
    /// Address the server is bound to.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Stop accepting and close every open connection.
    pub fn shutdown(&self) {
        self.stop.send_replace(true);
    }
}

impl Drop for IpcServerHandle {
    fn drop(&mut self) {
        self.shutdown();
        self.task.abort();
    }
}

/// Listener plus the shared state every connection needs.
pub struct IpcServer<D> {
    listener: TcpListener,
    dispatch: Arc<D>,
    slots: Arc<Semaphore>,
    stop: watch::Receiver<bool>,
}

impl<D: IpcDispatch> IpcServer<D> {
    /// Bind `addr` (port 0 picks a free port) and serve in the background.
    pub async fn start(addr: SocketAddr, dispatch: Arc<D>) -> Result<IpcServerHandle> {
        let listener = TcpListener::bind(addr).await?;
        let addr = listener.local_addr()?;
        let (stop_tx, stop) = watch::channel(false);

        let server = Self {
            listener,
            dispatch,
            slots: Arc::new(Semaphore::new(IpcConfig::MAX_CONNECTIONS)),
            stop,
        };
        let task = tokio::spawn(server.serve());

        info!("IPC server listening on {}", addr);

        Ok(IpcServerHandle {
            addr,
            stop: stop_tx,
            task,
        })
    }

    async fn serve(self) {
        let mut stop = self.stop.clone();
        let mut sessions = JoinSet::new();

        loop {
            tokio::select! {
                _ = stop.changed() => break,
                accepted = self.listener.accept() => match accepted {
                    Ok((stream, peer)) => self.admit(&mut sessions, stream, peer),
                    Err(e) => error!("IPC accept error: {}", e),
                },
                Some(_) = sessions.join_next(), if !sessions.is_empty() => {}
            }
        }

        info!(
            "IPC server on {:?} stopping, closing {} connections",
            self.listener.local_addr().ok(),
            sessions.len()
        );
        sessions.shutdown().await;
    }

    fn admit(&self, sessions: &mut JoinSet<()>, stream: TcpStream, peer: SocketAddr) {
        let Ok(slot) = Arc::clone(&self.slots).try_acquire_owned() else {
            warn!(
                "Rejecting IPC connection from {}: {} connections already open",
                peer,
                IpcConfig::MAX_CONNECTIONS
            );
            return;
        };

        let session = Session {
            dispatch: Arc::clone(&self.dispatch),
            peer,
        };
        let stop = self.stop.clone();

        sessions.spawn(async move {
            let _slot = slot;
            debug!("IPC connection from {}", peer);
            match session.run(stream, stop).await {
                Ok(()) => debug!("IPC connection {} closed", peer),
                Err(e) => debug!("IPC connection {} ended: {}", peer, e),
            }
        });
    }
}

/// One client connection.
struct Session<D> {
    dispatch: Arc<D>,
    peer: SocketAddr,
}

impl<D: IpcDispatch> Session<D> {
    async fn run(&self, mut stream: TcpStream, mut stop: watch::Receiver<bool>) -> Result<()> {
        loop {
            let frame = tokio::select! {
                frame = read_frame(&mut stream) => frame?,
                _ = stop.changed() => return Ok(()),
            };
            let Some(frame) = frame else {
                return Ok(());
            };

            let response = self.answer(&frame).await;
            write_frame(&mut stream, &serde_json::to_vec(&response)?).await?;
        }
    }

    async fn answer(&self, frame: &[u8]) -> IpcResponse {
        let raw: Value = match serde_json::from_slice(frame) {
            Ok(raw) => raw,
            Err(e) => {
                return IpcResponse::rejected(
                    None,
                    IpcResponse::PARSE_ERROR,
                    format!("Parse error: {}", e),
                )
            }
        };

        // Salvage the id so even a malformed request gets a matched reply
        let id = Option::<u64>::deserialize(&raw["id"]).ok().flatten();

        let request: IpcRequest = match serde_json::from_value(raw) {
            Ok(request) => request,
            Err(e) => {
                return IpcResponse::rejected(
                    id,
                    IpcResponse::INVALID_REQUEST,
                    format!("Invalid Request: {}", e),
                )
            }
        };

        if request.jsonrpc != IpcConfig::JSONRPC_VERSION {
            return IpcResponse::rejected(
                Some(request.id),
                IpcResponse::INVALID_REQUEST,
                format!("Invalid Request: expected jsonrpc {}", IpcConfig::JSONRPC_VERSION),
            );
        }

        trace!("IPC call {} from {}", request.method, self.peer);

        let call = Call::new(request.method, request.params.unwrap_or(Value::Null));
        IpcResponse::reply(request.id, self.dispatch.dispatch(call).await)
    }
}
