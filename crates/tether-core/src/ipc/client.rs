//! TCP invocation primitive.
//!
//! [`IpcClient`] implements [`Invoke`] over one TCP connection to a backend
//! peer. Calls share the connection and take turns on it; a call holds the
//! stream from writing its request until it has read the matching reply.
//!
//! # Cancellation
//!
//! A caller may drop a call at any point, typically by wrapping it in
//! `tokio::time::timeout`. The stream is moved out of the client for the
//! length of each exchange and only returned once the reply was read, so an
//! abandoned exchange takes its half-used connection with it. The next call
//! opens a fresh connection and never sees the stale reply.

use super::invoke::Invoke;
use super::protocol::{read_frame, write_frame, Envelope, IpcRequest, IpcResponse};
use crate::config::IpcConfig;
use crate::{Result, TetherError};
use serde_json::Value;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::net::TcpStream;
use tokio::sync::Mutex;
use tracing::debug;

/// IPC client bound to one backend peer.
#[derive(Debug)]
pub struct IpcClient {
    addr: SocketAddr,
    /// Empty while an exchange is in flight, and after one was abandoned or
    /// failed.
    stream: Mutex<Option<TcpStream>>,
    next_id: AtomicU64,
}

impl IpcClient {
    /// Connect to a backend peer.
    ///
    /// Connecting, and reconnecting later, is bounded by
    /// `IpcConfig::CONNECT_TIMEOUT`; calls themselves wait as long as the
    /// peer takes.
    pub async fn connect(addr: SocketAddr) -> Result<Self> {
        let stream = Self::open(addr).await?;
        debug!("IPC client connected to {}", addr);

        Ok(Self {
            addr,
            stream: Mutex::new(Some(stream)),
            next_id: AtomicU64::new(1),
        })
    }

    /// Address of the backend peer.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    async fn open(addr: SocketAddr) -> Result<TcpStream> {
        match tokio::time::timeout(IpcConfig::CONNECT_TIMEOUT, TcpStream::connect(addr)).await {
            Ok(Ok(stream)) => Ok(stream),
            Ok(Err(e)) => {
                debug!("IPC connect to {} failed: {}", addr, e);
                Err(TetherError::ConnectionLost { addr })
            }
            Err(_) => {
                debug!("IPC connect to {} timed out", addr);
                Err(TetherError::ConnectionLost { addr })
            }
        }
    }

    async fn exchange(&self, request: &IpcRequest) -> Result<IpcResponse> {
        let payload = serde_json::to_vec(request)?;

        let mut slot = self.stream.lock().await;
        let mut stream = match slot.take() {
            Some(stream) => stream,
            None => {
                debug!("Reopening IPC connection to {}", self.addr);
                Self::open(self.addr).await?
            }
        };

        let reply = self.round_trip(&mut stream, &payload).await?;
        let response: IpcResponse =
            serde_json::from_slice(&reply).map_err(|e| TetherError::Json {
                message: format!("Failed to parse IPC response: {}", e),
                source: Some(e),
            })?;

        if response.id != Some(request.id) {
            // Out of step with the peer; the stream is not put back.
            return Err(TetherError::Other(format!(
                "IPC response id {:?} does not match request id {}",
                response.id, request.id
            )));
        }

        *slot = Some(stream);
        Ok(response)
    }

    async fn round_trip(&self, stream: &mut TcpStream, payload: &[u8]) -> Result<Vec<u8>> {
        let lost = || TetherError::ConnectionLost { addr: self.addr };

        write_frame(stream, payload).await.map_err(|e| match e {
            TetherError::Io { .. } => lost(),
            other => other,
        })?;

        read_frame(stream).await.map_err(|_| lost())?.ok_or_else(lost)
    }
}

#[async_trait::async_trait]
impl Invoke for IpcClient {
    async fn invoke(&self, method: &str, args: Value) -> Result<Envelope> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let request = IpcRequest::new(id, method, args);

        Ok(self.exchange(&request).await?.envelope)
    }
}
