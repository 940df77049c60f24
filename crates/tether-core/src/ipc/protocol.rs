//! Shared IPC protocol types and framing.
//!
//! The invocation primitive answers every call with an [`Envelope`]. Over the
//! local TCP bridge the envelope's members are flattened into a JSON-RPC 2.0
//! response, and every message is framed with a 4-byte big-endian length
//! prefix:
//!
//! ```text
//! [u32 BE: len][UTF-8 JSON bytes of len]
//! ```

use crate::config::IpcConfig;
use crate::{Result, TetherError};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::io::ErrorKind;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

/// Failure descriptor carried by an envelope.
///
/// Backends send either a bare message string or a JSON-RPC error object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ErrorDescriptor {
    Message(String),
    Detailed {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        code: Option<i32>,
        message: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        data: Option<Value>,
    },
}

impl ErrorDescriptor {
    pub fn message(&self) -> &str {
        match self {
            ErrorDescriptor::Message(message) => message,
            ErrorDescriptor::Detailed { message, .. } => message,
        }
    }

    pub fn code(&self) -> Option<i32> {
        match self {
            ErrorDescriptor::Message(_) => None,
            ErrorDescriptor::Detailed { code, .. } => *code,
        }
    }
}

impl From<ErrorDescriptor> for TetherError {
    fn from(descriptor: ErrorDescriptor) -> Self {
        match descriptor {
            ErrorDescriptor::Message(message) => TetherError::backend(message, None),
            ErrorDescriptor::Detailed { code, message, .. } => TetherError::backend(message, code),
        }
    }
}

/// Raw success/error wrapper returned by one remote call.
///
/// `result` is the only success field name; a JSON `null` result counts as
/// absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorDescriptor>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
}

impl Envelope {
    pub fn success(result: Value) -> Self {
        Self {
            error: None,
            result: Some(result),
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            error: Some(ErrorDescriptor::Message(error.into())),
            result: None,
        }
    }

    /// Split the envelope into its payload or the failure it reports.
    ///
    /// An error wins over any result that came with it; an envelope with
    /// neither is a backend contract violation.
    pub fn into_result(self, method: &str) -> Result<Value> {
        if let Some(error) = self.error {
            return Err(error.into());
        }

        self.result.ok_or_else(|| TetherError::MalformedEnvelope {
            method: method.to_string(),
        })
    }
}

/// Backends answer with a `Result`; plain backend messages go out as bare
/// strings, everything else as an error object carrying its RPC code.
impl From<Result<Value>> for Envelope {
    fn from(outcome: Result<Value>) -> Self {
        match outcome {
            Ok(value) => Envelope::success(value),
            Err(TetherError::Backend {
                message,
                code: None,
            }) => Envelope::failure(message),
            Err(err) => Envelope {
                error: Some(ErrorDescriptor::Detailed {
                    code: Some(err.to_rpc_error_code()),
                    message: err.to_string(),
                    data: None,
                }),
                result: None,
            },
        }
    }
}

/// One call as it travels to the backend peer.
///
/// `params` holds the argument object built by the caller, i.e. with the
/// payload already nested under its own `params` key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IpcRequest {
    pub jsonrpc: String,
    pub id: u64,
    pub method: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
}

impl IpcRequest {
    pub fn new(id: u64, method: impl Into<String>, args: Value) -> Self {
        Self {
            jsonrpc: IpcConfig::JSONRPC_VERSION.to_string(),
            id,
            method: method.into(),
            params: Some(args),
        }
    }
}

/// The backend's answer: a JSON-RPC 2.0 response whose `result`/`error`
/// members are exactly the call's [`Envelope`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IpcResponse {
    pub jsonrpc: String,
    /// `None` only when the request was too broken to carry an id.
    pub id: Option<u64>,
    #[serde(flatten)]
    pub envelope: Envelope,
}

impl IpcResponse {
    /// Frame was not valid JSON.
    pub const PARSE_ERROR: i32 = -32700;
    /// JSON, but not a request this peer understands.
    pub const INVALID_REQUEST: i32 = -32600;

    /// Answer request `id` with whatever the backend produced.
    pub fn reply(id: u64, envelope: Envelope) -> Self {
        Self {
            jsonrpc: IpcConfig::JSONRPC_VERSION.to_string(),
            id: Some(id),
            envelope,
        }
    }

    /// Refuse a frame before it reaches the backend.
    pub fn rejected(id: Option<u64>, code: i32, message: impl Into<String>) -> Self {
        Self {
            jsonrpc: IpcConfig::JSONRPC_VERSION.to_string(),
            id,
            envelope: Envelope {
                error: Some(ErrorDescriptor::Detailed {
                    code: Some(code),
                    message: message.into(),
                    data: None,
                }),
                result: None,
            },
        }
    }
}

fn check_frame_len(len: usize) -> Result<()> {
    if len > IpcConfig::MAX_MESSAGE_SIZE {
        return Err(TetherError::Validation {
            field: "ipc_frame".to_string(),
            message: format!(
                "frame of {} bytes exceeds the {} byte limit",
                len,
                IpcConfig::MAX_MESSAGE_SIZE
            ),
        });
    }
    Ok(())
}

/// Read one frame. `None` means the peer closed the stream between frames.
pub async fn read_frame<R: AsyncRead + Unpin>(reader: &mut R) -> Result<Option<Vec<u8>>> {
    let len = match reader.read_u32().await {
        Ok(len) => len as usize,
        Err(e) if e.kind() == ErrorKind::UnexpectedEof => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    check_frame_len(len)?;

    let mut payload = vec![0u8; len];
    reader.read_exact(&mut payload).await?;
    Ok(Some(payload))
}

/// Write one frame. Oversized payloads are refused before any byte is sent.
pub async fn write_frame<W: AsyncWrite + Unpin>(writer: &mut W, payload: &[u8]) -> Result<()> {
    check_frame_len(payload.len())?;

    let mut frame = Vec::with_capacity(4 + payload.len());
    frame.extend_from_slice(&(payload.len() as u32).to_be_bytes());
    frame.extend_from_slice(payload);

    writer.write_all(&frame).await?;
    writer.flush().await?;
    Ok(())
}
