//! Scripted invocation primitive for unit tests.

use super::invoke::Invoke;
use super::protocol::Envelope;
use crate::{Result, TetherError};
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::Mutex;

/// Replays queued envelopes in order and records every call it receives.
#[derive(Default)]
pub struct ScriptedInvoker {
    replies: Mutex<VecDeque<Result<Envelope>>>,
    calls: Mutex<Vec<(String, Value)>>,
}

impl ScriptedInvoker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a raw JSON envelope as the next reply.
    pub fn push_envelope(&self, raw: Value) {
        let envelope: Envelope = serde_json::from_value(raw).unwrap();
        self.replies.lock().unwrap().push_back(Ok(envelope));
    }

    /// Queue a transport failure as the next reply.
    pub fn push_error(&self, err: TetherError) {
        self.replies.lock().unwrap().push_back(Err(err));
    }

    pub fn calls(&self) -> Vec<(String, Value)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl Invoke for ScriptedInvoker {
    async fn invoke(&self, method: &str, args: Value) -> Result<Envelope> {
        self.calls
            .lock()
            .unwrap()
            .push((method.to_string(), args));

        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(TetherError::Other(format!("no scripted reply for {}", method))))
    }
}
