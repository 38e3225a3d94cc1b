//! Relay test doubles
//!
//! Enabled with the `test-utils` feature. [`StaticRelay`] answers from a
//! queue; [`ScriptedRelay`] hands each call to the test so it can decide when
//! and how to answer, which is what stale-result tests need.

use crate::RelayError;
use crate::types::{Relay, RelayRequest};
use async_trait::async_trait;
use serde_json::{Value, json};
use std::collections::VecDeque;
use std::sync::Mutex;
use tokio::sync::{mpsc, oneshot};

/// Wrap `text` in the minimal generateContent response shape.
#[must_use]
pub fn candidate_response(text: &str) -> Value {
    json!({
        "candidates": [
            { "content": { "role": "model", "parts": [ { "text": text } ] } }
        ]
    })
}

/// Relay that replies from a fixed queue and records every request.
#[derive(Debug, Default)]
pub struct StaticRelay {
    responses: Mutex<VecDeque<Result<Value, RelayError>>>,
    requests: Mutex<Vec<RelayRequest>>,
}

impl StaticRelay {
    #[must_use]
    pub fn new(responses: impl IntoIterator<Item = Result<Value, RelayError>>) -> Self {
        Self {
            responses: Mutex::new(responses.into_iter().collect()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Queue one response containing `text` as the model output.
    #[must_use]
    pub fn with_text(self, text: &str) -> Self {
        self.push(Ok(candidate_response(text)));
        self
    }

    pub fn push(&self, response: Result<Value, RelayError>) {
        self.responses
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push_back(response);
    }

    /// Requests seen so far, oldest first.
    #[must_use]
    pub fn requests(&self) -> Vec<RelayRequest> {
        self.requests
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    #[must_use]
    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap_or_else(|e| e.into_inner()).len()
    }
}

#[async_trait]
impl Relay for StaticRelay {
    async fn forward(&self, request: RelayRequest) -> Result<Value, RelayError> {
        self.requests
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(request);
        self.responses
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .pop_front()
            .unwrap_or_else(|| Err(RelayError::Internal("no scripted response left".to_string())))
    }
}

/// A call held by [`ScriptedRelay`] until the test answers it.
#[derive(Debug)]
pub struct PendingCall {
    pub request: RelayRequest,
    responder: oneshot::Sender<Result<Value, RelayError>>,
}

impl PendingCall {
    /// Answer the call. Ignored if the caller has gone away.
    pub fn respond(self, response: Result<Value, RelayError>) {
        let _ = self.responder.send(response);
    }

    pub fn respond_text(self, text: &str) {
        self.respond(Ok(candidate_response(text)));
    }
}

/// Relay whose calls block until the paired [`RelayController`] answers them.
#[derive(Debug, Clone)]
pub struct ScriptedRelay {
    calls: mpsc::UnboundedSender<PendingCall>,
}

/// Test-side handle of a [`ScriptedRelay`].
#[derive(Debug)]
pub struct RelayController {
    calls: mpsc::UnboundedReceiver<PendingCall>,
}

impl ScriptedRelay {
    #[must_use]
    pub fn new() -> (Self, RelayController) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { calls: tx }, RelayController { calls: rx })
    }
}

impl RelayController {
    /// Wait for the next call made through the relay.
    ///
    /// Returns `None` once every `ScriptedRelay` clone has been dropped.
    pub async fn next_call(&mut self) -> Option<PendingCall> {
        self.calls.recv().await
    }
}

#[async_trait]
impl Relay for ScriptedRelay {
    async fn forward(&self, request: RelayRequest) -> Result<Value, RelayError> {
        let (responder, response) = oneshot::channel();
        self.calls
            .send(PendingCall { request, responder })
            .map_err(|_| RelayError::Internal("relay controller dropped".to_string()))?;
        response
            .await
            .map_err(|_| RelayError::Internal("call dropped without a response".to_string()))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_static_relay_drains_queue() {
        let relay = StaticRelay::default().with_text("one");
        let first = relay.forward(RelayRequest::post(json!({}))).await.unwrap();
        assert_eq!(first, candidate_response("one"));

        let second = relay.forward(RelayRequest::post(json!({}))).await;
        assert!(matches!(second, Err(RelayError::Internal(_))));
        assert_eq!(relay.call_count(), 2);
    }

    #[tokio::test]
    async fn test_scripted_relay_waits_for_answer() {
        let (relay, mut controller) = ScriptedRelay::new();
        let handle =
            tokio::spawn(async move { relay.forward(RelayRequest::post(json!({"n": 1}))).await });

        let call = controller.next_call().await.unwrap();
        assert_eq!(call.request.payload, Some(json!({"n": 1})));
        call.respond_text("done");

        let result = handle.await.unwrap().unwrap();
        assert_eq!(result, candidate_response("done"));
    }

    #[tokio::test]
    async fn test_dropped_call_is_internal_error() {
        let (relay, mut controller) = ScriptedRelay::new();
        let handle =
            tokio::spawn(async move { relay.forward(RelayRequest::post(json!({}))).await });

        drop(controller.next_call().await.unwrap());
        assert!(matches!(handle.await.unwrap(), Err(RelayError::Internal(_))));
    }
}
