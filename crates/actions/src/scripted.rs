//! Scripted invoker — replays canned responses and records requests.
//!
//! Useful for testing helpers and for dry runs without an action runtime.

use async_trait::async_trait;
use chatwhisk_core::{ActionError, ActionInvoker, InvokeRequest, InvokeResponse};
use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};

/// An invoker that answers from a queue of scripted responses.
///
/// Each call takes the next response in the queue. When a repeating
/// response is set, it answers every call once the queue is empty;
/// otherwise an exhausted queue is a transport error.
pub struct ScriptedInvoker {
    responses: Mutex<VecDeque<InvokeResponse>>,
    repeat: Option<InvokeResponse>,
    requests: Mutex<Vec<InvokeRequest>>,
}

impl ScriptedInvoker {
    pub fn new(responses: Vec<InvokeResponse>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            repeat: None,
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Answer every call with the same response.
    pub fn always(response: InvokeResponse) -> Self {
        Self {
            repeat: Some(response),
            ..Self::new(Vec::new())
        }
    }

    /// Every request received so far, in order.
    pub fn requests(&self) -> Vec<InvokeRequest> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// The `index`-th request received, if any.
    pub fn request(&self, index: usize) -> Option<InvokeRequest> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(index)
            .cloned()
    }

    pub fn call_count(&self) -> usize {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

#[async_trait]
impl ActionInvoker for ScriptedInvoker {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn invoke(&self, request: InvokeRequest) -> Result<InvokeResponse, ActionError> {
        let name = request.name.clone();
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(request);

        let next = self
            .responses
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front();

        next.or_else(|| self.repeat.clone()).ok_or_else(|| {
            ActionError::Transport(format!("no scripted response left for {name}"))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn responses_are_replayed_in_order() {
        let invoker = ScriptedInvoker::new(vec![
            InvokeResponse::ok(json!("first")),
            InvokeResponse::ok(json!("second")),
        ]);

        let first = invoker.invoke(InvokeRequest::blocking("a", json!({}))).await.unwrap();
        let second = invoker.invoke(InvokeRequest::blocking("b", json!({}))).await.unwrap();
        assert_eq!(first.into_result(), json!("first"));
        assert_eq!(second.into_result(), json!("second"));

        assert_eq!(invoker.call_count(), 2);
        assert_eq!(invoker.request(1).unwrap().name, "b");
    }

    #[tokio::test]
    async fn exhausted_queue_is_a_transport_error() {
        let invoker = ScriptedInvoker::new(vec![]);
        let err = invoker
            .invoke(InvokeRequest::blocking("pkg/datastore", json!({})))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("pkg/datastore"));
        assert_eq!(invoker.call_count(), 1);
    }

    #[tokio::test]
    async fn repeating_response_answers_every_call() {
        let invoker = ScriptedInvoker::always(InvokeResponse::ok(json!([])));
        for _ in 0..3 {
            assert!(invoker.invoke(InvokeRequest::blocking("a", json!({}))).await.is_ok());
        }
        assert_eq!(invoker.requests().len(), 3);
    }
}
