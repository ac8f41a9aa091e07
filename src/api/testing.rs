//! Scripted transport for exercising clients without a network.

#![allow(clippy::unwrap_used)]

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use super::{MessagesRequest, RawResponse, Transport};
use crate::error::{Error, Result};

pub fn reply_body(text: &str) -> String {
    serde_json::json!({
        "id": "msg_test",
        "type": "message",
        "role": "assistant",
        "content": [{"type": "text", "text": text}],
        "model": "claude-test",
        "stop_reason": "end_turn",
        "stop_sequence": null,
        "usage": {"input_tokens": 1, "output_tokens": 1}
    })
    .to_string()
}

struct Step {
    delay: Duration,
    outcome: Result<RawResponse>,
}

/// Replays queued outcomes in order and records every request it sees.
#[derive(Clone, Default)]
pub struct ScriptedTransport {
    steps: Arc<Mutex<VecDeque<Step>>>,
    requests: Arc<Mutex<Vec<MessagesRequest>>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a successful reply whose first content block is `text`.
    pub fn reply(self, text: &str) -> Self {
        self.reply_after(Duration::ZERO, text)
    }

    pub fn reply_after(self, delay: Duration, text: &str) -> Self {
        self.push(
            delay,
            Ok(RawResponse {
                status: 200,
                body: reply_body(text),
            }),
        )
    }

    pub fn status(self, status: u16, body: &str) -> Self {
        self.push(
            Duration::ZERO,
            Ok(RawResponse {
                status,
                body: body.to_string(),
            }),
        )
    }

    pub fn body(self, body: &str) -> Self {
        self.status(200, body)
    }

    pub fn network_error(self, message: &str) -> Self {
        self.push(Duration::ZERO, Err(Error::Network(message.to_string())))
    }

    fn push(self, delay: Duration, outcome: Result<RawResponse>) -> Self {
        self.steps.lock().unwrap().push_back(Step { delay, outcome });
        self
    }

    pub fn requests(&self) -> Vec<MessagesRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn post(&self, _api_key: &str, request: &MessagesRequest) -> Result<RawResponse> {
        self.requests.lock().unwrap().push(request.clone());
        let step = self.steps.lock().unwrap().pop_front();
        let Some(step) = step else {
            return Err(Error::Network("no scripted response left".to_string()));
        };
        if !step.delay.is_zero() {
            tokio::time::sleep(step.delay).await;
        }
        step.outcome
    }
}
