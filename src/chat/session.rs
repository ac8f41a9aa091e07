use std::sync::Arc;

use super::transcript::{MAX_TURNS, Transcript};
use crate::api::{ChatTurn, MessagesRequest, Transport, decode_reply_text};
use crate::error::{Error, Result};
use crate::translation::DEFAULT_MAX_TOKENS;

pub const DEFAULT_CHAT_MODEL: &str = "claude-3-opus-20240229";

/// Settings for multi-turn chat requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatOptions {
    pub model: String,
    pub max_tokens: u32,
}

impl Default for ChatOptions {
    fn default() -> Self {
        Self {
            model: DEFAULT_CHAT_MODEL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }
}

/// A conversation with the model.
///
/// Owns the transcript; every send carries the whole transcript as context.
pub struct ChatSession {
    transport: Arc<dyn Transport>,
    options: ChatOptions,
    transcript: Transcript,
}

impl ChatSession {
    pub fn new(transport: Arc<dyn Transport>, options: ChatOptions) -> Self {
        Self {
            transport,
            options,
            transcript: Transcript::new(),
        }
    }

    pub const fn options(&self) -> &ChatOptions {
        &self.options
    }

    pub const fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    /// Drops the conversation history.
    pub fn reset(&mut self) {
        self.transcript.clear();
    }

    /// Sends `text` as the next user turn and returns the assistant's reply.
    ///
    /// The user turn is recorded before the request goes out and stays in
    /// the transcript when the exchange fails. The request carries every
    /// recorded turn; the transcript is trimmed to [`MAX_TURNS`] only after
    /// the assistant turn is appended. There is no timeout here.
    pub async fn send(&mut self, text: &str, api_key: &str) -> Result<String> {
        if api_key.is_empty() {
            return Err(Error::MissingApiKey);
        }

        self.transcript.push(ChatTurn::user(text));

        let request = MessagesRequest {
            model: self.options.model.clone(),
            max_tokens: self.options.max_tokens,
            messages: self.transcript.to_messages(),
        };
        tracing::debug!(
            model = %request.model,
            turns = request.messages.len(),
            "sending chat message"
        );

        let response = self.transport.post(api_key, &request).await?;
        let reply = decode_reply_text(response)?;

        self.transcript.push(ChatTurn::assistant(reply.as_str()));
        self.transcript.truncate_to_recent(MAX_TURNS);
        Ok(reply)
    }
}
