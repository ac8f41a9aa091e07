use std::sync::Arc;
use std::time::Duration;

use super::postprocess;
use super::prompt::build_instruction;
use crate::api::{MessagesRequest, Transport, decode_reply_text};
use crate::error::{Error, Result};

pub const DEFAULT_TRANSLATION_MODEL: &str = "claude-3-5-sonnet-20240620";
pub const DEFAULT_MAX_TOKENS: u32 = 1000;
pub const DEFAULT_TARGET_LANGUAGE: &str = "Japanese";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(10_000);

/// Settings for single-shot translation requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationOptions {
    pub model: String,
    pub max_tokens: u32,
    /// Language name substituted into the instruction template.
    pub target_language: String,
    /// How long to wait for the API before giving up.
    pub timeout: Duration,
}

impl Default for TranslationOptions {
    fn default() -> Self {
        Self {
            model: DEFAULT_TRANSLATION_MODEL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            target_language: DEFAULT_TARGET_LANGUAGE.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// Translates hover text with one request per call.
#[derive(Clone)]
pub struct TranslationClient {
    transport: Arc<dyn Transport>,
    options: TranslationOptions,
}

impl TranslationClient {
    pub fn new(transport: Arc<dyn Transport>, options: TranslationOptions) -> Self {
        Self { transport, options }
    }

    pub const fn options(&self) -> &TranslationOptions {
        &self.options
    }

    /// Wraps `text` in the instruction template as a single user turn.
    pub fn build_request(&self, text: &str) -> MessagesRequest {
        MessagesRequest::single(
            self.options.model.as_str(),
            self.options.max_tokens,
            build_instruction(&self.options.target_language, text),
        )
    }

    /// Translates `text` and post-processes the result.
    ///
    /// The request races a timer. If the timer fires first the call returns
    /// [`Error::Timeout`] and the in-flight request is left to finish on its
    /// own; its result is dropped. No retries.
    pub async fn translate(&self, text: &str, api_key: &str) -> Result<String> {
        if api_key.is_empty() {
            return Err(Error::MissingApiKey);
        }

        let request = self.build_request(text);
        tracing::debug!(
            model = %request.model,
            chars = text.chars().count(),
            "translating"
        );

        let transport = Arc::clone(&self.transport);
        let api_key = api_key.to_owned();
        let pending = tokio::spawn(async move { transport.post(&api_key, &request).await });

        // Dropping the JoinHandle detaches the task rather than aborting it.
        let response = match tokio::time::timeout(self.options.timeout, pending).await {
            Err(_) => {
                tracing::warn!(
                    timeout_ms = self.options.timeout.as_millis() as u64,
                    "translation timed out"
                );
                return Err(Error::Timeout(self.options.timeout));
            }
            Ok(Err(join_error)) => {
                return Err(Error::Network(format!("request task failed: {join_error}")));
            }
            Ok(Ok(result)) => result?,
        };

        let raw = decode_reply_text(response)?;
        tracing::trace!(%raw, "raw translation");

        let processed = postprocess::process(&raw);
        tracing::debug!(chars = processed.chars().count(), "translation processed");
        Ok(processed)
    }
}
