//! Error kinds produced by the translation and chat pipelines.

use std::time::Duration;

/// Failures of a single translation or chat exchange.
///
/// The `Display` output is what controllers show to the user.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(
        "API key is not set. Add `api_key` to the [comment_translate] section \
         of the config file or export ANTHROPIC_API_KEY."
    )]
    MissingApiKey,

    /// The configured key cannot be sent as an HTTP header value.
    #[error(
        "API key is invalid: it contains characters that cannot be sent in a header. \
         Check `api_key` in the [comment_translate] section or the API key environment variable."
    )]
    InvalidApiKey,

    #[error("translation timed out after {} ms", .0.as_millis())]
    Timeout(Duration),

    #[error("API request failed with status {status}: {body}")]
    Api { status: u16, body: String },

    #[error("invalid response data from API: {0}")]
    InvalidResponseShape(String),

    #[error("failed to reach API: {0}")]
    Network(String),
}

pub type Result<T> = std::result::Result<T, Error>;
