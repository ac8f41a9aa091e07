//! Wire types and HTTP transport for the Anthropic Messages API.

mod message;
mod reply;
mod transport;

#[cfg(test)]
pub(crate) mod testing;

pub use message::{ChatTurn, MessagesRequest, Role};
pub use reply::{ApiReply, ContentBlock, ShapeError, Usage, decode_reply_text, validate};
pub use transport::{API_VERSION, ENDPOINT, HttpTransport, RawResponse, Transport};
