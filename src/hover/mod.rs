//! Hover interception: decides whether to translate a hover and renders the result.

mod comment;
mod controller;
mod render;

use serde::{Deserialize, Serialize};

pub use comment::{COMMENT_TOKENS, is_comment_line};
pub use controller::{HoverOutcome, HoverTranslationController};
pub use render::{
    ASK_QUESTION_COMMAND, ASK_QUESTION_LABEL, FAILURE_PREFIX, FollowUpAction, Hover,
    LOADING_MESSAGE, TIMEOUT_MESSAGE,
};

/// Which hovers get translated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HoverPolicy {
    /// Every hover with content.
    #[default]
    Always,
    /// Only hovers over a line that starts with a comment token.
    CommentOnly,
}
