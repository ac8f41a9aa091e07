use percent_encoding::{NON_ALPHANUMERIC, utf8_percent_encode};
use serde::Serialize;

/// Command that opens the chat panel seeded with the hovered text.
pub const ASK_QUESTION_COMMAND: &str = "commentTranslateClaude.askQuestion";
pub const ASK_QUESTION_LABEL: &str = "この内容について質問する";
pub const LOADING_MESSAGE: &str = "翻訳中...";
pub const TIMEOUT_MESSAGE: &str = "翻訳がタイムアウトしました";
pub const FAILURE_PREFIX: &str = "翻訳に失敗しました";

/// Follow-up affordance attached to a translated hover.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FollowUpAction {
    pub title: String,
    pub command: String,
    /// Original hover content handed to the chat panel.
    pub context: String,
}

impl FollowUpAction {
    pub fn ask_question(context: impl Into<String>) -> Self {
        Self {
            title: ASK_QUESTION_LABEL.to_string(),
            command: ASK_QUESTION_COMMAND.to_string(),
            context: context.into(),
        }
    }

    /// `command:` link whose query is the percent-encoded JSON argument list.
    pub fn command_uri(&self) -> String {
        let args = serde_json::json!([self.context]).to_string();
        format!(
            "command:{}?{}",
            self.command,
            utf8_percent_encode(&args, NON_ALPHANUMERIC)
        )
    }

    pub fn markdown_link(&self) -> String {
        format!("[{}]({})", self.title, self.command_uri())
    }
}

/// Hover replacement handed back to the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Hover {
    pub markdown: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<FollowUpAction>,
}

impl Hover {
    pub fn plain(markdown: impl Into<String>) -> Self {
        Self {
            markdown: markdown.into(),
            action: None,
        }
    }

    /// Translated text followed by a rule and the follow-up link.
    pub fn translated(translated: &str, original: &str) -> Self {
        let action = FollowUpAction::ask_question(original);
        Self {
            markdown: format!("{translated}\n\n---\n\n{}", action.markdown_link()),
            action: Some(action),
        }
    }
}
