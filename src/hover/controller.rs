use std::sync::Arc;

use super::HoverPolicy;
use super::comment::is_comment_line;
use super::render::{FAILURE_PREFIX, Hover, TIMEOUT_MESSAGE};
use crate::config::ApiKeySource;
use crate::error::Error;
use crate::translation::TranslationClient;

/// Terminal state of one hover invocation.
#[derive(Debug)]
pub enum HoverOutcome {
    /// No content, or the policy filtered the line out. No request was made.
    Skipped,
    Succeeded { original: String, translated: String },
    TimedOut,
    Failed(Error),
}

impl HoverOutcome {
    /// The hover to show instead of the host's, if any.
    pub fn render(&self) -> Option<Hover> {
        match self {
            Self::Skipped => None,
            Self::Succeeded {
                original,
                translated,
            } => Some(Hover::translated(translated, original)),
            Self::TimedOut => Some(Hover::plain(TIMEOUT_MESSAGE)),
            Self::Failed(e) => Some(Hover::plain(format!("{FAILURE_PREFIX}: {e}"))),
        }
    }
}

/// Replaces host hovers with their translation.
#[derive(Clone)]
pub struct HoverTranslationController {
    client: TranslationClient,
    keys: Arc<dyn ApiKeySource>,
    policy: HoverPolicy,
}

impl HoverTranslationController {
    pub fn new(client: TranslationClient, keys: Arc<dyn ApiKeySource>, policy: HoverPolicy) -> Self {
        Self {
            client,
            keys,
            policy,
        }
    }

    pub const fn policy(&self) -> HoverPolicy {
        self.policy
    }

    /// Flattens the host's content blocks into one text, or `None` if
    /// there is nothing to translate at this position.
    pub fn hover_text(&self, contents: &[String], line: &str) -> Option<String> {
        let text = contents.join("\n");
        if text.trim().is_empty() {
            return None;
        }
        if self.policy == HoverPolicy::CommentOnly && !is_comment_line(line) {
            return None;
        }
        Some(text)
    }

    /// Runs one hover through translation.
    ///
    /// `contents` is the host's rendered hover for the position and `line`
    /// the text of the hovered line.
    pub async fn translate(&self, contents: &[String], line: &str) -> HoverOutcome {
        let Some(original) = self.hover_text(contents, line) else {
            return HoverOutcome::Skipped;
        };
        tracing::debug!(%original, "hover content");

        let api_key = self.keys.api_key();
        match self.client.translate(&original, &api_key).await {
            Ok(translated) => HoverOutcome::Succeeded {
                original,
                translated,
            },
            Err(Error::Timeout(_)) => HoverOutcome::TimedOut,
            Err(e) => {
                tracing::warn!(error = %e, "hover translation failed");
                HoverOutcome::Failed(e)
            }
        }
    }

    /// Convenience wrapper: translate and render.
    pub async fn provide_hover(&self, contents: &[String], line: &str) -> Option<Hover> {
        self.translate(contents, line).await.render()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::api::testing::ScriptedTransport;
    use crate::hover::ASK_QUESTION_COMMAND;
    use crate::translation::TranslationOptions;
    use std::time::Duration;

    fn controller(
        transport: &ScriptedTransport,
        key: &str,
        policy: HoverPolicy,
    ) -> HoverTranslationController {
        let client = TranslationClient::new(
            Arc::new(transport.clone()),
            TranslationOptions::default(),
        );
        HoverTranslationController::new(client, Arc::new(key.to_string()), policy)
    }

    fn contents(blocks: &[&str]) -> Vec<String> {
        blocks.iter().map(ToString::to_string).collect()
    }

    #[tokio::test]
    async fn test_success_renders_translation_with_follow_up() {
        let transport = ScriptedTransport::new().reply("戻り値: (true) を返す");
        let controller = controller(&transport, "k", HoverPolicy::Always);

        let hover = controller
            .provide_hover(&contents(&["Returns (true) if successful"]), "fn ok()")
            .await
            .unwrap();

        assert!(hover.markdown.starts_with("戻り値:(true)を返す\n\n---\n\n"));
        let action = hover.action.unwrap();
        assert_eq!(action.command, ASK_QUESTION_COMMAND);
        assert_eq!(action.context, "Returns (true) if successful");
    }

    #[tokio::test]
    async fn test_blocks_are_joined_with_newlines() {
        let transport = ScriptedTransport::new().reply("ok");
        let controller = controller(&transport, "k", HoverPolicy::Always);

        let outcome = controller
            .translate(&contents(&["fn len(&self) -> usize", "Returns the length."]), "")
            .await;

        match outcome {
            HoverOutcome::Succeeded { original, .. } => {
                assert_eq!(original, "fn len(&self) -> usize\nReturns the length.");
            }
            other => panic!("expected success, got {other:?}"),
        }
        assert!(
            transport.requests()[0].messages[0]
                .content()
                .contains("fn len(&self) -> usize\nReturns the length.")
        );
    }

    #[tokio::test]
    async fn test_no_content_is_skipped() {
        let transport = ScriptedTransport::new();
        let controller = controller(&transport, "k", HoverPolicy::Always);

        let outcome = controller.translate(&[], "// comment").await;

        assert!(matches!(outcome, HoverOutcome::Skipped));
        assert!(outcome.render().is_none());
        assert_eq!(transport.request_count(), 0);
    }

    #[tokio::test]
    async fn test_comment_only_policy_skips_code_lines() {
        let transport = ScriptedTransport::new();
        let controller = controller(&transport, "k", HoverPolicy::CommentOnly);

        let outcome = controller
            .translate(&contents(&["Returns the length."]), "let n = v.len();")
            .await;

        assert!(matches!(outcome, HoverOutcome::Skipped));
        assert_eq!(transport.request_count(), 0);
    }

    #[tokio::test]
    async fn test_comment_only_policy_translates_comment_lines() {
        let transport = ScriptedTransport::new().reply("長さを返す");
        let controller = controller(&transport, "k", HoverPolicy::CommentOnly);

        let outcome = controller
            .translate(&contents(&["Returns the length."]), "  // Returns the length.")
            .await;

        assert!(matches!(outcome, HoverOutcome::Succeeded { .. }));
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_renders_timeout_message() {
        let transport =
            ScriptedTransport::new().reply_after(Duration::from_secs(30), "late");
        let controller = controller(&transport, "k", HoverPolicy::Always);

        let outcome = controller.translate(&contents(&["text"]), "").await;

        assert!(matches!(outcome, HoverOutcome::TimedOut));
        assert_eq!(outcome.render().unwrap().markdown, TIMEOUT_MESSAGE);
    }

    #[tokio::test]
    async fn test_failure_renders_error_text() {
        let transport = ScriptedTransport::new();
        let controller = controller(&transport, "", HoverPolicy::Always);

        let hover = controller
            .provide_hover(&contents(&["text"]), "")
            .await
            .unwrap();

        assert!(hover.markdown.starts_with("翻訳に失敗しました: API key is not set"));
        assert!(hover.action.is_none());
    }
}
