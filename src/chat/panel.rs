//! The chat side panel: message envelope, host seams and controller.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::session::ChatSession;
use crate::config::ApiKeySource;

/// Panel → controller envelope.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "command", rename_all = "camelCase")]
pub enum InboundMessage {
    SendMessage {
        text: String,
    },
    /// Any other command; ignored.
    #[serde(other)]
    Unknown,
}

/// Reported when a message arrives while no panel is open.
pub const PANEL_NOT_OPEN: &str = "chat panel is not open";

/// Controller → panel envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "command", rename_all = "camelCase")]
pub enum OutboundMessage {
    ReceiveMessage { text: String },
    SetContext { text: String },
}

/// A live panel provided by the host.
pub trait Panel: Send + Sync {
    /// Brings an existing panel to the front.
    fn reveal(&mut self);
    fn post_message(&mut self, message: OutboundMessage);
}

/// Creates panels on demand.
pub trait PanelFactory: Send + Sync {
    fn create_panel(&self) -> Box<dyn Panel>;
}

/// Surfaces user-visible error notifications.
pub trait Notifier: Send + Sync {
    fn show_error(&self, message: &str);
}

/// Owns at most one panel and routes its messages to a [`ChatSession`].
///
/// The session outlives individual panels: closing and reopening the panel
/// keeps the conversation.
pub struct ChatPanelController {
    session: ChatSession,
    keys: Arc<dyn ApiKeySource>,
    factory: Box<dyn PanelFactory>,
    notifier: Box<dyn Notifier>,
    panel: Option<Box<dyn Panel>>,
}

impl ChatPanelController {
    pub fn new(
        session: ChatSession,
        keys: Arc<dyn ApiKeySource>,
        factory: Box<dyn PanelFactory>,
        notifier: Box<dyn Notifier>,
    ) -> Self {
        Self {
            session,
            keys,
            factory,
            notifier,
            panel: None,
        }
    }

    pub const fn is_open(&self) -> bool {
        self.panel.is_some()
    }

    pub const fn session(&self) -> &ChatSession {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut ChatSession {
        &mut self.session
    }

    /// Starts a new conversation. The panel, if any, stays open.
    pub fn reset(&mut self) {
        tracing::debug!("chat transcript reset");
        self.session_mut().reset();
    }

    /// Reveals the panel, creating it first if none exists, then seeds it
    /// with `context` when one is given.
    pub fn open(&mut self, context: Option<&str>) {
        if let Some(panel) = self.panel.as_mut() {
            panel.reveal();
        } else {
            tracing::debug!("creating chat panel");
            self.panel = Some(self.factory.create_panel());
        }

        if let Some(context) = context.filter(|c| !c.is_empty()) {
            self.post(OutboundMessage::SetContext {
                text: context.to_string(),
            });
        }
    }

    /// Forgets the current panel. The next [`open`](Self::open) creates a new one.
    pub fn dispose(&mut self) {
        if self.panel.take().is_some() {
            tracing::debug!("chat panel disposed");
        }
    }

    /// Handles one message from the panel.
    ///
    /// Failures are reported to the panel as an `Error:` reply and to the
    /// notifier; they never escape this call. Without an open panel nothing
    /// is sent and only the notifier hears about it.
    pub async fn handle_message(&mut self, message: InboundMessage) {
        match message {
            InboundMessage::SendMessage { .. } if !self.is_open() => {
                tracing::warn!("chat message received with no open panel");
                self.notifier.show_error(&format!("Error: {PANEL_NOT_OPEN}"));
            }
            InboundMessage::SendMessage { text } => {
                let api_key = self.keys.api_key();
                let text = match self.session.send(&text, &api_key).await {
                    Ok(reply) => reply,
                    Err(e) => {
                        tracing::warn!(error = %e, "chat send failed");
                        let message = format!("Error: {e}");
                        self.notifier.show_error(&message);
                        message
                    }
                };
                self.post(OutboundMessage::ReceiveMessage { text });
            }
            InboundMessage::Unknown => {
                tracing::debug!("ignoring unknown panel command");
            }
        }
    }

    fn post(&mut self, message: OutboundMessage) {
        if let Some(panel) = self.panel.as_mut() {
            panel.post_message(message);
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::api::testing::ScriptedTransport;
    use crate::chat::ChatOptions;
    use std::sync::Mutex;

    #[derive(Debug, Clone, PartialEq, Eq)]
    enum Event {
        Created(usize),
        Revealed(usize),
        Posted(usize, OutboundMessage),
        Error(String),
    }

    type Log = Arc<Mutex<Vec<Event>>>;

    struct RecordingPanel {
        id: usize,
        log: Log,
    }

    impl Panel for RecordingPanel {
        fn reveal(&mut self) {
            self.log.lock().unwrap().push(Event::Revealed(self.id));
        }

        fn post_message(&mut self, message: OutboundMessage) {
            self.log
                .lock()
                .unwrap()
                .push(Event::Posted(self.id, message));
        }
    }

    struct RecordingFactory {
        created: Mutex<usize>,
        log: Log,
    }

    impl PanelFactory for RecordingFactory {
        fn create_panel(&self) -> Box<dyn Panel> {
            let mut created = self.created.lock().unwrap();
            *created += 1;
            self.log.lock().unwrap().push(Event::Created(*created));
            Box::new(RecordingPanel {
                id: *created,
                log: Arc::clone(&self.log),
            })
        }
    }

    struct RecordingNotifier(Log);

    impl Notifier for RecordingNotifier {
        fn show_error(&self, message: &str) {
            self.0.lock().unwrap().push(Event::Error(message.to_string()));
        }
    }

    fn controller(transport: &ScriptedTransport, key: &str) -> (ChatPanelController, Log) {
        let log: Log = Arc::default();
        let session = ChatSession::new(Arc::new(transport.clone()), ChatOptions::default());
        let controller = ChatPanelController::new(
            session,
            Arc::new(key.to_string()),
            Box::new(RecordingFactory {
                created: Mutex::new(0),
                log: Arc::clone(&log),
            }),
            Box::new(RecordingNotifier(Arc::clone(&log))),
        );
        (controller, log)
    }

    fn events(log: &Log) -> Vec<Event> {
        log.lock().unwrap().clone()
    }

    #[test]
    fn test_inbound_envelope_parses() {
        let message: InboundMessage =
            serde_json::from_str(r#"{"command":"sendMessage","text":"hi"}"#).unwrap();
        assert_eq!(
            message,
            InboundMessage::SendMessage {
                text: "hi".to_string()
            }
        );

        let unknown: InboundMessage = serde_json::from_str(r#"{"command":"ping"}"#).unwrap();
        assert_eq!(unknown, InboundMessage::Unknown);
    }

    #[test]
    fn test_outbound_envelope_serializes() {
        let message = OutboundMessage::ReceiveMessage {
            text: "やあ".to_string(),
        };
        assert_eq!(
            serde_json::to_string(&message).unwrap(),
            r#"{"command":"receiveMessage","text":"やあ"}"#
        );
    }

    #[test]
    fn test_open_creates_once_then_reveals() {
        let (mut controller, log) = controller(&ScriptedTransport::new(), "k");

        controller.open(None);
        controller.open(None);

        assert!(controller.is_open());
        assert_eq!(events(&log), vec![Event::Created(1), Event::Revealed(1)]);
    }

    #[test]
    fn test_open_with_context_pushes_set_context() {
        let (mut controller, log) = controller(&ScriptedTransport::new(), "k");

        controller.open(Some("Returns the length."));

        assert_eq!(
            events(&log),
            vec![
                Event::Created(1),
                Event::Posted(
                    1,
                    OutboundMessage::SetContext {
                        text: "Returns the length.".to_string()
                    }
                ),
            ]
        );
    }

    #[test]
    fn test_open_with_empty_context_sends_nothing() {
        let (mut controller, log) = controller(&ScriptedTransport::new(), "k");
        controller.open(Some(""));
        assert_eq!(events(&log), vec![Event::Created(1)]);
    }

    #[test]
    fn test_dispose_then_open_creates_fresh_panel() {
        let (mut controller, log) = controller(&ScriptedTransport::new(), "k");

        controller.open(None);
        controller.dispose();
        assert!(!controller.is_open());
        controller.open(None);

        assert_eq!(events(&log), vec![Event::Created(1), Event::Created(2)]);
    }

    #[tokio::test]
    async fn test_send_message_replies_to_panel() {
        let transport = ScriptedTransport::new().reply("了解です");
        let (mut controller, log) = controller(&transport, "k");
        controller.open(None);

        controller
            .handle_message(InboundMessage::SendMessage {
                text: "hello".to_string(),
            })
            .await;

        assert_eq!(
            events(&log).last(),
            Some(&Event::Posted(
                1,
                OutboundMessage::ReceiveMessage {
                    text: "了解です".to_string()
                }
            ))
        );
    }

    #[tokio::test]
    async fn test_send_failure_posts_error_and_notifies() {
        let transport = ScriptedTransport::new().status(500, "boom");
        let (mut controller, log) = controller(&transport, "k");
        controller.open(None);

        controller
            .handle_message(InboundMessage::SendMessage {
                text: "hello".to_string(),
            })
            .await;

        let events = events(&log);
        let expected = "Error: API request failed with status 500: boom".to_string();
        assert!(events.contains(&Event::Error(expected.clone())));
        assert_eq!(
            events.last(),
            Some(&Event::Posted(
                1,
                OutboundMessage::ReceiveMessage { text: expected }
            ))
        );
    }

    #[tokio::test]
    async fn test_missing_key_is_reported() {
        let (mut controller, log) = controller(&ScriptedTransport::new(), "");
        controller.open(None);

        controller
            .handle_message(InboundMessage::SendMessage {
                text: "hello".to_string(),
            })
            .await;

        assert!(
            events(&log)
                .iter()
                .any(|e| matches!(e, Event::Error(m) if m.contains("API key is not set")))
        );
    }

    #[tokio::test]
    async fn test_send_without_panel_reports_and_skips_request() {
        let transport = ScriptedTransport::new().reply("unused");
        let (mut controller, log) = controller(&transport, "k");

        controller
            .handle_message(InboundMessage::SendMessage {
                text: "hi".to_string(),
            })
            .await;

        assert_eq!(transport.request_count(), 0);
        assert!(controller.session().transcript().is_empty());
        assert!(!controller.is_open());
        assert_eq!(
            events(&log),
            vec![Event::Error(format!("Error: {PANEL_NOT_OPEN}"))]
        );
    }

    #[tokio::test]
    async fn test_send_after_dispose_is_rejected() {
        let transport = ScriptedTransport::new().reply("unused");
        let (mut controller, log) = controller(&transport, "k");
        controller.open(None);
        controller.dispose();

        controller
            .handle_message(InboundMessage::SendMessage {
                text: "hi".to_string(),
            })
            .await;

        assert_eq!(transport.request_count(), 0);
        assert_eq!(
            events(&log).last(),
            Some(&Event::Error(format!("Error: {PANEL_NOT_OPEN}")))
        );
    }

    #[tokio::test]
    async fn test_reset_clears_transcript_and_keeps_panel() {
        let transport = ScriptedTransport::new().reply("one");
        let (mut controller, _log) = controller(&transport, "k");
        controller.open(None);
        controller
            .handle_message(InboundMessage::SendMessage {
                text: "first".to_string(),
            })
            .await;

        controller.reset();

        assert!(controller.session().transcript().is_empty());
        assert!(controller.is_open());
    }

    #[tokio::test]
    async fn test_transcript_survives_panel_disposal() {
        let transport = ScriptedTransport::new().reply("one");
        let (mut controller, _log) = controller(&transport, "k");
        controller.open(None);
        controller
            .handle_message(InboundMessage::SendMessage {
                text: "first".to_string(),
            })
            .await;

        controller.dispose();
        controller.open(None);

        assert_eq!(controller.session().transcript().len(), 2);
    }
}
