//! JSON-lines bridge between an editor host and the controllers.
//!
//! Each stdin line is one host request; each stdout line is one event.
//! Hover requests run concurrently. Chat commands go through a single
//! worker so sends never interleave.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;
use tokio::task::JoinSet;

use super::load_settings;
use crate::api::{HttpTransport, Transport};
use crate::chat::{
    ChatPanelController, ChatSession, InboundMessage, Notifier, OutboundMessage, Panel,
    PanelFactory,
};
use crate::config::ApiKeySource;
use crate::hover::{Hover, HoverPolicy, HoverTranslationController};
use crate::translation::TranslationClient;
use crate::ui::{self, Style};

const VERSION: &str = env!("CARGO_PKG_VERSION");

pub struct ServeOptions {
    pub config: Option<PathBuf>,
    pub comment_only: bool,
    pub quiet: bool,
}

/// Host → bridge messages.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "command", rename_all = "camelCase")]
pub enum HostRequest {
    /// Translate the host's hover content for a position.
    Hover {
        id: u64,
        #[serde(default)]
        contents: Vec<String>,
        /// Text of the hovered line.
        #[serde(default)]
        line: String,
    },
    /// Follow-up action from a translated hover.
    AskQuestion { text: String },
    OpenChat {
        #[serde(default)]
        text: Option<String>,
    },
    SendMessage { text: String },
    CloseChat,
    /// Forget the conversation so far.
    ResetChat,
}

/// Bridge → host events that are not part of the panel envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "command", rename_all = "camelCase")]
pub enum HostEvent {
    HoverResult { id: u64, hover: Option<Hover> },
    CreatePanel,
    RevealPanel,
    ShowError { text: String },
}

/// Serialized events on their way to stdout.
#[derive(Clone)]
pub struct Outbox(mpsc::UnboundedSender<String>);

impl Outbox {
    pub fn emit(&self, event: &impl Serialize) {
        match serde_json::to_string(event) {
            Ok(line) => {
                // The writer only goes away at shutdown.
                let _ = self.0.send(line);
            }
            Err(e) => tracing::error!(error = %e, "failed to serialize event"),
        }
    }
}

struct StdioPanel {
    outbox: Outbox,
}

impl Panel for StdioPanel {
    fn reveal(&mut self) {
        self.outbox.emit(&HostEvent::RevealPanel);
    }

    fn post_message(&mut self, message: OutboundMessage) {
        self.outbox.emit(&message);
    }
}

struct StdioPanelFactory {
    outbox: Outbox,
}

impl PanelFactory for StdioPanelFactory {
    fn create_panel(&self) -> Box<dyn Panel> {
        self.outbox.emit(&HostEvent::CreatePanel);
        Box::new(StdioPanel {
            outbox: self.outbox.clone(),
        })
    }
}

struct StdioNotifier {
    outbox: Outbox,
    quiet: bool,
}

impl Notifier for StdioNotifier {
    fn show_error(&self, message: &str) {
        if !self.quiet {
            ui::print_error(message);
        }
        self.outbox.emit(&HostEvent::ShowError {
            text: message.to_string(),
        });
    }
}

enum ChatCommand {
    Open(Option<String>),
    Send(String),
    Close,
    Reset,
}

async fn run_chat_worker(
    mut controller: ChatPanelController,
    mut commands: mpsc::UnboundedReceiver<ChatCommand>,
) {
    while let Some(command) = commands.recv().await {
        match command {
            ChatCommand::Open(context) => controller.open(context.as_deref()),
            ChatCommand::Send(text) => {
                controller
                    .handle_message(InboundMessage::SendMessage { text })
                    .await;
            }
            ChatCommand::Close => controller.dispose(),
            ChatCommand::Reset => controller.reset(),
        }
    }
}

/// Drops finished hover tasks so the set only holds in-flight work.
fn reap_finished(tasks: &mut JoinSet<()>) {
    while tasks.try_join_next().is_some() {}
}

pub async fn run_serve(options: ServeOptions) -> Result<()> {
    let mut settings = load_settings(options.config.as_deref())?;
    if options.comment_only {
        settings.hover_policy = HoverPolicy::CommentOnly;
    }
    let settings = Arc::new(settings);
    let keys: Arc<dyn ApiKeySource> = settings.clone();
    let transport: Arc<dyn Transport> = Arc::new(HttpTransport::new(settings.endpoint.as_str()));

    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<String>();
    let outbox = Outbox(event_tx);
    let writer = tokio::spawn(async move {
        let mut stdout = tokio::io::stdout();
        while let Some(line) = event_rx.recv().await {
            stdout.write_all(line.as_bytes()).await?;
            stdout.write_all(b"\n").await?;
            stdout.flush().await?;
        }
        Ok::<_, std::io::Error>(())
    });

    let hover = HoverTranslationController::new(
        TranslationClient::new(Arc::clone(&transport), settings.translation_options()),
        Arc::clone(&keys),
        settings.hover_policy,
    );

    let controller = ChatPanelController::new(
        ChatSession::new(transport, settings.chat_options()),
        keys,
        Box::new(StdioPanelFactory {
            outbox: outbox.clone(),
        }),
        Box::new(StdioNotifier {
            outbox: outbox.clone(),
            quiet: options.quiet,
        }),
    );
    let (chat_tx, chat_rx) = mpsc::unbounded_channel();
    let chat_worker = tokio::spawn(run_chat_worker(controller, chat_rx));

    if !options.quiet {
        eprintln!(
            "{} {} {}",
            Style::header("hover-translate"),
            Style::version(format!("v{VERSION}")),
            Style::hint("reading JSON lines from stdin")
        );
    }

    let mut hovers = JoinSet::new();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Some(line) = lines
        .next_line()
        .await
        .context("Failed to read from stdin")?
    {
        reap_finished(&mut hovers);

        if line.trim().is_empty() {
            continue;
        }

        let request = match serde_json::from_str::<HostRequest>(&line) {
            Ok(request) => request,
            Err(e) => {
                tracing::warn!(error = %e, "ignoring malformed host message");
                outbox.emit(&HostEvent::ShowError {
                    text: format!("malformed message: {e}"),
                });
                continue;
            }
        };

        let chat_command = match request {
            HostRequest::Hover { id, contents, line } => {
                let hover = hover.clone();
                let outbox = outbox.clone();
                hovers.spawn(async move {
                    let result = hover.provide_hover(&contents, &line).await;
                    outbox.emit(&HostEvent::HoverResult { id, hover: result });
                });
                continue;
            }
            HostRequest::AskQuestion { text } => ChatCommand::Open(Some(text)),
            HostRequest::OpenChat { text } => ChatCommand::Open(text),
            HostRequest::SendMessage { text } => ChatCommand::Send(text),
            HostRequest::CloseChat => ChatCommand::Close,
            HostRequest::ResetChat => ChatCommand::Reset,
        };
        // The worker lives until chat_tx is dropped below.
        let _ = chat_tx.send(chat_command);
    }

    // Drain in-flight work before closing stdout.
    drop(chat_tx);
    while hovers.join_next().await.is_some() {}
    chat_worker.await.context("Chat worker panicked")?;
    drop(outbox);

    writer
        .await
        .context("Output writer panicked")?
        .context("Failed to write to stdout")
}
