//! Side-panel chat: bounded transcript, multi-turn session, panel controller.

mod panel;
mod session;
mod transcript;

pub use panel::{
    ChatPanelController, InboundMessage, Notifier, OutboundMessage, PANEL_NOT_OPEN, Panel,
    PanelFactory,
};
pub use session::{ChatOptions, ChatSession, DEFAULT_CHAT_MODEL};
pub use transcript::{MAX_TURNS, Transcript};
