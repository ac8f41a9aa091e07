//! # hover-translate - Hover Translation and Chat for Editors
//!
//! `hover-translate` replaces an editor's hover text with a Claude
//! translation and offers a chat panel for follow-up questions about the
//! hovered content.
//!
//! ## Features
//!
//! - **Hover translation**: Host hover blocks are translated with a 10 second
//!   timeout and shown with an "ask about this" link
//! - **Output cleanup**: Colon and parenthesis spacing is normalized for
//!   Japanese text while code fences are left untouched
//! - **Chat panel**: A bounded conversation (20 turns) with a separate model
//! - **Editor bridge**: `hover-translate serve` speaks JSON lines on stdin/stdout
//!
//! ## Quick Start
//!
//! ```bash
//! # Translate once
//! hover-translate translate "Returns the number of elements."
//!
//! # Run the editor bridge
//! echo '{"command":"hover","id":1,"contents":["Returns true."]}' | hover-translate
//! ```
//!
//! ## Configuration
//!
//! Settings are stored in `~/.config/hover-translate/config.toml`:
//!
//! ```toml
//! [comment_translate]
//! api_key_env = "ANTHROPIC_API_KEY"
//! target_language = "Japanese"
//! timeout_ms = 10000
//! hover_policy = "always"
//! ```

/// Messages API wire types, response validation and transport.
pub mod api;

/// Chat session, bounded transcript and panel controller.
pub mod chat;

/// Command-line interface definitions and handlers.
pub mod cli;

/// Configuration file management.
pub mod config;

/// Library error type.
pub mod error;

/// Hover translation controller and rendering.
pub mod hover;

/// Input reading from arguments and stdin.
pub mod input;

/// Diagnostic logging setup.
pub mod logging;

/// XDG-style path utilities for configuration.
pub mod paths;

/// Translation client, prompt and post-processing.
pub mod translation;

/// Terminal UI components (spinner, colors).
pub mod ui;

pub use error::{Error, Result};
