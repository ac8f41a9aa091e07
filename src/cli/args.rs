use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "hover-translate")]
#[command(about = "Hover translation and chat bridge for editors, backed by Claude")]
#[command(version)]
pub struct Args {
    /// Config file (default: ~/.config/hover-translate/config.toml)
    #[arg(short = 'c', long, global = true)]
    pub config: Option<PathBuf>,

    /// Only log errors
    #[arg(short = 'q', long, global = true)]
    pub quiet: bool,

    /// Log request details to stderr
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the JSON-lines editor bridge on stdin/stdout (default)
    Serve {
        /// Translate only hovers over comment lines
        #[arg(long)]
        comment_only: bool,
    },
    /// Translate text once and print the result
    Translate {
        /// Text to translate (reads from stdin if not provided)
        text: Option<String>,

        /// Target language name (e.g., Japanese, German)
        #[arg(short = 't', long = "to")]
        to: Option<String>,

        /// Model name
        #[arg(short = 'm', long)]
        model: Option<String>,
    },
}
