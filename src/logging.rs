//! Diagnostic logging setup.
//!
//! stdout carries protocol and translation output, so every log line goes
//! to stderr. `RUST_LOG` overrides the level picked from the CLI flags.

use tracing_subscriber::EnvFilter;

/// Logging flags from the command line.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogConfig {
    /// Only errors.
    pub quiet: bool,
    /// Include request lifecycle details.
    pub verbose: bool,
}

impl LogConfig {
    /// Filter directive used when `RUST_LOG` is unset.
    pub const fn default_directive(self) -> &'static str {
        if self.quiet {
            "error"
        } else if self.verbose {
            "hover_translate=debug"
        } else {
            "warn"
        }
    }
}

/// Installs the global subscriber. Later calls are ignored.
pub fn init(config: LogConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.default_directive()));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
