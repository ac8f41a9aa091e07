//! Terminal output helpers for the binary.

mod spinner;
mod style;

pub use spinner::Spinner;
pub use style::Style;

/// Prints a user-visible error notification to stderr.
pub fn print_error(message: &str) {
    eprintln!("{} {message}", Style::error("Error:"));
}
