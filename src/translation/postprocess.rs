//! Text cleanup applied to a raw translation before it is displayed.
//!
//! Fenced code blocks are swapped out for `[[CODE_BLOCK_<i>]]` placeholders
//! first so the per-line rules never touch them, then restored verbatim.

use regex::{Captures, Regex};
use std::sync::LazyLock;

// expect is safe: all patterns are compile-time constants
#[allow(clippy::expect_used)]
static CODE_FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)```.*?```").expect("valid code fence pattern"));

#[allow(clippy::expect_used)]
static COLON_SPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r":\s+").expect("valid colon pattern"));

#[allow(clippy::expect_used)]
static PAREN_GROUP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\(([^)]+)\)").expect("valid parenthesis pattern"));

#[allow(clippy::expect_used)]
static SPACE_AFTER_PAREN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([)）])[ \t]+([\p{Han}\p{Hiragana}\p{Katakana}])")
        .expect("valid closing parenthesis pattern")
});

#[allow(clippy::expect_used)]
static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[\[CODE_BLOCK_(\d+)\]\]").expect("valid placeholder pattern"));

/// Normalizes a translated string for display.
///
/// Per line: whitespace after a colon is dropped, and a parenthetical whose
/// content is not plain ASCII letters and spaces gets full-width parentheses.
/// Spaces between a closing parenthesis and following CJK text are removed.
/// Fenced code blocks pass through byte for byte.
pub fn process(translated: &str) -> String {
    let mut blocks: Vec<String> = Vec::new();
    let protected = CODE_FENCE.replace_all(translated, |caps: &Captures| {
        blocks.push(caps[0].to_string());
        format!("[[CODE_BLOCK_{}]]", blocks.len() - 1)
    });

    let joined = protected
        .split('\n')
        .map(process_line)
        .collect::<Vec<_>>()
        .join("\n");

    PLACEHOLDER
        .replace_all(&joined, |caps: &Captures| {
            caps[1]
                .parse::<usize>()
                .ok()
                .and_then(|index| blocks.get(index))
                .map_or_else(|| caps[0].to_string(), Clone::clone)
        })
        .into_owned()
}

fn process_line(line: &str) -> String {
    let line = COLON_SPACE.replace_all(line, ":");
    let line = PAREN_GROUP.replace_all(&line, |caps: &Captures| {
        let inner = &caps[1];
        if is_plain_ascii_words(inner) {
            format!("({inner})")
        } else {
            format!("（{inner}）")
        }
    });
    SPACE_AFTER_PAREN.replace_all(&line, "$1$2").into_owned()
}

fn is_plain_ascii_words(text: &str) -> bool {
    text.chars()
        .all(|c| c.is_ascii_alphabetic() || c.is_ascii_whitespace())
}
