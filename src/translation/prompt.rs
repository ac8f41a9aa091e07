use regex::{Captures, Regex};
use std::sync::LazyLock;

pub const INSTRUCTION_TEMPLATE: &str = "Translate the following VS Code hover text to {target_language}. \
     Keep code and technical terms unchanged:\n\n{text}\n\n{target_language} translation:";

// expect is safe: the pattern is a compile-time constant
#[allow(clippy::expect_used)]
static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{(target_language|text)\}").expect("valid template placeholder pattern")
});

#[allow(clippy::literal_string_with_formatting_args)]
pub fn build_instruction(target_language: &str, text: &str) -> String {
    // {target_language} and {text} are placeholders for string replacement, not format arguments.
    // One pass over the template: substituted values are never rescanned.
    PLACEHOLDER
        .replace_all(INSTRUCTION_TEMPLATE, |caps: &Captures| match &caps[1] {
            "text" => text,
            _ => target_language,
        })
        .into_owned()
}
