/// Tokens that open a line comment or continue a block comment.
pub const COMMENT_TOKENS: &[&str] = &["//", "/*", "*", "#", "--", "<!--", ";", "%"];

/// Returns `true` if `line`, ignoring leading whitespace, starts with a comment token.
pub fn is_comment_line(line: &str) -> bool {
    let line = line.trim_start();
    COMMENT_TOKENS.iter().any(|token| line.starts_with(token))
}
