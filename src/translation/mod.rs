mod client;
pub mod postprocess;
mod prompt;

pub use client::{
    DEFAULT_MAX_TOKENS, DEFAULT_TARGET_LANGUAGE, DEFAULT_TIMEOUT, DEFAULT_TRANSLATION_MODEL,
    TranslationClient, TranslationOptions,
};
pub use prompt::{INSTRUCTION_TEMPLATE, build_instruction};
