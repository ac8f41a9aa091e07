use anyhow::{Result, bail};
use std::io::IsTerminal;
use std::path::PathBuf;
use std::sync::Arc;

use super::load_settings;
use crate::api::HttpTransport;
use crate::hover::LOADING_MESSAGE;
use crate::input::InputReader;
use crate::translation::TranslationClient;
use crate::ui::Spinner;

pub struct TranslateOptions {
    pub text: Option<String>,
    pub to: Option<String>,
    pub model: Option<String>,
    pub config: Option<PathBuf>,
    pub quiet: bool,
}

pub async fn run_translate(options: TranslateOptions) -> Result<()> {
    let mut settings = load_settings(options.config.as_deref())?;
    if let Some(to) = options.to {
        settings.target_language = to;
    }
    if let Some(model) = options.model {
        settings.translation_model = model;
    }

    let source_text = InputReader::read(options.text)?;
    if source_text.trim().is_empty() {
        bail!("Input is empty");
    }

    let client = TranslationClient::new(
        Arc::new(HttpTransport::new(settings.endpoint.as_str())),
        settings.translation_options(),
    );

    let spinner = Spinner::new(
        LOADING_MESSAGE,
        !options.quiet && std::io::stderr().is_terminal(),
    );
    let result = client
        .translate(&source_text, &settings.get_api_key())
        .await;
    spinner.stop();

    println!("{}", result?);
    Ok(())
}
