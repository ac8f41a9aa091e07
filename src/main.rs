use anyhow::Result;
use clap::Parser;

use hover_translate::cli::commands::{serve, translate};
use hover_translate::cli::{Args, Command};
use hover_translate::logging::{self, LogConfig};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    logging::init(LogConfig {
        quiet: args.quiet,
        verbose: args.verbose,
    });

    match args.command {
        Some(Command::Translate { text, to, model }) => {
            let options = translate::TranslateOptions {
                text,
                to,
                model,
                config: args.config,
                quiet: args.quiet,
            };
            translate::run_translate(options).await?;
        }
        Some(Command::Serve { comment_only }) => {
            let options = serve::ServeOptions {
                config: args.config,
                comment_only,
                quiet: args.quiet,
            };
            serve::run_serve(options).await?;
        }
        None => {
            let options = serve::ServeOptions {
                config: args.config,
                comment_only: false,
                quiet: args.quiet,
            };
            serve::run_serve(options).await?;
        }
    }

    Ok(())
}
