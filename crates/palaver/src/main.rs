//! Palaver command-line tool.

mod cli;

use clap::Parser;
use cli::{
    Cli, Commands, handle_check_command, handle_compile_command, handle_request_command,
    handle_turn_command,
};
use palaver::{PalaverConfig, init_logging};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is fine.
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    let config = PalaverConfig::load(cli.config.as_deref())?;

    let format = cli.log_format.map(Into::into).unwrap_or(config.logging.format);
    init_logging(format, &config.logging.filter);
    tracing::debug!(backend = %config.inference.backend, "Configuration loaded");

    match cli.command {
        Commands::Check { file, format } => handle_check_command(&file, format),
        Commands::Compile { file, stage, vars } => {
            handle_compile_command(&file, stage.as_deref(), &vars)
        }
        Commands::Request {
            model_id,
            messages,
            max_tokens,
            temperature,
        } => handle_request_command(&model_id, &messages, max_tokens, temperature),
        Commands::Turn {
            document,
            model,
            message,
            stage,
            username,
        } => handle_turn_command(&config, &document, &model, &message, stage, username).await,
    }
}
