//! Command-line interface module.
//!
//! This module provides the CLI structure and command handlers for the palaver binary.

mod check;
mod commands;
mod compile;
mod request;
mod turn;

pub use check::handle_check_command;
pub use commands::{Cli, Commands, OutputFormat};
pub use compile::handle_compile_command;
pub use request::handle_request_command;
pub use turn::handle_turn_command;

use anyhow::Context as _;
use palaver_context::Context;
use std::path::Path;

/// Reads and parses a context document from disk.
fn load_document(path: &Path) -> anyhow::Result<(String, Context)> {
    let markup = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read '{}'", path.display()))?;
    let context = palaver_context::parse_context(&markup)
        .with_context(|| format!("Failed to parse '{}'", path.display()))?;
    Ok((markup, context))
}
