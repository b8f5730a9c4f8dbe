//! Command-line argument definitions.

use clap::{Parser, Subcommand, ValueEnum};
use palaver_core::observability::LogFormat;
use std::path::PathBuf;

/// Palaver: compile context documents and generate conversation turns.
#[derive(Parser, Debug)]
#[command(name = "palaver")]
#[command(about = "Compile context documents and generate conversation turns")]
#[command(version)]
pub struct Cli {
    /// Path to palaver.toml
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Log line format, overriding the config file
    #[arg(long, global = true, value_enum)]
    pub log_format: Option<LogFormatArg>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Parse a context document and report broken references
    Check {
        /// Context document to check
        file: PathBuf,

        /// Report format
        #[arg(long, value_enum, default_value = "human")]
        format: OutputFormat,
    },

    /// Print the instructions a context document compiles to
    Compile {
        /// Context document to compile
        file: PathBuf,

        /// Stage key (defaults to the first stage)
        #[arg(long)]
        stage: Option<String>,

        /// Explicit string variable, as name=value
        #[arg(long = "var", value_name = "NAME=VALUE")]
        vars: Vec<String>,
    },

    /// Print the provider family and request body for a model
    Request {
        /// Model identifier
        model_id: String,

        /// Turn entry, as role:content
        #[arg(long = "message", value_name = "ROLE:CONTENT")]
        messages: Vec<String>,

        /// Maximum tokens to generate
        #[arg(long)]
        max_tokens: Option<u32>,

        /// Sampling temperature
        #[arg(long)]
        temperature: Option<f64>,
    },

    /// Run one turn through an in-memory conversation
    Turn {
        /// Context document used as instructions
        #[arg(long)]
        document: PathBuf,

        /// Model identifier
        #[arg(long)]
        model: String,

        /// User message
        #[arg(long)]
        message: String,

        /// Stage key (defaults to the first stage)
        #[arg(long)]
        stage: Option<String>,

        /// Name substituted for {{username}}
        #[arg(long)]
        username: Option<String>,
    },
}

/// Output format for check reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Numbered, human-readable text
    Human,
    /// A single JSON object
    Json,
}

/// Log format choices on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormatArg {
    /// Human-readable lines
    Human,
    /// One JSON object per line
    Json,
}

impl From<LogFormatArg> for LogFormat {
    fn from(arg: LogFormatArg) -> Self {
        match arg {
            LogFormatArg::Human => LogFormat::Human,
            LogFormatArg::Json => LogFormat::Json,
        }
    }
}
