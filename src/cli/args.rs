//! CLI argument definitions using clap derive

use clap::{Parser, Subcommand, ValueEnum};

use crate::cli::commands::{
    completions::CompletionsArgs, config::ConfigCommands, run::RunArgs, script::ScriptArgs,
    steps::StepsArgs, validate::ValidateArgs,
};

#[derive(Parser)]
#[command(name = "stepform")]
#[command(author, version, about = "Multi-step registration wizard")]
#[command(long_about = "A three-step registration form for the terminal: personal, contact and account details, each step validated before you can move on.")]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalOpts,
}

#[derive(clap::Args, Clone, Debug)]
pub struct GlobalOpts {
    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "auto")]
    pub format: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Enable verbose output (debug logging)
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fill in the registration form interactively
    Run(RunArgs),

    /// Replay a scripted session of edits and navigation
    Script(ScriptArgs),

    /// Validate a record file, in full or for a single step
    Validate(ValidateArgs),

    /// List the form's steps, fields and constraints
    Steps(StepsArgs),

    /// Configuration management
    #[command(subcommand)]
    Config(ConfigCommands),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Use the configured default, falling back to text
    #[default]
    Auto,
    /// Human-readable text
    Text,
    /// YAML format
    Yaml,
    /// JSON format (for programming)
    Json,
}

impl OutputFormat {
    /// Resolve `Auto` against the configured default format
    pub fn resolve(self, configured: Option<&str>) -> OutputFormat {
        if self != OutputFormat::Auto {
            return self;
        }
        configured
            .and_then(|s| OutputFormat::from_str(s.trim(), true).ok())
            .filter(|f| *f != OutputFormat::Auto)
            .unwrap_or(OutputFormat::Text)
    }

    /// Whether the format is meant for machines rather than people
    pub fn is_structured(&self) -> bool {
        matches!(self, OutputFormat::Yaml | OutputFormat::Json)
    }
}
