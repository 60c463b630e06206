//! CLI commands

mod completion;
mod dev;
mod init;
mod query;
mod run;

pub use completion::CompletionCommand;
pub use dev::DevCommand;
pub use init::InitCommand;
pub use query::QueryCommand;
pub use run::RunCommand;

use clap::{Parser, Subcommand, ValueEnum};

/// Sparqlgate - forward SPARQL queries to named remote endpoints
#[derive(Parser, Debug)]
#[command(name = "sparqlgate")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file path
    ///
    /// This is a *global* option so it can be specified after subcommands,
    /// e.g. `sparqlgate run -f gateway.yaml`.
    #[arg(
        short = 'f',
        long = "file",
        global = true,
        default_value = "sparqlgate.yaml"
    )]
    pub config: String,

    /// Backwards/compat alias for `-f/--file`
    #[arg(short = 'c', long = "config", global = true, hide = true)]
    pub config_compat: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Log output format
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the Sparqlgate server
    Run(RunCommand),

    /// Start in development mode with hot reload
    Dev(DevCommand),

    /// Execute one query against a configured endpoint
    Query(QueryCommand),

    /// Initialize a new Sparqlgate configuration
    Init(InitCommand),

    /// Generate shell completions
    #[command(hide = true)]
    Completion(CompletionCommand),
}

impl Cli {
    /// Effective configuration path, accounting for compat flags.
    pub fn config_path(&self) -> &str {
        self.config_compat.as_deref().unwrap_or(&self.config)
    }
}
