use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(version, about = "Ask a Postgres database questions in plain language", long_about = None)]
pub struct CliOpts {
    /// Directory holding configuration.json.
    #[arg(long, env = "NL2SQL_CONFIGURATION_DIR", default_value = ".")]
    pub configuration: PathBuf,

    /// Log filter, e.g. "debug" or "nl2sql=debug". Overrides RUST_LOG.
    #[arg(long)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Write the default configuration and its JSON schema to the configuration directory.
    Initialize,
    /// Print the schema as discovered.
    Schema,
    /// Turn a question into SQL.
    Ask {
        question: String,
        /// Use the discovered schema without asking for confirmation.
        #[arg(long)]
        auto_confirm: bool,
    },
    /// Score generated SQL against a set of test cases.
    Evaluate {
        #[arg(long, default_value = "static/test_cases.json")]
        test_cases: PathBuf,
        /// Print the report as JSON instead of text.
        #[arg(long)]
        json: bool,
    },
}
