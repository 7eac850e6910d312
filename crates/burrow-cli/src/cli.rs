use clap::{Parser, Subcommand, ValueEnum};
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub const DATABASE_PATH_ENV: &str = "BURROW_DATABASE_PATH";
pub const LOG_FORMAT_ENV: &str = "BURROW_LOG_FORMAT";

pub const DEFAULT_DATABASE_PATH: &str = "burrow.db";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormatArg {
    #[value(name = "text")]
    Text,
    #[value(name = "json")]
    Json,
}

impl Display for LogFormatArg {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            LogFormatArg::Text => write!(f, "text"),
            LogFormatArg::Json => write!(f, "json"),
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "burrow", about = "Manage the alias to URL store")]
pub struct CLI {
    #[arg(long, env = DATABASE_PATH_ENV, default_value = DEFAULT_DATABASE_PATH)]
    pub database: PathBuf,

    #[arg(
        long,
        env = LOG_FORMAT_ENV,
        value_enum,
        default_value_t = LogFormatArg::Text
    )]
    pub log_format: LogFormatArg,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Store URL under ALIAS and print the assigned id.
    Save { url: String, alias: String },
    /// Print the URL stored under ALIAS.
    Get { alias: String },
    /// Remove ALIAS. Succeeds even if it does not exist.
    Delete { alias: String },
}
