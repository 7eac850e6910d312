mod cli;

use crate::cli::{Command, LogFormatArg, CLI};
use anyhow::Context;
use burrow_storage::{Repository, SqliteRepository, StorageError};
use clap::Parser;
use std::process::ExitCode;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let config = CLI::parse();
    init_tracing(config.log_format);

    info!(
        database = %config.database.display(),
        log_format = %config.log_format,
        "opening url store"
    );

    let repository = SqliteRepository::open(&config.database)
        .await
        .with_context(|| format!("failed to open {}", config.database.display()))?;

    let outcome = run(&repository, config.command).await;
    repository.close().await;

    match outcome {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(err @ (StorageError::AliasExists(_) | StorageError::NotFound(_))) => {
            debug!(error = %err, "request rejected");
            eprintln!("{err}");
            Ok(ExitCode::from(2))
        }
        Err(err) => Err(err).context("storage operation failed"),
    }
}

fn init_tracing(format: LogFormatArg) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    match format {
        LogFormatArg::Text => builder.init(),
        LogFormatArg::Json => builder.json().init(),
    }
}

async fn run<R: Repository>(repository: &R, command: Command) -> Result<(), StorageError> {
    match command {
        Command::Save { url, alias } => {
            let id = repository.save(&url, &alias).await?;
            println!("{id}");
        }
        Command::Get { alias } => {
            let url = repository.get(&alias).await?;
            println!("{url}");
        }
        Command::Delete { alias } => repository.delete(&alias).await?,
    }
    Ok(())
}
