// ossx - manage files in a single S3-compatible bucket

mod cli;
mod commands;
mod config;
mod format;

use anyhow::Result;
use clap::Parser;
use std::sync::Arc;

use cli::{Cli, Commands};
use commands::{execute_du, execute_exists, execute_get, execute_ls, execute_put, execute_rm};
use config::OssxConfig;
use ossx::log::Logger;
use ossx::oss::ObjectStorageClient;

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env file is fine
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    // Load configuration
    let config = OssxConfig::load(cli.config.as_deref())?;

    let logger = Arc::new(Logger::new(config.logger).await?);
    let client = ObjectStorageClient::new(config.storage, logger.clone()).await?;

    // Execute command
    let result = match &cli.command {
        Commands::Put(args) => execute_put(args, &client).await,
        Commands::Get(args) => execute_get(args, &client).await,
        Commands::Rm(args) => execute_rm(args, &client).await,
        Commands::Exists(args) => execute_exists(args, &client).await,
        Commands::Ls => execute_ls(&client).await,
        Commands::Du(args) => execute_du(args, &client).await,
    };

    logger.flush().await?;
    result
}
