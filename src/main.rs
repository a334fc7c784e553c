#![warn(clippy::pedantic)]

use anyhow::Result;
use clap::Parser;

mod cli;
mod constants;
mod error;
mod event;
#[cfg(test)]
mod fixtures;
mod github;
mod jira;
mod server;
mod sync;
mod utils;

#[tokio::main]
async fn main() -> Result<()> {
    cli::init_tracing();

    let cli = cli::Cli::parse();

    match cli.command {
        cli::Commands::Serve(args) => {
            server::serve(args).await?;
        }
    }
    Ok(())
}
