mod cli;
mod commands;
mod error;
mod mcp;
mod page_range;
mod pdf;
mod sink;
mod splitter;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};
use commands::split::{Selection, SplitOptions};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr; stdout carries command output and the MCP stdio transport
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match cli.command {
        Commands::Mcp => {
            mcp::run_server().await?;
        }
        Commands::Info { path } => {
            commands::info::run(&path)?;
        }
        Commands::Split {
            path,
            pages,
            range,
            output_dir,
            suffix,
            html,
        } => {
            let selection = match (pages, range.as_deref()) {
                (Some(text), _) => Selection::Text(text),
                (None, Some(&[start, end])) => Selection::Slider(start, end),
                _ => Selection::Whole,
            };
            let options = SplitOptions { suffix, html };
            commands::split::run(&path, selection, &output_dir, &options)?;
        }
    }

    Ok(())
}
