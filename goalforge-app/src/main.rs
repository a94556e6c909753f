use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use goalforge_app::{commands, config::Config, logging};

#[derive(Parser)]
#[command(name = "goalforge")]
#[command(about = "Autonomous goal to task agent")]
struct Cli {
    /// Path to goalforge.toml (defaults to ./goalforge.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Serve the JSON API
    Serve {
        /// Address to bind the server to
        #[arg(long)]
        bind: Option<String>,

        /// Port to listen on
        #[arg(long)]
        port: Option<u16>,
    },
    /// Run an agent for one goal in the terminal
    Run {
        /// Goal to pursue; prompted for when omitted
        goal: Option<String>,

        /// Stop after this many executed tasks
        #[arg(long)]
        max_loops: Option<usize>,

        /// Save the log when finished (.md for markdown, text otherwise)
        #[arg(long)]
        export: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    logging::init();

    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref()).context("Failed to load configuration")?;

    match cli.command {
        Command::Serve { bind, port } => commands::serve::serve(&config, bind, port).await,
        Command::Run {
            goal,
            max_loops,
            export,
        } => commands::run::run(&config, goal.as_deref(), max_loops, export.as_deref()).await,
    }
}
