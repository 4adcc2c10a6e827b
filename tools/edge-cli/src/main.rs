//! Edge CLI - Command line tool for managing edge functions and edge services.
//!
//! Commands:
//! - `edge edge-functions` - List, describe, create, update and delete edge functions
//! - `edge edge-services` - List, describe, create, update and delete edge services
//! - `edge config` - Manage configuration

mod commands;
mod config;
mod context;
mod logging;
mod output;

use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};

use commands::{ConfigArgs, FunctionsArgs, ServicesArgs};

/// Edge CLI - Manage edge functions and edge services
#[derive(Parser)]
#[command(name = "edge")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Config file path
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// API token, overriding the config file
    #[arg(long, global = true, env = "EDGE_TOKEN", hide_env_values = true)]
    token: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage edge functions
    #[command(name = "edge-functions")]
    EdgeFunctions(FunctionsArgs),

    /// Manage edge services
    #[command(name = "edge-services")]
    EdgeServices(ServicesArgs),

    /// Manage configuration
    Config(ConfigArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    logging::init(cli.verbose);

    let output = output::Output::new();

    // Load config
    let config_path = cli.config.as_deref();
    let ctx = context::Context::load(config_path, cli.token, output)?;

    // Execute command
    let result = match cli.command {
        Commands::EdgeFunctions(args) => commands::functions::run(args, &ctx).await,
        Commands::EdgeServices(args) => commands::services::run(args, &ctx).await,
        Commands::Config(args) => commands::config::run(args, &ctx).await,
    };

    if let Err(e) = result {
        tracing::debug!(error = ?e, "command failed");
        ctx.output.error(&format!("{:#}", e));
        std::process::exit(1);
    }

    Ok(())
}
