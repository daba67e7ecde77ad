pub mod commands;
pub mod config;
pub mod utils;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

#[derive(Parser)]
#[command(name = "estate")]
#[command(about = "Estate CLI - inspect navigation menus and route access for the estate console")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in human-readable text format")]
    pub text: bool,

    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Sign in to the backend API and manage the stored token")]
    Auth {
        #[command(subcommand)]
        cmd: commands::auth::AuthCommands,
    },

    #[command(about = "Render and query navigation trees")]
    Menu {
        #[command(subcommand)]
        cmd: commands::menu::MenuCommands,
    },

    #[command(about = "Run route access checks")]
    Access {
        #[command(subcommand)]
        cmd: commands::access::AccessCommands,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);

    match cli.command {
        Commands::Auth { cmd } => commands::auth::handle(cmd, output_format).await,
        Commands::Menu { cmd } => commands::menu::handle(cmd, output_format).await,
        Commands::Access { cmd } => commands::access::handle(cmd, output_format).await,
    }
}
