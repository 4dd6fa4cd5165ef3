mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::Level;

#[derive(Parser)]
#[command(name = "typesafe-router")]
#[command(version, about = "Inspect route trees and generate typed route modules", long_about = None)]
struct Cli {
    /// Log derivation steps to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the flattened route table as JSON
    Inspect {
        /// Route definition file (.toml or .json)
        file: PathBuf,
    },

    /// List navigation targets
    Paths {
        /// Route definition file (.toml or .json)
        file: PathBuf,

        /// Route id to list targets for (default: absolute paths only)
        #[arg(short, long)]
        route: Option<String>,
    },

    /// Show the params a route can be rendered with
    Params {
        /// Route definition file (.toml or .json)
        file: PathBuf,

        /// Route id
        #[arg(short, long)]
        route: String,
    },

    /// Generate a Rust module with typed route ids and params
    Generate {
        /// Route definition file (.toml or .json)
        file: PathBuf,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so generated output on stdout stays clean
    tracing_subscriber::fmt()
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::WARN })
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    match cli.command {
        Commands::Inspect { file } => {
            commands::inspect::execute(&file)?;
        }
        Commands::Paths { file, route } => {
            commands::paths::execute(&file, route.as_deref())?;
        }
        Commands::Params { file, route } => {
            commands::params::execute(&file, &route)?;
        }
        Commands::Generate { file, output } => {
            commands::generate::execute(&file, output.as_deref())?;
        }
    }

    Ok(())
}
