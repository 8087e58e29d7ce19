//! # asyncgen-cli
//!
//! Command-line front end for the asyncgen compiler.
//!
//! ## Commands
//!
//! - `agen init` - Write a starter asyncgen.toml
//! - `agen compile <document>` - Compile, link and write the selection report
//! - `agen check <document>` - Compile and link, printing diagnostics
//! - `agen search <document> <query>` - Find named entries in a document
//!
//! See `agen --help` for the full command reference.

use clap::{CommandFactory, Parser, Subcommand};
use colored::Colorize;
use std::process;

mod commands;
mod config;
mod resolver;
mod telemetry;

#[derive(Parser)]
#[command(name = "agen")]
#[command(about = "asyncgen CLI - Compile and link AsyncAPI documents", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Path to asyncgen.toml configuration file
    #[arg(short, long, global = true, default_value = "asyncgen.toml")]
    config: String,

    /// Enable verbose output
    #[arg(long, global = true)]
    verbose: bool,

    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true, env = "AGEN_JSON_LOGS")]
    json_logs: bool,

    /// Only treat publish operations as visible (overrides config)
    #[arg(long, global = true, conflicts_with = "subscribe_only")]
    publish_only: bool,

    /// Only treat subscribe operations as visible (overrides config)
    #[arg(long, global = true)]
    subscribe_only: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a starter asyncgen.toml
    Init {
        /// Project name
        #[arg(short, long, default_value = "asyncgen")]
        name: String,
    },

    /// Compile and link a document, then write the selection report as JSON
    Compile {
        /// Root JSON document
        document: String,

        /// Output file (overrides config; stdout when neither is set)
        #[arg(short, long)]
        out: Option<String>,
    },

    /// Compile and link a document and report what was found
    Check {
        /// Root JSON document
        document: String,
    },

    /// Search the named entries of a document
    Search {
        /// Document to search
        document: String,

        /// Case-insensitive search term
        query: String,
    },
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("{} {}", "Error:".red().bold(), e);
        process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    telemetry::init(
        telemetry::TelemetryConfig::new()
            .with_verbose(cli.verbose)
            .with_json_logs(cli.json_logs),
    )?;

    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        return Ok(());
    };

    let directions = commands::Directions::from_flags(cli.publish_only, cli.subscribe_only);

    match command {
        Commands::Init { name } => commands::init::init(&cli.config, &name),
        Commands::Compile { document, out } => {
            commands::compile::compile(&cli.config, directions, &document, out.as_deref())
        }
        Commands::Check { document } => commands::check::check(&cli.config, directions, &document),
        Commands::Search { document, query } => commands::search::search(&document, &query),
    }
}
