mod commands;
mod config;

use clap::{Parser, Subcommand};
use colored::Colorize;
use commands::{delete, remix, DeleteArgs, RemixArgs};
use tracing_subscriber::EnvFilter;

/// Remix CLI - replace, delete or remix one element of an HTML page
#[derive(Parser, Debug)]
#[command(name = "remix")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Replay an editor session against the selected element
    Remix(RemixArgs),

    /// Replace the selected element with an invisible placeholder
    Delete(DeleteArgs),
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = std::env::current_dir()
        .map_err(anyhow::Error::from)
        .and_then(|cwd| match cli.command {
            Command::Remix(args) => remix(args, &cwd),
            Command::Delete(args) => delete(args, &cwd),
        });

    if let Err(err) = result {
        eprintln!();
        eprintln!("{} {:#}", "Error:".red().bold(), err);
        eprintln!();
        std::process::exit(1);
    }
}
