mod board;
mod commands;
mod config;
mod logging;
mod tui;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "cardboard",
    about = "A terminal canvas of draggable, resizable, chain-linked text cards"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Open the interactive card canvas (the default)
    View(ViewArgs),
    /// Print the default configuration file
    Defaults,
}

#[derive(Args, Default)]
struct ViewArgs {
    /// Seed for new card positions, for a reproducible session
    #[arg(long)]
    seed: Option<u64>,
    /// Read settings from this `key: value` file
    #[arg(long)]
    config: Option<PathBuf>,
    /// Write rotating log files into this directory
    #[arg(long)]
    log_dir: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command.unwrap_or(Command::View(ViewArgs::default())) {
        Command::View(args) => commands::view::run(
            args.seed,
            args.config.as_deref(),
            args.log_dir.as_deref(),
        ),
        Command::Defaults => commands::defaults::run(),
    }
}
