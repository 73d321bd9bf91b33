//! CLI argument definitions using clap.
//!
//! ## Commands
//!
//! - `wire`: Replace hardcoded page text with translation calls
//! - `merge`: Merge a translation batch into the per-locale dictionaries
//! - `init`: Initialize glotwire configuration file

use std::path::PathBuf;

use clap::{Args, CommandFactory, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Arguments {
    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Arguments {
    /// Check if a command was provided, otherwise print help and return None.
    pub fn with_command_or_help(self) -> Option<Self> {
        if self.command.is_none() {
            Self::command().print_help().ok();
            None
        } else {
            Some(self)
        }
    }

    pub fn verbose(&self) -> bool {
        match &self.command {
            Some(Command::Wire(cmd)) => cmd.args.common.verbose,
            Some(Command::Merge(cmd)) => cmd.args.common.verbose,
            Some(Command::Init) | None => false,
        }
    }
}

/// Common arguments shared by all commands.
#[derive(Debug, Clone, Args)]
pub struct CommonArgs {
    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Parser)]
pub struct WireArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Directory to search for pages (overrides config file)
    #[arg(long)]
    pub source_root: Option<PathBuf>,

    /// Translation catalog path (overrides config file)
    #[arg(long)]
    pub catalog: Option<PathBuf>,

    /// Actually rewrite files and update the catalog (default is dry-run)
    #[arg(long)]
    pub apply: bool,
}

#[derive(Debug, Args)]
pub struct WireCommand {
    #[command(flatten)]
    pub args: WireArgs,
}

#[derive(Debug, Parser)]
pub struct MergeArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// JSON batch: { "<source text>": { "<locale>": "<translation>" } }
    pub batch: PathBuf,

    /// Directory holding the locale dictionaries (overrides config file)
    #[arg(long)]
    pub dictionaries_dir: Option<PathBuf>,

    /// Actually write dictionaries and run the apply command (default is dry-run)
    #[arg(long)]
    pub apply: bool,
}

#[derive(Debug, Args)]
pub struct MergeCommand {
    #[command(flatten)]
    pub args: MergeArgs,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Replace hardcoded UI text in page files with translation calls
    Wire(WireCommand),
    /// Merge a batch of translations into the per-locale dictionaries
    Merge(MergeCommand),
    /// Initialize a new .glotwirerc.json configuration file
    Init,
}
