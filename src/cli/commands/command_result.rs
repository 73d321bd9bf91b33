use std::path::PathBuf;

use crate::core::{LocaleMergeStats, WireSummary};
use crate::issues::Issue;

#[derive(Debug)]
pub enum CommandSummary {
    Wire(WireCommandSummary),
    Merge(MergeSummary),
    Init(InitSummary),
}

#[derive(Debug)]
pub struct WireCommandSummary {
    pub run: WireSummary,
    pub catalog_path: PathBuf,
    /// Keys in the catalog after the run.
    pub catalog_keys: usize,
    /// True if the catalog file was written.
    pub catalog_written: bool,
    pub is_apply: bool,
}

#[derive(Debug)]
pub struct MergeSummary {
    pub batch_path: PathBuf,
    pub batch_entries: usize,
    pub locales: Vec<LocaleMergeStats>,
    /// False if no apply command is configured.
    pub has_apply_command: bool,
    pub is_apply: bool,
}

#[derive(Debug)]
pub struct InitSummary {
    /// Why the config file was not created.
    pub error: Option<String>,
}

/// Result of running a glotwire command.
pub struct CommandResult {
    pub summary: CommandSummary,
    pub error_count: usize,
    pub warning_count: usize,
    /// Issues found during the run, sorted by location.
    pub issues: Vec<Issue>,
}
