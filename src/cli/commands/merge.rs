use anyhow::Result;

use super::super::args::MergeCommand;
use super::helper::{finish, load_project_config};
use super::{CommandResult, CommandSummary, MergeSummary};
use crate::core::{Applier, TranslationBatch, merge_batch};

pub fn merge(cmd: MergeCommand) -> Result<CommandResult> {
    let args = &cmd.args;
    let apply = args.apply;

    let mut config = load_project_config(args.common.verbose)?;
    if let Some(dir) = &args.dictionaries_dir {
        config.dictionaries_dir = dir.to_string_lossy().to_string();
    }

    let batch = TranslationBatch::load(&args.batch)?;
    let applier = Applier::from_config(&config.apply_command);
    let report = merge_batch(
        &config,
        &batch,
        &args.batch.display().to_string(),
        &applier,
        apply,
    )?;

    Ok(finish(
        CommandSummary::Merge(MergeSummary {
            batch_path: args.batch.clone(),
            batch_entries: batch.len(),
            locales: report.locales,
            has_apply_command: !applier.is_skip(),
            is_apply: apply,
        }),
        report.issues,
    ))
}
