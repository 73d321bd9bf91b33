use std::path::PathBuf;

use anyhow::Result;

use super::super::args::WireCommand;
use super::helper::{finish, load_project_config};
use super::{CommandResult, CommandSummary, WireCommandSummary};
use crate::core::{Pipeline, TranslationCatalog};

pub fn wire(cmd: WireCommand) -> Result<CommandResult> {
    let args = &cmd.args;
    let verbose = args.common.verbose;
    let apply = args.apply;

    let config = load_project_config(verbose)?;
    let source_root = args
        .source_root
        .clone()
        .unwrap_or_else(|| PathBuf::from(&config.source_root));
    let catalog_path = args
        .catalog
        .clone()
        .unwrap_or_else(|| PathBuf::from(&config.catalog_path));

    let mut catalog = TranslationCatalog::open_or_create(&catalog_path)?;

    let mut run = Pipeline::new(&config, &source_root, &mut catalog, apply)
        .verbose(verbose)
        .run()?;

    // Sources are already on disk; a failed flush loses only the new keys.
    let catalog_written = if apply { catalog.flush()? } else { false };

    let issues = std::mem::take(&mut run.issues);
    Ok(finish(
        CommandSummary::Wire(WireCommandSummary {
            run,
            catalog_keys: catalog.leaf_count(),
            catalog_path,
            catalog_written,
            is_apply: apply,
        }),
        issues,
    ))
}
