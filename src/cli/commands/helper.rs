use std::env;

use anyhow::{Context, Result};

use super::{CommandResult, CommandSummary};
use crate::config::{CONFIG_FILE_NAME, Config, load_config};
use crate::issues::{Issue, Report, ReportLocation, Severity};

/// Load the config found from the working directory, or the defaults.
pub fn load_project_config(verbose: bool) -> Result<Config> {
    let cwd = env::current_dir().context("Failed to determine the working directory")?;
    let result = load_config(&cwd)?;
    if verbose && !result.from_file {
        eprintln!(
            "Note: No {} found, using default configuration",
            CONFIG_FILE_NAME
        );
    }
    Ok(result.config)
}

pub fn finish(summary: CommandSummary, mut issues: Vec<Issue>) -> CommandResult {
    issues.sort_by(|a, b| location_key(a).cmp(&location_key(b)));

    let mut error_count = issues
        .iter()
        .filter(|i| i.severity() == Severity::Error)
        .count();
    let warning_count = issues.len() - error_count;

    if let CommandSummary::Init(ref summary) = summary
        && summary.error.is_some()
    {
        error_count += 1;
    }

    CommandResult {
        summary,
        error_count,
        warning_count,
        issues,
    }
}

fn location_key(issue: &Issue) -> (String, usize, usize) {
    match issue.location() {
        ReportLocation::Source(loc) => (loc.file_path.clone(), loc.line, loc.col),
        ReportLocation::File { path } => (path.to_string(), 0, 0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::commands::InitSummary;
    use crate::issues::{ParseErrorIssue, SourceLocation, UnboundHookIssue};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_finish_sorts_and_counts() {
        let unbound = Issue::UnboundHook(UnboundHookIssue {
            location: SourceLocation {
                file_path: "a/page.tsx".to_string(),
                line: 3,
                col: 1,
                source_line: "export function A() {".to_string(),
            },
            function: Some("A".to_string()),
            translator_name: "t".to_string(),
            candidate_count: 2,
        });
        let parse = Issue::ParseError(ParseErrorIssue {
            file_path: "a/page.tsx".to_string(),
            error: "Unexpected eof".to_string(),
        });

        let result = finish(
            CommandSummary::Init(InitSummary { error: None }),
            vec![unbound, parse],
        );
        assert_eq!(result.error_count, 1);
        assert_eq!(result.warning_count, 1);
        assert!(matches!(result.issues[0], Issue::ParseError(_)));
    }

    #[test]
    fn test_failed_init_counts_as_error() {
        let result = finish(
            CommandSummary::Init(InitSummary {
                error: Some("exists".to_string()),
            }),
            Vec::new(),
        );
        assert_eq!(result.error_count, 1);
    }
}
