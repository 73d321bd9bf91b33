//! Report formatting and printing utilities.
//!
//! Issues are printed cargo-style; command summaries follow them. Everything
//! goes through a writer so output can be checked in tests.

use std::io::{self, Write};

use colored::Colorize;
use unicode_width::UnicodeWidthStr;

use super::commands::{CommandResult, CommandSummary, InitSummary, MergeSummary, WireCommandSummary};
use crate::config::CONFIG_FILE_NAME;
use crate::core::ModifiedFile;
use crate::issues::{Issue, Report, ReportLocation, Severity};

/// Success mark for consistent output formatting.
pub const SUCCESS_MARK: &str = "\u{2713}"; // ✓

/// Failure mark for consistent output formatting.
pub const FAILURE_MARK: &str = "\u{2718}"; // ✘

pub fn print(result: &CommandResult, verbose: bool) {
    let mut out = io::stdout().lock();
    report_to(&result.issues, &mut out);
    match &result.summary {
        CommandSummary::Wire(summary) => print_wire(summary, verbose, &mut out),
        CommandSummary::Merge(summary) => print_merge(summary, &mut out),
        CommandSummary::Init(summary) => print_init(summary),
    }
}

/// Print issues followed by a problem count. Prints nothing for no issues.
pub fn report_to<W: Write>(issues: &[Issue], writer: &mut W) {
    if issues.is_empty() {
        return;
    }

    let max_line_width = calculate_max_line_width(issues);
    for issue in issues {
        print_issue(issue, writer, max_line_width);
    }
    print_problem_count(issues, writer);
}

fn print_issue<W: Write>(issue: &Issue, writer: &mut W, max_line_width: usize) {
    let severity = issue.report_severity();
    let severity_str = match severity {
        Severity::Error => "error".bold().red(),
        Severity::Warning => "warning".bold().yellow(),
    };

    let _ = writeln!(
        writer,
        "{}: \"{}\"  {}",
        severity_str,
        issue.message(),
        issue.report_rule().to_string().dimmed().cyan()
    );

    match issue.location() {
        ReportLocation::Source(loc) => {
            let _ = writeln!(
                writer,
                "  {} {}:{}:{}",
                "-->".blue(),
                loc.file_path,
                loc.line,
                loc.col
            );
            let caret_char = match severity {
                Severity::Error => "^".red(),
                Severity::Warning => "^".yellow(),
            };
            let _ = writeln!(
                writer,
                "{:>width$} {}",
                "",
                "|".blue(),
                width = max_line_width
            );
            let _ = writeln!(
                writer,
                "{:>width$} {} {}",
                loc.line.to_string().blue(),
                "|".blue(),
                loc.source_line,
                width = max_line_width
            );
            let prefix: String = loc
                .source_line
                .chars()
                .take(loc.col.saturating_sub(1))
                .collect();
            let _ = writeln!(
                writer,
                "{:>width$} {} {:>padding$}{}",
                "",
                "|".blue(),
                "",
                caret_char,
                width = max_line_width,
                padding = UnicodeWidthStr::width(prefix.as_str())
            );
        }
        ReportLocation::File { path } => {
            let _ = writeln!(writer, "  {} {}", "-->".blue(), path);
        }
    }

    if let Some(details) = issue.details() {
        let _ = writeln!(
            writer,
            "{:>width$} {} {} {}",
            "",
            "=".blue(),
            "note:".bold(),
            details,
            width = max_line_width
        );
    }

    if let Some(hint) = issue.hint() {
        let _ = writeln!(
            writer,
            "{:>width$} {} {} {}",
            "",
            "=".blue(),
            "hint:".bold().cyan(),
            hint,
            width = max_line_width
        );
    }

    let _ = writeln!(writer);
}

fn print_problem_count<W: Write>(issues: &[Issue], writer: &mut W) {
    let total_errors = issues
        .iter()
        .filter(|i| i.report_severity() == Severity::Error)
        .count();
    let total_warnings = issues.len() - total_errors;

    let _ = writeln!(
        writer,
        "{} {} problems ({} {}, {} {})\n",
        FAILURE_MARK.red(),
        issues.len(),
        total_errors,
        if total_errors == 1 { "error" } else { "errors" }.red(),
        total_warnings,
        if total_warnings == 1 {
            "warning"
        } else {
            "warnings"
        }
        .yellow()
    );
}

fn calculate_max_line_width(issues: &[Issue]) -> usize {
    issues
        .iter()
        .filter_map(|i| match i.location() {
            ReportLocation::Source(loc) => Some(loc.line),
            ReportLocation::File { .. } => None,
        })
        .max()
        .map(|n| n.to_string().len())
        .unwrap_or(1)
}

fn print_wire<W: Write>(summary: &WireCommandSummary, verbose: bool, writer: &mut W) {
    let run = &summary.run;

    if run.paths_skipped > 0 {
        eprintln!(
            "{} {} path(s) skipped due to access errors{}",
            "warning:".bold().yellow(),
            run.paths_skipped,
            if verbose { "" } else { " (use -v for details)" }
        );
    }

    if run.modified.is_empty() {
        let _ = writeln!(
            writer,
            "{} {}",
            SUCCESS_MARK.green(),
            format!(
                "Scanned {} page {} - nothing to wire",
                run.files_scanned,
                if run.files_scanned == 1 { "file" } else { "files" }
            )
            .green()
        );
        return;
    }

    let (verb, hook_verb, key_verb) = if summary.is_apply {
        ("Wired".green().bold(), "inserted", "added to")
    } else {
        ("Would wire".yellow().bold(), "to insert", "to add to")
    };

    let _ = writeln!(
        writer,
        "{} {} text(s) in {} file(s):",
        verb,
        run.replacements,
        run.modified.len()
    );
    print_modified_files(&run.modified, verbose, writer);
    let _ = writeln!(writer, "  - hooks: {} {}", run.hooks_inserted, hook_verb);
    let _ = writeln!(
        writer,
        "  - keys: {} {} {}",
        run.keys_added,
        key_verb,
        summary.catalog_path.display()
    );

    if summary.is_apply {
        if summary.catalog_written {
            let _ = writeln!(
                writer,
                "{} {} ({} keys)",
                SUCCESS_MARK.green(),
                format!("Saved {}", summary.catalog_path.display()).green(),
                summary.catalog_keys
            );
        }
    } else {
        let _ = writeln!(writer, "Run with {} to write these changes.", "--apply".cyan());
    }
}

/// `  {count}  {path}` rows, counts right-aligned.
fn print_modified_files<W: Write>(files: &[ModifiedFile], verbose: bool, writer: &mut W) {
    let count_width = files
        .iter()
        .map(|f| f.replacements.to_string().width())
        .max()
        .unwrap_or(1)
        .max(3);

    for file in files {
        let _ = writeln!(
            writer,
            "  {:>width$}  {}",
            file.replacements,
            file.file_path,
            width = count_width
        );
        if !verbose {
            continue;
        }
        for wired in &file.wired {
            let target = match &wired.attribute {
                Some(attr) => format!("{}=\"{}\"", attr, wired.text),
                None => format!("\"{}\"", wired.text),
            };
            let _ = writeln!(
                writer,
                "  {:>width$}    {} {} {} {}",
                "",
                format!("L{}", wired.line).dimmed(),
                target,
                "->".blue(),
                if wired.created {
                    format!("{} (new)", wired.key)
                } else {
                    wired.key.clone()
                },
                width = count_width
            );
        }
    }
}

fn print_merge<W: Write>(summary: &MergeSummary, writer: &mut W) {
    let added: usize = summary.locales.iter().map(|l| l.added).sum();

    let verb = if summary.is_apply {
        "Merged".green().bold()
    } else {
        "Would merge".yellow().bold()
    };
    let _ = writeln!(
        writer,
        "{} {} of {} batch entries into {} locale(s):",
        verb,
        added,
        summary.batch_entries,
        summary.locales.len()
    );

    let locale_width = summary
        .locales
        .iter()
        .map(|l| l.locale.width())
        .max()
        .unwrap_or(2);
    for stats in &summary.locales {
        let status = if stats.applied {
            format!("  {}", "applied".green())
        } else {
            String::new()
        };
        let _ = writeln!(
            writer,
            "  {:<width$}  +{} added, {} unchanged, {} kept  {}{}",
            stats.locale,
            stats.added,
            stats.unchanged,
            stats.kept,
            stats.dictionary_path.dimmed(),
            status,
            width = locale_width
        );
    }

    if !summary.is_apply && added > 0 {
        let _ = writeln!(
            writer,
            "Run with {} to write the dictionaries{}.",
            "--apply".cyan(),
            if summary.has_apply_command {
                " and run the apply command"
            } else {
                ""
            }
        );
    }
}

fn print_init(summary: &InitSummary) {
    match &summary.error {
        None => println!(
            "{} {}",
            SUCCESS_MARK.green(),
            format!("Created {}", CONFIG_FILE_NAME).green()
        ),
        Some(error) => eprintln!("{} {}", FAILURE_MARK.red(), error),
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::core::{LocaleMergeStats, WireSummary, WiredCandidate};
    use crate::issues::{KeyCollisionIssue, ParseErrorIssue, SourceLocation};

    fn strip_ansi(s: &str) -> String {
        let mut result = String::new();
        let mut chars = s.chars().peekable();
        while let Some(c) = chars.next() {
            if c == '\x1b' {
                while let Some(&next) = chars.peek() {
                    chars.next();
                    if next == 'm' {
                        break;
                    }
                }
            } else {
                result.push(c);
            }
        }
        result
    }

    fn collision() -> Issue {
        Issue::KeyCollision(KeyCollisionIssue {
            location: SourceLocation {
                file_path: "src/app/dashboard/jobs/page.tsx".to_string(),
                line: 12,
                col: 11,
                source_line: "      <th>STATUS</th>".to_string(),
            },
            text: "STATUS".to_string(),
            key: "jobs.status".to_string(),
            existing: Some("Status".to_string()),
        })
    }

    #[test]
    fn test_report_empty() {
        let mut output = Vec::new();
        report_to(&[], &mut output);
        assert!(output.is_empty());
    }

    #[test]
    fn test_report_source_issue() {
        let mut output = Vec::new();
        report_to(&[collision()], &mut output);
        let stripped = strip_ansi(&String::from_utf8(output).unwrap());

        assert!(stripped.contains("warning: \"STATUS\"  key-collision"));
        assert!(stripped.contains("--> src/app/dashboard/jobs/page.tsx:12:11"));
        assert!(stripped.contains("12 |       <th>STATUS</th>"));
        assert!(stripped.contains("|           ^"));
        assert!(stripped.contains("note: jobs.status already holds \"Status\""));
        assert!(stripped.contains("1 problems (0 errors, 1 warning)"));
    }

    #[test]
    fn test_report_file_issue() {
        let issue = Issue::ParseError(ParseErrorIssue {
            file_path: "src/app/dashboard/broken/page.tsx".to_string(),
            error: "Unexpected eof".to_string(),
        });
        let mut output = Vec::new();
        report_to(&[issue, collision()], &mut output);
        let stripped = strip_ansi(&String::from_utf8(output).unwrap());

        assert!(stripped.contains("error: \"Unexpected eof\"  parse-error"));
        assert!(stripped.contains("--> src/app/dashboard/broken/page.tsx\n"));
        assert!(stripped.contains("2 problems (1 error, 1 warning)"));
    }

    fn modified(path: &str, replacements: usize) -> ModifiedFile {
        ModifiedFile {
            file_path: path.to_string(),
            replacements,
            hooks_inserted: 1,
            wired: vec![WiredCandidate {
                line: 4,
                text: "Settings".to_string(),
                key: "settings.settings".to_string(),
                attribute: None,
                created: true,
            }],
        }
    }

    #[test]
    fn test_wire_summary_dry_run() {
        let summary = WireCommandSummary {
            run: WireSummary {
                files_scanned: 3,
                modified: vec![modified("jobs/page.tsx", 12), modified("settings/page.tsx", 1)],
                replacements: 13,
                hooks_inserted: 2,
                keys_added: 9,
                ..Default::default()
            },
            catalog_path: PathBuf::from("en.json"),
            catalog_keys: 40,
            catalog_written: false,
            is_apply: false,
        };
        let mut output = Vec::new();
        print_wire(&summary, true, &mut output);
        let stripped = strip_ansi(&String::from_utf8(output).unwrap());

        assert!(stripped.contains("Would wire 13 text(s) in 2 file(s):"));
        assert!(stripped.contains("\n   12  jobs/page.tsx\n"));
        assert!(stripped.contains("\n    1  settings/page.tsx\n"));
        assert!(stripped.contains("L4 \"Settings\" -> settings.settings (new)"));
        assert!(stripped.contains("  - keys: 9 to add to en.json"));
        assert!(stripped.contains("Run with --apply"));
    }

    #[test]
    fn test_wire_summary_nothing_to_do() {
        let summary = WireCommandSummary {
            run: WireSummary {
                files_scanned: 1,
                ..Default::default()
            },
            catalog_path: PathBuf::from("en.json"),
            catalog_keys: 0,
            catalog_written: false,
            is_apply: true,
        };
        let mut output = Vec::new();
        print_wire(&summary, false, &mut output);
        let stripped = strip_ansi(&String::from_utf8(output).unwrap());
        assert!(stripped.contains("Scanned 1 page file - nothing to wire"));
    }

    #[test]
    fn test_merge_summary() {
        let summary = MergeSummary {
            batch_path: PathBuf::from("batch.json"),
            batch_entries: 2,
            locales: vec![LocaleMergeStats {
                locale: "ko".to_string(),
                dictionary_path: "./_ko_dict.json".to_string(),
                added: 2,
                saved: true,
                applied: true,
                ..Default::default()
            }],
            has_apply_command: true,
            is_apply: true,
        };
        let mut output = Vec::new();
        print_merge(&summary, &mut output);
        let stripped = strip_ansi(&String::from_utf8(output).unwrap());

        assert!(stripped.contains("Merged 2 of 2 batch entries into 1 locale(s):"));
        assert!(stripped.contains("ko  +2 added, 0 unchanged, 0 kept  ./_ko_dict.json  applied"));
        assert!(!stripped.contains("--apply"));
    }
}
