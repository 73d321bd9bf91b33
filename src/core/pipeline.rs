//! The `wire` pipeline: scan → extract → resolve → rewrite, one page at a time.
//!
//! Files are processed to completion in path order. The catalog grows in
//! memory as keys are created and is flushed by the caller after all sources
//! are written, so an interrupted run can leave wired sources without their
//! catalog entries.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Result, bail};

use crate::config::Config;
use crate::core::catalog::TranslationCatalog;
use crate::core::extract::{CandidateKind, extract_candidates};
use crate::core::files::{find_pages, relative_dir};
use crate::core::keys::{KeyResolution, KeySynthesizer, namespace_for_path};
use crate::core::parsers::jsx::parse_jsx_source;
use crate::core::rewrite::{ResolvedCandidate, RewriteStats, Rewriter, SpanRewrite};
use crate::core::scan::{FunctionSpan, HookState, ScanOptions, imports_hook, scan_functions};
use crate::core::source::{LineIndex, SourceFile};
use crate::issues::{
    IoErrorIssue, Issue, KeyCollisionIssue, ParseErrorIssue, ShadowedTranslatorIssue,
    SourceLocation, UnboundHookIssue,
};

/// One literal that was (or would be) wired.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WiredCandidate {
    /// 1-based.
    pub line: usize,
    pub text: String,
    pub key: String,
    /// Attribute name, `None` for text nodes.
    pub attribute: Option<String>,
    /// True if the key was added to the catalog by this run.
    pub created: bool,
}

/// Result of processing one file.
#[derive(Debug, Default)]
pub struct FileOutcome {
    pub file_path: String,
    /// False if the file does not import the hook and was skipped.
    pub imports_hook: bool,
    /// New content, if anything changed.
    pub content: Option<String>,
    pub stats: RewriteStats,
    pub keys_added: usize,
    pub wired: Vec<WiredCandidate>,
    pub issues: Vec<Issue>,
}

impl FileOutcome {
    fn new(file_path: &str) -> Self {
        Self {
            file_path: file_path.to_string(),
            ..Default::default()
        }
    }

    fn failed(file_path: &str, issue: Issue) -> Self {
        Self {
            issues: vec![issue],
            ..Self::new(file_path)
        }
    }
}

#[derive(Debug, Clone)]
pub struct ModifiedFile {
    pub file_path: String,
    pub replacements: usize,
    pub hooks_inserted: usize,
    pub wired: Vec<WiredCandidate>,
}

/// Result of a whole `wire` run.
#[derive(Debug, Default)]
pub struct WireSummary {
    pub files_scanned: usize,
    /// Pages that do not import the hook.
    pub files_without_hook: usize,
    /// Sorted by replacement count (descending), then path.
    pub modified: Vec<ModifiedFile>,
    pub replacements: usize,
    pub hooks_inserted: usize,
    pub keys_added: usize,
    /// Paths that could not be read while walking the source root.
    pub paths_skipped: usize,
    pub issues: Vec<Issue>,
}

impl WireSummary {
    fn absorb(&mut self, outcome: FileOutcome, written: bool) {
        if !outcome.imports_hook {
            if outcome.issues.is_empty() {
                self.files_without_hook += 1;
            }
            self.issues.extend(outcome.issues);
            return;
        }
        self.issues.extend(outcome.issues);
        self.keys_added += outcome.keys_added;
        if outcome.content.is_some() && written {
            self.replacements += outcome.stats.replacements;
            self.hooks_inserted += outcome.stats.hooks_inserted;
            self.modified.push(ModifiedFile {
                file_path: outcome.file_path,
                replacements: outcome.stats.replacements,
                hooks_inserted: outcome.stats.hooks_inserted,
                wired: outcome.wired,
            });
        }
    }

    fn finish(mut self) -> Self {
        self.modified.sort_by(|a, b| {
            b.replacements
                .cmp(&a.replacements)
                .then_with(|| a.file_path.cmp(&b.file_path))
        });
        self
    }
}

pub struct Pipeline<'a> {
    config: &'a Config,
    source_root: PathBuf,
    catalog: &'a mut TranslationCatalog,
    synthesizer: KeySynthesizer,
    /// Write modified sources back to disk.
    write: bool,
    verbose: bool,
}

impl<'a> Pipeline<'a> {
    pub fn new(
        config: &'a Config,
        source_root: &Path,
        catalog: &'a mut TranslationCatalog,
        write: bool,
    ) -> Self {
        Self {
            config,
            source_root: source_root.to_path_buf(),
            catalog,
            synthesizer: KeySynthesizer::new(config.collision_policy),
            write,
            verbose: false,
        }
    }

    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Process every page under the source root.
    pub fn run(&mut self) -> Result<WireSummary> {
        if !self.source_root.is_dir() {
            bail!(
                "Source root is not a directory: {}",
                self.source_root.display()
            );
        }

        let scan = find_pages(
            &self.source_root,
            &self.config.file_name,
            &self.config.ignores,
            self.verbose,
        );

        let mut summary = WireSummary {
            files_scanned: scan.files.len(),
            paths_skipped: scan.skipped_count,
            ..Default::default()
        };
        for path in &scan.files {
            let (outcome, written) = self.process_file(path);
            summary.absorb(outcome, written);
        }
        Ok(summary.finish())
    }

    /// Process one file on disk. Returns the outcome and whether the new
    /// content was written (always true for a dry run with changes).
    fn process_file(&mut self, path: &Path) -> (FileOutcome, bool) {
        let file_path = path.display().to_string();

        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                let issue = Issue::IoError(IoErrorIssue {
                    file_path: file_path.clone(),
                    error: format!("Failed to read file: {}", e),
                });
                return (FileOutcome::failed(&file_path, issue), false);
            }
        };

        let namespace = namespace_for_path(
            &relative_dir(&self.source_root, path),
            &self.config.namespaces,
            &self.config.default_namespace,
        );

        let mut outcome = match self.process_source(&file_path, &namespace, &content) {
            Ok(outcome) => outcome,
            Err(e) => {
                let issue = Issue::ParseError(ParseErrorIssue {
                    file_path: file_path.clone(),
                    error: e.to_string(),
                });
                return (FileOutcome::failed(&file_path, issue), false);
            }
        };

        let Some(new_content) = &outcome.content else {
            return (outcome, false);
        };
        if !self.write {
            return (outcome, true);
        }
        match fs::write(path, new_content) {
            Ok(()) => (outcome, true),
            Err(e) => {
                outcome.issues.push(Issue::IoError(IoErrorIssue {
                    file_path,
                    error: format!("Failed to write file: {}", e),
                }));
                (outcome, false)
            }
        }
    }

    /// Wire one file's content. Only parse failures are errors; everything
    /// else ends up in the outcome's issues.
    pub fn process_source(
        &mut self,
        file_path: &str,
        namespace: &str,
        content: &str,
    ) -> Result<FileOutcome> {
        let config = self.config;
        let parsed = parse_jsx_source(content.to_string(), file_path)?;
        let mut outcome = FileOutcome::new(file_path);

        if !imports_hook(&parsed.module, &config.hook_name) {
            return Ok(outcome);
        }
        outcome.imports_hook = true;

        let index = LineIndex::new(content);
        let options = ScanOptions {
            hook_name: &config.hook_name,
            translator_name: &config.translator_name,
            alias_name: &config.alias_name,
        };

        let spans: Vec<FunctionSpan> = scan_functions(&parsed, &index, &options)
            .into_iter()
            .map(|detected| {
                let mut span = detected.span;
                span.candidates = extract_candidates(
                    detected.function,
                    &parsed,
                    content,
                    &index,
                    &config.checked_attributes,
                );
                span
            })
            .collect();

        let mut rewrites = Vec::new();
        for span in spans.iter().filter(|s| s.has_candidates()) {
            if span.hook == HookState::Unbound {
                let start = index.line_start(span.start_line);
                outcome.issues.push(Issue::UnboundHook(UnboundHookIssue {
                    location: SourceLocation::new(file_path, content, span.start_line, start, start),
                    function: span.name.clone(),
                    translator_name: config.translator_name.clone(),
                    candidate_count: span.candidates.len(),
                }));
                continue;
            }

            let replacements =
                self.resolve_span(span, file_path, namespace, content, &index, &mut outcome);
            rewrites.push(SpanRewrite { span, replacements });
        }

        let rewriter = Rewriter {
            hook_name: &config.hook_name,
            translator_name: &config.translator_name,
        };
        let mut source = SourceFile::new(content);
        outcome.stats = rewriter.rewrite(&mut source, &index, rewrites);

        let new_content = source.content();
        if new_content != content {
            outcome.content = Some(new_content);
        }
        Ok(outcome)
    }

    fn resolve_span(
        &mut self,
        span: &FunctionSpan,
        file_path: &str,
        namespace: &str,
        content: &str,
        index: &LineIndex,
        outcome: &mut FileOutcome,
    ) -> Vec<ResolvedCandidate> {
        let mut replacements = Vec::new();

        for candidate in &span.candidates {
            let location = || {
                SourceLocation::new(
                    file_path,
                    content,
                    candidate.line,
                    index.line_start(candidate.line),
                    candidate.range.start,
                )
            };

            // A call here would reach the inner binding, not the translator.
            if span.is_shadowed(candidate.range.start) {
                outcome
                    .issues
                    .push(Issue::ShadowedTranslator(ShadowedTranslatorIssue {
                        location: location(),
                        text: candidate.text.clone(),
                        binding: span.binding.clone(),
                    }));
                continue;
            }

            let resolution = self
                .synthesizer
                .resolve(self.catalog, namespace, &candidate.text);

            let (key, created) = match resolution {
                KeyResolution::Created(key) => (key, true),
                KeyResolution::Existing(key) | KeyResolution::Shared { key, .. } => (key, false),
                KeyResolution::Collision { key, existing } => {
                    outcome.issues.push(Issue::KeyCollision(KeyCollisionIssue {
                        location: location(),
                        text: candidate.text.clone(),
                        key,
                        existing,
                    }));
                    continue;
                }
                KeyResolution::Dropped => continue,
            };

            outcome.keys_added += usize::from(created);
            outcome.wired.push(WiredCandidate {
                line: candidate.line + 1,
                text: candidate.text.clone(),
                key: key.clone(),
                attribute: match &candidate.kind {
                    CandidateKind::Attribute { name, .. } => Some(name.clone()),
                    CandidateKind::Text { .. } => None,
                },
                created,
            });
            replacements.push(ResolvedCandidate {
                range: candidate.range.clone(),
                kind: candidate.kind.clone(),
                key,
            });
        }

        replacements
    }
}
