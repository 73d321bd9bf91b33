//! Non-fatal findings collected during a run.
//!
//! A failure that only affects one file, one candidate, or one locale is an
//! issue: the run carries on and the issue is printed at the end. Failures
//! that make the whole run meaningless (bad config, malformed catalog) are
//! `anyhow` errors instead.

use std::fmt;

use enum_dispatch::enum_dispatch;

// ============================================================
// Severity and Rule
// ============================================================

/// Severity level of an issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

/// Rule identifier for each issue type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Rule {
    ParseError,
    IoError,
    KeyCollision,
    UnboundHook,
    ShadowedTranslator,
    UnknownLocale,
    ApplyFailed,
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rule::ParseError => write!(f, "parse-error"),
            Rule::IoError => write!(f, "io-error"),
            Rule::KeyCollision => write!(f, "key-collision"),
            Rule::UnboundHook => write!(f, "unbound-hook"),
            Rule::ShadowedTranslator => write!(f, "shadowed-translator"),
            Rule::UnknownLocale => write!(f, "unknown-locale"),
            Rule::ApplyFailed => write!(f, "apply-failed"),
        }
    }
}

/// A position inside a source file, with the line text for context display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLocation {
    pub file_path: String,
    /// 1-based.
    pub line: usize,
    /// 1-based, in characters.
    pub col: usize,
    pub source_line: String,
}

impl SourceLocation {
    /// Location of byte `offset` in `content`, given its 0-based `line` and line start.
    pub fn new(file_path: &str, content: &str, line: usize, line_start: usize, offset: usize) -> Self {
        let line_text = content[line_start..]
            .split('\n')
            .next()
            .unwrap_or_default()
            .trim_end_matches('\r');
        let col = content[line_start..offset].chars().count() + 1;
        Self {
            file_path: file_path.to_string(),
            line: line + 1,
            col,
            source_line: line_text.to_string(),
        }
    }
}

// ============================================================
// Issue Types
// ============================================================

/// Source file could not be parsed; it was left untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseErrorIssue {
    pub file_path: String,
    pub error: String,
}

/// A file could not be read or written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IoErrorIssue {
    pub file_path: String,
    pub error: String,
}

/// The synthesized key is taken by a different text and the collision
/// policy rejects the candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyCollisionIssue {
    pub location: SourceLocation,
    pub text: String,
    pub key: String,
    /// Text already stored under `key`; `None` when the path itself is blocked.
    pub existing: Option<String>,
}

/// The hook is called but its result does not bind the translator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnboundHookIssue {
    pub location: SourceLocation,
    pub function: Option<String>,
    pub translator_name: String,
    /// Candidates left unwired in the function.
    pub candidate_count: usize,
}

/// The candidate sits in a nested scope that rebinds the translator name,
/// e.g. `items.map(t => ...)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShadowedTranslatorIssue {
    pub location: SourceLocation,
    pub text: String,
    pub binding: String,
}

/// The batch names a locale that is not configured.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownLocaleIssue {
    pub batch_path: String,
    pub locale: String,
    /// Batch entries ignored for this locale.
    pub entry_count: usize,
}

/// The apply step failed for one locale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplyFailedIssue {
    pub locale: String,
    pub dictionary_path: String,
    pub error: String,
}

// ============================================================
// Issue Enum
// ============================================================

#[enum_dispatch(Report)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Issue {
    ParseError(ParseErrorIssue),
    IoError(IoErrorIssue),
    KeyCollision(KeyCollisionIssue),
    UnboundHook(UnboundHookIssue),
    ShadowedTranslator(ShadowedTranslatorIssue),
    UnknownLocale(UnknownLocaleIssue),
    ApplyFailed(ApplyFailedIssue),
}

impl Issue {
    pub fn severity(&self) -> Severity {
        self.report_severity()
    }

    pub fn rule(&self) -> Rule {
        self.report_rule()
    }
}

// ============================================================
// Report Trait (for CLI output)
// ============================================================

/// Location information for report output.
pub enum ReportLocation<'a> {
    /// Source code location (has source_line for context display).
    Source(&'a SourceLocation),
    /// File-level only.
    File { path: &'a str },
}

/// Trait for types that can be reported to CLI.
#[enum_dispatch]
pub trait Report {
    fn location(&self) -> ReportLocation<'_>;

    /// Primary message to display.
    fn message(&self) -> String;

    fn report_severity(&self) -> Severity;

    fn report_rule(&self) -> Rule;

    /// Optional hint for fixing the issue.
    fn hint(&self) -> Option<String> {
        None
    }

    /// Optional details for the "= note:" line.
    fn details(&self) -> Option<String> {
        None
    }
}

// ============================================================
// Report Implementations
// ============================================================

impl Report for ParseErrorIssue {
    fn location(&self) -> ReportLocation<'_> {
        ReportLocation::File {
            path: &self.file_path,
        }
    }

    fn message(&self) -> String {
        self.error.clone()
    }

    fn report_severity(&self) -> Severity {
        Severity::Error
    }

    fn report_rule(&self) -> Rule {
        Rule::ParseError
    }
}

impl Report for IoErrorIssue {
    fn location(&self) -> ReportLocation<'_> {
        ReportLocation::File {
            path: &self.file_path,
        }
    }

    fn message(&self) -> String {
        self.error.clone()
    }

    fn report_severity(&self) -> Severity {
        Severity::Error
    }

    fn report_rule(&self) -> Rule {
        Rule::IoError
    }
}

impl Report for KeyCollisionIssue {
    fn location(&self) -> ReportLocation<'_> {
        ReportLocation::Source(&self.location)
    }

    fn message(&self) -> String {
        self.text.clone()
    }

    fn report_severity(&self) -> Severity {
        Severity::Warning
    }

    fn report_rule(&self) -> Rule {
        Rule::KeyCollision
    }

    fn details(&self) -> Option<String> {
        Some(match &self.existing {
            Some(existing) => format!("{} already holds \"{}\"", self.key, existing),
            None => format!("{} is blocked by an existing entry", self.key),
        })
    }

    fn hint(&self) -> Option<String> {
        Some("set \"collisionPolicy\" to \"suffix\" or \"firstWriterWins\", or add the key by hand".to_string())
    }
}

impl Report for UnboundHookIssue {
    fn location(&self) -> ReportLocation<'_> {
        ReportLocation::Source(&self.location)
    }

    fn message(&self) -> String {
        match &self.function {
            Some(name) => format!("{} does not bind '{}'", name, self.translator_name),
            None => format!("default export does not bind '{}'", self.translator_name),
        }
    }

    fn report_severity(&self) -> Severity {
        Severity::Warning
    }

    fn report_rule(&self) -> Rule {
        Rule::UnboundHook
    }

    fn details(&self) -> Option<String> {
        Some(format!("{} candidate(s) left unwired", self.candidate_count))
    }
}

impl Report for ShadowedTranslatorIssue {
    fn location(&self) -> ReportLocation<'_> {
        ReportLocation::Source(&self.location)
    }

    fn message(&self) -> String {
        self.text.clone()
    }

    fn report_severity(&self) -> Severity {
        Severity::Warning
    }

    fn report_rule(&self) -> Rule {
        Rule::ShadowedTranslator
    }

    fn details(&self) -> Option<String> {
        Some(format!("'{}' is rebound by an enclosing scope", self.binding))
    }

    fn hint(&self) -> Option<String> {
        Some(format!("rename the inner '{}' and run again", self.binding))
    }
}

impl Report for UnknownLocaleIssue {
    fn location(&self) -> ReportLocation<'_> {
        ReportLocation::File {
            path: &self.batch_path,
        }
    }

    fn message(&self) -> String {
        self.locale.clone()
    }

    fn report_severity(&self) -> Severity {
        Severity::Warning
    }

    fn report_rule(&self) -> Rule {
        Rule::UnknownLocale
    }

    fn details(&self) -> Option<String> {
        Some(format!("{} batch entries ignored", self.entry_count))
    }

    fn hint(&self) -> Option<String> {
        Some("add the locale to \"locales\" in the config file".to_string())
    }
}

impl Report for ApplyFailedIssue {
    fn location(&self) -> ReportLocation<'_> {
        ReportLocation::File {
            path: &self.dictionary_path,
        }
    }

    fn message(&self) -> String {
        self.error.clone()
    }

    fn report_severity(&self) -> Severity {
        Severity::Error
    }

    fn report_rule(&self) -> Rule {
        Rule::ApplyFailed
    }

    fn details(&self) -> Option<String> {
        Some(format!("locale {}", self.locale))
    }
}
