//! Rewriter: replaces candidate literals with translator calls.
//!
//! Every offset comes from one parse of the original file. Spans are edited
//! bottom-up and each span's line slice is replaced as a whole, so an edit
//! never invalidates the offsets of a span above it.

use std::ops::Range;

use crate::core::extract::CandidateKind;
use crate::core::scan::FunctionSpan;
use crate::core::source::{LineIndex, SourceFile};

/// A candidate paired with the key it will be wired to.
#[derive(Debug, Clone)]
pub struct ResolvedCandidate {
    pub range: Range<usize>,
    pub kind: CandidateKind,
    pub key: String,
}

/// Everything to change inside one function.
#[derive(Debug, Clone)]
pub struct SpanRewrite<'a> {
    pub span: &'a FunctionSpan,
    pub replacements: Vec<ResolvedCandidate>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RewriteStats {
    pub replacements: usize,
    pub hooks_inserted: usize,
}

#[derive(Debug, Clone, Copy)]
pub struct Rewriter<'a> {
    pub hook_name: &'a str,
    pub translator_name: &'a str,
}

struct Edit {
    range: Range<usize>,
    replacement: String,
}

impl Rewriter<'_> {
    /// `{t('settings.title')}`
    pub fn call_expression(binding: &str, key: &str) -> String {
        let escaped = key.replace('\\', "\\\\").replace('\'', "\\'");
        format!("{{{}('{}')}}", binding, escaped)
    }

    /// `const { t } = useTranslation();` or `const { t: tr } = useTranslation();`
    pub fn hook_statement(&self, binding: &str) -> String {
        if binding == self.translator_name {
            format!("const {{ {} }} = {}();", binding, self.hook_name)
        } else {
            format!(
                "const {{ {}: {} }} = {}();",
                self.translator_name, binding, self.hook_name
            )
        }
    }

    /// Apply `rewrites` to `source`, which must still hold the content `index` was built from.
    pub fn rewrite(
        &self,
        source: &mut SourceFile,
        index: &LineIndex,
        mut rewrites: Vec<SpanRewrite<'_>>,
    ) -> RewriteStats {
        let mut stats = RewriteStats::default();
        rewrites.retain(|r| !r.replacements.is_empty());
        rewrites.sort_by(|a, b| b.span.start_line.cmp(&a.span.start_line));

        for rewrite in rewrites {
            let span = rewrite.span;
            let base = index.line_start(span.start_line);
            let text = source.slice(span.start_line, span.end_line);

            let mut edits: Vec<Edit> = rewrite
                .replacements
                .iter()
                .map(|candidate| Edit {
                    range: candidate.range.start - base..candidate.range.end - base,
                    replacement: Self::call_expression(&span.binding, &candidate.key),
                })
                .collect();
            stats.replacements += edits.len();

            if !span.has_hook() {
                edits.push(self.hook_edit(&text, span.brace_offset - base, &span.binding));
                stats.hooks_inserted += 1;
            }

            let new_text = apply_edits(text, edits);
            source.replace_lines(span.start_line, span.end_line, &new_text);
        }

        stats
    }

    /// Insert the hook after the opening-brace line, or right after `{` when
    /// the body continues on that line.
    fn hook_edit(&self, text: &str, brace: usize, binding: &str) -> Edit {
        let statement = self.hook_statement(binding);
        let after_brace = brace + 1;
        let line_end = text[after_brace..].find('\n').map(|i| after_brace + i);
        let rest = &text[after_brace..line_end.unwrap_or(text.len())];

        match line_end {
            Some(line_end) if rest.trim().is_empty() => {
                let crlf = rest.ends_with('\r');
                let at = if crlf { line_end - 1 } else { line_end };
                let eol = if crlf { "\r\n" } else { "\n" };
                let indent = body_indent(text, brace, line_end);
                Edit {
                    range: at..at,
                    replacement: format!("{}{}{}", eol, indent, statement),
                }
            }
            _ => Edit {
                range: after_brace..after_brace,
                replacement: format!(" {}", statement),
            },
        }
    }
}

/// Indentation for a statement inserted as the first line of a body.
///
/// Copies the first non-blank body line, unless that line is the closing
/// brace; then the brace line's indentation plus two spaces.
fn body_indent(text: &str, brace: usize, line_end: usize) -> String {
    let next_line = text[line_end + 1..]
        .split('\n')
        .find(|line| !line.trim().is_empty());
    if let Some(line) = next_line
        && !line.trim_start().starts_with('}')
    {
        return leading_whitespace(line).to_string();
    }

    let brace_line_start = text[..brace].rfind('\n').map_or(0, |i| i + 1);
    format!("{}  ", leading_whitespace(&text[brace_line_start..]))
}

fn leading_whitespace(line: &str) -> &str {
    let trimmed = line.trim_start_matches([' ', '\t']);
    &line[..line.len() - trimmed.len()]
}

fn apply_edits(mut text: String, mut edits: Vec<Edit>) -> String {
    edits.sort_by(|a, b| b.range.start.cmp(&a.range.start));
    for edit in edits {
        text.replace_range(edit.range, &edit.replacement);
    }
    text
}
