//! Candidate extraction: user-facing literal text inside a component function.
//!
//! Two shapes are picked up:
//! - a JSX text node that closes its element, `<h1>Settings</h1>`
//! - a quoted value of a recognized attribute, `placeholder="Search jobs"`
//!
//! Both come from JSX syntax nodes, so text inside JS strings or template
//! literals (`` `>Submit</button>` ``) is never a candidate.

use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;
use swc_ecma_ast::{
    Function, JSXAttr, JSXAttrName, JSXAttrOrSpread, JSXAttrValue, JSXElement, JSXElementChild,
    JSXElementName, JSXOpeningElement, JSXText,
};
use swc_ecma_visit::{Visit, VisitWith};

use crate::core::parsers::jsx::ParsedJSX;
use crate::core::source::LineIndex;

pub const MIN_TEXT_LEN: usize = 3;
pub const MAX_TEXT_LEN: usize = 80;

static CANDIDATE_TEXT_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z][A-Za-z0-9 &/'#$.\-]*$").unwrap());

/// Where a candidate literal sits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CandidateKind {
    /// Text child of `tag`.
    Text { tag: String },
    /// Value of attribute `name` on `tag`.
    Attribute { tag: String, name: String },
}

/// A literal that can be replaced with a translator call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewriteCandidate {
    pub text: String,
    pub kind: CandidateKind,
    /// 0-based line of the literal.
    pub line: usize,
    /// Byte range in the file to replace. For attributes this includes the quotes.
    pub range: Range<usize>,
}

/// True if `text` looks like a static UI label worth translating.
///
/// Starts with an uppercase ASCII letter, contains only letters, digits,
/// spaces, and `& / ' # $ . -`, and is 3 to 80 characters long.
///
/// ```
/// use glotwire::core::extract::is_candidate_text;
///
/// assert!(is_candidate_text("Total Amount Due"));
/// assert!(!is_candidate_text("ok"));
/// assert!(!is_candidate_text("loading"));
/// assert!(!is_candidate_text("Hello {name}"));
/// ```
pub fn is_candidate_text(text: &str) -> bool {
    let len = text.chars().count();
    (MIN_TEXT_LEN..=MAX_TEXT_LEN).contains(&len) && CANDIDATE_TEXT_REGEX.is_match(text)
}

/// Collect candidates inside `function`, in source order.
pub fn extract_candidates(
    function: &Function,
    parsed: &ParsedJSX,
    source: &str,
    index: &LineIndex,
    checked_attributes: &[String],
) -> Vec<RewriteCandidate> {
    let mut extractor = CandidateExtractor {
        parsed,
        source,
        index,
        checked_attributes,
        candidates: Vec::new(),
    };
    function.visit_with(&mut extractor);
    extractor.candidates.sort_by_key(|c| c.range.start);
    extractor.candidates
}

struct CandidateExtractor<'a> {
    parsed: &'a ParsedJSX,
    source: &'a str,
    index: &'a LineIndex,
    checked_attributes: &'a [String],
    candidates: Vec<RewriteCandidate>,
}

impl CandidateExtractor<'_> {
    fn check_text(&mut self, node: &JSXText, tag: &str) {
        let range = self.parsed.range(node.span);
        let raw = &self.source[range.clone()];
        if raw.contains('\n') {
            return;
        }
        let text = raw.trim_end();
        if !is_candidate_text(text) {
            return;
        }
        self.candidates.push(RewriteCandidate {
            text: text.to_string(),
            kind: CandidateKind::Text {
                tag: tag.to_string(),
            },
            line: self.index.line_of(range.start),
            range: range.start..range.start + text.len(),
        });
    }

    fn check_attr(&mut self, attr: &JSXAttr, tag: &str) {
        let name = attr_name(&attr.name);
        if !self.checked_attributes.contains(&name) {
            return;
        }
        let Some(JSXAttrValue::Str(s)) = &attr.value else {
            return;
        };
        let Some(value) = s.value.as_str() else {
            return;
        };

        let range = self.parsed.range(s.span);
        let raw = &self.source[range.clone()];
        // Escapes or entities would make the stored text differ from the source.
        if raw.len() < 2 || &raw[1..raw.len() - 1] != value {
            return;
        }
        if !is_candidate_text(value) {
            return;
        }
        self.candidates.push(RewriteCandidate {
            text: value.to_string(),
            kind: CandidateKind::Attribute {
                tag: tag.to_string(),
                name,
            },
            line: self.index.line_of(range.start),
            range,
        });
    }
}

impl Visit for CandidateExtractor<'_> {
    fn visit_jsx_element(&mut self, node: &JSXElement) {
        // Only a text node directly before `</tag>`, and not glued to an
        // expression container (`{count}Items`), counts.
        if node.closing.is_some()
            && let Some((JSXElementChild::JSXText(text), rest)) = node.children.split_last()
            && !matches!(
                rest.last(),
                Some(JSXElementChild::JSXExprContainer(_) | JSXElementChild::JSXSpreadChild(_))
            )
        {
            let tag = element_name(&node.opening.name);
            self.check_text(text, &tag);
        }
        node.visit_children_with(self);
    }

    fn visit_jsx_opening_element(&mut self, node: &JSXOpeningElement) {
        let tag = element_name(&node.name);
        for attr in &node.attrs {
            if let JSXAttrOrSpread::JSXAttr(attr) = attr {
                self.check_attr(attr, &tag);
            }
        }
        node.visit_children_with(self);
    }
}

fn element_name(name: &JSXElementName) -> String {
    match name {
        JSXElementName::Ident(ident) => ident.sym.to_string(),
        JSXElementName::JSXMemberExpr(member) => member.prop.sym.to_string(),
        JSXElementName::JSXNamespacedName(ns) => format!("{}:{}", ns.ns.sym, ns.name.sym),
    }
}

fn attr_name(name: &JSXAttrName) -> String {
    match name {
        JSXAttrName::Ident(ident) => ident.sym.to_string(),
        JSXAttrName::JSXNamespacedName(ns) => format!("{}-{}", ns.ns.sym, ns.name.sym),
    }
}
