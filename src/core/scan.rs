//! Function-boundary scanner.
//!
//! Finds the top-level component functions of a page and, for each one,
//! the line span it occupies and how translations are (or will be) bound
//! inside it. Boundaries come from the parsed module, so braces inside
//! strings, templates, or comments never shift them.

use std::collections::HashSet;
use std::ops::Range;

use swc_common::Span;
use swc_ecma_ast::{
    ArrowExpr, BlockStmt, BlockStmtOrExpr, Callee, CatchClause, Decl, DefaultDecl, Expr, FnDecl,
    Function, ImportSpecifier, Module, ModuleDecl, ModuleExportName, ModuleItem, ObjectPat,
    ObjectPatProp, Pat, PropName, Stmt, VarDeclarator,
};
use swc_ecma_visit::{Visit, VisitWith};

use crate::core::extract::RewriteCandidate;
use crate::core::parsers::jsx::ParsedJSX;
use crate::core::source::LineIndex;

/// Names the scanner looks for.
#[derive(Debug, Clone, Copy)]
pub struct ScanOptions<'a> {
    /// Hook function that returns the translator, e.g. `useTranslation`.
    pub hook_name: &'a str,
    /// Property of the hook result holding the translator, and the default local name.
    pub translator_name: &'a str,
    /// Local name used when `translator_name` is already taken.
    pub alias_name: &'a str,
}

/// Whether a function already acquires the translator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HookState {
    /// `const { t } = useTranslation()` or `const { t: tr } = useTranslation()`.
    Present { binding: String },
    /// The hook is called but its result does not bind the translator.
    Unbound,
    /// No hook call in the function.
    Missing,
}

/// Line range (0-based, inclusive) of one top-level component function.
#[derive(Debug, Clone)]
pub struct FunctionSpan {
    pub name: Option<String>,
    pub start_line: usize,
    pub end_line: usize,
    /// Byte offset of the body's opening `{`.
    pub brace_offset: usize,
    pub hook: HookState,
    /// Local name translator calls in this function use.
    pub binding: String,
    /// Byte ranges of nested scopes that rebind `binding`.
    pub shadowed: Vec<Range<usize>>,
    pub candidates: Vec<RewriteCandidate>,
}

impl FunctionSpan {
    pub fn has_hook(&self) -> bool {
        !matches!(self.hook, HookState::Missing)
    }

    pub fn has_candidates(&self) -> bool {
        !self.candidates.is_empty()
    }

    /// True if `offset` lies where `binding` means something else.
    pub fn is_shadowed(&self, offset: usize) -> bool {
        self.shadowed.iter().any(|range| range.contains(&offset))
    }
}

/// A detected function together with its AST, for candidate extraction.
pub struct DetectedFunction<'a> {
    pub span: FunctionSpan,
    pub function: &'a Function,
}

/// True if the module imports `hook_name` (named or default import).
pub fn imports_hook(module: &Module, hook_name: &str) -> bool {
    module.body.iter().any(|item| {
        let ModuleItem::ModuleDecl(ModuleDecl::Import(import)) = item else {
            return false;
        };
        import.specifiers.iter().any(|specifier| match specifier {
            ImportSpecifier::Named(named) => {
                &*named.local.sym == hook_name
                    || matches!(
                        &named.imported,
                        Some(ModuleExportName::Ident(ident)) if &*ident.sym == hook_name
                    )
            }
            ImportSpecifier::Default(default) => &*default.local.sym == hook_name,
            ImportSpecifier::Namespace(_) => false,
        })
    })
}

/// Detect top-level component functions in source order.
///
/// Recognized forms are `export default function`, `export function`, and
/// `function Name` where `Name` starts with an uppercase letter. Bodiless
/// declarations (TypeScript overloads) are ignored.
pub fn scan_functions<'a>(
    parsed: &'a ParsedJSX,
    index: &LineIndex,
    options: &ScanOptions,
) -> Vec<DetectedFunction<'a>> {
    let mut detected = Vec::new();

    for item in &parsed.module.body {
        let found: Option<(Span, Option<String>, &Function)> = match item {
            ModuleItem::ModuleDecl(ModuleDecl::ExportDefaultDecl(export)) => match &export.decl {
                DefaultDecl::Fn(fn_expr) => Some((
                    export.span,
                    fn_expr.ident.as_ref().map(|i| i.sym.to_string()),
                    &*fn_expr.function,
                )),
                _ => None,
            },
            ModuleItem::ModuleDecl(ModuleDecl::ExportDecl(export)) => match &export.decl {
                Decl::Fn(fn_decl) => Some((
                    export.span,
                    Some(fn_decl.ident.sym.to_string()),
                    &*fn_decl.function,
                )),
                _ => None,
            },
            ModuleItem::Stmt(Stmt::Decl(Decl::Fn(fn_decl))) if is_component_name(fn_decl) => Some(
                (
                    fn_decl.function.span,
                    Some(fn_decl.ident.sym.to_string()),
                    &*fn_decl.function,
                ),
            ),
            _ => None,
        };

        let Some((decl_span, name, function)) = found else {
            continue;
        };
        let Some(body) = &function.body else {
            continue;
        };

        let start_line = index.line_of(parsed.offset(decl_span.lo));
        // `hi` is exclusive; the closing brace is the byte before it.
        let end_line = index.line_of(parsed.offset(body.span.hi).saturating_sub(1));

        let hook = find_hook(body, options);
        let binding = match &hook {
            HookState::Present { binding } => binding.clone(),
            HookState::Unbound => options.translator_name.to_string(),
            HookState::Missing => choose_binding(&collect_bindings(function), options),
        };
        let shadowed = find_shadowing_scopes(parsed, body, &binding);

        detected.push(DetectedFunction {
            span: FunctionSpan {
                name,
                start_line,
                end_line,
                brace_offset: parsed.offset(body.span.lo),
                hook,
                binding,
                shadowed,
                candidates: Vec::new(),
            },
            function,
        });
    }

    detected
}

fn is_component_name(fn_decl: &FnDecl) -> bool {
    fn_decl
        .ident
        .sym
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_uppercase())
}

/// Pick the translator name for a function without a hook.
///
/// Falls back to the alias, then to numbered aliases (`tr2`, `tr3`, ...).
fn choose_binding(bound: &HashSet<String>, options: &ScanOptions) -> String {
    if !bound.contains(options.translator_name) {
        return options.translator_name.to_string();
    }
    if !bound.contains(options.alias_name) {
        return options.alias_name.to_string();
    }
    let mut n = 2;
    loop {
        let candidate = format!("{}{}", options.alias_name, n);
        if !bound.contains(&candidate) {
            return candidate;
        }
        n += 1;
    }
}

/// Look for the hook in the function's own body. Nested functions call
/// hooks for themselves, not for the component.
fn find_hook(body: &BlockStmt, options: &ScanOptions) -> HookState {
    let mut finder = HookFinder {
        options,
        found: None,
    };
    body.visit_with(&mut finder);
    finder.found.unwrap_or(HookState::Missing)
}

struct HookFinder<'a> {
    options: &'a ScanOptions<'a>,
    found: Option<HookState>,
}

impl HookFinder<'_> {
    fn is_hook_call(&self, expr: &Expr) -> bool {
        let Expr::Call(call) = expr else {
            return false;
        };
        call.args.is_empty()
            && matches!(
                &call.callee,
                Callee::Expr(callee) if matches!(&**callee, Expr::Ident(ident) if &*ident.sym == self.options.hook_name)
            )
    }

    fn translator_binding(&self, pattern: &ObjectPat) -> Option<String> {
        let translator = self.options.translator_name;
        pattern.props.iter().find_map(|prop| match prop {
            ObjectPatProp::Assign(assign) if &*assign.key.id.sym == translator => {
                Some(translator.to_string())
            }
            ObjectPatProp::KeyValue(kv) => match (&kv.key, &*kv.value) {
                (PropName::Ident(key), Pat::Ident(local)) if &*key.sym == translator => {
                    Some(local.id.sym.to_string())
                }
                _ => None,
            },
            _ => None,
        })
    }
}

impl Visit for HookFinder<'_> {
    fn visit_var_declarator(&mut self, node: &VarDeclarator) {
        if self.found.is_none()
            && let Pat::Object(pattern) = &node.name
            && let Some(init) = &node.init
            && self.is_hook_call(init)
        {
            self.found = Some(match self.translator_binding(pattern) {
                Some(binding) => HookState::Present { binding },
                None => HookState::Unbound,
            });
        }
        node.visit_children_with(self);
    }

    fn visit_function(&mut self, _: &Function) {}

    fn visit_arrow_expr(&mut self, _: &ArrowExpr) {}
}

/// Every identifier bound anywhere inside `function`, parameters included.
fn collect_bindings(function: &Function) -> HashSet<String> {
    let mut collector = BindingCollector::default();
    function.visit_with(&mut collector);
    collector.names
}

#[derive(Default)]
struct BindingCollector {
    names: HashSet<String>,
}

impl Visit for BindingCollector {
    fn visit_binding_ident(&mut self, node: &swc_ecma_ast::BindingIdent) {
        self.names.insert(node.id.sym.to_string());
    }

    fn visit_fn_decl(&mut self, node: &FnDecl) {
        self.names.insert(node.ident.sym.to_string());
        node.visit_children_with(self);
    }
}

/// Byte ranges of the scopes nested in `body` that bind `name` again,
/// e.g. `items.map(t => ...)` inside a function using `t`.
fn find_shadowing_scopes(parsed: &ParsedJSX, body: &BlockStmt, name: &str) -> Vec<Range<usize>> {
    let mut finder = ShadowFinder {
        parsed,
        name,
        ranges: Vec::new(),
    };
    // The body itself declares the translator; only nested scopes count.
    for stmt in &body.stmts {
        stmt.visit_with(&mut finder);
    }
    finder.ranges
}

struct ShadowFinder<'a> {
    parsed: &'a ParsedJSX,
    name: &'a str,
    ranges: Vec<Range<usize>>,
}

impl ShadowFinder<'_> {
    fn binds<N: VisitWith<BindingCollector>>(&self, node: &N) -> bool {
        let mut collector = BindingCollector::default();
        node.visit_with(&mut collector);
        collector.names.contains(self.name)
    }

    /// True if a statement directly inside `block` declares `name`.
    fn declares(&self, block: &BlockStmt) -> bool {
        block.stmts.iter().any(|stmt| match stmt {
            Stmt::Decl(Decl::Var(var)) => var.decls.iter().any(|d| self.binds(&d.name)),
            Stmt::Decl(Decl::Fn(fn_decl)) => &*fn_decl.ident.sym == self.name,
            Stmt::Decl(Decl::Class(class)) => &*class.ident.sym == self.name,
            _ => false,
        })
    }

    fn shadow(&mut self, span: Span) {
        self.ranges.push(self.parsed.range(span));
    }
}

impl Visit for ShadowFinder<'_> {
    fn visit_function(&mut self, node: &Function) {
        let rebinds = node.params.iter().any(|p| self.binds(&p.pat))
            || node.body.as_ref().is_some_and(|body| self.declares(body));
        if rebinds {
            self.shadow(node.span);
        } else {
            node.visit_children_with(self);
        }
    }

    fn visit_arrow_expr(&mut self, node: &ArrowExpr) {
        let rebinds = node.params.iter().any(|p| self.binds(p))
            || matches!(&*node.body, BlockStmtOrExpr::BlockStmt(body) if self.declares(body));
        if rebinds {
            self.shadow(node.span);
        } else {
            node.visit_children_with(self);
        }
    }

    fn visit_catch_clause(&mut self, node: &CatchClause) {
        if node.param.as_ref().is_some_and(|p| self.binds(p)) {
            self.shadow(node.span);
        } else {
            node.visit_children_with(self);
        }
    }

    fn visit_block_stmt(&mut self, node: &BlockStmt) {
        if self.declares(node) {
            self.shadow(node.span);
        } else {
            node.visit_children_with(self);
        }
    }
}
