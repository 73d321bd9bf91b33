use anyhow::{Result, anyhow};
use swc_common::{BytePos, FileName, Globals, SourceMap, Span};
use swc_ecma_ast::Module;
use swc_ecma_parser::{Parser, StringInput, Syntax, TsSyntax};

pub struct ParsedJSX {
    pub module: Module,
    /// Position of the first byte of the parsed file in its source map.
    pub start_pos: BytePos,
}

impl ParsedJSX {
    /// Convert an absolute `BytePos` into a byte offset into the parsed source string.
    pub fn offset(&self, pos: BytePos) -> usize {
        (pos.0 - self.start_pos.0) as usize
    }

    /// Byte range of `span` inside the parsed source string.
    pub fn range(&self, span: Span) -> std::ops::Range<usize> {
        self.offset(span.lo)..self.offset(span.hi)
    }
}

/// Parse JSX/TSX source code string into an AST.
///
/// Each call gets its own `Globals` and `SourceMap`; use
/// [`ParsedJSX::offset`] to map positions back into `code`.
pub fn parse_jsx_source(code: String, file_path: &str) -> Result<ParsedJSX> {
    use swc_common::GLOBALS;

    GLOBALS.set(&Globals::new(), || {
        let source_map = SourceMap::default();
        let source_file = source_map.new_source_file(FileName::Real(file_path.into()).into(), code);

        let syntax = Syntax::Typescript(TsSyntax {
            tsx: true,
            ..Default::default()
        });

        let mut parser = Parser::new(syntax, StringInput::from(&*source_file), None);

        let module = parser
            .parse_module()
            .map_err(|e| anyhow!("Failed to parse tsx string: {:?}", e))?;

        Ok(ParsedJSX {
            module,
            start_pos: source_file.start_pos,
        })
    })
}
