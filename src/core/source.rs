//! Line-oriented view of a source file.
//!
//! Rewrites replace whole line ranges, so the file is kept as a vector of
//! lines split on `\n`. Joining them back with `\n` restores the original
//! bytes exactly, including a trailing newline and any `\r`.

/// Byte offsets of line starts, for mapping parser positions to lines.
#[derive(Debug, Clone)]
pub struct LineIndex {
    offsets: Vec<usize>,
}

impl LineIndex {
    pub fn new(content: &str) -> Self {
        let mut offsets = vec![0];
        for (i, b) in content.bytes().enumerate() {
            if b == b'\n' {
                offsets.push(i + 1);
            }
        }
        Self { offsets }
    }

    /// 0-based line containing `offset`.
    pub fn line_of(&self, offset: usize) -> usize {
        match self.offsets.binary_search(&offset) {
            Ok(line) => line,
            Err(line) => line - 1,
        }
    }

    /// Byte offset where `line` (0-based) starts.
    pub fn line_start(&self, line: usize) -> usize {
        self.offsets[line]
    }

}

/// A source file as an ordered, editable sequence of lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    lines: Vec<String>,
}

impl SourceFile {
    pub fn new(content: &str) -> Self {
        Self {
            lines: content.split('\n').map(String::from).collect(),
        }
    }

    /// Text of lines `start..=end` joined with `\n`.
    pub fn slice(&self, start: usize, end: usize) -> String {
        self.lines[start..=end].join("\n")
    }

    /// Replace lines `start..=end` with the lines of `text`.
    pub fn replace_lines(&mut self, start: usize, end: usize, text: &str) {
        self.lines
            .splice(start..=end, text.split('\n').map(String::from));
    }

    pub fn content(&self) -> String {
        self.lines.join("\n")
    }
}
