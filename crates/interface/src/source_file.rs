use crate::{BytePos, CharPos, Span};

/// A 1-based line number and 0-based UTF-16 column.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LineCol {
    /// 1-based line number.
    pub line: u32,
    /// 0-based column, in UTF-16 code units.
    pub col: CharPos,
}

impl LineCol {
    /// Returns the column as a 1-based number, as reported in diagnostics.
    #[inline]
    pub fn col1(&self) -> u32 {
        self.col.to_u32() + 1
    }
}

/// A single source file with a precomputed line table.
#[derive(Clone, Debug)]
pub struct SourceFile {
    /// The name of the file, as provided by the caller. Not required to
    /// exist on disk; used for diagnostics and source map `sources`.
    pub name: String,
    /// The complete source.
    pub src: String,
    /// Byte positions of the start of each line. Always starts with 0.
    lines: Vec<BytePos>,
}

impl SourceFile {
    /// Creates a new source file, computing its line table.
    pub fn new(name: String, src: String) -> Self {
        let lines = analyze_lines(&src);
        trace!(name, src.len = src.len(), lines = lines.len(), "new source file");
        Self { name, src, lines }
    }

    /// Returns the number of lines in the file.
    #[inline]
    pub fn count_lines(&self) -> usize {
        self.lines.len()
    }

    /// Returns the 0-based index of the line containing `pos`.
    pub fn lookup_line(&self, pos: BytePos) -> usize {
        self.lines.partition_point(|&start| start <= pos) - 1
    }

    /// Resolves a byte position to a 1-based line and 0-based UTF-16 column.
    pub fn lookup_line_col(&self, pos: BytePos) -> LineCol {
        let pos = BytePos::from_usize(pos.to_usize().min(self.src.len()));
        let line = self.lookup_line(pos);
        let start = self.lines[line].to_usize();
        let col = utf16_width(&self.src[start..pos.to_usize()]);
        LineCol { line: line as u32 + 1, col: CharPos::from_usize(col) }
    }

    /// Returns the source snippet covered by `span`.
    pub fn span_to_snippet(&self, span: Span) -> &str {
        &self.src[span.to_range()]
    }
}

/// Returns the length of `s` in UTF-16 code units.
#[inline]
pub fn utf16_width(s: &str) -> usize {
    s.chars().map(char::len_utf16).sum()
}

/// Finds the start positions of all lines.
///
/// A line is terminated by `\n`; `\r\n` therefore also terminates, with the
/// `\r` belonging to the preceding line.
fn analyze_lines(src: &str) -> Vec<BytePos> {
    let mut lines = vec![BytePos(0)];
    lines.extend(memchr::memchr_iter(b'\n', src.as_bytes()).map(|i| BytePos::from_usize(i + 1)));
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(src: &str) -> SourceFile {
        SourceFile::new("test.wgsl".into(), src.into())
    }

    #[test]
    fn line_table() {
        let f = file("a\nbc\n\nd");
        assert_eq!(f.count_lines(), 4);
        assert_eq!(f.lookup_line(BytePos(0)), 0);
        assert_eq!(f.lookup_line(BytePos(1)), 0);
        assert_eq!(f.lookup_line(BytePos(2)), 1);
        assert_eq!(f.lookup_line(BytePos(5)), 2);
        assert_eq!(f.lookup_line(BytePos(6)), 3);
    }

    #[test]
    fn line_col() {
        let f = file("fn main() {\n  let x = 1;\n}");
        let lc = f.lookup_line_col(BytePos(3));
        assert_eq!((lc.line, lc.col1()), (1, 4));
        let lc = f.lookup_line_col(BytePos(14));
        assert_eq!((lc.line, lc.col1()), (2, 3));
    }

    #[test]
    fn utf16_columns() {
        // '€' is 3 bytes in UTF-8 but 1 UTF-16 unit; '𐍈' is 4 bytes and 2 units.
        let f = file("let €𐍈x = 1;");
        let pos = f.src.find('x').unwrap();
        let lc = f.lookup_line_col(BytePos::from_usize(pos));
        assert_eq!(lc.col.to_u32(), 7);
    }
}
