use serde::Serialize;

/// Half-open byte range into the source text.
///
/// Every position in the front-end is a byte offset into the original
/// UTF-8 source. Human-readable line/column pairs only exist at the
/// reporting boundary; [`line_col`] derives them when a message needs one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Span {
    pub start: u32,
    pub end: u32,
}

impl Span {
    /// Create a new span from byte offsets.
    pub fn new(start: u32, end: u32) -> Self {
        debug_assert!(start <= end, "malformed span: {start}..{end}");
        Self { start, end }
    }

    /// Length of the span in bytes.
    pub fn len(&self) -> u32 {
        self.end - self.start
    }

    /// Whether the span is zero-length.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// A 1-based line/column pair for error messages and the token listing.
///
/// Columns are measured in bytes from the start of the line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LineCol {
    pub line: u32,
    pub column: u32,
}

/// Locate a byte offset in the source.
///
/// Walks the source prefix once, counting newlines. Positions are only
/// asked for on error paths and in the `--lexer` listing, so nothing is
/// precomputed or cached. Offsets past the end of the source clamp to
/// its final position.
pub fn line_col(source: &str, offset: u32) -> LineCol {
    let upto = (offset as usize).min(source.len());
    let mut line = 1u32;
    let mut line_start = 0usize;
    for (i, byte) in source.bytes().enumerate().take(upto) {
        if byte == b'\n' {
            line += 1;
            line_start = i + 1;
        }
    }
    LineCol {
        line,
        column: (upto - line_start) as u32 + 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spans_are_half_open() {
        let span = Span::new(2, 6);
        assert_eq!(span.len(), 4);
        assert!(!span.is_empty());
        assert!(Span::new(3, 3).is_empty());
    }

    #[test]
    fn first_line_columns_start_at_one() {
        let src = "local x";
        assert_eq!(line_col(src, 0), LineCol { line: 1, column: 1 });
        assert_eq!(line_col(src, 6), LineCol { line: 1, column: 7 });
    }

    #[test]
    fn newlines_advance_the_line() {
        let src = "x = 1\ny = 2\nend";
        assert_eq!(line_col(src, 6), LineCol { line: 2, column: 1 });
        assert_eq!(line_col(src, 10), LineCol { line: 2, column: 5 });
        assert_eq!(line_col(src, 12), LineCol { line: 3, column: 1 });
    }

    #[test]
    fn the_newline_byte_belongs_to_its_own_line() {
        let src = "ab\ncd";
        assert_eq!(line_col(src, 2), LineCol { line: 1, column: 3 });
        assert_eq!(line_col(src, 3), LineCol { line: 2, column: 1 });
    }

    #[test]
    fn offsets_past_the_end_clamp() {
        let src = "x";
        assert_eq!(line_col(src, 99), LineCol { line: 1, column: 2 });
        assert_eq!(line_col("", 0), LineCol { line: 1, column: 1 });
    }

    #[test]
    fn columns_count_bytes_not_characters() {
        // 'á' is two bytes, so the identifier after it sits at byte column 6.
        let src = "olá x";
        assert_eq!(line_col(src, 5), LineCol { line: 1, column: 6 });
    }
}
