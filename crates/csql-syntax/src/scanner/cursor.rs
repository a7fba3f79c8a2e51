//! Byte cursor over a single line, plus the skip routines used inside
//! interpolation holes.
//!
//! The skip routines never record anything: they only move the cursor past a
//! nested construct so that a `}` or `"` inside it is not mistaken for the
//! end of the enclosing hole. All of them stop at end of line.

/// Position within one line of text.
#[derive(Debug, Clone, Copy)]
pub(crate) struct LineCursor<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> LineCursor<'a> {
    pub(crate) fn new(line: &'a str) -> Self {
        Self {
            bytes: line.as_bytes(),
            pos: 0,
        }
    }

    pub(crate) fn pos(&self) -> usize {
        self.pos
    }

    pub(crate) fn eol(&self) -> bool {
        self.pos >= self.bytes.len()
    }

    /// Byte at the cursor, or `0` at end of line.
    pub(crate) fn current(&self) -> u8 {
        self.peek(0)
    }

    /// Byte `n` positions ahead of the cursor, or `0` past end of line.
    pub(crate) fn peek(&self, n: usize) -> u8 {
        self.bytes.get(self.pos + n).copied().unwrap_or(0)
    }

    pub(crate) fn at(&self, pattern: &[u8]) -> bool {
        self.bytes[self.pos.min(self.bytes.len())..].starts_with(pattern)
    }

    /// Moves forward `n` bytes, never past end of line.
    pub(crate) fn advance(&mut self, n: usize) {
        self.pos = (self.pos + n).min(self.bytes.len());
    }

    pub(crate) fn advance_to_end(&mut self) {
        self.pos = self.bytes.len();
    }
}

/// Skips the rest of a regular (`"..."` / `$"..."`) string after its opening
/// quote, including the closing quote.
pub(crate) fn skip_string(cursor: &mut LineCursor<'_>, interpolated: bool) {
    while !cursor.eol() {
        match cursor.current() {
            b'\\' => cursor.advance(2),
            b'{' | b'}' if interpolated && cursor.peek(1) == cursor.current() => cursor.advance(2),
            b'{' if interpolated => {
                cursor.advance(1);
                skip_hole(cursor);
            }
            b'"' => {
                cursor.advance(1);
                return;
            }
            _ => cursor.advance(1),
        }
    }
}

/// Skips the rest of a verbatim (`@"..."` / `$@"..."`) string after its
/// opening quote. Stops at end of line when the string stays open.
pub(crate) fn skip_verbatim_string(cursor: &mut LineCursor<'_>, interpolated: bool) {
    while !cursor.eol() {
        match cursor.current() {
            b'"' if cursor.peek(1) == b'"' => cursor.advance(2),
            b'{' | b'}' if interpolated && cursor.peek(1) == cursor.current() => cursor.advance(2),
            b'{' if interpolated => {
                cursor.advance(1);
                skip_hole(cursor);
            }
            b'"' => {
                cursor.advance(1);
                return;
            }
            _ => cursor.advance(1),
        }
    }
}

/// Skips a character literal after its opening `'`.
pub(crate) fn skip_char(cursor: &mut LineCursor<'_>) {
    while !cursor.eol() {
        match cursor.current() {
            b'\\' => cursor.advance(2),
            b'\'' => {
                cursor.advance(1);
                return;
            }
            _ => cursor.advance(1),
        }
    }
}

/// Skips a block comment after its opening `/*`. Returns true when the
/// comment was closed on this line.
pub(crate) fn skip_block_comment(cursor: &mut LineCursor<'_>) -> bool {
    while !cursor.eol() {
        if cursor.at(b"*/") {
            cursor.advance(2);
            return true;
        }
        cursor.advance(1);
    }
    false
}

/// Skips the body of an interpolation hole after its opening `{`, up to and
/// including the matching `}`.
///
/// Braces are depth-counted and nested literals and comments are stepped
/// over, so `{ new { A = "}" } }` ends at the last brace. Holes never span
/// lines: an unterminated hole ends at end of line.
pub(crate) fn skip_hole(cursor: &mut LineCursor<'_>) {
    let mut depth = 0usize;

    while !cursor.eol() {
        if cursor.at(b"$@\"") || cursor.at(b"@$\"") {
            cursor.advance(3);
            skip_verbatim_string(cursor, true);
        } else if cursor.at(b"$\"") {
            cursor.advance(2);
            skip_string(cursor, true);
        } else if cursor.at(b"@\"") {
            cursor.advance(2);
            skip_verbatim_string(cursor, false);
        } else if cursor.at(b"/*") {
            cursor.advance(2);
            skip_block_comment(cursor);
        } else if cursor.at(b"//") {
            cursor.advance_to_end();
        } else {
            match cursor.current() {
                b'"' => {
                    cursor.advance(1);
                    skip_string(cursor, false);
                }
                b'\'' => {
                    cursor.advance(1);
                    skip_char(cursor);
                }
                b'{' => {
                    depth += 1;
                    cursor.advance(1);
                }
                b'}' => {
                    cursor.advance(1);
                    if depth == 0 {
                        return;
                    }
                    depth -= 1;
                }
                _ => cursor.advance(1),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn after_hole(body: &str) -> usize {
        let mut cursor = LineCursor::new(body);
        skip_hole(&mut cursor);
        cursor.pos()
    }

    #[test]
    fn test_advance_is_clamped() {
        let mut cursor = LineCursor::new("ab");
        cursor.advance(5);
        assert!(cursor.eol());
        assert_eq!(cursor.pos(), 2);
        assert_eq!(cursor.current(), 0);
    }

    #[test]
    fn test_hole_ends_at_first_brace() {
        assert_eq!(after_hole("col} FROM t"), 4);
    }

    #[test]
    fn test_hole_skips_nested_braces() {
        assert_eq!(after_hole("new { A = 1 }} rest"), 14);
    }

    #[test]
    fn test_hole_skips_brace_in_string() {
        assert_eq!(after_hole("\"}\" + x} rest"), 8);
    }

    #[test]
    fn test_hole_skips_brace_in_char() {
        assert_eq!(after_hole("'}'} rest"), 4);
    }

    #[test]
    fn test_hole_skips_nested_interpolated_string() {
        assert_eq!(after_hole("$\"{a}\"} rest"), 7);
    }

    #[test]
    fn test_hole_line_comment_runs_to_end() {
        let body = "x // } not a close";
        assert_eq!(after_hole(body), body.len());
    }

    #[test]
    fn test_unterminated_hole_stops_at_eol() {
        assert_eq!(after_hole("abc"), 3);
    }

    #[test]
    fn test_verbatim_doubled_quote() {
        let mut cursor = LineCursor::new("a\"\"b\" tail");
        skip_verbatim_string(&mut cursor, false);
        assert_eq!(cursor.pos(), 5);
    }
}
