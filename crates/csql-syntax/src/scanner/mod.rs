//! Line-at-a-time scanner for C# string literals.
//!
//! [`scan_line`] is a pure function of the state at the end of the previous
//! line and the text of the current line. It returns the state at the end of
//! the line and the literal fragments found on it. Comments and character
//! literals are tracked only so that quotes inside them are not mistaken for
//! string delimiters; they never produce fragments.
//!
//! Fragment ranges cover the literal *content*: the `$`, `@` and quote
//! characters are excluded.

mod cursor;
mod state;

pub use state::ScanState;

use std::ops::Range;

use cursor::{skip_block_comment, skip_char, skip_hole, LineCursor};

/// A piece of a string literal found on one line. Offsets are relative to
/// the start of the line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineLiteral {
    /// Content range within the line
    pub range: Range<usize>,
    /// Whether the literal is an interpolated (`$`) string
    pub interpolated: bool,
    /// Interpolation holes, braces included, in line order
    pub interpolations: Vec<Range<usize>>,
    /// The literal was already open when the line started
    pub continued: bool,
    /// The literal is still open at the end of the line
    pub open_at_end: bool,
}

/// Result of scanning one line.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LineScan {
    /// State at the end of the line
    pub state: ScanState,
    /// Literal fragments in line order
    pub literals: Vec<LineLiteral>,
}

/// Scans one line starting from `state`.
///
/// Total over any input: unterminated constructs end at end of line.
/// Regular strings and character literals revert to [`ScanState::Default`];
/// verbatim strings and block comments carry over to the next line.
pub fn scan_line(state: ScanState, line: &str) -> LineScan {
    let mut scanner = LineScanner {
        cursor: LineCursor::new(line),
        state,
        literal_start: None,
        continued: false,
        holes: Vec::new(),
        literals: Vec::new(),
    };
    scanner.run();
    debug_assert!(scanner.state.can_end_line());

    LineScan {
        state: scanner.state,
        literals: scanner.literals,
    }
}

/// End-of-line state only.
pub fn next_state(state: ScanState, line: &str) -> ScanState {
    scan_line(state, line).state
}

struct LineScanner<'a> {
    cursor: LineCursor<'a>,
    state: ScanState,
    literal_start: Option<usize>,
    continued: bool,
    holes: Vec<Range<usize>>,
    literals: Vec<LineLiteral>,
}

impl LineScanner<'_> {
    fn run(&mut self) {
        if self.state.is_multiline_string() {
            self.start_literal(self.state);
            self.continued = true;
            self.scan_verbatim_string();
        } else if self.state == ScanState::MultilineComment {
            if skip_block_comment(&mut self.cursor) {
                self.state = ScanState::Default;
            }
        } else {
            // Regular strings never survive a line break.
            self.state = ScanState::Default;
        }

        while !self.cursor.eol() && self.state == ScanState::Default {
            self.scan_default();
        }
    }

    fn scan_default(&mut self) {
        let cursor = &mut self.cursor;
        if cursor.at(b"$@\"") || cursor.at(b"@$\"") {
            cursor.advance(3);
            self.start_literal(ScanState::InterpolatedMultiLineString);
            self.scan_verbatim_string();
        } else if cursor.at(b"$\"") {
            cursor.advance(2);
            self.start_literal(ScanState::InterpolatedString);
            self.scan_string();
        } else if cursor.at(b"@\"") {
            cursor.advance(2);
            self.start_literal(ScanState::MultiLineString);
            self.scan_verbatim_string();
        } else if cursor.at(b"/*") {
            cursor.advance(2);
            if !skip_block_comment(cursor) {
                self.state = ScanState::MultilineComment;
            }
        } else if cursor.at(b"//") {
            cursor.advance_to_end();
        } else {
            match cursor.current() {
                b'"' => {
                    cursor.advance(1);
                    self.start_literal(ScanState::String);
                    self.scan_string();
                }
                b'\'' => {
                    cursor.advance(1);
                    skip_char(cursor);
                }
                _ => cursor.advance(1),
            }
        }
    }

    fn scan_string(&mut self) {
        let interpolated = self.state.is_interpolated();
        while !self.cursor.eol() {
            match self.cursor.current() {
                b'\\' => self.cursor.advance(2),
                b'{' | b'}' if interpolated && self.cursor.peek(1) == self.cursor.current() => {
                    self.cursor.advance(2)
                }
                b'{' if interpolated => self.scan_hole(),
                b'"' => {
                    self.end_literal(ScanState::Default);
                    self.cursor.advance(1);
                    return;
                }
                _ => self.cursor.advance(1),
            }
        }

        // Unterminated at end of line: keep what we saw and fall back.
        self.end_literal(ScanState::Default);
    }

    fn scan_verbatim_string(&mut self) {
        let interpolated = self.state.is_interpolated();
        while !self.cursor.eol() {
            match self.cursor.current() {
                b'"' if self.cursor.peek(1) == b'"' => self.cursor.advance(2),
                b'{' | b'}' if interpolated && self.cursor.peek(1) == self.cursor.current() => {
                    self.cursor.advance(2)
                }
                b'{' if interpolated => self.scan_hole(),
                b'"' => {
                    self.end_literal(ScanState::Default);
                    self.cursor.advance(1);
                    return;
                }
                _ => self.cursor.advance(1),
            }
        }

        let state = self.state;
        self.end_literal(state);
    }

    fn scan_hole(&mut self) {
        let start = self.cursor.pos();
        self.cursor.advance(1);
        skip_hole(&mut self.cursor);
        self.holes.push(start..self.cursor.pos());
    }

    fn start_literal(&mut self, kind: ScanState) {
        debug_assert!(self.literal_start.is_none(), "literal started twice");
        self.literal_start = Some(self.cursor.pos());
        self.continued = false;
        self.state = kind;
    }

    /// Closes the current literal at the cursor and switches to `next`.
    /// Empty fragments are dropped.
    fn end_literal(&mut self, next: ScanState) {
        let start = self.literal_start.take().unwrap_or(0);
        let end = self.cursor.pos();
        let holes = std::mem::take(&mut self.holes);

        if end > start {
            self.literals.push(LineLiteral {
                range: start..end,
                interpolated: self.state.is_interpolated(),
                interpolations: holes,
                continued: self.continued,
                open_at_end: next.is_multiline_string(),
            });
        }

        self.continued = false;
        self.state = next;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn ranges(scan: &LineScan) -> Vec<Range<usize>> {
        scan.literals.iter().map(|l| l.range.clone()).collect()
    }

    #[test]
    fn test_plain_code_has_no_literals() {
        let scan = scan_line(ScanState::Default, "var x = 1 + y;");
        assert_eq!(scan.state, ScanState::Default);
        assert!(scan.literals.is_empty());
    }

    #[test]
    fn test_regular_string_content_range() {
        let line = r#"var q = "SELECT 1";"#;
        let scan = scan_line(ScanState::Default, line);
        assert_eq!(ranges(&scan), vec![9..17]);
        assert_eq!(&line[9..17], "SELECT 1");
        assert!(!scan.literals[0].interpolated);
    }

    #[test]
    fn test_escaped_quote_in_string() {
        let line = r#""a\"b" + "c""#;
        let scan = scan_line(ScanState::Default, line);
        assert_eq!(ranges(&scan), vec![1..5, 10..11]);
    }

    #[test]
    fn test_empty_string_produces_no_fragment() {
        let scan = scan_line(ScanState::Default, r#"x = "";"#);
        assert!(scan.literals.is_empty());
        assert_eq!(scan.state, ScanState::Default);
    }

    #[test]
    fn test_unterminated_string_reverts_to_default() {
        let line = r#"x = "SELECT"#;
        let scan = scan_line(ScanState::Default, line);
        assert_eq!(scan.state, ScanState::Default);
        assert_eq!(ranges(&scan), vec![5..line.len()]);
        assert!(!scan.literals[0].open_at_end);
    }

    #[test]
    fn test_interpolated_string_records_hole() {
        let line = r#"var x = $"SELECT {col} FROM t";"#;
        let scan = scan_line(ScanState::Default, line);
        assert_eq!(scan.literals.len(), 1);

        let literal = &scan.literals[0];
        assert!(literal.interpolated);
        assert_eq!(&line[literal.range.clone()], "SELECT {col} FROM t");
        assert_eq!(literal.interpolations.len(), 1);
        assert_eq!(&line[literal.interpolations[0].clone()], "{col}");
    }

    #[test]
    fn test_escaped_braces_are_not_holes() {
        let line = r#"$"{{literal}} {x}""#;
        let scan = scan_line(ScanState::Default, line);
        let literal = &scan.literals[0];
        assert_eq!(literal.interpolations.len(), 1);
        assert_eq!(&line[literal.interpolations[0].clone()], "{x}");
    }

    #[test]
    fn test_quote_inside_hole_does_not_close_string() {
        let line = r#"$"a {(b ? "x" : "y")} c";"#;
        let scan = scan_line(ScanState::Default, line);
        assert_eq!(scan.literals.len(), 1);
        assert_eq!(&line[scan.literals[0].range.clone()], r#"a {(b ? "x" : "y")} c"#);
    }

    #[test]
    fn test_verbatim_string_stays_open() {
        let line = r#"var q = @"SELECT *"#;
        let scan = scan_line(ScanState::Default, line);
        assert_eq!(scan.state, ScanState::MultiLineString);
        let literal = &scan.literals[0];
        assert_eq!(&line[literal.range.clone()], "SELECT *");
        assert!(literal.open_at_end);
        assert!(!literal.continued);
    }

    #[test]
    fn test_verbatim_continuation_closes() {
        let line = r#"FROM t" + "x";"#;
        let scan = scan_line(ScanState::MultiLineString, line);
        assert_eq!(scan.state, ScanState::Default);
        assert_eq!(ranges(&scan), vec![0..6, 11..12]);
        assert!(scan.literals[0].continued);
        assert!(!scan.literals[0].open_at_end);
        assert!(!scan.literals[1].continued);
    }

    #[test]
    fn test_verbatim_doubled_quote_is_content() {
        let line = r#"@"say ""hi""";"#;
        let scan = scan_line(ScanState::Default, line);
        assert_eq!(scan.state, ScanState::Default);
        assert_eq!(&line[scan.literals[0].range.clone()], r#"say ""hi"""#);
    }

    #[test]
    fn test_interpolated_verbatim() {
        let line = r#"$@"SELECT {a}"#;
        let scan = scan_line(ScanState::Default, line);
        assert_eq!(scan.state, ScanState::InterpolatedMultiLineString);
        assert!(scan.literals[0].interpolated);
        assert_eq!(scan.literals[0].interpolations, vec![10..13]);
    }

    #[test]
    fn test_char_literal_quote_is_not_string() {
        let scan = scan_line(ScanState::Default, r#"var c = '"'; var s = "x";"#);
        assert_eq!(ranges(&scan), vec![22..23]);
    }

    #[test]
    fn test_unterminated_char_literal() {
        let scan = scan_line(ScanState::Default, "var c = '\"abc");
        assert_eq!(scan.state, ScanState::Default);
        assert!(scan.literals.is_empty());
    }

    #[test]
    fn test_line_comment_hides_quotes() {
        let scan = scan_line(ScanState::Default, r#"x(); // "not a string""#);
        assert!(scan.literals.is_empty());
    }

    #[test]
    fn test_block_comment_carries_over() {
        let scan = scan_line(ScanState::Default, r#"/* "start"#);
        assert_eq!(scan.state, ScanState::MultilineComment);
        assert!(scan.literals.is_empty());

        let scan = scan_line(ScanState::MultilineComment, r#"end */ "s""#);
        assert_eq!(scan.state, ScanState::Default);
        assert_eq!(ranges(&scan), vec![8..9]);
    }

    #[test]
    fn test_regular_string_state_does_not_persist() {
        let scan = scan_line(ScanState::String, r#"abc"#);
        assert_eq!(scan.state, ScanState::Default);
        assert!(scan.literals.is_empty());
    }

    #[test]
    fn test_empty_continuation_line() {
        let scan = scan_line(ScanState::InterpolatedMultiLineString, "");
        assert_eq!(scan.state, ScanState::InterpolatedMultiLineString);
        assert!(scan.literals.is_empty());
    }

    #[test]
    fn test_close_at_column_zero() {
        let scan = scan_line(ScanState::MultiLineString, "\";");
        assert_eq!(scan.state, ScanState::Default);
        assert!(scan.literals.is_empty());
    }

    #[test]
    fn test_non_ascii_content() {
        let line = "s = \"caf\u{e9} \u{1F600}\";";
        let scan = scan_line(ScanState::Default, line);
        assert_eq!(&line[scan.literals[0].range.clone()], "caf\u{e9} \u{1F600}");
    }
}
