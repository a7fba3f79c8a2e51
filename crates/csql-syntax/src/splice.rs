//! Interpolation hole handling around the SQL parser.
//!
//! Before parsing, every hole in a literal is overwritten with a filler
//! byte so the SQL tokenizer never sees C# code. After projection the
//! classified ranges are cut around the holes again. All ranges here are
//! relative to the literal content.

use std::ops::Range;

use crate::category::Category;

/// Default start keywords that make a literal worth parsing as SQL.
pub const DEFAULT_START_KEYWORDS: &[&str] = &[
    "SELECT", "INSERT", "UPDATE", "DELETE", "MERGE", "WITH", "CREATE", "ALTER", "DROP",
    "TRUNCATE", "EXEC", "EXECUTE", "DECLARE", "BEGIN", "GRANT", "REVOKE",
];

fn is_identifier_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'_' | b'@' | b'#' | b'$')
}

/// Returns the start keyword `text` begins with, ignoring leading
/// whitespace. Matching is case-sensitive and the keyword must be followed
/// by a non-identifier character or the end of the text.
pub fn matching_start_keyword<'k, S: AsRef<str>>(text: &str, keywords: &'k [S]) -> Option<&'k str> {
    let trimmed = text.trim_start();
    keywords.iter().map(|k| k.as_ref()).find(|keyword| {
        trimmed.starts_with(keyword)
            && trimmed
                .as_bytes()
                .get(keyword.len())
                .is_none_or(|b| !is_identifier_byte(*b))
    })
}

/// Copy of `text` with every byte inside `holes` replaced by `filler`.
///
/// `filler` must be ASCII and hole boundaries must be character
/// boundaries, which holds for ranges delimited by `{` and `}`. The result
/// has the same byte length as `text`.
pub fn fill_holes(text: &str, holes: &[Range<usize>], filler: u8) -> String {
    debug_assert!(filler.is_ascii());
    let filler = filler as char;
    let mut out = String::with_capacity(text.len());
    let mut holes = holes.iter().peekable();

    for (i, c) in text.char_indices() {
        while holes.peek().is_some_and(|hole| hole.end <= i) {
            holes.next();
        }
        let inside = holes.peek().is_some_and(|hole| hole.start <= i);
        if inside {
            out.extend(std::iter::repeat(filler).take(c.len_utf8()));
        } else {
            out.push(c);
        }
    }
    out
}

/// Cuts classified ranges around the holes, dropping the parts inside them.
///
/// Both inputs must be sorted by offset and the holes must not overlap each
/// other. Empty pieces are never emitted.
pub fn split_around_holes(
    pieces: impl IntoIterator<Item = (Category, Range<usize>)>,
    holes: &[Range<usize>],
) -> Vec<(Category, Range<usize>)> {
    let mut out = Vec::new();
    let mut first_hole = 0;

    for (category, range) in pieces {
        let mut start = range.start;
        let end = range.end;

        while first_hole < holes.len() && holes[first_hole].end <= start {
            first_hole += 1;
        }

        let mut next = first_hole;
        while start < end {
            match holes.get(next) {
                Some(hole) if hole.start < end => {
                    if hole.start > start {
                        out.push((category, start..hole.start));
                    }
                    start = start.max(hole.end);
                    next += 1;
                }
                _ => {
                    out.push((category, start..end));
                    break;
                }
            }
        }
    }
    out
}
