//! Stitches per-line literal fragments into whole literal tags.

use std::ops::Range;

use crate::scanner::{scan_line, LineLiteral};
use crate::snapshot::Snapshot;
use crate::tag::LiteralTag;

use super::cache::LineStateCache;

/// Collects every literal that intersects `range`.
///
/// Scanning starts at the first line of the verbatim string (if any) that is
/// open when `range` begins, and continues past the end of `range` until no
/// verbatim string is open, so straddling literals come back whole. A literal
/// still open at end of file is emitted as it stands.
pub(super) fn assemble(
    snapshot: &Snapshot,
    cache: &LineStateCache,
    range: Range<usize>,
) -> Vec<LiteralTag> {
    let line_count = snapshot.line_count().min(cache.len());
    let mut line = snapshot.line_number_at(range.start);
    while line > 0 && cache.state_before(line).is_multiline_string() {
        line -= 1;
    }

    let mut state = cache.state_before(line);
    let mut current: Option<LiteralTag> = None;
    let mut tags = Vec::new();

    while line < line_count {
        let Some(info) = snapshot.line(line) else {
            break;
        };
        let past_end = if range.is_empty() {
            info.start > range.end
        } else {
            info.start >= range.end
        };
        if past_end && !state.is_multiline_string() {
            break;
        }

        let text = &snapshot.text()[info.range()];
        let scan = scan_line(state, text);

        for fragment in scan.literals {
            let fragment = absolute(fragment, info.start);
            if fragment.continued {
                match current.as_mut() {
                    Some(tag) => tag.absorb(fragment.tag),
                    None => current = Some(fragment.tag),
                }
                if !fragment.open_at_end {
                    tags.extend(current.take());
                }
            } else {
                tags.extend(current.take());
                if fragment.open_at_end {
                    current = Some(fragment.tag);
                } else {
                    tags.push(fragment.tag);
                }
            }
        }

        state = scan.state;
        if !state.is_multiline_string() {
            // Closed at column 0 of this line: the open literal ends here.
            tags.extend(current.take());
        }
        line += 1;
    }

    tags.extend(current.take());
    tags.retain(|tag| tag.intersects(&range));
    tags
}

struct Fragment {
    tag: LiteralTag,
    continued: bool,
    open_at_end: bool,
}

fn absolute(literal: LineLiteral, line_start: usize) -> Fragment {
    let shift = |r: Range<usize>| r.start + line_start..r.end + line_start;
    Fragment {
        tag: LiteralTag {
            range: shift(literal.range),
            interpolated: literal.interpolated,
            interpolations: literal.interpolations.into_iter().map(shift).collect(),
        },
        continued: literal.continued,
        open_at_end: literal.open_at_end,
    }
}
