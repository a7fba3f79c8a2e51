//! String literal tagging for a single C# buffer.
//!
//! A [`StringTagger`] is bound to one buffer. It owns the per-line state
//! cache, keeps it in sync with edits ([`StringTagger::apply`]) and answers
//! range queries with whole literal tags ([`StringTagger::tags`]), including
//! verbatim strings that straddle the query on either side.

mod assemble;
mod cache;

use std::ops::Range;

use thiserror::Error;

use crate::scanner::ScanState;
use crate::snapshot::{Snapshot, TextChange};
use crate::tag::LiteralTag;
use cache::LineStateCache;

/// Error applying an edit to a tagger.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EditError {
    /// The change was made against a snapshot the tagger is not tracking.
    #[error("change is based on version {found}, tagger tracks version {expected}")]
    VersionMismatch { expected: u64, found: u64 },
}

/// Notification that the tags in a region may have changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagsChanged {
    /// Lines whose state was recomputed
    pub lines: Range<usize>,
    /// Absolute span of those lines in the new snapshot
    pub span: Range<usize>,
}

/// Incremental string-literal tagger for one buffer.
#[derive(Debug, Clone)]
pub struct StringTagger {
    snapshot: Snapshot,
    cache: LineStateCache,
}

impl StringTagger {
    /// Creates a tagger and scans the whole snapshot once.
    pub fn new(snapshot: Snapshot) -> Self {
        let cache = LineStateCache::build(&snapshot);
        tracing::debug!(
            version = snapshot.version(),
            lines = snapshot.line_count(),
            "string tagger created"
        );
        Self { snapshot, cache }
    }

    /// The snapshot the cache currently describes.
    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    /// Cached end-of-line state of `line`.
    pub fn line_state(&self, line: usize) -> Option<ScanState> {
        self.cache.get(line)
    }

    /// All cached end-of-line states, one per line.
    pub fn line_states(&self) -> &[ScanState] {
        self.cache.states()
    }

    /// Brings the cache up to date with `after`, the snapshot produced by
    /// `changes`.
    ///
    /// `changes` must be in ascending order with positions in `after`
    /// coordinates, and all must be based on the tracked snapshot. The cache
    /// is first resized for every change, then each change is rescanned.
    /// Returns one notification per change.
    pub fn apply(
        &mut self,
        after: &Snapshot,
        changes: &[TextChange],
    ) -> Result<Vec<TagsChanged>, EditError> {
        let expected = self.snapshot.version();
        if let Some(change) = changes.iter().find(|c| c.base_version != expected) {
            return Err(EditError::VersionMismatch {
                expected,
                found: change.base_version,
            });
        }

        for change in changes {
            let line = after.line_number_at(change.new_position);
            let delta = change.line_count_delta;
            if delta > 0 {
                self.cache.insert_at(line, delta.unsigned_abs());
            } else if delta < 0 {
                self.cache.remove_at(line, delta.unsigned_abs());
            }
        }
        debug_assert_eq!(self.cache.len(), after.line_count());

        let mut notifications = Vec::with_capacity(changes.len());
        for change in changes {
            let first = after.line_number_at(change.new_position);
            let last = after.line_number_at(change.new_position + change.new_len);
            let lines = self.cache.rescan(after, first..=last);
            let span = line_span(after, &lines);
            tracing::debug!(
                version = after.version(),
                first_line = lines.start,
                last_line = lines.end.saturating_sub(1),
                dirty_end = last,
                "rescanned after change"
            );
            notifications.push(TagsChanged { lines, span });
        }

        self.snapshot = after.clone();
        Ok(notifications)
    }

    /// Returns every literal tag that intersects `range` in `snapshot`.
    ///
    /// Tags are whole literals: a verbatim string that starts before the
    /// range or ends after it is returned in full. A query against any
    /// snapshot other than the tracked one returns nothing.
    pub fn tags(&self, snapshot: &Snapshot, range: Range<usize>) -> Vec<LiteralTag> {
        if !snapshot.same(&self.snapshot) {
            tracing::debug!(
                requested = snapshot.version(),
                tracked = self.snapshot.version(),
                "ignoring tag query against stale snapshot"
            );
            return Vec::new();
        }
        assemble::assemble(snapshot, &self.cache, range)
    }
}

fn line_span(snapshot: &Snapshot, lines: &Range<usize>) -> Range<usize> {
    let start = snapshot.line(lines.start).map_or(snapshot.len(), |l| l.start);
    let end = lines
        .end
        .checked_sub(1)
        .and_then(|last| snapshot.line(last))
        .map_or(start, |l| l.end);
    start..end.max(start)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::scan_line;

    fn fresh_states(snapshot: &Snapshot) -> Vec<ScanState> {
        let mut state = ScanState::Default;
        (0..snapshot.line_count())
            .map(|line| {
                state = scan_line(state, snapshot.line_text(line).unwrap()).state;
                state
            })
            .collect()
    }

    #[test]
    fn test_new_scans_everything() {
        let snapshot = Snapshot::new("x = @\"a\nb\";\n/* c\n*/");
        let tagger = StringTagger::new(snapshot.clone());
        assert_eq!(tagger.line_states(), fresh_states(&snapshot).as_slice());
    }

    #[test]
    fn test_apply_insert_line_break() {
        let snapshot = Snapshot::new("var a = 1;\nvar b = @\"x\ny\";\nvar c = 2;");
        let mut tagger = StringTagger::new(snapshot.clone());

        let (after, change) = snapshot.insert(10, "\nvar z = 0;");
        let notes = tagger.apply(&after, &[change]).unwrap();

        assert_eq!(notes.len(), 1);
        assert_eq!(tagger.line_states(), fresh_states(&after).as_slice());
        assert!(tagger.snapshot().same(&after));
    }

    #[test]
    fn test_apply_join_lines() {
        let snapshot = Snapshot::new("s = @\"a\nb\nc\";\nx();");
        let mut tagger = StringTagger::new(snapshot.clone());

        let (after, change) = snapshot.delete(7..10);
        tagger.apply(&after, &[change]).unwrap();
        assert_eq!(tagger.line_states(), fresh_states(&after).as_slice());
    }

    #[test]
    fn test_apply_opening_string_propagates() {
        let snapshot = Snapshot::new("a();\nb();\nc();\nd();");
        let mut tagger = StringTagger::new(snapshot.clone());

        let (after, change) = snapshot.insert(0, "@\"");
        let notes = tagger.apply(&after, &[change]).unwrap();

        // Every following line is now inside the unterminated string.
        assert_eq!(notes[0].lines, 0..4);
        assert_eq!(notes[0].span, 0..after.len());
        assert!(tagger
            .line_states()
            .iter()
            .all(|s| *s == ScanState::MultiLineString));
    }

    #[test]
    fn test_apply_closing_string_across_new_line() {
        let snapshot = Snapshot::new("@\"abc\ndef\nghi\"");
        let mut tagger = StringTagger::new(snapshot.clone());

        let (after, change) = snapshot.edit(5..5, "\"\nz");
        tagger.apply(&after, &[change]).unwrap();

        assert_eq!(tagger.line_states(), fresh_states(&after).as_slice());
        assert_eq!(tagger.line_states(), &[ScanState::Default; 4]);
        assert_eq!(tagger.tags(&after, 0..after.len()).len(), 1);
    }

    #[test]
    fn test_apply_joining_line_into_open_string() {
        let snapshot = Snapshot::new("x\n@\"s\nt\"\n/* c\n*/");
        let mut tagger = StringTagger::new(snapshot.clone());

        // Removing the closing line leaves the string open to the end.
        let (after, change) = snapshot.delete(5..8);
        tagger.apply(&after, &[change]).unwrap();

        assert_eq!(tagger.line_states(), fresh_states(&after).as_slice());
        assert_eq!(tagger.line_state(3), Some(ScanState::MultiLineString));
    }

    #[test]
    fn test_edit_within_line_touches_one_line() {
        let snapshot = Snapshot::new("a();\nvar s = \"SELECT 1\";\nc();\nd();");
        let mut tagger = StringTagger::new(snapshot.clone());

        let (after, change) = snapshot.insert(20, " + 1");
        let notes = tagger.apply(&after, &[change]).unwrap();
        assert_eq!(notes[0].lines, 1..2);
    }

    #[test]
    fn test_apply_rejects_foreign_change() {
        let snapshot = Snapshot::new("x");
        let mut tagger = StringTagger::new(snapshot.clone());
        let (first, _) = snapshot.insert(0, "a");
        let (second, change) = first.insert(0, "b");

        let err = tagger.apply(&second, &[change]).unwrap_err();
        assert_eq!(
            err,
            EditError::VersionMismatch {
                expected: 0,
                found: 1
            }
        );
    }

    #[test]
    fn test_stale_snapshot_yields_nothing() {
        let snapshot = Snapshot::new("var s = \"SELECT 1\";");
        let mut tagger = StringTagger::new(snapshot.clone());
        assert_eq!(tagger.tags(&snapshot, 0..snapshot.len()).len(), 1);

        let (after, change) = snapshot.insert(0, " ");
        tagger.apply(&after, &[change]).unwrap();
        assert!(tagger.tags(&snapshot, 0..snapshot.len()).is_empty());
        assert_eq!(tagger.tags(&after, 0..after.len()).len(), 1);
    }
}
