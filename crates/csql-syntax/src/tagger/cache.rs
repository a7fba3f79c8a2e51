//! Per-line end-state cache and the incremental rescan over it.

use std::ops::{Range, RangeInclusive};

use crate::scanner::{next_state, ScanState};
use crate::snapshot::Snapshot;

/// End-of-line scan state for every line of the tracked snapshot.
///
/// Invariant (after every [`rescan`](LineStateCache::rescan) that follows a
/// resize): `states.len()` equals the snapshot's line count and `states[i]`
/// is the state after scanning line `i` starting from `states[i - 1]`
/// (`Default` for line 0).
#[derive(Debug, Clone, Default)]
pub(crate) struct LineStateCache {
    states: Vec<ScanState>,
}

impl LineStateCache {
    /// Builds a fully scanned cache for `snapshot`.
    pub(crate) fn build(snapshot: &Snapshot) -> Self {
        let mut cache = Self {
            states: vec![ScanState::Default; snapshot.line_count()],
        };
        let last = snapshot.line_count() - 1;
        cache.rescan(snapshot, 0..=last);
        cache
    }

    pub(crate) fn len(&self) -> usize {
        self.states.len()
    }

    pub(crate) fn get(&self, line: usize) -> Option<ScanState> {
        self.states.get(line).copied()
    }

    pub(crate) fn states(&self) -> &[ScanState] {
        &self.states
    }

    /// State carried into `line`.
    pub(crate) fn state_before(&self, line: usize) -> ScanState {
        if line == 0 {
            ScanState::Default
        } else {
            self.states
                .get(line - 1)
                .copied()
                .unwrap_or(ScanState::Default)
        }
    }

    /// Inserts `count` placeholder slots before `line`.
    ///
    /// The slot of the edited line shifts down to the last line of the
    /// replacement text, which is where its old end state now applies.
    pub(crate) fn insert_at(&mut self, line: usize, count: usize) {
        let at = line.min(self.states.len());
        self.states
            .splice(at..at, std::iter::repeat(ScanState::Default).take(count));
    }

    /// Removes `count` slots starting at `line`, keeping the slot of the
    /// last removed-over line so it lines up with the replacement's last line.
    pub(crate) fn remove_at(&mut self, line: usize, count: usize) {
        let at = line.min(self.states.len());
        let end = (at + count).min(self.states.len());
        self.states.drain(at..end);
    }

    /// Re-scans `dirty` and keeps going past it until a line's recomputed
    /// state equals the cached one. Returns the lines actually scanned.
    ///
    /// Because a line's end state depends only on its text and the state
    /// carried into it, equality at a line outside the dirty range means
    /// every later line is already correct.
    pub(crate) fn rescan(
        &mut self,
        snapshot: &Snapshot,
        dirty: RangeInclusive<usize>,
    ) -> Range<usize> {
        let line_count = snapshot.line_count().min(self.states.len());
        let first = *dirty.start();
        let last_dirty = *dirty.end();

        let mut line = first;
        let mut state = self.state_before(line);
        let mut changed = true;

        while line < line_count && (line <= last_dirty || changed) {
            let text = snapshot.line_text(line).unwrap_or_default();
            state = next_state(state, text);
            changed = self.states[line] != state;
            self.states[line] = state;
            tracing::trace!(line, ?state, changed, "rescanned line");
            line += 1;
        }

        first..line.max(first)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_tracks_verbatim_strings() {
        let snapshot = Snapshot::new("var q = @\"SELECT *\nFROM t\";\nvar x = 1;");
        let cache = LineStateCache::build(&snapshot);
        assert_eq!(
            cache.states(),
            &[
                ScanState::MultiLineString,
                ScanState::Default,
                ScanState::Default
            ]
        );
    }

    #[test]
    fn test_rescan_stops_at_fixed_point() {
        let snapshot = Snapshot::new("a\nb\nc\nd");
        let mut cache = LineStateCache::build(&snapshot);
        let (next, _) = snapshot.insert(2, "x");
        let scanned = cache.rescan(&next, 1..=1);
        assert_eq!(scanned, 1..2);
    }

    #[test]
    fn test_rescan_runs_until_states_agree() {
        let snapshot = Snapshot::new("a\nb\nc\"\nd");
        let mut cache = LineStateCache::build(&snapshot);

        // Opening a verbatim string on line 0 flips lines 0 and 1; line 2
        // closes it and ends in Default again, which matches the cache.
        let (next, _) = snapshot.insert(0, "@\"");
        let scanned = cache.rescan(&next, 0..=0);
        assert_eq!(scanned, 0..3);
        assert_eq!(
            cache.states(),
            &[
                ScanState::MultiLineString,
                ScanState::MultiLineString,
                ScanState::Default,
                ScanState::Default
            ]
        );
    }

    #[test]
    fn test_insert_and_remove_slots() {
        let mut cache = LineStateCache {
            states: vec![
                ScanState::MultilineComment,
                ScanState::MultiLineString,
                ScanState::Default,
            ],
        };
        cache.insert_at(1, 2);
        assert_eq!(cache.len(), 5);
        assert_eq!(cache.get(1), Some(ScanState::Default));
        assert_eq!(cache.get(2), Some(ScanState::Default));
        assert_eq!(cache.get(3), Some(ScanState::MultiLineString));

        cache.remove_at(1, 2);
        assert_eq!(
            cache.states(),
            &[
                ScanState::MultilineComment,
                ScanState::MultiLineString,
                ScanState::Default
            ]
        );
    }

    /// Resizes the cache the way the tagger does, then rescans the edit.
    fn edit_and_rescan(
        cache: &mut LineStateCache,
        snapshot: &Snapshot,
        range: Range<usize>,
        text: &str,
    ) -> Snapshot {
        let (next, change) = snapshot.edit(range, text);
        let line = next.line_number_at(change.new_position);
        let delta = change.line_count_delta;
        if delta > 0 {
            cache.insert_at(line, delta.unsigned_abs());
        } else if delta < 0 {
            cache.remove_at(line, delta.unsigned_abs());
        }
        let last = next.line_number_at(change.new_position + change.new_len);
        cache.rescan(&next, line..=last);
        next
    }

    #[test]
    fn test_closing_verbatim_string_with_line_break() {
        let snapshot = Snapshot::new("@\"abc\ndef\nghi\"");
        let mut cache = LineStateCache::build(&snapshot);

        // Closing the string on line 0 and adding a line: the old end state
        // of line 0 (inside the string) must be compared at the new line 1.
        let next = edit_and_rescan(&mut cache, &snapshot, 5..5, "\"\nz");
        assert_eq!(cache.states(), LineStateCache::build(&next).states());
        assert_eq!(cache.states(), &[ScanState::Default; 4]);
    }

    #[test]
    fn test_opening_verbatim_string_with_line_break() {
        let snapshot = Snapshot::new("a\nb\nc\nd");
        let mut cache = LineStateCache::build(&snapshot);

        let next = edit_and_rescan(&mut cache, &snapshot, 1..1, "\n@\"x");
        assert_eq!(cache.states(), LineStateCache::build(&next).states());
        assert_eq!(cache.get(4), Some(ScanState::MultiLineString));
    }

    #[test]
    fn test_deleting_line_that_opens_verbatim_string() {
        let snapshot = Snapshot::new("x\n@\"open\nmid\nend\"\ntail");
        let mut cache = LineStateCache::build(&snapshot);
        assert_eq!(cache.get(2), Some(ScanState::MultiLineString));

        // Remove "@\"open\n": the string no longer starts, and `end"`
        // now opens a regular string that cannot cross the line break.
        let next = edit_and_rescan(&mut cache, &snapshot, 2..9, "");
        assert_eq!(next.line_count(), 4);
        assert_eq!(cache.states(), LineStateCache::build(&next).states());
        assert_eq!(cache.get(1), Some(ScanState::Default));
    }

    #[test]
    fn test_removing_closing_line_keeps_string_open() {
        let snapshot = Snapshot::new("x\n@\"s\nt\"\n/* c\n*/");
        let mut cache = LineStateCache::build(&snapshot);

        let next = edit_and_rescan(&mut cache, &snapshot, 5..8, "");
        assert_eq!(cache.states(), LineStateCache::build(&next).states());
        assert_eq!(
            cache.states(),
            &[
                ScanState::Default,
                ScanState::MultiLineString,
                ScanState::MultiLineString,
                ScanState::MultiLineString
            ]
        );
    }
}
