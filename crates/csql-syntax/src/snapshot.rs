//! Immutable text snapshots and the change notifications that connect them.
//!
//! A [`Snapshot`] is a versioned view of a whole source file. Snapshots are
//! never mutated: [`Snapshot::edit`] produces the next snapshot together with
//! a [`TextChange`] describing what happened, which is what the
//! [`StringTagger`](crate::StringTagger) consumes to keep its line-state
//! cache in sync.
//!
//! All offsets are byte offsets. Lines are terminated by `\n` or `\r\n`; the
//! text of a line never includes its terminator.

use std::ops::Range;
use std::sync::Arc;

/// Builds the index of byte offsets where each line starts.
///
/// `offsets[0]` is always 0; `offsets[n]` is the byte right after the `\n`
/// that ended line `n - 1`.
fn build_line_starts(text: &str) -> Vec<usize> {
    let mut starts = vec![0];
    for (i, b) in text.as_bytes().iter().enumerate() {
        if *b == b'\n' {
            starts.push(i + 1);
        }
    }
    starts
}

#[derive(Debug)]
struct SnapshotInner {
    version: u64,
    text: String,
    line_starts: Vec<usize>,
}

/// An immutable, versioned view of a source buffer.
///
/// Cloning is cheap (the text is shared). Two clones of the same snapshot
/// are [`same`](Snapshot::same); a snapshot produced by an edit never is,
/// even if its text happens to be identical.
#[derive(Debug, Clone)]
pub struct Snapshot {
    inner: Arc<SnapshotInner>,
}

/// One line of a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SnapshotLine {
    /// Zero-based line number
    pub number: usize,
    /// Offset of the first byte of the line
    pub start: usize,
    /// Offset just past the last byte of the line, excluding the line break
    pub end: usize,
    /// Offset just past the line break (equals `end` on the last line)
    pub end_including_break: usize,
}

impl SnapshotLine {
    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Describes a single replacement that turned one snapshot into the next.
///
/// Positions follow the editor convention: `old_position` is in the old
/// snapshot, `new_position` in the new one. For a change set they only
/// differ by the length delta of the changes before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextChange {
    /// Version of the snapshot the change was applied to
    pub base_version: u64,
    /// Start of the replaced text in the old snapshot
    pub old_position: usize,
    /// Length of the replaced text
    pub old_len: usize,
    /// Start of the replacement text in the new snapshot
    pub new_position: usize,
    /// Length of the replacement text
    pub new_len: usize,
    /// Lines added (positive) or removed (negative) by the change
    pub line_count_delta: isize,
}

impl Snapshot {
    /// Creates the first snapshot (version 0) of a buffer.
    pub fn new(text: impl Into<String>) -> Self {
        Self::with_version(text.into(), 0)
    }

    fn with_version(text: String, version: u64) -> Self {
        let line_starts = build_line_starts(&text);
        Self {
            inner: Arc::new(SnapshotInner {
                version,
                text,
                line_starts,
            }),
        }
    }

    pub fn version(&self) -> u64 {
        self.inner.version
    }

    pub fn text(&self) -> &str {
        &self.inner.text
    }

    pub fn len(&self) -> usize {
        self.inner.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.text.is_empty()
    }

    /// Returns true when both handles refer to the very same snapshot.
    pub fn same(&self, other: &Snapshot) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Number of lines. An empty buffer has one (empty) line.
    pub fn line_count(&self) -> usize {
        self.inner.line_starts.len()
    }

    /// Returns line `number`, or `None` when out of range.
    pub fn line(&self, number: usize) -> Option<SnapshotLine> {
        let starts = &self.inner.line_starts;
        let start = *starts.get(number)?;
        let end_including_break = starts
            .get(number + 1)
            .copied()
            .unwrap_or(self.inner.text.len());

        let bytes = self.inner.text.as_bytes();
        let mut end = end_including_break;
        if end > start && bytes[end - 1] == b'\n' {
            end -= 1;
            if end > start && bytes[end - 1] == b'\r' {
                end -= 1;
            }
        }

        Some(SnapshotLine {
            number,
            start,
            end,
            end_including_break,
        })
    }

    /// Text of line `number` without its line break.
    pub fn line_text(&self, number: usize) -> Option<&str> {
        self.line(number).map(|line| &self.inner.text[line.range()])
    }

    /// Returns the number of the line containing `offset`.
    ///
    /// Offsets past the end map to the last line.
    pub fn line_number_at(&self, offset: usize) -> usize {
        match self.inner.line_starts.binary_search(&offset) {
            Ok(line) => line,
            Err(line) => line.saturating_sub(1),
        }
    }

    /// Returns the text of `range`, clamped to the snapshot.
    pub fn slice(&self, range: Range<usize>) -> &str {
        let len = self.inner.text.len();
        let start = range.start.min(len);
        let end = range.end.clamp(start, len);
        &self.inner.text[start..end]
    }

    /// Replaces `range` with `replacement`, producing the next snapshot and
    /// the change notification describing the edit.
    ///
    /// The range is clamped to the text and snapped back to character
    /// boundaries.
    pub fn edit(&self, range: Range<usize>, replacement: &str) -> (Snapshot, TextChange) {
        let text = &self.inner.text;
        let mut start = range.start.min(text.len());
        let mut end = range.end.clamp(start, text.len());
        while !text.is_char_boundary(start) {
            start -= 1;
        }
        while !text.is_char_boundary(end) {
            end -= 1;
        }
        let end = end.max(start);

        let removed_lines = text[start..end].matches('\n').count() as isize;
        let added_lines = replacement.matches('\n').count() as isize;

        let mut new_text = String::with_capacity(text.len() - (end - start) + replacement.len());
        new_text.push_str(&text[..start]);
        new_text.push_str(replacement);
        new_text.push_str(&text[end..]);

        let change = TextChange {
            base_version: self.inner.version,
            old_position: start,
            old_len: end - start,
            new_position: start,
            new_len: replacement.len(),
            line_count_delta: added_lines - removed_lines,
        };

        (Self::with_version(new_text, self.inner.version + 1), change)
    }

    /// Inserts `text` at `offset`.
    pub fn insert(&self, offset: usize, text: &str) -> (Snapshot, TextChange) {
        self.edit(offset..offset, text)
    }

    /// Deletes the text in `range`.
    pub fn delete(&self, range: Range<usize>) -> (Snapshot, TextChange) {
        self.edit(range, "")
    }
}
