/// Lexer condition carried from the end of one line to the start of the next.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ScanState {
    /// Plain code.
    #[default]
    Default,
    /// Inside `"..."`.
    String,
    /// Inside `$"..."`.
    InterpolatedString,
    /// Inside `@"..."`.
    MultiLineString,
    /// Inside `$@"..."`.
    InterpolatedMultiLineString,
    /// Inside `/* ... */`.
    MultilineComment,
}

impl ScanState {
    /// True for the verbatim string states, the only literals that survive a
    /// line break.
    pub fn is_multiline_string(self) -> bool {
        matches!(
            self,
            ScanState::MultiLineString | ScanState::InterpolatedMultiLineString
        )
    }

    /// True for the `$"` and `$@"` states.
    pub fn is_interpolated(self) -> bool {
        matches!(
            self,
            ScanState::InterpolatedString | ScanState::InterpolatedMultiLineString
        )
    }

    /// Whether this state may legally be cached as an end-of-line state.
    pub fn can_end_line(self) -> bool {
        matches!(
            self,
            ScanState::Default
                | ScanState::MultiLineString
                | ScanState::InterpolatedMultiLineString
                | ScanState::MultilineComment
        )
    }
}
