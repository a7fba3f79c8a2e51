//! Styled rendering of classified C# source.

use ratatui::text::{Line, Span};

use crate::category::ClassificationSpan;
use crate::classifier::SqlClassifier;
use crate::snapshot::Snapshot;
use crate::tagger::StringTagger;
use crate::theme::Theme;

/// Highlights the SQL embedded in whole C# sources, producing ratatui lines.
#[derive(Debug)]
pub struct Highlighter {
    theme: Theme,
    classifier: SqlClassifier,
}

impl Highlighter {
    pub fn new(theme: Theme, classifier: SqlClassifier) -> Self {
        Self { theme, classifier }
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.theme = theme;
    }

    pub fn classifier_mut(&mut self) -> &mut SqlClassifier {
        &mut self.classifier
    }

    /// Classification spans for the whole of `source`.
    pub fn classify(&mut self, source: &str) -> Vec<ClassificationSpan> {
        let snapshot = Snapshot::new(source);
        let tagger = StringTagger::new(snapshot.clone());
        self.classifier.classify(&tagger, &snapshot, 0..snapshot.len())
    }

    /// Highlights `source` and returns one styled line per source line.
    pub fn highlight(&mut self, source: &str) -> Vec<Line<'static>> {
        let spans = self.classify(source);
        spans_to_lines(source, &spans, &self.theme)
    }
}

/// Converts sorted, non-overlapping byte spans to styled lines.
///
/// Spans crossing line breaks are clipped per line; text outside any span
/// is unstyled. Line breaks (`\n` and `\r\n`) are not part of the output.
pub fn spans_to_lines(
    source: &str,
    spans: &[ClassificationSpan],
    theme: &Theme,
) -> Vec<Line<'static>> {
    let mut result = Vec::new();
    let mut line_start = 0;
    let mut first_span = 0;

    for line_text in source.lines() {
        let line_end = line_start + line_text.len();
        let mut line_spans: Vec<Span<'static>> = Vec::new();
        let mut current = line_start;

        while first_span < spans.len() && spans[first_span].range.end <= line_start {
            first_span += 1;
        }

        for span in &spans[first_span..] {
            if span.range.start >= line_end {
                break;
            }
            let start = span.range.start.max(line_start);
            let end = span.range.end.min(line_end);
            if start > current {
                line_spans.push(Span::raw(source[current..start].to_string()));
            }
            if end > start {
                line_spans.push(Span::styled(
                    source[start..end].to_string(),
                    theme.style_for_category(span.category),
                ));
                current = end;
            }
        }

        if current < line_end {
            line_spans.push(Span::raw(source[current..line_end].to_string()));
        }
        if line_spans.is_empty() {
            line_spans.push(Span::raw(String::new()));
        }
        result.push(Line::from(line_spans));

        line_start = source[line_end..]
            .find('\n')
            .map_or(source.len(), |i| line_end + i + 1);
    }

    if result.is_empty() {
        result.push(Line::from(vec![Span::raw(String::new())]));
    }
    result
}
