//! SQL classification of tagged string literals.
//!
//! For every literal the tagger reports, the classifier applies the start
//! keyword gate, fills interpolation holes, parses the filled text, projects
//! the tree back onto the text and cuts the result around the holes again.

use std::fmt;
use std::ops::Range;

use crate::category::{Category, ClassificationSpan};
use crate::config::{ClassifierConfig, ConfigError};
use crate::projector::{format_document, project, projection_len, Projection};
use crate::snapshot::Snapshot;
use crate::splice::{fill_holes, matching_start_keyword, split_around_holes};
use crate::sql::{create_parser, LanguageError, SqlParser};
use crate::tag::LiteralTag;
use crate::tagger::StringTagger;

/// Error creating a classifier.
#[derive(Debug, thiserror::Error)]
pub enum ClassifierError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Language(#[from] LanguageError),
}

/// Classifies the SQL inside C# string literals.
pub struct SqlClassifier {
    config: ClassifierConfig,
    parser: Box<dyn SqlParser>,
}

impl fmt::Debug for SqlClassifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SqlClassifier")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl SqlClassifier {
    /// Creates a classifier with the parser backend named in `config`.
    pub fn new(config: ClassifierConfig) -> Result<Self, ClassifierError> {
        config.validate()?;
        let parser = create_parser(config.backend)?;
        Ok(Self { config, parser })
    }

    /// Creates a classifier around an existing parser.
    pub fn with_parser(config: ClassifierConfig, parser: Box<dyn SqlParser>) -> Self {
        Self { config, parser }
    }

    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    /// Classification spans for every literal intersecting `range`.
    ///
    /// Spans are absolute offsets in `snapshot`, sorted and non-overlapping.
    /// A stale snapshot yields nothing.
    pub fn classify(
        &mut self,
        tagger: &StringTagger,
        snapshot: &Snapshot,
        range: Range<usize>,
    ) -> Vec<ClassificationSpan> {
        let mut spans = Vec::new();
        for tag in tagger.tags(snapshot, range) {
            spans.extend(self.classify_tag(snapshot, &tag));
        }
        spans
    }

    /// Classification spans for a single literal tag.
    pub fn classify_tag(&mut self, snapshot: &Snapshot, tag: &LiteralTag) -> Vec<ClassificationSpan> {
        let text = snapshot.slice(tag.range.clone());
        let holes: Vec<Range<usize>> = tag.relative_interpolations().collect();
        let base = tag.range.start;

        self.classify_literal(text, &holes)
            .into_iter()
            .flatten()
            .map(|(category, range)| ClassificationSpan {
                range: base + range.start..base + range.end,
                category,
            })
            .collect()
    }

    /// Classifies literal content with `holes` relative to `text`.
    ///
    /// Returns `None` when the literal is not attempted as SQL (start keyword
    /// gate) or when its parse is unusable. Ranges are relative to `text`.
    pub fn classify_literal(
        &mut self,
        text: &str,
        holes: &[Range<usize>],
    ) -> Option<Vec<(Category, Range<usize>)>> {
        let keyword = matching_start_keyword(text, &self.config.start_keywords)?;
        tracing::trace!(keyword, len = text.len(), holes = holes.len(), "classifying literal");

        let filled = fill_holes(text, holes, self.config.filler_byte());
        let doc = self.parser.parse(&filled);
        if doc.root.is_none() {
            tracing::debug!("no document root, literal left unclassified");
            return None;
        }
        if doc.error_found {
            tracing::debug!(len = text.len(), "parse errors, literal left unclassified");
            return None;
        }

        let pieces = project(&doc);
        let projected = projection_len(&pieces);
        if projected != filled.len() {
            debug_assert_eq!(projected, filled.len(), "projection is not length-exact");
            tracing::error!(
                expected = filled.len(),
                projected,
                "projection does not reproduce the literal, dropping its spans"
            );
            return None;
        }

        let emit_plain = self.config.emit_plain;
        let mut offset = 0;
        let ranges = pieces.into_iter().filter_map(|(category, piece)| {
            let range = offset..offset + piece.len();
            offset = range.end;
            (emit_plain || category != Category::Plain).then_some((category, range))
        });
        Some(split_around_holes(ranges, holes))
    }

    /// Formats a whole SQL document, prefixing a warning when it has errors.
    pub fn format_sql(&mut self, sql: &str) -> Projection {
        let doc = self.parser.parse(sql);
        format_document(&doc)
    }
}
