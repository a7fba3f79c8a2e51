//! # csql-syntax
//!
//! Incremental highlighting of SQL embedded in C# string literals.
//!
//! The pipeline has two halves:
//!
//! - A [`StringTagger`] keeps one scan state per line of a buffer, rescans
//!   only the lines an edit can affect, and answers range queries with whole
//!   [`LiteralTag`]s, verbatim strings spanning several lines included.
//! - A [`SqlClassifier`] takes those tags, skips literals that do not start
//!   with a known SQL keyword, blanks out interpolation holes, parses the
//!   result and projects the tree back onto the literal as
//!   [`ClassificationSpan`]s that never touch the holes.
//!
//! ## Example
//!
//! ```rust
//! use csql_syntax::{Category, ClassifierConfig, Snapshot, SqlClassifier, StringTagger};
//!
//! let snapshot = Snapshot::new(r#"var q = $"SELECT {col} FROM t";"#);
//! let tagger = StringTagger::new(snapshot.clone());
//! let mut classifier = SqlClassifier::new(ClassifierConfig::default()).unwrap();
//!
//! let spans = classifier.classify(&tagger, &snapshot, 0..snapshot.len());
//! assert_eq!(spans.len(), 2);
//! assert!(spans.iter().all(|s| s.category == Category::Keyword));
//! ```

mod category;
mod classifier;
mod config;
mod highlighter;
pub mod projector;
pub mod scanner;
mod snapshot;
pub mod splice;
pub mod sql;
mod tag;
mod tagger;
mod theme;
pub mod themes;

pub use category::{Category, ClassificationSpan};
pub use classifier::{ClassifierError, SqlClassifier};
pub use config::{ClassifierConfig, ConfigError, ParserBackend};
pub use highlighter::{spans_to_lines, Highlighter};
pub use scanner::ScanState;
pub use snapshot::{Snapshot, SnapshotLine, TextChange};
pub use tag::LiteralTag;
pub use tagger::{EditError, StringTagger, TagsChanged};
pub use theme::{parse_color, StyleModifier, Theme, ThemeError};
