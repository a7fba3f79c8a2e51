//! SQL parsing backends.
//!
//! The classifier only needs text in, typed tree out. Two backends
//! implement [`SqlParser`]: the native T-SQL tokenizer and parser, and a
//! lowering of the `tree-sitter-sequel` grammar.

mod keywords;
pub mod parser;
mod sequel;
pub mod token;
pub mod tokenizer;
pub mod tree;

pub use sequel::{LanguageError, TreeSitterSqlParser};
pub use token::{render_tokens, Token, TokenKind, TokenList};
pub use tree::{NodeKind, SqlChild, SqlDocument, SqlNode};

use crate::config::ParserBackend;

/// Turns SQL text into a typed tree.
pub trait SqlParser {
    fn parse(&mut self, sql: &str) -> SqlDocument;
}

/// Native T-SQL backend.
#[derive(Debug, Clone, Copy, Default)]
pub struct TsqlParser;

impl TsqlParser {
    pub fn new() -> Self {
        Self
    }

    pub fn tokenize(&self, sql: &str) -> TokenList {
        tokenizer::tokenize(sql)
    }
}

impl SqlParser for TsqlParser {
    fn parse(&mut self, sql: &str) -> SqlDocument {
        parser::parse(&tokenizer::tokenize(sql))
    }
}

/// Creates the parser for `backend`.
pub fn create_parser(backend: ParserBackend) -> Result<Box<dyn SqlParser>, LanguageError> {
    Ok(match backend {
        ParserBackend::Tsql => Box::new(TsqlParser::new()),
        ParserBackend::TreeSitter => Box::new(TreeSitterSqlParser::new()?),
    })
}
