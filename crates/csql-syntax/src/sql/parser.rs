//! Structural T-SQL parser over the token stream.
//!
//! Builds `SqlRoot > SqlStatement > SqlClause > leaf` trees. Statements end
//! at `;`, clauses start at clause keywords, and parentheses become typed
//! groups. Anything unbalanced marks the document as erroneous; the tree is
//! still built so whole-document formatting can render it.

use super::keywords::{self, WordClass};
use super::token::{Token, TokenKind, TokenList};
use super::tree::{NodeKind, SqlDocument, SqlNode};

pub fn parse(tokens: &TokenList) -> SqlDocument {
    let mut parser = Parser {
        tokens: &tokens.tokens,
        pos: 0,
        error_found: tokens.has_unfinished_token,
    };
    let statements = parser.statements(false);
    let root = SqlNode::container(NodeKind::SqlRoot, statements);
    if parser.error_found {
        tracing::debug!(tokens = tokens.len(), "sql parse finished with errors");
    }
    SqlDocument::new(root, parser.error_found)
}

struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
    error_found: bool,
}

/// Accumulates the clauses of the statement being parsed.
#[derive(Default)]
struct StatementBuilder {
    clauses: Vec<SqlNode>,
    clause: Vec<SqlNode>,
}

impl StatementBuilder {
    fn clause_has_content(&self) -> bool {
        self.clause.iter().any(|n| {
            !matches!(
                n.kind,
                NodeKind::Whitespace
                    | NodeKind::CommentMultiline
                    | NodeKind::CommentSingleline
                    | NodeKind::CommentSinglelineCStyle
            )
        })
    }

    fn close_clause(&mut self) {
        if !self.clause.is_empty() {
            let children = std::mem::take(&mut self.clause);
            self.clauses
                .push(SqlNode::container(NodeKind::SqlClause, children));
        }
    }

    fn push_clause_node(&mut self, node: SqlNode) {
        self.close_clause();
        self.clauses.push(node);
    }

    fn finish(mut self) -> Option<SqlNode> {
        self.close_clause();
        if self.clauses.is_empty() {
            None
        } else {
            Some(SqlNode::container(NodeKind::SqlStatement, self.clauses))
        }
    }
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<&'a Token> {
        self.tokens.get(self.pos)
    }

    /// Previous token that is not whitespace or a comment.
    fn prev_significant(&self) -> Option<&'a Token> {
        self.tokens[..self.pos].iter().rev().find(|t| !t.is_trivia())
    }

    /// Parses statements until end of input or, when `nested`, until an
    /// unmatched `)` (left for the caller).
    fn statements(&mut self, nested: bool) -> Vec<SqlNode> {
        let mut statements = Vec::new();
        let mut statement = StatementBuilder::default();

        while let Some(token) = self.peek() {
            match token.kind {
                TokenKind::CloseParens if nested => break,
                TokenKind::CloseParens => {
                    self.error_found = true;
                    statement
                        .clause
                        .push(SqlNode::leaf(NodeKind::OtherNode, ")"));
                    self.pos += 1;
                }
                TokenKind::Semicolon => {
                    statement
                        .clause
                        .push(SqlNode::leaf(NodeKind::Semicolon, ";"));
                    self.pos += 1;
                    statements.extend(std::mem::take(&mut statement).finish());
                }
                TokenKind::OpenParens => {
                    let group = self.parens();
                    statement.clause.push(group);
                }
                TokenKind::OtherNode if is_word(&token.value) => {
                    let upper = token.value.to_ascii_uppercase();
                    let after_period =
                        matches!(self.prev_significant(), Some(t) if t.kind == TokenKind::Period);
                    if !after_period && keywords::is_set_operator(&upper) {
                        let leaf = SqlNode::leaf(NodeKind::OtherKeyword, token.value.clone());
                        self.pos += 1;
                        statement.push_clause_node(SqlNode::container(
                            NodeKind::SetOperatorClause,
                            vec![leaf],
                        ));
                        continue;
                    }
                    if !after_period
                        && keywords::starts_clause(&upper)
                        && statement.clause_has_content()
                    {
                        statement.close_clause();
                    }
                    let leaf = Self::word_leaf(token, after_period);
                    statement.clause.push(leaf);
                    self.pos += 1;
                }
                _ => {
                    let leaf = leaf_for(token);
                    statement.clause.push(leaf);
                    self.pos += 1;
                }
            }
        }

        statements.extend(statement.finish());
        statements
    }

    /// Parses a parenthesised group starting at the `(` under the cursor.
    fn parens(&mut self) -> SqlNode {
        // A user-defined function call has no space before its parenthesis.
        let adjacent = self.pos > 0 && !self.tokens[self.pos - 1].is_trivia();
        let kind = match self.prev_significant() {
            Some(t) if t.kind == TokenKind::OtherNode && is_word(&t.value) => {
                let upper = t.value.to_ascii_uppercase();
                match keywords::classify_word(&upper) {
                    _ if upper == "IN" => NodeKind::InParens,
                    WordClass::Function | WordClass::DataType => NodeKind::FunctionParens,
                    WordClass::Name if adjacent => NodeKind::FunctionParens,
                    _ => NodeKind::ExpressionParens,
                }
            }
            _ => NodeKind::ExpressionParens,
        };
        self.pos += 1;

        let inner = self.statements(true);
        let closed = matches!(self.peek(), Some(t) if t.kind == TokenKind::CloseParens);
        if closed {
            self.pos += 1;
        } else {
            self.error_found = true;
        }

        let mut group = SqlNode::container(kind, flatten_simple(inner));
        group.has_error = !closed;
        group
    }

    fn word_leaf(token: &Token, after_period: bool) -> SqlNode {
        if after_period || token.value.starts_with(['@', '#']) {
            return SqlNode::leaf(NodeKind::OtherNode, token.value.clone());
        }
        let upper = token.value.to_ascii_uppercase();
        let kind = match keywords::classify_word(&upper) {
            WordClass::And => NodeKind::AndOperator,
            WordClass::Or => NodeKind::OrOperator,
            WordClass::AlphaOperator => NodeKind::AlphaOperator,
            WordClass::DataType => NodeKind::DataTypeKeyword,
            WordClass::Returns => NodeKind::DdlReturns,
            WordClass::Keyword => NodeKind::OtherKeyword,
            WordClass::Function => NodeKind::FunctionKeyword,
            WordClass::Name => NodeKind::OtherNode,
        };
        SqlNode::leaf(kind, token.value.clone())
    }
}

fn is_word(value: &str) -> bool {
    value
        .bytes()
        .next()
        .is_some_and(|b| b.is_ascii_alphabetic() || b == b'_' || b >= 0x80)
}

/// A group holding a single plain expression keeps its leaves directly; a
/// group holding a subquery or several statements keeps the statements.
fn flatten_simple(mut statements: Vec<SqlNode>) -> Vec<SqlNode> {
    let simple = statements.len() == 1
        && statements[0].elements().count() == 1
        && statements[0]
            .elements()
            .all(|clause| clause.kind == NodeKind::SqlClause);
    if !simple {
        return statements;
    }
    let Some(statement) = statements.pop() else {
        return Vec::new();
    };
    let Some(clause) = statement.elements().next() else {
        return Vec::new();
    };
    let starts_with_clause_word = clause
        .elements()
        .find(|n| n.kind != NodeKind::Whitespace)
        .is_some_and(|n| {
            n.kind == NodeKind::OtherKeyword
                && keywords::starts_clause(&n.text.to_ascii_uppercase())
        });
    if starts_with_clause_word {
        return vec![statement];
    }
    clause.elements().cloned().collect()
}

fn leaf_for(token: &Token) -> SqlNode {
    let kind = match token.kind {
        TokenKind::WhiteSpace => NodeKind::Whitespace,
        TokenKind::MultiLineComment => NodeKind::CommentMultiline,
        TokenKind::SingleLineComment => NodeKind::CommentSingleline,
        TokenKind::SingleLineCommentCStyle => NodeKind::CommentSinglelineCStyle,
        TokenKind::String => NodeKind::String,
        TokenKind::NationalString => NodeKind::NString,
        TokenKind::QuotedString => NodeKind::QuotedString,
        TokenKind::BracketQuotedName => NodeKind::BracketQuotedName,
        TokenKind::Comma => NodeKind::Comma,
        TokenKind::Period => NodeKind::Period,
        TokenKind::Semicolon => NodeKind::Semicolon,
        TokenKind::Asterisk => NodeKind::Asterisk,
        TokenKind::EqualsSign => NodeKind::EqualsSign,
        TokenKind::OtherOperator if token.value == "::" => NodeKind::ScopeResolutionOperator,
        TokenKind::OtherOperator | TokenKind::Colon => NodeKind::OtherOperator,
        TokenKind::Number => NodeKind::NumberValue,
        TokenKind::BinaryValue => NodeKind::BinaryValue,
        TokenKind::MonetaryValue => NodeKind::MonetaryValue,
        TokenKind::PseudoName => NodeKind::PseudoName,
        TokenKind::OtherNode => NodeKind::OtherNode,
        // Handled structurally by the parser
        TokenKind::OpenParens | TokenKind::CloseParens => NodeKind::OtherNode,
    };
    SqlNode::leaf(kind, token.value.clone())
}
