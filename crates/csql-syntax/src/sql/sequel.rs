//! SQL parser backend on top of the `tree-sitter-sequel` grammar.
//!
//! The concrete syntax tree is lowered into the same [`SqlNode`] vocabulary
//! the native parser produces. Bytes the grammar does not cover (whitespace,
//! skipped input) are filled back in from the source so that projecting the
//! lowered tree reproduces the input length exactly.

use thiserror::Error;
use tree_sitter::{Node, Parser};

use super::keywords::{self, WordClass};
use super::tree::{NodeKind, SqlDocument, SqlNode};
use super::SqlParser;

/// Error loading the tree-sitter grammar.
#[derive(Debug, Error)]
pub enum LanguageError {
    #[error("incompatible tree-sitter grammar: {0}")]
    Incompatible(#[from] tree_sitter::LanguageError),
}

/// [`SqlParser`] backed by tree-sitter.
pub struct TreeSitterSqlParser {
    parser: Parser,
}

impl TreeSitterSqlParser {
    pub fn new() -> Result<Self, LanguageError> {
        let mut parser = Parser::new();
        parser.set_language(&tree_sitter_sequel::LANGUAGE.into())?;
        Ok(Self { parser })
    }
}

impl std::fmt::Debug for TreeSitterSqlParser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TreeSitterSqlParser").finish_non_exhaustive()
    }
}

impl SqlParser for TreeSitterSqlParser {
    fn parse(&mut self, sql: &str) -> SqlDocument {
        let Some(tree) = self.parser.parse(sql, None) else {
            tracing::warn!(len = sql.len(), "tree-sitter returned no tree");
            return SqlDocument::default();
        };
        let root = tree.root_node();
        let mut lowering = Lowering { src: sql, pos: 0 };
        let mut nodes = lowering.children(root);
        lowering.fill_gap(sql.len(), &mut nodes);

        SqlDocument::new(
            SqlNode::container(NodeKind::SqlRoot, nodes),
            root.has_error(),
        )
    }
}

struct Lowering<'s> {
    src: &'s str,
    /// Next source byte not yet covered by an emitted node
    pos: usize,
}

impl<'s> Lowering<'s> {
    /// Lowers the children of `node`, grouping matched `(` `)` siblings.
    fn children(&mut self, node: Node<'_>) -> Vec<SqlNode> {
        let parens_kind = if node.kind() == "invocation" {
            NodeKind::FunctionParens
        } else {
            NodeKind::ExpressionParens
        };

        let mut cursor = node.walk();
        let children: Vec<Node<'_>> = node.children(&mut cursor).collect();

        let mut frames: Vec<Vec<SqlNode>> = vec![Vec::new()];
        for child in children {
            if child.is_missing() || child.start_byte() == child.end_byte() {
                continue;
            }

            if let Some(frame) = frames.last_mut() {
                self.fill_gap(child.start_byte(), frame);
            }

            if is_atomic(child) {
                let depth = frames.len();
                match self.text(child) {
                    "(" if !child.is_named() => frames.push(Vec::new()),
                    ")" if !child.is_named() && depth > 1 => {
                        let inner = frames.pop().unwrap_or_default();
                        if let Some(parent) = frames.last_mut() {
                            parent.push(SqlNode::container(parens_kind, inner));
                        }
                    }
                    _ => {
                        let leaf = self.leaf(child);
                        if let Some(frame) = frames.last_mut() {
                            frame.push(leaf);
                        }
                    }
                }
                self.pos = self.pos.max(child.end_byte());
            } else {
                let lowered = self.children(child);
                let Some(frame) = frames.last_mut() else {
                    break;
                };
                if child.kind() == "statement" {
                    frame.push(SqlNode::container(NodeKind::SqlStatement, lowered));
                } else {
                    frame.extend(lowered);
                }
            }
        }

        // Unmatched `(`: keep its content inline.
        while frames.len() > 1 {
            let inner = frames.pop().unwrap_or_default();
            if let Some(parent) = frames.last_mut() {
                parent.push(SqlNode::leaf(NodeKind::OtherNode, "("));
                parent.extend(inner);
            }
        }
        frames.pop().unwrap_or_default()
    }

    /// Emits source bytes between the cursor and `until` that no node covers.
    fn fill_gap(&mut self, until: usize, out: &mut Vec<SqlNode>) {
        if until <= self.pos {
            return;
        }
        let gap = &self.src[self.pos..until];
        let kind = if gap.chars().all(char::is_whitespace) {
            NodeKind::Whitespace
        } else {
            NodeKind::OtherNode
        };
        out.push(SqlNode::leaf(kind, gap));
        self.pos = until;
    }

    fn text(&self, node: Node<'_>) -> &'s str {
        let start = node.start_byte().max(self.pos);
        self.src.get(start..node.end_byte()).unwrap_or_default()
    }

    fn leaf(&self, node: Node<'_>) -> SqlNode {
        let text = self.text(node);
        let kind = node.kind();

        if kind.starts_with("keyword_") {
            return keyword_leaf(text);
        }
        match kind {
            "comment" => {
                if let Some(body) = text.strip_prefix("--") {
                    SqlNode::leaf(NodeKind::CommentSingleline, body)
                } else if let Some(body) = text.strip_prefix("//") {
                    SqlNode::leaf(NodeKind::CommentSinglelineCStyle, body)
                } else {
                    SqlNode::leaf(NodeKind::OtherNode, text)
                }
            }
            "marginalia" => match text.strip_prefix("/*").and_then(|t| t.strip_suffix("*/")) {
                Some(body) => SqlNode::leaf(NodeKind::CommentMultiline, body),
                None => SqlNode::leaf(NodeKind::OtherNode, text),
            },
            "literal" => literal_leaf(text),
            "parameter" => SqlNode::leaf(NodeKind::Parameter, text),
            "identifier" if is_function_name(node) => {
                SqlNode::leaf(NodeKind::FunctionKeyword, text)
            }
            "identifier" => identifier_leaf(text),
            _ => punctuation_leaf(text),
        }
    }
}

/// Nodes lowered as a single leaf rather than recursed into.
fn is_atomic(node: Node<'_>) -> bool {
    node.child_count() == 0
        || node.kind().starts_with("keyword_")
        || matches!(
            node.kind(),
            "comment" | "marginalia" | "literal" | "parameter" | "identifier"
        )
}

fn is_function_name(node: Node<'_>) -> bool {
    let mut current = node;
    while let Some(parent) = current.parent() {
        match parent.kind() {
            "invocation" => {
                return parent.child(0).is_some_and(|first| {
                    first.start_byte() <= node.start_byte() && node.end_byte() <= first.end_byte()
                });
            }
            "object_reference" => current = parent,
            _ => return false,
        }
    }
    false
}

fn keyword_leaf(text: &str) -> SqlNode {
    let upper = text.to_ascii_uppercase();
    let kind = match keywords::classify_word(&upper) {
        WordClass::And => NodeKind::AndOperator,
        WordClass::Or => NodeKind::OrOperator,
        WordClass::AlphaOperator => NodeKind::AlphaOperator,
        WordClass::DataType => NodeKind::DataTypeKeyword,
        WordClass::Function => NodeKind::FunctionKeyword,
        WordClass::Returns => NodeKind::DdlReturns,
        WordClass::Keyword | WordClass::Name => NodeKind::OtherKeyword,
    };
    SqlNode::leaf(kind, text)
}

/// Unwraps `body` between `terminator` quotes if every inner terminator is
/// doubled, so that re-quoting reproduces it byte for byte.
fn unquote(body: &str, terminator: char) -> Option<String> {
    let doubled: String = [terminator, terminator].iter().collect();
    if body.replace(&doubled, "").contains(terminator) {
        return None;
    }
    Some(body.replace(&doubled, &terminator.to_string()))
}

fn literal_leaf(text: &str) -> SqlNode {
    let quoted = |prefix_len: usize| {
        text.get(prefix_len + 1..text.len().saturating_sub(1))
            .filter(|_| text.len() >= prefix_len + 2 && text.ends_with('\''))
            .and_then(|body| unquote(body, '\''))
    };

    if text.starts_with('\'') {
        if let Some(body) = quoted(0) {
            return SqlNode::leaf(NodeKind::String, body);
        }
    } else if text.starts_with("N'") {
        if let Some(body) = quoted(1) {
            return SqlNode::leaf(NodeKind::NString, body);
        }
    } else if text.len() > 2 && (text.starts_with("0x") || text.starts_with("0X")) {
        return SqlNode::leaf(NodeKind::BinaryValue, text);
    } else if text.starts_with(|c: char| c.is_ascii_digit() || c == '.' || c == '-') {
        return SqlNode::leaf(NodeKind::NumberValue, text);
    }
    SqlNode::leaf(NodeKind::OtherNode, text)
}

fn identifier_leaf(text: &str) -> SqlNode {
    let inner = |open: char, close: char| {
        text.strip_prefix(open)
            .and_then(|t| t.strip_suffix(close))
            .and_then(|body| unquote(body, close))
    };
    if text.starts_with('"') {
        if let Some(body) = inner('"', '"') {
            return SqlNode::leaf(NodeKind::QuotedString, body);
        }
    } else if text.starts_with('[') {
        if let Some(body) = inner('[', ']') {
            return SqlNode::leaf(NodeKind::BracketQuotedName, body);
        }
    }
    SqlNode::leaf(NodeKind::OtherNode, text)
}

fn punctuation_leaf(text: &str) -> SqlNode {
    let kind = match text {
        "," => NodeKind::Comma,
        "." => NodeKind::Period,
        ";" => NodeKind::Semicolon,
        "*" => NodeKind::Asterisk,
        "=" => NodeKind::EqualsSign,
        "::" => NodeKind::ScopeResolutionOperator,
        _ if !text.is_empty() && text.chars().all(|c| c.is_ascii_punctuation()) => {
            NodeKind::OtherOperator
        }
        _ => NodeKind::OtherNode,
    };
    SqlNode::leaf(kind, text)
}
