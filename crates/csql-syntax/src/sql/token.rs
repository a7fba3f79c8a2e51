//! Flat T-SQL token stream.

use std::ops::Range;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    OpenParens,
    CloseParens,
    Comma,
    Period,
    Semicolon,
    Colon,
    Asterisk,
    EqualsSign,
    OtherOperator,
    WhiteSpace,
    /// Words, variables and anything else the tokenizer has no better name for
    OtherNode,
    MultiLineComment,
    SingleLineComment,
    SingleLineCommentCStyle,
    String,
    NationalString,
    QuotedString,
    BracketQuotedName,
    Number,
    BinaryValue,
    MonetaryValue,
    PseudoName,
}

/// One token. `value` is unwrapped the same way tree leaves are.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub value: String,
    /// Source range the token was read from
    pub range: Range<usize>,
}

impl Token {
    pub fn new(kind: TokenKind, value: impl Into<String>, range: Range<usize>) -> Self {
        Self {
            kind,
            value: value.into(),
            range,
        }
    }

    pub fn is_trivia(&self) -> bool {
        matches!(
            self.kind,
            TokenKind::WhiteSpace
                | TokenKind::MultiLineComment
                | TokenKind::SingleLineComment
                | TokenKind::SingleLineCommentCStyle
        )
    }
}

/// Result of tokenizing a piece of SQL.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenList {
    pub tokens: Vec<Token>,
    /// The input ended inside a comment or quoted token
    pub has_unfinished_token: bool,
}

impl TokenList {
    pub fn iter(&self) -> std::slice::Iter<'_, Token> {
        self.tokens.iter()
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

impl<'a> IntoIterator for &'a TokenList {
    type Item = &'a Token;
    type IntoIter = std::slice::Iter<'a, Token>;

    fn into_iter(self) -> Self::IntoIter {
        self.tokens.iter()
    }
}

/// Rebuilds SQL text from a token stream, re-wrapping quoted tokens and
/// comments.
///
/// For a fully terminated input this returns the tokenized text exactly.
pub fn render_tokens(tokens: &TokenList) -> String {
    let mut out = String::new();
    for token in tokens {
        match token.kind {
            TokenKind::MultiLineComment => {
                out.push_str("/*");
                out.push_str(&token.value);
                out.push_str("*/");
            }
            TokenKind::SingleLineComment => {
                out.push_str("--");
                out.push_str(&token.value);
            }
            TokenKind::SingleLineCommentCStyle => {
                out.push_str("//");
                out.push_str(&token.value);
            }
            TokenKind::String => push_quoted(&mut out, "'", &token.value, '\'', "''", "'"),
            TokenKind::NationalString => push_quoted(&mut out, "N'", &token.value, '\'', "''", "'"),
            TokenKind::QuotedString => push_quoted(&mut out, "\"", &token.value, '"', "\"\"", "\""),
            TokenKind::BracketQuotedName => push_quoted(&mut out, "[", &token.value, ']', "]]", "]"),
            TokenKind::OpenParens
            | TokenKind::CloseParens
            | TokenKind::Comma
            | TokenKind::Period
            | TokenKind::Semicolon
            | TokenKind::Colon
            | TokenKind::Asterisk
            | TokenKind::EqualsSign
            | TokenKind::OtherNode
            | TokenKind::WhiteSpace
            | TokenKind::OtherOperator
            | TokenKind::Number
            | TokenKind::BinaryValue
            | TokenKind::MonetaryValue
            | TokenKind::PseudoName => out.push_str(&token.value),
        }
    }
    out
}

pub(crate) fn push_quoted(
    out: &mut String,
    open: &str,
    value: &str,
    terminator: char,
    escaped: &str,
    close: &str,
) {
    out.push_str(open);
    for c in value.chars() {
        if c == terminator {
            out.push_str(escaped);
        } else {
            out.push(c);
        }
    }
    out.push_str(close);
}
