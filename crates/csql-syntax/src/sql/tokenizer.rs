//! T-SQL tokenizer.
//!
//! Every input byte ends up in exactly one token, so the tokens' ranges tile
//! the input. Quoted tokens and comments store their unwrapped value; an
//! unterminated one runs to the end of the input and sets
//! [`TokenList::has_unfinished_token`].

use super::token::{Token, TokenKind, TokenList};

pub fn tokenize(sql: &str) -> TokenList {
    let mut tokenizer = Tokenizer {
        src: sql,
        bytes: sql.as_bytes(),
        pos: 0,
        list: TokenList::default(),
    };
    tokenizer.run();
    tokenizer.list
}

fn is_word_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'_' | b'@' | b'#' | b'$') || b >= 0x80
}

fn is_word_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || matches!(b, b'_' | b'@' | b'#') || b >= 0x80
}

const OPERATORS: &[&str] = &[
    "::", "<>", "<=", ">=", "!=", "!<", "!>", "+=", "-=", "*=", "/=", "%=", "&=", "|=", "^=",
];

struct Tokenizer<'a> {
    src: &'a str,
    bytes: &'a [u8],
    pos: usize,
    list: TokenList,
}

impl Tokenizer<'_> {
    fn peek(&self, n: usize) -> u8 {
        self.bytes.get(self.pos + n).copied().unwrap_or(0)
    }

    fn at(&self, pattern: &str) -> bool {
        self.bytes[self.pos..].starts_with(pattern.as_bytes())
    }

    fn emit(&mut self, kind: TokenKind, value: impl Into<String>, start: usize) {
        self.list.tokens.push(Token::new(kind, value, start..self.pos));
    }

    fn emit_raw(&mut self, kind: TokenKind, start: usize) {
        let value = &self.src[start..self.pos];
        self.list.tokens.push(Token::new(kind, value, start..self.pos));
    }

    fn run(&mut self) {
        while self.pos < self.bytes.len() {
            let start = self.pos;
            let b = self.peek(0);

            if b.is_ascii_whitespace() {
                while self.pos < self.bytes.len() && self.peek(0).is_ascii_whitespace() {
                    self.pos += 1;
                }
                self.emit_raw(TokenKind::WhiteSpace, start);
            } else if self.at("--") || self.at("//") {
                let kind = if b == b'-' {
                    TokenKind::SingleLineComment
                } else {
                    TokenKind::SingleLineCommentCStyle
                };
                self.pos += 2;
                while self.pos < self.bytes.len() && !matches!(self.peek(0), b'\n' | b'\r') {
                    self.pos += 1;
                }
                let value = self.src[start + 2..self.pos].to_string();
                self.emit(kind, value, start);
            } else if self.at("/*") {
                self.block_comment(start);
            } else if (b == b'N' || b == b'n') && self.peek(1) == b'\'' {
                self.pos += 2;
                let value = self.quoted(b'\'');
                self.emit(TokenKind::NationalString, value, start);
            } else if b == b'\'' {
                self.pos += 1;
                let value = self.quoted(b'\'');
                self.emit(TokenKind::String, value, start);
            } else if b == b'"' {
                self.pos += 1;
                let value = self.quoted(b'"');
                self.emit(TokenKind::QuotedString, value, start);
            } else if b == b'[' {
                self.pos += 1;
                let value = self.quoted(b']');
                self.emit(TokenKind::BracketQuotedName, value, start);
            } else if b == b'0' && matches!(self.peek(1), b'x' | b'X') {
                self.pos += 2;
                while self.peek(0).is_ascii_hexdigit() {
                    self.pos += 1;
                }
                self.emit_raw(TokenKind::BinaryValue, start);
            } else if b.is_ascii_digit() || (b == b'.' && self.peek(1).is_ascii_digit()) {
                self.number();
                self.emit_raw(TokenKind::Number, start);
            } else if b == b'$' && (self.peek(1).is_ascii_digit() || self.peek(1) == b'.') {
                self.pos += 1;
                self.number();
                self.emit_raw(TokenKind::MonetaryValue, start);
            } else if b == b'$' && self.peek(1).is_ascii_alphabetic() {
                self.pos += 1;
                self.word();
                self.emit_raw(TokenKind::PseudoName, start);
            } else if is_word_start(b) {
                self.word();
                self.emit_raw(TokenKind::OtherNode, start);
            } else if b == b'?' {
                self.pos += 1;
                if is_word_start(self.peek(0)) && self.peek(0) != b'@' {
                    self.word();
                }
                self.emit_raw(TokenKind::OtherNode, start);
            } else if let Some(op) = OPERATORS.iter().find(|op| self.at(op)) {
                self.pos += op.len();
                self.emit_raw(TokenKind::OtherOperator, start);
            } else {
                self.pos += 1;
                let kind = match b {
                    b'(' => TokenKind::OpenParens,
                    b')' => TokenKind::CloseParens,
                    b',' => TokenKind::Comma,
                    b'.' => TokenKind::Period,
                    b';' => TokenKind::Semicolon,
                    b':' => TokenKind::Colon,
                    b'*' => TokenKind::Asterisk,
                    b'=' => TokenKind::EqualsSign,
                    b'+' | b'-' | b'/' | b'%' | b'&' | b'|' | b'^' | b'~' | b'<' | b'>'
                    | b'!' => TokenKind::OtherOperator,
                    _ => TokenKind::OtherNode,
                };
                self.emit_raw(kind, start);
            }
        }
    }

    /// Nested `/* */` comment.
    fn block_comment(&mut self, start: usize) {
        self.pos += 2;
        let mut depth = 1usize;
        while self.pos < self.bytes.len() {
            if self.at("/*") {
                depth += 1;
                self.pos += 2;
            } else if self.at("*/") {
                depth -= 1;
                self.pos += 2;
                if depth == 0 {
                    let value = self.src[start + 2..self.pos - 2].to_string();
                    self.emit(TokenKind::MultiLineComment, value, start);
                    return;
                }
            } else {
                self.pos += 1;
            }
        }
        self.list.has_unfinished_token = true;
        let value = self.src[start + 2..].to_string();
        self.emit(TokenKind::MultiLineComment, value, start);
    }

    /// Reads up to the closing `terminator`, collapsing doubled terminators.
    /// The opening delimiter has already been consumed.
    fn quoted(&mut self, terminator: u8) -> String {
        let mut value = String::new();
        let mut run_start = self.pos;
        while self.pos < self.bytes.len() {
            if self.peek(0) == terminator {
                value.push_str(&self.src[run_start..self.pos]);
                if self.peek(1) == terminator {
                    value.push(terminator as char);
                    self.pos += 2;
                    run_start = self.pos;
                } else {
                    self.pos += 1;
                    return value;
                }
            } else {
                self.pos += 1;
            }
        }
        self.list.has_unfinished_token = true;
        value.push_str(&self.src[run_start..self.pos]);
        value
    }

    fn number(&mut self) {
        while self.peek(0).is_ascii_digit() {
            self.pos += 1;
        }
        if self.peek(0) == b'.' && self.peek(1) != b'.' {
            self.pos += 1;
            while self.peek(0).is_ascii_digit() {
                self.pos += 1;
            }
        }
        if matches!(self.peek(0), b'e' | b'E')
            && (self.peek(1).is_ascii_digit()
                || (matches!(self.peek(1), b'+' | b'-') && self.peek(2).is_ascii_digit()))
        {
            self.pos += 2;
            while self.peek(0).is_ascii_digit() {
                self.pos += 1;
            }
        }
    }

    fn word(&mut self) {
        while self.pos < self.bytes.len() && is_word_byte(self.peek(0)) {
            self.pos += 1;
        }
    }
}
