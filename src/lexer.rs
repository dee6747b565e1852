//! Tokenizer for Serv source, driven by the pest token table in `lexer.pest`.
//!
//! [`Lexer`] is a lazy iterator: each call to `next` skips whitespace, matches exactly one
//! token and advances. It is `Clone`, so a stream can be restarted from any point (including
//! the start) by keeping a copy. The first unrecognised character ends the stream with a
//! [`LexError`]; no recovery is attempted.

use crate::error::{LexError, LexErrorKind};
use crate::scalar::Scalar;
use pest::Parser;
use pest_derive::Parser as PestParser;
use std::fmt;

#[derive(PestParser)]
#[grammar = "lexer.pest"]
struct TokenGrammar;

/// Location in the source: byte offset plus 1-based line and column (in chars).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub offset: usize,
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub const START: Position = Position { offset: 0, line: 1, column: 1 };

    /// Move past `text`, which must be the source slice starting at this position.
    pub fn advance(&mut self, text: &str) {
        for c in text.chars() {
            self.offset += c.len_utf8();
            if c == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
        }
    }
}

impl Default for Position {
    fn default() -> Self {
        Position::START
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Reserved words other than the scalar type names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Keyword {
    Message,
    Inbound,
    Outbound,
    Optional,
    Required,
    Enum,
}

const KEYWORDS: &[(Keyword, &str)] = &[
    (Keyword::Message, "message"),
    (Keyword::Inbound, "inbound"),
    (Keyword::Outbound, "outbound"),
    (Keyword::Optional, "optional"),
    (Keyword::Required, "required"),
    (Keyword::Enum, "enum"),
];

impl Keyword {
    pub fn from_word(word: &str) -> Option<Keyword> {
        KEYWORDS.iter().find(|(_, w)| *w == word).map(|(k, _)| *k)
    }

    pub fn as_str(self) -> &'static str {
        KEYWORDS
            .iter()
            .find(|(k, _)| *k == self)
            .map(|(_, w)| *w)
            .unwrap_or("?")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Punct {
    LBrace,
    RBrace,
    LParen,
    RParen,
    Comma,
    Semicolon,
    Colon,
    Dot,
    Lt,
    Gt,
    Eq,
}

const PUNCTUATION: &[(Punct, &str)] = &[
    (Punct::LBrace, "{"),
    (Punct::RBrace, "}"),
    (Punct::LParen, "("),
    (Punct::RParen, ")"),
    (Punct::Comma, ","),
    (Punct::Semicolon, ";"),
    (Punct::Colon, ":"),
    (Punct::Dot, "."),
    (Punct::Lt, "<"),
    (Punct::Gt, ">"),
    (Punct::Eq, "="),
];

impl Punct {
    pub fn from_symbol(symbol: &str) -> Option<Punct> {
        PUNCTUATION.iter().find(|(_, s)| *s == symbol).map(|(p, _)| *p)
    }

    pub fn as_str(self) -> &'static str {
        PUNCTUATION
            .iter()
            .find(|(p, _)| *p == self)
            .map(|(_, s)| *s)
            .unwrap_or("?")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Keyword(Keyword),
    Scalar(Scalar),
    Ident,
    Integer,
    Punct(Punct),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub text: &'a str,
    pub position: Position,
}

impl fmt::Display for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TokenKind::Ident => write!(f, "identifier `{}`", self.text),
            TokenKind::Integer => write!(f, "integer `{}`", self.text),
            TokenKind::Keyword(_) | TokenKind::Scalar(_) | TokenKind::Punct(_) => {
                write!(f, "`{}`", self.text)
            }
        }
    }
}

fn classify(rule: Rule, text: &str) -> Option<TokenKind> {
    match rule {
        Rule::keyword => Keyword::from_word(text).map(TokenKind::Keyword),
        Rule::scalar => Scalar::from_keyword(text).map(TokenKind::Scalar),
        Rule::ident => Some(TokenKind::Ident),
        Rule::integer => Some(TokenKind::Integer),
        Rule::punct => Punct::from_symbol(text).map(TokenKind::Punct),
        _ => None,
    }
}

#[derive(Debug, Clone)]
pub struct Lexer<'a> {
    source: &'a str,
    position: Position,
    done: bool,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Lexer {
            source,
            position: Position::START,
            done: false,
        }
    }

    /// Position of the next unread character (end of input once exhausted).
    pub fn position(&self) -> Position {
        self.position
    }

    fn rest(&self) -> &'a str {
        &self.source[self.position.offset..]
    }

    fn skip_whitespace(&mut self) {
        let rest = self.rest();
        if let Some(pair) = TokenGrammar::parse(Rule::separator, rest).ok().and_then(|mut p| p.next()) {
            self.position.advance(&rest[..pair.as_str().len()]);
        }
    }

    fn fail(&mut self, kind: LexErrorKind) -> LexError {
        self.done = true;
        LexError {
            kind,
            position: self.position,
        }
    }

    fn unexpected_char(&mut self) -> LexError {
        let c = self.rest().chars().next().unwrap_or('\0');
        self.fail(LexErrorKind::UnexpectedChar(c))
    }

    fn next_token(&mut self) -> Result<Token<'a>, LexError> {
        let rest = self.rest();
        let pair = match TokenGrammar::parse(Rule::token, rest) {
            Ok(mut pairs) => pairs.next(),
            Err(_) => None,
        };
        let Some(pair) = pair else {
            return Err(self.unexpected_char());
        };
        let text = &rest[..pair.as_str().len()];
        let Some(kind) = classify(pair.as_rule(), text) else {
            return Err(self.unexpected_char());
        };
        let token = Token {
            kind,
            text,
            position: self.position,
        };
        self.position.advance(text);
        tracing::trace!(kind = ?token.kind, text, line = token.position.line, column = token.position.column, "token");
        Ok(token)
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Result<Token<'a>, LexError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        self.skip_whitespace();
        if self.rest().is_empty() {
            self.done = true;
            return None;
        }
        Some(self.next_token())
    }
}

/// Lex the whole source, stopping at the first error.
pub fn tokenize(source: &str) -> Result<Vec<Token<'_>>, LexError> {
    Lexer::new(source).collect()
}

/// Check that raw input is UTF-8, reporting the first offending byte and where it sits.
pub fn decode_source(bytes: &[u8]) -> Result<&str, LexError> {
    std::str::from_utf8(bytes).map_err(|e| {
        let valid = e.valid_up_to();
        let mut position = Position::START;
        // The prefix up to `valid_up_to` is guaranteed valid.
        if let Ok(prefix) = std::str::from_utf8(&bytes[..valid]) {
            position.advance(prefix);
        }
        LexError {
            kind: LexErrorKind::InvalidUtf8(bytes[valid]),
            position,
        }
    })
}
