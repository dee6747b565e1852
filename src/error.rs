//! Error types for each pipeline stage, plus the [`Error`] that wraps them.

use crate::lexer::Position;
use std::fmt;

/// Failure to turn source text into tokens.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{position}: {kind}")]
pub struct LexError {
    pub kind: LexErrorKind,
    pub position: Position,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LexErrorKind {
    #[error("unrecognized character {0:?}")]
    UnexpectedChar(char),
    #[error("invalid UTF-8 byte 0x{0:02x}")]
    InvalidUtf8(u8),
}

/// Grammar violation. `expected` and `found` are human-readable token descriptions.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{position}: expected {expected}, found {found}")]
pub struct ParseError {
    pub expected: String,
    pub found: String,
    pub position: Position,
}

/// Which namespace a duplicated name belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DefinitionKind {
    Message,
    Service,
}

impl fmt::Display for DefinitionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DefinitionKind::Message => f.write_str("message"),
            DefinitionKind::Service => f.write_str("service"),
        }
    }
}

/// First semantic invariant a parsed document violates.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("duplicate {kind} definition `{name}`")]
    DuplicateDefinition { kind: DefinitionKind, name: String },
    #[error("service `{service}` references unknown message `{name}`")]
    UnresolvedReference { service: String, name: String },
    #[error("field `{field}` of message `{message}` references unknown type `{name}`")]
    UnresolvedFieldReference {
        message: String,
        field: String,
        name: String,
    },
}

/// Any failure of [`crate::compile`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("lex error at {0}")]
    Lex(#[from] LexError),
    #[error("parse error at {0}")]
    Parse(#[from] ParseError),
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),
}
