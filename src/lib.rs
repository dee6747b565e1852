//! # servdsl — front-end for the Serv interface-definition language
//!
//! Serv describes RPC services (inbound: the server receives the call; outbound: the server
//! initiates it) and the structured messages they exchange. This crate turns `.serv` source
//! into a validated AST that a code generator can consume without re-checking anything.
//!
//! ## Pipeline
//!
//! `bytes -> lexer -> tokens -> parser -> Document -> validator -> validated Document`
//!
//! Every stage is a pure function of its input and stops at the first error.
//!
//! ## Example
//!
//! ```text
//! message TestMessage {
//!   string TestString;
//!   optional int32 count;
//! };
//!
//! inbound TestService(TestMessage, string): TestMessage;
//! outbound Notify();
//! ```
//!
//! ## Usage
//!
//! ```
//! let doc = servdsl::compile(b"message M { string s; } inbound Svc(M): string;").unwrap();
//! assert_eq!(doc.definitions.len(), 2);
//! ```

pub mod ast;
pub mod error;
pub mod format;
pub mod lexer;
pub mod lint;
pub mod parser;
pub mod scalar;
pub mod validate;

pub use ast::{
    Definition, Direction, Document, Enum, EnumValue, Field, Message, MessageDefinition, Modifier, Service, Type,
};
pub use error::{DefinitionKind, Error, LexError, LexErrorKind, ParseError, ValidationError};
pub use lexer::{tokenize, Lexer, Position, Token, TokenKind};
pub use parser::parse;
pub use scalar::Scalar;
pub use validate::{validate, ValidationOptions, Validator};

/// Lex, parse and validate raw source with default options.
pub fn compile(source: &[u8]) -> Result<Document, Error> {
    compile_with(source, ValidationOptions::default())
}

/// Lex, parse and validate raw source.
pub fn compile_with(source: &[u8], options: ValidationOptions) -> Result<Document, Error> {
    let text = lexer::decode_source(source)?;
    let document = parse(text)?;
    Ok(Validator::new(options).validate(document)?)
}
