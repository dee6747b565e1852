//! Recursive-descent parser: one function per production of the Serv grammar.
//!
//! ```text
//! Document      := (Definition ";"*)*
//! Definition    := Message | InboundService | OutboundService
//! Message       := "message" Ident "{" (MessageMember ";"*)* "}"
//! MessageMember := FieldDecl | EnumDecl | Message
//! FieldDecl     := ("optional" | "required")? Type Ident
//! EnumDecl      := "enum" Ident "{" (EnumValue ";"*)* "}"
//! EnumValue     := Ident "=" Integer
//! InboundService  := "inbound" Ident "(" (Type ","*)* ")" (":" Type)? ";"
//! OutboundService := "outbound" Ident "(" (Type ","*)* ")" (":" Type)? ";"
//! Type          := ScalarKeyword | "map" "<" Type "," Type ">" | Ident ("." Ident)*
//! ```
//!
//! Tokens are pulled lazily from the [`Lexer`] with a single token of lookahead. The first
//! lex or grammar error aborts the parse; no partial document is returned.

use crate::ast::*;
use crate::error::{Error, ParseError};
use crate::lexer::{Keyword, Lexer, Position, Punct, Token, TokenKind};

/// Parse Serv source into an (unvalidated) AST.
pub fn parse(source: &str) -> Result<Document, Error> {
    let document = Parser::new(source).parse_document()?;
    tracing::debug!(definitions = document.definitions.len(), "parsed document");
    Ok(document)
}

struct Parser<'a> {
    lexer: Lexer<'a>,
    peeked: Option<Token<'a>>,
}

impl<'a> Parser<'a> {
    fn new(source: &'a str) -> Self {
        Parser {
            lexer: Lexer::new(source),
            peeked: None,
        }
    }

    // ==================== Token helpers ====================

    fn peek(&mut self) -> Result<Option<Token<'a>>, Error> {
        if self.peeked.is_none() {
            self.peeked = self.lexer.next().transpose()?;
        }
        Ok(self.peeked)
    }

    fn bump(&mut self) -> Result<Option<Token<'a>>, Error> {
        let token = self.peek()?;
        self.peeked = None;
        Ok(token)
    }

    fn peek_kind(&mut self) -> Result<Option<TokenKind>, Error> {
        Ok(self.peek()?.map(|t| t.kind))
    }

    fn error_at(&self, expected: &str, found: Option<Token<'a>>) -> Error {
        let (found, position): (String, Position) = match found {
            Some(token) => (token.to_string(), token.position),
            None => ("end of input".to_string(), self.lexer.position()),
        };
        ParseError {
            expected: expected.to_string(),
            found,
            position,
        }
        .into()
    }

    /// Report the next token (without consuming it) as unexpected.
    fn unexpected(&mut self, expected: &str) -> Error {
        match self.peek() {
            Ok(found) => self.error_at(expected, found),
            Err(e) => e,
        }
    }

    fn eat_punct(&mut self, punct: Punct) -> Result<bool, Error> {
        if self.peek_kind()? == Some(TokenKind::Punct(punct)) {
            self.bump()?;
            return Ok(true);
        }
        Ok(false)
    }

    fn expect_punct(&mut self, punct: Punct) -> Result<(), Error> {
        if self.eat_punct(punct)? {
            Ok(())
        } else {
            Err(self.unexpected(&format!("`{}`", punct.as_str())))
        }
    }

    fn expect_keyword(&mut self, keyword: Keyword) -> Result<(), Error> {
        if self.peek_kind()? == Some(TokenKind::Keyword(keyword)) {
            self.bump()?;
            Ok(())
        } else {
            Err(self.unexpected(&format!("`{}`", keyword.as_str())))
        }
    }

    fn expect_ident(&mut self, what: &str) -> Result<&'a str, Error> {
        match self.peek()? {
            Some(token) if token.kind == TokenKind::Ident => {
                self.bump()?;
                Ok(token.text)
            }
            found => Err(self.error_at(what, found)),
        }
    }

    fn skip_semicolons(&mut self) -> Result<(), Error> {
        while self.eat_punct(Punct::Semicolon)? {}
        Ok(())
    }

    // ==================== Productions ====================

    fn parse_document(mut self) -> Result<Document, Error> {
        let mut definitions = Vec::new();
        while self.peek()?.is_some() {
            let definition = self.parse_definition()?;
            tracing::trace!(name = definition.name(), "definition");
            definitions.push(definition);
            self.skip_semicolons()?;
        }
        Ok(Document { definitions })
    }

    fn parse_definition(&mut self) -> Result<Definition, Error> {
        match self.peek_kind()? {
            Some(TokenKind::Keyword(Keyword::Message)) => Ok(Definition::Message(self.parse_message()?)),
            Some(TokenKind::Keyword(Keyword::Inbound)) => {
                Ok(Definition::InboundService(self.parse_service(Keyword::Inbound)?))
            }
            Some(TokenKind::Keyword(Keyword::Outbound)) => {
                Ok(Definition::OutboundService(self.parse_service(Keyword::Outbound)?))
            }
            _ => Err(self.unexpected("`message`, `inbound` or `outbound`")),
        }
    }

    fn parse_message(&mut self) -> Result<Message, Error> {
        self.expect_keyword(Keyword::Message)?;
        let name = self.expect_ident("message name")?.to_string();
        self.expect_punct(Punct::LBrace)?;
        let mut definitions = Vec::new();
        while !self.eat_punct(Punct::RBrace)? {
            definitions.push(self.parse_member()?);
            self.skip_semicolons()?;
        }
        Ok(Message { name, definitions })
    }

    fn parse_member(&mut self) -> Result<MessageDefinition, Error> {
        match self.peek_kind()? {
            Some(TokenKind::Keyword(Keyword::Enum)) => Ok(MessageDefinition::Enum(self.parse_enum()?)),
            Some(TokenKind::Keyword(Keyword::Message)) => {
                Ok(MessageDefinition::Message(self.parse_message()?))
            }
            None => Err(self.unexpected("`}`")),
            _ => Ok(MessageDefinition::Field(self.parse_field()?)),
        }
    }

    fn parse_field(&mut self) -> Result<Field, Error> {
        let modifier = match self.peek_kind()? {
            Some(TokenKind::Keyword(Keyword::Optional)) => {
                self.bump()?;
                Modifier::Optional
            }
            Some(TokenKind::Keyword(Keyword::Required)) => {
                self.bump()?;
                Modifier::Required
            }
            _ => Modifier::None,
        };
        let ty = self.parse_type()?;
        let name = self.expect_ident("field name")?.to_string();
        Ok(Field { name, ty, modifier })
    }

    fn parse_enum(&mut self) -> Result<Enum, Error> {
        self.expect_keyword(Keyword::Enum)?;
        let name = self.expect_ident("enum name")?.to_string();
        self.expect_punct(Punct::LBrace)?;
        let mut values = Vec::new();
        while !self.eat_punct(Punct::RBrace)? {
            values.push(self.parse_enum_value()?);
            self.skip_semicolons()?;
        }
        Ok(Enum { name, values })
    }

    fn parse_enum_value(&mut self) -> Result<EnumValue, Error> {
        let key = self.expect_ident("enum value name or `}`")?.to_string();
        self.expect_punct(Punct::Eq)?;
        match self.peek()? {
            Some(token) if token.kind == TokenKind::Integer => {
                let value = token
                    .text
                    .parse::<i64>()
                    .map_err(|_| self.error_at("a 64-bit integer literal", Some(token)))?;
                self.bump()?;
                Ok(EnumValue { key, value })
            }
            found => Err(self.error_at("integer literal", found)),
        }
    }

    fn parse_service(&mut self, keyword: Keyword) -> Result<Service, Error> {
        self.expect_keyword(keyword)?;
        let name = self.expect_ident("service name")?.to_string();
        self.expect_punct(Punct::LParen)?;
        let mut request = Vec::new();
        while !self.eat_punct(Punct::RParen)? {
            request.push(self.parse_type()?);
            while self.eat_punct(Punct::Comma)? {}
        }
        let response = if self.eat_punct(Punct::Colon)? {
            Some(self.parse_type()?)
        } else {
            None
        };
        self.expect_punct(Punct::Semicolon)?;
        Ok(Service {
            name,
            request,
            response,
        })
    }

    /// Scalar keywords win over everything else; `map` only starts a map type when
    /// followed by `<`; anything else is a dotted reference path.
    fn parse_type(&mut self) -> Result<Type, Error> {
        let token = match self.peek()? {
            Some(token) => token,
            None => return Err(self.error_at("type", None)),
        };
        match token.kind {
            TokenKind::Scalar(scalar) => {
                self.bump()?;
                Ok(Type::Scalar(scalar))
            }
            TokenKind::Ident => {
                self.bump()?;
                if token.text == "map" && self.peek_kind()? == Some(TokenKind::Punct(Punct::Lt)) {
                    return self.parse_map_body();
                }
                let mut path = token.text.to_string();
                while self.eat_punct(Punct::Dot)? {
                    path.push('.');
                    path.push_str(self.expect_ident("identifier after `.`")?);
                }
                Ok(Type::Reference(path))
            }
            _ => Err(self.error_at("type", Some(token))),
        }
    }

    fn parse_map_body(&mut self) -> Result<Type, Error> {
        self.expect_punct(Punct::Lt)?;
        let key = self.parse_type()?;
        self.expect_punct(Punct::Comma)?;
        let value = self.parse_type()?;
        self.expect_punct(Punct::Gt)?;
        Ok(Type::map(key, value))
    }
}
