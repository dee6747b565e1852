//! Semantic validation of a parsed [`Document`].
//!
//! Two full passes run in order, and the first violation ends validation:
//!
//! 1. **Uniqueness**: message names (nested messages under their dotted path) and service
//!    names are unique. Inbound and outbound services share one namespace.
//! 2. **Resolution**: every reference a service's request or response mentions names a
//!    message. Because pass 1 has already seen the whole document, forward references
//!    are fine.
//!
//! Fields are only resolved when [`ValidationOptions::check_field_references`] is set.

use crate::ast::{Document, Message, MessageDefinition};
use crate::error::{DefinitionKind, ValidationError};
use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ValidationOptions {
    /// Also require reference-typed message fields to resolve.
    pub check_field_references: bool,
}

/// Validate with default options, handing the document back on success.
pub fn validate(document: Document) -> Result<Document, ValidationError> {
    Validator::default().validate(document)
}

#[derive(Debug, Clone, Default)]
pub struct Validator {
    options: ValidationOptions,
}

impl Validator {
    pub fn new(options: ValidationOptions) -> Self {
        Validator { options }
    }

    pub fn options(&self) -> ValidationOptions {
        self.options
    }

    pub fn validate(&self, document: Document) -> Result<Document, ValidationError> {
        self.check(&document)?;
        Ok(document)
    }

    /// Run every pass without taking ownership.
    pub fn check(&self, document: &Document) -> Result<(), ValidationError> {
        let symbols = check_uniqueness(document)?;
        check_service_references(document, &symbols)?;
        if self.options.check_field_references {
            for message in document.messages() {
                check_field_references(message, &message.name, &symbols)?;
            }
        }
        tracing::debug!(
            messages = symbols.messages.len(),
            services = symbols.services.len(),
            strict = self.options.check_field_references,
            "validated document"
        );
        Ok(())
    }
}

/// Names declared by a document: messages and enums by dotted path, services by name.
#[derive(Debug, Clone, Default)]
pub struct SymbolTable {
    messages: HashSet<String>,
    enums: HashSet<String>,
    services: HashSet<String>,
}

impl SymbolTable {
    /// Collect every name, ignoring duplicates.
    pub fn from_document(document: &Document) -> Self {
        let mut symbols = SymbolTable::default();
        for definition in &document.definitions {
            match definition.as_message() {
                Some(message) => {
                    symbols.insert_message(&message.name, message);
                }
                None => {
                    symbols.services.insert(definition.name().to_string());
                }
            }
        }
        symbols
    }

    /// Register `message` under `path` plus its nested members. Returns the first path
    /// that was already present.
    fn insert_message(&mut self, path: &str, message: &Message) -> Option<String> {
        let mut duplicate = None;
        if !self.messages.insert(path.to_string()) {
            duplicate = Some(path.to_string());
        }
        for member in &message.definitions {
            let nested_path = format!("{}.{}", path, member.name());
            match member {
                MessageDefinition::Message(nested) => {
                    let nested_duplicate = self.insert_message(&nested_path, nested);
                    duplicate = duplicate.or(nested_duplicate);
                }
                MessageDefinition::Enum(_) => {
                    self.enums.insert(nested_path);
                }
                MessageDefinition::Field(_) => {}
            }
        }
        duplicate
    }

    pub fn contains_message(&self, path: &str) -> bool {
        self.messages.contains(path)
    }

    pub fn contains_service(&self, name: &str) -> bool {
        self.services.contains(name)
    }

    /// Resolve a type name used inside the message at `scope`: an absolute path, or a
    /// message/enum nested in `scope` or any of its enclosing messages.
    pub fn resolves_in(&self, scope: &str, name: &str) -> bool {
        let known = |path: &str| self.messages.contains(path) || self.enums.contains(path);
        if known(name) {
            return true;
        }
        let mut scope = scope;
        loop {
            if known(&format!("{}.{}", scope, name)) {
                return true;
            }
            match scope.rfind('.') {
                Some(i) => scope = &scope[..i],
                None => return false,
            }
        }
    }
}

fn check_uniqueness(document: &Document) -> Result<SymbolTable, ValidationError> {
    let mut symbols = SymbolTable::default();
    for definition in &document.definitions {
        match definition.as_message() {
            Some(message) => {
                if let Some(name) = symbols.insert_message(&message.name, message) {
                    return Err(ValidationError::DuplicateDefinition {
                        kind: DefinitionKind::Message,
                        name,
                    });
                }
            }
            None => {
                if !symbols.services.insert(definition.name().to_string()) {
                    return Err(ValidationError::DuplicateDefinition {
                        kind: DefinitionKind::Service,
                        name: definition.name().to_string(),
                    });
                }
            }
        }
    }
    Ok(symbols)
}

fn check_service_references(document: &Document, symbols: &SymbolTable) -> Result<(), ValidationError> {
    for (_, service) in document.services() {
        for ty in service.request.iter().chain(service.response.iter()) {
            if let Some(name) = ty.references().into_iter().find(|n| !symbols.contains_message(n)) {
                return Err(ValidationError::UnresolvedReference {
                    service: service.name.clone(),
                    name: name.to_string(),
                });
            }
        }
    }
    Ok(())
}

fn check_field_references(message: &Message, path: &str, symbols: &SymbolTable) -> Result<(), ValidationError> {
    for member in &message.definitions {
        match member {
            MessageDefinition::Field(field) => {
                if let Some(name) = field.ty.references().into_iter().find(|n| !symbols.resolves_in(path, n)) {
                    return Err(ValidationError::UnresolvedFieldReference {
                        message: path.to_string(),
                        field: field.name.clone(),
                        name: name.to_string(),
                    });
                }
            }
            MessageDefinition::Message(nested) => {
                check_field_references(nested, &format!("{}.{}", path, nested.name), symbols)?;
            }
            MessageDefinition::Enum(_) => {}
        }
    }
    Ok(())
}
