//! Linter for parsed Serv documents. Findings never fail the pipeline.
//!
//! ## Rules
//!
//! - **unresolved-field-reference**: a field names a type that is neither a known message nor an
//!   enum in scope. Validation ignores fields unless run in strict mode, so this is where the
//!   mistake usually surfaces.
//! - **duplicate-member**: two members of one message (fields, enums, nested messages) share a name.
//!   Generated structs would not compile.
//! - **duplicate-enum-value**: an enum repeats a key.
//! - **empty-message** / **empty-enum**: a body with nothing in it.
//!
//! Run it via `servc lint FILE.serv`.

use crate::ast::{Document, Enum, Message, MessageDefinition};
use crate::validate::SymbolTable;
use std::collections::HashSet;
use std::fmt;

/// Severity of a lint finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

/// Identifies which rule produced the message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LintRule {
    UnresolvedFieldReference,
    DuplicateMember,
    DuplicateEnumValue,
    EmptyMessage,
    EmptyEnum,
}

impl LintRule {
    pub fn id(self) -> &'static str {
        match self {
            LintRule::UnresolvedFieldReference => "unresolved-field-reference",
            LintRule::DuplicateMember => "duplicate-member",
            LintRule::DuplicateEnumValue => "duplicate-enum-value",
            LintRule::EmptyMessage => "empty-message",
            LintRule::EmptyEnum => "empty-enum",
        }
    }

    pub fn severity(self) -> Severity {
        match self {
            LintRule::DuplicateMember => Severity::Error,
            _ => Severity::Warning,
        }
    }
}

/// A single finding. `path` is the dotted name of the message or enum it concerns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LintMessage {
    pub rule: LintRule,
    pub severity: Severity,
    pub path: String,
    pub message: String,
}

impl fmt::Display for LintMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let severity = match self.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        write!(f, "{}: {}: {} [{}]", self.path, severity, self.message, self.rule.id())
    }
}

/// Run all lint rules. Messages come out in document order.
pub fn lint(document: &Document) -> Vec<LintMessage> {
    let symbols = SymbolTable::from_document(document);
    let mut out = Vec::new();
    for message in document.messages() {
        lint_message(message, &message.name, &symbols, &mut out);
    }
    out
}

fn push(out: &mut Vec<LintMessage>, rule: LintRule, path: &str, message: String) {
    out.push(LintMessage {
        rule,
        severity: rule.severity(),
        path: path.to_string(),
        message,
    });
}

fn lint_message(message: &Message, path: &str, symbols: &SymbolTable, out: &mut Vec<LintMessage>) {
    if message.definitions.is_empty() {
        push(out, LintRule::EmptyMessage, path, format!("message `{}` has no members", message.name));
    }

    let mut seen = HashSet::new();
    for member in &message.definitions {
        if !seen.insert(member.name()) {
            push(
                out,
                LintRule::DuplicateMember,
                path,
                format!("member `{}` is declared more than once", member.name()),
            );
        }
        match member {
            MessageDefinition::Field(field) => {
                for name in field.ty.references() {
                    if !symbols.resolves_in(path, name) {
                        push(
                            out,
                            LintRule::UnresolvedFieldReference,
                            path,
                            format!("field `{}` references unknown type `{}`", field.name, name),
                        );
                    }
                }
            }
            MessageDefinition::Enum(e) => lint_enum(e, &format!("{}.{}", path, e.name), out),
            MessageDefinition::Message(nested) => {
                lint_message(nested, &format!("{}.{}", path, nested.name), symbols, out)
            }
        }
    }
}

fn lint_enum(e: &Enum, path: &str, out: &mut Vec<LintMessage>) {
    if e.values.is_empty() {
        push(out, LintRule::EmptyEnum, path, format!("enum `{}` has no values", e.name));
    }
    let mut seen = HashSet::new();
    for value in &e.values {
        if !seen.insert(value.key.as_str()) {
            push(
                out,
                LintRule::DuplicateEnumValue,
                path,
                format!("enum value `{}` is declared more than once", value.key),
            );
        }
    }
}
