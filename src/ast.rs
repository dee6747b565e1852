//! Abstract Syntax Tree for Serv documents.
//!
//! Every node owns its children; references between messages are by name only, so the
//! tree is acyclic even when two messages mention each other.

use crate::scalar::Scalar;

/// Root of a parsed `.serv` file: definitions in source order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Document {
    pub definitions: Vec<Definition>,
}

/// A top-level unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Definition {
    Message(Message),
    InboundService(Service),
    OutboundService(Service),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub name: String,
    pub definitions: Vec<MessageDefinition>,
}

/// A member of a message body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageDefinition {
    Field(Field),
    Enum(Enum),
    Message(Message),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Modifier {
    #[default]
    None,
    Optional,
    Required,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub name: String,
    pub ty: Type,
    pub modifier: Modifier,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Enum {
    pub name: String,
    pub values: Vec<EnumValue>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumValue {
    pub key: String,
    pub value: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Inbound,
    Outbound,
}

impl Direction {
    pub fn keyword(self) -> &'static str {
        match self {
            Direction::Inbound => "inbound",
            Direction::Outbound => "outbound",
        }
    }
}

/// An inbound or outbound RPC. The direction is carried by the [`Definition`] variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Service {
    pub name: String,
    pub request: Vec<Type>,
    pub response: Option<Type>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Type {
    Scalar(Scalar),
    /// `map<K, V>`.
    Map(Box<Type>, Box<Type>),
    /// Dotted path naming a message, kept as written (`Outer.Inner`).
    Reference(String),
}

impl Type {
    pub fn reference(name: impl Into<String>) -> Type {
        Type::Reference(name.into())
    }

    pub fn map(key: Type, value: Type) -> Type {
        Type::Map(Box::new(key), Box::new(value))
    }

    /// Every reference name this type mentions, outermost first.
    pub fn references(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.collect_references(&mut out);
        out
    }

    fn collect_references<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            Type::Scalar(_) => {}
            Type::Map(key, value) => {
                key.collect_references(out);
                value.collect_references(out);
            }
            Type::Reference(name) => out.push(name),
        }
    }

    /// Spelling used by the server code generator.
    pub fn target_type(&self) -> String {
        match self {
            Type::Scalar(s) => s.target_type().to_string(),
            Type::Map(key, value) => format!("map[{}]{}", key.target_type(), value.target_type()),
            Type::Reference(name) => name.clone(),
        }
    }
}

impl Definition {
    pub fn name(&self) -> &str {
        match self {
            Definition::Message(m) => &m.name,
            Definition::InboundService(s) | Definition::OutboundService(s) => &s.name,
        }
    }

    /// The service and its direction, if this is a service definition.
    pub fn as_service(&self) -> Option<(Direction, &Service)> {
        match self {
            Definition::Message(_) => None,
            Definition::InboundService(s) => Some((Direction::Inbound, s)),
            Definition::OutboundService(s) => Some((Direction::Outbound, s)),
        }
    }

    pub fn as_message(&self) -> Option<&Message> {
        match self {
            Definition::Message(m) => Some(m),
            _ => None,
        }
    }
}

impl Document {
    pub fn messages(&self) -> impl Iterator<Item = &Message> {
        self.definitions.iter().filter_map(Definition::as_message)
    }

    pub fn services(&self) -> impl Iterator<Item = (Direction, &Service)> {
        self.definitions.iter().filter_map(Definition::as_service)
    }

    pub fn get_message(&self, name: &str) -> Option<&Message> {
        self.messages().find(|m| m.name == name)
    }

    pub fn get_service(&self, name: &str) -> Option<(Direction, &Service)> {
        self.services().find(|(_, s)| s.name == name)
    }
}

impl Message {
    pub fn fields(&self) -> impl Iterator<Item = &Field> {
        self.definitions.iter().filter_map(|d| match d {
            MessageDefinition::Field(f) => Some(f),
            _ => None,
        })
    }

    pub fn nested_messages(&self) -> impl Iterator<Item = &Message> {
        self.definitions.iter().filter_map(|d| match d {
            MessageDefinition::Message(m) => Some(m),
            _ => None,
        })
    }

    pub fn enums(&self) -> impl Iterator<Item = &Enum> {
        self.definitions.iter().filter_map(|d| match d {
            MessageDefinition::Enum(e) => Some(e),
            _ => None,
        })
    }
}

impl MessageDefinition {
    pub fn name(&self) -> &str {
        match self {
            MessageDefinition::Field(f) => &f.name,
            MessageDefinition::Enum(e) => &e.name,
            MessageDefinition::Message(m) => &m.name,
        }
    }
}
