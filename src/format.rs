//! Print an AST back as canonical Serv source (tab indentation, one member per line).

use crate::ast::*;
use std::fmt::{self, Display, Write};

impl Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Scalar(scalar) => write!(f, "{}", scalar),
            Type::Map(key, value) => write!(f, "map<{}, {}>", key, value),
            Type::Reference(name) => f.write_str(name),
        }
    }
}

impl Display for Modifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Modifier::None => Ok(()),
            Modifier::Optional => f.write_str("optional "),
            Modifier::Required => f.write_str("required "),
        }
    }
}

impl Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{} {};", self.modifier, self.ty, self.name)
    }
}

fn write_indent(f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
    for _ in 0..depth {
        f.write_char('\t')?;
    }
    Ok(())
}

fn write_enum(f: &mut fmt::Formatter<'_>, e: &Enum, depth: usize) -> fmt::Result {
    writeln!(f, "enum {} {{", e.name)?;
    for value in &e.values {
        write_indent(f, depth + 1)?;
        writeln!(f, "{} = {};", value.key, value.value)?;
    }
    write_indent(f, depth)?;
    f.write_char('}')
}

fn write_message(f: &mut fmt::Formatter<'_>, message: &Message, depth: usize) -> fmt::Result {
    writeln!(f, "message {} {{", message.name)?;
    for member in &message.definitions {
        write_indent(f, depth + 1)?;
        match member {
            MessageDefinition::Field(field) => writeln!(f, "{}", field)?,
            MessageDefinition::Enum(e) => {
                write_enum(f, e, depth + 1)?;
                f.write_char('\n')?;
            }
            MessageDefinition::Message(nested) => {
                write_message(f, nested, depth + 1)?;
                f.write_char('\n')?;
            }
        }
    }
    write_indent(f, depth)?;
    f.write_char('}')
}

fn write_service(f: &mut fmt::Formatter<'_>, direction: Direction, service: &Service) -> fmt::Result {
    write!(f, "{} {}(", direction.keyword(), service.name)?;
    for (i, ty) in service.request.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{}", ty)?;
    }
    f.write_char(')')?;
    if let Some(response) = &service.response {
        write!(f, ": {}", response)?;
    }
    f.write_char(';')
}

impl Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_message(f, self, 0)
    }
}

impl Display for Definition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Definition::Message(message) => write_message(f, message, 0),
            Definition::InboundService(service) => write_service(f, Direction::Inbound, service),
            Definition::OutboundService(service) => write_service(f, Direction::Outbound, service),
        }
    }
}

impl Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, definition) in self.definitions.iter().enumerate() {
            if i > 0 && (definition.as_message().is_some() || self.definitions[i - 1].as_message().is_some()) {
                f.write_char('\n')?;
            }
            writeln!(f, "{}", definition)?;
        }
        Ok(())
    }
}
