//! Field and method descriptor parsing (`I`, `[B`, `Ljava/lang/String;`, `(IJ)V`).

use crate::error::{Error, Result};

/// A parsed field type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FieldType {
    Byte,
    Char,
    Double,
    Float,
    Int,
    Long,
    Short,
    Boolean,
    /// Internal class name, e.g. `java/lang/String`.
    Object(String),
    Array(Box<FieldType>),
}

impl FieldType {
    pub fn parse(desc: &str) -> Result<FieldType> {
        let (ty, rest) = parse_field(desc, desc)?;
        if !rest.is_empty() {
            return Err(Error::InvalidDescriptor(desc.to_string()));
        }
        Ok(ty)
    }

    /// Number of JVM local variable slots a value of this type occupies.
    pub fn slot_size(&self) -> u16 {
        match self {
            FieldType::Long | FieldType::Double => 2,
            _ => 1,
        }
    }

    pub fn is_floating_point(&self) -> bool {
        matches!(self, FieldType::Float | FieldType::Double)
    }

    pub fn class_name(&self) -> Option<&str> {
        match self {
            FieldType::Object(name) => Some(name),
            _ => None,
        }
    }
}

/// A parsed method descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodDescriptor {
    pub params: Vec<FieldType>,
    /// `None` for `void`.
    pub ret: Option<FieldType>,
}

impl MethodDescriptor {
    pub fn parse(desc: &str) -> Result<MethodDescriptor> {
        let invalid = || Error::InvalidDescriptor(desc.to_string());
        let mut rest = desc.strip_prefix('(').ok_or_else(invalid)?;
        let mut params = Vec::new();
        while !rest.starts_with(')') {
            if rest.is_empty() {
                return Err(invalid());
            }
            let (ty, tail) = parse_field(rest, desc)?;
            params.push(ty);
            rest = tail;
        }
        let rest = &rest[1..];
        let ret = if rest == "V" {
            None
        } else {
            Some(FieldType::parse(rest).map_err(|_| invalid())?)
        };
        Ok(MethodDescriptor { params, ret })
    }

    pub fn has_return(&self) -> bool {
        self.ret.is_some()
    }

    /// JVM slots used by the parameters, excluding `this`.
    pub fn param_slots(&self) -> u16 {
        self.params.iter().map(FieldType::slot_size).sum()
    }
}

fn parse_field<'a>(s: &'a str, whole: &str) -> Result<(FieldType, &'a str)> {
    let invalid = || Error::InvalidDescriptor(whole.to_string());
    let mut chars = s.chars();
    let ty = match chars.next().ok_or_else(invalid)? {
        'B' => FieldType::Byte,
        'C' => FieldType::Char,
        'D' => FieldType::Double,
        'F' => FieldType::Float,
        'I' => FieldType::Int,
        'J' => FieldType::Long,
        'S' => FieldType::Short,
        'Z' => FieldType::Boolean,
        'L' => {
            let end = s.find(';').ok_or_else(invalid)?;
            if end == 1 {
                return Err(invalid());
            }
            return Ok((FieldType::Object(s[1..end].to_string()), &s[end + 1..]));
        }
        '[' => {
            let (inner, rest) = parse_field(&s[1..], whole)?;
            return Ok((FieldType::Array(Box::new(inner)), rest));
        }
        _ => return Err(invalid()),
    };
    Ok((ty, chars.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_method() {
        let d = MethodDescriptor::parse("(IJLjava/lang/String;[B)Z").unwrap();
        assert_eq!(d.params.len(), 4);
        assert_eq!(d.params[2], FieldType::Object("java/lang/String".into()));
        assert_eq!(d.params[3], FieldType::Array(Box::new(FieldType::Byte)));
        assert_eq!(d.param_slots(), 5);
        assert_eq!(d.ret, Some(FieldType::Boolean));
    }

    #[test]
    fn parse_void() {
        let d = MethodDescriptor::parse("()V").unwrap();
        assert!(d.params.is_empty());
        assert!(!d.has_return());
    }

    #[test]
    fn rejects_garbage() {
        assert!(MethodDescriptor::parse("I)V").is_err());
        assert!(MethodDescriptor::parse("(I").is_err());
        assert!(MethodDescriptor::parse("(Q)V").is_err());
        assert!(MethodDescriptor::parse("(L;)V").is_err());
        assert!(FieldType::parse("II").is_err());
    }
}
