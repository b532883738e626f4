//! Erased field and method descriptors (JVMS 4.3).

use nova_generics::{PrimitiveType, RawType};

use crate::error::{BridgeError, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodDescriptor {
    pub params: Vec<RawType>,
    /// `void` is represented as [`PrimitiveType::Void`].
    pub return_type: RawType,
}

pub fn parse_field_descriptor(desc: &str) -> Result<RawType> {
    let (ty, rest) = parse_field_type(desc).ok_or_else(|| invalid(desc))?;
    if !rest.is_empty() {
        return Err(invalid(desc));
    }
    Ok(ty)
}

pub fn parse_method_descriptor(desc: &str) -> Result<MethodDescriptor> {
    let mut rest = desc.strip_prefix('(').ok_or_else(|| invalid(desc))?;

    let mut params = Vec::new();
    loop {
        if let Some(after) = rest.strip_prefix(')') {
            rest = after;
            break;
        }
        let (param, after) = parse_field_type(rest).ok_or_else(|| invalid(desc))?;
        params.push(param);
        rest = after;
    }

    let (return_type, rest) = match rest.strip_prefix('V') {
        Some(after) => (RawType::Primitive(PrimitiveType::Void), after),
        None => parse_field_type(rest).ok_or_else(|| invalid(desc))?,
    };
    if !rest.is_empty() {
        return Err(invalid(desc));
    }

    Ok(MethodDescriptor {
        params,
        return_type,
    })
}

/// `java/util/Map$Entry` -> `java.util.Map$Entry`.
pub fn internal_to_binary(internal: &str) -> String {
    internal.replace('/', ".")
}

pub(crate) fn base_type(tag: u8) -> Option<PrimitiveType> {
    Some(match tag {
        b'B' => PrimitiveType::Byte,
        b'C' => PrimitiveType::Char,
        b'D' => PrimitiveType::Double,
        b'F' => PrimitiveType::Float,
        b'I' => PrimitiveType::Int,
        b'J' => PrimitiveType::Long,
        b'S' => PrimitiveType::Short,
        b'Z' => PrimitiveType::Boolean,
        _ => return None,
    })
}

fn parse_field_type(input: &str) -> Option<(RawType, &str)> {
    let tag = *input.as_bytes().first()?;
    if let Some(prim) = base_type(tag) {
        return Some((RawType::Primitive(prim), &input[1..]));
    }
    match tag {
        b'L' => {
            let end = input.find(';')?;
            let name = &input[1..end];
            if name.is_empty() {
                return None;
            }
            Some((RawType::class(internal_to_binary(name)), &input[end + 1..]))
        }
        b'[' => {
            let (component, rest) = parse_field_type(&input[1..])?;
            Some((RawType::array_of(component), rest))
        }
        _ => None,
    }
}

fn invalid(desc: &str) -> BridgeError {
    BridgeError::InvalidDescriptor(desc.to_string())
}
