//! Generic `Signature` attribute grammar (JVMS 4.7.9.1).

use nova_generics::PrimitiveType;

use crate::descriptor::{base_type, internal_to_binary};
use crate::error::{BridgeError, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeSignature {
    Base(PrimitiveType),
    Class(ClassTypeSignature),
    TypeVariable(String),
    Array(Box<TypeSignature>),
}

/// `Lpkg/Outer<TT;>.Inner<TU;>;`
///
/// Only the leaf segment's arguments are kept; the binary name joins segments with `$`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassTypeSignature {
    pub binary_name: String,
    pub type_arguments: Vec<TypeArgument>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeArgument {
    /// `*`
    Any,
    Exact(TypeSignature),
    Extends(TypeSignature),
    Super(TypeSignature),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeParameter {
    pub name: String,
    pub class_bound: Option<TypeSignature>,
    pub interface_bounds: Vec<TypeSignature>,
}

impl TypeParameter {
    /// Declared bounds in source order; empty means `extends Object`.
    pub fn bounds(&self) -> impl Iterator<Item = &TypeSignature> + '_ {
        self.class_bound.iter().chain(self.interface_bounds.iter())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassSignature {
    pub type_parameters: Vec<TypeParameter>,
    pub super_class: ClassTypeSignature,
    pub interfaces: Vec<ClassTypeSignature>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodSignature {
    pub type_parameters: Vec<TypeParameter>,
    pub parameters: Vec<TypeSignature>,
    /// `None` for `void`.
    pub return_type: Option<TypeSignature>,
    pub throws: Vec<TypeSignature>,
}

pub fn parse_class_signature(sig: &str) -> Result<ClassSignature> {
    let mut p = Parser::new(sig);
    let type_parameters = p.type_parameters()?;
    let super_class = p.class_type()?;
    let mut interfaces = Vec::new();
    while !p.at_end() {
        interfaces.push(p.class_type()?);
    }
    Ok(ClassSignature {
        type_parameters,
        super_class,
        interfaces,
    })
}

pub fn parse_field_signature(sig: &str) -> Result<TypeSignature> {
    let mut p = Parser::new(sig);
    let ty = p.reference_type()?;
    p.finish()?;
    Ok(ty)
}

pub fn parse_method_signature(sig: &str) -> Result<MethodSignature> {
    let mut p = Parser::new(sig);
    let type_parameters = p.type_parameters()?;

    p.expect(b'(')?;
    let mut parameters = Vec::new();
    while !p.eat(b')') {
        parameters.push(p.java_type()?);
    }

    let return_type = if p.eat(b'V') {
        None
    } else {
        Some(p.java_type()?)
    };

    let mut throws = Vec::new();
    while p.eat(b'^') {
        throws.push(p.reference_type()?);
    }
    p.finish()?;

    Ok(MethodSignature {
        type_parameters,
        parameters,
        return_type,
        throws,
    })
}

struct Parser<'s> {
    sig: &'s str,
    pos: usize,
}

impl<'s> Parser<'s> {
    fn new(sig: &'s str) -> Self {
        Self { sig, pos: 0 }
    }

    fn error(&self) -> BridgeError {
        BridgeError::InvalidSignature {
            signature: self.sig.to_string(),
            offset: self.pos,
        }
    }

    fn peek(&self) -> Option<u8> {
        self.sig.as_bytes().get(self.pos).copied()
    }

    fn at_end(&self) -> bool {
        self.pos >= self.sig.len()
    }

    fn eat(&mut self, byte: u8) -> bool {
        if self.peek() == Some(byte) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, byte: u8) -> Result<()> {
        if self.eat(byte) {
            Ok(())
        } else {
            Err(self.error())
        }
    }

    fn finish(&self) -> Result<()> {
        if self.at_end() {
            Ok(())
        } else {
            Err(self.error())
        }
    }

    /// Unqualified name: everything up to the next structural character.
    fn identifier(&mut self, stop_at_slash: bool) -> Result<&'s str> {
        let start = self.pos;
        while let Some(b) = self.peek() {
            let structural = matches!(b, b'.' | b';' | b'[' | b'<' | b'>' | b':')
                || (stop_at_slash && b == b'/');
            if structural {
                break;
            }
            self.pos += 1;
        }
        if self.pos == start {
            return Err(self.error());
        }
        Ok(&self.sig[start..self.pos])
    }

    fn type_parameters(&mut self) -> Result<Vec<TypeParameter>> {
        let mut out = Vec::new();
        if !self.eat(b'<') {
            return Ok(out);
        }
        loop {
            let name = self.identifier(true)?.to_string();
            self.expect(b':')?;
            let class_bound = match self.peek() {
                Some(b':' | b'>') | None => None,
                _ => Some(self.reference_type()?),
            };
            let mut interface_bounds = Vec::new();
            while self.eat(b':') {
                interface_bounds.push(self.reference_type()?);
            }
            out.push(TypeParameter {
                name,
                class_bound,
                interface_bounds,
            });
            if self.eat(b'>') {
                break;
            }
        }
        Ok(out)
    }

    fn java_type(&mut self) -> Result<TypeSignature> {
        if let Some(prim) = self.peek().and_then(base_type) {
            self.pos += 1;
            return Ok(TypeSignature::Base(prim));
        }
        self.reference_type()
    }

    fn reference_type(&mut self) -> Result<TypeSignature> {
        match self.peek() {
            Some(b'L') => Ok(TypeSignature::Class(self.class_type()?)),
            Some(b'T') => {
                self.pos += 1;
                let name = self.identifier(true)?.to_string();
                self.expect(b';')?;
                Ok(TypeSignature::TypeVariable(name))
            }
            Some(b'[') => {
                self.pos += 1;
                Ok(TypeSignature::Array(Box::new(self.java_type()?)))
            }
            _ => Err(self.error()),
        }
    }

    fn class_type(&mut self) -> Result<ClassTypeSignature> {
        self.expect(b'L')?;
        let mut internal = self.identifier(false)?.to_string();
        let mut type_arguments = self.type_arguments()?;
        while self.eat(b'.') {
            internal.push('$');
            internal.push_str(self.identifier(true)?);
            type_arguments = self.type_arguments()?;
        }
        self.expect(b';')?;
        Ok(ClassTypeSignature {
            binary_name: internal_to_binary(&internal),
            type_arguments,
        })
    }

    fn type_arguments(&mut self) -> Result<Vec<TypeArgument>> {
        let mut out = Vec::new();
        if !self.eat(b'<') {
            return Ok(out);
        }
        loop {
            let arg = match self.peek() {
                Some(b'*') => {
                    self.pos += 1;
                    TypeArgument::Any
                }
                Some(b'+') => {
                    self.pos += 1;
                    TypeArgument::Extends(self.reference_type()?)
                }
                Some(b'-') => {
                    self.pos += 1;
                    TypeArgument::Super(self.reference_type()?)
                }
                _ => TypeArgument::Exact(self.reference_type()?),
            };
            out.push(arg);
            if self.eat(b'>') {
                break;
            }
        }
        Ok(out)
    }
}
