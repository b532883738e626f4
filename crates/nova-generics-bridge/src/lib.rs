//! Populate a [`nova_generics::ClassTable`] from class-file metadata.
//!
//! Each class is described by a [`ClassStub`]: binary names, access flags, erased descriptors,
//! and the optional generic `Signature` attribute strings. [`SignatureLoader`] turns stubs into
//! declarations the resolver understands.

#![forbid(unsafe_code)]

mod descriptor;
mod error;
mod loader;
mod signature;
mod stub;

pub use descriptor::{
    internal_to_binary, parse_field_descriptor, parse_method_descriptor, MethodDescriptor,
};
pub use error::{BridgeError, Result};
pub use loader::{class_decl, SignatureLoader};
pub use signature::{
    parse_class_signature, parse_field_signature, parse_method_signature, ClassSignature,
    ClassTypeSignature, MethodSignature, TypeArgument, TypeParameter, TypeSignature,
};
pub use stub::{ClassStub, FieldStub, MethodStub};
