//! Generic type resolution for Java-style class hierarchies.
//!
//! Given a concrete instantiation such as `ArrayList<String>`, this crate answers what a member
//! declared on some ancestor (`E List.get(int)`) looks like from that instantiation
//! (`String`). The pieces:
//!
//! - [`DeclaredShape`]: a member's type exactly as declared, type variables and all.
//! - [`TypeDescriptor`]: a fully resolved type.
//! - [`HierarchyMap`]: per-ancestor [`SubstitutionMap`]s for one instantiation, cached in a
//!   [`HierarchyCache`].
//! - [`GenericResolver`]: the entry point tying the above to a [`TypeEnv`].

#![forbid(unsafe_code)]

mod cache;
mod compat;
mod config;
mod descriptor;
mod env;
mod error;
mod facade;
mod hierarchy;
mod name;
mod resolve;
mod shape;
mod subst;

pub use cache::HierarchyCache;
pub use config::ResolverConfig;
pub use descriptor::{RawType, TypeDescriptor, WildcardBound};
pub use env::{
    ClassDecl, ClassKind, ClassTable, ConstructorDecl, FieldDecl, MethodDecl, MethodView,
    TypeEnv, TypeParamDecl,
};
pub use error::{ConfigError, ResolutionError, Result};
pub use facade::GenericResolver;
pub use hierarchy::HierarchyMap;
pub use name::{well_known, ClassName, PrimitiveType};
pub use resolve::{resolve_declared_shape, ShapeResolver};
pub use shape::{Annotation, DeclaredShape, GenericDeclaration, TypeVar, WildcardShape};
pub use subst::SubstitutionMap;
