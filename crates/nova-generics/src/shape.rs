use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::descriptor::RawType;
use crate::name::{ClassName, PrimitiveType};

/// The declaration a type variable belongs to.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GenericDeclaration {
    Class(ClassName),
    /// A generic method or constructor (`<init>`) declared on `class`.
    Method { class: ClassName, method: Arc<str> },
}

impl GenericDeclaration {
    pub fn class(&self) -> &ClassName {
        match self {
            GenericDeclaration::Class(class) => class,
            GenericDeclaration::Method { class, .. } => class,
        }
    }
}

/// Identity of a declared type variable: its owner plus its name.
///
/// Two variables named `T` on different classes (or on a class and one of its methods) are
/// distinct.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TypeVar {
    owner: GenericDeclaration,
    name: Arc<str>,
}

impl TypeVar {
    pub fn class(owner: impl Into<ClassName>, name: impl Into<Arc<str>>) -> Self {
        Self {
            owner: GenericDeclaration::Class(owner.into()),
            name: name.into(),
        }
    }

    pub fn method(
        class: impl Into<ClassName>,
        method: impl Into<Arc<str>>,
        name: impl Into<Arc<str>>,
    ) -> Self {
        Self {
            owner: GenericDeclaration::Method {
                class: class.into(),
                method: method.into(),
            },
            name: name.into(),
        }
    }

    pub fn owner(&self) -> &GenericDeclaration {
        &self.owner
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_class_level(&self) -> bool {
        matches!(self.owner, GenericDeclaration::Class(_))
    }
}

impl fmt::Display for TypeVar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// A type-use annotation. The engine only needs to see through it.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Annotation {
    pub name: ClassName,
}

impl Annotation {
    pub fn new(name: impl Into<ClassName>) -> Self {
        Self { name: name.into() }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WildcardShape {
    Unbounded,
    Extends(Box<DeclaredShape>),
    Super(Box<DeclaredShape>),
}

/// An unresolved type reference as written in a declaration.
///
/// This is the closed set of shapes reflective metadata can produce; annotated uses wrap any of
/// the others.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeclaredShape {
    /// A class, primitive, or array class used without type arguments.
    Raw(RawType),
    Parameterized {
        raw: ClassName,
        args: Vec<DeclaredShape>,
    },
    /// An array whose component mentions type variables or arguments (`T[]`, `List<String>[]`).
    GenericArray(Box<DeclaredShape>),
    TypeVar(TypeVar),
    Wildcard(WildcardShape),
    Annotated {
        annotations: Vec<Annotation>,
        shape: Box<DeclaredShape>,
    },
}

impl DeclaredShape {
    pub fn class(name: impl Into<ClassName>) -> Self {
        DeclaredShape::Raw(RawType::class(name))
    }

    pub fn primitive(prim: PrimitiveType) -> Self {
        DeclaredShape::Raw(RawType::Primitive(prim))
    }

    pub fn parameterized(raw: impl Into<ClassName>, args: Vec<DeclaredShape>) -> Self {
        DeclaredShape::Parameterized {
            raw: raw.into(),
            args,
        }
    }

    pub fn generic_array(component: DeclaredShape) -> Self {
        DeclaredShape::GenericArray(Box::new(component))
    }

    pub fn type_var(var: TypeVar) -> Self {
        DeclaredShape::TypeVar(var)
    }

    pub fn unbounded_wildcard() -> Self {
        DeclaredShape::Wildcard(WildcardShape::Unbounded)
    }

    pub fn wildcard_extends(bound: DeclaredShape) -> Self {
        DeclaredShape::Wildcard(WildcardShape::Extends(Box::new(bound)))
    }

    pub fn wildcard_super(bound: DeclaredShape) -> Self {
        DeclaredShape::Wildcard(WildcardShape::Super(Box::new(bound)))
    }

    pub fn annotated(annotations: Vec<Annotation>, shape: DeclaredShape) -> Self {
        DeclaredShape::Annotated {
            annotations,
            shape: Box::new(shape),
        }
    }

    /// Short, non-recursive label used in diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            DeclaredShape::Raw(_) => "raw",
            DeclaredShape::Parameterized { .. } => "parameterized",
            DeclaredShape::GenericArray(_) => "generic array",
            DeclaredShape::TypeVar(_) => "type variable",
            DeclaredShape::Wildcard(_) => "wildcard",
            DeclaredShape::Annotated { .. } => "annotated",
        }
    }

    /// Strip any number of annotation layers.
    pub fn unannotated(&self) -> &DeclaredShape {
        let mut shape = self;
        while let DeclaredShape::Annotated { shape: inner, .. } = shape {
            shape = inner;
        }
        shape
    }
}

impl fmt::Display for DeclaredShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeclaredShape::Raw(raw) => write!(f, "{raw}"),
            DeclaredShape::Parameterized { raw, args } => {
                write!(f, "{raw}<")?;
                for (idx, arg) in args.iter().enumerate() {
                    if idx > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{arg}")?;
                }
                f.write_str(">")
            }
            DeclaredShape::GenericArray(component) => write!(f, "{component}[]"),
            DeclaredShape::TypeVar(var) => write!(f, "{var}"),
            DeclaredShape::Wildcard(WildcardShape::Unbounded) => f.write_str("?"),
            DeclaredShape::Wildcard(WildcardShape::Extends(bound)) => {
                write!(f, "? extends {bound}")
            }
            DeclaredShape::Wildcard(WildcardShape::Super(bound)) => write!(f, "? super {bound}"),
            DeclaredShape::Annotated { annotations, shape } => {
                for annotation in annotations {
                    write!(f, "@{} ", annotation.name.simple_name())?;
                }
                write!(f, "{shape}")
            }
        }
    }
}
