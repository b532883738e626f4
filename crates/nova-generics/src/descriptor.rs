use std::fmt;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use crate::name::{well_known, ClassName, PrimitiveType};

/// Erased runtime type: what a `Class<?>` object would denote.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RawType {
    Primitive(PrimitiveType),
    Class(ClassName),
    Array(Box<RawType>),
}

impl RawType {
    pub fn class(name: impl Into<ClassName>) -> Self {
        RawType::Class(name.into())
    }

    pub fn array_of(component: RawType) -> Self {
        RawType::Array(Box::new(component))
    }

    pub fn as_class(&self) -> Option<&ClassName> {
        match self {
            RawType::Class(name) => Some(name),
            _ => None,
        }
    }

    pub fn component(&self) -> Option<&RawType> {
        match self {
            RawType::Array(component) => Some(component),
            _ => None,
        }
    }

    pub fn is_primitive(&self) -> bool {
        matches!(self, RawType::Primitive(_))
    }

    pub fn is_array(&self) -> bool {
        matches!(self, RawType::Array(_))
    }

    pub fn is_object(&self) -> bool {
        matches!(self, RawType::Class(name) if name.is_object())
    }

    /// Replace a top-level primitive with its wrapper class; everything else is returned as-is.
    ///
    /// `int[]` stays `int[]`: boxing never applies below the leaf.
    pub fn boxed(&self) -> RawType {
        match self {
            RawType::Primitive(prim) => RawType::class(prim.boxed_class()),
            other => other.clone(),
        }
    }
}

impl fmt::Display for RawType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawType::Primitive(prim) => write!(f, "{prim}"),
            RawType::Class(name) => write!(f, "{name}"),
            RawType::Array(component) => write!(f, "{component}[]"),
        }
    }
}

/// Variance marker carried by descriptors that stand for a wildcard argument.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WildcardBound {
    /// Not a wildcard.
    #[default]
    None,
    /// `? extends B`
    Upper,
    /// `? super B`
    Lower,
}

/// A fully resolved type: an erased base plus resolved type arguments.
///
/// Descriptors are immutable values; equality and hashing are deep and order-sensitive, which is
/// what lets them key the hierarchy cache.
///
/// A wildcard descriptor reuses its bound's `base` and `arguments` and tags them with
/// [`WildcardBound::Upper`] or [`WildcardBound::Lower`]. The unbounded wildcard is `? extends
/// Object`.
///
/// Arrays are kept in a canonical form: `base` is the full array type, and `arguments` is empty
/// unless the component carries arguments of its own (or is a wildcard), in which case it is
/// exactly `[component]`.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TypeDescriptor {
    base: RawType,
    arguments: Vec<TypeDescriptor>,
    wildcard: WildcardBound,
}

impl TypeDescriptor {
    pub fn new(base: RawType, arguments: Vec<TypeDescriptor>) -> Self {
        Self {
            base,
            arguments,
            wildcard: WildcardBound::None,
        }
    }

    pub fn raw(base: RawType) -> Self {
        Self::new(base, Vec::new())
    }

    pub fn class(name: impl Into<ClassName>, arguments: Vec<TypeDescriptor>) -> Self {
        Self::new(RawType::Class(name.into()), arguments)
    }

    pub fn primitive(prim: PrimitiveType) -> Self {
        Self::raw(RawType::Primitive(prim))
    }

    /// The unbounded default: `java.lang.Object` with no arguments.
    pub fn object() -> Self {
        static OBJECT: OnceLock<TypeDescriptor> = OnceLock::new();
        OBJECT
            .get_or_init(|| TypeDescriptor::class(well_known::OBJECT, Vec::new()))
            .clone()
    }

    /// `?`, represented as `? extends Object`.
    pub fn unbounded_wildcard() -> Self {
        static WILDCARD: OnceLock<TypeDescriptor> = OnceLock::new();
        WILDCARD
            .get_or_init(|| {
                TypeDescriptor::wildcard(WildcardBound::Upper, TypeDescriptor::object())
            })
            .clone()
    }

    /// Tag `bound` as a wildcard bound. Passing [`WildcardBound::None`] just returns the bound.
    pub fn wildcard(kind: WildcardBound, bound: TypeDescriptor) -> Self {
        Self {
            wildcard: kind,
            ..bound
        }
    }

    pub fn array_of(component: TypeDescriptor) -> Self {
        let base = RawType::array_of(component.base.clone());
        if component.arguments.is_empty() && !component.is_wildcard() {
            Self::raw(base)
        } else {
            Self::new(base, vec![component])
        }
    }

    pub fn base(&self) -> &RawType {
        &self.base
    }

    pub fn arguments(&self) -> &[TypeDescriptor] {
        &self.arguments
    }

    pub fn wildcard_bound(&self) -> WildcardBound {
        self.wildcard
    }

    pub fn is_wildcard(&self) -> bool {
        self.wildcard != WildcardBound::None
    }

    pub fn is_array(&self) -> bool {
        self.base.is_array()
    }

    pub fn is_primitive(&self) -> bool {
        self.base.is_primitive()
    }

    pub fn is_unbounded_object(&self) -> bool {
        self.base.is_object() && self.arguments.is_empty() && !self.is_wildcard()
    }

    pub fn is_unbounded_wildcard(&self) -> bool {
        self.base.is_object() && self.arguments.is_empty() && self.wildcard == WildcardBound::Upper
    }

    /// Component descriptor of an array, rebuilt from the base when no argument was recorded.
    pub fn component(&self) -> Option<TypeDescriptor> {
        let component = self.base.component()?;
        if let Some(arg) = self.arguments.first() {
            return Some(arg.clone());
        }
        Some(TypeDescriptor::raw(component.clone()))
    }

    /// The same descriptor with the wildcard tag dropped (the bound itself).
    pub fn without_wildcard(&self) -> TypeDescriptor {
        Self {
            base: self.base.clone(),
            arguments: self.arguments.clone(),
            wildcard: WildcardBound::None,
        }
    }

    pub fn erasure(&self) -> TypeDescriptor {
        TypeDescriptor::raw(self.base.clone())
    }

    /// Boxed view of a primitive leaf (`int` -> `java.lang.Integer`).
    pub fn boxed(&self) -> TypeDescriptor {
        match self.base {
            RawType::Primitive(_) => Self {
                base: self.base.boxed(),
                arguments: Vec::new(),
                wildcard: self.wildcard,
            },
            _ => self.clone(),
        }
    }

    fn fmt_unwildcarded(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.base.is_array() {
            if let Some(component) = self.arguments.first() {
                return write!(f, "{component}[]");
            }
            return write!(f, "{}", self.base);
        }

        write!(f, "{}", self.base)?;
        if self.arguments.is_empty() {
            return Ok(());
        }
        f.write_str("<")?;
        for (idx, arg) in self.arguments.iter().enumerate() {
            if idx > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{arg}")?;
        }
        f.write_str(">")
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.wildcard {
            WildcardBound::None => self.fmt_unwildcarded(f),
            WildcardBound::Upper if self.is_unbounded_wildcard() => f.write_str("?"),
            WildcardBound::Upper => {
                f.write_str("? extends ")?;
                self.fmt_unwildcarded(f)
            }
            WildcardBound::Lower => {
                f.write_str("? super ")?;
                self.fmt_unwildcarded(f)
            }
        }
    }
}

impl fmt::Debug for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeDescriptor({self})")
    }
}
