use crate::descriptor::TypeDescriptor;
use crate::name::ClassName;

pub type Result<T> = std::result::Result<T, ResolutionError>;

/// Contract violations detected while resolving declared shapes.
///
/// Permissive cases (raw generic use, method-level type variables) never produce an error; they
/// resolve to the unbounded `java.lang.Object` default instead.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolutionError {
    #[error("cannot resolve {kind} shape: nesting exceeds {limit} levels")]
    UnresolvableShape { kind: &'static str, limit: usize },

    #[error("class {class} is not in the hierarchy of {instantiation}")]
    ClassNotInHierarchy {
        class: ClassName,
        instantiation: TypeDescriptor,
    },

    #[error("unknown class {class}")]
    UnknownClass { class: ClassName },

    #[error("{class} declares no member `{member}`")]
    UnknownMember { class: ClassName, member: String },
}

/// Errors produced while loading a [`crate::ResolverConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to parse resolver config: {0}")]
    Toml(#[from] toml::de::Error),
}
