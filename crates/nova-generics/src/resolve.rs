use crate::config::ResolverConfig;
use crate::descriptor::{RawType, TypeDescriptor, WildcardBound};
use crate::env::TypeEnv;
use crate::error::{ResolutionError, Result};
use crate::shape::{DeclaredShape, TypeVar, WildcardShape};
use crate::subst::SubstitutionMap;

/// Rewrites declared shapes into descriptors under one substitution map.
///
/// Resolution is a pure function of `(shape, substitution map)`; the environment is consulted
/// only to learn whether a class used without arguments is generic.
#[derive(Clone, Copy)]
pub struct ShapeResolver<'a> {
    env: &'a dyn TypeEnv,
    config: &'a ResolverConfig,
}

impl<'a> ShapeResolver<'a> {
    pub fn new(env: &'a dyn TypeEnv, config: &'a ResolverConfig) -> Self {
        Self { env, config }
    }

    pub fn resolve(
        &self,
        shape: &DeclaredShape,
        subst: &SubstitutionMap,
    ) -> Result<TypeDescriptor> {
        self.resolve_at(shape, subst, 0)
    }

    fn resolve_at(
        &self,
        shape: &DeclaredShape,
        subst: &SubstitutionMap,
        depth: usize,
    ) -> Result<TypeDescriptor> {
        if depth > self.config.max_shape_depth {
            return Err(ResolutionError::UnresolvableShape {
                kind: shape.kind_name(),
                limit: self.config.max_shape_depth,
            });
        }

        match shape {
            DeclaredShape::Raw(raw) => self.resolve_raw(raw, depth),
            DeclaredShape::GenericArray(component) => {
                let component = self.resolve_at(component, subst, depth + 1)?;
                Ok(TypeDescriptor::array_of(component))
            }
            DeclaredShape::Parameterized { raw, args } => {
                let args = args
                    .iter()
                    .map(|arg| self.resolve_at(arg, subst, depth + 1))
                    .collect::<Result<Vec<_>>>()?;
                Ok(TypeDescriptor::class(raw.clone(), args))
            }
            DeclaredShape::TypeVar(var) => Ok(self.resolve_type_var(var, subst)),
            DeclaredShape::Wildcard(WildcardShape::Unbounded) => {
                Ok(TypeDescriptor::unbounded_wildcard())
            }
            DeclaredShape::Wildcard(WildcardShape::Extends(bound)) => {
                let bound = self.resolve_at(bound, subst, depth + 1)?;
                Ok(TypeDescriptor::wildcard(WildcardBound::Upper, bound))
            }
            DeclaredShape::Wildcard(WildcardShape::Super(bound)) => {
                let bound = self.resolve_at(bound, subst, depth + 1)?;
                Ok(TypeDescriptor::wildcard(WildcardBound::Lower, bound))
            }
            // Annotations never affect the resolved type; nested annotated arguments are
            // unwrapped by the recursive calls.
            DeclaredShape::Annotated { shape, .. } => self.resolve_at(shape, subst, depth + 1),
        }
    }

    fn resolve_raw(&self, raw: &RawType, depth: usize) -> Result<TypeDescriptor> {
        if depth > self.config.max_shape_depth {
            return Err(ResolutionError::UnresolvableShape {
                kind: "raw",
                limit: self.config.max_shape_depth,
            });
        }

        match raw {
            RawType::Primitive(_) => Ok(TypeDescriptor::raw(raw.clone())),
            RawType::Array(component) => {
                let component = self.resolve_raw(component, depth + 1)?;
                Ok(TypeDescriptor::array_of(component))
            }
            RawType::Class(name) => {
                let Some(decl) = self.env.class(name.as_str()) else {
                    return Ok(TypeDescriptor::raw(raw.clone()));
                };
                if decl.type_params.is_empty() {
                    return Ok(TypeDescriptor::raw(raw.clone()));
                }
                // A generic class used raw: every own parameter takes the default, without the
                // per-variable log noise of the unbound type-variable path.
                let args = decl.type_params.iter().map(|_| TypeDescriptor::object()).collect();
                Ok(TypeDescriptor::class(name.clone(), args))
            }
        }
    }

    fn resolve_type_var(&self, var: &TypeVar, subst: &SubstitutionMap) -> TypeDescriptor {
        if let Some(bound) = subst.get(var) {
            return bound.clone();
        }

        // Method-level variables, and class variables of a raw instantiation, have no binding in
        // class context.
        if self.config.log_unresolved_type_vars {
            tracing::debug!(
                target: "nova.generics",
                var = %var,
                owner = ?var.owner(),
                scope = %subst.class(),
                "type variable has no substitution; defaulting to java.lang.Object"
            );
        }
        TypeDescriptor::object()
    }
}

/// Resolve `shape` under `subst` with the default configuration.
pub fn resolve_declared_shape(
    env: &dyn TypeEnv,
    shape: &DeclaredShape,
    subst: &SubstitutionMap,
) -> Result<TypeDescriptor> {
    let config = ResolverConfig::default();
    ShapeResolver::new(env, &config).resolve(shape, subst)
}
