use std::fmt;
use std::sync::Arc;

use crate::cache::HierarchyCache;
use crate::config::ResolverConfig;
use crate::descriptor::TypeDescriptor;
use crate::env::{ClassDecl, MethodView, TypeEnv};
use crate::error::{ResolutionError, Result};
use crate::hierarchy::HierarchyMap;
use crate::name::ClassName;
use crate::resolve::ShapeResolver;
use crate::shape::DeclaredShape;
use crate::subst::SubstitutionMap;

/// Entry point: resolve members declared on some class as seen from a concrete instantiation.
///
/// ```
/// use nova_generics::{ClassTable, GenericResolver, HierarchyCache, TypeDescriptor};
///
/// let env = ClassTable::with_minimal_jdk();
/// let cache = HierarchyCache::new();
/// let resolver = GenericResolver::new(&env, &cache);
///
/// let string = TypeDescriptor::class("java.lang.String", vec![]);
/// let list = TypeDescriptor::class("java.util.ArrayList", vec![string.clone()]);
/// let ret = resolver
///     .resolve_return_type("java.util.List", "get", 1, &list)
///     .unwrap();
/// assert_eq!(ret, string);
/// ```
pub struct GenericResolver<'a> {
    env: &'a dyn TypeEnv,
    cache: &'a HierarchyCache,
    config: ResolverConfig,
}

impl fmt::Debug for GenericResolver<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GenericResolver")
            .field("config", &self.config)
            .field("cached_hierarchies", &self.cache.len())
            .finish_non_exhaustive()
    }
}

impl<'a> GenericResolver<'a> {
    pub fn new(env: &'a dyn TypeEnv, cache: &'a HierarchyCache) -> Self {
        Self {
            env,
            cache,
            config: ResolverConfig::default(),
        }
    }

    /// A resolver backed by [`HierarchyCache::global`].
    pub fn with_global_cache(env: &'a dyn TypeEnv) -> Self {
        Self::new(env, HierarchyCache::global())
    }

    pub fn with_config(mut self, config: ResolverConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    pub fn env(&self) -> &'a dyn TypeEnv {
        self.env
    }

    pub fn cache(&self) -> &'a HierarchyCache {
        self.cache
    }

    /// Hierarchy map for `start`, built on first use and cached.
    pub fn hierarchy(&self, start: &TypeDescriptor) -> Result<Arc<HierarchyMap>> {
        self.cache.get_or_build(self.env, start, &self.config)
    }

    pub fn resolve_declared_shape(
        &self,
        shape: &DeclaredShape,
        subst: &SubstitutionMap,
    ) -> Result<TypeDescriptor> {
        ShapeResolver::new(self.env, &self.config).resolve(shape, subst)
    }

    /// Resolve `shape`, owned by `declaring`, within `instantiation`.
    ///
    /// Fails with [`ResolutionError::ClassNotInHierarchy`] if `declaring` is not an ancestor of
    /// (or equal to) the instantiation's class.
    pub fn resolve_member_shape(
        &self,
        declaring: &str,
        shape: &DeclaredShape,
        instantiation: &TypeDescriptor,
    ) -> Result<TypeDescriptor> {
        let hierarchy = self.hierarchy(instantiation)?;
        let subst = hierarchy.substitution_map(declaring)?;
        self.resolve_declared_shape(shape, subst)
    }

    pub fn resolve_field(
        &self,
        declaring: &str,
        field: &str,
        instantiation: &TypeDescriptor,
    ) -> Result<TypeDescriptor> {
        let decl = self.declaration(declaring)?;
        let field = decl
            .field(field)
            .ok_or_else(|| unknown_member(declaring, field))?;
        self.resolve_member_shape(declaring, &field.shape, instantiation)
    }

    /// Resolve parameter `index` of `method`/`arity` (`<init>` for constructors).
    pub fn resolve_parameter(
        &self,
        declaring: &str,
        method: &str,
        arity: usize,
        index: usize,
        instantiation: &TypeDescriptor,
    ) -> Result<TypeDescriptor> {
        let decl = self.declaration(declaring)?;
        let view = lookup_method(decl, declaring, method, arity)?;
        let shape = view
            .params()
            .get(index)
            .ok_or_else(|| unknown_member(declaring, &format!("{method}/{arity}#{index}")))?;
        self.resolve_member_shape(declaring, shape, instantiation)
    }

    pub fn resolve_parameters(
        &self,
        declaring: &str,
        method: &str,
        arity: usize,
        instantiation: &TypeDescriptor,
    ) -> Result<Vec<TypeDescriptor>> {
        let decl = self.declaration(declaring)?;
        let view = lookup_method(decl, declaring, method, arity)?;
        let hierarchy = self.hierarchy(instantiation)?;
        let subst = hierarchy.substitution_map(declaring)?;
        view.params()
            .iter()
            .map(|shape| self.resolve_declared_shape(shape, subst))
            .collect()
    }

    pub fn resolve_return_type(
        &self,
        declaring: &str,
        method: &str,
        arity: usize,
        instantiation: &TypeDescriptor,
    ) -> Result<TypeDescriptor> {
        let decl = self.declaration(declaring)?;
        let view = lookup_method(decl, declaring, method, arity)?;
        self.resolve_member_shape(declaring, &view.return_shape(), instantiation)
    }

    /// `instantiation` viewed as its ancestor `ancestor` (`HashMap<K, V>` as `Map` is
    /// `Map<K, V>`).
    pub fn resolve_supertype(
        &self,
        instantiation: &TypeDescriptor,
        ancestor: &str,
    ) -> Result<TypeDescriptor> {
        let hierarchy = self.hierarchy(instantiation)?;
        hierarchy
            .view_as(ancestor)
            .ok_or_else(|| ResolutionError::ClassNotInHierarchy {
                class: ClassName::new(ancestor),
                instantiation: instantiation.clone(),
            })
    }

    fn declaration(&self, class: &str) -> Result<&'a ClassDecl> {
        self.env
            .class(class)
            .ok_or_else(|| ResolutionError::UnknownClass {
                class: ClassName::new(class),
            })
    }
}

fn lookup_method<'d>(
    decl: &'d ClassDecl,
    declaring: &str,
    method: &str,
    arity: usize,
) -> Result<MethodView<'d>> {
    decl.method(method, arity)
        .ok_or_else(|| unknown_member(declaring, &format!("{method}/{arity}")))
}

fn unknown_member(class: &str, member: &str) -> ResolutionError {
    ResolutionError::UnknownMember {
        class: ClassName::new(class),
        member: member.to_string(),
    }
}
