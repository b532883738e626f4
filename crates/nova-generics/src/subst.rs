use std::collections::HashMap;

use crate::descriptor::TypeDescriptor;
use crate::env::ClassDecl;
use crate::name::ClassName;
use crate::shape::TypeVar;

/// Bindings for one class's own type parameters within a single instantiation.
///
/// Parameters the instantiation left unresolved (raw use) are simply absent; lookups fall back
/// to the unbounded default at resolution time.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SubstitutionMap {
    class: ClassName,
    params: Vec<TypeVar>,
    bindings: HashMap<TypeVar, TypeDescriptor>,
}

impl SubstitutionMap {
    /// A map for `class` with no declared parameters and no bindings.
    pub fn empty(class: ClassName) -> Self {
        Self {
            class,
            params: Vec::new(),
            bindings: HashMap::new(),
        }
    }

    /// Zip `decl`'s own type parameters with `arguments`, positionally.
    ///
    /// Extra arguments are ignored; missing ones leave the parameter unbound.
    pub fn from_arguments(decl: &ClassDecl, arguments: &[TypeDescriptor]) -> Self {
        let params: Vec<TypeVar> = decl.type_vars().cloned().collect();
        if !arguments.is_empty() && arguments.len() != params.len() {
            tracing::debug!(
                target: "nova.generics",
                class = %decl.name,
                expected = params.len(),
                found = arguments.len(),
                "type argument count does not match declared type parameters"
            );
        }
        let bindings = params
            .iter()
            .cloned()
            .zip(arguments.iter().cloned())
            .collect();
        Self {
            class: decl.name.clone(),
            params,
            bindings,
        }
    }

    /// Build a map from explicit bindings, e.g. for resolving a shape outside any hierarchy.
    pub fn from_bindings(
        class: ClassName,
        bindings: impl IntoIterator<Item = (TypeVar, TypeDescriptor)>,
    ) -> Self {
        let mut params = Vec::new();
        let mut map = HashMap::new();
        for (var, ty) in bindings {
            if !map.contains_key(&var) {
                params.push(var.clone());
            }
            map.insert(var, ty);
        }
        Self {
            class,
            params,
            bindings: map,
        }
    }

    pub fn class(&self) -> &ClassName {
        &self.class
    }

    pub fn get(&self, var: &TypeVar) -> Option<&TypeDescriptor> {
        self.bindings.get(var)
    }

    /// Declared parameters in declaration order, bound or not.
    pub fn params(&self) -> &[TypeVar] {
        &self.params
    }

    /// The instantiation's arguments in declaration order, defaulting unbound parameters.
    pub fn arguments(&self) -> Vec<TypeDescriptor> {
        self.params
            .iter()
            .map(|p| self.get(p).cloned().unwrap_or_else(TypeDescriptor::object))
            .collect()
    }

    /// True when every declared parameter is unbound (raw use, or a non-generic class).
    pub fn is_raw(&self) -> bool {
        self.bindings.is_empty()
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&TypeVar, &TypeDescriptor)> + '_ {
        self.params
            .iter()
            .filter_map(|p| self.bindings.get(p).map(|ty| (p, ty)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::TypeParamDecl;
    use crate::name::well_known;

    fn pair_decl() -> ClassDecl {
        ClassDecl {
            type_params: vec![
                TypeParamDecl::new(TypeVar::class("com.example.Pair", "A")),
                TypeParamDecl::new(TypeVar::class("com.example.Pair", "B")),
            ],
            ..ClassDecl::class("com.example.Pair")
        }
    }

    #[test]
    fn zips_arguments_positionally() {
        let string = TypeDescriptor::class(well_known::STRING, vec![]);
        let number = TypeDescriptor::class(well_known::NUMBER, vec![]);
        let map = SubstitutionMap::from_arguments(&pair_decl(), &[string.clone(), number.clone()]);

        assert_eq!(map.get(&TypeVar::class("com.example.Pair", "A")), Some(&string));
        assert_eq!(map.get(&TypeVar::class("com.example.Pair", "B")), Some(&number));
        assert_eq!(map.arguments(), vec![string, number]);
        assert!(!map.is_raw());
    }

    #[test]
    fn raw_instantiation_leaves_parameters_unbound() {
        let map = SubstitutionMap::from_arguments(&pair_decl(), &[]);
        assert!(map.is_raw());
        assert_eq!(map.params().len(), 2);
        assert_eq!(
            map.arguments(),
            vec![TypeDescriptor::object(), TypeDescriptor::object()]
        );
    }

    #[test]
    fn iteration_follows_declaration_order() {
        let string = TypeDescriptor::class(well_known::STRING, vec![]);
        let map = SubstitutionMap::from_arguments(&pair_decl(), &[string.clone()]);
        let bound: Vec<_> = map.iter().map(|(var, ty)| (var.name(), ty.clone())).collect();
        assert_eq!(bound, vec![("A", string)]);
    }
}
