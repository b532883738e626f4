use std::collections::{HashMap, VecDeque};

use crate::config::ResolverConfig;
use crate::descriptor::{RawType, TypeDescriptor};
use crate::env::TypeEnv;
use crate::error::{ResolutionError, Result};
use crate::name::{well_known, ClassName};
use crate::resolve::ShapeResolver;
use crate::subst::SubstitutionMap;

/// Substitution maps for every ancestor of one concrete instantiation.
///
/// Includes the starting class itself. Ancestors are recorded in breadth-first discovery order,
/// superclass before interfaces.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HierarchyMap {
    root: TypeDescriptor,
    order: Vec<ClassName>,
    maps: HashMap<ClassName, SubstitutionMap>,
}

impl HierarchyMap {
    /// Walk `start`'s supertype graph, resolving each ancestor's generic supertype declarations
    /// against the substitutions already known for its subclass.
    pub fn build(
        env: &dyn TypeEnv,
        start: &TypeDescriptor,
        config: &ResolverConfig,
    ) -> Result<Self> {
        let mut out = Self {
            root: start.clone(),
            order: Vec::new(),
            maps: HashMap::new(),
        };

        // A wildcard instantiation is viewed through its bound.
        let start = start.without_wildcard();
        match start.base() {
            RawType::Primitive(_) => return Ok(out),
            RawType::Array(_) => {
                // JLS 4.10.3: arrays are Objects that are Cloneable and Serializable.
                for name in [
                    well_known::OBJECT,
                    well_known::CLONEABLE,
                    well_known::SERIALIZABLE,
                ] {
                    out.insert(SubstitutionMap::empty(ClassName::new(name)));
                }
                return Ok(out);
            }
            RawType::Class(_) => {}
        }

        let resolver = ShapeResolver::new(env, config);
        let mut queue: VecDeque<TypeDescriptor> = VecDeque::new();
        queue.push_back(start);

        while let Some(current) = queue.pop_front() {
            let Some(class) = current.base().as_class() else {
                continue;
            };
            // First resolution wins: a class's bindings depend only on the declarations below
            // it, which are the same along every path.
            if out.maps.contains_key(class) {
                continue;
            }

            let Some(decl) = env.class(class.as_str()) else {
                tracing::debug!(
                    target: "nova.generics",
                    class = %class,
                    root = %out.root,
                    "class declaration not found; treating it as a hierarchy leaf"
                );
                out.insert(SubstitutionMap::empty(class.clone()));
                continue;
            };

            let subst = SubstitutionMap::from_arguments(decl, current.arguments());
            for supertype in decl.supertypes() {
                let resolved = resolver.resolve(supertype, &subst)?;
                if resolved.base().as_class().is_some() {
                    queue.push_back(resolved);
                }
            }
            out.insert(subst);
        }

        tracing::trace!(
            target: "nova.generics",
            root = %out.root,
            ancestors = out.order.len(),
            "built hierarchy map"
        );
        Ok(out)
    }

    fn insert(&mut self, subst: SubstitutionMap) {
        self.order.push(subst.class().clone());
        self.maps.insert(subst.class().clone(), subst);
    }

    /// The instantiation this hierarchy was built for.
    pub fn root(&self) -> &TypeDescriptor {
        &self.root
    }

    pub fn get(&self, class: &str) -> Option<&SubstitutionMap> {
        self.maps.get(class)
    }

    /// Substitution map for `class`, which must be an ancestor of (or equal to) the root.
    pub fn substitution_map(&self, class: &str) -> Result<&SubstitutionMap> {
        self.maps
            .get(class)
            .ok_or_else(|| ResolutionError::ClassNotInHierarchy {
                class: ClassName::new(class),
                instantiation: self.root.clone(),
            })
    }

    pub fn contains(&self, class: &str) -> bool {
        self.maps.contains_key(class)
    }

    /// Ancestors in discovery order, starting with the root class.
    pub fn classes(&self) -> impl Iterator<Item = &ClassName> + '_ {
        self.order.iter()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// The root viewed as its ancestor `class` (`ArrayList<String>` as `List` is `List<String>`).
    pub fn view_as(&self, class: &str) -> Option<TypeDescriptor> {
        let subst = self.maps.get(class)?;
        Some(TypeDescriptor::class(subst.class().clone(), subst.arguments()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::{ClassDecl, ClassTable, TypeParamDecl};
    use crate::name::PrimitiveType;
    use crate::shape::{DeclaredShape, TypeVar};

    use pretty_assertions::assert_eq;

    fn string() -> TypeDescriptor {
        TypeDescriptor::class(well_known::STRING, vec![])
    }

    fn build(env: &ClassTable, start: &TypeDescriptor) -> HierarchyMap {
        HierarchyMap::build(env, start, &ResolverConfig::default()).unwrap()
    }

    #[test]
    fn bindings_flow_up_through_superclasses_and_interfaces() {
        let env = ClassTable::with_minimal_jdk();
        let start = TypeDescriptor::class("java.util.ArrayList", vec![string()]);
        let hierarchy = build(&env, &start);

        for ancestor in [
            "java.util.ArrayList",
            "java.util.AbstractList",
            "java.util.AbstractCollection",
            "java.util.List",
            "java.util.Collection",
            "java.lang.Iterable",
        ] {
            assert_eq!(
                hierarchy.get(ancestor).unwrap().arguments(),
                vec![string()],
                "{ancestor}"
            );
        }
        assert!(hierarchy.contains(well_known::OBJECT));
        assert!(hierarchy.contains(well_known::CLONEABLE));
        assert_eq!(hierarchy.classes().next().unwrap().as_str(), "java.util.ArrayList");
    }

    #[test]
    fn each_ancestor_is_visited_once() {
        let env = ClassTable::with_minimal_jdk();
        let start = TypeDescriptor::class("java.util.ArrayList", vec![string()]);
        let hierarchy = build(&env, &start);

        let mut names: Vec<_> = hierarchy.classes().map(|c| c.as_str()).collect();
        let total = names.len();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), total);
        assert_eq!(hierarchy.len(), total);
    }

    #[test]
    fn raw_start_leaves_root_unbound_but_still_walks_supertypes() {
        let env = ClassTable::with_minimal_jdk();
        let start = TypeDescriptor::class("java.util.ArrayList", vec![]);
        let hierarchy = build(&env, &start);

        assert!(hierarchy.get("java.util.ArrayList").unwrap().is_raw());
        // Supertypes see the root's variables through the default path.
        assert_eq!(
            hierarchy.view_as("java.util.List"),
            Some(TypeDescriptor::class(
                "java.util.List",
                vec![TypeDescriptor::object()]
            ))
        );
    }

    #[test]
    fn supertype_arguments_may_nest_the_subclass_variable() {
        // class D<T> implements List<T[]>
        let mut env = ClassTable::with_minimal_jdk();
        let t = TypeVar::class("com.example.D", "T");
        env.define_class(ClassDecl {
            type_params: vec![TypeParamDecl::new(t.clone())],
            interfaces: vec![DeclaredShape::parameterized(
                "java.util.List",
                vec![DeclaredShape::generic_array(DeclaredShape::type_var(t))],
            )],
            ..ClassDecl::class("com.example.D")
        });

        let integer = TypeDescriptor::class("java.lang.Integer", vec![]);
        let hierarchy = build(
            &env,
            &TypeDescriptor::class("com.example.D", vec![integer.clone()]),
        );
        assert_eq!(
            hierarchy.view_as("java.util.Collection"),
            Some(TypeDescriptor::class(
                "java.util.Collection",
                vec![TypeDescriptor::array_of(integer)]
            ))
        );
    }

    #[test]
    fn unknown_ancestors_become_leaves() {
        let mut env = ClassTable::new();
        env.define_class(ClassDecl {
            super_class: Some(DeclaredShape::class("com.example.Missing")),
            ..ClassDecl::class("com.example.Child")
        });

        let hierarchy = build(&env, &TypeDescriptor::class("com.example.Child", vec![]));
        let names: Vec<_> = hierarchy.classes().map(|c| c.as_str()).collect();
        assert_eq!(names, vec!["com.example.Child", "com.example.Missing"]);
    }

    #[test]
    fn arrays_and_primitives_have_fixed_hierarchies() {
        let env = ClassTable::with_minimal_jdk();

        let ints = TypeDescriptor::array_of(TypeDescriptor::primitive(PrimitiveType::Int));
        let hierarchy = build(&env, &ints);
        let names: Vec<_> = hierarchy.classes().map(|c| c.as_str()).collect();
        assert_eq!(
            names,
            vec![
                well_known::OBJECT,
                well_known::CLONEABLE,
                well_known::SERIALIZABLE
            ]
        );

        let int = TypeDescriptor::primitive(PrimitiveType::Int);
        assert!(build(&env, &int).is_empty());
    }

    #[test]
    fn missing_ancestor_reports_class_not_in_hierarchy() {
        let env = ClassTable::with_minimal_jdk();
        let hierarchy = build(&env, &string());
        let err = hierarchy.substitution_map("java.util.List").unwrap_err();
        assert_eq!(
            err,
            ResolutionError::ClassNotInHierarchy {
                class: ClassName::new("java.util.List"),
                instantiation: string(),
            }
        );
    }
}
