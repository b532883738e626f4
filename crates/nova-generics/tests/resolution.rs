use std::sync::Arc;

use nova_generics::{
    well_known, ClassDecl, ClassName, ClassTable, DeclaredShape, FieldDecl, GenericResolver,
    HierarchyCache, MethodDecl, PrimitiveType, RawType, ResolutionError, ResolverConfig,
    SubstitutionMap, TypeDescriptor, TypeParamDecl, TypeVar, WildcardBound,
};

use pretty_assertions::assert_eq;

fn class(name: &str) -> TypeDescriptor {
    TypeDescriptor::class(name, vec![])
}

fn string() -> TypeDescriptor {
    class(well_known::STRING)
}

fn integer() -> TypeDescriptor {
    class("java.lang.Integer")
}

/// ```java
/// class C<T> { T value; }
/// class D<T> implements List<T> { T[] items; <M> M pick(T[] from); }
/// ```
fn env() -> ClassTable {
    let mut env = ClassTable::with_minimal_jdk();

    let c_t = TypeVar::class("com.example.C", "T");
    env.define_class(ClassDecl {
        type_params: vec![TypeParamDecl::new(c_t.clone())],
        fields: vec![FieldDecl::new("value", DeclaredShape::type_var(c_t))],
        ..ClassDecl::class("com.example.C")
    });

    let d_t = TypeVar::class("com.example.D", "T");
    let d_m = TypeVar::method("com.example.D", "pick", "M");
    let t_array = DeclaredShape::generic_array(DeclaredShape::type_var(d_t.clone()));
    env.define_class(ClassDecl {
        type_params: vec![TypeParamDecl::new(d_t.clone())],
        interfaces: vec![DeclaredShape::parameterized(
            "java.util.List",
            vec![DeclaredShape::type_var(d_t)],
        )],
        fields: vec![FieldDecl::new("items", t_array.clone())],
        methods: vec![MethodDecl {
            type_params: vec![TypeParamDecl::new(d_m.clone())],
            ..MethodDecl::new("pick", vec![t_array], DeclaredShape::type_var(d_m))
        }],
        ..ClassDecl::class("com.example.D")
    });

    env
}

#[test]
fn field_of_type_variable_resolves_to_the_argument() {
    let env = env();
    let cache = HierarchyCache::new();
    let resolver = GenericResolver::new(&env, &cache);

    let c_string = TypeDescriptor::class("com.example.C", vec![string()]);
    assert_eq!(
        resolver.resolve_field("com.example.C", "value", &c_string).unwrap(),
        string()
    );
}

#[test]
fn generic_array_of_type_variable_resolves_to_array_of_argument() {
    let env = env();
    let cache = HierarchyCache::new();
    let resolver = GenericResolver::new(&env, &cache);

    let d_integer = TypeDescriptor::class("com.example.D", vec![integer()]);
    let resolved = resolver.resolve_field("com.example.D", "items", &d_integer).unwrap();
    assert_eq!(resolved, TypeDescriptor::array_of(integer()));
    assert_eq!(
        resolved.base(),
        &RawType::array_of(RawType::class("java.lang.Integer"))
    );
    assert_eq!(
        resolver
            .resolve_parameter("com.example.D", "pick", 1, 0, &d_integer)
            .unwrap(),
        resolved
    );
}

#[test]
fn raw_instantiation_defaults_every_class_variable() {
    let env = env();
    let cache = HierarchyCache::new();
    let resolver = GenericResolver::new(&env, &cache);

    let raw_c = class("com.example.C");
    assert_eq!(
        resolver.resolve_field("com.example.C", "value", &raw_c).unwrap(),
        TypeDescriptor::object()
    );

    let raw_map = class("java.util.HashMap");
    assert_eq!(
        resolver.resolve_supertype(&raw_map, "java.util.Map").unwrap(),
        TypeDescriptor::class(
            "java.util.Map",
            vec![TypeDescriptor::object(), TypeDescriptor::object()]
        )
    );
}

#[test]
fn method_type_variable_defaults_without_error() {
    let env = env();
    let cache = HierarchyCache::new();
    let resolver = GenericResolver::new(&env, &cache);

    let d_string = TypeDescriptor::class("com.example.D", vec![string()]);
    assert_eq!(
        resolver
            .resolve_return_type("com.example.D", "pick", 1, &d_string)
            .unwrap(),
        TypeDescriptor::object()
    );
}

#[test]
fn inherited_members_resolve_through_the_hierarchy() {
    let env = env();
    let cache = HierarchyCache::new();
    let resolver = GenericResolver::new(&env, &cache);

    let d_string = TypeDescriptor::class("com.example.D", vec![string()]);
    assert_eq!(
        resolver
            .resolve_return_type("java.util.List", "get", 1, &d_string)
            .unwrap(),
        string()
    );
    assert_eq!(
        resolver
            .resolve_parameters("java.util.Collection", "add", 1, &d_string)
            .unwrap(),
        vec![string()]
    );
    assert_eq!(
        resolver
            .resolve_return_type("java.lang.Iterable", "iterator", 0, &d_string)
            .unwrap(),
        TypeDescriptor::class("java.util.Iterator", vec![string()])
    );

    let map = TypeDescriptor::class("java.util.HashMap", vec![string(), integer()]);
    assert_eq!(
        resolver
            .resolve_return_type("java.util.Map", "get", 1, &map)
            .unwrap(),
        integer()
    );
}

#[test]
fn wildcard_arguments_flow_into_member_types() {
    let env = env();
    let cache = HierarchyCache::new();
    let resolver = GenericResolver::new(&env, &cache);

    let extends_number = TypeDescriptor::wildcard(WildcardBound::Upper, class(well_known::NUMBER));
    let list = TypeDescriptor::class("java.util.ArrayList", vec![extends_number.clone()]);
    let got = resolver
        .resolve_return_type("java.util.List", "get", 1, &list)
        .unwrap();
    assert_eq!(got, extends_number);
    assert_eq!(got.to_string(), "? extends java.lang.Number");
}

#[test]
fn compatibility_properties() {
    let env = env();
    let cache = HierarchyCache::new();
    let resolver = GenericResolver::new(&env, &cache);
    let list = |arg| TypeDescriptor::class("java.util.List", vec![arg]);

    for producer in [
        string(),
        TypeDescriptor::primitive(PrimitiveType::Double),
        TypeDescriptor::array_of(integer()),
        TypeDescriptor::class("com.example.D", vec![string()]),
    ] {
        assert!(resolver.is_assignable(&TypeDescriptor::object(), &producer));
    }

    let raw_list = class("java.util.List");
    let method_var_list = list(TypeDescriptor::object());
    assert!(resolver.is_assignable(&raw_list, &list(string())));
    assert!(resolver.is_assignable(&raw_list, &method_var_list));

    let number = class(well_known::NUMBER);
    assert!(resolver.is_assignable(
        &list(TypeDescriptor::wildcard(WildcardBound::Upper, number.clone())),
        &list(integer())
    ));
    assert!(resolver.is_assignable(
        &list(TypeDescriptor::wildcard(WildcardBound::Lower, integer())),
        &list(number.clone())
    ));
    assert!(!resolver.is_assignable(
        &list(TypeDescriptor::wildcard(WildcardBound::Upper, number)),
        &list(string())
    ));

    // A user subclass is viewed through the consumer's class.
    assert!(resolver.is_assignable(
        &list(TypeDescriptor::unbounded_wildcard()),
        &TypeDescriptor::class("com.example.D", vec![string()])
    ));
}

#[test]
fn equal_instantiations_share_one_cached_hierarchy() {
    let env = env();
    let cache = HierarchyCache::new();
    let resolver = GenericResolver::new(&env, &cache);

    let first = resolver
        .hierarchy(&TypeDescriptor::class("java.util.ArrayList", vec![string()]))
        .unwrap();
    let second = resolver
        .hierarchy(&TypeDescriptor::class("java.util.ArrayList", vec![string()]))
        .unwrap();
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(cache.build_count(), 1);

    let other = resolver
        .hierarchy(&TypeDescriptor::class("java.util.ArrayList", vec![integer()]))
        .unwrap();
    assert!(!Arc::ptr_eq(&first, &other));
    assert_eq!(cache.build_count(), 2);
    assert_eq!(cache.len(), 2);
    assert_eq!(
        first.view_as("java.util.List"),
        Some(TypeDescriptor::class("java.util.List", vec![string()]))
    );
    assert_eq!(
        other.view_as("java.util.List"),
        Some(TypeDescriptor::class("java.util.List", vec![integer()]))
    );
}

#[test]
fn non_generic_shapes_round_trip() {
    let env = env();
    let cache = HierarchyCache::new();
    let resolver = GenericResolver::new(&env, &cache);
    let subst = SubstitutionMap::empty(ClassName::new("com.example.C"));

    for raw in [
        RawType::Primitive(PrimitiveType::Boolean),
        RawType::class(well_known::STRING),
        RawType::array_of(RawType::Primitive(PrimitiveType::Char)),
        RawType::array_of(RawType::class("com.example.Unknown")),
    ] {
        let resolved = resolver
            .resolve_declared_shape(&DeclaredShape::Raw(raw.clone()), &subst)
            .unwrap();
        assert_eq!(resolved.base(), &raw);
        assert!(resolved.arguments().is_empty());
    }
}

#[test]
fn facade_reports_contract_violations() {
    let env = env();
    let cache = HierarchyCache::new();
    let resolver = GenericResolver::new(&env, &cache);
    let c_string = TypeDescriptor::class("com.example.C", vec![string()]);

    assert_eq!(
        resolver
            .resolve_field("java.util.List", "size", &c_string)
            .unwrap_err(),
        ResolutionError::UnknownMember {
            class: ClassName::new("java.util.List"),
            member: "size".to_string(),
        }
    );

    let field = DeclaredShape::type_var(TypeVar::class("com.example.D", "T"));
    let err = resolver
        .resolve_member_shape("com.example.D", &field, &c_string)
        .unwrap_err();
    assert_eq!(
        err,
        ResolutionError::ClassNotInHierarchy {
            class: ClassName::new("com.example.D"),
            instantiation: c_string.clone(),
        }
    );
    assert_eq!(
        err.to_string(),
        "class com.example.D is not in the hierarchy of com.example.C<java.lang.String>"
    );

    assert!(matches!(
        resolver.resolve_field("com.example.Nope", "value", &c_string),
        Err(ResolutionError::UnknownClass { .. })
    ));
    assert!(matches!(
        resolver.resolve_parameter("com.example.D", "pick", 1, 3, &c_string),
        Err(ResolutionError::UnknownMember { .. })
    ));
    assert!(matches!(
        resolver.resolve_supertype(&c_string, "java.util.List"),
        Err(ResolutionError::ClassNotInHierarchy { .. })
    ));
}

#[test]
fn config_loads_from_toml_and_controls_boxing() {
    let env = env();
    let cache = HierarchyCache::new();
    let config = ResolverConfig::from_toml_str(
        r#"
        boxing = false
        max_shape_depth = 16
        "#,
    )
    .unwrap();
    assert!(config.log_unresolved_type_vars);

    let strict = GenericResolver::new(&env, &cache).with_config(config);
    let lenient = GenericResolver::new(&env, &cache);
    let int = TypeDescriptor::primitive(PrimitiveType::Int);

    assert!(lenient.is_assignable(&integer(), &int));
    assert!(!strict.is_assignable(&integer(), &int));
}
