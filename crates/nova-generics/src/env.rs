use std::collections::HashMap;
use std::sync::Arc;

use crate::name::{well_known, ClassName, PrimitiveType};
use crate::shape::{DeclaredShape, TypeVar};

/// Read-only access to declared class metadata.
///
/// This is the engine's only view of the program: own type parameters, generic supertypes, and
/// declared member shapes. Implementations must be stable for as long as a
/// [`crate::HierarchyCache`] built from them is in use.
pub trait TypeEnv {
    fn class(&self, name: &str) -> Option<&ClassDecl>;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ClassKind {
    Class,
    Interface,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypeParamDecl {
    pub var: TypeVar,
    /// Declared bounds; empty means `extends Object`.
    pub bounds: Vec<DeclaredShape>,
}

impl TypeParamDecl {
    pub fn new(var: TypeVar) -> Self {
        Self {
            var,
            bounds: Vec::new(),
        }
    }

    pub fn bounded(var: TypeVar, bounds: Vec<DeclaredShape>) -> Self {
        Self { var, bounds }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldDecl {
    pub name: String,
    pub shape: DeclaredShape,
    pub is_static: bool,
}

impl FieldDecl {
    pub fn new(name: impl Into<String>, shape: DeclaredShape) -> Self {
        Self {
            name: name.into(),
            shape,
            is_static: false,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MethodDecl {
    pub name: String,
    pub type_params: Vec<TypeParamDecl>,
    pub params: Vec<DeclaredShape>,
    pub return_shape: DeclaredShape,
    pub is_static: bool,
}

impl MethodDecl {
    pub fn new(
        name: impl Into<String>,
        params: Vec<DeclaredShape>,
        return_shape: DeclaredShape,
    ) -> Self {
        Self {
            name: name.into(),
            type_params: Vec::new(),
            params,
            return_shape,
            is_static: false,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConstructorDecl {
    pub type_params: Vec<TypeParamDecl>,
    pub params: Vec<DeclaredShape>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClassDecl {
    pub name: ClassName,
    pub kind: ClassKind,
    pub type_params: Vec<TypeParamDecl>,
    /// Generic superclass. `None` for `java.lang.Object` and for interfaces.
    pub super_class: Option<DeclaredShape>,
    pub interfaces: Vec<DeclaredShape>,
    pub fields: Vec<FieldDecl>,
    pub constructors: Vec<ConstructorDecl>,
    pub methods: Vec<MethodDecl>,
}

impl ClassDecl {
    /// A non-generic class extending `java.lang.Object`.
    pub fn class(name: impl Into<ClassName>) -> Self {
        Self {
            name: name.into(),
            kind: ClassKind::Class,
            type_params: Vec::new(),
            super_class: Some(DeclaredShape::class(well_known::OBJECT)),
            interfaces: Vec::new(),
            fields: Vec::new(),
            constructors: Vec::new(),
            methods: Vec::new(),
        }
    }

    /// A non-generic interface with no superinterfaces.
    pub fn interface(name: impl Into<ClassName>) -> Self {
        Self {
            kind: ClassKind::Interface,
            super_class: None,
            ..Self::class(name)
        }
    }

    pub fn type_vars(&self) -> impl Iterator<Item = &TypeVar> + '_ {
        self.type_params.iter().map(|tp| &tp.var)
    }

    /// Direct generic supertypes: superclass first, then interfaces in declaration order.
    pub fn supertypes(&self) -> impl Iterator<Item = &DeclaredShape> + '_ {
        self.super_class.iter().chain(self.interfaces.iter())
    }

    pub fn field(&self, name: &str) -> Option<&FieldDecl> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Method `name` taking exactly `arity` parameters. `<init>` selects a constructor.
    pub fn method(&self, name: &str, arity: usize) -> Option<MethodView<'_>> {
        if name == "<init>" {
            return self
                .constructors
                .iter()
                .find(|c| c.params.len() == arity)
                .map(MethodView::Constructor);
        }
        self.methods
            .iter()
            .find(|m| m.name == name && m.params.len() == arity)
            .map(MethodView::Method)
    }
}

/// Borrowed view over the two callable declaration kinds.
#[derive(Clone, Copy, Debug)]
pub enum MethodView<'a> {
    Method(&'a MethodDecl),
    Constructor(&'a ConstructorDecl),
}

impl<'a> MethodView<'a> {
    pub fn params(&self) -> &'a [DeclaredShape] {
        match self {
            MethodView::Method(m) => &m.params,
            MethodView::Constructor(c) => &c.params,
        }
    }

    pub fn return_shape(&self) -> DeclaredShape {
        match self {
            MethodView::Method(m) => m.return_shape.clone(),
            MethodView::Constructor(_) => DeclaredShape::primitive(PrimitiveType::Void),
        }
    }
}

/// In-memory [`TypeEnv`] keyed by binary name.
#[derive(Clone, Debug, Default)]
pub struct ClassTable {
    classes: HashMap<ClassName, ClassDecl>,
}

impl ClassTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// A table pre-populated with the handful of JDK types most generic code touches.
    pub fn with_minimal_jdk() -> Self {
        let mut table = Self::new();
        minimal_jdk(&mut table);
        table
    }

    /// Insert or replace a declaration, returning its name.
    pub fn define_class(&mut self, decl: ClassDecl) -> ClassName {
        let name = decl.name.clone();
        self.classes.insert(name.clone(), decl);
        name
    }

    pub fn class_mut(&mut self, name: &str) -> Option<&mut ClassDecl> {
        self.classes.get_mut(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.classes.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    pub fn class_names(&self) -> impl Iterator<Item = &ClassName> + '_ {
        self.classes.keys()
    }
}

impl TypeEnv for ClassTable {
    fn class(&self, name: &str) -> Option<&ClassDecl> {
        self.classes.get(name)
    }
}

impl<T: TypeEnv + ?Sized> TypeEnv for &T {
    fn class(&self, name: &str) -> Option<&ClassDecl> {
        (**self).class(name)
    }
}

impl<T: TypeEnv + ?Sized> TypeEnv for Arc<T> {
    fn class(&self, name: &str) -> Option<&ClassDecl> {
        (**self).class(name)
    }
}

fn generic(
    name: &str,
    kind: ClassKind,
    params: &[&str],
    super_class: Option<DeclaredShape>,
    interfaces: Vec<DeclaredShape>,
) -> ClassDecl {
    let base = match kind {
        ClassKind::Class => ClassDecl::class(name),
        ClassKind::Interface => ClassDecl::interface(name),
    };
    ClassDecl {
        type_params: params
            .iter()
            .map(|p| TypeParamDecl::new(TypeVar::class(name, *p)))
            .collect(),
        super_class: super_class.or(base.super_class.clone()),
        interfaces,
        ..base
    }
}

fn var(owner: &str, name: &str) -> DeclaredShape {
    DeclaredShape::type_var(TypeVar::class(owner, name))
}

fn minimal_jdk(table: &mut ClassTable) {
    use ClassKind::{Class, Interface};

    let serializable = || DeclaredShape::class(well_known::SERIALIZABLE);
    let comparable_of = |name: &str| {
        DeclaredShape::parameterized("java.lang.Comparable", vec![DeclaredShape::class(name)])
    };

    table.define_class(ClassDecl {
        super_class: None,
        ..ClassDecl::class(well_known::OBJECT)
    });
    table.define_class(ClassDecl::interface(well_known::CLONEABLE));
    table.define_class(ClassDecl::interface(well_known::SERIALIZABLE));
    table.define_class(ClassDecl::interface("java.lang.CharSequence"));

    let comparable = "java.lang.Comparable";
    table.define_class(ClassDecl {
        methods: vec![MethodDecl::new(
            "compareTo",
            vec![var(comparable, "T")],
            DeclaredShape::primitive(PrimitiveType::Int),
        )],
        ..generic(comparable, Interface, &["T"], None, vec![])
    });

    table.define_class(ClassDecl {
        interfaces: vec![
            serializable(),
            comparable_of(well_known::STRING),
            DeclaredShape::class("java.lang.CharSequence"),
        ],
        ..ClassDecl::class(well_known::STRING)
    });

    table.define_class(ClassDecl {
        interfaces: vec![serializable()],
        ..ClassDecl::class(well_known::NUMBER)
    });

    for prim in PrimitiveType::ALL {
        let boxed = prim.boxed_class();
        let numeric = !matches!(
            prim,
            PrimitiveType::Boolean | PrimitiveType::Char | PrimitiveType::Void
        );
        let super_class = if numeric {
            DeclaredShape::class(well_known::NUMBER)
        } else {
            DeclaredShape::class(well_known::OBJECT)
        };
        let interfaces = if prim == PrimitiveType::Void {
            vec![]
        } else {
            vec![serializable(), comparable_of(boxed)]
        };
        table.define_class(ClassDecl {
            super_class: Some(super_class),
            interfaces,
            ..ClassDecl::class(boxed)
        });
    }

    let iterable = "java.lang.Iterable";
    table.define_class(ClassDecl {
        methods: vec![MethodDecl::new(
            "iterator",
            vec![],
            DeclaredShape::parameterized("java.util.Iterator", vec![var(iterable, "T")]),
        )],
        ..generic(iterable, Interface, &["T"], None, vec![])
    });
    table.define_class(generic("java.util.Iterator", Interface, &["E"], None, vec![]));

    let collection = "java.util.Collection";
    table.define_class(ClassDecl {
        methods: vec![MethodDecl::new(
            "add",
            vec![var(collection, "E")],
            DeclaredShape::primitive(PrimitiveType::Boolean),
        )],
        ..generic(
            collection,
            Interface,
            &["E"],
            None,
            vec![DeclaredShape::parameterized(iterable, vec![var(collection, "E")])],
        )
    });

    let list = "java.util.List";
    table.define_class(ClassDecl {
        methods: vec![MethodDecl::new(
            "get",
            vec![DeclaredShape::primitive(PrimitiveType::Int)],
            var(list, "E"),
        )],
        ..generic(
            list,
            Interface,
            &["E"],
            None,
            vec![DeclaredShape::parameterized(collection, vec![var(list, "E")])],
        )
    });

    let set = "java.util.Set";
    table.define_class(generic(
        set,
        Interface,
        &["E"],
        None,
        vec![DeclaredShape::parameterized(collection, vec![var(set, "E")])],
    ));

    let abstract_collection = "java.util.AbstractCollection";
    table.define_class(generic(
        abstract_collection,
        Class,
        &["E"],
        None,
        vec![DeclaredShape::parameterized(
            collection,
            vec![var(abstract_collection, "E")],
        )],
    ));

    let abstract_list = "java.util.AbstractList";
    table.define_class(generic(
        abstract_list,
        Class,
        &["E"],
        Some(DeclaredShape::parameterized(
            abstract_collection,
            vec![var(abstract_list, "E")],
        )),
        vec![DeclaredShape::parameterized(list, vec![var(abstract_list, "E")])],
    ));

    let array_list = "java.util.ArrayList";
    table.define_class(generic(
        array_list,
        Class,
        &["E"],
        Some(DeclaredShape::parameterized(
            abstract_list,
            vec![var(array_list, "E")],
        )),
        vec![
            DeclaredShape::parameterized(list, vec![var(array_list, "E")]),
            DeclaredShape::class(well_known::CLONEABLE),
            serializable(),
        ],
    ));

    let hash_set = "java.util.HashSet";
    table.define_class(generic(
        hash_set,
        Class,
        &["E"],
        Some(DeclaredShape::parameterized(
            abstract_collection,
            vec![var(hash_set, "E")],
        )),
        vec![
            DeclaredShape::parameterized(set, vec![var(hash_set, "E")]),
            DeclaredShape::class(well_known::CLONEABLE),
            serializable(),
        ],
    ));

    let map = "java.util.Map";
    table.define_class(ClassDecl {
        methods: vec![MethodDecl::new(
            "get",
            vec![DeclaredShape::class(well_known::OBJECT)],
            var(map, "V"),
        )],
        ..generic(map, Interface, &["K", "V"], None, vec![])
    });

    let hash_map = "java.util.HashMap";
    table.define_class(generic(
        hash_map,
        Class,
        &["K", "V"],
        None,
        vec![
            DeclaredShape::parameterized(map, vec![var(hash_map, "K"), var(hash_map, "V")]),
            DeclaredShape::class(well_known::CLONEABLE),
            serializable(),
        ],
    ));

    let optional = "java.util.Optional";
    table.define_class(ClassDecl {
        fields: vec![FieldDecl::new("value", var(optional, "T"))],
        ..generic(optional, Class, &["T"], None, vec![])
    });

    let function = "java.util.function.Function";
    table.define_class(ClassDecl {
        methods: vec![MethodDecl::new(
            "apply",
            vec![var(function, "T")],
            var(function, "R"),
        )],
        ..generic(function, Interface, &["T", "R"], None, vec![])
    });

    let supplier = "java.util.function.Supplier";
    table.define_class(ClassDecl {
        methods: vec![MethodDecl::new("get", vec![], var(supplier, "T"))],
        ..generic(supplier, Interface, &["T"], None, vec![])
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_jdk_wires_collection_hierarchy() {
        let table = ClassTable::with_minimal_jdk();
        let array_list = table.class("java.util.ArrayList").unwrap();

        assert_eq!(array_list.kind, ClassKind::Class);
        assert_eq!(
            array_list.type_vars().cloned().collect::<Vec<_>>(),
            vec![TypeVar::class("java.util.ArrayList", "E")]
        );
        assert_eq!(
            array_list.super_class,
            Some(DeclaredShape::parameterized(
                "java.util.AbstractList",
                vec![var("java.util.ArrayList", "E")]
            ))
        );
        assert!(table.class(well_known::OBJECT).unwrap().super_class.is_none());
        assert!(table.class("java.util.List").unwrap().super_class.is_none());
    }

    #[test]
    fn wrappers_extend_number_where_numeric() {
        let table = ClassTable::with_minimal_jdk();
        let integer = table.class("java.lang.Integer").unwrap();
        assert_eq!(integer.super_class, Some(DeclaredShape::class(well_known::NUMBER)));
        let boolean = table.class("java.lang.Boolean").unwrap();
        assert_eq!(boolean.super_class, Some(DeclaredShape::class(well_known::OBJECT)));
    }

    #[test]
    fn method_lookup_distinguishes_arity_and_constructors() {
        let mut table = ClassTable::new();
        table.define_class(ClassDecl {
            constructors: vec![ConstructorDecl {
                type_params: vec![],
                params: vec![DeclaredShape::class(well_known::STRING)],
            }],
            methods: vec![
                MethodDecl::new("m", vec![], DeclaredShape::class(well_known::STRING)),
                MethodDecl::new(
                    "m",
                    vec![DeclaredShape::primitive(PrimitiveType::Int)],
                    DeclaredShape::primitive(PrimitiveType::Int),
                ),
            ],
            ..ClassDecl::class("com.example.Foo")
        });
        let foo = table.class("com.example.Foo").unwrap();

        let m1 = foo.method("m", 1).unwrap();
        assert_eq!(m1.return_shape(), DeclaredShape::primitive(PrimitiveType::Int));
        assert!(foo.method("m", 2).is_none());

        let ctor = foo.method("<init>", 1).unwrap();
        assert_eq!(ctor.params(), &[DeclaredShape::class(well_known::STRING)]);
        assert_eq!(ctor.return_shape(), DeclaredShape::primitive(PrimitiveType::Void));
    }

    #[test]
    fn define_class_replaces_existing_declaration() {
        let mut table = ClassTable::with_minimal_jdk();
        let before = table.len();
        table.define_class(ClassDecl::class(well_known::STRING));
        assert_eq!(table.len(), before);
        assert!(table.class(well_known::STRING).unwrap().interfaces.is_empty());
    }
}
