use std::collections::HashMap;

use nova_generics::{
    ClassDecl, ClassKind, ClassName, ClassTable, ConstructorDecl, DeclaredShape, FieldDecl,
    MethodDecl, PrimitiveType, RawType, TypeParamDecl, TypeVar,
};

use crate::descriptor::{internal_to_binary, parse_field_descriptor, parse_method_descriptor};
use crate::error::Result;
use crate::signature::{
    parse_class_signature, parse_field_signature, parse_method_signature, ClassTypeSignature,
    TypeArgument, TypeParameter, TypeSignature,
};
use crate::stub::{ClassStub, FieldStub, MethodStub};

const ACC_STATIC: u16 = 0x0008;
const ACC_INTERFACE: u16 = 0x0200;

/// Converts [`ClassStub`]s into [`ClassDecl`]s and defines them in a [`ClassTable`].
pub struct SignatureLoader<'a> {
    table: &'a mut ClassTable,
}

impl<'a> SignatureLoader<'a> {
    pub fn new(table: &'a mut ClassTable) -> Self {
        Self { table }
    }

    /// Define `stub` unless the table already has a class of that name.
    ///
    /// Hand-written declarations (such as [`ClassTable::with_minimal_jdk`]) are never clobbered.
    pub fn load(&mut self, stub: &ClassStub) -> Result<ClassName> {
        let name = ClassName::new(internal_to_binary(&stub.binary_name));
        if self.table.contains(name.as_str()) {
            tracing::debug!(
                target: "nova.generics.bridge",
                class = %name,
                "class already defined; keeping the existing declaration"
            );
            return Ok(name);
        }
        self.replace(stub)
    }

    /// Define `stub`, replacing any existing declaration of the same name.
    pub fn replace(&mut self, stub: &ClassStub) -> Result<ClassName> {
        let decl = class_decl(stub)?;
        Ok(self.table.define_class(decl))
    }

    pub fn load_all<'s>(
        &mut self,
        stubs: impl IntoIterator<Item = &'s ClassStub>,
    ) -> Result<Vec<ClassName>> {
        stubs.into_iter().map(|stub| self.load(stub)).collect()
    }
}

/// Build the declaration for `stub`, preferring generic signatures over erased descriptors.
///
/// A `Signature` string that fails to parse is logged and ignored; a malformed descriptor is an
/// error, since there is nothing left to fall back to.
pub fn class_decl(stub: &ClassStub) -> Result<ClassDecl> {
    let name = ClassName::new(internal_to_binary(&stub.binary_name));
    let kind = if stub.access_flags & ACC_INTERFACE != 0 {
        ClassKind::Interface
    } else {
        ClassKind::Class
    };

    let signature = stub.signature.as_deref().and_then(|sig| {
        parse_class_signature(sig)
            .map_err(|err| ignored_signature(&name, "<class>", &err))
            .ok()
    });

    let mut class_vars = HashMap::new();
    let (type_params, super_class, interfaces) = match signature {
        Some(sig) => {
            for tp in &sig.type_parameters {
                let var = TypeVar::class(name.clone(), tp.name.as_str());
                class_vars.insert(tp.name.clone(), var);
            }
            let scope = Scope::class(&name, &class_vars);
            let type_params = scope.type_params(&sig.type_parameters);
            let super_class = match kind {
                ClassKind::Interface => None,
                ClassKind::Class => Some(scope.class_type(&sig.super_class)),
            };
            let interfaces = sig.interfaces.iter().map(|i| scope.class_type(i)).collect();
            (type_params, super_class, interfaces)
        }
        None => {
            let super_class = match kind {
                ClassKind::Interface => None,
                ClassKind::Class => stub
                    .super_binary_name
                    .as_deref()
                    .map(|s| DeclaredShape::class(internal_to_binary(s))),
            };
            let interfaces = stub
                .interfaces
                .iter()
                .map(|i| DeclaredShape::class(internal_to_binary(i)))
                .collect();
            (Vec::new(), super_class, interfaces)
        }
    };

    let scope = Scope::class(&name, &class_vars);
    let fields = stub
        .fields
        .iter()
        .map(|field| scope.field(field))
        .collect::<Result<Vec<_>>>()?;

    let mut methods = Vec::new();
    let mut constructors = Vec::new();
    for method in &stub.methods {
        match method.name.as_str() {
            "<clinit>" => continue,
            "<init>" => {
                let (type_params, params, _) = scope.callable(method)?;
                constructors.push(ConstructorDecl {
                    type_params,
                    params,
                });
            }
            _ => {
                let (type_params, params, return_shape) = scope.callable(method)?;
                methods.push(MethodDecl {
                    name: method.name.clone(),
                    type_params,
                    params,
                    return_shape,
                    is_static: method.access_flags & ACC_STATIC != 0,
                });
            }
        }
    }

    Ok(ClassDecl {
        name,
        kind,
        type_params,
        super_class,
        interfaces,
        fields,
        constructors,
        methods,
    })
}

fn ignored_signature(class: &ClassName, member: &str, err: &crate::BridgeError) {
    tracing::debug!(
        target: "nova.generics.bridge",
        class = %class,
        member,
        error = %err,
        "ignoring malformed generic signature; falling back to the erased descriptor"
    );
}

/// Type variables visible at one point of a class body. Method variables shadow class ones.
struct Scope<'s> {
    class: &'s ClassName,
    class_vars: &'s HashMap<String, TypeVar>,
    method_vars: HashMap<String, TypeVar>,
}

impl<'s> Scope<'s> {
    fn class(class: &'s ClassName, class_vars: &'s HashMap<String, TypeVar>) -> Self {
        Self {
            class,
            class_vars,
            method_vars: HashMap::new(),
        }
    }

    fn field(&self, field: &FieldStub) -> Result<FieldDecl> {
        let from_signature = field.signature.as_deref().and_then(|sig| {
            parse_field_signature(sig)
                .map_err(|err| ignored_signature(self.class, &field.name, &err))
                .ok()
        });
        let shape = match from_signature {
            Some(sig) => self.shape(&sig),
            None => DeclaredShape::Raw(parse_field_descriptor(&field.descriptor)?),
        };
        Ok(FieldDecl {
            name: field.name.clone(),
            shape,
            is_static: field.access_flags & ACC_STATIC != 0,
        })
    }

    fn callable(
        &self,
        method: &MethodStub,
    ) -> Result<(Vec<TypeParamDecl>, Vec<DeclaredShape>, DeclaredShape)> {
        let from_signature = method.signature.as_deref().and_then(|sig| {
            parse_method_signature(sig)
                .map_err(|err| ignored_signature(self.class, &method.name, &err))
                .ok()
        });

        let Some(sig) = from_signature else {
            let desc = parse_method_descriptor(&method.descriptor)?;
            let params = desc.params.into_iter().map(DeclaredShape::Raw).collect();
            return Ok((Vec::new(), params, DeclaredShape::Raw(desc.return_type)));
        };

        let method_vars = sig
            .type_parameters
            .iter()
            .map(|tp| {
                let var =
                    TypeVar::method(self.class.clone(), method.name.as_str(), tp.name.as_str());
                (tp.name.clone(), var)
            })
            .collect();
        let scope = Scope {
            class: self.class,
            class_vars: self.class_vars,
            method_vars,
        };

        let type_params = scope.type_params(&sig.type_parameters);
        let params = sig.parameters.iter().map(|p| scope.shape(p)).collect();
        let return_shape = match &sig.return_type {
            Some(ty) => scope.shape(ty),
            None => DeclaredShape::primitive(PrimitiveType::Void),
        };
        Ok((type_params, params, return_shape))
    }

    fn type_params(&self, params: &[TypeParameter]) -> Vec<TypeParamDecl> {
        params
            .iter()
            .map(|tp| {
                let bounds = tp
                    .bounds()
                    .map(|b| self.shape(b))
                    .filter(|b| !is_plain_object(b))
                    .collect();
                TypeParamDecl::bounded(self.var(&tp.name), bounds)
            })
            .collect()
    }

    fn var(&self, name: &str) -> TypeVar {
        if let Some(var) = self.method_vars.get(name).or_else(|| self.class_vars.get(name)) {
            return var.clone();
        }
        // Variables of an enclosing class or method are not modelled; an unknown class-owned
        // variable resolves to the unbounded default.
        tracing::debug!(
            target: "nova.generics.bridge",
            class = %self.class,
            var = name,
            "type variable is not declared by this class or method"
        );
        TypeVar::class(self.class.clone(), name)
    }

    fn shape(&self, sig: &TypeSignature) -> DeclaredShape {
        match sig {
            TypeSignature::Base(prim) => DeclaredShape::primitive(*prim),
            TypeSignature::TypeVariable(name) => DeclaredShape::type_var(self.var(name)),
            TypeSignature::Class(class) => self.class_type(class),
            TypeSignature::Array(component) => match self.shape(component) {
                // Arrays of erased components stay plain classes, like `Class<String[]>`.
                DeclaredShape::Raw(raw) => DeclaredShape::Raw(RawType::array_of(raw)),
                generic => DeclaredShape::generic_array(generic),
            },
        }
    }

    fn class_type(&self, class: &ClassTypeSignature) -> DeclaredShape {
        if class.type_arguments.is_empty() {
            return DeclaredShape::class(class.binary_name.as_str());
        }
        let args = class
            .type_arguments
            .iter()
            .map(|arg| match arg {
                TypeArgument::Any => DeclaredShape::unbounded_wildcard(),
                TypeArgument::Exact(ty) => self.shape(ty),
                TypeArgument::Extends(ty) => DeclaredShape::wildcard_extends(self.shape(ty)),
                TypeArgument::Super(ty) => DeclaredShape::wildcard_super(self.shape(ty)),
            })
            .collect();
        DeclaredShape::parameterized(class.binary_name.as_str(), args)
    }
}

fn is_plain_object(shape: &DeclaredShape) -> bool {
    matches!(shape, DeclaredShape::Raw(raw) if raw.is_object())
}
