use super::type_ref::TypeRef;
use http::Method;
use serde::Deserialize;
use std::fmt;

/// Role a declared type plays in the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeKind {
    /// A service-style interface; routable when it carries routing metadata
    #[default]
    Interface,
    /// A concrete implementation of an interface
    Implementation,
    /// A plain data/model type
    Model,
}

/// Raw catalog file as written by the user
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CatalogFile {
    /// Every declared type
    #[serde(default)]
    pub types: Vec<TypeDecl>,
    /// Root services to generate, in output order
    #[serde(default)]
    pub services: Vec<RootService>,
}

/// A declared interface, implementation or model type
#[derive(Debug, Clone, Deserialize)]
pub struct TypeDecl {
    pub name: String,
    #[serde(default)]
    pub kind: TypeKind,
    /// Type-level route path
    #[serde(default)]
    pub path: Option<String>,
    /// Generic type variables, in declaration order
    #[serde(default)]
    pub type_params: Vec<String>,
    /// Interface implemented by an implementation type
    #[serde(default)]
    pub implements: Option<String>,
    #[serde(default)]
    pub operations: Vec<OperationDecl>,
    #[serde(default)]
    pub constructors: Vec<ConstructorDecl>,
}

/// A declared operation
#[derive(Debug, Clone, Deserialize)]
pub struct OperationDecl {
    pub name: String,
    /// HTTP verb; absent for resource locators and helpers
    #[serde(default)]
    pub method: Option<String>,
    /// Route fragment contributed by this operation
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub params: Vec<ParamDecl>,
    /// Return type expression; absent means `()`
    #[serde(default)]
    pub returns: Option<String>,
}

/// A declared parameter
#[derive(Debug, Clone, Deserialize)]
pub struct ParamDecl {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: String,
    /// Where the value comes from at request time (path, query, body, ...)
    #[serde(default)]
    pub source: Option<String>,
    /// Request-side name, defaults to `name`
    #[serde(default)]
    pub key: Option<String>,
}

/// A declared implementation constructor
#[derive(Debug, Clone, Deserialize)]
pub struct ConstructorDecl {
    #[serde(default = "default_constructor_name")]
    pub name: String,
    #[serde(default)]
    pub params: Vec<ParamDecl>,
}

fn default_constructor_name() -> String {
    "new".to_string()
}

/// A root service to generate
#[derive(Debug, Clone, Deserialize)]
pub struct RootService {
    /// Interface type name
    pub interface: String,
    /// Implementation type name; looked up by `implements` when absent
    #[serde(default)]
    pub implementation: Option<String>,
    /// Display name used for documentation
    pub name: String,
    /// Base path; defaults to the interface's own path
    #[serde(default)]
    pub path: Option<String>,
    /// Generated class name; defaults to `<implementation><class_suffix>`
    #[serde(default)]
    pub class_name: Option<String>,
}

/// Ordering key of an operation within one type
///
/// Name first, then the parameter type signature, so overloads sort next to
/// each other and iteration order never depends on declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OperationKey {
    pub name: String,
    pub signature: Vec<TypeRef>,
}

impl fmt::Display for OperationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.name)?;
        for (i, ty) in self.signature.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{ty}")?;
        }
        write!(f, ")")
    }
}

/// One parameter of an introspected operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterDescriptor {
    pub name: String,
    pub ty: TypeRef,
    /// Declared source kind, unvalidated
    pub source: Option<String>,
    /// Request-side name
    pub key: String,
}

/// One callable operation of an introspected type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationDescriptor {
    /// Type declaring the operation
    pub owner: String,
    pub name: String,
    pub http_method: Option<Method>,
    pub path: Option<String>,
    pub params: Vec<ParameterDescriptor>,
    pub returns: TypeRef,
}

impl OperationDescriptor {
    pub fn key(&self) -> OperationKey {
        OperationKey {
            name: self.name.clone(),
            signature: self.params.iter().map(|p| p.ty.clone()).collect(),
        }
    }

    /// `Owner#operation`, the key used by the documentation model
    pub fn identity(&self) -> String {
        format!("{}#{}", self.owner, self.name)
    }
}

/// One constructor of an implementation type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstructorDescriptor {
    pub name: String,
    pub params: Vec<ParameterDescriptor>,
}
