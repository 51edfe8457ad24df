use super::type_ref::TypeRef;
use super::types::{
    CatalogFile, ConstructorDecl, ConstructorDescriptor, OperationDecl, OperationDescriptor,
    ParamDecl, ParameterDescriptor, RootService, TypeDecl, TypeKind,
};
use anyhow::{bail, Context};
use http::Method;
use std::collections::{BTreeMap, HashSet};
use std::path::Path;
use tracing::debug;

/// Read-only view over the declared types of a generation run
///
/// The generator never looks at files or reflection data directly; it asks
/// an introspector for descriptors. [`Catalog`] is the file-backed
/// implementation.
pub trait TypeIntrospector {
    /// Look up a declared type by name
    fn type_decl(&self, name: &str) -> Option<&CatalogType>;

    /// Operations declared on `type_name`, in declaration order
    fn operations(&self, type_name: &str) -> &[OperationDescriptor] {
        self.type_decl(type_name)
            .map(|t| t.operations.as_slice())
            .unwrap_or(&[])
    }

    /// Constructors declared on `type_name`
    fn constructors(&self, type_name: &str) -> &[ConstructorDescriptor] {
        self.type_decl(type_name)
            .map(|t| t.constructors.as_slice())
            .unwrap_or(&[])
    }

    /// The implementation type declared for `interface`, if any
    fn implementation_of(&self, interface: &str) -> Option<&CatalogType>;
}

/// A declared type with its operations converted to descriptors
#[derive(Debug, Clone)]
pub struct CatalogType {
    pub name: String,
    pub kind: TypeKind,
    pub path: Option<String>,
    pub type_params: Vec<String>,
    pub implements: Option<String>,
    pub operations: Vec<OperationDescriptor>,
    pub constructors: Vec<ConstructorDescriptor>,
}

impl CatalogType {
    /// Whether the type carries a routing-capable declaration
    ///
    /// Only interfaces qualify, and only when they declare a type-level path
    /// or at least one operation with a verb or a path fragment.
    pub fn is_routable(&self) -> bool {
        self.kind == TypeKind::Interface
            && (self.path.is_some()
                || self
                    .operations
                    .iter()
                    .any(|op| op.http_method.is_some() || op.path.is_some()))
    }

    fn from_decl(decl: TypeDecl) -> anyhow::Result<Self> {
        let TypeDecl {
            name,
            kind,
            path,
            type_params,
            implements,
            operations,
            constructors,
        } = decl;
        let kind = if implements.is_some() {
            TypeKind::Implementation
        } else {
            kind
        };

        let operations = operations
            .into_iter()
            .map(|op| convert_operation(&name, op))
            .collect::<anyhow::Result<Vec<_>>>()?;

        let mut keys = HashSet::new();
        for op in &operations {
            if !keys.insert(op.key()) {
                bail!(
                    "Type `{}` declares operation `{}` twice with the same signature",
                    name,
                    op.key()
                );
            }
        }

        let constructors = constructors
            .into_iter()
            .map(|c| convert_constructor(&name, c))
            .collect::<anyhow::Result<Vec<_>>>()?;

        Ok(CatalogType {
            name,
            kind,
            path,
            type_params,
            implements,
            operations,
            constructors,
        })
    }
}

fn convert_param(owner: &str, op: &str, param: ParamDecl) -> anyhow::Result<ParameterDescriptor> {
    let ty = TypeRef::parse(&param.ty)
        .with_context(|| format!("Parameter `{}` of `{owner}#{op}`", param.name))?;
    let key = param.key.unwrap_or_else(|| param.name.clone());
    Ok(ParameterDescriptor {
        name: param.name,
        ty,
        source: param.source,
        key,
    })
}

fn convert_operation(owner: &str, op: OperationDecl) -> anyhow::Result<OperationDescriptor> {
    let http_method = match op.method.as_deref() {
        Some(verb) => Some(
            Method::from_bytes(verb.trim().to_ascii_uppercase().as_bytes())
                .with_context(|| format!("Invalid HTTP method `{verb}` on `{owner}#{}`", op.name))?,
        ),
        None => None,
    };
    let returns = TypeRef::parse(op.returns.as_deref().unwrap_or(""))
        .with_context(|| format!("Return type of `{owner}#{}`", op.name))?;
    let params = op
        .params
        .into_iter()
        .map(|p| convert_param(owner, &op.name, p))
        .collect::<anyhow::Result<Vec<_>>>()?;
    Ok(OperationDescriptor {
        owner: owner.to_string(),
        name: op.name,
        http_method,
        path: op.path,
        params,
        returns,
    })
}

fn convert_constructor(owner: &str, ctor: ConstructorDecl) -> anyhow::Result<ConstructorDescriptor> {
    let params = ctor
        .params
        .into_iter()
        .map(|p| convert_param(owner, &ctor.name, p))
        .collect::<anyhow::Result<Vec<_>>>()?;
    Ok(ConstructorDescriptor {
        name: ctor.name,
        params,
    })
}

/// The full set of declared types and root services of one run
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    types: BTreeMap<String, CatalogType>,
    services: Vec<RootService>,
}

impl Catalog {
    /// Build a catalog from its raw file form
    ///
    /// # Errors
    ///
    /// Returns an error if a type is declared twice, a type expression does
    /// not parse, an HTTP verb is invalid, or an operation signature repeats.
    pub fn from_file(file: CatalogFile) -> anyhow::Result<Self> {
        let mut types = BTreeMap::new();
        for decl in file.types {
            let ty = CatalogType::from_decl(decl)?;
            if types.contains_key(&ty.name) {
                bail!("Type `{}` is declared more than once", ty.name);
            }
            types.insert(ty.name.clone(), ty);
        }
        Ok(Catalog {
            types,
            services: file.services,
        })
    }

    /// Parse a catalog from YAML text
    pub fn from_yaml_str(content: &str) -> anyhow::Result<Self> {
        let file: CatalogFile = serde_yaml::from_str(content)?;
        Self::from_file(file)
    }

    /// Parse a catalog from JSON text
    pub fn from_json_str(content: &str) -> anyhow::Result<Self> {
        let file: CatalogFile = serde_json::from_str(content)?;
        Self::from_file(file)
    }

    /// Root services in declaration order
    pub fn services(&self) -> &[RootService] {
        &self.services
    }

    /// Every declared type, ordered by name
    pub fn types(&self) -> impl Iterator<Item = &CatalogType> {
        self.types.values()
    }
}

impl TypeIntrospector for Catalog {
    fn type_decl(&self, name: &str) -> Option<&CatalogType> {
        self.types.get(name)
    }

    fn implementation_of(&self, interface: &str) -> Option<&CatalogType> {
        self.types
            .values()
            .find(|t| t.implements.as_deref() == Some(interface))
    }
}

/// Load a catalog from a YAML or JSON file
///
/// The format is chosen by extension: `.yaml`/`.yml` are read as YAML,
/// everything else as JSON.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub fn load_catalog(path: &Path) -> anyhow::Result<Catalog> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read catalog: {}", path.display()))?;
    let is_yaml = path
        .extension()
        .map(|s| s == "yaml" || s == "yml")
        .unwrap_or(false);
    let catalog = if is_yaml {
        Catalog::from_yaml_str(&content)
    } else {
        Catalog::from_json_str(&content)
    }
    .with_context(|| format!("Failed to parse catalog: {}", path.display()))?;
    debug!(
        catalog = %path.display(),
        types = catalog.types.len(),
        services = catalog.services.len(),
        "loaded catalog"
    );
    Ok(catalog)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    const CATALOG: &str = r#"
types:
  - name: OrderService
    path: /orders
    operations:
      - name: list
        method: get
        returns: Vec<OrderDto>
      - name: order
        path: /{id}
        params: [{ name: id, type: String, source: path }]
        returns: OrderResource
  - name: OrderServiceImpl
    implements: OrderService
    constructors:
      - params: [{ name: engine, type: String }]
  - name: OrderResource
    operations:
      - name: get
        method: GET
        returns: OrderDto
  - name: OrderDto
    kind: model
services:
  - interface: OrderService
    name: Orders
"#;

    #[test]
    fn test_load_catalog_yaml() {
        let catalog = Catalog::from_yaml_str(CATALOG).unwrap();
        assert_eq!(catalog.services().len(), 1);
        let ops = catalog.operations("OrderService");
        assert_eq!(ops.len(), 2);
        assert_eq!(ops[0].http_method, Some(Method::GET));
        assert_eq!(ops[1].params[0].key, "id");
        assert_eq!(ops[1].returns, TypeRef::named("OrderResource"));
    }

    #[test]
    fn test_implementation_lookup_and_kind() {
        let catalog = Catalog::from_yaml_str(CATALOG).unwrap();
        let implementation = catalog.implementation_of("OrderService").unwrap();
        assert_eq!(implementation.name, "OrderServiceImpl");
        assert_eq!(implementation.kind, TypeKind::Implementation);
        assert_eq!(catalog.constructors("OrderServiceImpl")[0].name, "new");
    }

    #[test]
    fn test_routable_types() {
        let catalog = Catalog::from_yaml_str(CATALOG).unwrap();
        assert!(catalog.type_decl("OrderService").unwrap().is_routable());
        assert!(catalog.type_decl("OrderResource").unwrap().is_routable());
        assert!(!catalog.type_decl("OrderDto").unwrap().is_routable());
        assert!(!catalog.type_decl("OrderServiceImpl").unwrap().is_routable());
    }

    #[test]
    fn test_duplicate_type_rejected() {
        let err = Catalog::from_yaml_str("types: [{ name: A }, { name: A }]").unwrap_err();
        assert!(err.to_string().contains("declared more than once"));
    }

    #[test]
    fn test_duplicate_signature_rejected() {
        let yaml = r#"
types:
  - name: A
    operations:
      - { name: get, params: [{ name: id, type: String }] }
      - { name: get, params: [{ name: other, type: String }] }
"#;
        let err = Catalog::from_yaml_str(yaml).unwrap_err();
        assert!(err.to_string().contains("twice with the same signature"));
    }

    #[test]
    fn test_invalid_verb_rejected() {
        let yaml = "types: [{ name: A, operations: [{ name: x, method: 'G ET' }] }]";
        assert!(Catalog::from_yaml_str(yaml).is_err());
    }
}
