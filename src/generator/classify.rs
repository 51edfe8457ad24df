use crate::introspect::{TypeIntrospector, TypeRef};

/// Whether operations returning `ty` lead to a nested resource
///
/// A type is a resource when its base name is declared as a routable
/// interface (see [`CatalogType::is_routable`]). Data types, primitives,
/// containers of resources and unit are terminal. The answer depends only
/// on the declaration, so recursion over resources always sees the same
/// graph.
///
/// [`CatalogType::is_routable`]: crate::introspect::CatalogType::is_routable
pub fn is_resource<I: TypeIntrospector + ?Sized>(introspector: &I, ty: &TypeRef) -> bool {
    ty.base_name()
        .and_then(|name| introspector.type_decl(name))
        .map(|decl| decl.is_routable())
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::introspect::Catalog;

    #[test]
    fn test_classification() {
        let catalog = Catalog::from_yaml_str(
            r#"
types:
  - name: ItemResource
    operations: [{ name: get, method: GET, returns: ItemDto }]
  - name: Helper
    operations: [{ name: compute, returns: i64 }]
  - name: ItemDto
    kind: model
  - name: ItemImpl
    implements: ItemResource
    operations: [{ name: get, method: GET, returns: ItemDto }]
"#,
        )
        .unwrap();
        assert!(is_resource(&catalog, &TypeRef::named("ItemResource")));
        assert!(is_resource(&catalog, &TypeRef::parse("ItemResource<?>").unwrap()));
        assert!(!is_resource(&catalog, &TypeRef::named("ItemDto")));
        assert!(!is_resource(&catalog, &TypeRef::named("Helper")));
        assert!(!is_resource(&catalog, &TypeRef::named("ItemImpl")));
        assert!(!is_resource(&catalog, &TypeRef::named("String")));
        assert!(!is_resource(&catalog, &TypeRef::parse("Vec<ItemResource>").unwrap()));
        assert!(!is_resource(&catalog, &TypeRef::Unit));
    }
}
