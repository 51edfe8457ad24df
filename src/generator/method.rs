use tracing::debug;

use super::binding::{bind_parameters, route_variables, BoundParameter, ParamSource};
use super::classify::is_resource;
use super::compose::{join_route, InvocationChain, PathPrefix};
use super::error::{GenerationError, GenerationNote, NoteKind};
use super::naming::method_ident;
use super::return_type::ReturnTypeInfo;
use crate::docs::DocumentationModel;
use crate::emit::{CallStep, ClassBuilder, Decoration, MethodDecl, MethodParam};
use crate::introspect::{OperationDescriptor, TypeIntrospector, TypeRef};

/// Where in the resource tree an operation is being generated
#[derive(Debug, Clone, Copy)]
pub struct MethodContext<'a> {
    /// Root service base path, applied once
    pub base_path: &'a str,
    /// Fragments of every locator above this level
    pub prefix: &'a PathPrefix,
    pub chain: &'a InvocationChain,
    /// Summary used when the documentation model has none
    pub default_summary: &'a str,
}

/// What generating one operation produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodOutcome {
    /// The operation returns a nested resource to descend into
    pub resource: bool,
    /// Resolved return type
    pub return_type: TypeRef,
    /// Base name of the return type, `None` for unit and wildcards
    pub type_name: Option<String>,
    /// Parameters of the operation itself, bound to their sources
    pub bound: Vec<BoundParameter>,
    /// Name of the emitted method; `None` for locators and skipped operations
    pub emitted: Option<String>,
}

/// Generates the endpoint method for a single operation
pub struct MethodStep<'a, I: ?Sized> {
    introspector: &'a I,
    documentation: &'a DocumentationModel,
}

impl<'a, I: TypeIntrospector + ?Sized> MethodStep<'a, I> {
    pub fn new(introspector: &'a I, documentation: &'a DocumentationModel) -> Self {
        MethodStep {
            introspector,
            documentation,
        }
    }

    /// Generate `info`'s operation into `class`
    ///
    /// Resource locators are validated but emit nothing; the driver descends
    /// into them. Terminal operations without an HTTP verb are skipped with a
    /// [`NoteKind::NonRoutableOperation`] note.
    ///
    /// # Errors
    ///
    /// Binding, route template and route conflict failures, see
    /// [`GenerationError`].
    pub fn create(
        &self,
        class: &mut ClassBuilder,
        info: &ReturnTypeInfo,
        ctx: &MethodContext<'_>,
        notes: &mut Vec<GenerationNote>,
    ) -> Result<MethodOutcome, GenerationError> {
        let op = info.operation();
        let bound = bind_parameters(op)?;
        let return_type = info.resolved().clone();
        let mut outcome = MethodOutcome {
            resource: is_resource(self.introspector, &return_type),
            type_name: return_type.base_name().map(String::from),
            return_type,
            bound,
            emitted: None,
        };

        let route = join_route(ctx.base_path, ctx.prefix, op.path.as_deref());
        let variables = route_variables(op, &route)?;
        let params = merge_parameters(op, ctx.chain, &outcome.bound)?;
        for param in params.iter().filter(|p| p.source == ParamSource::Path) {
            if !variables.contains(&param.key) {
                return Err(GenerationError::UnresolvedParameterBinding {
                    operation: op.identity(),
                    parameter: param.name.clone(),
                    reason: format!("path variable `{{{}}}` does not occur in `{route}`", param.key),
                });
            }
        }

        if outcome.resource {
            note_unbound_variables(info, outcome.bound.iter().map(|p| &p.ty), notes);
            debug!(
                class = %class.name(),
                operation = %op.identity(),
                resource = %outcome.return_type,
                "resource locator"
            );
            return Ok(outcome);
        }

        let Some(verb) = op.http_method.as_ref() else {
            notes.push(GenerationNote::new(
                NoteKind::NonRoutableOperation,
                op.identity(),
                "terminal operation has no HTTP method; no endpoint generated",
            ));
            return Ok(outcome);
        };

        note_unbound_variables(
            info,
            outcome
                .bound
                .iter()
                .map(|p| &p.ty)
                .chain(std::iter::once(&outcome.return_type)),
            notes,
        );
        class
            .register_route(verb.as_str(), &route, &op.identity())
            .map_err(|existing| GenerationError::ConflictingRoutePath {
                operation: op.identity(),
                existing,
                verb: verb.to_string(),
                route: route.clone(),
            })?;

        let doc = self.documentation.get(&op.identity());
        let summary = doc
            .and_then(|d| d.summary.clone())
            .unwrap_or_else(|| ctx.default_summary.to_string());
        let description = doc.and_then(|d| d.description.clone()).unwrap_or_default();

        let name = class.unique_method_name(&method_ident(&op.name));
        let calls = ctx
            .chain
            .entries()
            .into_iter()
            .map(|entry| call_step(&entry.operation, &entry.args))
            .chain(std::iter::once(call_step(&op.name, &outcome.bound)))
            .collect();

        debug!(
            class = %class.name(),
            operation = %op.identity(),
            verb = %verb,
            route = %route,
            method = %name,
            "generated endpoint"
        );
        class.method(MethodDecl {
            name: name.clone(),
            verb: verb.to_string(),
            route: route.clone(),
            params: params.iter().map(method_param).collect(),
            return_type: outcome.return_type.clone(),
            decorations: vec![
                Decoration::new(verb.as_str().to_ascii_lowercase()),
                Decoration::new("route").param("path", route),
                Decoration::new("api_operation")
                    .param("value", summary)
                    .param("notes", description),
            ],
            calls,
        });
        outcome.emitted = Some(name);
        Ok(outcome)
    }
}

/// Chain arguments (ancestors first) followed by the operation's own
///
/// Parameters are identified by their emitted identifier, so `orderId` and
/// `order_id` are the same parameter. One shared by several levels is kept
/// once as long as source, key and type agree.
fn merge_parameters(
    op: &OperationDescriptor,
    chain: &InvocationChain,
    own: &[BoundParameter],
) -> Result<Vec<BoundParameter>, GenerationError> {
    let mut merged: Vec<BoundParameter> = Vec::new();
    let levels = chain
        .entries()
        .into_iter()
        .map(|entry| (format!("{}#{}", entry.owner, entry.operation), entry.args.as_slice()))
        .chain(std::iter::once((op.identity(), own)));
    for (owner, args) in levels {
        for arg in args {
            let ident = method_ident(&arg.name);
            match merged.iter().find(|p| method_ident(&p.name) == ident).cloned() {
                Some(existing)
                    if existing.source == arg.source
                        && existing.key == arg.key
                        && existing.ty == arg.ty => {}
                Some(existing) => {
                    return Err(GenerationError::UnresolvedParameterBinding {
                        operation: op.identity(),
                        parameter: arg.name.clone(),
                        reason: format!(
                            "`{ident}` is bound as {} `{}`: {} in {owner}, but as {} `{}`: {} by `{}`",
                            arg.source, arg.key, arg.ty, existing.source, existing.key, existing.ty, existing.name
                        ),
                    });
                }
                None => merged.push(arg.clone()),
            }
        }
    }
    let bodies = merged
        .iter()
        .filter(|p| p.source == ParamSource::Body)
        .count();
    if bodies > 1 {
        let last = merged
            .iter()
            .rev()
            .find(|p| p.source == ParamSource::Body)
            .map(|p| p.name.clone())
            .unwrap_or_default();
        return Err(GenerationError::UnresolvedParameterBinding {
            operation: op.identity(),
            parameter: last,
            reason: "more than one request body along the invocation chain".to_string(),
        });
    }
    Ok(merged)
}

/// Note type variables of `info`'s declaring type left in a generated signature
fn note_unbound_variables<'t>(
    info: &ReturnTypeInfo,
    types: impl Iterator<Item = &'t TypeRef>,
    notes: &mut Vec<GenerationNote>,
) {
    let types: Vec<&TypeRef> = types.collect();
    let unbound: Vec<&str> = info
        .unbound_vars()
        .iter()
        .filter(|var| types.iter().any(|ty| ty.mentions(var)))
        .map(String::as_str)
        .collect();
    if unbound.is_empty() {
        return;
    }
    notes.push(GenerationNote::new(
        NoteKind::UnboundTypeVariable,
        info.operation().identity(),
        format!(
            "type variable(s) {} have no binding; give the locator a concrete return type",
            unbound.join(", ")
        ),
    ));
}

fn method_param(param: &BoundParameter) -> MethodParam {
    let binding = match param.source {
        ParamSource::Body => Decoration::new(param.source.decoration_name()),
        source => Decoration::new(source.decoration_name()).param("value", param.key.clone()),
    };
    MethodParam {
        ident: method_ident(&param.name),
        ty: param.ty.clone(),
        binding,
    }
}

fn call_step(operation: &str, args: &[BoundParameter]) -> CallStep {
    CallStep {
        method: method_ident(operation),
        args: args.iter().map(|a| method_ident(&a.name)).collect(),
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::docs::OperationDoc;
    use crate::generator::compose::extend;
    use crate::generator::return_type::resolve_operations;
    use crate::introspect::Catalog;

    const CATALOG: &str = r#"
types:
  - name: Shop
    path: /shop
    operations:
      - name: order
        path: /orders/{id}
        params: [{ name: id, type: String, source: path }]
        returns: OrderResource
      - name: status
        method: GET
        path: /status
        returns: String
      - name: helper
        returns: String
      - name: broken
        method: GET
        path: /broken
        params: [{ name: id, type: String, source: path }]
      - name: statusAgain
        method: GET
        path: /status/
        returns: String
  - name: OrderResource
    operations:
      - { name: get, method: GET, returns: OrderDto }
      - name: update
        method: PUT
        params: [{ name: dto, type: OrderDto }]
        returns: OrderDto
  - name: OrderDto
    kind: model
"#;

    fn info(catalog: &Catalog, owner: &str, name: &str) -> ReturnTypeInfo {
        let mut notes = Vec::new();
        resolve_operations(catalog.operations(owner), None, &[], &mut notes)
            .into_values()
            .find(|i| i.operation().name == name)
            .unwrap()
    }

    fn ctx<'a>(prefix: &'a PathPrefix, chain: &'a InvocationChain) -> MethodContext<'a> {
        MethodContext {
            base_path: "/shop",
            prefix,
            chain,
            default_summary: "Shop",
        }
    }

    #[test]
    fn test_terminal_operation_emits_method() {
        let catalog = Catalog::from_yaml_str(CATALOG).unwrap();
        let mut docs = DocumentationModel::default();
        docs.insert(
            "Shop#status",
            OperationDoc {
                summary: Some("Health".into()),
                description: Some("Reports status".into()),
            },
        );
        let step = MethodStep::new(&catalog, &docs);
        let mut class = ClassBuilder::new("ShopApi", "ShopImpl");
        let mut notes = Vec::new();
        let (prefix, chain) = (PathPrefix::root(), InvocationChain::empty());
        let outcome = step
            .create(&mut class, &info(&catalog, "Shop", "status"), &ctx(&prefix, &chain), &mut notes)
            .unwrap();
        assert!(!outcome.resource);
        assert_eq!(outcome.emitted.as_deref(), Some("status"));

        let decl = class.build();
        let method = &decl.methods[0];
        assert_eq!(method.route, "/shop/status");
        assert_eq!(method.verb, "GET");
        assert_eq!(method.decorations[0].name, "get");
        assert_eq!(method.decorations[1].get("path"), Some("/shop/status"));
        assert_eq!(method.decorations[2].get("value"), Some("Health"));
        assert_eq!(method.decorations[2].get("notes"), Some("Reports status"));
    }

    #[test]
    fn test_resource_operation_emits_nothing() {
        let catalog = Catalog::from_yaml_str(CATALOG).unwrap();
        let docs = DocumentationModel::default();
        let step = MethodStep::new(&catalog, &docs);
        let mut class = ClassBuilder::new("ShopApi", "ShopImpl");
        let mut notes = Vec::new();
        let (prefix, chain) = (PathPrefix::root(), InvocationChain::empty());
        let outcome = step
            .create(&mut class, &info(&catalog, "Shop", "order"), &ctx(&prefix, &chain), &mut notes)
            .unwrap();
        assert!(outcome.resource);
        assert_eq!(outcome.type_name.as_deref(), Some("OrderResource"));
        assert_eq!(outcome.bound.len(), 1);
        assert!(outcome.emitted.is_none());
        assert!(class.build().methods.is_empty());
    }

    #[test]
    fn test_verbless_terminal_is_skipped_with_note() {
        let catalog = Catalog::from_yaml_str(CATALOG).unwrap();
        let docs = DocumentationModel::default();
        let step = MethodStep::new(&catalog, &docs);
        let mut class = ClassBuilder::new("ShopApi", "ShopImpl");
        let mut notes = Vec::new();
        let (prefix, chain) = (PathPrefix::root(), InvocationChain::empty());
        let outcome = step
            .create(&mut class, &info(&catalog, "Shop", "helper"), &ctx(&prefix, &chain), &mut notes)
            .unwrap();
        assert!(outcome.emitted.is_none());
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].kind, NoteKind::NonRoutableOperation);
        assert_eq!(notes[0].operation, "Shop#helper");
    }

    #[test]
    fn test_path_parameter_missing_from_route() {
        let catalog = Catalog::from_yaml_str(CATALOG).unwrap();
        let docs = DocumentationModel::default();
        let step = MethodStep::new(&catalog, &docs);
        let mut class = ClassBuilder::new("ShopApi", "ShopImpl");
        let mut notes = Vec::new();
        let (prefix, chain) = (PathPrefix::root(), InvocationChain::empty());
        let err = step
            .create(&mut class, &info(&catalog, "Shop", "broken"), &ctx(&prefix, &chain), &mut notes)
            .unwrap_err();
        assert!(matches!(
            err,
            GenerationError::UnresolvedParameterBinding { ref parameter, .. } if parameter == "id"
        ));
    }

    #[test]
    fn test_same_route_twice_conflicts() {
        let catalog = Catalog::from_yaml_str(CATALOG).unwrap();
        let docs = DocumentationModel::default();
        let step = MethodStep::new(&catalog, &docs);
        let mut class = ClassBuilder::new("ShopApi", "ShopImpl");
        let mut notes = Vec::new();
        let (prefix, chain) = (PathPrefix::root(), InvocationChain::empty());
        let c = ctx(&prefix, &chain);
        step.create(&mut class, &info(&catalog, "Shop", "status"), &c, &mut notes)
            .unwrap();
        let err = step
            .create(&mut class, &info(&catalog, "Shop", "statusAgain"), &c, &mut notes)
            .unwrap_err();
        match err {
            GenerationError::ConflictingRoutePath {
                operation,
                existing,
                route,
                ..
            } => {
                assert_eq!(operation, "Shop#statusAgain");
                assert_eq!(existing, "Shop#status");
                assert_eq!(route, "/shop/status");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_nested_method_walks_chain() {
        let catalog = Catalog::from_yaml_str(CATALOG).unwrap();
        let docs = DocumentationModel::default();
        let step = MethodStep::new(&catalog, &docs);
        let mut class = ClassBuilder::new("ShopApi", "ShopImpl");
        let mut notes = Vec::new();

        let locator = info(&catalog, "Shop", "order");
        let root_prefix = PathPrefix::root();
        let root_chain = InvocationChain::empty();
        let outcome = step
            .create(&mut class, &locator, &ctx(&root_prefix, &root_chain), &mut notes)
            .unwrap();
        let prefix = crate::generator::compose::compose(&root_prefix, locator.operation());
        let chain = extend(&root_chain, locator.operation(), outcome.bound, outcome.return_type);

        step.create(&mut class, &info(&catalog, "OrderResource", "update"), &ctx(&prefix, &chain), &mut notes)
            .unwrap();
        let decl = class.build();
        let method = &decl.methods[0];
        assert_eq!(method.route, "/shop/orders/{id}");
        assert_eq!(method.name, "update");
        let idents: Vec<_> = method.params.iter().map(|p| p.ident.as_str()).collect();
        assert_eq!(idents, vec!["id", "dto"]);
        assert_eq!(method.params[0].binding.name, "path");
        assert_eq!(method.params[1].binding.name, "body");
        let calls: Vec<_> = method.calls.iter().map(|c| c.method.as_str()).collect();
        assert_eq!(calls, vec!["order", "update"]);
        assert_eq!(method.calls[0].args, vec!["id".to_string()]);
        assert_eq!(method.decorations[2].get("value"), Some("Shop"));
    }
}
