use tracing::{debug, info};

use super::compose::{compose, extend, join_route, InvocationChain, PathPrefix};
use super::error::{GenerationError, GenerationNote};
use super::method::{MethodContext, MethodStep};
use super::naming::{method_ident, to_camel_case};
use super::return_type::{resolve_operations, resource_operations, OperationMap};
use crate::config::GeneratorConfig;
use crate::docs::TagRepository;
use crate::emit::{ClassBuilder, ClassDecl, ConstructorDecl, ConstructorParam, Decoration};
use crate::introspect::{RootService, TypeIntrospector};
use crate::model::{ModelRepository, ServiceDescriptor, ServiceId};

/// Result of generating one root service
#[derive(Debug, Clone)]
pub struct GeneratedService {
    /// Descriptor of the root service in the repository
    pub service: ServiceId,
    pub class: ClassDecl,
    pub notes: Vec<GenerationNote>,
}

/// Walks a root service and every resource nested below it
pub struct ServiceGenerator<'a, I: ?Sized, T: ?Sized> {
    introspector: &'a I,
    tags: &'a T,
    max_depth: usize,
    class_suffix: String,
}

/// Traversal state of one level of the resource tree
struct Level {
    service: ServiceId,
    operations: OperationMap,
    prefix: PathPrefix,
    chain: InvocationChain,
    /// Resource types from the root down to this level
    ancestors: Vec<String>,
}

/// State shared by every level of one root service
struct Walk<'s, 'a, I: ?Sized> {
    class: ClassBuilder,
    step: MethodStep<'a, I>,
    base_path: &'s str,
    default_summary: &'s str,
    notes: Vec<GenerationNote>,
}

impl<'a, I, T> ServiceGenerator<'a, I, T>
where
    I: TypeIntrospector + ?Sized,
    T: TagRepository + ?Sized,
{
    pub fn new(introspector: &'a I, tags: &'a T, config: &GeneratorConfig) -> Self {
        ServiceGenerator {
            introspector,
            tags,
            max_depth: config.max_depth,
            class_suffix: config.class_suffix.clone(),
        }
    }

    /// Generate the class for `root`, registering every descriptor it reaches
    ///
    /// # Errors
    ///
    /// The first [`GenerationError`] met anywhere in the tree; nothing of the
    /// class is returned in that case.
    pub fn generate(
        &self,
        repository: &mut ModelRepository,
        root: &RootService,
    ) -> Result<GeneratedService, GenerationError> {
        let context = format!("service `{}`", root.name);
        let interface = self.introspector.type_decl(&root.interface).ok_or_else(|| {
            GenerationError::UnknownType {
                name: root.interface.clone(),
                context: context.clone(),
            }
        })?;
        let implementation = match &root.implementation {
            Some(name) => Some(self.introspector.type_decl(name).ok_or_else(|| {
                GenerationError::UnknownType {
                    name: name.clone(),
                    context: context.clone(),
                }
            })?),
            None => self.introspector.implementation_of(&interface.name),
        };
        let inner = implementation.map_or(interface.name.as_str(), |t| t.name.as_str());
        let base_path = root
            .path
            .clone()
            .or_else(|| interface.path.clone())
            .unwrap_or_default();

        let mut descriptor =
            ServiceDescriptor::root(&interface.name, inner, base_path.as_str(), root.name.as_str());
        descriptor.tags = self.tags.lookup(&descriptor);

        let class_name = root
            .class_name
            .clone()
            .unwrap_or_else(|| format!("{}{}", to_camel_case(inner), self.class_suffix));
        let mut class = ClassBuilder::new(class_name, inner);
        class.annotate(
            Decoration::new("route").param("path", join_route(&base_path, &PathPrefix::root(), None)),
        );
        class.annotate(
            Decoration::new("api")
                .param("value", descriptor.display_name.clone())
                .list("tags", descriptor.tags.clone()),
        );
        let constructors = implementation
            .map(|t| self.introspector.constructors(&t.name))
            .unwrap_or(&[]);
        if constructors.is_empty() {
            class.constructor(ConstructorDecl {
                name: "new".to_string(),
                params: Vec::new(),
            });
        }
        for ctor in constructors {
            let mut params: Vec<ConstructorParam> = Vec::with_capacity(ctor.params.len());
            for p in &ctor.params {
                let ident = method_ident(&p.name);
                if let Some(clash) = params.iter().find(|existing| existing.ident == ident) {
                    return Err(GenerationError::UnresolvedParameterBinding {
                        operation: format!("{inner}#{}", ctor.name),
                        parameter: p.name.clone(),
                        reason: format!("identifier `{}` is already used by another parameter", clash.ident),
                    });
                }
                params.push(ConstructorParam {
                    ident,
                    ty: p.ty.clone(),
                });
            }
            class.constructor(ConstructorDecl {
                name: method_ident(&ctor.name),
                params,
            });
        }

        let mut notes = Vec::new();
        let operations = resolve_operations(
            self.introspector.operations(&interface.name),
            implementation.map(|t| self.introspector.operations(&t.name)),
            &interface.type_params,
            &mut notes,
        );

        let service = repository.register_root(descriptor.clone());
        let documentation = repository.documentation();
        let mut walk = Walk {
            class,
            step: MethodStep::new(self.introspector, documentation.as_ref()),
            base_path: &base_path,
            default_summary: &descriptor.display_name,
            notes,
        };
        self.generate_methods(
            &mut walk,
            repository,
            Level {
                service,
                operations,
                prefix: PathPrefix::root(),
                chain: InvocationChain::empty(),
                ancestors: vec![interface.name.clone()],
            },
        )?;

        let class = walk.class.build();
        info!(
            service = %root.name,
            class = %class.name,
            methods = class.methods.len(),
            notes = walk.notes.len(),
            "generated service"
        );
        Ok(GeneratedService {
            service,
            class,
            notes: walk.notes,
        })
    }

    fn generate_methods(
        &self,
        walk: &mut Walk<'_, '_, I>,
        repository: &mut ModelRepository,
        level: Level,
    ) -> Result<(), GenerationError> {
        for info in level.operations.values() {
            let ctx = MethodContext {
                base_path: walk.base_path,
                prefix: &level.prefix,
                chain: &level.chain,
                default_summary: walk.default_summary,
            };
            let outcome = walk.step.create(&mut walk.class, info, &ctx, &mut walk.notes)?;
            if !outcome.resource {
                continue;
            }
            let operation = info.operation();
            let Some(resource) = outcome.type_name.clone() else {
                continue;
            };

            if level.ancestors.contains(&resource) {
                return Err(GenerationError::CyclicResource {
                    operation: operation.identity(),
                    resource,
                    path: level.ancestors.clone(),
                });
            }
            let depth = level.chain.len() + 1;
            if depth > self.max_depth {
                return Err(GenerationError::DepthLimitExceeded {
                    operation: operation.identity(),
                    max_depth: self.max_depth,
                });
            }

            let tags = repository.get(level.service).tags.clone();
            let implementation = self
                .introspector
                .implementation_of(&resource)
                .map(|t| t.name.clone());
            let child = repository.register(&resource, || {
                ServiceDescriptor::nested(resource.as_str(), implementation, tags)
            });
            debug!(
                operation = %operation.identity(),
                resource = %resource,
                depth,
                "descending into resource"
            );

            let mut ancestors = level.ancestors.clone();
            ancestors.push(resource);
            let next = Level {
                service: child,
                operations: resource_operations(self.introspector, &outcome.return_type, &mut walk.notes),
                prefix: compose(&level.prefix, operation),
                chain: extend(&level.chain, operation, outcome.bound, outcome.return_type),
                ancestors,
            };
            self.generate_methods(walk, repository, next)?;
        }
        Ok(())
    }
}

