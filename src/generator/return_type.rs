use std::collections::BTreeMap;

use tracing::debug;

use super::error::{GenerationNote, NoteKind};
use crate::introspect::{OperationDescriptor, OperationKey, TypeIntrospector, TypeRef};

/// Where a resolved return type came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReturnSource {
    Interface,
    Implementation,
}

/// An interface operation with its merged return type
///
/// Starts out with the interface-declared type; [`apply_implementation`]
/// refines it once from the matching implementation operation.
///
/// [`apply_implementation`]: ReturnTypeInfo::apply_implementation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReturnTypeInfo {
    operation: OperationDescriptor,
    resolved: TypeRef,
    source: ReturnSource,
    implementation: Option<String>,
    /// Type variables of the declaring type left without a binding
    unbound: Vec<String>,
}

/// Operations of one service or resource in deterministic key order
pub type OperationMap = BTreeMap<OperationKey, ReturnTypeInfo>;

impl ReturnTypeInfo {
    pub fn new(operation: OperationDescriptor) -> Self {
        ReturnTypeInfo {
            resolved: operation.returns.clone(),
            operation,
            source: ReturnSource::Interface,
            implementation: None,
            unbound: Vec::new(),
        }
    }

    /// Merge in the implementation operation that matches this one
    ///
    /// An implementation operation matches when it has the same name and
    /// arity and each of its parameter types is the interface's type or a
    /// specialization of it. Its return type wins only when it refines the
    /// declared one; otherwise the declared type stays.
    pub fn apply_implementation(
        mut self,
        implementation: &[OperationDescriptor],
        type_vars: &[String],
    ) -> Self {
        self.unbound = type_vars.to_vec();
        let matched = implementation.iter().find(|candidate| {
            candidate.name == self.operation.name
                && candidate.params.len() == self.operation.params.len()
                && candidate
                    .params
                    .iter()
                    .zip(&self.operation.params)
                    .all(|(c, d)| c.ty.is_specialization_of(&d.ty, type_vars))
        });
        if let Some(candidate) = matched {
            self.implementation = Some(candidate.owner.clone());
            if candidate.returns.refines(&self.operation.returns, type_vars) {
                debug!(
                    operation = %self.operation.identity(),
                    declared = %self.operation.returns,
                    resolved = %candidate.returns,
                    "implementation refines return type"
                );
                self.resolved = candidate.returns.clone();
                self.source = ReturnSource::Implementation;
            }
        }
        self
    }

    pub fn operation(&self) -> &OperationDescriptor {
        &self.operation
    }

    /// Type declared on the interface
    pub fn declared(&self) -> &TypeRef {
        &self.operation.returns
    }

    /// Merged return type
    pub fn resolved(&self) -> &TypeRef {
        &self.resolved
    }

    pub fn source(&self) -> ReturnSource {
        self.source
    }

    /// Type variables that no generic argument bound
    pub fn unbound_vars(&self) -> &[String] {
        &self.unbound
    }

    /// Implementation type whose operation matched, if any
    pub fn implementation(&self) -> Option<&str> {
        self.implementation.as_deref()
    }
}

/// Build the operation map for one interface
///
/// `implementation` is `None` when the interface has no implementation at
/// all; only when one exists is an unmatched operation worth a note.
pub fn resolve_operations(
    interface: &[OperationDescriptor],
    implementation: Option<&[OperationDescriptor]>,
    type_vars: &[String],
    notes: &mut Vec<GenerationNote>,
) -> OperationMap {
    interface
        .iter()
        .map(|op| {
            let info = ReturnTypeInfo::new(op.clone())
                .apply_implementation(implementation.unwrap_or(&[]), type_vars);
            if implementation.is_some() && info.implementation().is_none() {
                notes.push(GenerationNote::new(
                    NoteKind::MissingImplementationMatch,
                    op.identity(),
                    format!("no implementation operation matches; using declared `{}`", op.returns),
                ));
            }
            (op.key(), info)
        })
        .collect()
}

/// Resolve the operations of a resource reached through `resource_type`
///
/// Generic arguments of `resource_type` are bound to the resource's type
/// variables and substituted into the interface operations before merging,
/// so `Resource<Order>` yields `Order` where `Resource<T>` declares `T`.
/// Wildcard arguments leave their variable unbound.
pub fn resource_operations<I: TypeIntrospector + ?Sized>(
    introspector: &I,
    resource_type: &TypeRef,
    notes: &mut Vec<GenerationNote>,
) -> OperationMap {
    let Some(name) = resource_type.base_name() else {
        return OperationMap::new();
    };
    let Some(decl) = introspector.type_decl(name) else {
        return OperationMap::new();
    };

    let mut bindings = BTreeMap::new();
    if decl.type_params.len() == resource_type.args().len() {
        for (var, arg) in decl.type_params.iter().zip(resource_type.args()) {
            if *arg != TypeRef::Wildcard {
                bindings.insert(var.clone(), arg.clone());
            }
        }
    }
    let unbound: Vec<String> = decl
        .type_params
        .iter()
        .filter(|v| !bindings.contains_key(*v))
        .cloned()
        .collect();

    let interface: Vec<OperationDescriptor> = decl
        .operations
        .iter()
        .map(|op| {
            let mut op = op.clone();
            op.returns = op.returns.substitute(&bindings);
            for param in &mut op.params {
                param.ty = param.ty.substitute(&bindings);
            }
            op
        })
        .collect();

    let implementation = introspector
        .implementation_of(name)
        .map(|t| t.operations.as_slice());
    resolve_operations(&interface, implementation, &unbound, notes)
}
