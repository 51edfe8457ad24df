//! Shared registry of service descriptors for one generation run.
//!
//! Every root service and every nested resource discovered while walking the
//! operation graph gets exactly one [`ServiceDescriptor`]. Descriptors live in
//! an arena owned by [`ModelRepository`] and are addressed by [`ServiceId`].
//! Root services always get a fresh entry built from their own declaration;
//! nested resources are looked up or inserted by declared type name.

use crate::docs::DocumentationModel;
use std::collections::BTreeMap;
use std::rc::Rc;

/// Handle to a descriptor stored in a [`ModelRepository`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ServiceId(usize);

impl ServiceId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Documentation-level description of one REST service or nested resource
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceDescriptor {
    /// Declared interface type
    pub type_name: String,
    /// Implementation type, when one is declared
    pub implementation: Option<String>,
    /// Top-level route; `None` for nested resources, which are only
    /// reachable through their parent's path
    pub base_path: Option<String>,
    pub display_name: String,
    pub tags: Vec<String>,
    pub description: Option<String>,
}

impl ServiceDescriptor {
    /// Descriptor for a root service
    pub fn root(
        type_name: impl Into<String>,
        implementation: impl Into<String>,
        base_path: impl Into<String>,
        display_name: impl Into<String>,
    ) -> Self {
        let display_name = display_name.into();
        ServiceDescriptor {
            type_name: type_name.into(),
            implementation: Some(implementation.into()),
            base_path: Some(base_path.into()),
            description: Some(display_name.clone()),
            display_name,
            tags: Vec::new(),
        }
    }

    /// Descriptor for a resource reached through a parent operation
    pub fn nested(
        type_name: impl Into<String>,
        implementation: Option<String>,
        tags: Vec<String>,
    ) -> Self {
        let type_name = type_name.into();
        ServiceDescriptor {
            display_name: type_name.clone(),
            type_name,
            implementation,
            base_path: None,
            tags,
            description: None,
        }
    }
}

/// Arena of service descriptors plus the documentation model
#[derive(Debug, Default)]
pub struct ModelRepository {
    services: Vec<ServiceDescriptor>,
    by_type: BTreeMap<String, ServiceId>,
    documentation: Rc<DocumentationModel>,
}

impl ModelRepository {
    pub fn new(documentation: DocumentationModel) -> Self {
        ModelRepository {
            services: Vec::new(),
            by_type: BTreeMap::new(),
            documentation: Rc::new(documentation),
        }
    }

    /// Add the descriptor of a root service
    ///
    /// Every root service owns its entry, even when another root shares its
    /// interface or the interface is also reached as a nested resource.
    pub fn register_root(&mut self, descriptor: ServiceDescriptor) -> ServiceId {
        let id = ServiceId(self.services.len());
        self.services.push(descriptor);
        id
    }

    /// Return the nested-resource descriptor for `type_name`, creating it on first use
    ///
    /// `make` only runs when the type has not been registered yet, so a
    /// resource reached through several parents keeps its first descriptor.
    pub fn register(
        &mut self,
        type_name: &str,
        make: impl FnOnce() -> ServiceDescriptor,
    ) -> ServiceId {
        if let Some(id) = self.by_type.get(type_name) {
            return *id;
        }
        let id = ServiceId(self.services.len());
        self.services.push(make());
        self.by_type.insert(type_name.to_string(), id);
        id
    }

    /// Nested-resource descriptor registered for `type_name`
    pub fn lookup(&self, type_name: &str) -> Option<ServiceId> {
        self.by_type.get(type_name).copied()
    }

    /// Descriptor behind `id`
    ///
    /// Ids are only minted by [`ModelRepository::register`], so every id
    /// handed out by this repository resolves.
    pub fn get(&self, id: ServiceId) -> &ServiceDescriptor {
        &self.services[id.0]
    }

    /// Descriptors in registration order
    pub fn services(&self) -> impl Iterator<Item = (ServiceId, &ServiceDescriptor)> {
        self.services
            .iter()
            .enumerate()
            .map(|(i, s)| (ServiceId(i), s))
    }

    pub fn len(&self) -> usize {
        self.services.len()
    }

    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }

    /// Shared handle to the documentation model
    ///
    /// The model is read-only while descriptors are being registered, so the
    /// traversal keeps its own handle next to `&mut self`.
    pub fn documentation(&self) -> Rc<DocumentationModel> {
        Rc::clone(&self.documentation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_is_idempotent() {
        let mut repo = ModelRepository::default();
        let first = repo.register("OrderResource", || {
            ServiceDescriptor::nested("OrderResource", None, vec!["Orders".into()])
        });
        let second = repo.register("OrderResource", || {
            ServiceDescriptor::nested("OrderResource", None, vec!["Other".into()])
        });
        assert_eq!(first, second);
        assert_eq!(repo.len(), 1);
        assert_eq!(repo.get(first).tags, vec!["Orders".to_string()]);
    }

    #[test]
    fn test_root_never_aliases_nested_entry() {
        let mut repo = ModelRepository::default();
        let nested = repo.register("Files", || {
            ServiceDescriptor::nested("Files", None, vec!["Other".into()])
        });
        let first = repo.register_root(ServiceDescriptor::root("Files", "Files", "/files", "First"));
        let second = repo.register_root(ServiceDescriptor::root("Files", "Files", "/v2/files", "Second"));
        assert_ne!(first, nested);
        assert_ne!(first, second);
        assert_eq!(repo.lookup("Files"), Some(nested));
        assert_eq!(repo.get(first).display_name, "First");
        assert_eq!(repo.get(second).base_path.as_deref(), Some("/v2/files"));
        assert!(repo.get(nested).base_path.is_none());
        assert_eq!(repo.len(), 3);
    }

    #[test]
    fn test_nested_descriptor_has_no_path() {
        let nested = ServiceDescriptor::nested("ItemResource", Some("ItemImpl".into()), vec![]);
        assert!(nested.base_path.is_none());
        let root = ServiceDescriptor::root("OrderService", "OrderServiceImpl", "/orders", "Orders");
        assert_eq!(root.base_path.as_deref(), Some("/orders"));
        assert_eq!(root.description.as_deref(), Some("Orders"));
    }

    #[test]
    fn test_services_in_registration_order() {
        let mut repo = ModelRepository::default();
        repo.register("B", || ServiceDescriptor::nested("B", None, vec![]));
        repo.register("A", || ServiceDescriptor::nested("A", None, vec![]));
        let names: Vec<_> = repo.services().map(|(_, s)| s.type_name.as_str()).collect();
        assert_eq!(names, vec!["B", "A"]);
        assert_eq!(repo.lookup("A").map(ServiceId::index), Some(1));
    }
}
