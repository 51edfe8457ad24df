//! Documentation model and tag lookup.
//!
//! The documentation model maps operation identities (`Owner#operation`) to a
//! summary and description. It is read-only during generation and any entry
//! may be absent. Tags group services in the rendered documentation; the
//! [`TagRepository`] trait hides where they come from.

use crate::model::ServiceDescriptor;
use anyhow::Context;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

/// Summary and description of one operation
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct OperationDoc {
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// Operation documentation keyed by operation identity
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DocumentationModel {
    #[serde(default)]
    operations: BTreeMap<String, OperationDoc>,
}

impl DocumentationModel {
    pub fn get(&self, identity: &str) -> Option<&OperationDoc> {
        self.operations.get(identity)
    }

    pub fn insert(&mut self, identity: impl Into<String>, doc: OperationDoc) {
        self.operations.insert(identity.into(), doc);
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }
}

/// Load a documentation model from YAML (`.yaml`/`.yml`) or JSON
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub fn load_documentation(path: &Path) -> anyhow::Result<DocumentationModel> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read documentation model: {}", path.display()))?;
    let model = if path
        .extension()
        .map(|s| s == "yaml" || s == "yml")
        .unwrap_or(false)
    {
        serde_yaml::from_str(&content)?
    } else {
        serde_json::from_str(&content)?
    };
    Ok(model)
}

/// Source of documentation grouping tags
pub trait TagRepository {
    fn lookup(&self, service: &ServiceDescriptor) -> Vec<String>;
}

/// Tags taken from the generator configuration
///
/// Services without an entry are tagged with their display name.
#[derive(Debug, Clone, Default)]
pub struct ConfiguredTags {
    tags: BTreeMap<String, Vec<String>>,
}

impl ConfiguredTags {
    pub fn new(tags: BTreeMap<String, Vec<String>>) -> Self {
        ConfiguredTags { tags }
    }
}

impl TagRepository for ConfiguredTags {
    fn lookup(&self, service: &ServiceDescriptor) -> Vec<String> {
        self.tags
            .get(&service.type_name)
            .filter(|tags| !tags.is_empty())
            .cloned()
            .unwrap_or_else(|| vec![service.display_name.clone()])
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn test_documentation_model_from_yaml() {
        let model: DocumentationModel = serde_yaml::from_str(
            r#"
operations:
  "OrderResource#get":
    summary: Get an order
    description: Returns one order.
"#,
        )
        .unwrap();
        let doc = model.get("OrderResource#get").unwrap();
        assert_eq!(doc.summary.as_deref(), Some("Get an order"));
        assert!(model.get("OrderResource#delete").is_none());
    }

    #[test]
    fn test_configured_tags_fall_back_to_display_name() {
        let mut map = BTreeMap::new();
        map.insert("OrderService".to_string(), vec!["Sales".to_string()]);
        let tags = ConfiguredTags::new(map);
        let orders = ServiceDescriptor::root("OrderService", "OrderServiceImpl", "/orders", "Orders");
        let users = ServiceDescriptor::root("UserService", "UserServiceImpl", "/users", "Users");
        assert_eq!(tags.lookup(&orders), vec!["Sales".to_string()]);
        assert_eq!(tags.lookup(&users), vec!["Users".to_string()]);
    }
}
