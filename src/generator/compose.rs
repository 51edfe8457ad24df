use std::fmt;
use std::rc::Rc;

use super::binding::BoundParameter;
use crate::introspect::{OperationDescriptor, TypeRef};

/// Route segments composed from the root down to the current depth
///
/// Values are never mutated; [`compose`] returns a new prefix so sibling
/// operations each start from their parent's prefix.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathPrefix {
    segments: Vec<String>,
}

impl PathPrefix {
    pub fn root() -> Self {
        PathPrefix::default()
    }

    /// A new prefix with `fragment` appended; empty fragments add nothing
    pub fn join(&self, fragment: Option<&str>) -> PathPrefix {
        let mut segments = self.segments.clone();
        segments.extend(split_segments(fragment.unwrap_or("")));
        PathPrefix { segments }
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// The prefix as a route (`/` when empty)
    pub fn as_path(&self) -> String {
        join_route("", self, None)
    }
}

impl fmt::Display for PathPrefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_path())
    }
}

fn split_segments(path: &str) -> impl Iterator<Item = String> + '_ {
    path.split('/')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
}

/// Join `base + prefix + fragment` into one route
///
/// Segments are separated by a single `/`, the result always starts with
/// `/` and never ends with one (except the bare root `/`).
pub fn join_route(base: &str, prefix: &PathPrefix, fragment: Option<&str>) -> String {
    let segments: Vec<String> = split_segments(base)
        .chain(prefix.segments.iter().cloned())
        .chain(split_segments(fragment.unwrap_or("")))
        .collect();
    format!("/{}", segments.join("/"))
}

/// Prefix seen by the operations of the resource `operation` returns
pub fn compose(parent: &PathPrefix, operation: &OperationDescriptor) -> PathPrefix {
    parent.join(operation.path.as_deref())
}

/// One resource-locator call on the way from the root to a nested method
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParentInvocation {
    pub owner: String,
    pub operation: String,
    /// Arguments the locator is called with
    pub args: Vec<BoundParameter>,
    /// Resource type the call yields
    pub produces: TypeRef,
}

#[derive(Debug)]
struct ChainNode {
    entry: ParentInvocation,
    parent: Option<Rc<ChainNode>>,
    len: usize,
}

/// Persistent list of [`ParentInvocation`]s
///
/// Extending a chain shares the parent's entries; siblings extended from the
/// same parent never observe each other.
#[derive(Debug, Clone, Default)]
pub struct InvocationChain {
    head: Option<Rc<ChainNode>>,
}

impl InvocationChain {
    pub fn empty() -> Self {
        InvocationChain::default()
    }

    pub fn len(&self) -> usize {
        self.head.as_ref().map_or(0, |node| node.len)
    }

    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    /// A new chain with `entry` appended
    pub fn push(&self, entry: ParentInvocation) -> InvocationChain {
        let len = self.len() + 1;
        InvocationChain {
            head: Some(Rc::new(ChainNode {
                entry,
                parent: self.head.clone(),
                len,
            })),
        }
    }

    /// Entries from the root service down to the innermost locator
    pub fn entries(&self) -> Vec<&ParentInvocation> {
        let mut entries = Vec::with_capacity(self.len());
        let mut node = self.head.as_deref();
        while let Some(current) = node {
            entries.push(&current.entry);
            node = current.parent.as_deref();
        }
        entries.reverse();
        entries
    }

    /// Arguments of every locator, ancestors first
    pub fn arguments(&self) -> Vec<&BoundParameter> {
        self.entries()
            .into_iter()
            .flat_map(|entry| entry.args.iter())
            .collect()
    }
}

impl PartialEq for InvocationChain {
    fn eq(&self, other: &Self) -> bool {
        self.entries() == other.entries()
    }
}

impl Eq for InvocationChain {}

/// Chain seen by the operations of the resource `operation` returns
pub fn extend(
    parent: &InvocationChain,
    operation: &OperationDescriptor,
    args: Vec<BoundParameter>,
    produces: TypeRef,
) -> InvocationChain {
    parent.push(ParentInvocation {
        owner: operation.owner.clone(),
        operation: operation.name.clone(),
        args,
        produces,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::binding::ParamSource;

    fn locator(owner: &str, name: &str, path: Option<&str>) -> OperationDescriptor {
        OperationDescriptor {
            owner: owner.into(),
            name: name.into(),
            http_method: None,
            path: path.map(String::from),
            params: Vec::new(),
            returns: TypeRef::named("Next"),
        }
    }

    #[test]
    fn test_nested_fragments_compose_in_order() {
        let a = compose(&PathPrefix::root(), &locator("A", "a", Some("/a")));
        let b = compose(&a, &locator("B", "b", Some("b/")));
        let c = compose(&b, &locator("C", "c", Some("//c")));
        assert_eq!(c.as_path(), "/a/b/c");
        assert_eq!(a.as_path(), "/a");
    }

    #[test]
    fn test_join_route_normalises_slashes() {
        let prefix = PathPrefix::root().join(Some("/items/{id}"));
        assert_eq!(join_route("/shop/", &prefix, Some("/price/")), "/shop/items/{id}/price");
        assert_eq!(join_route("", &PathPrefix::root(), None), "/");
        assert_eq!(join_route("/shop", &PathPrefix::root(), Some("")), "/shop");
    }

    #[test]
    fn test_missing_fragment_keeps_prefix() {
        let parent = PathPrefix::root().join(Some("/a"));
        assert_eq!(compose(&parent, &locator("A", "x", None)), parent);
    }

    #[test]
    fn test_chain_extends_without_sharing_siblings() {
        let id = BoundParameter {
            name: "id".into(),
            key: "id".into(),
            source: ParamSource::Path,
            ty: TypeRef::named("String"),
        };
        let root = InvocationChain::empty();
        let first = extend(&root, &locator("Shop", "order", Some("/{id}")), vec![id.clone()], TypeRef::named("Order"));
        let left = extend(&first, &locator("Order", "items", None), vec![], TypeRef::named("Items"));
        let right = extend(&first, &locator("Order", "payments", None), vec![], TypeRef::named("Payments"));

        assert!(root.is_empty());
        assert_eq!(first.len(), 1);
        assert_eq!(left.len(), 2);
        let names: Vec<_> = left.entries().iter().map(|e| e.operation.as_str()).collect();
        assert_eq!(names, vec!["order", "items"]);
        let names: Vec<_> = right.entries().iter().map(|e| e.operation.as_str()).collect();
        assert_eq!(names, vec!["order", "payments"]);
        assert_eq!(left.arguments(), vec![&id]);
        assert_ne!(left, right);
    }
}
