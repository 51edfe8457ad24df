use crate::introspect::TypeRef;
use std::collections::{BTreeMap, HashSet};
use tracing::debug;

/// Value of a decoration parameter
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecorationValue {
    Str(String),
    List(Vec<String>),
}

/// A named routing or documentation decoration with ordered parameters
///
/// Decorations are plain data on the declaration tree; the emitter decides
/// how to spell them (attributes, annotations, comments).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decoration {
    pub name: String,
    pub params: Vec<(String, DecorationValue)>,
}

impl Decoration {
    pub fn new(name: impl Into<String>) -> Self {
        Decoration {
            name: name.into(),
            params: Vec::new(),
        }
    }

    /// Add a string parameter
    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params
            .push((key.into(), DecorationValue::Str(value.into())));
        self
    }

    /// Add a list parameter
    pub fn list(mut self, key: impl Into<String>, values: Vec<String>) -> Self {
        self.params.push((key.into(), DecorationValue::List(values)));
        self
    }

    /// First string parameter named `key`
    pub fn get(&self, key: &str) -> Option<&str> {
        self.params.iter().find_map(|(k, v)| match v {
            DecorationValue::Str(s) if k == key => Some(s.as_str()),
            _ => None,
        })
    }
}

/// A parameter of an emitted method
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodParam {
    pub ident: String,
    pub ty: TypeRef,
    /// Binding decoration (`path(value = "id")`, `body`, ...)
    pub binding: Decoration,
}

/// A parameter of an emitted constructor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstructorParam {
    pub ident: String,
    pub ty: TypeRef,
}

/// A constructor delegating to one implementation constructor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstructorDecl {
    pub name: String,
    pub params: Vec<ConstructorParam>,
}

/// One call in a method body: `.method(args...)` on the current receiver
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallStep {
    pub method: String,
    pub args: Vec<String>,
}

/// An emitted endpoint method
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodDecl {
    pub name: String,
    /// HTTP verb of the endpoint
    pub verb: String,
    /// Fully composed route
    pub route: String,
    pub params: Vec<MethodParam>,
    pub return_type: TypeRef,
    pub decorations: Vec<Decoration>,
    /// Calls walked from the wrapped implementation, ancestors first and the
    /// target operation last
    pub calls: Vec<CallStep>,
}

/// A generated service class wrapping one implementation type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassDecl {
    pub name: String,
    /// Wrapped implementation type
    pub inner: String,
    pub decorations: Vec<Decoration>,
    pub constructors: Vec<ConstructorDecl>,
    pub methods: Vec<MethodDecl>,
}

/// Incrementally builds a [`ClassDecl`]
///
/// Besides collecting declarations it owns the class-wide registries that
/// keep the output consistent: emitted method names are unique and every
/// `(verb, route)` pair is registered once.
#[derive(Debug)]
pub struct ClassBuilder {
    decl: ClassDecl,
    routes: BTreeMap<(String, String), String>,
    method_names: HashSet<String>,
}

impl ClassBuilder {
    pub fn new(name: impl Into<String>, inner: impl Into<String>) -> Self {
        ClassBuilder {
            decl: ClassDecl {
                name: name.into(),
                inner: inner.into(),
                decorations: Vec::new(),
                constructors: Vec::new(),
                methods: Vec::new(),
            },
            routes: BTreeMap::new(),
            method_names: HashSet::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.decl.name
    }

    pub fn annotate(&mut self, decoration: Decoration) -> &mut Self {
        self.decl.decorations.push(decoration);
        self
    }

    pub fn constructor(&mut self, constructor: ConstructorDecl) -> &mut Self {
        self.decl.constructors.push(constructor);
        self
    }

    /// Claim `(verb, route)` for `owner`
    ///
    /// # Errors
    ///
    /// Returns the identity of the operation that already claimed the pair.
    pub fn register_route(&mut self, verb: &str, route: &str, owner: &str) -> Result<(), String> {
        let key = (verb.to_string(), route.to_string());
        if let Some(existing) = self.routes.get(&key) {
            return Err(existing.clone());
        }
        self.routes.insert(key, owner.to_string());
        Ok(())
    }

    /// Reserve a method name, suffixing `_1`, `_2`, ... on collision
    pub fn unique_method_name(&mut self, name: &str) -> String {
        if self.method_names.insert(name.to_string()) {
            return name.to_string();
        }
        let mut counter = 1;
        loop {
            let candidate = format!("{name}_{counter}");
            if self.method_names.insert(candidate.clone()) {
                debug!(
                    class = %self.decl.name,
                    method = %name,
                    renamed = %candidate,
                    "duplicate method name"
                );
                return candidate;
            }
            counter += 1;
        }
    }

    pub fn method(&mut self, method: MethodDecl) -> &mut Self {
        self.decl.methods.push(method);
        self
    }

    pub fn build(self) -> ClassDecl {
        self.decl
    }
}
