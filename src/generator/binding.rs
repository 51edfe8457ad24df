use std::collections::BTreeSet;
use std::fmt;

use regex::Regex;

use super::error::GenerationError;
use crate::introspect::{OperationDescriptor, TypeRef};

/// Where a parameter's value comes from at request time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamSource {
    Path,
    Query,
    Header,
    Cookie,
    Form,
    Body,
}

impl ParamSource {
    /// Parse a declared source kind; `None` for anything unknown
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "path" => Some(ParamSource::Path),
            "query" => Some(ParamSource::Query),
            "header" => Some(ParamSource::Header),
            "cookie" => Some(ParamSource::Cookie),
            "form" => Some(ParamSource::Form),
            "body" => Some(ParamSource::Body),
            _ => None,
        }
    }

    /// Name of the binding decoration on emitted parameters
    pub fn decoration_name(self) -> &'static str {
        match self {
            ParamSource::Path => "path",
            ParamSource::Query => "query",
            ParamSource::Header => "header",
            ParamSource::Cookie => "cookie",
            ParamSource::Form => "form",
            ParamSource::Body => "body",
        }
    }
}

impl fmt::Display for ParamSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.decoration_name())
    }
}

/// A parameter with a validated request source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundParameter {
    pub name: String,
    /// Request-side name (path variable, query key, header name, ...)
    pub key: String,
    pub source: ParamSource,
    pub ty: TypeRef,
}

/// Bind every parameter of `operation` to a request source
///
/// A parameter without a declared source is the request body; an operation
/// may have at most one body.
///
/// # Errors
///
/// [`GenerationError::UnresolvedParameterBinding`] for an unknown source kind
/// or a second body parameter.
pub fn bind_parameters(
    operation: &OperationDescriptor,
) -> Result<Vec<BoundParameter>, GenerationError> {
    let mut bound = Vec::with_capacity(operation.params.len());
    let mut body: Option<&str> = None;
    for param in &operation.params {
        let source = match param.source.as_deref() {
            None => ParamSource::Body,
            Some(raw) => ParamSource::parse(raw).ok_or_else(|| {
                GenerationError::UnresolvedParameterBinding {
                    operation: operation.identity(),
                    parameter: param.name.clone(),
                    reason: format!(
                        "unknown source `{raw}` (expected path, query, header, cookie, form or body)"
                    ),
                }
            })?,
        };
        if source == ParamSource::Body {
            if let Some(first) = body {
                return Err(GenerationError::UnresolvedParameterBinding {
                    operation: operation.identity(),
                    parameter: param.name.clone(),
                    reason: format!("`{first}` is already bound to the request body"),
                });
            }
            body = Some(&param.name);
        }
        bound.push(BoundParameter {
            name: param.name.clone(),
            key: param.key.clone(),
            source,
            ty: param.ty.clone(),
        });
    }
    Ok(bound)
}

/// Check a route template and return the names of its variables
///
/// Variables are written `{name}` or `{name: regex}`. Braces must balance
/// and not nest, names must be non-empty identifiers and custom patterns
/// must be valid regular expressions.
///
/// # Errors
///
/// [`GenerationError::InvalidRoutePath`] describing the first problem found.
pub fn route_variables(
    operation: &OperationDescriptor,
    route: &str,
) -> Result<BTreeSet<String>, GenerationError> {
    let invalid = |reason: String| GenerationError::InvalidRoutePath {
        operation: operation.identity(),
        route: route.to_string(),
        reason,
    };

    let mut variables = BTreeSet::new();
    let mut rest = route;
    while let Some(open) = rest.find(|c: char| c == '{' || c == '}') {
        if rest[open..].starts_with('}') {
            return Err(invalid("unmatched `}`".to_string()));
        }
        let after = &rest[open + 1..];
        let close = after
            .find('}')
            .ok_or_else(|| invalid("unclosed `{`".to_string()))?;
        let inner = &after[..close];
        if inner.contains('{') {
            return Err(invalid("nested `{` inside a variable".to_string()));
        }
        let (name, pattern) = match inner.split_once(':') {
            Some((name, pattern)) => (name.trim(), Some(pattern.trim())),
            None => (inner.trim(), None),
        };
        let valid_name = !name.is_empty()
            && name
                .chars()
                .all(|c| c.is_alphanumeric() || c == '_' || c == '-' || c == '.');
        if !valid_name {
            return Err(invalid(format!("bad variable name `{name}`")));
        }
        if let Some(pattern) = pattern {
            Regex::new(pattern)
                .map_err(|e| invalid(format!("variable `{name}` has an invalid pattern: {e}")))?;
        }
        variables.insert(name.to_string());
        rest = &after[close + 1..];
    }
    Ok(variables)
}
