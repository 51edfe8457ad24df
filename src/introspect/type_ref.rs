use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// A parsed type expression as it appears in a catalog
///
/// Catalog entries spell types the way an interface declares them:
/// `String`, `Vec<OrderDto>`, `Resource<?>`, `()`. The generator only needs
/// to compare and substitute them, so the representation stays structural.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TypeRef {
    /// No value (`()` or `void`)
    Unit,
    /// Unbounded generic argument (`?`)
    Wildcard,
    /// A named type with optional generic arguments
    Named {
        /// Type name, possibly path-qualified (`dto::Order`)
        name: String,
        /// Generic arguments in declaration order
        args: Vec<TypeRef>,
    },
}

/// Error returned when a type expression cannot be parsed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeRefError {
    /// The offending input
    pub input: String,
    /// What the parser expected
    pub message: String,
}

impl fmt::Display for TypeRefError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid type `{}`: {}", self.input, self.message)
    }
}

impl std::error::Error for TypeRefError {}

impl TypeRef {
    /// A named type without generic arguments
    pub fn named(name: impl Into<String>) -> Self {
        TypeRef::Named {
            name: name.into(),
            args: Vec::new(),
        }
    }

    /// A named type with generic arguments
    pub fn generic(name: impl Into<String>, args: Vec<TypeRef>) -> Self {
        TypeRef::Named {
            name: name.into(),
            args,
        }
    }

    /// Parse a type expression
    ///
    /// An empty string, `()` and `void` all denote [`TypeRef::Unit`].
    pub fn parse(input: &str) -> Result<Self, TypeRefError> {
        let trimmed = input.trim();
        if trimmed.is_empty() || trimmed == "void" {
            return Ok(TypeRef::Unit);
        }
        let mut parser = Parser {
            input: trimmed,
            pos: 0,
        };
        let parsed = parser.parse_type()?;
        parser.skip_ws();
        if parser.pos != trimmed.len() {
            return Err(parser.error("unexpected trailing input"));
        }
        Ok(parsed)
    }

    /// The name of the outermost type, `None` for unit and wildcards
    pub fn base_name(&self) -> Option<&str> {
        match self {
            TypeRef::Named { name, .. } => Some(name),
            _ => None,
        }
    }

    /// Generic arguments of a named type
    pub fn args(&self) -> &[TypeRef] {
        match self {
            TypeRef::Named { args, .. } => args,
            _ => &[],
        }
    }

    /// Whether `self` is `general` or a narrower form of it
    ///
    /// Wildcards and the type variables named in `vars` accept any type.
    /// Named types must agree on name and arity, and every argument must
    /// itself be a specialization.
    pub fn is_specialization_of(&self, general: &TypeRef, vars: &[String]) -> bool {
        match (self, general) {
            (_, TypeRef::Wildcard) => true,
            (_, TypeRef::Named { name, args }) if args.is_empty() && vars.contains(name) => true,
            (TypeRef::Unit, TypeRef::Unit) => true,
            (
                TypeRef::Named { name: a, args: a_args },
                TypeRef::Named { name: b, args: b_args },
            ) => {
                a == b
                    && a_args.len() == b_args.len()
                    && a_args
                        .iter()
                        .zip(b_args)
                        .all(|(x, y)| x.is_specialization_of(y, vars))
            }
            _ => false,
        }
    }

    /// Whether `self` is a strictly narrower form of `general`
    pub fn refines(&self, general: &TypeRef, vars: &[String]) -> bool {
        self != general && self.is_specialization_of(general, vars)
    }

    /// Whether the type variable `var` occurs anywhere in `self`
    pub fn mentions(&self, var: &str) -> bool {
        match self {
            TypeRef::Named { name, args } if args.is_empty() => name == var,
            TypeRef::Named { args, .. } => args.iter().any(|a| a.mentions(var)),
            _ => false,
        }
    }

    /// Replace type variables with their bound types
    pub fn substitute(&self, bindings: &BTreeMap<String, TypeRef>) -> TypeRef {
        match self {
            TypeRef::Named { name, args } if args.is_empty() => bindings
                .get(name)
                .cloned()
                .unwrap_or_else(|| self.clone()),
            TypeRef::Named { name, args } => TypeRef::Named {
                name: name.clone(),
                args: args.iter().map(|a| a.substitute(bindings)).collect(),
            },
            other => other.clone(),
        }
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeRef::Unit => write!(f, "()"),
            TypeRef::Wildcard => write!(f, "?"),
            TypeRef::Named { name, args } => {
                write!(f, "{name}")?;
                if !args.is_empty() {
                    write!(f, "<")?;
                    for (i, arg) in args.iter().enumerate() {
                        if i > 0 {
                            write!(f, ", ")?;
                        }
                        write!(f, "{arg}")?;
                    }
                    write!(f, ">")?;
                }
                Ok(())
            }
        }
    }
}

impl FromStr for TypeRef {
    type Err = TypeRefError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TypeRef::parse(s)
    }
}

struct Parser<'a> {
    input: &'a str,
    pos: usize,
}

impl Parser<'_> {
    fn error(&self, message: &str) -> TypeRefError {
        TypeRefError {
            input: self.input.to_string(),
            message: format!("{message} at offset {}", self.pos),
        }
    }

    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn skip_ws(&mut self) {
        while let Some(c) = self.peek() {
            if !c.is_whitespace() {
                break;
            }
            self.pos += c.len_utf8();
        }
    }

    fn eat(&mut self, expected: char) -> bool {
        self.skip_ws();
        if self.peek() == Some(expected) {
            self.pos += expected.len_utf8();
            true
        } else {
            false
        }
    }

    fn ident(&mut self) -> Result<String, TypeRefError> {
        self.skip_ws();
        let start = self.pos;
        while let Some(c) = self.peek() {
            if c.is_alphanumeric() || c == '_' || c == ':' || c == '.' || c == '$' {
                self.pos += c.len_utf8();
            } else {
                break;
            }
        }
        if start == self.pos {
            return Err(self.error("expected a type name"));
        }
        Ok(self.input[start..self.pos].to_string())
    }

    fn parse_type(&mut self) -> Result<TypeRef, TypeRefError> {
        if self.eat('?') {
            return Ok(TypeRef::Wildcard);
        }
        if self.eat('(') {
            if !self.eat(')') {
                return Err(self.error("expected `)`"));
            }
            return Ok(TypeRef::Unit);
        }
        let name = self.ident()?;
        let mut args = Vec::new();
        if self.eat('<') {
            loop {
                args.push(self.parse_type()?);
                if self.eat(',') {
                    continue;
                }
                if self.eat('>') {
                    break;
                }
                return Err(self.error("expected `,` or `>`"));
            }
        }
        Ok(TypeRef::Named { name, args })
    }
}
