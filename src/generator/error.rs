use std::fmt;

/// Fatal generation failure
///
/// Any of these aborts generation of the whole root service; nothing is
/// emitted for it. Every variant names the operation that broke the run and
/// the rule it violated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationError {
    /// A parameter cannot be bound to a request source
    UnresolvedParameterBinding {
        /// `Owner#operation`
        operation: String,
        parameter: String,
        reason: String,
    },
    /// Two operations compose the same verb and route in one class
    ConflictingRoutePath {
        operation: String,
        /// Operation that claimed the route first
        existing: String,
        verb: String,
        route: String,
    },
    /// A route template is malformed
    InvalidRoutePath {
        operation: String,
        route: String,
        reason: String,
    },
    /// A resource type is reached again below itself
    CyclicResource {
        operation: String,
        resource: String,
        /// Resource types from the root down to the repeat
        path: Vec<String>,
    },
    /// Resource nesting exceeds the configured limit
    DepthLimitExceeded {
        operation: String,
        max_depth: usize,
    },
    /// A referenced type is not declared
    UnknownType { name: String, context: String },
}

impl fmt::Display for GenerationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenerationError::UnresolvedParameterBinding {
                operation,
                parameter,
                reason,
            } => write!(
                f,
                "{operation}: cannot bind parameter `{parameter}`: {reason}"
            ),
            GenerationError::ConflictingRoutePath {
                operation,
                existing,
                verb,
                route,
            } => write!(
                f,
                "{operation}: route {verb} {route} is already generated for {existing}"
            ),
            GenerationError::InvalidRoutePath {
                operation,
                route,
                reason,
            } => write!(f, "{operation}: invalid route `{route}`: {reason}"),
            GenerationError::CyclicResource {
                operation,
                resource,
                path,
            } => write!(
                f,
                "{operation}: resource `{resource}` is nested inside itself ({} -> {resource})",
                path.join(" -> ")
            ),
            GenerationError::DepthLimitExceeded {
                operation,
                max_depth,
            } => write!(
                f,
                "{operation}: resource nesting exceeds max_depth = {max_depth}"
            ),
            GenerationError::UnknownType { name, context } => {
                write!(f, "{context}: type `{name}` is not declared")
            }
        }
    }
}

impl std::error::Error for GenerationError {}

/// Kind of informational note
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteKind {
    /// No implementation operation matched; the interface type was used
    MissingImplementationMatch,
    /// A terminal operation without an HTTP verb was not emitted
    NonRoutableOperation,
    /// An emitted signature still names a type variable nothing bound
    UnboundTypeVariable,
}

impl fmt::Display for NoteKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NoteKind::MissingImplementationMatch => write!(f, "missing_implementation_match"),
            NoteKind::NonRoutableOperation => write!(f, "non_routable_operation"),
            NoteKind::UnboundTypeVariable => write!(f, "unbound_type_variable"),
        }
    }
}

/// Non-fatal observation made while generating
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationNote {
    pub kind: NoteKind,
    /// `Owner#operation`
    pub operation: String,
    pub message: String,
}

impl GenerationNote {
    pub fn new(kind: NoteKind, operation: impl Into<String>, message: impl Into<String>) -> Self {
        GenerationNote {
            kind,
            operation: operation.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for GenerationNote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.kind, self.operation, self.message)
    }
}
