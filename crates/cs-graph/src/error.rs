//! Graph-specific error types.

use cs_components::ComponentError;
use cs_core::{BranchId, CsError, NodeId};

/// Structural contract violations found while building a circuit graph.
///
/// These are caller errors; degenerate but well-formed circuits never produce
/// them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    /// A component carries fewer ports than its kind requires.
    MissingPorts {
        component: String,
        kind: &'static str,
        required: usize,
        found: usize,
    },

    /// Two ports share an id.
    DuplicatePort { port: String },

    /// Two components share an id.
    DuplicateComponent { component: String },

    /// A port names a different owner than the component containing it.
    PortOwnerMismatch {
        port: String,
        expected: String,
        actual: String,
    },

    /// A wire refers to a port that no component owns.
    UnknownPort { wire: String, port: String },

    /// A branch refers to a node that doesn't exist.
    InvalidNodeRef { branch: BranchId, node: NodeId },

    /// ID not found in index map.
    IdNotFound { what: &'static str },
}

impl std::fmt::Display for GraphError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GraphError::MissingPorts {
                component,
                kind,
                required,
                found,
            } => write!(
                f,
                "Component {} ({}) needs {} port(s), found {}",
                component, kind, required, found
            ),
            GraphError::DuplicatePort { port } => write!(f, "Port id {} is used twice", port),
            GraphError::DuplicateComponent { component } => {
                write!(f, "Component id {} is used twice", component)
            }
            GraphError::PortOwnerMismatch {
                port,
                expected,
                actual,
            } => write!(
                f,
                "Port {} should belong to component {} but references {}",
                port, expected, actual
            ),
            GraphError::UnknownPort { wire, port } => {
                write!(f, "Wire {} refers to non-existent port {}", wire, port)
            }
            GraphError::InvalidNodeRef { branch, node } => {
                write!(f, "Branch {} refers to non-existent node {}", branch, node)
            }
            GraphError::IdNotFound { what } => write!(f, "{} not found in index map", what),
        }
    }
}

impl std::error::Error for GraphError {}

pub type GraphResult<T> = Result<T, GraphError>;

impl From<ComponentError> for GraphError {
    fn from(err: ComponentError) -> Self {
        match err {
            ComponentError::MissingPorts {
                component,
                kind,
                required,
                found,
            } => GraphError::MissingPorts {
                component,
                kind,
                required,
                found,
            },
        }
    }
}

impl From<GraphError> for CsError {
    fn from(err: GraphError) -> Self {
        match err {
            GraphError::IdNotFound { what } => CsError::InvalidArg { what },
            _ => CsError::Invariant {
                what: "circuit graph structure",
            },
        }
    }
}
