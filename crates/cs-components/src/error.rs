//! Error types for component operations.

use cs_core::error::CsError;
use thiserror::Error;

/// Errors that can occur while interpreting component data.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ComponentError {
    #[error("Component {component} ({kind}) needs {required} port(s), found {found}")]
    MissingPorts {
        component: String,
        kind: &'static str,
        required: usize,
        found: usize,
    },
}

pub type ComponentResult<T> = Result<T, ComponentError>;

impl From<ComponentError> for CsError {
    fn from(e: ComponentError) -> Self {
        match e {
            ComponentError::MissingPorts { .. } => CsError::Invariant {
                what: "component port contract",
            },
        }
    }
}
