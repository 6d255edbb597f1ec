//! Error types for solver operations.

use cs_core::error::CsError;
use cs_graph::GraphError;
use thiserror::Error;

/// Errors that can occur while solving a circuit.
///
/// A singular or ill-conditioned system is not an error: the nodal solve
/// falls back to zero voltages and flags it on the solution instead.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SolverError {
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Branch {branch} has no usable impedance")]
    DegenerateBranch { branch: String },

    #[error("Graph error: {0}")]
    Graph(#[from] GraphError),
}

pub type SolverResult<T> = Result<T, SolverError>;

impl From<SolverError> for CsError {
    fn from(e: SolverError) -> Self {
        match e {
            SolverError::DimensionMismatch { .. } => CsError::InvalidArg {
                what: "system dimensions",
            },
            SolverError::DegenerateBranch { .. } => CsError::InvalidArg { what: "branch" },
            SolverError::Graph(g) => g.into(),
        }
    }
}
