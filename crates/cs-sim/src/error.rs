//! Error types for simulation operations.

use cs_core::error::CsError;
use cs_field::FieldError;
use cs_graph::GraphError;
use cs_solver::SolverError;
use thiserror::Error;

/// Caller contract violations surfaced by the simulation handle.
///
/// Degenerate circuits are not errors: they produce idle ticks or zeroed
/// solutions instead.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimError {
    #[error("Invalid timestep {dt}: must be finite and positive")]
    InvalidTimestep { dt: f64 },

    #[error("Invalid settings: {what}")]
    InvalidSettings { what: &'static str },

    #[error("Unknown component {id}")]
    UnknownComponent { id: String },

    #[error("Unknown wire {id}")]
    UnknownWire { id: String },

    #[error("Duplicate id {id}")]
    DuplicateId { id: String },

    #[error("Graph error: {0}")]
    Graph(#[from] GraphError),

    #[error("Solver error: {0}")]
    Solver(#[from] SolverError),

    #[error("Field error: {0}")]
    Field(#[from] FieldError),
}

pub type SimResult<T> = Result<T, SimError>;

impl From<SimError> for CsError {
    fn from(e: SimError) -> Self {
        match e {
            SimError::InvalidTimestep { .. } => CsError::InvalidArg { what: "timestep" },
            SimError::InvalidSettings { what } => CsError::InvalidArg { what },
            SimError::UnknownComponent { .. } | SimError::UnknownWire { .. } => {
                CsError::InvalidArg { what: "unknown id" }
            }
            SimError::DuplicateId { .. } => CsError::InvalidArg {
                what: "duplicate id",
            },
            SimError::Graph(g) => g.into(),
            SimError::Solver(s) => s.into(),
            SimError::Field(f) => f.into(),
        }
    }
}
