//! Error types for field queries.

use cs_core::CsError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum FieldError {
    #[error("Invalid grid bounds on {axis}: min {min} must be below max {max}")]
    InvalidBounds {
        axis: &'static str,
        min: f64,
        max: f64,
    },

    #[error("Non-finite {what}")]
    NonFinite { what: &'static str },

    #[error("Invalid field configuration: {what}")]
    InvalidConfig { what: &'static str },
}

pub type FieldResult<T> = Result<T, FieldError>;

impl From<FieldError> for CsError {
    fn from(e: FieldError) -> Self {
        match e {
            FieldError::InvalidBounds { axis, .. } => CsError::InvalidArg { what: axis },
            FieldError::NonFinite { what } => CsError::NonFinite { what, value: f64::NAN },
            FieldError::InvalidConfig { what } => CsError::InvalidArg { what },
        }
    }
}
