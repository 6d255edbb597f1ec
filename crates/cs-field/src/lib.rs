//! cs-field: magnetostatic field of current-carrying loop components.
//!
//! Magnetic components (coils, solenoids, helmholtz pairs) are sampled into
//! circular [`MagneticSource`] loops whose axis is the local vertical. Sources
//! and query points are placed in one East-North-Up frame and each loop is
//! integrated with a discretized Biot–Savart sum.
//!
//! Cost is bounded by the configured segment counts and the clamped grid
//! resolution: `O(resolution³ × segments × sources)` for a grid query.

pub mod biot_savart;
pub mod error;
pub mod frame;
pub mod grid;
pub mod source;

pub use biot_savart::{FieldConfig, LocalLoop, superpose};
pub use error::{FieldError, FieldResult};
pub use frame::EnuFrame;
pub use grid::{
    AxisRange, FieldGrid, FieldPoint, FieldSample, GridMetadata, GridSpec, SourceInfo, Xyz,
    field_at, sample_grid,
};
pub use source::{MagneticSource, collect_sources, component_sources};
