//! Per-tick circuit simulation for circuitsim.
//!
//! Provides:
//! - The [`Simulation`] handle with its Idle / Running / Stopped lifecycle
//! - Pre-run validation of the circuit
//! - The lumped thermal model with warning and failure classification
//! - Fixed-step explicit integration used by the thermal model
//!
//! Each tick is a quasi-static steady-state solve at the settings frequency;
//! reactive transients are not integrated.

pub mod error;
pub mod integrator;
pub mod settings;
pub mod simulation;
pub mod thermal;
pub mod validation;

pub use error::{SimError, SimResult};
pub use integrator::{ForwardEuler, MAX_SUBSTEPS, ScalarModel};
pub use settings::SimSettings;
pub use simulation::{
    ComponentReading, ComponentThermal, SimStatus, Simulation, Snapshot, StepOutcome, TickReport,
    WireReading,
};
pub use thermal::ThermalAssessment;
pub use validation::{ValidationIssue, ValidationReport, validate_circuit};
