//! Steady-state phasor solver for circuit graphs.
//!
//! This crate assembles a complex modified-nodal system from a
//! [`cs_graph::Graph`], solves it with a dense LU factorization, and derives
//! per-branch currents, voltage drops and power. Singular systems degrade to
//! zero voltages rather than failing.

pub mod currents;
pub mod error;
pub mod linear;
pub mod nodal;

pub use currents::{BranchCurrent, branch_current, branch_currents};
pub use error::{SolverError, SolverResult};
pub use linear::solve_complex;
pub use nodal::{
    MnaSystem, NodalConfig, NodalSolution, SolveStatus, branch_voltage, solve_nodal,
    solve_nodal_with,
};
