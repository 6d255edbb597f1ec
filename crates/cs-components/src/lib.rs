//! cs-components: component library for circuitsim.
//!
//! Provides the data shared with the host application and the per-kind
//! lookup tables that drive the engine:
//! - components, ports and wires with their derived state
//! - the complex impedance model and branch table
//! - thermal defaults and characteristic heating loads
//!
//! Kind dispatch is an exhaustive `match` on [`ComponentKind`], so adding a
//! kind fails to compile until both tables handle it.
//!
//! # Example
//!
//! ```
//! use cs_components::{BranchContext, Component, branch_model};
//! use cs_core::units::hz;
//!
//! let c = Component::capacitor("C1", 1e-6);
//! let ctx = BranchContext { frequency: hz(60.0), clock_s: 0.0 };
//! let model = branch_model(&c, &ctx).unwrap();
//! assert!((model.impedance.norm() - 2652.58).abs() < 0.01);
//! ```

pub mod common;
pub mod component;
pub mod error;
pub mod impedance;
pub mod kind;
pub mod thermal;

// Re-exports
pub use component::{
    Component, ComponentState, FailureType, Material, Port, Properties, WarningLevel, Wire,
    WireState,
};
pub use error::{ComponentError, ComponentResult};
pub use impedance::{BranchContext, BranchModel, branch_model, source_emf, wire_model};
pub use kind::ComponentKind;
pub use thermal::{HeatingLoad, ThermalProperties, heating_load};
