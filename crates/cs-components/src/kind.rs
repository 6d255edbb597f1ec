//! Component kind tags and their categories.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Every component kind the engine understands.
///
/// Unrecognized tags deserialize to [`ComponentKind::Other`], which is modeled
/// as a minimal passive branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ComponentKind {
    Resistor,
    Capacitor,
    Inductor,
    Coil,
    Solenoid,
    Helmholtz,
    DcSource,
    AcSource,
    PulseGenerator,
    Wire,
    Switch,
    Ground,
    #[serde(other)]
    Other,
}

impl ComponentKind {
    pub const ALL: [ComponentKind; 13] = [
        ComponentKind::Resistor,
        ComponentKind::Capacitor,
        ComponentKind::Inductor,
        ComponentKind::Coil,
        ComponentKind::Solenoid,
        ComponentKind::Helmholtz,
        ComponentKind::DcSource,
        ComponentKind::AcSource,
        ComponentKind::PulseGenerator,
        ComponentKind::Wire,
        ComponentKind::Switch,
        ComponentKind::Ground,
        ComponentKind::Other,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ComponentKind::Resistor => "resistor",
            ComponentKind::Capacitor => "capacitor",
            ComponentKind::Inductor => "inductor",
            ComponentKind::Coil => "coil",
            ComponentKind::Solenoid => "solenoid",
            ComponentKind::Helmholtz => "helmholtz",
            ComponentKind::DcSource => "dcSource",
            ComponentKind::AcSource => "acSource",
            ComponentKind::PulseGenerator => "pulseGenerator",
            ComponentKind::Wire => "wire",
            ComponentKind::Switch => "switch",
            ComponentKind::Ground => "ground",
            ComponentKind::Other => "other",
        }
    }

    /// Inductor, coil, solenoid and helmholtz pair share the inductive model.
    pub fn is_inductive(self) -> bool {
        matches!(
            self,
            ComponentKind::Inductor
                | ComponentKind::Coil
                | ComponentKind::Solenoid
                | ComponentKind::Helmholtz
        )
    }

    /// Kinds that drive the circuit with an EMF.
    pub fn is_power_source(self) -> bool {
        matches!(
            self,
            ComponentKind::DcSource | ComponentKind::AcSource | ComponentKind::PulseGenerator
        )
    }

    /// Kinds whose winding geometry produces a field.
    pub fn is_magnetic(self) -> bool {
        matches!(
            self,
            ComponentKind::Coil | ComponentKind::Solenoid | ComponentKind::Helmholtz
        )
    }

    /// Minimum number of ports a component of this kind must carry.
    pub fn required_ports(self) -> usize {
        match self {
            ComponentKind::Ground => 1,
            ComponentKind::Other => 0,
            _ => 2,
        }
    }
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
