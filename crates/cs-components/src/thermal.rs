//! Per-kind thermal defaults and characteristic heating resistance.

use crate::component::{Component, Material};
use crate::impedance::{CONDUCTOR_OHMS, resistor_ohms};
use crate::kind::ComponentKind;
use serde::{Deserialize, Serialize};

/// Fixed winding resistance used for heating in the inductive family.
pub const WINDING_OHMS: f64 = 0.1;

/// Equivalent series resistance used for heating in capacitors.
pub const CAPACITOR_ESR_OHMS: f64 = 0.01;

/// Lumped thermal parameters of one component.
///
/// Derived on demand from kind, material and ambient; never stored.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThermalProperties {
    /// °C.
    pub ambient_temperature: f64,
    /// K/W.
    pub thermal_resistance: f64,
    /// J/K.
    pub thermal_mass: f64,
    /// °C.
    pub max_temperature: f64,
    pub material: Material,
}

impl ThermalProperties {
    /// Look up the thermal parameters for a component.
    pub fn for_component(component: &Component, ambient: f64) -> Self {
        Self::lookup(component.kind, component.properties.material, ambient)
    }

    /// Look up the thermal parameters for a kind/material pair.
    pub fn lookup(kind: ComponentKind, material: Option<Material>, ambient: f64) -> Self {
        let material = material.unwrap_or_else(|| default_material(kind));
        let (thermal_resistance, thermal_mass, max_temperature) = table(kind, material);
        Self {
            ambient_temperature: ambient,
            thermal_resistance,
            thermal_mass,
            max_temperature,
            material,
        }
    }

    /// Thermal time constant `R_th · C_th`, seconds.
    pub fn time_constant(&self) -> f64 {
        self.thermal_resistance * self.thermal_mass
    }

    pub fn warning_temperature(&self) -> f64 {
        0.75 * self.max_temperature
    }

    pub fn critical_temperature(&self) -> f64 {
        0.90 * self.max_temperature
    }
}

/// Material assumed when a component does not name one.
pub fn default_material(kind: ComponentKind) -> Material {
    match kind {
        ComponentKind::Resistor => Material::Carbon,
        ComponentKind::Capacitor => Material::Ceramic,
        ComponentKind::Inductor
        | ComponentKind::Coil
        | ComponentKind::Solenoid
        | ComponentKind::Helmholtz
        | ComponentKind::Wire
        | ComponentKind::Switch => Material::Copper,
        ComponentKind::DcSource
        | ComponentKind::AcSource
        | ComponentKind::PulseGenerator
        | ComponentKind::Ground
        | ComponentKind::Other => Material::Unknown,
    }
}

/// (thermal resistance K/W, thermal mass J/K, max temperature °C)
fn table(kind: ComponentKind, material: Material) -> (f64, f64, f64) {
    match (kind, material) {
        (ComponentKind::Resistor, Material::MetalFilm) => (45.0, 1.0, 175.0),
        (ComponentKind::Resistor, Material::Wirewound) => (15.0, 8.0, 350.0),
        (ComponentKind::Resistor, _) => (50.0, 1.0, 155.0),

        (ComponentKind::Capacitor, Material::Electrolytic) => (60.0, 2.0, 85.0),
        (ComponentKind::Capacitor, Material::Film) => (70.0, 1.0, 105.0),
        (ComponentKind::Capacitor, _) => (80.0, 0.5, 125.0),

        (
            ComponentKind::Inductor
            | ComponentKind::Coil
            | ComponentKind::Solenoid
            | ComponentKind::Helmholtz,
            Material::Aluminum,
        ) => (22.0, 3.0, 150.0),
        (
            ComponentKind::Inductor
            | ComponentKind::Coil
            | ComponentKind::Solenoid
            | ComponentKind::Helmholtz,
            _,
        ) => (20.0, 5.0, 180.0),

        (ComponentKind::Wire, Material::Aluminum) => (32.0, 0.2, 90.0),
        (ComponentKind::Wire, _) => (30.0, 0.3, 105.0),

        (ComponentKind::DcSource | ComponentKind::AcSource | ComponentKind::PulseGenerator, _) => {
            (10.0, 20.0, 85.0)
        }

        (ComponentKind::Switch, _) => (40.0, 0.5, 125.0),
        (ComponentKind::Ground, _) => (5.0, 50.0, 200.0),
        (ComponentKind::Other, _) => (50.0, 1.0, 150.0),
    }
}

/// How a component turns current into heat.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HeatingLoad {
    /// `I² · R` with the given characteristic resistance.
    Resistive(f64),
    /// Sources report `|I · V|`, the power they deliver.
    Delivered,
    /// Never heats (ground).
    None,
}

impl HeatingLoad {
    /// Heat generation in watts for a current magnitude and voltage magnitude.
    pub fn heat(self, current: f64, voltage: f64) -> f64 {
        match self {
            HeatingLoad::Resistive(r) => current * current * r,
            HeatingLoad::Delivered => (current * voltage).abs(),
            HeatingLoad::None => 0.0,
        }
    }
}

/// Characteristic heating model of a component.
///
/// This may differ from its branch impedance: a capacitor branch is reactive
/// but heats through its ESR.
pub fn heating_load(component: &Component) -> HeatingLoad {
    let props = &component.properties;
    match component.kind {
        ComponentKind::Resistor => HeatingLoad::Resistive(resistor_ohms(props.resistance)),
        ComponentKind::Wire => HeatingLoad::Resistive(CONDUCTOR_OHMS),
        ComponentKind::Inductor
        | ComponentKind::Coil
        | ComponentKind::Solenoid
        | ComponentKind::Helmholtz => HeatingLoad::Resistive(WINDING_OHMS),
        ComponentKind::Capacitor => HeatingLoad::Resistive(CAPACITOR_ESR_OHMS),
        ComponentKind::DcSource | ComponentKind::AcSource | ComponentKind::PulseGenerator => {
            HeatingLoad::Delivered
        }
        ComponentKind::Switch | ComponentKind::Other => HeatingLoad::Resistive(CONDUCTOR_OHMS),
        ComponentKind::Ground => HeatingLoad::None,
    }
}
