//! Component, port and wire records shared with the host application.

use crate::error::{ComponentError, ComponentResult};
use crate::kind::ComponentKind;
use cs_core::GeoPoint;
use cs_core::units::constants::DEFAULT_AMBIENT_C;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A connection point owned by exactly one component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Port {
    pub id: String,
    pub component: String,
}

/// Construction material, used to pick thermal limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Material {
    Copper,
    Aluminum,
    Carbon,
    MetalFilm,
    Wirewound,
    Ceramic,
    Electrolytic,
    Film,
    #[serde(other)]
    Unknown,
}

/// Type-specific electrical and geometric properties.
///
/// Everything is optional; absent or unusable values fall back to per-kind
/// defaults when the graph and thermal tables are evaluated.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Properties {
    /// Ohms.
    pub resistance: Option<f64>,
    /// Farads.
    pub capacitance: Option<f64>,
    /// Henries.
    pub inductance: Option<f64>,
    /// Volts (EMF amplitude for sources).
    pub voltage: Option<f64>,
    pub turns: Option<u32>,
    /// Metres.
    pub radius: Option<f64>,
    /// Metres.
    pub length: Option<f64>,
    /// Metres, helmholtz coil spacing.
    pub separation: Option<f64>,
    pub material: Option<Material>,
    /// Switch state; absent means open.
    pub closed: Option<bool>,
    pub position: Option<GeoPoint>,
    /// Hz, pulse generator repetition rate.
    pub pulse_frequency: Option<f64>,
    /// Fraction of each pulse period spent high.
    pub duty_cycle: Option<f64>,
    /// Volts; exceeding it fails the part when failures are enabled.
    pub voltage_rating: Option<f64>,
}

/// Thermal warning bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum WarningLevel {
    #[default]
    None,
    Low,
    Medium,
    High,
    Critical,
}

/// Why a component stopped working.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FailureType {
    Thermal,
    Overvoltage,
}

impl fmt::Display for FailureType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureType::Thermal => f.write_str("thermal"),
            FailureType::Overvoltage => f.write_str("overvoltage"),
        }
    }
}

/// Derived per-tick state of a component.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ComponentState {
    /// Amperes (magnitude).
    pub current_flow: f64,
    /// Volts (magnitude).
    pub voltage_drop: f64,
    /// Watts.
    pub power_dissipation: f64,
    /// °C.
    pub temperature: f64,
    pub is_failed: bool,
    pub failure_type: Option<FailureType>,
    pub warning_level: WarningLevel,
}

impl ComponentState {
    pub fn at_ambient(ambient: f64) -> Self {
        Self {
            current_flow: 0.0,
            voltage_drop: 0.0,
            power_dissipation: 0.0,
            temperature: ambient,
            is_failed: false,
            failure_type: None,
            warning_level: WarningLevel::None,
        }
    }
}

impl Default for ComponentState {
    fn default() -> Self {
        Self::at_ambient(DEFAULT_AMBIENT_C)
    }
}

/// A circuit element placed by the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Component {
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub kind: ComponentKind,
    #[serde(default)]
    pub ports: Vec<Port>,
    #[serde(default)]
    pub properties: Properties,
    #[serde(default)]
    pub state: ComponentState,
}

impl Component {
    /// Create a component with `port_count` ports named `<id>.<n>`.
    pub fn new(id: impl Into<String>, kind: ComponentKind, port_count: usize) -> Self {
        let id = id.into();
        let ports = (0..port_count)
            .map(|n| Port {
                id: format!("{id}.{n}"),
                component: id.clone(),
            })
            .collect();
        Self {
            name: id.clone(),
            id,
            kind,
            ports,
            properties: Properties::default(),
            state: ComponentState::default(),
        }
    }

    /// Create a component with the number of ports its kind requires.
    pub fn with_kind(id: impl Into<String>, kind: ComponentKind) -> Self {
        Self::new(id, kind, kind.required_ports().max(1))
    }

    pub fn resistor(id: impl Into<String>, ohms: f64) -> Self {
        let mut c = Self::with_kind(id, ComponentKind::Resistor);
        c.properties.resistance = Some(ohms);
        c
    }

    pub fn capacitor(id: impl Into<String>, farads: f64) -> Self {
        let mut c = Self::with_kind(id, ComponentKind::Capacitor);
        c.properties.capacitance = Some(farads);
        c
    }

    pub fn inductor(id: impl Into<String>, henries: f64) -> Self {
        let mut c = Self::with_kind(id, ComponentKind::Inductor);
        c.properties.inductance = Some(henries);
        c
    }

    pub fn dc_source(id: impl Into<String>, volts: f64) -> Self {
        let mut c = Self::with_kind(id, ComponentKind::DcSource);
        c.properties.voltage = Some(volts);
        c
    }

    pub fn switch(id: impl Into<String>, closed: bool) -> Self {
        let mut c = Self::with_kind(id, ComponentKind::Switch);
        c.properties.closed = Some(closed);
        c
    }

    pub fn ground(id: impl Into<String>) -> Self {
        Self::with_kind(id, ComponentKind::Ground)
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_properties(mut self, properties: Properties) -> Self {
        self.properties = properties;
        self
    }

    /// Port id by position; panics if the component has fewer ports.
    pub fn port(&self, n: usize) -> &str {
        &self.ports[n].id
    }

    /// Display label: the name if set, otherwise the id.
    pub fn label(&self) -> &str {
        if self.name.is_empty() {
            &self.id
        } else {
            &self.name
        }
    }

    /// Check the port contract for this component's kind.
    pub fn check_ports(&self) -> ComponentResult<()> {
        let required = self.kind.required_ports();
        if self.ports.len() < required {
            return Err(ComponentError::MissingPorts {
                component: self.id.clone(),
                kind: self.kind.as_str(),
                required,
                found: self.ports.len(),
            });
        }
        Ok(())
    }

    /// True for a switch whose contacts are closed.
    pub fn is_closed(&self) -> bool {
        self.properties.closed.unwrap_or(false)
    }
}

/// Derived per-tick state of a wire.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WireState {
    /// Amperes (magnitude).
    pub current: f64,
    /// Volts (magnitude).
    pub voltage_drop: f64,
}

/// A connection between two ports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Wire {
    pub id: String,
    pub from: String,
    pub to: String,
    #[serde(default)]
    pub state: WireState,
}

impl Wire {
    pub fn new(id: impl Into<String>, from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            from: from.into(),
            to: to.into(),
            state: WireState::default(),
        }
    }

    pub fn touches(&self, port_id: &str) -> bool {
        self.from == port_id || self.to == port_id
    }
}
