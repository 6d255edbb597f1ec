//! Netlist validation logic.

use crate::schema::{ComponentDef, Netlist};
use std::collections::HashSet;

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Duplicate ID: {id} in {context}")]
    DuplicateId { id: String, context: String },

    #[error("Missing reference: {id} in {context}")]
    MissingReference { id: String, context: String },

    #[error("Invalid value: {field} = {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Unsupported version: {version}")]
    UnsupportedVersion { version: u32 },
}

pub fn validate_netlist(netlist: &Netlist) -> Result<(), ValidationError> {
    if netlist.version > crate::migrate::LATEST_VERSION {
        return Err(ValidationError::UnsupportedVersion {
            version: netlist.version,
        });
    }

    validate_settings(netlist)?;

    let mut component_ids = HashSet::new();
    let mut port_ids = HashSet::new();
    for component in &netlist.components {
        if !component_ids.insert(component.id.as_str()) {
            return Err(ValidationError::DuplicateId {
                id: component.id.clone(),
                context: "components".to_string(),
            });
        }
        validate_component(component)?;
        for port in component.port_ids() {
            if !port_ids.insert(port.clone()) {
                return Err(ValidationError::DuplicateId {
                    id: port,
                    context: format!("ports of component {}", component.id),
                });
            }
        }
    }

    let mut wire_ids = HashSet::new();
    for wire in &netlist.wires {
        if wire.id.is_empty() {
            return Err(ValidationError::InvalidValue {
                field: "wire.id".to_string(),
                value: String::new(),
                reason: "must not be empty".to_string(),
            });
        }
        if !wire_ids.insert(wire.id.as_str()) {
            return Err(ValidationError::DuplicateId {
                id: wire.id.clone(),
                context: "wires".to_string(),
            });
        }
        for end in [&wire.from, &wire.to] {
            if !port_ids.contains(end) {
                return Err(ValidationError::MissingReference {
                    id: end.clone(),
                    context: format!("wire {}", wire.id),
                });
            }
        }
    }

    Ok(())
}

fn validate_settings(netlist: &Netlist) -> Result<(), ValidationError> {
    let s = &netlist.settings;
    for (field, value) in [
        ("settings.frequency", s.frequency),
        ("settings.ambientTemperature", s.ambient_temperature),
    ] {
        if !value.is_finite() {
            return Err(ValidationError::InvalidValue {
                field: field.to_string(),
                value: value.to_string(),
                reason: "must be finite".to_string(),
            });
        }
    }
    if s.frequency < 0.0 {
        return Err(ValidationError::InvalidValue {
            field: "settings.frequency".to_string(),
            value: s.frequency.to_string(),
            reason: "must not be negative".to_string(),
        });
    }
    Ok(())
}

fn validate_component(component: &ComponentDef) -> Result<(), ValidationError> {
    let required = component.kind.required_ports();
    let found = component.port_ids().len();
    if found < required {
        return Err(ValidationError::InvalidValue {
            field: format!("{}.ports", component.id),
            value: found.to_string(),
            reason: format!("{} needs {} port(s)", component.kind, required),
        });
    }

    let p = &component.properties;
    for (field, value) in [
        ("resistance", p.resistance),
        ("capacitance", p.capacitance),
        ("inductance", p.inductance),
        ("radius", p.radius),
        ("length", p.length),
        ("separation", p.separation),
        ("pulseFrequency", p.pulse_frequency),
        ("voltageRating", p.voltage_rating),
    ] {
        if let Some(v) = value
            && (!v.is_finite() || v < 0.0)
        {
            return Err(ValidationError::InvalidValue {
                field: format!("{}.properties.{}", component.id, field),
                value: v.to_string(),
                reason: "must be finite and non-negative".to_string(),
            });
        }
    }
    if let Some(d) = p.duty_cycle
        && !(0.0..=1.0).contains(&d)
    {
        return Err(ValidationError::InvalidValue {
            field: format!("{}.properties.dutyCycle", component.id),
            value: d.to_string(),
            reason: "must be between 0 and 1".to_string(),
        });
    }
    Ok(())
}
