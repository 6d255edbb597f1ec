//! Pre-run circuit checks.

use cs_components::{Component, ComponentKind, Wire};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// A single finding from [`validate_circuit`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "code")]
pub enum ValidationIssue {
    MissingPowerSource,
    MissingGround,
    UnconnectedComponent { id: String, name: String },
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationIssue::MissingPowerSource => {
                f.write_str("Circuit needs at least one power source")
            }
            ValidationIssue::MissingGround => f.write_str("Circuit needs a ground reference"),
            ValidationIssue::UnconnectedComponent { name, .. } => {
                write!(f, "Component {name} is not connected")
            }
        }
    }
}

/// Outcome of validating a circuit. Errors block `start`; warnings do not.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    pub is_valid: bool,
    pub errors: Vec<ValidationIssue>,
    pub warnings: Vec<ValidationIssue>,
}

/// Check that a circuit can run: at least one power source and one ground.
/// Every non-ground component without a wired port is reported as a warning.
pub fn validate_circuit(components: &[Component], wires: &[Wire]) -> ValidationReport {
    let mut errors = Vec::new();
    if !components.iter().any(|c| c.kind.is_power_source()) {
        errors.push(ValidationIssue::MissingPowerSource);
    }
    if !components.iter().any(|c| c.kind == ComponentKind::Ground) {
        errors.push(ValidationIssue::MissingGround);
    }

    let wired: HashSet<&str> = wires
        .iter()
        .flat_map(|w| [w.from.as_str(), w.to.as_str()])
        .collect();
    let warnings = components
        .iter()
        .filter(|c| c.kind != ComponentKind::Ground)
        .filter(|c| !c.ports.iter().any(|p| wired.contains(p.id.as_str())))
        .map(|c| ValidationIssue::UnconnectedComponent {
            id: c.id.clone(),
            name: c.label().to_string(),
        })
        .collect();

    ValidationReport {
        is_valid: errors.is_empty(),
        errors,
        warnings,
    }
}
