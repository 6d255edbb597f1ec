//! Simulation settings.

use cs_core::units::constants::{DEFAULT_AMBIENT_C, DEFAULT_FREQUENCY_HZ};
use cs_field::FieldConfig;
use serde::{Deserialize, Serialize};

/// Host-controlled knobs for a simulation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SimSettings {
    /// Excitation frequency for reactive branches and AC sources (Hz).
    pub frequency: f64,
    /// °C.
    pub ambient_temperature: f64,
    pub enable_thermal: bool,
    pub enable_failures: bool,
    /// Segment counts and payload floor for field queries.
    pub field: FieldConfig,
}

impl Default for SimSettings {
    fn default() -> Self {
        Self {
            frequency: DEFAULT_FREQUENCY_HZ,
            ambient_temperature: DEFAULT_AMBIENT_C,
            enable_thermal: true,
            enable_failures: true,
            field: FieldConfig::default(),
        }
    }
}
